use std::path::{Path, PathBuf};

/// Result alias used across the crate.
pub type ClipResult<T> = Result<T, ClipError>;

/// Fatal failure of a clip job or one of its stages.
///
/// Non-fatal conditions (degenerate pan range, empty lyric window, font fallback) are reported
/// as [`JobWarning`] values instead.
#[derive(thiserror::Error, Debug)]
pub enum ClipError {
    /// A required input file (image, audio, lyric track) is absent or unreadable.
    #[error("missing asset '{}': {reason}", path.display())]
    MissingAsset {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying cause.
        reason: String,
    },

    /// A lyric timestamp did not parse as `MM:SS.hh`.
    #[error("malformed timestamp '{value}': {reason}")]
    MalformedTimestamp {
        /// Raw timestamp text.
        value: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The encoder, decoder or muxer rejected its input.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Invalid configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Anything else, with context attached by `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Distinct failure kinds a job can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum FailureKind {
    /// See [`ClipError::MissingAsset`].
    MissingAsset,
    /// See [`ClipError::MalformedTimestamp`].
    MalformedTimestamp,
    /// See [`ClipError::Encoding`].
    EncodingFailure,
    /// See [`ClipError::Validation`].
    Validation,
    /// See [`ClipError::Other`].
    Other,
}

impl ClipError {
    pub fn missing_asset(path: impl AsRef<Path>, reason: impl std::fmt::Display) -> Self {
        Self::MissingAsset {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed_timestamp(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedTimestamp {
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Classify this error for user-facing reporting.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::MissingAsset { .. } => FailureKind::MissingAsset,
            Self::MalformedTimestamp { .. } => FailureKind::MalformedTimestamp,
            Self::Encoding(_) => FailureKind::EncodingFailure,
            Self::Validation(_) => FailureKind::Validation,
            Self::Other(_) => FailureKind::Other,
        }
    }
}

/// Non-fatal condition surfaced during a job.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobWarning {
    /// The scaled image is not larger than the frame on some axis; the pan range collapses.
    DegenerateMotionRange {
        /// Scaled image width.
        image_width: u32,
        /// Scaled image height.
        image_height: u32,
        /// Frame width.
        frame_width: u32,
        /// Frame height.
        frame_height: u32,
    },
    /// No lyric line falls inside the window; the clip carries no text.
    EmptyLyricWindow,
    /// The style font could not be loaded and a fallback face is used instead.
    FontFallback {
        /// Style that was requested.
        style: String,
        /// Why the style font was rejected.
        reason: String,
    },
}

impl std::fmt::Display for JobWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DegenerateMotionRange {
                image_width,
                image_height,
                frame_width,
                frame_height,
            } => write!(
                f,
                "scaled image {image_width}x{image_height} is not larger than the \
                 {frame_width}x{frame_height} frame; panning is limited or absent"
            ),
            Self::EmptyLyricWindow => f.write_str("no lyric line falls inside the clip window"),
            Self::FontFallback { style, reason } => {
                write!(f, "font for style '{style}' unavailable ({reason}); using fallback")
            }
        }
    }
}

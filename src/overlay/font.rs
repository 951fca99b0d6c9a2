//! Font resolution for text styles.
//!
//! A style names a font file. When it is absent, unreadable or not a font, the overlay falls back
//! to a system sans-serif face and reports [`JobWarning::FontFallback`]. Font problems never fail
//! a job: with no usable face at all the overlay draws nothing.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::TextStyle;
use crate::foundation::error::JobWarning;

/// Where a resolved face came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontSource {
    /// The style's own font file.
    StyleFile(PathBuf),
    /// A system face picked by family query.
    System {
        /// Family name reported by the face.
        family: String,
    },
}

/// Raw font bytes plus the face index inside them.
#[derive(Clone, Debug)]
pub struct ResolvedFont {
    /// Complete font file contents (TTF/OTF/TTC).
    pub bytes: Arc<Vec<u8>>,
    /// Face index for collections.
    pub index: u32,
    /// Provenance, for logs.
    pub source: FontSource,
}

/// Outcome of [`resolve_font`].
#[derive(Clone, Debug, Default)]
pub struct FontResolution {
    /// Face to draw with, if any could be found.
    pub font: Option<ResolvedFont>,
    /// Fallbacks taken while resolving.
    pub warnings: Vec<JobWarning>,
}

/// Resolve the face for `style`, falling back to a system face.
#[tracing::instrument(level = "debug", skip(style))]
pub fn resolve_font(style_name: &str, style: &TextStyle) -> FontResolution {
    resolve_font_with(style_name, style, system_sans_serif)
}

fn resolve_font_with(
    style_name: &str,
    style: &TextStyle,
    fallback: impl FnOnce() -> Option<ResolvedFont>,
) -> FontResolution {
    let mut warnings = Vec::new();

    if let Some(path) = style.font_path.as_deref() {
        match load_font_file(path) {
            Ok(font) => {
                tracing::debug!(path = %path.display(), "using style font");
                return FontResolution {
                    font: Some(font),
                    warnings,
                };
            }
            Err(reason) => {
                let w = JobWarning::FontFallback {
                    style: style_name.to_owned(),
                    reason,
                };
                tracing::warn!(warning = %w, "style font unavailable");
                warnings.push(w);
            }
        }
    }

    let font = fallback();
    match &font {
        Some(f) => tracing::debug!(source = ?f.source, "using fallback font"),
        None => {
            let w = JobWarning::FontFallback {
                style: style_name.to_owned(),
                reason: "no system sans-serif face is available; text is not drawn".to_owned(),
            };
            tracing::warn!(warning = %w, "no fallback font");
            warnings.push(w);
        }
    }
    FontResolution { font, warnings }
}

/// Read `path` and check that it holds at least one parseable face.
pub fn load_font_file(path: &Path) -> Result<ResolvedFont, String> {
    let bytes = std::fs::read(path).map_err(|e| format!("cannot read '{}': {e}", path.display()))?;
    let mut db = usvg::fontdb::Database::new();
    db.load_font_data(bytes.clone());
    if db.faces().next().is_none() {
        return Err(format!("'{}' contains no usable font face", path.display()));
    }
    Ok(ResolvedFont {
        bytes: Arc::new(bytes),
        index: 0,
        source: FontSource::StyleFile(path.to_path_buf()),
    })
}

/// First system face matching the generic sans-serif family.
pub fn system_sans_serif() -> Option<ResolvedFont> {
    use usvg::fontdb::{Database, Family, Query};

    let mut db = Database::new();
    db.load_system_fonts();
    let id = db.query(&Query {
        families: &[Family::SansSerif, Family::Serif, Family::Monospace],
        ..Query::default()
    })?;
    let family = db
        .face(id)
        .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
        .unwrap_or_default();
    db.with_face_data(id, |data, index| ResolvedFont {
        bytes: Arc::new(data.to_vec()),
        index,
        source: FontSource::System { family },
    })
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/font.rs"]
mod tests;

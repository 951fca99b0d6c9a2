use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{ClipError, ClipResult};

/// Per-line script transform applied after wrapping, before measuring and drawing.
pub trait ScriptTransform: Send + Sync {
    fn apply(&self, line: &str) -> String;
}

/// Leaves text unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl ScriptTransform for Identity {
    fn apply(&self, line: &str) -> String {
        line.to_owned()
    }
}

/// Ordered literal replacements, used to map Unicode text onto legacy font encodings.
///
/// Rules run in table order over the whole line, so earlier multi-character rules take
/// precedence over later single-character ones.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplacementTable {
    rules: Vec<(String, String)>,
}

impl ReplacementTable {
    pub fn new(rules: Vec<(String, String)>) -> ClipResult<Self> {
        if let Some((i, _)) = rules.iter().enumerate().find(|(_, (from, _))| from.is_empty()) {
            return Err(ClipError::validation(format!(
                "transliteration rule {i} has an empty pattern"
            )));
        }
        Ok(Self { rules })
    }

    /// Load a JSON array of `[from, to]` pairs.
    pub fn from_json_file(path: &Path) -> ClipResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ClipError::missing_asset(path, e))?;
        let rules: Vec<(String, String)> = serde_json::from_str(&text)
            .with_context(|| format!("parse transliteration table '{}'", path.display()))?;
        tracing::debug!(path = %path.display(), rules = rules.len(), "loaded transliteration table");
        Self::new(rules)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl ScriptTransform for ReplacementTable {
    fn apply(&self, line: &str) -> String {
        self.rules
            .iter()
            .fold(line.to_owned(), |acc, (from, to)| acc.replace(from.as_str(), to))
    }
}

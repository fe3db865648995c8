use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options that shape rendered source text. Two renders of the same model
/// with equal configurations are byte-identical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// One level of block indentation.
    pub indent: String,
    /// Line terminator written between lines.
    pub newline: String,
    /// Annotation array values with more elements than this are written one
    /// element per line.
    pub array_wrap_threshold: usize,
    /// When false, no imports are emitted and every class is fully qualified.
    pub emit_imports: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
            newline: "\n".to_string(),
            array_wrap_threshold: 1,
            emit_imports: true,
        }
    }
}

impl RenderConfig {
    /// Defaults with the host platform's line terminator.
    pub fn platform() -> Self {
        Self {
            newline: if cfg!(windows) { "\r\n" } else { "\n" }.to_string(),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

//! JSON output types for machine-readable CLI output.
//!
//! Every command that accepts `--json` prints exactly one of these documents
//! to stdout, so tools can parse the result without scraping colored text.

use serde::{Deserialize, Serialize};

use gridbox_spec::{
    GenerationReport, ReportError, ReportWarning, ShaderBinding, ValidationError, ValidationWarning,
};

/// Stable error codes for CLI-level failures. Validation codes (`E0xx`) pass
/// through unchanged.
pub mod error_codes {
    /// Config file could not be read or parsed
    pub const CONFIG: &str = "CLI_001";
    /// Project directory missing or input path outside it
    pub const PROJECT: &str = "CLI_002";
    /// Import settings could not be repaired
    pub const IMPORT_SETTINGS: &str = "CLI_003";
    /// Input image could not be loaded
    pub const IMAGE_LOAD: &str = "CLI_004";
    /// Run aborted by the asset database
    pub const GENERATION_ERROR: &str = "CLI_010";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl JsonError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl From<&ReportError> for JsonError {
    fn from(err: &ReportError) -> Self {
        Self {
            code: err.code.clone(),
            message: err.message.clone(),
            path: err.path.clone(),
        }
    }
}

impl From<&ValidationError> for JsonError {
    fn from(err: &ValidationError) -> Self {
        Self {
            code: err.code.to_string(),
            message: err.message.clone(),
            path: err.path.clone(),
        }
    }
}

/// A structured warning in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonWarning {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl From<&ReportWarning> for JsonWarning {
    fn from(warn: &ReportWarning) -> Self {
        Self {
            code: warn.code.clone(),
            message: warn.message.clone(),
            path: warn.path.clone(),
        }
    }
}

impl From<&ValidationWarning> for JsonWarning {
    fn from(warn: &ValidationWarning) -> Self {
        Self {
            code: warn.code.to_string(),
            message: warn.message.clone(),
            path: warn.path.clone(),
        }
    }
}

/// Output of `gridbox generate --json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOutput {
    /// True when every palette entry produced a texture and a material.
    pub success: bool,
    pub errors: Vec<JsonError>,
    pub warnings: Vec<JsonWarning>,
    /// Inputs whose import settings were changed before sampling.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repaired_inputs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<GenerationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_path: Option<String>,
}

/// One palette color in `gridbox inspect --json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InspectColor {
    pub index: u32,
    pub hex: String,
    pub rgba: [u8; 4],
    pub file_stem: String,
}

/// Output of `gridbox inspect --json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectOutput {
    pub success: bool,
    pub errors: Vec<JsonError>,
    pub warnings: Vec<JsonWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default)]
    pub colors: Vec<InspectColor>,
}

impl InspectOutput {
    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            errors,
            warnings: Vec::new(),
            palette_name: None,
            width: None,
            height: None,
            colors: Vec::new(),
        }
    }
}

/// One row of `gridbox shaders --json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShaderRow {
    /// Pipeline tag, or `*` for the fallback.
    pub pipeline: String,
    #[serde(flatten)]
    pub binding: ShaderBinding,
    /// Whether this row is used by the loaded config.
    pub active: bool,
}

/// Output of `gridbox shaders --json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShadersOutput {
    pub pipeline: String,
    pub shaders: Vec<ShaderRow>,
}

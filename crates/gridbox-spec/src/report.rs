//! Report types and builder for generation runs.
//!
//! A report documents one generation run: the configuration it ran with, one
//! entry per palette color, and every error or warning raised along the way.
//! Per-entry failures do not abort a run, so a report can be `ok: false` and
//! still list written textures.

use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::error::{ValidationError, ValidationWarning};

/// Report schema version.
pub const REPORT_VERSION: u32 = 1;

/// A complete report for a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Report schema version.
    pub report_version: u32,
    /// Whether the run completed without errors.
    pub ok: bool,
    /// Base name of the palette image.
    pub palette_name: String,
    /// Number of colors sampled from the palette (its width).
    pub color_count: u32,
    /// Edge length of the generated textures.
    pub texture_size: u32,
    /// Pipeline tag the run targeted.
    pub pipeline: String,
    /// Shader identifier selected for the materials.
    pub shader: String,
    /// Number of texture files written.
    pub textures_written: usize,
    /// Number of material assets created.
    pub materials_written: usize,
    /// One entry per palette color that produced a texture.
    pub entries: Vec<EntryReport>,
    /// Errors raised during the run.
    pub errors: Vec<ReportError>,
    /// Warnings raised during the run.
    pub warnings: Vec<ReportWarning>,
    /// Total execution time in milliseconds.
    pub duration_ms: u64,
    /// Backend identifier and version.
    pub backend_version: String,
}

impl GenerationReport {
    /// Creates a new report builder.
    pub fn builder(palette_name: impl Into<String>, backend_version: impl Into<String>) -> ReportBuilder {
        ReportBuilder::new(palette_name, backend_version)
    }

    /// Serializes the report to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parses a report from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Result for one palette color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryReport {
    /// Palette index (x coordinate in the palette's sampled row).
    pub index: u32,
    /// Hex code of the palette color (`#RRGGBB`).
    pub hex: String,
    /// Asset path of the written texture.
    pub texture_path: String,
    /// Hex-encoded BLAKE3 hash of the PNG bytes.
    pub texture_hash: String,
    /// Asset path of the created material, if one was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_path: Option<String>,
}

/// Error entry in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportError {
    /// Error code (e.g., "E001", "E100").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Field or asset path the error refers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ReportError {
    /// Creates a new report error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new report error with a path.
    pub fn with_path(
        code: impl Into<String>,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Converts a ValidationError to a ReportError.
    pub fn from_validation_error(err: &ValidationError) -> Self {
        Self {
            code: err.code.code().to_string(),
            message: err.message.clone(),
            path: err.path.clone(),
        }
    }
}

/// Warning entry in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWarning {
    /// Warning code (e.g., "W001").
    pub code: String,
    /// Human-readable warning message.
    pub message: String,
    /// Field or asset path the warning refers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ReportWarning {
    /// Creates a new report warning.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
        }
    }

    /// Converts a ValidationWarning to a ReportWarning.
    pub fn from_validation_warning(warn: &ValidationWarning) -> Self {
        Self {
            code: warn.code.code().to_string(),
            message: warn.message.clone(),
            path: warn.path.clone(),
        }
    }
}

/// Builder for creating reports ergonomically.
///
/// Written counts are derived from the entries at [`ReportBuilder::build`].
pub struct ReportBuilder {
    palette_name: String,
    color_count: u32,
    texture_size: u32,
    pipeline: String,
    shader: String,
    ok: bool,
    entries: Vec<EntryReport>,
    errors: Vec<ReportError>,
    warnings: Vec<ReportWarning>,
    duration_ms: u64,
    backend_version: String,
}

impl ReportBuilder {
    /// Creates a new report builder.
    ///
    /// # Example
    ///
    /// ```
    /// use gridbox_spec::report::ReportBuilder;
    ///
    /// let report = ReportBuilder::new("retro", "gridbox-backend-texture v0.1.0")
    ///     .color_count(0)
    ///     .duration_ms(12)
    ///     .build();
    /// assert!(report.ok);
    /// assert_eq!(report.textures_written, 0);
    /// ```
    pub fn new(palette_name: impl Into<String>, backend_version: impl Into<String>) -> Self {
        Self {
            palette_name: palette_name.into(),
            color_count: 0,
            texture_size: 0,
            pipeline: String::new(),
            shader: String::new(),
            ok: true,
            entries: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
            duration_ms: 0,
            backend_version: backend_version.into(),
        }
    }

    /// Records the texture size, pipeline, and shader of a configuration.
    pub fn config(mut self, config: &GenerationConfig) -> Self {
        self.texture_size = config.texture_size;
        self.pipeline = config.pipeline.tag().to_string();
        self.shader = config.shader_binding().shader.clone();
        self
    }

    /// Sets the number of palette colors.
    pub fn color_count(mut self, count: u32) -> Self {
        self.color_count = count;
        self
    }

    /// Adds a palette entry result.
    pub fn entry(mut self, entry: EntryReport) -> Self {
        self.entries.push(entry);
        self
    }

    /// Adds an error to the report.
    pub fn error(mut self, error: ReportError) -> Self {
        self.errors.push(error);
        self.ok = false;
        self
    }

    /// Adds a warning to the report.
    pub fn warning(mut self, warning: ReportWarning) -> Self {
        self.warnings.push(warning);
        self
    }

    /// Sets the duration in milliseconds.
    pub fn duration_ms(mut self, ms: u64) -> Self {
        self.duration_ms = ms;
        self
    }

    /// Builds the final report.
    pub fn build(self) -> GenerationReport {
        let textures_written = self.entries.len();
        let materials_written = self
            .entries
            .iter()
            .filter(|e| e.material_path.is_some())
            .count();

        GenerationReport {
            report_version: REPORT_VERSION,
            ok: self.ok,
            palette_name: self.palette_name,
            color_count: self.color_count,
            texture_size: self.texture_size,
            pipeline: self.pipeline,
            shader: self.shader,
            textures_written,
            materials_written,
            entries: self.entries,
            errors: self.errors,
            warnings: self.warnings,
            duration_ms: self.duration_ms,
            backend_version: self.backend_version,
        }
    }
}

//! Configuration and input validation.
//!
//! Validation runs before a generation run touches the asset database. Any
//! error aborts the run; warnings are carried into the report.

use crate::config::GenerationConfig;
use crate::error::{
    ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode,
};

/// Largest texture edge the generator accepts. Blending holds one
/// f64 RGBA buffer of `size * size` texels, 512 MiB at this edge.
pub const MAX_TEXTURE_SIZE: u32 = 4096;

/// Pixel dimensions of an input raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputDimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl InputDimensions {
    /// Creates new dimensions.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Checks if a path is relative and free of traversal.
pub fn is_safe_relative_path(path: &str) -> bool {
    path_safety_errors(path).is_empty()
}

fn path_safety_errors(path: &str) -> Vec<String> {
    let mut errors = Vec::new();

    if path.is_empty() {
        errors.push("path cannot be empty".to_string());
        return errors;
    }

    if path.starts_with('/') || path.starts_with('\\') {
        errors.push(format!("path must be relative, not absolute: '{}'", path));
    }

    if path.len() >= 2 && path.chars().nth(1) == Some(':') {
        errors.push(format!("path must not contain drive letter: '{}'", path));
    }

    if path.split(['/', '\\']).any(|segment| segment == "..") {
        errors.push(format!("path must not contain '..' segments: '{}'", path));
    }

    errors
}

/// Validates a generation configuration.
pub fn validate_config(config: &GenerationConfig) -> ValidationResult {
    let mut result = ValidationResult::success();

    if config.texture_size == 0 || config.texture_size > MAX_TEXTURE_SIZE {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidTextureSize,
            format!(
                "texture size must be between 1 and {}, got {}",
                MAX_TEXTURE_SIZE, config.texture_size
            ),
            "texture_size",
        ));
    } else if !config.texture_size.is_power_of_two() {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::NonPowerOfTwoSize,
            format!(
                "texture size {} is not a power of two; engines may rescale it on import",
                config.texture_size
            ),
            "texture_size",
        ));
    }

    let root = config.output_root.to_string_lossy();
    for message in path_safety_errors(&root) {
        result.add_error(ValidationError::with_path(
            ErrorCode::UnsafeOutputPath,
            format!("output root: {}", message),
            "output_root",
        ));
    }

    if config.pipeline.tag().trim().is_empty() {
        result.add_error(ValidationError::with_path(
            ErrorCode::EmptyPipelineTag,
            "pipeline tag cannot be empty",
            "pipeline",
        ));
    }

    result
}

/// Validates the palette and overlay inputs of a run.
///
/// A `None` input is a missing reference and fails the run before any work.
pub fn validate_inputs(
    palette: Option<(&str, InputDimensions)>,
    overlay: Option<InputDimensions>,
) -> ValidationResult {
    let mut result = ValidationResult::success();

    match palette {
        None => result.add_error(ValidationError::new(
            ErrorCode::MissingPalette,
            "no color palette assigned",
        )),
        Some((name, dims)) => {
            if dims.is_empty() {
                result.add_error(ValidationError::with_path(
                    ErrorCode::EmptyImage,
                    format!("palette image is empty ({}x{})", dims.width, dims.height),
                    "palette",
                ));
            } else if dims.height > 1 {
                result.add_warning(ValidationWarning::with_path(
                    WarningCode::TallPalette,
                    format!(
                        "palette is {} rows tall; only the bottom row is sampled",
                        dims.height
                    ),
                    "palette",
                ));
            }

            if name.contains(['/', '\\']) {
                result.add_error(ValidationError::with_path(
                    ErrorCode::UnsafeOutputPath,
                    format!("palette name must not contain path separators: '{}'", name),
                    "palette",
                ));
            } else {
                for message in path_safety_errors(name) {
                    result.add_error(ValidationError::with_path(
                        ErrorCode::UnsafeOutputPath,
                        format!("palette name: {}", message),
                        "palette",
                    ));
                }
            }
        }
    }

    match overlay {
        None => result.add_error(ValidationError::new(
            ErrorCode::MissingOverlay,
            "no overlay pattern assigned",
        )),
        Some(dims) if dims.is_empty() => result.add_error(ValidationError::with_path(
            ErrorCode::EmptyImage,
            format!("overlay image is empty ({}x{})", dims.width, dims.height),
            "overlay",
        )),
        Some(_) => {}
    }

    result
}

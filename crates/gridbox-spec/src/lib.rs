//! Gridbox Configuration Library
//!
//! This crate provides the types shared by the gridbox generator and its
//! front ends: the immutable generation configuration, the pipeline to shader
//! lookup table, material asset descriptions, configuration validation, and
//! the report produced by a generation run.
//!
//! # Example
//!
//! ```
//! use gridbox_spec::{GenerationConfig, Pipeline};
//! use gridbox_spec::validation::validate_config;
//!
//! let config = GenerationConfig {
//!     texture_size: 256,
//!     pipeline: Pipeline::Hdrp,
//!     ..GenerationConfig::default()
//! };
//!
//! assert!(validate_config(&config).is_ok());
//! assert_eq!(config.shader_binding().shader, "HDRP/Lit");
//! ```
//!
//! # Modules
//!
//! - [`config`]: Generation configuration, pipelines, and the shader table
//! - [`error`]: Error and warning codes for validation
//! - [`material`]: Material asset description
//! - [`report`]: Report types and builder for generation runs
//! - [`validation`]: Configuration and input validation

pub mod config;
pub mod error;
pub mod material;
pub mod report;
pub mod validation;

pub use config::{
    GenerationConfig, Pipeline, ShaderBinding, ShaderTable, DEFAULT_OUTPUT_ROOT,
    DEFAULT_TEXTURE_SIZE,
};
pub use error::{
    BackendError, ConfigError, ErrorCode, ValidationError, ValidationResult, ValidationWarning,
    WarningCode,
};
pub use material::MaterialAsset;
pub use report::{
    EntryReport, GenerationReport, ReportBuilder, ReportError, ReportWarning, REPORT_VERSION,
};
pub use validation::{
    is_safe_relative_path, validate_config, validate_inputs, InputDimensions, MAX_TEXTURE_SIZE,
};

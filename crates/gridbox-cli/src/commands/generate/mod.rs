//! Generate command implementation
//!
//! Checks both inputs, repairs their import settings, loads them from the
//! project, and generates one gridbox texture and material per palette color.

mod human;
mod json;


use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use gridbox_backend_texture::asset::{
    asset_path_string, AssetDatabase, InstalledShaders, TextureImporter,
};
use gridbox_backend_texture::{generate_gridbox_set, GenerateError, PaletteInput, TextureBuffer};
use gridbox_spec::{
    validate_config, validate_inputs, BackendError, GenerationConfig, GenerationReport,
    InputDimensions, ReportError, ValidationError,
};

use crate::commands::json_output::{error_codes, JsonError};
use crate::config::{load_config, ConfigOverrides};
use crate::fs_assets::FsAssetDatabase;

/// Inputs to `gridbox generate`.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Palette image, relative to the project or absolute inside it.
    pub palette: PathBuf,
    /// Overlay image, relative to the project or absolute inside it.
    pub overlay: PathBuf,
    /// Optional JSON config file.
    pub config: Option<PathBuf>,
    pub overrides: ConfigOverrides,
    /// Project directory the asset database is rooted at.
    pub project: PathBuf,
    /// Installed shader identifiers. Empty means every shader in the table.
    pub installed_shaders: Vec<String>,
    /// Where to write the run report, if anywhere.
    pub report: Option<PathBuf>,
}

impl GenerateOptions {
    /// Options with default config, rooted at `project`.
    pub fn new(
        project: impl Into<PathBuf>,
        palette: impl Into<PathBuf>,
        overlay: impl Into<PathBuf>,
    ) -> Self {
        Self {
            palette: palette.into(),
            overlay: overlay.into(),
            config: None,
            overrides: ConfigOverrides::default(),
            project: project.into(),
            installed_shaders: Vec::new(),
            report: None,
        }
    }
}

/// Run the generate command
///
/// # Returns
/// Exit code: 0 every entry complete, 1 run could not start, 2 run completed
/// with per-entry failures
pub fn run(options: &GenerateOptions, json_output: bool) -> Result<ExitCode> {
    if json_output {
        json::run_json(options)
    } else {
        human::run_human(options)
    }
}

/// What a generate run produced, independent of how it is printed.
#[derive(Debug, Default)]
pub(crate) struct Execution {
    pub config: Option<GenerationConfig>,
    pub report: Option<GenerationReport>,
    /// Errors that stopped the run before or instead of generation.
    pub errors: Vec<JsonError>,
    /// Inputs whose import settings were rewritten.
    pub repaired: Vec<String>,
}

impl Execution {
    pub fn exit_code(&self) -> ExitCode {
        if !self.errors.is_empty() {
            ExitCode::from(1)
        } else if self.report.as_ref().is_some_and(|r| r.ok) {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(2)
        }
    }

    fn fail(mut self, error: JsonError) -> Self {
        self.errors.push(error);
        self
    }
}

fn backend_version() -> String {
    format!("gridbox-cli v{}", env!("CARGO_PKG_VERSION"))
}

/// Runs generation and collects the outcome.
///
/// Both inputs are resolved and checked before anything in the project is
/// written. Import settings are only repaired once the run can proceed.
pub(crate) fn execute(options: &GenerateOptions) -> Execution {
    let mut exec = Execution::default();

    let config = match load_config(options.config.as_deref(), &options.overrides) {
        Ok(config) => config,
        Err(e) => return exec.fail(JsonError::new(error_codes::CONFIG, format!("{:#}", e))),
    };
    exec.config = Some(config.clone());

    let mut db = match FsAssetDatabase::open(&options.project) {
        Ok(db) => db,
        Err(e) => {
            return exec.fail(
                JsonError::new(error_codes::PROJECT, e.to_string())
                    .with_path(options.project.display().to_string()),
            )
        }
    };

    let palette_name = options
        .palette
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let palette = match resolve_input(&db, &options.palette) {
        Ok(palette) => palette,
        Err(e) => return exec.fail(e),
    };
    let overlay = match resolve_input(&db, &options.overlay) {
        Ok(overlay) => overlay,
        Err(e) => return exec.fail(e),
    };

    let mut checks = validate_config(&config);
    checks.merge(validate_inputs(
        palette.as_ref().map(|p| (palette_name.as_str(), p.dimensions)),
        overlay.as_ref().map(|o| o.dimensions),
    ));
    let (palette, overlay) = match (palette, overlay) {
        (Some(palette), Some(overlay)) if checks.is_ok() => (palette, overlay),
        _ => return precondition_failure(exec, &palette_name, &config, &checks.errors),
    };

    let palette_image = match load_input(&mut db, &palette, &mut exec.repaired) {
        Ok(image) => image,
        Err(e) => return exec.fail(e),
    };
    let overlay_image = match load_input(&mut db, &overlay, &mut exec.repaired) {
        Ok(image) => image,
        Err(e) => return exec.fail(e),
    };

    let shaders = if options.installed_shaders.is_empty() {
        InstalledShaders::from_table(&config.shader_table)
    } else {
        InstalledShaders::new(options.installed_shaders.iter().cloned())
    };

    match generate_gridbox_set(
        Some(PaletteInput::new(&palette_name, &palette_image)),
        Some(&overlay_image),
        &config,
        &mut db,
        &shaders,
    ) {
        Ok(report) => exec.report = Some(report),
        Err(GenerateError::Precondition(errors)) => {
            return precondition_failure(exec, &palette_name, &config, &errors)
        }
        Err(e) => {
            exec.errors.push(JsonError::new(
                error_codes::GENERATION_ERROR,
                format!("[{}] {}", e.code(), e),
            ));
        }
    }

    exec
}

/// Records failed preconditions as run errors and as a failed report.
fn precondition_failure(
    mut exec: Execution,
    palette_name: &str,
    config: &GenerationConfig,
    errors: &[ValidationError],
) -> Execution {
    let mut builder = GenerationReport::builder(palette_name, backend_version()).config(config);
    for err in errors {
        exec.errors.push(JsonError::from(err));
        builder = builder.error(ReportError::from_validation_error(err));
    }
    exec.report = Some(builder.build());
    exec
}

/// An input image located inside the project, not yet repaired or loaded.
#[derive(Debug)]
struct InputAsset {
    path: PathBuf,
    display: String,
    dimensions: InputDimensions,
}

/// Locates one input image and reads its dimensions without touching it.
///
/// A file that does not exist yields `None` so it is reported as a missing
/// input.
fn resolve_input(db: &FsAssetDatabase, path: &Path) -> Result<Option<InputAsset>, JsonError> {
    let on_disk = if path.is_absolute() {
        path.to_path_buf()
    } else {
        db.absolute(path)
    };
    if !on_disk.is_file() {
        log::warn!("Input not found: {}", path.display());
        return Ok(None);
    }

    let display = path.display().to_string();
    let asset_path = db
        .asset_path(path)
        .map_err(|e| JsonError::new(error_codes::PROJECT, e.to_string()).with_path(&display))?;
    let texture = db.load_texture(&asset_path).ok_or_else(|| {
        JsonError::new(error_codes::IMAGE_LOAD, "cannot read image dimensions").with_path(&display)
    })?;

    Ok(Some(InputAsset {
        path: asset_path,
        display,
        dimensions: InputDimensions::new(texture.width, texture.height),
    }))
}

/// Repairs the import settings of a resolved input and loads its pixels.
fn load_input(
    db: &mut FsAssetDatabase,
    input: &InputAsset,
    repaired: &mut Vec<String>,
) -> Result<TextureBuffer, JsonError> {
    if db.ensure_readable_unscaled(&input.path).map_err(|e| {
        JsonError::new(error_codes::IMPORT_SETTINGS, e.to_string()).with_path(&input.display)
    })? {
        repaired.push(asset_path_string(&input.path));
    }

    db.load_image(&input.path)
        .map_err(|e| JsonError::new(error_codes::IMAGE_LOAD, e.to_string()).with_path(&input.display))
}

/// Writes `report` as pretty JSON.
pub(crate) fn write_report(report: &GenerationReport, path: &Path) -> Result<()> {
    let json = report
        .to_json_pretty()
        .context("Failed to serialize report")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create report directory: {}", parent.display()))?;
    }
    fs::write(path, json).with_context(|| format!("Failed to write report: {}", path.display()))
}

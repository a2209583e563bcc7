//! Palette gridbox generation.
//!
//! For every color in a palette's sampled row this module blends the color
//! with a tiled overlay pattern, writes the result as a square PNG texture,
//! and creates a material that references the texture with the shader chosen
//! by the configured pipeline.
//!
//! Output layout, relative to the asset database root:
//!
//! ```text
//! <output_root>/<palette>/Textures/<HEX> - <palette>.png
//! <output_root>/<palette>/Materials/<HEX> - <palette>.mat
//! ```

use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

use gridbox_spec::validation::{validate_config, validate_inputs, InputDimensions};
use gridbox_spec::{
    BackendError, EntryReport, ErrorCode, GenerationConfig, GenerationReport, MaterialAsset,
    ReportError, ReportWarning, ShaderBinding, ValidationError,
};

use crate::asset::{asset_path_string, AssetDatabase, AssetError, ShaderRegistry};
use crate::buffer::{PixelSource, TextureBuffer};
use crate::color::Color;
use crate::png::{self, PngConfig};

/// Folder holding generated textures, under the palette folder.
pub const TEXTURES_FOLDER: &str = "Textures";

/// Folder holding generated materials, under the palette folder.
pub const MATERIALS_FOLDER: &str = "Materials";

/// Errors that abort a whole generation run.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("precondition failed: {}", join_errors(.0))]
    Precondition(Vec<ValidationError>),

    #[error("asset database error: {0}")]
    Asset(#[from] AssetError),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl BackendError for GenerateError {
    fn code(&self) -> &'static str {
        match self {
            GenerateError::Precondition(_) => "TEXTURE_001",
            GenerateError::Asset(_) => "TEXTURE_002",
        }
    }

    fn category(&self) -> &'static str {
        "texture"
    }
}

/// A palette image together with the base name used for its outputs.
#[derive(Clone, Copy)]
pub struct PaletteInput<'a> {
    /// Palette base name (file name without extension).
    pub name: &'a str,
    /// Palette raster; its width is the color count.
    pub image: &'a dyn PixelSource,
}

impl<'a> PaletteInput<'a> {
    /// Creates a palette input.
    pub fn new(name: &'a str, image: &'a dyn PixelSource) -> Self {
        Self { name, image }
    }

    /// Samples the palette colors from row 0, left to right.
    pub fn colors(&self) -> impl Iterator<Item = Color> + 'a {
        let image = self.image;
        (0..image.width()).map(move |x| image.pixel(x, 0))
    }
}

/// File stem shared by a palette color's texture and material.
pub fn gridbox_file_stem(hex: &str, palette_name: &str) -> String {
    format!("{} - {}", hex, palette_name)
}

/// Output folders and file paths for one palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridboxLayout {
    palette_name: String,
    folder: PathBuf,
}

impl GridboxLayout {
    /// Layout for `palette_name` under `output_root`.
    pub fn new(output_root: &Path, palette_name: &str) -> Self {
        Self {
            palette_name: palette_name.to_string(),
            folder: output_root.join(palette_name),
        }
    }

    /// `<output_root>/<palette>`
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// `<output_root>/<palette>/Textures`
    pub fn textures(&self) -> PathBuf {
        self.folder.join(TEXTURES_FOLDER)
    }

    /// `<output_root>/<palette>/Materials`
    pub fn materials(&self) -> PathBuf {
        self.folder.join(MATERIALS_FOLDER)
    }

    /// Texture path for a palette color.
    pub fn texture_path(&self, hex: &str) -> PathBuf {
        self.textures()
            .join(format!("{}.png", gridbox_file_stem(hex, &self.palette_name)))
    }

    /// Material path for a palette color.
    pub fn material_path(&self, hex: &str) -> PathBuf {
        self.materials()
            .join(format!("{}.mat", gridbox_file_stem(hex, &self.palette_name)))
    }

    /// The three folders a run needs, parents first.
    pub fn folders(&self) -> [PathBuf; 3] {
        [self.folder.clone(), self.textures(), self.materials()]
    }
}

/// Blends `color` with `overlay` tiled across a `size`x`size` texture.
///
/// Each texel `(x, y)` is `color.lerp(o, o.a)` where `o` is the overlay texel
/// at `(x mod width, y mod height)`.
pub fn blend_gridbox<P>(color: Color, overlay: &P, size: u32) -> TextureBuffer
where
    P: PixelSource + ?Sized,
{
    let (ow, oh) = overlay.dimensions();
    let mut buffer = TextureBuffer::new(size, size, color);

    for y in 0..size {
        for x in 0..size {
            let o = overlay.pixel(x % ow, y % oh);
            buffer.set_texel(x, y, color.lerp(&o, o.a));
        }
    }

    buffer
}

/// Generates one gridbox texture and material per palette color.
///
/// Missing inputs and invalid configuration fail the run before any asset
/// call. After that, failures are scoped to the palette entry they occur in:
/// the error is reported, the entry's material is skipped, and the run goes
/// on. Failing to save or refresh the database at the end is fatal.
pub fn generate_gridbox_set<O>(
    palette: Option<PaletteInput<'_>>,
    overlay: Option<&O>,
    config: &GenerationConfig,
    assets: &mut dyn AssetDatabase,
    shaders: &dyn ShaderRegistry,
) -> Result<GenerationReport, GenerateError>
where
    O: PixelSource + ?Sized,
{
    let start = Instant::now();

    let mut validation = validate_config(config);
    validation.merge(validate_inputs(
        palette.map(|p| (p.name, dimensions_of(p.image))),
        overlay.map(|o| dimensions_of(o)),
    ));

    let (palette, overlay) = match (palette, overlay) {
        (Some(p), Some(o)) if validation.is_ok() => (p, o),
        _ => {
            for err in &validation.errors {
                log::error!("{}", err);
            }
            return Err(GenerateError::Precondition(validation.errors));
        }
    };

    let backend_version = format!("gridbox-backend-texture v{}", env!("CARGO_PKG_VERSION"));
    let mut report = GenerationReport::builder(palette.name, backend_version).config(config);
    for warning in &validation.warnings {
        log::warn!("{}", warning);
        report = report.warning(ReportWarning::from_validation_warning(warning));
    }

    let layout = GridboxLayout::new(&config.output_root, palette.name);
    for folder in layout.folders() {
        if !assets.is_valid_folder(&folder) {
            assets.create_folder(&folder)?;
            log::debug!("Created folder: {}", folder.display());
        }
    }

    let color_count = palette.image.width();
    report = report.color_count(color_count);
    log::info!("Palette contains {} colors.", color_count);

    let binding = config.shader_binding();
    let png_config = PngConfig::default();

    for (index, color) in palette.colors().enumerate() {
        let hex = color.to_hex();
        let texture_path = layout.texture_path(&hex);

        let hash = match write_gridbox_texture(
            assets,
            color,
            overlay,
            config.texture_size,
            &texture_path,
            &png_config,
        ) {
            Ok(hash) => hash,
            Err(err) => {
                log::error!("{}", err.message);
                report = report.error(err);
                continue;
            }
        };
        log::info!("Texture saved: {}", texture_path.display());

        let material_path = layout.material_path(&hex);
        let material_name = gridbox_file_stem(&hex, palette.name);
        let material_path = match create_gridbox_material(
            assets,
            shaders,
            config,
            binding,
            &texture_path,
            &material_path,
            material_name,
        ) {
            Ok(()) => {
                log::info!("Material created: {}", material_path.display());
                Some(asset_path_string(&material_path))
            }
            Err(err) => {
                log::error!("{}", err.message);
                report = report.error(err);
                None
            }
        };

        report = report.entry(EntryReport {
            index: index as u32,
            hex,
            texture_path: asset_path_string(&texture_path),
            texture_hash: hash,
            material_path,
        });
    }

    assets.save_assets()?;
    assets.refresh()?;

    let report = report
        .duration_ms(start.elapsed().as_millis() as u64)
        .build();
    log::info!(
        "{} materials have been successfully generated.",
        report.materials_written
    );

    Ok(report)
}

fn dimensions_of<P: PixelSource + ?Sized>(image: &P) -> InputDimensions {
    let (width, height) = image.dimensions();
    InputDimensions::new(width, height)
}

/// Blends, encodes, writes and imports one texture. The raster is dropped
/// before the write.
fn write_gridbox_texture<O: PixelSource + ?Sized>(
    assets: &mut dyn AssetDatabase,
    color: Color,
    overlay: &O,
    size: u32,
    path: &Path,
    png_config: &PngConfig,
) -> Result<String, ReportError> {
    let write_failed = |message: String| {
        ReportError::with_path(
            ErrorCode::TextureWriteFailed.code(),
            message,
            asset_path_string(path),
        )
    };

    let (bytes, hash) = {
        let buffer = blend_gridbox(color, overlay, size);
        png::write_rgba_to_vec_with_hash(&buffer, png_config)
            .map_err(|e| write_failed(format!("Failed to encode texture {}: {}", path.display(), e)))?
    };

    assets
        .write_file(path, &bytes)
        .and_then(|()| assets.import_asset(path))
        .map_err(|e| write_failed(format!("Failed to save texture {}: {}", path.display(), e)))?;

    Ok(hash)
}

fn create_gridbox_material(
    assets: &mut dyn AssetDatabase,
    shaders: &dyn ShaderRegistry,
    config: &GenerationConfig,
    binding: &ShaderBinding,
    texture_path: &Path,
    material_path: &Path,
    name: String,
) -> Result<(), ReportError> {
    let shader = shaders.find(&binding.shader).ok_or_else(|| {
        ReportError::with_path(
            ErrorCode::ShaderNotFound.code(),
            format!(
                "Shader '{}' for pipeline '{}' not found. Ensure the selected render pipeline is installed.",
                binding.shader, config.pipeline
            ),
            asset_path_string(material_path),
        )
    })?;

    let texture = assets.load_texture(texture_path).ok_or_else(|| {
        ReportError::with_path(
            ErrorCode::TextureReloadFailed.code(),
            format!("Failed to load texture at {}", texture_path.display()),
            asset_path_string(texture_path),
        )
    })?;

    let mut material = MaterialAsset::new(name, shader.name);
    material.set_texture(&binding.base_map_slot, asset_path_string(&texture.path));

    assets.create_material(material, material_path).map_err(|e| {
        ReportError::with_path(
            ErrorCode::MaterialWriteFailed.code(),
            format!("Failed to create material {}: {}", material_path.display(), e),
            asset_path_string(material_path),
        )
    })
}

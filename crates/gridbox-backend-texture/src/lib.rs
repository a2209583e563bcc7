//! Gridbox Texture Backend
//!
//! This crate turns a color palette image and an overlay pattern into one
//! square "gridbox" texture and one material per palette color. Output is
//! byte-identical for identical inputs, so re-running a generation rewrites
//! the same files with the same contents.
//!
//! # Features
//!
//! - **Palette sampling**: one color per pixel of the palette's bottom row
//! - **Overlay blending**: the overlay is tiled and blended by its own alpha
//! - **Deterministic PNG**: fixed compression settings for byte-identical output
//! - **Injected collaborators**: asset database and shader registry are traits
//!
//! # Example
//!
//! ```
//! use gridbox_backend_texture::asset::{InstalledShaders, MemoryAssetDatabase};
//! use gridbox_backend_texture::{generate_gridbox_set, Color, PaletteInput, TextureBuffer};
//! use gridbox_spec::GenerationConfig;
//!
//! let mut palette = TextureBuffer::new(2, 1, Color::black());
//! palette.set(0, 0, Color::rgb(1.0, 0.0, 0.0));
//! palette.set(1, 0, Color::rgb(0.0, 0.0, 1.0));
//! let overlay = TextureBuffer::new(1, 1, Color::transparent());
//!
//! let config = GenerationConfig { texture_size: 4, ..GenerationConfig::default() };
//! let shaders = InstalledShaders::from_table(&config.shader_table);
//! let mut assets = MemoryAssetDatabase::new();
//!
//! let report = generate_gridbox_set(
//!     Some(PaletteInput::new("retro", &palette)),
//!     Some(&overlay),
//!     &config,
//!     &mut assets,
//!     &shaders,
//! )
//! .unwrap();
//!
//! assert_eq!(report.textures_written, 2);
//! assert_eq!(report.materials_written, 2);
//! ```

pub mod asset;
pub mod buffer;
pub mod color;
pub mod generate;
pub mod png;

// Re-export main types for convenience
pub use buffer::{PixelSource, TextureBuffer};
pub use color::Color;
pub use generate::{
    blend_gridbox, generate_gridbox_set, gridbox_file_stem, GenerateError, GridboxLayout,
    PaletteInput,
};
pub use png::{PngConfig, PngError};

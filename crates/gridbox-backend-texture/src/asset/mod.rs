//! Asset collaborators used by the generator.
//!
//! The generator never touches the filesystem or an engine directly. It talks
//! to an [`AssetDatabase`] for folders, files, imports and materials, and to a
//! [`ShaderRegistry`] to resolve shader identifiers. Front ends supply real
//! implementations; [`MemoryAssetDatabase`] backs tests.

mod memory;

pub use memory::{AssetEvent, MemoryAssetDatabase};

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use gridbox_spec::{BackendError, MaterialAsset, ShaderTable};

/// Errors raised by asset collaborators.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("asset not found: {0}")]
    NotFound(PathBuf),

    #[error("texture is not readable: {0} (enable read access in its import settings)")]
    NotReadable(PathBuf),

    #[error("failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("failed to serialize {path}: {message}")]
    Serialize { path: PathBuf, message: String },
}

impl AssetError {
    /// Wraps an I/O error with the path it occurred at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AssetError::Io {
            path: path.into(),
            source,
        }
    }
}

impl BackendError for AssetError {
    fn code(&self) -> &'static str {
        match self {
            AssetError::Io { .. } => "ASSET_001",
            AssetError::NotFound(_) => "ASSET_002",
            AssetError::NotReadable(_) => "ASSET_003",
            AssetError::Decode { .. } => "ASSET_004",
            AssetError::Serialize { .. } => "ASSET_005",
        }
    }

    fn category(&self) -> &'static str {
        "asset"
    }
}

/// A texture known to the asset database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureAsset {
    /// Asset path of the texture.
    pub path: PathBuf,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// A resolved shader program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderHandle {
    /// Shader identifier.
    pub name: String,
}

/// Host asset database.
///
/// Paths are asset paths relative to the database root.
pub trait AssetDatabase {
    /// Whether a folder exists at `path`.
    fn is_valid_folder(&self, path: &Path) -> bool;

    /// Creates a folder and any missing parents.
    fn create_folder(&mut self, path: &Path) -> Result<(), AssetError>;

    /// Writes raw bytes to `path`, replacing any existing file. The database
    /// does not know about the file until it is imported.
    fn write_file(&mut self, path: &Path, bytes: &[u8]) -> Result<(), AssetError>;

    /// Imports (or reimports) the file at `path`.
    fn import_asset(&mut self, path: &Path) -> Result<(), AssetError>;

    /// Loads an imported texture, or `None` if it cannot be loaded.
    fn load_texture(&self, path: &Path) -> Option<TextureAsset>;

    /// Creates a material asset at `path`. It may stay pending until
    /// [`AssetDatabase::save_assets`].
    fn create_material(&mut self, material: MaterialAsset, path: &Path) -> Result<(), AssetError>;

    /// Persists pending asset writes.
    fn save_assets(&mut self) -> Result<(), AssetError>;

    /// Rescans files written outside the database's own API.
    fn refresh(&mut self) -> Result<(), AssetError>;
}

/// Resolves shader identifiers to shader programs.
pub trait ShaderRegistry {
    /// Returns the shader, or `None` if it is not registered.
    fn find(&self, shader: &str) -> Option<ShaderHandle>;
}

/// Repairs texture import settings before pixel sampling.
pub trait TextureImporter {
    /// Makes the texture at `path` CPU-readable and disables power-of-two
    /// rescaling. Returns `true` if the settings changed and the texture was
    /// reimported.
    fn ensure_readable_unscaled(&mut self, path: &Path) -> Result<bool, AssetError>;
}

/// A [`ShaderRegistry`] over a fixed set of installed shader identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledShaders {
    shaders: BTreeSet<String>,
}

impl InstalledShaders {
    /// Creates a registry with the given shaders installed.
    pub fn new<I, S>(shaders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            shaders: shaders.into_iter().map(Into::into).collect(),
        }
    }

    /// Installs every shader a table can resolve to.
    pub fn from_table(table: &ShaderTable) -> Self {
        Self::new(table.shaders())
    }

    /// Installed shader identifiers, sorted.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.shaders.iter().map(String::as_str)
    }
}

impl ShaderRegistry for InstalledShaders {
    fn find(&self, shader: &str) -> Option<ShaderHandle> {
        self.shaders.get(shader).map(|name| ShaderHandle { name: name.clone() })
    }
}

/// Renders an asset path with forward slashes, as stored in materials and
/// reports.
pub fn asset_path_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

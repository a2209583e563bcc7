//! Per-image import settings stored as JSON sidecars.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use gridbox_backend_texture::asset::AssetError;

/// Suffix appended to an image path to locate its import settings.
pub const SIDECAR_SUFFIX: &str = ".import.json";

/// How an image with non-power-of-two dimensions is rescaled on import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NpotScale {
    /// Keep the source dimensions.
    None,
    /// Round each dimension to the nearest power of two.
    #[default]
    ToNearest,
    /// Round each dimension up to a power of two.
    ToLarger,
    /// Round each dimension down to a power of two.
    ToSmaller,
}

impl NpotScale {
    /// Target size for one dimension under this mode.
    pub fn scale(self, n: u32) -> u32 {
        if n == 0 || n.is_power_of_two() {
            return n;
        }
        let upper = n.next_power_of_two();
        let lower = upper >> 1;
        match self {
            NpotScale::None => n,
            NpotScale::ToLarger => upper,
            NpotScale::ToSmaller => lower,
            NpotScale::ToNearest => {
                if n - lower < upper - n {
                    lower
                } else {
                    upper
                }
            }
        }
    }
}

/// Import settings for one image.
///
/// A missing sidecar means the host defaults: not CPU-readable, rescaled to
/// the nearest power of two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    pub readable: bool,
    pub npot_scale: NpotScale,
}

impl ImportSettings {
    /// Settings required to sample exact source pixels.
    pub fn readable_unscaled() -> Self {
        Self {
            readable: true,
            npot_scale: NpotScale::None,
        }
    }

    /// Whether pixels can be sampled as stored.
    pub fn is_readable_unscaled(&self) -> bool {
        self.readable && self.npot_scale == NpotScale::None
    }

    /// Reads the sidecar for `image`, falling back to defaults when absent.
    pub fn load(image: &Path) -> Result<Self, AssetError> {
        let path = sidecar_path(image);
        match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).map_err(|e| AssetError::Decode {
                path,
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(AssetError::io(path, e)),
        }
    }

    /// Writes the sidecar for `image`.
    pub fn store(&self, image: &Path) -> Result<(), AssetError> {
        let path = sidecar_path(image);
        let json = serde_json::to_string_pretty(self).map_err(|e| AssetError::Serialize {
            path: path.clone(),
            message: e.to_string(),
        })?;
        fs::write(&path, json).map_err(|e| AssetError::io(path, e))
    }
}

/// `<image>.import.json`
pub fn sidecar_path(image: &Path) -> PathBuf {
    let mut name = OsString::from(image.as_os_str());
    name.push(SIDECAR_SUFFIX);
    PathBuf::from(name)
}

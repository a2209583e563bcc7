//! Material asset description.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A material referencing a shader and a set of textures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialAsset {
    /// Material name (the file stem of the material asset).
    pub name: String,
    /// Shader identifier.
    pub shader: String,
    /// Texture property name to asset path (forward slashes).
    #[serde(default)]
    pub textures: BTreeMap<String, String>,
}

impl MaterialAsset {
    /// Creates a material with no textures assigned.
    pub fn new(name: impl Into<String>, shader: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shader: shader.into(),
            textures: BTreeMap::new(),
        }
    }

    /// Assigns a texture to a property.
    pub fn set_texture(&mut self, slot: impl Into<String>, texture_path: impl Into<String>) {
        self.textures.insert(slot.into(), texture_path.into());
    }

    /// Returns the texture assigned to a property.
    pub fn texture(&self, slot: &str) -> Option<&str> {
        self.textures.get(slot).map(String::as_str)
    }
}

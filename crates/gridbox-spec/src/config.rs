//! Generation configuration and the pipeline to shader lookup table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ConfigError;

/// Default edge length of generated textures, in pixels.
pub const DEFAULT_TEXTURE_SIZE: u32 = 512;

/// Default output root, relative to the project directory.
pub const DEFAULT_OUTPUT_ROOT: &str = "Generated Materials";

/// Target shading system for generated materials.
///
/// Serialized as its lowercase tag. Tags that are not one of the built-in
/// pipelines parse to [`Pipeline::Other`] so that a shader table can map them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Pipeline {
    /// Built-in (legacy) render pipeline.
    Legacy,
    /// Universal render pipeline.
    #[default]
    Urp,
    /// High definition render pipeline.
    Hdrp,
    /// Any other pipeline, identified by its tag.
    Other(String),
}

impl Pipeline {
    /// Returns the lookup tag for this pipeline.
    pub fn tag(&self) -> &str {
        match self {
            Pipeline::Legacy => "birp",
            Pipeline::Urp => "urp",
            Pipeline::Hdrp => "hdrp",
            Pipeline::Other(tag) => tag,
        }
    }
}

impl FromStr for Pipeline {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        Ok(match tag.as_str() {
            "birp" | "legacy" | "builtin" | "standard" => Pipeline::Legacy,
            "urp" => Pipeline::Urp,
            "hdrp" => Pipeline::Hdrp,
            _ => Pipeline::Other(tag),
        })
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl From<String> for Pipeline {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(pipeline) => pipeline,
            Err(never) => match never {},
        }
    }
}

impl Serialize for Pipeline {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for Pipeline {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Pipeline::from(s))
    }
}

/// A shader identifier plus the texture property that receives the
/// generated gridbox texture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderBinding {
    /// Shader identifier as known to the shader registry.
    pub shader: String,
    /// Base color / albedo texture property name.
    pub base_map_slot: String,
}

impl ShaderBinding {
    /// Creates a new binding.
    pub fn new(shader: impl Into<String>, base_map_slot: impl Into<String>) -> Self {
        Self {
            shader: shader.into(),
            base_map_slot: base_map_slot.into(),
        }
    }
}

/// Maps pipeline tags to shader bindings.
///
/// Unknown tags resolve to `fallback`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderTable {
    /// Bindings keyed by pipeline tag.
    pub entries: BTreeMap<String, ShaderBinding>,
    /// Binding used for pipelines without an entry.
    pub fallback: ShaderBinding,
}

impl ShaderTable {
    /// Resolves the binding for a pipeline.
    pub fn resolve(&self, pipeline: &Pipeline) -> &ShaderBinding {
        self.entries.get(pipeline.tag()).unwrap_or(&self.fallback)
    }

    /// Adds or replaces the binding for a pipeline tag.
    pub fn insert(&mut self, tag: impl Into<String>, binding: ShaderBinding) {
        self.entries.insert(tag.into(), binding);
    }

    /// Every distinct shader identifier in the table, fallback included.
    pub fn shaders(&self) -> Vec<&str> {
        let mut shaders: Vec<&str> = self
            .entries
            .values()
            .map(|b| b.shader.as_str())
            .chain(std::iter::once(self.fallback.shader.as_str()))
            .collect();
        shaders.sort_unstable();
        shaders.dedup();
        shaders
    }
}

impl Default for ShaderTable {
    fn default() -> Self {
        let standard = ShaderBinding::new("Standard", "_MainTex");

        let mut entries = BTreeMap::new();
        entries.insert(Pipeline::Legacy.tag().to_string(), standard.clone());
        entries.insert(
            Pipeline::Urp.tag().to_string(),
            ShaderBinding::new("Universal Render Pipeline/Lit", "_BaseMap"),
        );
        entries.insert(
            Pipeline::Hdrp.tag().to_string(),
            ShaderBinding::new("HDRP/Lit", "_BaseColorMap"),
        );

        Self {
            entries,
            fallback: standard,
        }
    }
}

/// Immutable configuration for one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Edge length of each generated square texture, in pixels.
    pub texture_size: u32,
    /// Target pipeline; selects the material shader.
    pub pipeline: Pipeline,
    /// Output root, relative to the asset database root.
    pub output_root: PathBuf,
    /// Pipeline to shader lookup table.
    pub shader_table: ShaderTable,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            texture_size: DEFAULT_TEXTURE_SIZE,
            pipeline: Pipeline::default(),
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            shader_table: ShaderTable::default(),
        }
    }
}

impl GenerationConfig {
    /// The shader binding selected by this configuration's pipeline.
    pub fn shader_binding(&self) -> &ShaderBinding {
        self.shader_table.resolve(&self.pipeline)
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the configuration to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

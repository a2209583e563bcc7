//! Generation config loading.
//!
//! A config file is optional; fields it leaves out take their defaults, and
//! command-line flags override whatever the file says.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use gridbox_spec::{GenerationConfig, Pipeline};

/// Config fields settable from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub texture_size: Option<u32>,
    pub pipeline: Option<String>,
    pub output_root: Option<PathBuf>,
}

impl ConfigOverrides {
    /// Applies every set override to `config`.
    pub fn apply(&self, config: &mut GenerationConfig) {
        if let Some(size) = self.texture_size {
            config.texture_size = size;
        }
        if let Some(tag) = &self.pipeline {
            config.pipeline = Pipeline::from(tag.clone());
        }
        if let Some(root) = &self.output_root {
            config.output_root = root.clone();
        }
    }
}

/// Loads the config at `path` (or defaults) and applies `overrides`.
pub fn load_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<GenerationConfig> {
    let mut config = match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            GenerationConfig::from_json(&json)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        }
        None => GenerationConfig::default(),
    };
    overrides.apply(&mut config);
    log::debug!(
        "Config: size={} pipeline={} output_root={}",
        config.texture_size,
        config.pipeline,
        config.output_root.display()
    );
    Ok(config)
}

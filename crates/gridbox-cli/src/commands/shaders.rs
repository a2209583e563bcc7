//! Shaders command implementation
//!
//! Prints the pipeline to shader table in effect for a config.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use gridbox_spec::GenerationConfig;

use crate::commands::json_output::{ShaderRow, ShadersOutput};
use crate::config::{load_config, ConfigOverrides};

/// Tag shown for the fallback row.
pub const FALLBACK_TAG: &str = "*";

/// Run the shaders command
pub fn run(config: Option<&Path>, overrides: &ConfigOverrides, json_output: bool) -> Result<ExitCode> {
    let config = load_config(config, overrides)?;
    let rows = shader_rows(&config);

    if json_output {
        let output = ShadersOutput {
            pipeline: config.pipeline.to_string(),
            shaders: rows,
        };
        let json = serde_json::to_string_pretty(&output).context("Failed to serialize output")?;
        println!("{}", json);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} {}", "Pipeline:".cyan().bold(), config.pipeline);
    for row in &rows {
        let marker = if row.active { "*".green() } else { " ".normal() };
        println!(
            "  {} {:<8} {} {}",
            marker,
            row.pipeline,
            row.binding.shader.bold(),
            row.binding.base_map_slot.dimmed()
        );
    }
    Ok(ExitCode::SUCCESS)
}

/// One row per table entry, sorted by tag, then the fallback.
pub fn shader_rows(config: &GenerationConfig) -> Vec<ShaderRow> {
    let table = &config.shader_table;
    let tag = config.pipeline.tag();
    let mapped = table.entries.contains_key(tag);

    table
        .entries
        .iter()
        .map(|(pipeline, binding)| ShaderRow {
            pipeline: pipeline.clone(),
            binding: binding.clone(),
            active: pipeline == tag,
        })
        .chain(std::iter::once(ShaderRow {
            pipeline: FALLBACK_TAG.to_string(),
            binding: table.fallback.clone(),
            active: !mapped,
        }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridbox_spec::Pipeline;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_table_marks_urp_active() {
        let rows = shader_rows(&GenerationConfig::default());
        let tags: Vec<&str> = rows.iter().map(|r| r.pipeline.as_str()).collect();
        assert_eq!(tags, vec!["birp", "hdrp", "urp", "*"]);

        let active: Vec<&str> = rows
            .iter()
            .filter(|r| r.active)
            .map(|r| r.pipeline.as_str())
            .collect();
        assert_eq!(active, vec!["urp"]);
    }

    #[test]
    fn unmapped_pipeline_marks_fallback_active() {
        let config = GenerationConfig {
            pipeline: Pipeline::Other("toon".into()),
            ..GenerationConfig::default()
        };
        let rows = shader_rows(&config);
        let last = rows.last().unwrap();
        assert_eq!(last.pipeline, "*");
        assert!(last.active);
        assert_eq!(rows.iter().filter(|r| r.active).count(), 1);
    }
}

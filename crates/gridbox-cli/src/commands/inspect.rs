//! Inspect command implementation
//!
//! Lists the colors a palette image would generate, without touching its
//! import settings or writing anything.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use gridbox_backend_texture::{gridbox_file_stem, PaletteInput, TextureBuffer};
use gridbox_spec::validation::{validate_inputs, InputDimensions};

use crate::commands::json_output::{error_codes, InspectColor, InspectOutput, JsonError, JsonWarning};
use crate::fs_assets::decode_image;

/// Run the inspect command
///
/// # Returns
/// Exit code: 0 success, 1 palette could not be read
pub fn run(palette: &Path, json_output: bool) -> Result<ExitCode> {
    let name = palette
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let image = match decode_image(palette) {
        Ok(image) => image,
        Err(e) if json_output => {
            let error = JsonError::new(error_codes::IMAGE_LOAD, e.to_string())
                .with_path(palette.display().to_string());
            print_json(&InspectOutput::failure(vec![error]))?;
            return Ok(ExitCode::from(1));
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to load palette: {}", palette.display()))
        }
    };

    let colors = palette_colors(&name, &image);
    let validation = validate_inputs(
        Some((name.as_str(), InputDimensions::new(image.width, image.height))),
        Some(InputDimensions::new(1, 1)),
    );

    if json_output {
        let output = InspectOutput {
            success: validation.is_ok(),
            errors: validation.errors.iter().map(JsonError::from).collect(),
            warnings: validation.warnings.iter().map(JsonWarning::from).collect(),
            palette_name: Some(name),
            width: Some(image.width),
            height: Some(image.height),
            colors,
        };
        print_json(&output)?;
    } else {
        println!("{} {}", "Palette:".cyan().bold(), palette.display());
        println!(
            "{} {}x{}, {} color(s)",
            "Size:".dimmed(),
            image.width,
            image.height,
            colors.len()
        );
        for warning in &validation.warnings {
            println!("  {} [{}]: {}", "!".yellow(), warning.code.to_string().yellow(), warning.message);
        }
        for error in &validation.errors {
            println!("  {} [{}]: {}", "x".red(), error.code.to_string().red(), error.message);
        }
        println!();
        for color in &colors {
            let [r, g, b, a] = color.rgba;
            println!(
                "  {:>3}  {}  {}",
                color.index,
                color.hex.bold(),
                format!("rgba({}, {}, {}, {})  {}", r, g, b, a, color.file_stem).dimmed()
            );
        }
    }

    Ok(if validation.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

/// Palette colors in generation order, with the file stem each produces.
pub fn palette_colors(name: &str, image: &TextureBuffer) -> Vec<InspectColor> {
    PaletteInput::new(name, image)
        .colors()
        .enumerate()
        .map(|(index, color)| {
            let hex = color.to_hex();
            InspectColor {
                index: index as u32,
                file_stem: gridbox_file_stem(&hex, name),
                rgba: color.to_rgba8(),
                hex,
            }
        })
        .collect()
}

fn print_json(output: &InspectOutput) -> Result<()> {
    let json = serde_json::to_string_pretty(output).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

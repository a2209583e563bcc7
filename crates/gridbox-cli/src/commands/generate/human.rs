//! Human-readable (colored) output mode for the generate command.

use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;

use super::{execute, write_report, GenerateOptions};

/// Run generate with human-readable (colored) output.
pub fn run_human(options: &GenerateOptions) -> Result<ExitCode> {
    println!("{} {}", "Generating from:".cyan().bold(), options.palette.display());
    println!("{} {}", "Overlay:".cyan().bold(), options.overlay.display());
    println!("{} {}", "Project:".cyan().bold(), options.project.display());

    let exec = execute(options);

    if let Some(config) = &exec.config {
        println!(
            "{} {} ({}, {}px)",
            "Pipeline:".dimmed(),
            config.pipeline,
            config.shader_binding().shader,
            config.texture_size
        );
    }

    for path in &exec.repaired {
        println!("  {} Updated import settings: {}", "~".cyan(), path);
    }

    if let Some(report) = &exec.report {
        if !report.warnings.is_empty() {
            println!("\n{}", "Warnings:".yellow().bold());
            for warning in &report.warnings {
                println!("  {} [{}]: {}", "!".yellow(), warning.code.yellow(), warning.message);
            }
        }

        if !report.entries.is_empty() {
            println!("\n{}", "Outputs:".cyan().bold());
        }
        for entry in &report.entries {
            match &entry.material_path {
                Some(material) => println!(
                    "  {} {} {} {}",
                    "+".green(),
                    entry.hex.bold(),
                    entry.texture_path,
                    material.dimmed()
                ),
                None => println!(
                    "  {} {} {} {}",
                    "!".yellow(),
                    entry.hex.bold(),
                    entry.texture_path,
                    "(no material)".yellow()
                ),
            }
        }

        if !report.errors.is_empty() {
            println!("\n{}", "Errors:".red().bold());
            for error in &report.errors {
                println!("  {} [{}]: {}", "x".red(), error.code.red(), error.message);
            }
        }
    }

    for error in exec.errors.iter().filter(|e| !e.code.starts_with('E')) {
        let location = error
            .path
            .as_ref()
            .map(|p| format!(" ({})", p))
            .unwrap_or_default();
        println!("  {} [{}]: {}{}", "x".red(), error.code.red(), error.message, location.dimmed());
    }

    if let (Some(report), Some(path)) = (&exec.report, &options.report) {
        write_report(report, path)?;
    }

    let code = exec.exit_code();
    match (&exec.report, exec.errors.is_empty()) {
        (Some(report), true) if report.ok => println!(
            "\n{} Generated {} texture(s) and {} material(s) in {}ms",
            "SUCCESS".green().bold(),
            report.textures_written,
            report.materials_written,
            report.duration_ms
        ),
        (Some(report), true) => println!(
            "\n{} Generated {} texture(s) and {} of {} material(s) with {} error(s)",
            "PARTIAL".yellow().bold(),
            report.textures_written,
            report.materials_written,
            report.color_count,
            report.errors.len()
        ),
        _ => println!(
            "\n{} Generation failed with {} error(s)",
            "FAILED".red().bold(),
            exec.errors.len()
        ),
    }

    if let (Some(_), Some(path)) = (&exec.report, &options.report) {
        println!("{} {}", "Report written to:".dimmed(), path.display());
    }

    Ok(code)
}

//! Gridbox CLI - palette gridbox material generation
//!
//! This binary turns a palette image and an overlay pattern into one
//! texture and one material per palette color.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use gridbox_cli::commands;
use gridbox_cli::commands::generate::GenerateOptions;
use gridbox_cli::config::ConfigOverrides;

/// Gridbox - Palette Gridbox Material Generator
#[derive(Parser)]
#[command(name = "gridbox")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one gridbox texture and material per palette color
    Generate {
        /// Palette image (relative to the project, or absolute inside it)
        #[arg(short, long)]
        palette: PathBuf,

        /// Overlay pattern image (relative to the project, or absolute inside it)
        #[arg(short, long)]
        overlay: PathBuf,

        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Edge length of each generated texture in pixels
        #[arg(short, long)]
        size: Option<u32>,

        /// Render pipeline tag (birp, urp, hdrp, or a custom tag)
        #[arg(long)]
        pipeline: Option<String>,

        /// Project directory the asset database is rooted at
        #[arg(long, default_value = ".")]
        project: PathBuf,

        /// Output root relative to the project
        #[arg(long)]
        out_root: Option<PathBuf>,

        /// Installed shader identifier (repeatable; default: every shader in the table)
        #[arg(long = "installed-shader")]
        installed_shaders: Vec<String>,

        /// Write the run report to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// List the colors a palette would generate
    Inspect {
        /// Palette image
        #[arg(short, long)]
        palette: PathBuf,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Print the pipeline to shader table in effect
    Shaders {
        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Render pipeline tag to mark as active
        #[arg(long)]
        pipeline: Option<String>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Generate {
            palette,
            overlay,
            config,
            size,
            pipeline,
            project,
            out_root,
            installed_shaders,
            report,
            json,
        } => {
            let options = GenerateOptions {
                palette,
                overlay,
                config,
                overrides: ConfigOverrides {
                    texture_size: size,
                    pipeline,
                    output_root: out_root,
                },
                project,
                installed_shaders,
                report,
            };
            commands::generate::run(&options, json)
        }
        Commands::Inspect { palette, json } => commands::inspect::run(&palette, json),
        Commands::Shaders {
            config,
            pipeline,
            json,
        } => {
            let overrides = ConfigOverrides {
                pipeline,
                ..ConfigOverrides::default()
            };
            commands::shaders::run(config.as_deref(), &overrides, json)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

//! JSON output mode for the generate command.

use anyhow::{Context, Result};
use std::process::ExitCode;

use super::{execute, write_report, GenerateOptions};
use crate::commands::json_output::{GenerateOutput, JsonError, JsonWarning};

/// Run generate with machine-readable JSON output.
pub fn run_json(options: &GenerateOptions) -> Result<ExitCode> {
    let exec = execute(options);
    let code = exec.exit_code();

    let report_path = match (&exec.report, &options.report) {
        (Some(report), Some(path)) => {
            write_report(report, path)?;
            Some(path.display().to_string())
        }
        _ => None,
    };

    let mut errors = exec.errors;
    let mut warnings = Vec::new();
    if let Some(report) = &exec.report {
        // Precondition errors already appear in `errors`.
        if errors.is_empty() {
            errors.extend(report.errors.iter().map(JsonError::from));
        }
        warnings.extend(report.warnings.iter().map(JsonWarning::from));
    }

    let output = GenerateOutput {
        success: errors.is_empty(),
        errors,
        warnings,
        repaired_inputs: exec.repaired,
        report: exec.report,
        report_path,
    };

    let json = serde_json::to_string_pretty(&output).context("Failed to serialize output")?;
    println!("{}", json);

    Ok(code)
}

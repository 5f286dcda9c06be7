//! Safety checks that keep the report writer away from the input data.

use std::path::{Path, PathBuf};

use crate::error::{AnalysisError, Result};

/// Extension the report file must carry
pub const REPORT_EXTENSION: &str = "json";

/// Validates that an output path is safe to overwrite.
///
/// Checks:
/// - Output must have a `.json` extension (the inputs are CSV)
/// - Output cannot be the same file as any of the inputs
pub fn validate_output_path(output: &Path, inputs: &[&Path]) -> Result<()> {
    let has_extension = output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(REPORT_EXTENSION));
    if !has_extension {
        return Err(unsafe_output(
            output,
            format!("output must have a .{} extension", REPORT_EXTENSION),
        ));
    }

    for input in inputs {
        if same_file(output, input) {
            return Err(unsafe_output(
                output,
                format!("output cannot be the same as input '{}'", input.display()),
            ));
        }
    }

    Ok(())
}

/// Validates every output file of a run (report, stats) against the inputs,
/// and against each other.
pub fn validate_output_paths(outputs: &[&Path], inputs: &[&Path]) -> Result<()> {
    for (i, output) in outputs.iter().enumerate() {
        validate_output_path(output, inputs)?;
        if outputs[..i].iter().any(|earlier| same_file(output, earlier)) {
            return Err(unsafe_output(
                output,
                "output is written twice in one run".to_string(),
            ));
        }
    }
    Ok(())
}

fn unsafe_output(path: &Path, reason: String) -> AnalysisError {
    AnalysisError::UnsafeOutput {
        path: path.to_path_buf(),
        reason,
    }
}

/// Path equality, resolving both sides when they exist on disk
fn same_file(a: &Path, b: &Path) -> bool {
    let resolve = |p: &Path| -> PathBuf { p.canonicalize().unwrap_or_else(|_| p.to_path_buf()) };
    a == b || resolve(a) == resolve(b)
}

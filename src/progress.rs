//! Progress spinners and phase logging.
//!
//! Input sizes are not known before a CSV is read, so phases report with
//! spinners and row counters. In log-only mode spinners are hidden and
//! counters are printed to stderr instead, which keeps output tail-friendly.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Global flag for log-only mode (set from args in main)
pub static LOG_ONLY: AtomicBool = AtomicBool::new(false);

/// Rows between two log lines while reading in log-only mode
pub const LOG_INTERVAL: u64 = 1_000_000;

pub fn set_log_only(value: bool) {
    LOG_ONLY.store(value, Ordering::Relaxed);
}

pub fn is_log_only() -> bool {
    LOG_ONLY.load(Ordering::Relaxed)
}

/// Format duration in human-readable format
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}

/// Spinner with a running row counter, for phases of unknown length.
/// In log-only mode the spinner is hidden.
pub fn create_row_counter(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if is_log_only() {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    } else {
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{msg} {spinner} {pos} rows [{elapsed_precise}] ({per_sec})")
                .unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
    }
    pb.set_message(msg.to_string());
    pb
}

/// Log row counts periodically while a phase runs in log-only mode.
pub fn log_rows(phase: &str, rows: u64) {
    if is_log_only() && rows > 0 && rows % LOG_INTERVAL == 0 {
        eprintln!("[{}] {} rows", phase, rows);
    }
}

/// Close a phase: finish the spinner and echo the message in log-only mode.
pub fn finish_phase(pb: &ProgressBar, msg: String) {
    if is_log_only() {
        eprintln!("{}", msg);
    }
    pb.finish_with_message(msg);
}

/// Spinner for indeterminate work.
/// In log-only mode the spinner is hidden.
pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if is_log_only() {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    } else {
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{msg} {spinner} [{elapsed_precise}]")
                .unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
    }
    pb.set_message(msg.to_string());
    pb
}

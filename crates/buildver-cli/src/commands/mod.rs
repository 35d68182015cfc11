pub mod completions;
pub mod extract;
pub mod man_pages;
pub mod normalize;
pub mod resolve;
pub mod run;
pub mod verify;

use buildver_schema::ValueSource;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_MANIFEST_ERROR: u8 = 2;
pub const EXIT_DESCRIPTOR_ERROR: u8 = 3;
pub const EXIT_DRIFT: u8 = 4;

/// Map an error message to its exit code by the prefix the error types print.
///
/// A record file that cannot be read, parsed or written is a plain failure;
/// only drift and tampering map to [`EXIT_DRIFT`].
pub fn exit_code_for(msg: &str) -> u8 {
    if msg.starts_with("manifest error:") || msg.starts_with("config error:") {
        EXIT_MANIFEST_ERROR
    } else if msg.starts_with("descriptor error:") {
        EXIT_DESCRIPTOR_ERROR
    } else if msg.starts_with("record error: record file") {
        EXIT_FAILURE
    } else if msg.starts_with("record error:") {
        EXIT_DRIFT
    } else {
        EXIT_FAILURE
    }
}

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .expect("valid template")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(msg.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn spin_ok(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✓ {msg}"));
}

pub fn spin_fail(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✗ {msg}"));
}

pub fn colorize_source(source: ValueSource) -> String {
    use console::Style;
    let label = source.to_string();
    match source {
        ValueSource::Manifest => Style::new().dim().apply_to(label).to_string(),
        ValueSource::Environment => Style::new().yellow().bold().apply_to(label).to_string(),
    }
}

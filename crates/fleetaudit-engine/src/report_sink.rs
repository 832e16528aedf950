//! Report persistence

use fleetaudit_core::{Report, Result};
use std::path::{Path, PathBuf};

/// Writes the report as pretty-printed JSON under the report directory,
/// creating it on demand. Returns the path written.
pub fn write_report(report_dir: &Path, report: &Report) -> Result<PathBuf> {
    std::fs::create_dir_all(report_dir)?;
    let path = report_dir.join(format!(
        "fleetaudit_report_{}.json",
        report.timestamp.format("%Y%m%d%H%M%S")
    ));
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    std::fs::write(&path, json)?;
    Ok(path)
}

/// Prints the full report to stdout as pretty-printed JSON.
pub fn echo_report(report: &Report) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

//! Tracing setup and the per-control log file sink

use chrono::{DateTime, SecondsFormat, Utc};
use fleetaudit_core::ControlLog;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the global tracing subscriber. Diagnostics go to stderr so
/// stdout stays reserved for verdict lines and `--json` report output;
/// `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer()
        .compact()
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Append-only log artifact for one control invocation.
///
/// One file per control per run, named
/// `fleetaudit_<control-id>_<YYYYMMDDHHMMSS>.log`, lines formatted as
/// `[INFO|ERROR] <RFC3339 UTC> <message>`.
pub struct FileControlLog {
    file: Mutex<File>,
    path: PathBuf,
}

impl FileControlLog {
    /// Creates the log directory and opens the artifact file for appending.
    pub fn create(log_dir: &Path, control_id: &str, at: DateTime<Utc>) -> std::io::Result<Self> {
        std::fs::create_dir_all(log_dir)?;
        let path = log_dir.join(format!(
            "fleetaudit_{}_{}.log",
            sanitize_file_component(control_id),
            at.format("%Y%m%d%H%M%S")
        ));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            file: Mutex::new(file),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(&self, level: &str, msg: &str) {
        let line = format!(
            "[{}] {} {}\n",
            level,
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            msg
        );
        if let Ok(mut file) = self.file.lock() {
            // A failed log write must never fail the control run.
            let _ = file.write_all(line.as_bytes());
        }
    }
}

impl ControlLog for FileControlLog {
    fn info(&self, msg: &str) {
        self.write_line("INFO", msg);
    }

    fn error(&self, msg: &str) {
        self.write_line("ERROR", msg);
    }
}

/// Maps any character outside `[A-Za-z0-9._-]` to `_` so control ids are safe
/// to embed in file names.
pub fn sanitize_file_component(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '_' | '-' => c,
            _ => '_',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizer_preserves_safe_chars() {
        assert_eq!(sanitize_file_component("2.1.4"), "2.1.4");
        assert_eq!(sanitize_file_component("a-b_C.9"), "a-b_C.9");
    }

    #[test]
    fn sanitizer_replaces_everything_else() {
        assert_eq!(sanitize_file_component("env:demo/x y"), "env_demo_x_y");
    }

    #[test]
    fn log_lines_carry_level_and_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let log = FileControlLog::create(dir.path(), "2.1.1", Utc::now()).unwrap();
        log.info("START 2.1.1");
        log.error("FAIL 2.1.1");

        let content = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[INFO] "));
        assert!(lines[0].ends_with(" START 2.1.1"));
        assert!(lines[1].starts_with("[ERROR] "));
    }

    #[test]
    fn file_name_embeds_sanitized_id_and_stamp() {
        let dir = tempfile::tempdir().unwrap();
        let at = DateTime::parse_from_rfc3339("2026-08-25T12:34:56Z")
            .unwrap()
            .with_timezone(&Utc);
        let log = FileControlLog::create(dir.path(), "2.1.6", at).unwrap();
        let name = log.path().file_name().unwrap().to_str().unwrap();
        assert_eq!(name, "fleetaudit_2.1.6_20260825123456.log");
    }
}

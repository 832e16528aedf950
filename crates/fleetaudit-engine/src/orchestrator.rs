//! Sequential control runner with per-control isolation

use chrono::Utc;
use fleetaudit_common::{FileControlLog, RunConfig};
use fleetaudit_core::{
    Control, ControlLog, ControlResult, Deps, Error, Finding, Inventory, NoopLog, RemoteExec,
    Report, Result,
};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Runs the selected controls one after another and assembles the report.
///
/// One control's invocation failure never stops the run; it is recorded as a
/// failing result with a synthetic finding and the loop moves on.
/// Cancellation is checked around each control: the control being cancelled
/// records a failure and no further controls start.
pub struct Orchestrator<'a> {
    cfg: &'a RunConfig,
    inventory: &'a dyn Inventory,
    remote: &'a dyn RemoteExec,
}

/// Narrows the registered controls to the requested ids, keeping registration
/// order. `None` keeps everything; a selection that names no valid id, or
/// matches nothing, is a configuration error.
pub fn select_controls(
    controls: Vec<Box<dyn Control>>,
    wanted: Option<&[String]>,
) -> Result<Vec<Box<dyn Control>>> {
    let Some(wanted) = wanted else {
        return Ok(controls);
    };
    let wanted: Vec<&str> = wanted
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if wanted.is_empty() {
        return Err(Error::Configuration("no control ids given".into()));
    }

    let selected: Vec<Box<dyn Control>> = controls
        .into_iter()
        .filter(|c| wanted.contains(&c.id()))
        .collect();
    if selected.is_empty() {
        return Err(Error::Configuration(format!(
            "no controls matched: {}",
            wanted.join(",")
        )));
    }
    Ok(selected)
}

/// Creates the log and report directories before any control runs. An
/// uncreatable directory is a setup failure for the whole run, not something
/// to discover control by control.
pub fn prepare_run_dirs(cfg: &RunConfig) -> Result<()> {
    for dir in [&cfg.log_dir, &cfg.report_dir] {
        std::fs::create_dir_all(dir).map_err(|e| {
            Error::Configuration(format!("failed to create {}: {e}", dir.display()))
        })?;
    }
    Ok(())
}

impl<'a> Orchestrator<'a> {
    pub fn new(cfg: &'a RunConfig, inventory: &'a dyn Inventory, remote: &'a dyn RemoteExec) -> Self {
        Self {
            cfg,
            inventory,
            remote,
        }
    }

    pub async fn run(&self, controls: &[Box<dyn Control>], cancel: &CancellationToken) -> Report {
        let mut results = Vec::with_capacity(controls.len());
        for c in controls {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => self.cancelled_result(c.as_ref()),
                r = self.run_one(c.as_ref()) => r,
            };
            results.push(result);
            if cancel.is_cancelled() {
                break;
            }
        }
        Report::new(
            self.cfg.env_tag.clone(),
            self.cfg.root_dir.display().to_string(),
            results,
        )
    }

    async fn run_one(&self, c: &dyn Control) -> ControlResult {
        let started_at = Utc::now();

        // A log sink that cannot be opened degrades to the no-op sink; the
        // control still runs, the result just has no log artifact.
        let mut log_path = String::new();
        let log: Box<dyn ControlLog> =
            match FileControlLog::create(&self.cfg.log_dir, c.id(), started_at) {
                Ok(l) => {
                    log_path = l.path().display().to_string();
                    Box::new(l)
                }
                Err(e) => {
                    warn!(control = c.id(), error = %e, "control log unavailable");
                    Box::new(NoopLog)
                }
            };

        log.info(&format!(
            "START {} - {} (env_tag={})",
            c.id(),
            c.title(),
            self.cfg.env_tag
        ));
        println!("[{}] {} ...", c.id(), c.title());

        let deps = Deps {
            env_tag: &self.cfg.env_tag,
            inventory: self.inventory,
            remote: self.remote,
            log: log.as_ref(),
        };
        let run = c.run(&deps).await;
        let finished_at = Utc::now();

        // Standing notes are seeded from the control so they survive an
        // invocation error; a successful outcome overwrites them.
        let mut result = ControlResult {
            control_id: c.id().to_string(),
            title: c.title().to_string(),
            pass: false,
            error: String::new(),
            notes: c.notes().to_string(),
            log_path,
            started_at,
            finished_at,
            findings: vec![],
        };

        match run {
            Ok(outcome) => {
                result.notes = outcome.notes;
                result.findings = outcome.findings;
                result.pass = result.findings.iter().all(|f| f.pass);
            }
            Err(e) => {
                result.error = e.to_string();
                result.findings.push(Finding::failure("control", e.to_string()));
            }
        }

        if result.pass {
            log.info(&format!("PASS {}", c.id()));
        } else {
            log.error(&format!("FAIL {}", c.id()));
        }
        log.info(&format!(
            "END {} duration={}ms",
            c.id(),
            (finished_at - started_at).num_milliseconds()
        ));

        print_verdict(&result);
        result
    }

    fn cancelled_result(&self, c: &dyn Control) -> ControlResult {
        let now = Utc::now();
        let error = Error::Cancelled.to_string();
        ControlResult {
            control_id: c.id().to_string(),
            title: c.title().to_string(),
            pass: false,
            error: error.clone(),
            notes: c.notes().to_string(),
            log_path: String::new(),
            started_at: now,
            finished_at: now,
            findings: vec![Finding::failure("control", error)],
        }
    }
}

/// Streams the verdict to stdout, capping inline failures at five.
fn print_verdict(result: &ControlResult) {
    if result.pass {
        println!("  PASS [{}]", result.control_id);
        return;
    }
    println!("  FAIL [{}]", result.control_id);
    let mut shown = 0;
    for f in result.findings.iter().filter(|f| !f.pass) {
        shown += 1;
        if shown > 5 {
            println!("  ... and more (see {})", result.log_path);
            break;
        }
        if f.resource_name.is_empty() {
            println!("  - {}", f.reason);
        } else {
            println!("  - {}: {}", f.resource_name, f.reason);
        }
    }
}

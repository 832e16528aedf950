//! Run report model - the persisted record of one audit run

use crate::finding::Finding;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of the tool that produced a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

impl Default for ToolInfo {
    fn default() -> Self {
        Self {
            name: "fleetaudit".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

/// The record of one control invocation inside a run.
///
/// `pass` is the control verdict: true only when the invocation succeeded and
/// every finding passed. `error` is set only for invocation failures, in
/// which case `findings` carries a synthetic failing finding so the failure
/// survives summary recomputation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlResult {
    pub control_id: String,
    pub title: String,
    pub pass: bool,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,

    /// Path of the per-control log artifact, empty when the sink could not
    /// be opened.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub log_path: String,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub findings: Vec<Finding>,
}

impl ControlResult {
    /// True when the invocation succeeded and no finding failed.
    pub fn all_pass(&self) -> bool {
        self.error.is_empty() && self.findings.iter().all(|f| f.pass)
    }
}

/// Pass/fail tally over a result set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub pass: usize,
    pub fail: usize,
}

impl Summary {
    /// Recomputed from the results rather than tracked incrementally, so the
    /// tally can never drift from the result list it summarizes.
    pub fn from_results(results: &[ControlResult]) -> Self {
        let pass = results.iter().filter(|r| r.pass).count();
        Self {
            total: results.len(),
            pass,
            fail: results.len() - pass,
        }
    }
}

/// The full run report as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub timestamp: DateTime<Utc>,
    pub env_tag: String,
    pub root_dir: String,
    pub tool: ToolInfo,
    pub summary: Summary,
    pub results: Vec<ControlResult>,
}

impl Report {
    pub fn new(env_tag: impl Into<String>, root_dir: impl Into<String>, results: Vec<ControlResult>) -> Self {
        Self {
            timestamp: Utc::now(),
            env_tag: env_tag.into(),
            root_dir: root_dir.into(),
            tool: ToolInfo::default(),
            summary: Summary::from_results(&results),
            results,
        }
    }
}

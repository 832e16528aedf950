//! Control trait and the dependency seams controls run against

use crate::error::Result;
use crate::finding::Finding;
use crate::resource::{Droplet, Firewall};
use async_trait::async_trait;

/// The result a control returns on success: an ordered set of per-resource
/// findings plus an optional free-text note.
#[derive(Debug, Clone, Default)]
pub struct ControlOutcome {
    pub notes: String,
    pub findings: Vec<Finding>,
}

/// One compliance rule.
///
/// The implementor set is closed and registered in a fixed order; the id
/// string is the control's identity and must be unique across the registered
/// set. A run either yields findings (compliance verdicts, including
/// failures) or errors (the invocation itself broke, e.g. the inventory API
/// was unreachable).
#[async_trait]
pub trait Control: Send + Sync {
    /// Stable identifier, e.g. "2.1.1".
    fn id(&self) -> &str;

    /// Human-readable title.
    fn title(&self) -> &str;

    /// Standing note attached to every result of this control, kept even
    /// when the invocation fails partway. Empty for most controls.
    fn notes(&self) -> &str {
        ""
    }

    /// Evaluates the rule against live infrastructure.
    async fn run(&self, deps: &Deps<'_>) -> Result<ControlOutcome>;
}

/// Read-only listing of fleet resources, paginated to exhaustion by the
/// implementation.
#[async_trait]
pub trait Inventory: Send + Sync {
    async fn list_droplets_by_tag(&self, tag: &str) -> Result<Vec<Droplet>>;
    async fn list_firewalls(&self) -> Result<Vec<Firewall>>;
}

/// Authenticated execution of a single command on a target host. Returns the
/// trimmed combined stdout+stderr; the remote exit status is not inspected.
#[async_trait]
pub trait RemoteExec: Send + Sync {
    async fn run_command(&self, ip: &str, cmd: &str) -> Result<String>;
}

/// Per-control log artifact sink. Every call site logs unconditionally; a
/// sink that could not be opened is replaced by [`NoopLog`] rather than a
/// missing handle.
pub trait ControlLog: Send + Sync {
    fn info(&self, msg: &str);
    fn error(&self, msg: &str);
}

/// Sink that drops every line.
pub struct NoopLog;

impl ControlLog for NoopLog {
    fn info(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
}

/// Shared dependencies handed to a control for a single invocation. Controls
/// borrow this bundle for the duration of `run` and must not retain it.
pub struct Deps<'a> {
    /// Tag scoping which fleet resources this run evaluates.
    pub env_tag: &'a str,
    pub inventory: &'a dyn Inventory,
    pub remote: &'a dyn RemoteExec,
    pub log: &'a dyn ControlLog,
}

//! Finding definitions - per-resource verdicts produced by controls

use crate::resource::Droplet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One verdict about one resource under one control.
///
/// Immutable once produced; a failing finding must carry a reason. Optional
/// fields are omitted from the serialized form entirely rather than emitted
/// as nulls or empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Resource kind tag, e.g. "droplet", or "control" for synthetic
    /// invocation-failure findings.
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource_id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource_name: String,

    /// Public IPv4 address, empty when the resource has none.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ip: String,

    pub pass: bool,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,

    /// Raw probe outputs keyed by probe name, kept for audit/debugging.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub evidence: BTreeMap<String, String>,
}

impl Finding {
    /// Passing verdict skeleton for a fleet droplet; callers flip it to a
    /// failure with [`Finding::fail`].
    pub fn droplet(d: &Droplet) -> Self {
        Self {
            resource_type: "droplet".into(),
            resource_id: d.id.to_string(),
            resource_name: d.name.clone(),
            ip: d.public_ipv4().unwrap_or_default().to_string(),
            pass: true,
            reason: String::new(),
            evidence: BTreeMap::new(),
        }
    }

    /// Failing verdict with no concrete resource attached, e.g. the
    /// "no droplets found" compliance state or a synthetic control-error
    /// finding.
    pub fn failure(resource_type: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            resource_id: String::new(),
            resource_name: String::new(),
            ip: String::new(),
            pass: false,
            reason: reason.into(),
            evidence: BTreeMap::new(),
        }
    }

    /// Marks the finding failed with the given reason.
    pub fn fail(mut self, reason: impl Into<String>) -> Self {
        self.pass = false;
        self.reason = reason.into();
        self
    }

    /// Records one raw probe output in the evidence bag.
    pub fn evidence(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.evidence.insert(key.into(), value.into());
        self
    }
}

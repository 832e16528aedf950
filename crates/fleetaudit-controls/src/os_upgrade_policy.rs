//! 2.1.4 - unattended-upgrades installed and enabled

use crate::probes;
use async_trait::async_trait;
use fleetaudit_core::{Control, ControlOutcome, Deps, Finding, Result};

pub struct OsUpgradePolicy;

#[async_trait]
impl Control for OsUpgradePolicy {
    fn id(&self) -> &str {
        "2.1.4"
    }

    fn title(&self) -> &str {
        "Ensure OS Upgrade Policy (unattended-upgrades enabled)"
    }

    fn notes(&self) -> &str {
        "Manual evidence of major/minor upgrade policy may still be required."
    }

    async fn run(&self, deps: &Deps<'_>) -> Result<ControlOutcome> {
        let mut out = ControlOutcome {
            notes: self.notes().into(),
            ..Default::default()
        };

        let droplets = deps.inventory.list_droplets_by_tag(deps.env_tag).await?;
        if droplets.is_empty() {
            out.findings.push(probes::no_droplets(deps.env_tag));
            return Ok(out);
        }

        for d in &droplets {
            let Some(ip) = d.public_ipv4() else {
                out.findings
                    .push(Finding::droplet(d).fail("No public IPv4 address"));
                continue;
            };

            let pkg = match probes::probe(deps, ip, probes::PKG_UNATTENDED_UPGRADES).await {
                Ok(v) => v,
                Err(e) => {
                    out.findings
                        .push(Finding::droplet(d).fail(probes::ssh_unreachable(&e)));
                    continue;
                }
            };
            let enabled = match probes::probe(deps, ip, probes::APT_UNATTENDED_UPGRADE).await {
                Ok(v) => v,
                Err(e) => {
                    out.findings
                        .push(Finding::droplet(d).fail(probes::ssh_command_failed(&e)));
                    continue;
                }
            };

            let mut reasons = Vec::new();
            if pkg != "yes" {
                reasons.push("unattended-upgrades not installed");
            }
            if enabled != "yes" {
                reasons.push("unattended-upgrades not enabled");
            }

            let mut f = Finding::droplet(d)
                .evidence("pkg_installed", &pkg)
                .evidence("enabled", &enabled);
            if reasons.is_empty() {
                deps.log
                    .info(&format!("{}: unattended-upgrades installed+enabled", d.name));
            } else {
                let reason = reasons.join("; ");
                deps.log.error(&format!("{}: {}", d.name, reason));
                f = f.fail(reason);
            }
            out.findings.push(f);
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{deps, droplet, FakeInventory, ScriptedRemote, NOOP};

    fn fleet() -> FakeInventory {
        FakeInventory {
            droplets: vec![droplet(1, "web-1", &[], Some("203.0.113.1"), None)],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn both_probes_yes_passes() {
        let inv = fleet();
        let remote = ScriptedRemote::default();
        let out = OsUpgradePolicy
            .run(&deps(&inv, &remote, &NOOP))
            .await
            .unwrap();
        let f = &out.findings[0];
        assert!(f.pass);
        assert_eq!(f.evidence["pkg_installed"], "yes");
        assert_eq!(f.evidence["enabled"], "yes");
        assert_eq!(
            out.notes,
            "Manual evidence of major/minor upgrade policy may still be required."
        );
    }

    #[tokio::test]
    async fn missing_package_and_config_join_reasons() {
        let inv = fleet();
        let remote = ScriptedRemote::default()
            .on("dpkg -s unattended-upgrades", "no")
            .on("Unattended-Upgrade", "no");
        let out = OsUpgradePolicy
            .run(&deps(&inv, &remote, &NOOP))
            .await
            .unwrap();
        assert_eq!(
            out.findings[0].reason,
            "unattended-upgrades not installed; unattended-upgrades not enabled"
        );
    }

    #[tokio::test]
    async fn unreachable_host_aborts_resource() {
        let inv = fleet();
        let remote = ScriptedRemote::default().fail("dpkg -s unattended-upgrades", "connect timed out");
        let out = OsUpgradePolicy
            .run(&deps(&inv, &remote, &NOOP))
            .await
            .unwrap();
        let f = &out.findings[0];
        assert!(!f.pass);
        assert_eq!(f.reason, "SSH unreachable: connect timed out");
        assert!(f.evidence.is_empty());
    }

    #[tokio::test]
    async fn second_probe_failure_reports_command_failure() {
        let inv = fleet();
        let remote = ScriptedRemote::default().fail("Unattended-Upgrade", "channel closed");
        let out = OsUpgradePolicy
            .run(&deps(&inv, &remote, &NOOP))
            .await
            .unwrap();
        assert_eq!(out.findings[0].reason, "SSH command failed: channel closed");
    }

    #[tokio::test]
    async fn droplet_without_public_ip_is_not_probed() {
        let inv = FakeInventory {
            droplets: vec![droplet(1, "internal-1", &[], None, None)],
            ..Default::default()
        };
        let remote = ScriptedRemote::default();
        let out = OsUpgradePolicy
            .run(&deps(&inv, &remote, &NOOP))
            .await
            .unwrap();
        assert_eq!(out.findings[0].reason, "No public IPv4 address");
    }
}

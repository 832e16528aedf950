//! 2.1.5 - periodic security updates

use crate::probes;
use async_trait::async_trait;
use fleetaudit_core::{Control, ControlOutcome, Deps, Finding, Result};

pub struct PeriodicSecurityUpdates;

#[async_trait]
impl Control for PeriodicSecurityUpdates {
    fn id(&self) -> &str {
        "2.1.5"
    }

    fn title(&self) -> &str {
        "Ensure Periodic Security Updates are Configured"
    }

    async fn run(&self, deps: &Deps<'_>) -> Result<ControlOutcome> {
        let mut out = ControlOutcome::default();

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

            // The first probe doubles as the reachability check; once it
            // answers, later probe failures degrade to a failing answer
            // instead of aborting the droplet.
            let pkg = match probes::probe(deps, ip, probes::PKG_UNATTENDED_UPGRADES).await {
                Ok(v) => v,
                Err(e) => {
                    out.findings
                        .push(Finding::droplet(d).fail(probes::ssh_unreachable(&e)));
                    continue;
                }
            };
            let update_lists = probes::probe_lenient(deps, ip, probes::APT_UPDATE_PACKAGE_LISTS).await;
            let unattended = probes::probe_lenient(deps, ip, probes::APT_UNATTENDED_UPGRADE).await;
            let timers_enabled = probes::probe_lenient(deps, ip, probes::APT_TIMERS_ENABLED).await;
            let timers_active = probes::probe_lenient(deps, ip, probes::APT_TIMERS_ACTIVE).await;

            let mut reasons = Vec::new();
            if pkg != "yes" {
                reasons.push("unattended-upgrades not installed");
            }
            if update_lists != "yes" {
                reasons.push("Update-Package-Lists not enabled");
            }
            if unattended != "yes" {
                reasons.push("Unattended-Upgrade not enabled");
            }
            if timers_enabled != "yes" {
                reasons.push("apt-daily timers not enabled");
            }
            if timers_active != "yes" {
                reasons.push("apt-daily timers not active");
            }

            let mut f = Finding::droplet(d)
                .evidence("pkg_installed", &pkg)
                .evidence("update_package_lists", &update_lists)
                .evidence("unattended_upgrade", &unattended)
                .evidence("timers_enabled", &timers_enabled)
                .evidence("timers_active", &timers_active)
                .evidence("20auto_upgrades_found", "yes");
            if reasons.is_empty() {
                deps.log
                    .info(&format!("{}: periodic updates configured", d.name));
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
    async fn all_probes_yes_passes() {
        let inv = fleet();
        let remote = ScriptedRemote::default();
        let out = PeriodicSecurityUpdates
            .run(&deps(&inv, &remote, &NOOP))
            .await
            .unwrap();
        let f = &out.findings[0];
        assert!(f.pass);
        assert_eq!(f.evidence.len(), 6);
        assert_eq!(f.evidence["20auto_upgrades_found"], "yes");
    }

    #[tokio::test]
    async fn reasons_accumulate_in_fixed_order() {
        let inv = fleet();
        let remote = ScriptedRemote::default()
            .on("Update-Package-Lists", "no")
            .on("is-active apt-daily.timer", "no");
        let out = PeriodicSecurityUpdates
            .run(&deps(&inv, &remote, &NOOP))
            .await
            .unwrap();
        assert_eq!(
            out.findings[0].reason,
            "Update-Package-Lists not enabled; apt-daily timers not active"
        );
    }

    #[tokio::test]
    async fn first_probe_failure_aborts_resource() {
        let inv = fleet();
        let remote =
            ScriptedRemote::default().fail("dpkg -s unattended-upgrades", "connect refused");
        let out = PeriodicSecurityUpdates
            .run(&deps(&inv, &remote, &NOOP))
            .await
            .unwrap();
        let f = &out.findings[0];
        assert_eq!(f.reason, "SSH unreachable: connect refused");
        assert!(f.evidence.is_empty());
    }

    #[tokio::test]
    async fn later_probe_failure_degrades_to_failing_answer() {
        let inv = fleet();
        let remote = ScriptedRemote::default().fail("is-enabled apt-daily.timer", "channel closed");
        let out = PeriodicSecurityUpdates
            .run(&deps(&inv, &remote, &NOOP))
            .await
            .unwrap();
        let f = &out.findings[0];
        assert!(!f.pass);
        assert_eq!(f.reason, "apt-daily timers not enabled");
        assert_eq!(f.evidence["timers_enabled"], "");
        assert_eq!(f.evidence["pkg_installed"], "yes");
    }
}

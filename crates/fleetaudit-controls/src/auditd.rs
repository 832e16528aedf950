//! 2.1.6 - auditd installed, enabled, running

use crate::probes;
use async_trait::async_trait;
use fleetaudit_core::{Control, ControlOutcome, Deps, Finding, Result};

pub struct AuditdEnabled;

#[async_trait]
impl Control for AuditdEnabled {
    fn id(&self) -> &str {
        "2.1.6"
    }

    fn title(&self) -> &str {
        "Ensure auditd is Enabled"
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

            let pkg = match probes::probe(deps, ip, probes::PKG_AUDITD).await {
                Ok(v) => v,
                Err(e) => {
                    out.findings
                        .push(Finding::droplet(d).fail(probes::ssh_unreachable(&e)));
                    continue;
                }
            };
            let enabled = probes::probe_lenient(deps, ip, probes::AUDITD_ENABLED).await;
            let active = probes::probe_lenient(deps, ip, probes::AUDITD_ACTIVE).await;

            let mut reasons = Vec::new();
            if pkg != "yes" {
                reasons.push("auditd package not installed");
            }
            if enabled != "yes" {
                reasons.push("auditd service not enabled");
            }
            if active != "yes" {
                reasons.push("auditd service not running");
            }

            let mut f = Finding::droplet(d)
                .evidence("pkg_installed", &pkg)
                .evidence("service_enabled", &enabled)
                .evidence("service_active", &active);
            if reasons.is_empty() {
                deps.log
                    .info(&format!("{}: auditd enabled and running", d.name));
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

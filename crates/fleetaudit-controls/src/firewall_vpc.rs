//! 2.1.3 - firewall plus VPC attachment

use crate::probes;
use async_trait::async_trait;
use fleetaudit_core::{firewall_covered, Control, ControlOutcome, Deps, Finding, Result};

pub struct FirewallVpcConnected;

#[async_trait]
impl Control for FirewallVpcConnected {
    fn id(&self) -> &str {
        "2.1.3"
    }

    fn title(&self) -> &str {
        "Ensure Droplets are Connected to Firewall and VPC"
    }

    async fn run(&self, deps: &Deps<'_>) -> Result<ControlOutcome> {
        let mut out = ControlOutcome::default();

        let droplets = deps.inventory.list_droplets_by_tag(deps.env_tag).await?;
        if droplets.is_empty() {
            out.findings.push(probes::no_droplets(deps.env_tag));
            return Ok(out);
        }

        let firewalls = deps.inventory.list_firewalls().await?;

        for d in &droplets {
            let vpc_uuid = d.vpc_uuid();
            let mut reasons = Vec::new();
            if vpc_uuid.is_empty() {
                reasons.push("No VPC attached");
            }
            if !firewall_covered(d.id, deps.env_tag, &firewalls) {
                reasons.push("No firewall attached");
            }

            let mut f = Finding::droplet(d).evidence("vpc_uuid", vpc_uuid);
            if reasons.is_empty() {
                deps.log
                    .info(&format!("{} connected to VPC+Firewall (id={})", d.name, d.id));
            } else {
                let reason = reasons.join("; ");
                deps.log
                    .error(&format!("{}: {} (id={})", d.name, reason, d.id));
                f = f.fail(reason);
            }
            out.findings.push(f);
        }

        Ok(out)
    }
}

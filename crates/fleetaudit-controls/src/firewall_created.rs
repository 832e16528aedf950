//! 2.1.2 - firewall coverage

use crate::probes;
use async_trait::async_trait;
use fleetaudit_core::{firewall_covered, Control, ControlOutcome, Deps, Finding, Result};

pub struct FirewallCreated;

#[async_trait]
impl Control for FirewallCreated {
    fn id(&self) -> &str {
        "2.1.2"
    }

    fn title(&self) -> &str {
        "Ensure a Firewall is Created"
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
            let mut f = Finding::droplet(d);
            if firewall_covered(d.id, deps.env_tag, &firewalls) {
                deps.log
                    .info(&format!("{} firewall coverage OK (id={})", d.name, d.id));
            } else {
                f = f.fail("No firewall attached");
                deps.log.error(&format!(
                    "{} not protected by any firewall (id={})",
                    d.name, d.id
                ));
            }
            out.findings.push(f);
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{deps, droplet, tag_firewall, FakeInventory, NoRemote, NOOP};
    use fleetaudit_core::Firewall;

    #[tokio::test]
    async fn tag_coverage_passes_whole_fleet() {
        let inv = FakeInventory {
            droplets: vec![
                droplet(1, "web-1", &[], Some("203.0.113.1"), None),
                droplet(2, "web-2", &[], Some("203.0.113.2"), None),
            ],
            firewalls: vec![tag_firewall("env:demo")],
            ..Default::default()
        };
        let out = FirewallCreated
            .run(&deps(&inv, &NoRemote, &NOOP))
            .await
            .unwrap();
        assert!(out.findings.iter().all(|f| f.pass));
    }

    #[tokio::test]
    async fn direct_attachment_counts() {
        let inv = FakeInventory {
            droplets: vec![
                droplet(7, "db-1", &[], None, None),
                droplet(8, "db-2", &[], None, None),
            ],
            firewalls: vec![Firewall {
                id: "fw-1".into(),
                name: "db".into(),
                tags: vec![],
                droplet_ids: vec![7],
            }],
            ..Default::default()
        };
        let out = FirewallCreated
            .run(&deps(&inv, &NoRemote, &NOOP))
            .await
            .unwrap();
        assert!(out.findings[0].pass);
        assert!(!out.findings[1].pass);
        assert_eq!(out.findings[1].reason, "No firewall attached");
    }

    #[tokio::test]
    async fn firewall_listing_error_propagates() {
        let inv = FakeInventory {
            droplets: vec![droplet(1, "web-1", &[], None, None)],
            firewalls_err: Some("HTTP 500".into()),
            ..Default::default()
        };
        assert!(FirewallCreated
            .run(&deps(&inv, &NoRemote, &NOOP))
            .await
            .is_err());
    }
}

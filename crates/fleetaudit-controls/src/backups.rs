//! 2.1.1 - droplet backups

use crate::probes;
use async_trait::async_trait;
use fleetaudit_core::{Control, ControlOutcome, Deps, Finding, Result};

pub struct BackupsEnabled;

#[async_trait]
impl Control for BackupsEnabled {
    fn id(&self) -> &str {
        "2.1.1"
    }

    fn title(&self) -> &str {
        "Ensure Backups are Enabled"
    }

    async fn run(&self, deps: &Deps<'_>) -> Result<ControlOutcome> {
        let mut out = ControlOutcome::default();

        let droplets = deps.inventory.list_droplets_by_tag(deps.env_tag).await?;
        if droplets.is_empty() {
            out.findings.push(probes::no_droplets(deps.env_tag));
            return Ok(out);
        }

        for d in &droplets {
            let mut f = Finding::droplet(d);
            if d.has_feature("backups") {
                deps.log
                    .info(&format!("{} backups enabled (id={})", d.name, d.id));
            } else {
                f = f.fail("Backups disabled");
                deps.log
                    .error(&format!("{} backups disabled (id={})", d.name, d.id));
            }
            out.findings.push(f);
        }

        Ok(out)
    }
}

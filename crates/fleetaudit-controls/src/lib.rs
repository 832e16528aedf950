//! Fleetaudit Controls - the compliance rule set
//!
//! Six controls over the tagged droplet fleet. Each control lists the fleet
//! itself, evaluates every droplet, and emits one finding per droplet (plus
//! a single failing finding when the fleet is empty). Controls 2.1.4 through
//! 2.1.6 probe hosts over SSH; the rest work from the cloud API alone.

pub mod auditd;
pub mod backups;
pub mod firewall_created;
pub mod firewall_vpc;
pub mod os_upgrade_policy;
pub mod periodic_updates;
pub mod probes;

#[cfg(test)]
pub(crate) mod testutil;

pub use auditd::AuditdEnabled;
pub use backups::BackupsEnabled;
pub use firewall_created::FirewallCreated;
pub use firewall_vpc::FirewallVpcConnected;
pub use os_upgrade_policy::OsUpgradePolicy;
pub use periodic_updates::PeriodicSecurityUpdates;

use fleetaudit_core::Control;

/// Every registered control, in evaluation order.
pub fn all() -> Vec<Box<dyn Control>> {
    vec![
        Box::new(BackupsEnabled),
        Box::new(FirewallCreated),
        Box::new(FirewallVpcConnected),
        Box::new(OsUpgradePolicy),
        Box::new(PeriodicSecurityUpdates),
        Box::new(AuditdEnabled),
    ]
}

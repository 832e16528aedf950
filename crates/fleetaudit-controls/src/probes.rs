//! Probe commands and shared helpers for host-probing controls

use fleetaudit_core::{Deps, Error, Finding};

pub const PKG_UNATTENDED_UPGRADES: &str =
    r#"dpkg -s unattended-upgrades >/dev/null 2>&1 && echo yes || echo no"#;
pub const APT_UPDATE_PACKAGE_LISTS: &str = r#"grep -Eq 'APT::Periodic::Update-Package-Lists\s+"1"' /etc/apt/apt.conf.d/20auto-upgrades 2>/dev/null && echo yes || echo no"#;
pub const APT_UNATTENDED_UPGRADE: &str = r#"grep -Eq 'APT::Periodic::Unattended-Upgrade\s+"1"' /etc/apt/apt.conf.d/20auto-upgrades 2>/dev/null && echo yes || echo no"#;
pub const APT_TIMERS_ENABLED: &str =
    "systemctl is-enabled apt-daily.timer apt-daily-upgrade.timer >/dev/null 2>&1 && echo yes || echo no";
pub const APT_TIMERS_ACTIVE: &str =
    "systemctl is-active apt-daily.timer apt-daily-upgrade.timer >/dev/null 2>&1 && echo yes || echo no";
pub const PKG_AUDITD: &str = "dpkg -s auditd >/dev/null 2>&1 && echo yes || echo no";
pub const AUDITD_ENABLED: &str =
    "systemctl is-enabled auditd >/dev/null 2>&1 && echo yes || echo no";
pub const AUDITD_ACTIVE: &str =
    "systemctl is-active auditd >/dev/null 2>&1 && echo yes || echo no";

/// Runs one probe, trimming the output.
pub async fn probe(deps: &Deps<'_>, ip: &str, cmd: &str) -> fleetaudit_core::Result<String> {
    Ok(deps.remote.run_command(ip, cmd).await?.trim().to_string())
}

/// Runs one probe, treating a transport failure as an empty answer. Used for
/// secondary probes where the host is already known reachable; the empty
/// answer fails the `== "yes"` comparison and shows up as evidence.
pub async fn probe_lenient(deps: &Deps<'_>, ip: &str, cmd: &str) -> String {
    probe(deps, ip, cmd).await.unwrap_or_default()
}

/// The single failing finding an empty fleet produces.
pub fn no_droplets(env_tag: &str) -> Finding {
    Finding::failure("droplet", format!("No droplets found with tag {env_tag}"))
}

pub fn ssh_unreachable(e: &Error) -> String {
    format!("SSH unreachable: {}", err_text(e))
}

pub fn ssh_command_failed(e: &Error) -> String {
    format!("SSH command failed: {}", err_text(e))
}

fn err_text(e: &Error) -> String {
    match e {
        Error::RemoteExec(msg) => msg.clone(),
        other => other.to_string(),
    }
}

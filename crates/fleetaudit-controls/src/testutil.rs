//! Test doubles for the inventory and remote-exec seams

use async_trait::async_trait;
use fleetaudit_core::{
    ControlLog, Deps, Droplet, Error, Firewall, Inventory, NetworkV4, Networks, NoopLog,
    RemoteExec, Result,
};

#[derive(Default)]
pub struct FakeInventory {
    pub droplets: Vec<Droplet>,
    pub firewalls: Vec<Firewall>,
    pub droplets_err: Option<String>,
    pub firewalls_err: Option<String>,
}

#[async_trait]
impl Inventory for FakeInventory {
    async fn list_droplets_by_tag(&self, _tag: &str) -> Result<Vec<Droplet>> {
        match &self.droplets_err {
            Some(msg) => Err(Error::Transport(msg.clone())),
            None => Ok(self.droplets.clone()),
        }
    }

    async fn list_firewalls(&self) -> Result<Vec<Firewall>> {
        match &self.firewalls_err {
            Some(msg) => Err(Error::Transport(msg.clone())),
            None => Ok(self.firewalls.clone()),
        }
    }
}

/// Remote exec double scripted by command substring. The first script whose
/// needle appears in the command wins; unscripted commands answer "yes".
#[derive(Default)]
pub struct ScriptedRemote {
    scripts: Vec<(String, std::result::Result<String, String>)>,
}

impl ScriptedRemote {
    pub fn on(mut self, needle: &str, out: &str) -> Self {
        self.scripts.push((needle.into(), Ok(out.into())));
        self
    }

    pub fn fail(mut self, needle: &str, err: &str) -> Self {
        self.scripts.push((needle.into(), Err(err.into())));
        self
    }
}

#[async_trait]
impl RemoteExec for ScriptedRemote {
    async fn run_command(&self, _ip: &str, cmd: &str) -> Result<String> {
        for (needle, result) in &self.scripts {
            if cmd.contains(needle.as_str()) {
                return result
                    .clone()
                    .map_err(Error::RemoteExec);
            }
        }
        Ok("yes".into())
    }
}

/// Remote exec double that rejects every call, for API-only controls.
pub struct NoRemote;

#[async_trait]
impl RemoteExec for NoRemote {
    async fn run_command(&self, ip: &str, _cmd: &str) -> Result<String> {
        panic!("unexpected remote command against {ip}");
    }
}

pub fn droplet(id: u64, name: &str, features: &[&str], ip: Option<&str>, vpc: Option<&str>) -> Droplet {
    Droplet {
        id,
        name: name.into(),
        features: features.iter().map(|s| s.to_string()).collect(),
        networks: Networks {
            v4: ip
                .map(|ip| {
                    vec![NetworkV4 {
                        ip_address: ip.into(),
                        kind: "public".into(),
                    }]
                })
                .unwrap_or_default(),
        },
        vpc_uuid: vpc.map(Into::into),
    }
}

pub fn tag_firewall(tag: &str) -> Firewall {
    Firewall {
        id: "fw-tag".into(),
        name: "edge".into(),
        tags: vec![tag.into()],
        droplet_ids: vec![],
    }
}

pub fn deps<'a>(
    inventory: &'a dyn Inventory,
    remote: &'a dyn RemoteExec,
    log: &'a dyn ControlLog,
) -> Deps<'a> {
    Deps {
        env_tag: "env:demo",
        inventory,
        remote,
        log,
    }
}

pub static NOOP: NoopLog = NoopLog;

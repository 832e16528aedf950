//! Fleet resource model - droplets and firewalls as the inventory gateway
//! reports them

use serde::{Deserialize, Serialize};

/// A virtual machine in the audited fleet.
///
/// The field layout mirrors the provider API objects so the inventory gateway
/// can deserialize responses straight into this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Droplet {
    pub id: u64,
    pub name: String,

    /// Enabled platform features, e.g. "backups", "monitoring".
    #[serde(default)]
    pub features: Vec<String>,

    #[serde(default)]
    pub networks: Networks,

    /// Private-network identifier; empty/absent when not VPC-attached.
    #[serde(default)]
    pub vpc_uuid: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Networks {
    #[serde(default)]
    pub v4: Vec<NetworkV4>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkV4 {
    pub ip_address: String,
    /// "public" or "private".
    #[serde(rename = "type")]
    pub kind: String,
}

impl Droplet {
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }

    /// First public IPv4 address, if the droplet has one.
    pub fn public_ipv4(&self) -> Option<&str> {
        self.networks
            .v4
            .iter()
            .find(|n| n.kind == "public" && !n.ip_address.is_empty())
            .map(|n| n.ip_address.as_str())
    }

    /// Private-network identifier with absent and empty treated the same.
    pub fn vpc_uuid(&self) -> &str {
        self.vpc_uuid.as_deref().map(str::trim).unwrap_or("")
    }
}

/// A cloud firewall and the resources it protects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Firewall {
    pub id: String,
    pub name: String,

    /// Resource tags this firewall applies to.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Droplets attached directly by id.
    #[serde(default)]
    pub droplet_ids: Vec<u64>,
}

impl Firewall {
    pub fn covers_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn attaches(&self, droplet_id: u64) -> bool {
        self.droplet_ids.contains(&droplet_id)
    }
}

/// True when some firewall attaches the droplet directly or covers the
/// environment tag the droplet was selected by.
pub fn firewall_covered(droplet_id: u64, env_tag: &str, firewalls: &[Firewall]) -> bool {
    firewalls
        .iter()
        .any(|fw| fw.covers_tag(env_tag) || fw.attaches(droplet_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn droplet(features: &[&str], v4: &[(&str, &str)]) -> Droplet {
        Droplet {
            id: 42,
            name: "web-1".into(),
            features: features.iter().map(|s| s.to_string()).collect(),
            networks: Networks {
                v4: v4.iter()
                    .map(|(ip, kind)| NetworkV4 {
                        ip_address: ip.to_string(),
                        kind: kind.to_string(),
                    })
                    .collect(),
            },
            vpc_uuid: None,
        }
    }

    #[test]
    fn feature_lookup() {
        let d = droplet(&["backups", "monitoring"], &[]);
        assert!(d.has_feature("backups"));
        assert!(!d.has_feature("ipv6"));
    }

    #[test]
    fn public_ipv4_skips_private_addresses() {
        let d = droplet(&[], &[("10.0.0.5", "private"), ("203.0.113.7", "public")]);
        assert_eq!(d.public_ipv4(), Some("203.0.113.7"));
    }

    #[test]
    fn public_ipv4_absent() {
        let d = droplet(&[], &[("10.0.0.5", "private")]);
        assert_eq!(d.public_ipv4(), None);
    }

    #[test]
    fn coverage_by_tag_or_attachment() {
        let firewalls = vec![
            Firewall {
                id: "fw-1".into(),
                name: "edge".into(),
                tags: vec!["env:demo".into()],
                droplet_ids: vec![],
            },
            Firewall {
                id: "fw-2".into(),
                name: "direct".into(),
                tags: vec![],
                droplet_ids: vec![7],
            },
        ];
        assert!(firewall_covered(1, "env:demo", &firewalls));
        assert!(firewall_covered(7, "env:prod", &firewalls));
        assert!(!firewall_covered(1, "env:prod", &firewalls));
    }

    #[test]
    fn droplet_deserializes_from_api_shape() {
        let raw = r#"{
            "id": 3164444,
            "name": "example.com",
            "features": ["backups", "ipv6"],
            "networks": {"v4": [{"ip_address": "104.236.32.182", "type": "public", "netmask": "255.255.192.0"}]},
            "vpc_uuid": "760e09ef-dc84-11e8-981e-3cfdfea9f160",
            "memory": 1024
        }"#;
        let d: Droplet = serde_json::from_str(raw).unwrap();
        assert_eq!(d.id, 3164444);
        assert_eq!(d.public_ipv4(), Some("104.236.32.182"));
        assert!(d.has_feature("backups"));
        assert!(!d.vpc_uuid().is_empty());
    }
}

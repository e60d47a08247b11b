//! serde-loaded topology snapshots
//!
//! A snapshot is the directory's site topology exported to a file: ordered
//! subnet-to-site mappings, per-site server lists, and optionally the
//! domain plus generic-resolution controllers. Used by the `polo select`
//! dry run and as a scripted directory in tests; a live directory client
//! is a separate backend.

use std::{collections::HashMap, path::Path};

use anyhow::{Context, Result};
use ipnet::IpNet;
use serde::{Deserialize, Serialize};

use polo_core::{
    errors::DirectoryQueryError,
    policy::SiteId,
    session::DcLocator,
};

use crate::TopologyClient;

/// One subnet-to-site mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetEntry {
    /// CIDR block
    pub subnet: IpNet,
    /// site the subnet belongs to
    pub site: String,
}

/// Exported site topology
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologySnapshot {
    /// subnet mappings; file order is the selection tie-break order
    #[serde(default)]
    pub subnets: Vec<SubnetEntry>,
    /// servers registered per site, in advertisement order
    #[serde(default)]
    pub sites: HashMap<String, Vec<String>>,
    /// DNS domain of the forest, when exported
    #[serde(default)]
    pub domain: Option<String>,
    /// controllers generic resolution may name, in order
    #[serde(default)]
    pub dcs: Vec<String>,
}

impl TopologySnapshot {
    /// attempts to decode the snapshot first as JSON, then YAML, finally
    /// erroring if neither work
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path)
            .with_context(|| format!("failed to find snapshot at {}", &path.display()))?;
        Self::parse_str(&input)
    }

    /// attempts to decode the snapshot first as JSON, then YAML, finally
    /// erroring if neither work
    pub fn parse_str(input: &str) -> Result<Self> {
        Ok(match serde_json::from_str(input) {
            Ok(snapshot) => snapshot,
            Err(json_err) => serde_yaml::from_str(input).map_err(|yaml_err| {
                anyhow::anyhow!("parsing snapshot failed: json: {json_err} yaml: {yaml_err}")
            })?,
        })
    }
}

impl TopologyClient for TopologySnapshot {
    fn subnet_site_map(&self) -> Result<Vec<(IpNet, SiteId)>, DirectoryQueryError> {
        Ok(self
            .subnets
            .iter()
            .map(|entry| (entry.subnet, SiteId::from(entry.site.clone())))
            .collect())
    }

    fn site_server(&self, site: &SiteId) -> Result<Option<String>, DirectoryQueryError> {
        Ok(self
            .sites
            .get(site.as_str())
            .and_then(|servers| servers.first().cloned()))
    }
}

impl DcLocator for TopologySnapshot {
    fn any_dc(&self) -> Result<String, DirectoryQueryError> {
        self.dcs
            .first()
            .cloned()
            .ok_or_else(|| DirectoryQueryError::msg("snapshot names no controllers"))
    }

    fn domain_name(&self, _dc: &str) -> Result<String, DirectoryQueryError> {
        self.domain
            .clone()
            .ok_or_else(|| DirectoryQueryError::msg("snapshot carries no domain"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SiteSelector;

    static SNAPSHOT_YAML: &str = r#"
domain: example.com
subnets:
  - subnet: "10.0.1.0/24"
    site: HQ
  - subnet: "10.1.0.0/16"
    site: Branch
sites:
  HQ:
    - dc1.example.com
    - dc2.example.com
  Branch: []
dcs:
  - dc1.example.com
"#;

    #[test]
    fn yaml_snapshot_parses_in_file_order() {
        let snapshot = TopologySnapshot::parse_str(SNAPSHOT_YAML).unwrap();
        let map = snapshot.subnet_site_map().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map[0].1, "HQ".into());
        assert_eq!(map[1].1, "Branch".into());
        assert_eq!(snapshot.domain_name("dc1.example.com").unwrap(), "example.com");
    }

    #[test]
    fn json_snapshot_parses_too() {
        let snapshot = TopologySnapshot::parse_str(
            r#"{"subnets": [{"subnet": "10.0.1.0/24", "site": "HQ"}], "sites": {"HQ": ["dc1.example.com"]}}"#,
        )
        .unwrap();
        assert_eq!(
            snapshot.site_server(&"HQ".into()).unwrap().as_deref(),
            Some("dc1.example.com")
        );
    }

    #[test]
    fn first_server_is_advertised() {
        let snapshot = TopologySnapshot::parse_str(SNAPSHOT_YAML).unwrap();
        assert_eq!(
            snapshot.site_server(&"HQ".into()).unwrap().as_deref(),
            Some("dc1.example.com")
        );
        assert_eq!(snapshot.site_server(&"Branch".into()).unwrap(), None);
        assert_eq!(snapshot.site_server(&"Unknown".into()).unwrap(), None);
    }

    #[test]
    fn snapshot_drives_site_selection() {
        let snapshot = TopologySnapshot::parse_str(SNAPSHOT_YAML).unwrap();
        let candidate = SiteSelector::new(&snapshot)
            .select_with(["10.0.1.5".parse().unwrap()].into())
            .unwrap();
        assert_eq!(candidate.hostname, "dc1.example.com");
        assert_eq!(candidate.site, Some("HQ".into()));
    }

    #[test]
    fn empty_snapshot_has_no_resolution() {
        let snapshot = TopologySnapshot::default();
        assert!(snapshot.any_dc().is_err());
        assert!(snapshot.domain_name("dc1").is_err());
    }
}

//! # config
//!
//! Host-side polo configuration: which backend fetches policies, an
//! optional operator-forced domain controller, and the DC-failover toggle.
//! Everything an operator does not set has a working default, so an absent
//! or empty file is a valid configuration.
#![warn(
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    non_snake_case,
    non_upper_case_globals
)]
#![allow(clippy::cognitive_complexity)]
#![deny(rustdoc::broken_intra_doc_links)]
#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use polo_core::session::FailoverToggle;

/// local policy template applied when the operator picks none
pub static DEFAULT_LOCAL_POLICY: &str = "default";

/// Where policy data comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backend {
    /// the joined domain, via a directory backend
    #[default]
    Samba,
    /// local policy templates only, no domain involved
    Local,
}

/// on-disk shape; missing keys take defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Wire {
    #[serde(default)]
    backend: Option<String>,
    #[serde(default)]
    dc: Option<String>,
    #[serde(default)]
    dc_failover: bool,
    #[serde(default)]
    local_policy: Option<String>,
}

/// Parsed host configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GpConfig {
    backend: Backend,
    dc: Option<String>,
    dc_failover: bool,
    local_policy: Option<String>,
    path: Option<PathBuf>,
}

impl GpConfig {
    /// attempts to decode the config first as JSON, then YAML, finally
    /// erroring if neither work
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path)
            .with_context(|| format!("failed to find config at {}", &path.display()))?;
        let mut config = Self::parse_str(&input)?;
        config.path = Some(path.to_path_buf());
        debug!(?config);
        Ok(config)
    }

    /// attempts to decode the config first as JSON, then YAML, finally
    /// erroring if neither work
    pub fn parse_str(input: &str) -> Result<Self> {
        let wire: Wire = match serde_json::from_str(input) {
            Ok(wire) => wire,
            Err(json_err) => serde_yaml::from_str(input).map_err(|yaml_err| {
                anyhow::anyhow!("parsing config failed: json: {json_err} yaml: {yaml_err}")
            })?,
        };
        Ok(wire.into())
    }

    /// backend fetching policies; unknown names fall back to the default
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// operator-forced domain controller, bypassing site selection.
    /// There is no way to determine this automatically, hence no setter.
    pub fn dc(&self) -> Option<&str> {
        self.dc.as_deref()
    }

    /// whether a failed refresh may rotate to another controller
    pub fn dc_failover(&self) -> bool {
        self.dc_failover
    }

    /// name of the chosen local policy template; unset falls back to the
    /// default template
    pub fn local_policy(&self) -> &str {
        self.local_policy.as_deref().unwrap_or(DEFAULT_LOCAL_POLICY)
    }

    /// where the config was read from, when it came from a file
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl From<Wire> for GpConfig {
    fn from(wire: Wire) -> Self {
        let backend = match wire.backend.as_deref() {
            None | Some("samba") => Backend::Samba,
            Some("local") => Backend::Local,
            Some(other) => {
                warn!(backend = %other, "unknown backend, using samba");
                Backend::Samba
            }
        };
        Self {
            backend,
            dc: wire.dc,
            dc_failover: wire.dc_failover,
            local_policy: wire.local_policy,
            path: None,
        }
    }
}

impl FailoverToggle for GpConfig {
    fn failover_allowed(&self) -> bool {
        self.dc_failover
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_takes_defaults() {
        let config = GpConfig::parse_str("{}").unwrap();
        assert_eq!(config.backend(), Backend::Samba);
        assert_eq!(config.dc(), None);
        assert!(!config.dc_failover());
        assert!(!config.failover_allowed());
        assert_eq!(config.local_policy(), DEFAULT_LOCAL_POLICY);
    }

    #[test]
    fn local_policy_overrides_the_default_template() {
        let config = GpConfig::parse_str("backend: local\nlocal_policy: kde-desktop\n").unwrap();
        assert_eq!(config.backend(), Backend::Local);
        assert_eq!(config.local_policy(), "kde-desktop");
    }

    #[test]
    fn yaml_config_parses() {
        let config = GpConfig::parse_str(
            "backend: samba\ndc: dc1.example.com\ndc_failover: true\n",
        )
        .unwrap();
        assert_eq!(config.dc(), Some("dc1.example.com"));
        assert!(config.failover_allowed());
    }

    #[test]
    fn json_config_parses() {
        let config = GpConfig::parse_str(r#"{"backend": "local", "dc_failover": false}"#).unwrap();
        assert_eq!(config.backend(), Backend::Local);
        assert!(!config.failover_allowed());
    }

    #[test]
    fn unknown_backend_falls_back_to_samba() {
        let config = GpConfig::parse_str("backend: ldap3\n").unwrap();
        assert_eq!(config.backend(), Backend::Samba);
    }
}

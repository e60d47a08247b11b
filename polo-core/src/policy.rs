//! policy and domain-controller data model

use std::fmt;

/// Directory site identifier, e.g. `HQ` or a full site DN
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SiteId(String);

impl SiteId {
    /// string form of the site identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SiteId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SiteId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// One domain controller the refresh loop may try. Identity is the
/// hostname; the site is carried for logging only and does not take part
/// in visited-set membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DcCandidate {
    /// DNS hostname of the controller
    pub hostname: String,
    /// site the controller was selected for, when known
    pub site: Option<SiteId>,
}

impl DcCandidate {
    /// Candidate for `hostname`, optionally tagged with the site it serves
    pub fn new(hostname: impl Into<String>, site: Option<SiteId>) -> Self {
        Self {
            hostname: hostname.into(),
            site,
        }
    }
}

impl fmt::Display for DcCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.site {
            Some(site) => write!(f, "{} (site {site})", self.hostname),
            None => f.write_str(&self.hostname),
        }
    }
}

/// Reference to one group policy object applicable to a principal.
/// Content retrieval and application happen downstream of this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyRef {
    /// GPO uuid (the directory's `name` attribute)
    pub uuid: String,
    /// human-readable display name
    pub display_name: String,
    /// sysvol path the policy content replicates to
    pub sysvol_path: String,
}

impl PolicyRef {
    /// Build a reference from the directory's three naming attributes
    pub fn new(
        uuid: impl Into<String>,
        display_name: impl Into<String>,
        sysvol_path: impl Into<String>,
    ) -> Self {
        Self {
            uuid: uuid.into(),
            display_name: display_name.into(),
            sysvol_path: sysvol_path.into(),
        }
    }
}

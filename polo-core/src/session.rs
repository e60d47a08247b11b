//! collaborator traits implemented by directory backends
//!
//! The directory protocol itself lives behind these traits. Credentials are
//! an opaque capability held by the [`SessionFactory`] implementation; this
//! crate never inspects them.

use crate::{
    errors::{DirectoryQueryError, SessionError},
    policy::{DcCandidate, PolicyRef},
};

/// A single authenticated connection to one domain controller. Sessions
/// live for one connection attempt and are dropped when superseded.
pub trait DcSession {
    /// Fetch the policy references applicable to `principal` from this DC
    fn list_policies(&self, principal: &str) -> Result<Vec<PolicyRef>, SessionError>;

    /// Ask the DC to ensure the listed policy content is replicated and
    /// locally cacheable before application
    fn refresh_policies(&self, principal: &str, policies: &[PolicyRef])
    -> Result<(), SessionError>;
}

/// Opens sessions against a named controller. Construction failure is
/// classified exactly like a refresh failure by the orchestrator.
pub trait SessionFactory {
    /// session type produced by this factory
    type Session: DcSession;

    /// Open an authenticated session against `hostname`
    fn open(&self, hostname: &str) -> Result<Self::Session, SessionError>;
}

/// Generic controller resolution, ignoring site topology. Backends answer
/// from whatever the directory currently advertises, so repeated calls may
/// name different hosts.
pub trait DcLocator {
    /// Resolve any usable controller for the joined domain
    fn any_dc(&self) -> Result<String, DirectoryQueryError>;

    /// DNS domain name advertised by the given controller
    fn domain_name(&self, dc: &str) -> Result<String, DirectoryQueryError>;
}

/// Site-aware initial DC selection. Best effort: implementations never
/// fail, they return `None` and let the caller fall back to [`DcLocator`].
pub trait SelectDc {
    /// Pick the network-nearest controller, if topology allows one
    fn select(&self) -> Option<DcCandidate>;
}

/// Host policy gating mid-run DC rotation. Injected rather than read from
/// ambient configuration so the state machine stays testable.
pub trait FailoverToggle {
    /// whether the operator has opted in to trying another controller
    /// after a recoverable failure
    fn failover_allowed(&self) -> bool;
}

impl FailoverToggle for bool {
    fn failover_allowed(&self) -> bool {
        *self
    }
}

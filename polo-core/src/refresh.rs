//! the refresh state machine
//!
//! One [`Refresher::run`] drives a single refresh request:
//! pick a controller (operator override, site selection, then generic
//! resolution), open a session, list and refresh the principal's policies,
//! and on a recoverable failure rotate to another controller the directory
//! names. A per-run visited set guarantees termination: no hostname is
//! attempted twice, so session attempts are bounded by the number of
//! distinct controllers the directory can name.

use std::collections::HashSet;

use tracing::{debug, error, info, warn};

use crate::{
    errors::{RefreshError, SessionError},
    policy::{DcCandidate, PolicyRef},
    session::{DcLocator, DcSession, FailoverToggle, SelectDc, SessionFactory},
};

/// Outcome of a successful refresh run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSummary {
    /// policy references obtained from the serving controller
    pub policies: Vec<PolicyRef>,
    /// controller that served the refresh
    pub dc: String,
    /// every hostname attempted during the run, the serving one included
    pub visited: HashSet<String>,
}

/// Drives policy refresh for one host. Holds only borrowed capabilities;
/// all per-run state lives inside [`Refresher::run`], so independent runs
/// may proceed concurrently with their own `Refresher`.
pub struct Refresher<'a, L, F, T> {
    locator: &'a L,
    sessions: &'a F,
    toggle: &'a T,
    selector: Option<&'a dyn SelectDc>,
    forced_dc: Option<String>,
}

impl<L, F, T> std::fmt::Debug for Refresher<'_, L, F, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Refresher")
            .field("forced_dc", &self.forced_dc)
            .field("site_aware", &self.selector.is_some())
            .finish_non_exhaustive()
    }
}

impl<'a, L, F, T> Refresher<'a, L, F, T>
where
    L: DcLocator,
    F: SessionFactory,
    T: FailoverToggle,
{
    /// New refresher over a locator, a session factory and the host's
    /// failover toggle
    pub fn new(locator: &'a L, sessions: &'a F, toggle: &'a T) -> Self {
        Self {
            locator,
            sessions,
            toggle,
            selector: None,
            forced_dc: None,
        }
    }

    /// Use site-aware selection for the initial candidate
    pub fn with_selector(mut self, selector: &'a dyn SelectDc) -> Self {
        self.selector = Some(selector);
        self
    }

    /// Operator-forced controller, bypassing selection entirely
    pub fn with_forced_dc(mut self, dc: impl Into<String>) -> Self {
        self.forced_dc = Some(dc.into());
        self
    }

    /// Run one refresh request for `principal` to completion
    pub fn run(&self, principal: &str) -> Result<RefreshSummary, RefreshError> {
        let candidate = self.initial_candidate()?;
        // read once per run; flipping the host toggle mid-run must not
        // change an in-flight decision
        let failover_allowed = self.toggle.failover_allowed();

        let mut visited = HashSet::new();
        let mut hostname = candidate.hostname;
        visited.insert(hostname.clone());

        loop {
            match self.attempt(&hostname, principal) {
                Ok(policies) => {
                    info!(dc = %hostname, count = policies.len(), "policy refresh complete");
                    return Ok(RefreshSummary {
                        policies,
                        dc: hostname,
                        visited,
                    });
                }
                Err(err) if err.is_recoverable() => {
                    if !failover_allowed {
                        error!(dc = %hostname, %err, "refresh failed, dc failover disabled");
                        return Err(RefreshError::FailoverDisabled { hostname, source: err });
                    }
                    // topology may have changed since the last resolution,
                    // so ask the directory again rather than caching
                    let replacement = self
                        .locator
                        .any_dc()
                        .map_err(RefreshError::NoDcAvailable)?;
                    if !visited.insert(replacement.clone()) {
                        error!(dc = %replacement, %err, "no unvisited controller left");
                        return Err(RefreshError::CandidatesExhausted {
                            visited: visited.len(),
                            source: err,
                        });
                    }
                    warn!(failed = %hostname, next = %replacement, %err, "rotating to another domain controller");
                    hostname = replacement;
                }
                Err(err) => {
                    error!(dc = %hostname, %err, "refresh failed");
                    return Err(RefreshError::Session(err));
                }
            }
        }
    }

    /// One session attempt against `hostname`: open, list, refresh
    fn attempt(&self, hostname: &str, principal: &str) -> Result<Vec<PolicyRef>, SessionError> {
        debug!(dc = %hostname, %principal, "opening dc session");
        let session = self.sessions.open(hostname)?;
        let policies = session.list_policies(principal)?;
        for policy in &policies {
            debug!(uuid = %policy.uuid, name = %policy.display_name, path = %policy.sysvol_path, "policy applies");
        }
        session.refresh_policies(principal, &policies)?;
        Ok(policies)
    }

    fn initial_candidate(&self) -> Result<DcCandidate, RefreshError> {
        if let Some(dc) = &self.forced_dc {
            debug!(user_dc = %dc, "using operator-forced dc");
            return Ok(DcCandidate::new(dc.clone(), None));
        }
        if let Some(selector) = self.selector {
            if let Some(candidate) = selector.select() {
                debug!(%candidate, "selected site-local dc");
                return Ok(candidate);
            }
        }
        let hostname = self
            .locator
            .any_dc()
            .map_err(RefreshError::NoDcAvailable)?;
        debug!(dc = %hostname, "using generic dc resolution");
        Ok(DcCandidate::new(hostname, None))
    }
}

//! error taxonomy for directory queries and policy refresh

/// A topology or directory lookup failed. Site selection treats this as
/// "topology unknown" and degrades to generic DC resolution; it is only
/// fatal when even generic resolution cannot name a controller.
#[derive(thiserror::Error, Debug)]
#[error("directory query failed: {source}")]
pub struct DirectoryQueryError {
    #[from]
    source: anyhow::Error,
}

impl DirectoryQueryError {
    /// Wrap a plain message, for backends without a richer error to attach
    pub fn msg(msg: impl std::fmt::Display) -> Self {
        Self {
            source: anyhow::anyhow!("{msg}"),
        }
    }
}

/// Failure raised by a DC session (or its construction). `Unreachable` and
/// `AuthFailed` are network-layer failures the orchestrator may recover from
/// by rotating to another controller; everything else aborts the run.
#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    /// could not reach the controller at the transport level
    #[error("domain controller {hostname} unreachable: {detail}")]
    Unreachable {
        /// controller we failed to reach
        hostname: String,
        /// transport-level detail
        detail: String,
    },
    /// the controller refused our credentials
    #[error("authentication against {hostname} failed: {detail}")]
    AuthFailed {
        /// controller that refused us
        hostname: String,
        /// auth-layer detail
        detail: String,
    },
    /// any other failure, propagated verbatim and never retried
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SessionError {
    /// Shorthand for [`SessionError::Unreachable`]
    pub fn unreachable(hostname: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Unreachable {
            hostname: hostname.into(),
            detail: detail.into(),
        }
    }

    /// Shorthand for [`SessionError::AuthFailed`]
    pub fn auth_failed(hostname: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::AuthFailed {
            hostname: hostname.into(),
            detail: detail.into(),
        }
    }

    /// whether the refresh loop may respond to this error by trying
    /// another controller
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Unreachable { .. } | Self::AuthFailed { .. })
    }
}

/// Terminal failure of one refresh run
#[derive(thiserror::Error, Debug)]
pub enum RefreshError {
    /// neither site selection nor generic resolution produced a controller
    #[error("no domain controller available")]
    NoDcAvailable(#[source] DirectoryQueryError),
    /// a recoverable failure occurred but DC failover is not enabled on
    /// this host; the triggering error is carried as the source
    #[error("refresh against {hostname} failed and dc failover is disabled")]
    FailoverDisabled {
        /// controller the failed attempt ran against
        hostname: String,
        /// the recoverable error that would have driven failover
        #[source]
        source: SessionError,
    },
    /// the directory keeps naming controllers we have already tried; the
    /// error from the last attempt is carried as the source
    #[error("dc failover exhausted after {visited} controller(s)")]
    CandidatesExhausted {
        /// number of distinct hostnames attempted this run
        visited: usize,
        /// the recoverable error from the last attempt
        #[source]
        source: SessionError,
    },
    /// fatal session error, propagated unchanged
    #[error(transparent)]
    Session(SessionError),
}

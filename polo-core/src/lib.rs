//! # polo
//!
//! Core of the group policy refresh pipeline: error taxonomy, policy and
//! domain-controller data model, the collaborator traits implemented by
//! directory backends, and the refresh state machine that drives DC
//! selection and failure-driven failover.
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
pub use anyhow;
pub use tracing;

pub use crate::refresh::{Refresher, RefreshSummary};

pub mod config;
pub mod errors;
pub mod policy;
pub mod refresh;
pub mod session;
pub mod winvar;

//! # topology
//!
//! Site-awareness for DC selection: enumerate the host's own addresses,
//! match them against the directory's subnet-to-site mappings and pick a
//! controller registered for "our" site. Everything here is best effort;
//! a host whose topology cannot be determined falls back to generic DC
//! resolution and keeps working.
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
use std::{collections::HashSet, net::IpAddr};

use ipnet::IpNet;
use tracing::debug;

use polo_core::{
    errors::DirectoryQueryError,
    policy::{DcCandidate, SiteId},
    session::SelectDc,
};

pub mod snapshot;

pub use snapshot::TopologySnapshot;

/// Queries the directory for site topology. Pure query wrapper, no retry
/// logic; connectivity failures surface as [`DirectoryQueryError`] and the
/// caller decides how much it cares.
pub trait TopologyClient {
    /// Subnet-to-site mappings, in the order the directory returned them.
    /// That order is the tie-break for overlapping subnets: first match
    /// wins, no longest-prefix preference.
    fn subnet_site_map(&self) -> Result<Vec<(IpNet, SiteId)>, DirectoryQueryError>;

    /// First server advertised for `site`, or `None` when the site has no
    /// registered servers
    fn site_server(&self, site: &SiteId) -> Result<Option<String>, DirectoryQueryError>;
}

/// Enumerate the host's own non-loopback interface addresses, both
/// families. Never fails; interfaces without usable addresses contribute
/// nothing.
pub fn local_addresses() -> HashSet<IpAddr> {
    let mut addresses = HashSet::new();
    for iface in pnet::datalink::interfaces() {
        if iface.is_loopback() || !iface.is_up() {
            continue;
        }
        for net in &iface.ips {
            let ip = net.ip();
            if !ip.is_loopback() {
                addresses.insert(ip);
            }
        }
    }
    addresses
}

/// Site of the first subnet (in map order) containing any of the given
/// addresses
fn site_for<'a>(
    addresses: &HashSet<IpAddr>,
    map: &'a [(IpNet, SiteId)],
) -> Option<&'a SiteId> {
    map.iter()
        .find(|(subnet, _)| addresses.iter().any(|addr| subnet.contains(addr)))
        .map(|(_, site)| site)
}

/// Picks the controller registered for the site our addresses fall into.
/// Total: any failure along the way degrades to `None`, never an error;
/// the refresh loop always has generic resolution to fall back to.
#[derive(Debug)]
pub struct SiteSelector<'a, T> {
    topo: &'a T,
}

impl<'a, T: TopologyClient> SiteSelector<'a, T> {
    /// Selector over the given topology source
    pub fn new(topo: &'a T) -> Self {
        Self { topo }
    }

    /// Select using the host's real interface addresses
    pub fn select(&self) -> Option<DcCandidate> {
        self.select_with(local_addresses())
    }

    /// Select as if `addresses` were the host's interface addresses
    pub fn select_with(&self, addresses: HashSet<IpAddr>) -> Option<DcCandidate> {
        if addresses.is_empty() {
            debug!("no local addresses, skipping site selection");
            return None;
        }
        let map = match self.topo.subnet_site_map() {
            Ok(map) => map,
            Err(err) => {
                debug!(%err, "topology unknown, skipping site selection");
                return None;
            }
        };
        let site = match site_for(&addresses, &map) {
            Some(site) => site,
            None => {
                debug!("no subnet covers our addresses");
                return None;
            }
        };
        match self.topo.site_server(site) {
            Ok(Some(server)) => {
                debug!(%server, %site, "selected site-local server");
                Some(DcCandidate::new(server, Some(site.clone())))
            }
            Ok(None) => {
                debug!(%site, "our site has no registered servers");
                None
            }
            Err(err) => {
                debug!(%err, %site, "server lookup failed");
                None
            }
        }
    }
}

impl<T: TopologyClient> SelectDc for SiteSelector<'_, T> {
    fn select(&self) -> Option<DcCandidate> {
        SiteSelector::select(self)
    }
}

use std::collections::HashSet;

use anyhow::Result;

use config::GpConfig;
use polo_core::{
    config::{
        cli::{self, Parser},
        trace,
    },
    session::DcLocator,
    tracing::*,
};
use topology::{local_addresses, SiteSelector, TopologySnapshot};

fn main() -> Result<()> {
    // parses from cli or environment var
    let args = cli::Config::parse();
    let trace_config = trace::Config::parse(&args.polo_log)?;
    debug!(?args, ?trace_config);

    match args.command {
        cli::Command::Config => print_config(&args),
        cli::Command::Select { snapshot, addr } => {
            select(&snapshot, addr.into_iter().collect())
        }
    }
}

fn print_config(args: &cli::Config) -> Result<()> {
    let config = GpConfig::parse(&args.config_path)?;
    println!("found config at path = {}", args.config_path.display());
    println!("{config:#?}");
    Ok(())
}

/// Dry run of site selection: which controller would a host with these
/// addresses pick, given the exported topology
fn select(snapshot: &std::path::Path, addrs: HashSet<std::net::IpAddr>) -> Result<()> {
    let snapshot = TopologySnapshot::parse(snapshot)?;

    let addrs = if addrs.is_empty() {
        local_addresses()
    } else {
        addrs
    };
    info!(count = addrs.len(), "considering local addresses");
    for addr in &addrs {
        debug!(%addr);
    }

    match SiteSelector::new(&snapshot).select_with(addrs) {
        Some(candidate) => {
            report_domain(&snapshot, &candidate.hostname);
            println!("site-local controller: {candidate}");
        }
        None => match snapshot.any_dc() {
            Ok(dc) => {
                report_domain(&snapshot, &dc);
                println!("no site-local controller, generic resolution names {dc}");
            }
            Err(err) => {
                warn!(%err);
                println!("no controller available from this snapshot");
            }
        },
    }
    Ok(())
}

fn report_domain(locator: &impl DcLocator, dc: &str) {
    match locator.domain_name(dc) {
        Ok(domain) => info!(%dc, %domain, "controller serves domain"),
        Err(err) => debug!(%err, "no domain advertised"),
    }
}

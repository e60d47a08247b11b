//! binary configs: cli parsing & tracing setup

pub mod cli {
    //! Parse from either cli or env var

    /// the default path to the host's polo config
    pub static DEFAULT_CONFIG_PATH: &str = "/etc/polo/config.yaml";
    /// default log level. Can use this argument or POLO_LOG env var
    pub const DEFAULT_POLO_LOG: &str = "info";

    use std::{net::IpAddr, path::PathBuf};

    pub use clap::{Parser, Subcommand};

    #[derive(Parser, Debug, Clone, PartialEq, Eq)]
    #[clap(author, name = "polo", bin_name = "polo", about, long_about = None)]
    /// parses from cli & environment var
    pub struct Config {
        /// path to the host's polo config
        #[clap(
            short,
            long,
            value_parser,
            env,
            default_value = DEFAULT_CONFIG_PATH
        )]
        pub config_path: PathBuf,
        /// set the log level. All valid RUST_LOG arguments are accepted
        #[clap(long, env, value_parser, default_value = DEFAULT_POLO_LOG)]
        pub polo_log: String,
        /// what to do
        #[clap(subcommand)]
        pub command: Command,
    }

    /// polo subcommands
    #[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
    pub enum Command {
        /// site-selection dry run against an exported topology snapshot
        Select {
            /// path to the topology snapshot (JSON or YAML)
            #[clap(short, long, value_parser)]
            snapshot: PathBuf,
            /// pretend these are the host's addresses instead of
            /// enumerating interfaces (repeatable)
            #[clap(long, value_parser)]
            addr: Vec<IpAddr>,
        },
        /// parse & pretty-print the effective host configuration
        Config,
    }
}

pub mod trace {
    //! tracing configuration
    use anyhow::Result;
    use tracing_subscriber::{
        filter::EnvFilter,
        fmt::{
            self,
            format::{Format, PrettyFields},
        },
        prelude::__tracing_subscriber_SubscriberExt,
        util::SubscriberInitExt,
    };

    use std::env;

    /// log as "json" or "standard" (unstructured)
    static DEFAULT_LOG_FORMAT: &str = "standard";

    /// Configuration for log output
    #[derive(Debug)]
    pub struct Config {
        /// formatting to apply to logs
        pub log_frmt: String,
    }

    impl Config {
        /// Install the global subscriber. Log level comes from POLO_LOG,
        /// format from LOG_FORMAT.
        pub fn parse(polo_log: &str) -> Result<Self> {
            let log_frmt =
                env::var("LOG_FORMAT").unwrap_or_else(|_| DEFAULT_LOG_FORMAT.to_owned());

            let filter =
                EnvFilter::try_new(polo_log).or_else(|_| EnvFilter::try_new("info"))?;

            match &log_frmt[..] {
                "json" => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().json())
                        .init();
                }
                "pretty" => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(
                            fmt::layer()
                                .event_format(
                                    Format::default().pretty().with_source_location(false),
                                )
                                .fmt_fields(PrettyFields::new()),
                        )
                        .init();
                }
                _ => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer())
                        .init();
                }
            }

            Ok(Self { log_frmt })
        }
    }
}

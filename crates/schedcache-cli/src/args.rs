//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use schedcache_core::{Config, FlightScope};

/// Browse a seasonal flight timetable published by the CMS.
#[derive(Debug, Clone, Parser)]
#[command(name = "schedcache", version, about)]
pub struct Args {
    /// GraphQL endpoint of the CMS (overrides config and SCHEDCACHE_ENDPOINT)
    #[arg(long, value_name = "URL", global = true)]
    pub endpoint: Option<String>,

    /// Flights requested per page
    #[arg(long, value_name = "N", global = true)]
    pub page_size: Option<usize>,

    /// Don't warm neighboring schedule periods in the background
    #[arg(long, global = true)]
    pub no_prefetch: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List schedule periods in date order
    Periods,
    /// Show one period's weekly timetable
    Show {
        /// Period id; defaults to the period in effect today
        period: Option<String>,

        #[arg(long, value_enum, default_value_t = ScopeArg::International)]
        scope: ScopeArg,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScopeArg {
    International,
    Domestic,
}

impl From<ScopeArg> for FlightScope {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::International => FlightScope::International,
            ScopeArg::Domestic => FlightScope::Domestic,
        }
    }
}

impl Args {
    /// Command-line flags take precedence over file and environment settings.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(ref endpoint) = self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        if self.no_prefetch {
            config.prefetch = false;
        }
    }
}

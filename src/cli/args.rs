//! Command line argument parsing for the usersearch demo using clap.

use clap::Parser;
use log::LevelFilter;

use crate::cli::commands::DemoConfig;
use crate::error::{Result, UserSearchError};
use crate::user::Gender;

/// usersearch - seed an in-memory index with synthetic users and query it
#[derive(Parser, Debug, Clone)]
#[command(name = "usersearch")]
#[command(about = "Interactive faceted search over synthetic user records")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct UserSearchArgs {
    /// Number of records to generate
    #[arg(short = 'n', long, default_value_t = 100)]
    pub records: usize,

    /// Documents per index batch
    #[arg(short, long, default_value_t = 10)]
    pub batch_size: usize,

    /// Hits shown per query
    #[arg(short, long, default_value_t = 5)]
    pub page_size: usize,

    /// First record id
    #[arg(long, default_value_t = 1000)]
    pub id_base: u64,

    /// Seed for reproducible records
    #[arg(long)]
    pub seed: Option<u64>,

    /// Genders to generate (comma separated)
    #[arg(long, value_delimiter = ',', default_value = "male,female")]
    pub genders: Vec<String>,

    /// Print facet counts below each result table
    #[arg(long)]
    pub show_facets: bool,

    /// Verbosity level (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,
}

impl UserSearchArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }

    /// Log level for the process as a whole.
    pub fn log_level(&self) -> LevelFilter {
        match self.verbosity() {
            0 => LevelFilter::Error, // Quiet mode
            1 => LevelFilter::Warn,  // Default
            2 => LevelFilter::Info,  // Verbose
            _ => LevelFilter::Debug, // Very verbose (3+)
        }
    }

    /// Log level for seeding progress; at least info unless quiet.
    pub fn progress_log_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Error
        } else {
            self.log_level().max(LevelFilter::Info)
        }
    }

    /// Convert into a demo configuration.
    pub fn to_config(&self) -> Result<DemoConfig> {
        let genders = self
            .genders
            .iter()
            .filter(|g| !g.trim().is_empty())
            .map(|g| g.parse::<Gender>())
            .collect::<Result<Vec<_>>>()?;
        if genders.is_empty() {
            return Err(UserSearchError::invalid_argument("--genders is empty"));
        }

        Ok(DemoConfig {
            records: self.records,
            batch_size: self.batch_size,
            page_size: self.page_size,
            id_base: self.id_base,
            seed: self.seed,
            genders,
            show_facets: self.show_facets,
        })
    }
}

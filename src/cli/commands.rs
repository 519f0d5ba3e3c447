//! Demo command: generate, seed, then query interactively.

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::cli::output::ResultRenderer;
use crate::cli::session::Session;
use crate::error::Result;
use crate::index::{MemoryIndex, SearchIndex};
use crate::loader::{BatchLoader, DEFAULT_BATCH_SIZE, LoadReport};
use crate::planner::{self, QueryPlanner};
use crate::user::factory::DEFAULT_ID_BASE;
use crate::user::{FactoryConfig, Gender, RandomIdentityGenerator, RecordFactory};

/// Number of records generated by default.
pub const DEFAULT_RECORDS: usize = 100;

/// Settings for one demo run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoConfig {
    pub records: usize,
    pub batch_size: usize,
    pub page_size: usize,
    pub id_base: u64,
    /// RNG seed; `None` draws from the operating system.
    pub seed: Option<u64>,
    pub genders: Vec<Gender>,
    pub show_facets: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            records: DEFAULT_RECORDS,
            batch_size: DEFAULT_BATCH_SIZE,
            page_size: planner::DEFAULT_PAGE_SIZE,
            id_base: DEFAULT_ID_BASE,
            seed: None,
            genders: Gender::ALL.to_vec(),
            show_facets: false,
        }
    }
}

/// Generate records and load them into a fresh in-memory index.
pub fn seed_index(config: &DemoConfig) -> Result<(MemoryIndex, LoadReport)> {
    let generator = match config.seed {
        Some(seed) => RandomIdentityGenerator::seeded(seed),
        None => RandomIdentityGenerator::new(),
    };
    let factory_config = FactoryConfig {
        id_base: config.id_base,
        genders: config.genders.clone(),
        ..FactoryConfig::default()
    };
    let mut factory = RecordFactory::new(factory_config, generator)?;
    let loader = BatchLoader::new(config.batch_size)?;

    let records = factory.generate(config.records)?;
    let mut index = MemoryIndex::new();
    let report = loader.load(&mut index, &records)?;

    log::info!(
        "Indexed {} documents in {} batches",
        report.documents,
        report.batches
    );
    Ok((index, report))
}

/// Run the interactive session against an index.
pub fn run_session<I, R, W>(index: &I, config: &DemoConfig, input: R, out: &mut W) -> Result<()>
where
    I: SearchIndex,
    R: BufRead,
    W: Write,
{
    let planner = QueryPlanner::with_page_size(config.page_size)?;
    let renderer =
        ResultRenderer::new(QueryPlanner::projection()).with_facets(config.show_facets);

    Session::new(index, planner, renderer).run(input, out)
}

/// Seed an index and run the session on the given streams.
pub fn run_demo<R: BufRead, W: Write>(config: &DemoConfig, input: R, out: &mut W) -> Result<()> {
    let (index, _) = seed_index(config)?;
    run_session(&index, config, input, out)
}

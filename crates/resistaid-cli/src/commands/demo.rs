use super::design;
use crate::cli::DemoArgs;
use crate::data::RecordStore;
use crate::error::Result;
use crate::index::LexicalIndex;
use resistaid::engine::config::PipelineConfigBuilder;
use tracing::info;

/// The canonical benchmark mutations, run with two candidates each.
const DEMO_MUTATIONS: [&str; 4] = ["L755S", "T798I", "D769H", "V777L"];
const DEMO_CANDIDATES: usize = 2;

pub fn run(args: DemoArgs) -> Result<()> {
    let store = RecordStore::load(&args.data_dir)?;
    let index = LexicalIndex::build(&store);
    let config = PipelineConfigBuilder::new()
        .candidate_count(DEMO_CANDIDATES)
        .build()
        .map_err(|e| crate::error::CliError::Config(e.to_string()))?;

    for (i, mutation) in DEMO_MUTATIONS.iter().copied().enumerate() {
        info!(mutation = %mutation, "demo run {}/{}", i + 1, DEMO_MUTATIONS.len());
        println!("\n=== {mutation} ===");
        let seed = args.seed.map(|s| s + i as u64);
        let report = design::execute(&index, mutation, &config, seed)?;
        let path = design::persist_report(&args.report_dir, &report)?;
        design::render_report(&report);
        println!("\nReport saved to {}", path.display());
    }
    Ok(())
}

use crate::cli::DesignArgs;
use crate::config::FileConfig;
use crate::data::RecordStore;
use crate::error::{CliError, Result};
use crate::index::LexicalIndex;
use crate::progress::CliProgressHandler;
use rand::SeedableRng;
use rand::rngs::StdRng;
use resistaid::engine::config::{DesignTables, PipelineConfig};
use resistaid::engine::progress::ProgressReporter;
use resistaid::workflows::design::{self, Report};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

pub fn run(args: DesignArgs) -> Result<()> {
    let file_config = match &args.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    let config = file_config.into_pipeline_config(args.candidates)?;

    info!("Loading datasets from {:?}", &args.data_dir);
    let store = RecordStore::load(&args.data_dir)?;
    let index = LexicalIndex::build(&store);

    let report = execute(&index, &args.mutation, &config, args.seed)?;
    let path = persist_report(&args.report_dir, &report)?;

    render_report(&report);
    println!("\nReport saved to {}", path.display());
    Ok(())
}

/// Runs one pipeline invocation against an already-built index.
pub fn execute(
    index: &LexicalIndex,
    mutation: &str,
    config: &PipelineConfig,
    seed: Option<u64>,
) -> Result<Report> {
    let tables = DesignTables::default();
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(handler.callback());

    println!("Designing {} candidate(s) for {mutation}...", config.candidate_count);
    let report = design::run(index, mutation, config, &tables, &mut rng, &reporter)?;
    info!(
        top_score = report.summary.top_score,
        "design run finished"
    );
    Ok(report)
}

pub fn persist_report(report_dir: &Path, report: &Report) -> Result<PathBuf> {
    std::fs::create_dir_all(report_dir)?;
    let path = report_dir.join(format!("report_{}.json", report.id));
    let file = File::create(&path).map_err(|e| CliError::ReportWrite {
        path: path.clone(),
        source: anyhow::Error::from(e),
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), report).map_err(|e| {
        CliError::ReportWrite {
            path: path.clone(),
            source: anyhow::Error::from(e),
        }
    })?;
    Ok(path)
}

pub fn render_report(report: &Report) {
    println!("\nMutation: {}", report.mutation);
    println!(
        "Candidates generated: {}",
        report.summary.candidates_generated
    );
    println!("Evidence score: {:.3}", report.evidence_found.evidence_score);
    println!(
        "Evidence found: {} similar mutation(s), {} paper(s)",
        report.evidence_found.similar_mutations, report.evidence_found.relevant_papers
    );
    println!("Top combined score: {:.3}", report.summary.top_score);
    println!(
        "Average feasibility: {:.3}",
        report.summary.average_feasibility
    );

    println!("\nTop candidates:");
    for (rank, ranked) in report.top_candidates.iter().enumerate() {
        println!("  #{}: {}", rank + 1, ranked.candidate.id);
        println!("     Combined score:    {:.3}", ranked.combined_score);
        println!(
            "     Design confidence: {:.3}",
            ranked.candidate.metrics.confidence
        );
        println!(
            "     Feasibility:       {:.3} ({})",
            ranked.feasibility.score, ranked.feasibility.category
        );
        println!(
            "     Support:           {:.3} ({:?})",
            ranked.evidence.support_score, ranked.evidence.confidence
        );
        println!("     Loop3:             {}", ranked.candidate.loop3);
        if let Some(issue) = ranked.feasibility.issues().next() {
            println!("     Issue:             {issue}");
        }
    }

    println!("\nRecommendations:");
    for recommendation in &report.recommendations {
        println!("  - {recommendation}");
    }
}

//! Optional TOML run configuration.
//!
//! The file may override the candidate count and the ranking weights;
//! anything left out keeps the library defaults. An explicit `--candidates`
//! on the command line always wins over the file.

use crate::error::{CliError, Result};
use resistaid::engine::config::{PipelineConfig, PipelineConfigBuilder, RankingWeights};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub candidates: Option<usize>,
    pub weights: Option<FileWeights>,
}

#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(deny_unknown_fields)]
pub struct FileWeights {
    pub support: f64,
    pub evidence: f64,
    pub design: f64,
    pub feasibility: f64,
}

impl From<FileWeights> for RankingWeights {
    fn from(w: FileWeights) -> Self {
        Self {
            support: w.support,
            evidence: w.evidence,
            design: w.design,
            feasibility: w.feasibility,
        }
    }
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: FileConfig = toml::from_str(&content)
            .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;
        debug!(?config, "run configuration loaded");
        Ok(config)
    }

    /// Folds the file values and the CLI override into a validated
    /// [`PipelineConfig`].
    pub fn into_pipeline_config(self, cli_candidates: Option<usize>) -> Result<PipelineConfig> {
        let mut builder = PipelineConfigBuilder::new();
        if let Some(count) = cli_candidates.or(self.candidates) {
            builder = builder.candidate_count(count);
        }
        if let Some(weights) = self.weights {
            builder = builder.weights(weights.into());
        }
        builder
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }
}

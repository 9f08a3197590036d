//! Normalized tabular dataset loading.
//!
//! The pipeline consumes three already-normalized CSV files from the data
//! directory: `mutations.csv`, `antibodies.csv`, and `abstracts.csv`. This
//! module only parses them into the core record types; acquisition and
//! normalization of the raw sources happen upstream.

use crate::error::{CliError, Result};
use anyhow::Context;
use resistaid::core::models::mutation::MutationRecord;
use resistaid::core::retrieval::{AbstractRecord, AntibodyRecord};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize)]
struct MutationRow {
    mutation_id: String,
    domain: String,
    clinical_significance: String,
}

#[derive(Debug, Deserialize)]
struct AntibodyRow {
    antibody_id: String,
    name: String,
    loop3: String,
    affinity_nm: Option<f64>,
    source: String,
}

#[derive(Debug, Deserialize)]
struct AbstractRow {
    pmid: String,
    title: String,
    abstract_text: String,
    year: Option<u16>,
    /// Semicolon-separated mutation identifiers.
    mutations: String,
}

/// In-memory copy of the normalized datasets.
#[derive(Debug, Default)]
pub struct RecordStore {
    pub mutations: Vec<MutationRecord>,
    pub antibodies: Vec<AntibodyRecord>,
    pub abstracts: Vec<AbstractRecord>,
}

impl RecordStore {
    pub fn load(data_dir: &Path) -> Result<Self> {
        let mutations = read_rows::<MutationRow>(&data_dir.join("mutations.csv"))?
            .into_iter()
            .map(|row| MutationRecord {
                id: row.mutation_id,
                domain: row.domain,
                clinical_significance: row.clinical_significance,
            })
            .collect::<Vec<_>>();

        let antibodies = read_rows::<AntibodyRow>(&data_dir.join("antibodies.csv"))?
            .into_iter()
            .map(|row| AntibodyRecord {
                id: row.antibody_id,
                name: row.name,
                loop3: row.loop3,
                affinity_nm: row.affinity_nm,
                source: row.source,
            })
            .collect::<Vec<_>>();

        let abstracts = read_rows::<AbstractRow>(&data_dir.join("abstracts.csv"))?
            .into_iter()
            .map(|row| AbstractRecord {
                id: row.pmid,
                title: row.title,
                text: row.abstract_text,
                year: row.year,
                mutations: row
                    .mutations
                    .split(';')
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
                    .collect(),
            })
            .collect::<Vec<_>>();

        info!(
            mutations = mutations.len(),
            antibodies = antibodies.len(),
            abstracts = abstracts.len(),
            "datasets loaded"
        );

        Ok(Self {
            mutations,
            antibodies,
            abstracts,
        })
    }
}

fn read_rows<T: for<'de> Deserialize<'de>>(path: &PathBuf) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| CliError::DataLoad {
        path: path.clone(),
        source: anyhow::Error::from(e),
    })?;

    reader
        .deserialize()
        .enumerate()
        .map(|(line, row)| {
            row.with_context(|| format!("record {}", line + 1))
                .map_err(|e| CliError::DataLoad {
                    path: path.clone(),
                    source: e,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_datasets(dir: &Path) {
        fs::write(
            dir.join("mutations.csv"),
            "mutation_id,domain,clinical_significance\n\
             L755S,Kinase domain,Resistance\n\
             T798I,Kinase domain,Resistance\n",
        )
        .unwrap();
        fs::write(
            dir.join("antibodies.csv"),
            "antibody_id,name,loop3,affinity_nm,source\n\
             AB001,trastuzumab,SRWGGDGFYAMDY,5.0,therapeutic\n\
             AB002,pertuzumab,ARNLGPSFYFDY,,therapeutic\n",
        )
        .unwrap();
        fs::write(
            dir.join("abstracts.csv"),
            "pmid,title,abstract_text,year,mutations\n\
             12345,HER2 resistance,The L755S mutation reduced binding.,2021,L755S;T798I\n",
        )
        .unwrap();
    }

    #[test]
    fn load_parses_all_three_datasets() {
        let dir = tempfile::tempdir().unwrap();
        write_datasets(dir.path());

        let store = RecordStore::load(dir.path()).unwrap();
        assert_eq!(store.mutations.len(), 2);
        assert_eq!(store.antibodies.len(), 2);
        assert_eq!(store.abstracts.len(), 1);

        assert_eq!(store.mutations[0].id, "L755S");
        assert_eq!(store.antibodies[1].affinity_nm, None);
        assert_eq!(store.abstracts[0].mutations, vec!["L755S", "T798I"]);
    }

    #[test]
    fn missing_file_is_a_data_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = RecordStore::load(dir.path());
        assert!(matches!(result, Err(CliError::DataLoad { .. })));
    }

    #[test]
    fn malformed_rows_are_rejected_with_context() {
        let dir = tempfile::tempdir().unwrap();
        write_datasets(dir.path());
        fs::write(
            dir.path().join("antibodies.csv"),
            "antibody_id,name,loop3,affinity_nm,source\n\
             AB001,trastuzumab,SRWGGDGFYAMDY,not-a-number,therapeutic\n",
        )
        .unwrap();

        let result = RecordStore::load(dir.path());
        assert!(matches!(result, Err(CliError::DataLoad { .. })));
    }
}

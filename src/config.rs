//! Solver configuration file (TOML).
//!
//! ```toml
//! [search]
//! coverage = "best"
//! optional_labs = false
//! max_solutions = 20
//!
//! [output]
//! format = "json"
//! ```
use crate::model::SearchOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    pub search: SearchOptions,
    pub output: OutputConfig,
}

impl SolverConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("invalid solver configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coverage;

    #[test]
    fn empty_file_gives_defaults() {
        let config = SolverConfig::from_toml_str("").unwrap();
        assert_eq!(config, SolverConfig::default());
        assert_eq!(config.search.coverage, Coverage::Full);
        assert!(!config.search.optional_labs);
    }

    #[test]
    fn reads_search_and_output_tables() {
        let config = SolverConfig::from_toml_str(
            r#"
            [search]
            coverage = "best"
            optional_exams = true
            max_solutions = 5

            [output]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.search.coverage, Coverage::Best);
        assert!(config.search.optional_exams);
        assert_eq!(config.search.max_solutions, Some(5));
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(SolverConfig::from_toml_str("[search]\nparallel = true\n").is_err());
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solver.toml");
        std::fs::write(&path, "[search]\noptional_labs = true\n").unwrap();
        assert!(SolverConfig::load(&path).unwrap().search.optional_labs);
        assert!(SolverConfig::load(&dir.path().join("missing.toml")).is_err());
    }
}

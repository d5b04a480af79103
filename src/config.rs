//! Pipeline configuration.
//!
//! Every stage reads its settings from a [`PipelineConfig`] passed in
//! explicitly. Defaults match the reference bacterial workflow and can be
//! overridden from a JSON file (`--config`) and then by individual CLI flags.
//!
//! ```json
//! {
//!   "min_genomes": 20,
//!   "threads": 8,
//!   "entrez_email": "someone@example.org",
//!   "astral_jar": "/opt/astral/astral.5.7.8.jar"
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default minimum number of genomes an ortholog family must cover
pub const DEFAULT_MIN_GENOMES: usize = 26;

/// Default worker pool size
pub const DEFAULT_THREADS: usize = 4;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Minimum distinct genomes for an accepted ortholog family
    pub min_genomes: usize,

    /// Worker threads for parallel units
    pub threads: usize,

    /// Contact email sent with NCBI Entrez requests
    pub entrez_email: Option<String>,

    /// Tool name sent with NCBI Entrez requests
    pub entrez_tool: String,

    /// Pause between organisms during proteome download
    pub request_delay_ms: u64,

    pub mmseqs: String,
    pub mafft: String,
    pub fasttree: String,
    pub iqtree: String,
    pub astral: String,
    pub java: String,

    /// ASTRAL jar; when set, ASTRAL runs via `java -jar` instead of `astral`
    pub astral_jar: Option<PathBuf>,

    /// Java heap for ASTRAL (`-Xmx` value)
    pub astral_memory: String,

    /// ASTRAL `-t` annotation mode
    pub astral_branch_mode: u8,

    /// MMseqs2 `--min-seq-id`
    pub min_seq_id: f64,

    /// MMseqs2 `-c`
    pub min_coverage: f64,

    /// MMseqs2 search `-e`
    pub evalue: f64,

    /// MMseqs2 `--cluster-mode`
    pub cluster_mode: u8,

    /// MMseqs2 `--cov-mode`
    pub cov_mode: u8,

    pub mafft_args: Vec<String>,
    pub fasttree_args: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_genomes: DEFAULT_MIN_GENOMES,
            threads: DEFAULT_THREADS,
            entrez_email: None,
            entrez_tool: "orthotree".to_string(),
            request_delay_ms: 1000,
            mmseqs: "mmseqs".to_string(),
            mafft: "mafft".to_string(),
            fasttree: "FastTree".to_string(),
            iqtree: "iqtree".to_string(),
            astral: "astral".to_string(),
            java: "java".to_string(),
            astral_jar: None,
            astral_memory: "8g".to_string(),
            astral_branch_mode: 2,
            min_seq_id: 0.8,
            min_coverage: 0.8,
            evalue: 1e-5,
            cluster_mode: 2,
            cov_mode: 3,
            mafft_args: vec!["--auto".to_string()],
            fasttree_args: vec!["-gamma".to_string(), "-lg".to_string()],
        }
    }
}

impl PipelineConfig {
    /// Load a config from a JSON file; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, is not valid JSON,
    /// contains unknown fields, or fails validation.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// # Errors
    ///
    /// Returns `ConfigError` if the JSON is invalid or fails validation.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` describing the first bad setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threads == 0 {
            return Err(ConfigError::Invalid("threads must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.min_seq_id) {
            return Err(ConfigError::Invalid(format!(
                "min_seq_id must be between 0 and 1, got {}",
                self.min_seq_id
            )));
        }
        if !(0.0..=1.0).contains(&self.min_coverage) {
            return Err(ConfigError::Invalid(format!(
                "min_coverage must be between 0 and 1, got {}",
                self.min_coverage
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.min_genomes, 26);
        assert_eq!(config.threads, 4);
        assert_eq!(config.mafft_args, vec!["--auto"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = PipelineConfig::from_json(r#"{"min_genomes": 3, "threads": 2}"#).unwrap();
        assert_eq!(config.min_genomes, 3);
        assert_eq!(config.threads, 2);
        assert_eq!(config.fasttree, "FastTree");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = PipelineConfig::from_json(r#"{"min_genome": 3}"#).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            PipelineConfig::from_json(r#"{"threads": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            PipelineConfig::from_json(r#"{"min_seq_id": 1.5}"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = PipelineConfig::default();
        config.entrez_email = Some("someone@example.org".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(PipelineConfig::from_json(&json).unwrap(), config);
    }
}

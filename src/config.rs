//! Configuration
//!
//! `ClaimNetConfig` is read from YAML, then overridden from the environment
//! (`CLAIMNET_PORT`, `CLAIMNET_K_CLIQUE`, `CLAIMNET_SEED`) and validated.

use crate::dataset::{DatasetSource, Preset};
use crate::external::{FileSignalSource, SignalSource, SimulatedSignalSource};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

pub const ENV_PORT: &str = "CLAIMNET_PORT";
pub const ENV_K_CLIQUE: &str = "CLAIMNET_K_CLIQUE";
pub const ENV_SEED: &str = "CLAIMNET_SEED";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parse error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimNetConfig {
    pub analysis: AnalysisConfig,
    pub dataset: DatasetConfig,
    pub server: ServerConfig,
    pub status: StatusConfig,
}

/// Weights of the three centrality measures; must sum to 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CentralityWeights {
    pub degree: f64,
    pub betweenness: f64,
    pub eigenvector: f64,
}

impl Default for CentralityWeights {
    fn default() -> Self {
        Self {
            degree: 0.4,
            betweenness: 0.3,
            eigenvector: 0.3,
        }
    }
}

impl CentralityWeights {
    pub fn sum(&self) -> f64 {
        self.degree + self.betweenness + self.eigenvector
    }
}

/// Weights of the ensemble score. Not normalized: operators tune them freely.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnsembleWeights {
    pub network: f64,
    pub external: f64,
}

impl Default for EnsembleWeights {
    fn default() -> Self {
        Self {
            network: 0.6,
            external: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Minimum clique size for community percolation
    pub k_clique: usize,
    pub centrality: CentralityWeights,
    pub ensemble: EnsembleWeights,
    pub eigenvector_max_iterations: usize,
    pub eigenvector_tolerance: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            k_clique: 3,
            centrality: CentralityWeights::default(),
            ensemble: EnsembleWeights::default(),
            eigenvector_max_iterations: 100,
            eigenvector_tolerance: 1.0e-6,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.k_clique < 2 {
            return Err(ConfigError::Invalid(format!(
                "k_clique must be at least 2, got {}",
                self.k_clique
            )));
        }

        let c = &self.centrality;
        let e = &self.ensemble;
        for (name, w) in [
            ("centrality.degree", c.degree),
            ("centrality.betweenness", c.betweenness),
            ("centrality.eigenvector", c.eigenvector),
            ("ensemble.network", e.network),
            ("ensemble.external", e.external),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, w
                )));
            }
        }

        if (c.sum() - 1.0).abs() > 1.0e-6 {
            return Err(ConfigError::Invalid(format!(
                "centrality weights must sum to 1, got {}",
                c.sum()
            )));
        }

        if self.eigenvector_max_iterations == 0 || !(self.eigenvector_tolerance > 0.0) {
            return Err(ConfigError::Invalid(
                "eigenvector iteration cap and tolerance must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    Fixture,
    Synthetic,
    File,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub source: DatasetKind,
    /// Synthetic network size
    pub preset: Preset,
    /// Seed for synthetic generation and simulated signals
    pub seed: u64,
    /// Dataset JSON file, required when `source` is `file`
    pub path: Option<PathBuf>,
    /// Directory holding external signal tables; simulated when unset
    pub input_dir: Option<PathBuf>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            source: DatasetKind::Fixture,
            preset: Preset::Demo,
            seed: 42,
            path: None,
            input_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    /// Status log file; `None` keeps the history in memory
    pub log_path: Option<PathBuf>,
}

impl ClaimNetConfig {
    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&text)
    }

    /// File (or defaults), then process environment, then validation
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(p) => {
                info!(path = %p.display(), "Loading configuration");
                Self::from_yaml_file(p)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_PORT) {
            self.server.port = parse_env(ENV_PORT, &value)?;
        }
        if let Some(value) = lookup(ENV_K_CLIQUE) {
            self.analysis.k_clique = parse_env(ENV_K_CLIQUE, &value)?;
        }
        if let Some(value) = lookup(ENV_SEED) {
            self.dataset.seed = parse_env(ENV_SEED, &value)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.analysis.validate()?;
        if self.dataset.source == DatasetKind::File && self.dataset.path.is_none() {
            return Err(ConfigError::Invalid(
                "dataset.path is required when dataset.source is file".to_string(),
            ));
        }
        Ok(())
    }

    pub fn dataset_source(&self) -> ConfigResult<DatasetSource> {
        match self.dataset.source {
            DatasetKind::Fixture => Ok(DatasetSource::Fixture),
            DatasetKind::Synthetic => Ok(DatasetSource::Synthetic {
                preset: self.dataset.preset,
                seed: self.dataset.seed,
            }),
            DatasetKind::File => self
                .dataset
                .path
                .clone()
                .map(DatasetSource::File)
                .ok_or_else(|| ConfigError::Invalid("dataset.path is not set".to_string())),
        }
    }

    pub fn signal_source(&self) -> Arc<dyn SignalSource> {
        match &self.dataset.input_dir {
            Some(dir) => Arc::new(FileSignalSource::new(dir.clone(), self.dataset.seed)),
            None => Arc::new(SimulatedSignalSource::new(self.dataset.seed)),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.address, self.server.port)
    }
}

fn parse_env<T: std::str::FromStr>(var: &'static str, value: &str) -> ConfigResult<T> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        var,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = ClaimNetConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.analysis.k_clique, 3);
        assert_eq!(config.analysis.ensemble.network, 0.6);
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
analysis:
  k_clique: 4
  ensemble:
    network: 0.7
    external: 0.5
dataset:
  source: synthetic
  preset: client_presentation
"#;
        let config = ClaimNetConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.analysis.k_clique, 4);
        assert_eq!(config.analysis.centrality, CentralityWeights::default());
        assert_eq!(config.analysis.ensemble.external, 0.5);
        assert_eq!(
            config.dataset_source().unwrap(),
            DatasetSource::Synthetic {
                preset: Preset::ClientPresentation,
                seed: 42
            }
        );
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_yaml_roundtrip_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("claimnet.yaml");
        let mut config = ClaimNetConfig::default();
        config.status.log_path = Some(dir.path().join("status.log"));
        std::fs::write(&path, config.to_yaml().unwrap()).unwrap();

        assert_eq!(ClaimNetConfig::from_yaml_file(&path).unwrap(), config);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [(ENV_PORT, "8088"), (ENV_K_CLIQUE, "2"), (ENV_SEED, " 7 ")]
            .into_iter()
            .collect();
        let mut config = ClaimNetConfig::default();
        config
            .apply_overrides(|v| vars.get(v).map(|s| s.to_string()))
            .unwrap();

        assert_eq!(config.server.port, 8088);
        assert_eq!(config.analysis.k_clique, 2);
        assert_eq!(config.dataset.seed, 7);
    }

    #[test]
    fn test_bad_env_value() {
        let mut config = ClaimNetConfig::default();
        let result = config.apply_overrides(|v| (v == ENV_PORT).then(|| "eighty".to_string()));
        assert!(matches!(result, Err(ConfigError::InvalidEnv { var: ENV_PORT, .. })));
    }

    #[test]
    fn test_validation_rules() {
        let mut config = ClaimNetConfig::default();
        config.analysis.k_clique = 1;
        assert!(config.validate().is_err());

        let mut config = ClaimNetConfig::default();
        config.analysis.centrality.degree = 0.5;
        assert!(config.validate().is_err());

        let mut config = ClaimNetConfig::default();
        config.analysis.ensemble.external = f64::NAN;
        assert!(config.validate().is_err());

        // Ensemble weights need not sum to 1
        let mut config = ClaimNetConfig::default();
        config.analysis.ensemble = EnsembleWeights {
            network: 1.0,
            external: 1.0,
        };
        assert!(config.validate().is_ok());

        let mut config = ClaimNetConfig::default();
        config.dataset.source = DatasetKind::File;
        assert!(config.validate().is_err());
    }
}

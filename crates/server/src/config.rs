//! Service configuration

use anyhow::{Context, Result};
use optimizer_lib::{AnalyzerConfig, DecisionPolicy, FitnessPolicy, SearchParams};
use serde::Deserialize;
use std::time::Duration;

/// Service configuration, read from `OPTIMIZER_*` environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Name reported in structured logs
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Path to the instance catalog JSON export
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Port for the optimize, health and metrics endpoints
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Wall-clock budget for one optimization request
    #[serde(default = "default_run_timeout_ms")]
    pub run_timeout_ms: u64,

    /// Fitness policy for requests that do not carry search parameters
    #[serde(default)]
    pub fitness_policy: FitnessPolicy,

    /// Absolute hourly savings a downgrade must exceed; strict when unset
    #[serde(default)]
    pub savings_threshold: Option<f64>,
}

fn default_service_name() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "cost-optimizer".to_string())
}

fn default_catalog_path() -> String {
    "catalogs/t3.json".to_string()
}

fn default_api_port() -> u16 {
    8080
}

fn default_run_timeout_ms() -> u64 {
    10_000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            catalog_path: default_catalog_path(),
            api_port: default_api_port(),
            run_timeout_ms: default_run_timeout_ms(),
            fitness_policy: FitnessPolicy::default(),
            savings_threshold: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = ::config::Config::builder()
            .add_source(::config::Environment::with_prefix("OPTIMIZER").try_parsing(true))
            .build()
            .context("Failed to read OPTIMIZER_* environment")?;

        config
            .try_deserialize()
            .context("Invalid OPTIMIZER_* configuration")
    }

    pub fn run_timeout(&self) -> Duration {
        Duration::from_millis(self.run_timeout_ms)
    }

    /// Analyzer defaults derived from this configuration
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        let decision_policy = match self.savings_threshold {
            Some(threshold) => DecisionPolicy::Material { threshold },
            None => DecisionPolicy::Strict,
        };
        AnalyzerConfig {
            decision_policy,
            search: SearchParams {
                fitness_policy: self.fitness_policy,
                ..SearchParams::default()
            },
        }
    }
}

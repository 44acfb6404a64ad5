//! Error types for catalog handling, configuration lookup and search setup.

use thiserror::Error;

/// Problems with the instance catalog itself. Always fatal.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("catalog is empty")]
    Empty,

    #[error("catalog record {index} is missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("catalog record {index} ({id}) has non-positive {field}: {value}")]
    NonPositive {
        index: usize,
        id: String,
        field: &'static str,
        value: f64,
    },

    #[error("duplicate instance type in catalog: {0}")]
    DuplicateInstance(String),

    #[error("failed to parse catalog: {0}")]
    Parse(String),

    #[error("failed to read catalog {path}: {message}")]
    Io { path: String, message: String },
}

/// A configuration that does not line up with the catalog.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("unknown instance type: {0}")]
    UnknownInstance(String),
}

/// Umbrella error for optimization requests.
#[derive(Debug, Error, PartialEq)]
pub enum OptimizerError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Recoverable; the analyzer turns this into an `Upgrade` decision.
    #[error("no instance combination provides {vcpus} vCPUs and {memory_gib} GiB")]
    InfeasibleRequirement { vcpus: u32, memory_gib: f64 },

    #[error("search deadline reached after {generations} generations")]
    DeadlineExceeded { generations: u32 },

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

pub type OptimizerResult<T> = Result<T, OptimizerError>;

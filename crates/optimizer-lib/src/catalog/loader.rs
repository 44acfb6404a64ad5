//! Catalog parsing from the JSON instance-type export
//!
//! The export is an array of records keyed `instance_type`, `vCPUs`,
//! `memory_GiB` and `on_demand_hourly_price_usd`. Unknown keys are ignored
//! and record order is preserved.

use super::Catalog;
use crate::error::CatalogError;
use crate::models::InstanceSpec;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// One raw record of the catalog export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub instance_type: Option<String>,
    #[serde(rename = "vCPUs")]
    pub vcpus: Option<i64>,
    #[serde(rename = "memory_GiB")]
    pub memory_gib: Option<f64>,
    pub on_demand_hourly_price_usd: Option<f64>,
}

impl CatalogRecord {
    fn into_spec(self, index: usize) -> Result<InstanceSpec, CatalogError> {
        let missing = |field| CatalogError::MissingField { index, field };
        let id = self.instance_type.ok_or(missing("instance_type"))?;
        let vcpus = self.vcpus.ok_or(missing("vCPUs"))?;
        let memory_gib = self.memory_gib.ok_or(missing("memory_GiB"))?;
        let hourly_price = self
            .on_demand_hourly_price_usd
            .ok_or(missing("on_demand_hourly_price_usd"))?;

        let vcpus = u32::try_from(vcpus)
            .ok()
            .filter(|v| *v > 0)
            .ok_or_else(|| CatalogError::NonPositive {
                index,
                id: id.clone(),
                field: "vCPUs",
                value: vcpus as f64,
            })?;

        Ok(InstanceSpec {
            id,
            vcpus,
            memory_gib,
            hourly_price,
        })
    }
}

impl Catalog {
    /// Validate raw records into a catalog
    pub fn from_records(records: Vec<CatalogRecord>) -> Result<Self, CatalogError> {
        let instances = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| record.into_spec(i))
            .collect::<Result<Vec<_>, _>>()?;
        Catalog::new(instances)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        parse_catalog(json)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        load_catalog(path)
    }
}

/// Parse a catalog from the JSON export
pub fn parse_catalog(json: &str) -> Result<Catalog, CatalogError> {
    let records: Vec<CatalogRecord> =
        serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
    Catalog::from_records(records)
}

/// Read and parse a catalog file
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let catalog = parse_catalog(&content)?;
    debug!(path = %path.display(), instances = catalog.len(), "Catalog parsed");
    Ok(catalog)
}

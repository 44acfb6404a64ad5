//! Instance catalog
//!
//! An immutable, ordered set of instance types with a precomputed id index.
//! Every lookup in the search hot path goes through the index rather than
//! scanning the instance list.

mod loader;

pub use loader::{load_catalog, parse_catalog, CatalogRecord};

use crate::error::{CatalogError, ConfigurationError};
use crate::models::{Configuration, InstanceSpec, ResourceTotals};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Validated, read-only list of instance types
#[derive(Debug, Clone)]
pub struct Catalog {
    instances: Vec<InstanceSpec>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting empty input, duplicates and non-positive fields
    pub fn new(instances: Vec<InstanceSpec>) -> Result<Self, CatalogError> {
        if instances.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut index = HashMap::with_capacity(instances.len());
        for (i, spec) in instances.iter().enumerate() {
            check_positive(i, &spec.id, "vCPUs", spec.vcpus as f64)?;
            check_positive(i, &spec.id, "memory_GiB", spec.memory_gib)?;
            check_positive(i, &spec.id, "on_demand_hourly_price_usd", spec.hourly_price)?;

            if index.insert(spec.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateInstance(spec.id.clone()));
            }
        }

        Ok(Self { instances, index })
    }

    pub fn instances(&self) -> &[InstanceSpec] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&InstanceSpec> {
        self.index.get(id).map(|&i| &self.instances[i])
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Look up an id, treating an unknown id as a caller error
    pub fn resolve(&self, id: &str) -> Result<&InstanceSpec, ConfigurationError> {
        self.get(id)
            .ok_or_else(|| ConfigurationError::UnknownInstance(id.to_string()))
    }

    /// Aggregate vCPUs, memory and hourly cost of a configuration
    pub fn totals(&self, config: &Configuration) -> Result<ResourceTotals, ConfigurationError> {
        let mut totals = ResourceTotals::default();
        for (id, count) in config.iter() {
            let spec = self.resolve(id)?;
            accumulate(&mut totals, spec, count);
        }
        Ok(totals)
    }

    /// Hourly cost of a configuration
    pub fn cost(&self, config: &Configuration) -> Result<f64, ConfigurationError> {
        Ok(self.totals(config)?.hourly_cost)
    }

    /// Aggregate totals for a count vector aligned with catalog order
    pub fn totals_for_counts(&self, counts: &[u32]) -> ResourceTotals {
        let mut totals = ResourceTotals::default();
        for (spec, &count) in self.instances.iter().zip(counts) {
            accumulate(&mut totals, spec, count);
        }
        totals
    }

    /// Convert a configuration into a count vector aligned with catalog order
    pub fn counts_of(&self, config: &Configuration) -> Result<Vec<u32>, ConfigurationError> {
        let mut counts = vec![0; self.instances.len()];
        for (id, count) in config.iter() {
            let i = self
                .index_of(id)
                .ok_or_else(|| ConfigurationError::UnknownInstance(id.to_string()))?;
            counts[i] = count;
        }
        Ok(counts)
    }

    /// Convert a count vector back into a configuration keyed by instance id
    pub fn configuration_from_counts(&self, counts: &[u32]) -> Configuration {
        self.instances
            .iter()
            .zip(counts)
            .map(|(spec, &count)| (spec.id.clone(), count))
            .collect()
    }

    /// SHA-256 over the ordered instance list, hex encoded
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for spec in &self.instances {
            hasher.update(spec.id.as_bytes());
            hasher.update([0u8]);
            hasher.update(spec.vcpus.to_le_bytes());
            hasher.update(spec.memory_gib.to_bits().to_le_bytes());
            hasher.update(spec.hourly_price.to_bits().to_le_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

fn accumulate(totals: &mut ResourceTotals, spec: &InstanceSpec, count: u32) {
    totals.vcpus += spec.vcpus as u64 * count as u64;
    totals.memory_gib += spec.memory_gib * count as f64;
    totals.hourly_cost += spec.hourly_price * count as f64;
}

fn check_positive(
    index: usize,
    id: &str,
    field: &'static str,
    value: f64,
) -> Result<(), CatalogError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CatalogError::NonPositive {
            index,
            id: id.to_string(),
            field,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(id: &str, vcpus: u32, memory_gib: f64, hourly_price: f64) -> InstanceSpec {
        InstanceSpec {
            id: id.to_string(),
            vcpus,
            memory_gib,
            hourly_price,
        }
    }

    fn two_type_catalog() -> Catalog {
        Catalog::new(vec![spec("A", 2, 4.0, 0.10), spec("B", 4, 8.0, 0.20)]).unwrap()
    }

    #[test]
    fn test_cost_is_literal_sum() {
        let catalog = two_type_catalog();
        let mut config = Configuration::new();
        config.set("A", 2);
        config.set("B", 1);

        let totals = catalog.totals(&config).unwrap();
        assert!((totals.hourly_cost - 0.40).abs() < 1e-12);
        assert_eq!(totals.vcpus, 8);
        assert_eq!(totals.memory_gib, 16.0);
    }

    #[test]
    fn test_unknown_instance_is_error() {
        let catalog = two_type_catalog();
        let config = Configuration::single("Z", 1);
        assert_eq!(
            catalog.totals(&config),
            Err(ConfigurationError::UnknownInstance("Z".to_string()))
        );
        assert!(catalog.counts_of(&config).is_err());
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert_eq!(Catalog::new(vec![]).unwrap_err(), CatalogError::Empty);
    }

    #[test]
    fn test_non_positive_fields_rejected() {
        assert!(Catalog::new(vec![spec("A", 0, 4.0, 0.1)]).is_err());
        assert!(Catalog::new(vec![spec("A", 2, 0.0, 0.1)]).is_err());
        assert!(Catalog::new(vec![spec("A", 2, 4.0, -0.1)]).is_err());
        assert!(Catalog::new(vec![spec("A", 2, 4.0, f64::NAN)]).is_err());
    }

    #[test]
    fn test_duplicate_rejected() {
        let err = Catalog::new(vec![spec("A", 2, 4.0, 0.1), spec("A", 4, 8.0, 0.2)]).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateInstance("A".to_string()));
    }

    #[test]
    fn test_counts_roundtrip_through_index() {
        let catalog = two_type_catalog();
        let config = Configuration::single("B", 3);
        let counts = catalog.counts_of(&config).unwrap();
        assert_eq!(counts, vec![0, 3]);

        let back = catalog.configuration_from_counts(&counts);
        assert_eq!(back.get("B"), 3);
        assert_eq!(back.get("A"), 0);
        assert_eq!(catalog.totals_for_counts(&counts).vcpus, 12);
    }

    #[test]
    fn test_fingerprint_depends_on_order() {
        let a = two_type_catalog();
        let b = Catalog::new(vec![spec("B", 4, 8.0, 0.20), spec("A", 2, 4.0, 0.10)]).unwrap();
        assert_eq!(a.fingerprint(), two_type_catalog().fingerprint());
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }
}

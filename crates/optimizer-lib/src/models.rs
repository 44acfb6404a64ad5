//! Core data models for the cost optimizer

use crate::error::{OptimizerError, OptimizerResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A purchasable instance type from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceSpec {
    pub id: String,
    pub vcpus: u32,
    pub memory_gib: f64,
    pub hourly_price: f64,
}

/// Resources a configuration must cover
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceRequirement {
    pub vcpus: u32,
    pub memory_gib: f64,
}

impl ResourceRequirement {
    pub fn new(vcpus: u32, memory_gib: f64) -> OptimizerResult<Self> {
        let requirement = Self { vcpus, memory_gib };
        requirement.validate()?;
        Ok(requirement)
    }

    /// Derive a requirement from observed utilization of the current footprint.
    ///
    /// Each dimension is `floor(percent / 100 * current)`, so a deployment
    /// running at 65% CPU on 8 vCPUs needs 5 vCPUs.
    pub fn from_utilization(
        current: &ResourceTotals,
        cpu_percent: f64,
        memory_percent: f64,
    ) -> OptimizerResult<Self> {
        for (name, pct) in [("cpu", cpu_percent), ("memory", memory_percent)] {
            if !(0.0..=100.0).contains(&pct) {
                return Err(OptimizerError::InvalidParameters(format!(
                    "{} utilization must be within 0..=100, got {}",
                    name, pct
                )));
            }
        }

        let vcpus = ((cpu_percent / 100.0) * current.vcpus as f64).floor() as u32;
        let memory_gib = ((memory_percent / 100.0) * current.memory_gib).floor();
        Self::new(vcpus, memory_gib)
    }

    pub fn validate(&self) -> OptimizerResult<()> {
        if !self.memory_gib.is_finite() || self.memory_gib < 0.0 {
            return Err(OptimizerError::InvalidParameters(format!(
                "required memory must be a non-negative number, got {}",
                self.memory_gib
            )));
        }
        Ok(())
    }
}

/// Aggregate resources and hourly cost of a configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceTotals {
    pub vcpus: u64,
    pub memory_gib: f64,
    pub hourly_cost: f64,
}

impl ResourceTotals {
    /// True when both dimensions meet or exceed the requirement
    pub fn satisfies(&self, requirement: &ResourceRequirement) -> bool {
        self.vcpus >= requirement.vcpus as u64 && self.memory_gib >= requirement.memory_gib
    }

    /// Resources still missing (positive) or in excess (negative)
    pub fn delta_to(&self, requirement: &ResourceRequirement) -> ResourceDelta {
        ResourceDelta {
            vcpus: requirement.vcpus as i64 - self.vcpus as i64,
            memory_gib: requirement.memory_gib - self.memory_gib,
        }
    }
}

/// Signed difference between required and provided resources
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceDelta {
    pub vcpus: i64,
    pub memory_gib: f64,
}

/// Instance type id to unit count
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration {
    counts: BTreeMap<String, u32>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(id: impl Into<String>, count: u32) -> Self {
        let mut config = Self::new();
        config.set(id, count);
        config
    }

    pub fn set(&mut self, id: impl Into<String>, count: u32) {
        self.counts.insert(id.into(), count);
    }

    pub fn get(&self, id: &str) -> u32 {
        self.counts.get(id).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(id, count)| (id.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total_units(&self) -> u64 {
        self.counts.values().map(|c| *c as u64).sum()
    }

    /// Copy of this configuration without zero-count entries
    pub fn without_zero_counts(&self) -> Self {
        Self {
            counts: self
                .counts
                .iter()
                .filter(|(_, count)| **count > 0)
                .map(|(id, count)| (id.clone(), *count))
                .collect(),
        }
    }
}

impl FromIterator<(String, u32)> for Configuration {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.counts.is_empty() {
            return write!(f, "(none)");
        }
        let parts: Vec<String> = self
            .counts
            .iter()
            .map(|(id, count)| format!("{}x{}", count, id))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Scaling recommendation relative to the current configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalingDecision {
    Upgrade,
    Downgrade,
    Optimal,
}

impl ScalingDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalingDecision::Upgrade => "upgrade",
            ScalingDecision::Downgrade => "downgrade",
            ScalingDecision::Optimal => "optimal",
        }
    }
}

impl fmt::Display for ScalingDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScalingDecision::Upgrade => "Upgrade",
            ScalingDecision::Downgrade => "Downgrade",
            ScalingDecision::Optimal => "Optimal",
        };
        write!(f, "{}", label)
    }
}

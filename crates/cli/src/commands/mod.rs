//! Subcommand implementations and shared argument handling

pub mod catalog;
pub mod check;
pub mod optimize;

use anyhow::{bail, Context, Result};
use optimizer_lib::{Catalog, Configuration, ResourceRequirement, ResourceTotals};
use std::path::Path;

use crate::RequirementArgs;

/// Parse one `TYPE=COUNT` pair
pub fn parse_instance_count(s: &str) -> Result<(String, u32), String> {
    let (id, count) = s
        .split_once('=')
        .ok_or_else(|| format!("expected TYPE=COUNT, got '{}'", s))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing instance type in '{}'", s));
    }
    let count = count
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid count in '{}': {}", s, e))?;
    Ok((id.to_string(), count))
}

pub fn load_catalog(path: &Path) -> Result<Catalog> {
    Catalog::load(path).with_context(|| format!("Failed to load catalog {}", path.display()))
}

/// Build the current configuration; repeated types add up
pub fn current_configuration(pairs: &[(String, u32)]) -> Configuration {
    let mut config = Configuration::new();
    for (id, count) in pairs {
        let total = config.get(id).saturating_add(*count);
        config.set(id.clone(), total);
    }
    config
}

/// Resolve the requirement from explicit resources or from utilization
pub fn resolve_requirement(
    args: &RequirementArgs,
    current: &ResourceTotals,
) -> Result<ResourceRequirement> {
    match (args.vcpus, args.memory, args.cpu_util, args.mem_util) {
        (Some(vcpus), Some(memory), _, _) => Ok(ResourceRequirement::new(vcpus, memory)?),
        (_, _, Some(cpu), Some(mem)) => {
            Ok(ResourceRequirement::from_utilization(current, cpu, mem)?)
        }
        _ => bail!("provide --vcpus and --memory, or --cpu-util and --mem-util"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_instance_count() {
        assert_eq!(
            parse_instance_count("t3.large=3").unwrap(),
            ("t3.large".to_string(), 3)
        );
        assert!(parse_instance_count("t3.large").is_err());
        assert!(parse_instance_count("=3").is_err());
        assert!(parse_instance_count("t3.large=-1").is_err());
    }

    #[test]
    fn test_current_configuration_sums_repeats() {
        let config = current_configuration(&[
            ("a".to_string(), 1),
            ("b".to_string(), 2),
            ("a".to_string(), 3),
        ]);
        assert_eq!(config.get("a"), 4);
        assert_eq!(config.get("b"), 2);
    }

    #[test]
    fn test_resolve_requirement_from_utilization() {
        let current = ResourceTotals {
            vcpus: 8,
            memory_gib: 32.0,
            hourly_cost: 0.0,
        };
        let args = RequirementArgs {
            vcpus: None,
            memory: None,
            cpu_util: Some(65.0),
            mem_util: Some(50.0),
        };
        let requirement = resolve_requirement(&args, &current).unwrap();
        assert_eq!(requirement.vcpus, 5);
        assert_eq!(requirement.memory_gib, 16.0);
    }

    #[test]
    fn test_resolve_requirement_needs_inputs() {
        let args = RequirementArgs {
            vcpus: None,
            memory: None,
            cpu_util: None,
            mem_util: None,
        };
        assert!(resolve_requirement(&args, &ResourceTotals::default()).is_err());
    }
}

//! Price-free capacity check

use anyhow::Result;
use colored::Colorize;
use optimizer_lib::{capacity_check, Catalog};
use serde_json::json;

use super::{current_configuration, resolve_requirement};
use crate::output::{color_decision, format_delta, format_memory, print_json, OutputFormat};
use crate::CheckArgs;

pub fn run_check(catalog: &Catalog, args: CheckArgs, format: OutputFormat) -> Result<()> {
    let current = current_configuration(&args.current);
    let totals = catalog.totals(&current)?;
    let requirement = resolve_requirement(&args.requirement, &totals)?;
    let check = capacity_check(&totals, &requirement, args.headroom);

    match format {
        OutputFormat::Json => print_json(&json!({
            "decision": check.decision,
            "resource_delta": check.delta,
            "current": totals,
            "requirement": requirement,
            "headroom": args.headroom,
        }))?,
        OutputFormat::Table => {
            println!("{}", "Capacity Check".bold());
            println!("{}", "=".repeat(50));
            println!(
                "Current:                {} vCPUs, {}",
                totals.vcpus,
                format_memory(totals.memory_gib)
            );
            println!(
                "Required:               {} vCPUs, {}",
                requirement.vcpus,
                format_memory(requirement.memory_gib)
            );
            println!(
                "Delta:                  {} vCPUs, {}",
                format_delta(check.delta.vcpus as f64, ""),
                format_delta(check.delta.memory_gib, " GiB")
            );
            println!("{} {}", "Decision:".bold(), color_decision(check.decision));
        }
    }

    Ok(())
}

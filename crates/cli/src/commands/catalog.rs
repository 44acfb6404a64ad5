//! Catalog listing

use anyhow::Result;
use colored::Colorize;
use optimizer_lib::Catalog;
use serde_json::json;
use tabled::Tabled;

use crate::output::{format_hourly, format_memory, print_json, print_table, OutputFormat};

#[derive(Tabled)]
struct InstanceRow {
    #[tabled(rename = "Instance Type")]
    id: String,
    #[tabled(rename = "vCPUs")]
    vcpus: u32,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "Price")]
    price: String,
}

pub fn show_catalog(catalog: &Catalog, format: OutputFormat) -> Result<()> {
    let fingerprint = catalog.fingerprint();

    match format {
        OutputFormat::Json => print_json(&json!({
            "fingerprint": fingerprint,
            "instances": catalog.instances(),
        }))?,
        OutputFormat::Table => {
            let rows: Vec<InstanceRow> = catalog
                .instances()
                .iter()
                .map(|spec| InstanceRow {
                    id: spec.id.clone(),
                    vcpus: spec.vcpus,
                    memory: format_memory(spec.memory_gib),
                    price: format_hourly(spec.hourly_price),
                })
                .collect();

            println!("{}", "Instance Catalog".bold());
            print_table(&rows);
            println!("Fingerprint: {}", fingerprint.dimmed());
        }
    }

    Ok(())
}

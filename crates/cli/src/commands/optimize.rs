//! Cost optimization against the current deployment

use anyhow::Result;
use colored::Colorize;
use optimizer_lib::{
    AnalyzerConfig, Catalog, DecisionPolicy, OptimizationRequest, OptimizationResponse,
    ScalingAnalyzer, ScalingDecision, SearchParams,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tabled::Tabled;
use tracing::debug;

use super::{current_configuration, resolve_requirement};
use crate::output::{
    color_decision, format_configuration, format_delta, format_hourly, print_info, print_json,
    print_table, print_warning, OutputFormat,
};
use crate::OptimizeArgs;

#[derive(Tabled)]
struct ComparisonRow {
    #[tabled(rename = "")]
    label: &'static str,
    #[tabled(rename = "Configuration")]
    configuration: String,
    #[tabled(rename = "Hourly Cost")]
    cost: String,
}

/// Search parameters from the defaults overlaid with any flags given
fn search_params(args: &OptimizeArgs) -> SearchParams {
    let defaults = SearchParams::default();
    SearchParams {
        pop_size: args.pop_size.unwrap_or(defaults.pop_size),
        generations: args.generations.unwrap_or(defaults.generations),
        mutation_rate: args.mutation_rate.unwrap_or(defaults.mutation_rate),
        max_count: args.max_count.unwrap_or(defaults.max_count),
        fitness_policy: args.fitness.into(),
        ..defaults
    }
}

pub fn run_optimize(catalog: &Catalog, args: OptimizeArgs, format: OutputFormat) -> Result<()> {
    let current = current_configuration(&args.current);
    let current_totals = catalog.totals(&current)?;
    let requirement = resolve_requirement(&args.requirement, &current_totals)?;

    let decision_policy = match args.threshold {
        Some(threshold) => DecisionPolicy::Material { threshold },
        None => DecisionPolicy::Strict,
    };
    let analyzer = ScalingAnalyzer::new(AnalyzerConfig {
        decision_policy,
        search: search_params(&args),
    });

    let request = OptimizationRequest {
        requirement,
        current_configuration: current,
        search_parameters: None,
        strategy: Some(args.strategy.into()),
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    debug!(seed = ?args.seed, "Running optimization");
    let response = analyzer.optimize(catalog, &request, &mut rng)?;

    match format {
        OutputFormat::Json => print_json(&response)?,
        OutputFormat::Table => print_response(&request, &response),
    }

    Ok(())
}

fn print_response(request: &OptimizationRequest, response: &OptimizationResponse) {
    println!("{}", "Optimization Result".bold());
    println!("{}", "=".repeat(50));
    println!(
        "Requirement:            {} vCPUs, {} GiB",
        request.requirement.vcpus, request.requirement.memory_gib
    );
    println!("Strategy:               {}", response.strategy.cyan());
    println!();

    let optimal_cost = if response.optimal_configuration.is_some() {
        format_hourly(response.optimal_cost)
    } else {
        "-".to_string()
    };
    print_table(&[
        ComparisonRow {
            label: "Current",
            configuration: format_configuration(Some(&request.current_configuration)),
            cost: format_hourly(response.current_cost),
        },
        ComparisonRow {
            label: "Optimal",
            configuration: format_configuration(response.optimal_configuration.as_ref()),
            cost: optimal_cost,
        },
    ]);
    println!();

    println!("{} {}", "Decision:".bold(), color_decision(response.decision));
    println!(
        "Resource delta:         {} vCPUs, {}",
        format_delta(response.resource_delta.vcpus as f64, ""),
        format_delta(response.resource_delta.memory_gib, " GiB")
    );

    match response.decision {
        ScalingDecision::Downgrade => println!(
            "{} {}",
            "Savings:".bold(),
            format_hourly(response.savings).green().bold()
        ),
        ScalingDecision::Upgrade if response.optimal_configuration.is_none() => {
            print_warning("No instance combination satisfies the requirement")
        }
        _ => {}
    }

    if let Some(stats) = &response.search_stats {
        print_info(&format!(
            "{} generations, {} evaluations in {}ms",
            stats.generations, stats.evaluations, stats.elapsed_ms
        ));
    }
}

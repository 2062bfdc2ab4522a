use anyhow::Context;
use cashflow_minimizer::config::{OutputFormat, Settings};
use cashflow_minimizer::observability::{init_logging, init_metrics, LogConfig};
use cashflow_minimizer::services::CashFlowService;
use cashflow_minimizer::DebtGraph;
use rust_decimal::Decimal;
use std::path::Path;
use tracing::info;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::new().context("Failed to load configuration")?;
    init_logging(&LogConfig::from(&settings.application));
    init_metrics()?;
    info!("Configuration loaded");

    let input = std::env::args().nth(1).or_else(|| settings.settlement.input_path.clone());
    let graph = match input {
        Some(path) => load_graph(Path::new(&path))
            .with_context(|| format!("Failed to load debt graph from {path}"))?,
        None => {
            info!("No input given, settling the built-in demo graph");
            demo_graph()
        }
    };

    let service = CashFlowService::new().with_masked_amounts(settings.application.mask_amounts);
    let report = service.process(&graph)?;

    match settings.settlement.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            println!("Transactions to settle debts:");
            for settlement in &report.settlements {
                println!("{settlement}");
            }
        }
    }

    Ok(())
}

fn load_graph(path: &Path) -> cashflow_minimizer::Result<DebtGraph> {
    info!("Reading debt graph from {}", path.display());
    let raw = std::fs::read_to_string(path)?;
    let graph = serde_json::from_str(&raw)?;
    Ok(graph)
}

fn demo_graph() -> DebtGraph {
    let mut graph = DebtGraph::new();
    graph
        .add_debt("A", "B", Decimal::from(50))
        .add_debt("A", "C", Decimal::from(100))
        .add_debt("B", "A", Decimal::from(10))
        .add_debt("B", "C", Decimal::from(20))
        .add_participant("C");
    graph
}

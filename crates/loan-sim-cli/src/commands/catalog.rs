use clap::Args;
use serde_json::{json, Value};
use tracing::debug;

use loan_sim_core::loan_simulator::catalog::LoanCatalog;

use crate::input;

/// Arguments for listing loan types
#[derive(Args)]
pub struct LoanTypesArgs {
    /// Path to JSON/YAML catalog overriding the built-in loan types
    #[arg(long)]
    pub catalog: Option<String>,
}

/// Load the built-in catalog, or a validated override from disk.
pub fn load_catalog(path: Option<&str>) -> Result<LoanCatalog, Box<dyn std::error::Error>> {
    match path {
        None => Ok(LoanCatalog::builtin()),
        Some(path) => {
            let catalog: LoanCatalog = input::file::read_input(path)?;
            catalog.validate()?;
            debug!(path, "loaded loan-type catalog override");
            Ok(catalog)
        }
    }
}

pub fn run_loan_types(args: LoanTypesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let rows: Vec<Value> = catalog
        .iter()
        .map(|(loan_type, spec)| {
            json!({
                "loan_type": loan_type,
                "label": spec.label,
                "max_tenor_years": spec.max_tenor_years,
                "default_rate_percent": spec.default_rate_percent,
            })
        })
        .collect();
    Ok(Value::Array(rows))
}

use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_sim_core::loan_simulator::affordability::{self, AffordabilityInput};

use crate::input;

/// Arguments for maximum affordable loan sizing
#[derive(Args)]
pub struct AffordabilityArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Highest acceptable debt-to-income ratio, in percent
    #[arg(long, default_value = "30")]
    pub max_dti: Decimal,

    /// Annual effective interest rate, in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Tenor in years
    #[arg(long)]
    pub tenor: Option<u32>,

    /// Down payment, in percent of asset price
    #[arg(long, default_value = "0")]
    pub down_payment: Decimal,
}

pub fn run_affordability(args: AffordabilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let aff_input: AffordabilityInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        AffordabilityInput {
            monthly_income: args.income
                .ok_or("--income is required (or provide --input)")?,
            max_dti_percent: args.max_dti,
            annual_rate_percent: args.rate
                .ok_or("--rate is required (or provide --input)")?,
            tenor_years: args.tenor
                .ok_or("--tenor is required (or provide --input)")?,
            down_payment_percent: args.down_payment,
        }
    };

    let result = affordability::max_affordable_loan(&aff_input)?;
    Ok(serde_json::to_value(result)?)
}

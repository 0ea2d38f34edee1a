use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use loan_sim_core::loan_simulator::amortization::{self, InterestType, LoanRequest};
use loan_sim_core::loan_simulator::catalog::{LoanCatalog, LoanType};
use loan_sim_core::loan_simulator::comparison;
use loan_sim_core::loan_simulator::floating_rate::FloatingRate;

use crate::commands::catalog::load_catalog;
use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LoanTypeArg {
    Mortgage,
    AutoLoan,
    MultiPurpose,
}

impl From<LoanTypeArg> for LoanType {
    fn from(arg: LoanTypeArg) -> Self {
        match arg {
            LoanTypeArg::Mortgage => LoanType::Mortgage,
            LoanTypeArg::AutoLoan => LoanType::AutoLoan,
            LoanTypeArg::MultiPurpose => LoanType::MultiPurpose,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum InterestTypeArg {
    Flat,
    Effective,
}

impl From<InterestTypeArg> for InterestType {
    fn from(arg: InterestTypeArg) -> Self {
        match arg {
            InterestTypeArg::Flat => InterestType::Flat,
            InterestTypeArg::Effective => InterestType::Effective,
        }
    }
}

/// Loan parameters shared by simulate, validate and compare
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON/YAML request file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Path to JSON/YAML catalog overriding the built-in loan types
    #[arg(long)]
    pub catalog: Option<String>,

    /// Loan product
    #[arg(long, value_enum, default_value = "mortgage")]
    pub loan_type: LoanTypeArg,

    /// Price of the financed asset
    #[arg(long)]
    pub asset_price: Option<Decimal>,

    /// Down payment, in percent of asset price
    #[arg(long, default_value = "20")]
    pub down_payment: Decimal,

    /// Monthly income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Tenor in years
    #[arg(long)]
    pub tenor: Option<u32>,

    /// Override the loan type's maximum tenor
    #[arg(long)]
    pub max_tenor: Option<u32>,

    /// Interest regime
    #[arg(long, value_enum, default_value = "effective")]
    pub interest_type: InterestTypeArg,

    /// Annual rate in percent (defaults to the loan type's catalog rate)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Years at the fixed rate before floating repricing
    /// (defaults to the whole tenor when no floating rates are given)
    #[arg(long)]
    pub fixed_years: Option<u32>,

    /// Comma-separated annual floating rates, one per floating year (e.g. "9,10.5,11")
    #[arg(long, value_delimiter = ',')]
    pub floating_rates: Option<Vec<Decimal>>,

    /// Disbursement date (YYYY-MM-DD); installments fall due monthly after it
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

/// Arguments for a full loan simulation
#[derive(Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Omit the month-by-month schedule from the output
    #[arg(long)]
    pub summary_only: bool,
}

/// Arguments for request validation
#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

/// Arguments for flat vs effective comparison
#[derive(Args)]
pub struct CompareArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

fn build_request(
    args: &LoanArgs,
    catalog: &LoanCatalog,
) -> Result<LoanRequest, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_input(path);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(data);
    }
    request_from_flags(args, catalog)
}

fn request_from_flags(
    args: &LoanArgs,
    catalog: &LoanCatalog,
) -> Result<LoanRequest, Box<dyn std::error::Error>> {
    let loan_type = LoanType::from(args.loan_type);
    let fixed_rate_percent = match args.rate {
        Some(rate) => rate,
        None => catalog.get(loan_type)?.default_rate_percent,
    };
    let floating_rates_percent = args
        .floating_rates
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|r| FloatingRate::new(*r))
        .collect::<Result<Vec<_>, _>>()?;

    let tenor_years = args.tenor
        .ok_or("--tenor is required (or provide --input)")?;
    let fixed_period_years = match args.fixed_years {
        Some(years) => years,
        None if floating_rates_percent.is_empty() => tenor_years,
        None => 0,
    };

    Ok(LoanRequest {
        loan_type,
        asset_price: args.asset_price
            .ok_or("--asset-price is required (or provide --input)")?,
        down_payment_percent: args.down_payment,
        monthly_income: args.income
            .ok_or("--income is required (or provide --input)")?,
        tenor_years,
        max_tenor_years: args.max_tenor,
        interest_type: args.interest_type.into(),
        fixed_rate_percent,
        fixed_period_years,
        floating_rates_percent,
        start_date: args.start_date,
    })
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let catalog = load_catalog(args.loan.catalog.as_deref())?;
    let request = build_request(&args.loan, &catalog)?;
    let result = amortization::simulate_loan_with_catalog(&request, &catalog)?;

    let mut value = serde_json::to_value(result)?;
    if args.summary_only {
        if let Some(Value::Object(res)) = value.get_mut("result") {
            res.remove("schedule");
        }
    }
    Ok(value)
}

pub fn run_validate(args: ValidateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let catalog = load_catalog(args.loan.catalog.as_deref())?;
    let request = build_request(&args.loan, &catalog)?;
    amortization::validate_with_catalog(&request, &catalog)?;

    Ok(json!({
        "result": {
            "valid": true,
            "loan_amount": request.loan_amount(),
            "number_of_months": request.number_of_months(),
            "fixed_months": request.fixed_months(),
            "floating_months": request.floating_months(),
        }
    }))
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let catalog = load_catalog(args.loan.catalog.as_deref())?;
    let request = build_request(&args.loan, &catalog)?;
    let result = comparison::compare_interest_regimes_with_catalog(&request, &catalog)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct LoanFlags {
        #[command(flatten)]
        loan: LoanArgs,
    }

    fn parse(extra: &[&str]) -> LoanArgs {
        let mut argv = vec![
            "loansim",
            "--asset-price",
            "500000000",
            "--income",
            "25000000",
            "--tenor",
            "20",
        ];
        argv.extend_from_slice(extra);
        LoanFlags::try_parse_from(argv).unwrap().loan
    }

    #[test]
    fn test_default_flags_give_fully_fixed_effective_loan() {
        let catalog = LoanCatalog::builtin();
        let request = request_from_flags(&parse(&[]), &catalog).unwrap();

        assert_eq!(request.interest_type, InterestType::Effective);
        assert_eq!(request.fixed_period_years, 20);
        assert!(request.floating_rates_percent.is_empty());
        assert_eq!(
            request.fixed_rate_percent,
            catalog.get(LoanType::Mortgage).unwrap().default_rate_percent
        );
        assert_eq!(request.down_payment_percent, Decimal::from(20));

        let out = amortization::simulate_loan_with_catalog(&request, &catalog).unwrap();
        assert_eq!(out.result.schedule.len(), 240);
    }

    #[test]
    fn test_floating_rates_without_fixed_years_float_whole_tenor() {
        let mut args = parse(&["--floating-rates", "9,10,11"]);
        args.tenor = Some(3);
        let request = request_from_flags(&args, &LoanCatalog::builtin()).unwrap();
        assert_eq!(request.fixed_period_years, 0);
        assert_eq!(request.floating_rates_percent.len(), 3);
        assert!(amortization::validate(&request).is_ok());
    }

    #[test]
    fn test_explicit_fixed_years_kept() {
        let args = parse(&["--fixed-years", "5", "--floating-rates", "9,10"]);
        let request = request_from_flags(&args, &LoanCatalog::builtin()).unwrap();
        assert_eq!(request.fixed_period_years, 5);
    }

    #[test]
    fn test_missing_income_reported() {
        let mut args = parse(&[]);
        args.income = None;
        let err = request_from_flags(&args, &LoanCatalog::builtin()).unwrap_err();
        assert!(err.to_string().contains("--income is required"));
    }
}

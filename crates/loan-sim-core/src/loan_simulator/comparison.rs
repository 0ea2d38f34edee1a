//! Flat versus effective interest on the same loan.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::types::{with_metadata, ComputationOutput, Money};
use crate::LoanSimResult;

use super::amortization::{compute_schedule_with_catalog, InterestType, LoanRequest, LoanSummary};
use super::catalog::LoanCatalog;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeComparison {
    pub flat: LoanSummary,
    pub effective: LoanSummary,
    /// flat.total_interest − effective.total_interest.
    pub interest_difference: Money,
    pub cheaper: InterestType,
}

/// Price the request under both regimes at its fixed rate.
///
/// The effective leg runs as a single fixed period over the whole tenor, so
/// the comparison isolates the accrual method from any floating repricing.
pub fn compare_interest_regimes(
    request: &LoanRequest,
) -> LoanSimResult<ComputationOutput<RegimeComparison>> {
    compare_interest_regimes_with_catalog(request, &LoanCatalog::builtin())
}

pub fn compare_interest_regimes_with_catalog(
    request: &LoanRequest,
    catalog: &LoanCatalog,
) -> LoanSimResult<ComputationOutput<RegimeComparison>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let flat_request = LoanRequest {
        interest_type: InterestType::Flat,
        fixed_period_years: 0,
        floating_rates_percent: Vec::new(),
        start_date: None,
        ..request.clone()
    };
    let effective_request = LoanRequest {
        interest_type: InterestType::Effective,
        fixed_period_years: request.tenor_years,
        floating_rates_percent: Vec::new(),
        start_date: None,
        ..request.clone()
    };

    if !request.floating_rates_percent.is_empty() {
        warnings.push("Floating rates are ignored; both regimes use the fixed rate".into());
    }

    let (_, flat) = compute_schedule_with_catalog(&flat_request, catalog)?;
    let (_, effective) = compute_schedule_with_catalog(&effective_request, catalog)?;

    let interest_difference = flat.total_interest - effective.total_interest;
    let cheaper = if interest_difference > Decimal::ZERO {
        InterestType::Effective
    } else {
        InterestType::Flat
    };

    let output = RegimeComparison {
        flat,
        effective,
        interest_difference,
        cheaper,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Interest regime comparison — flat vs effective annuity at equal nominal rate",
        &serde_json::json!({
            "loan_type": request.loan_type,
            "loan_amount": request.loan_amount().to_string(),
            "tenor_years": request.tenor_years,
            "fixed_rate_percent": request.fixed_rate_percent.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan_simulator::catalog::LoanType;
    use crate::loan_simulator::floating_rate::FloatingRate;
    use rust_decimal_macros::dec;

    fn request() -> LoanRequest {
        LoanRequest {
            loan_type: LoanType::AutoLoan,
            asset_price: dec!(250_000_000),
            down_payment_percent: dec!(25),
            monthly_income: dec!(15_000_000),
            tenor_years: 4,
            max_tenor_years: None,
            interest_type: InterestType::Effective,
            fixed_rate_percent: dec!(8),
            fixed_period_years: 1,
            floating_rates_percent: vec![FloatingRate::new(dec!(10)).unwrap(); 3],
            start_date: None,
        }
    }

    #[test]
    fn test_effective_cheaper_at_equal_nominal_rate() {
        let out = compare_interest_regimes(&request()).unwrap();
        let cmp = &out.result;
        assert_eq!(cmp.cheaper, InterestType::Effective);
        assert!(cmp.interest_difference > Decimal::ZERO);
        assert_eq!(
            cmp.interest_difference,
            cmp.flat.total_interest - cmp.effective.total_interest
        );
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_both_legs_share_loan_amount() {
        let cmp = compare_interest_regimes(&request()).unwrap().result;
        assert_eq!(cmp.flat.loan_amount, dec!(187_500_000));
        assert_eq!(cmp.effective.loan_amount, cmp.flat.loan_amount);
        assert_eq!(cmp.flat.number_of_months, 48);
        assert_eq!(cmp.effective.number_of_months, 48);
    }

    #[test]
    fn test_comparison_propagates_validation() {
        let mut req = request();
        req.tenor_years = 9;
        assert!(compare_interest_regimes(&req).is_err());
    }
}

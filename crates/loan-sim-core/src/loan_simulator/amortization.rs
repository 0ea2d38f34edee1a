//! Repayment-schedule engine for the loan simulator.
//!
//! Produces a month-by-month amortization schedule under three regimes:
//! flat interest, effective (annuity) interest, and effective interest with
//! a fixed period followed by annually re-priced floating years. All math
//! uses `rust_decimal::Decimal`.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, trace};

use crate::error::LoanSimError;
use crate::time_value::{annuity_payment, monthly_rate};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::LoanSimResult;

use super::affordability::DtiBand;
use super::catalog::{LoanCatalog, LoanType};
use super::floating_rate::FloatingRate;
use super::schedule::{yearly_breakdown, YearlyBreakdown};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MONTHS_PER_YEAR: u32 = 12;
const PERCENT: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

/// How interest accrues over the life of the loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestType {
    /// Simple interest on the original principal, spread evenly.
    Flat,
    /// Interest on the declining balance with a level (annuity) payment.
    Effective,
}

/// Parameters for a single loan simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanRequest {
    pub loan_type: LoanType,
    /// Purchase price of the financed asset.
    pub asset_price: Money,
    /// Down payment as a percentage of asset price, 0–100.
    pub down_payment_percent: Percent,
    pub monthly_income: Money,
    pub tenor_years: u32,
    /// Overrides the catalog's tenor ceiling for `loan_type`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tenor_years: Option<u32>,
    pub interest_type: InterestType,
    /// Annual rate in percent. Flat rate for `Flat`, fixed-period rate for `Effective`.
    pub fixed_rate_percent: Percent,
    /// Years at the fixed rate before floating repricing (`Effective` only).
    #[serde(default)]
    pub fixed_period_years: u32,
    /// One annual rate per floating year, in order.
    #[serde(default)]
    pub floating_rates_percent: Vec<FloatingRate>,
    /// Disbursement date. Installment `m` falls due `m` months later.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

impl LoanRequest {
    /// Financed principal: asset price less the down payment.
    pub fn loan_amount(&self) -> Money {
        self.asset_price * (Decimal::ONE - self.down_payment_percent / PERCENT)
    }

    pub fn number_of_months(&self) -> u32 {
        self.tenor_years.saturating_mul(MONTHS_PER_YEAR)
    }

    /// Months at the fixed rate. Always zero for flat loans.
    pub fn fixed_months(&self) -> u32 {
        match self.interest_type {
            InterestType::Flat => 0,
            InterestType::Effective => self.fixed_period_years.saturating_mul(MONTHS_PER_YEAR),
        }
    }

    /// Months re-priced at floating rates. Always zero for flat loans.
    pub fn floating_months(&self) -> u32 {
        match self.interest_type {
            InterestType::Flat => 0,
            InterestType::Effective => self.number_of_months().saturating_sub(self.fixed_months()),
        }
    }

    /// Number of floating-rate entries the schedule will consume.
    pub fn floating_years(&self) -> u32 {
        self.floating_months().div_ceil(MONTHS_PER_YEAR)
    }
}

/// One monthly repayment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    /// 1-indexed month number.
    pub month: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Annual rate in force for this month, in percent.
    pub annual_rate_percent: Percent,
    pub payment: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub remaining_balance: Money,
}

/// Ordered monthly installments, `tenor_years × 12` long.
pub type RepaymentSchedule = Vec<Installment>;

/// Aggregates derived from a repayment schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub loan_amount: Money,
    pub number_of_months: u32,
    /// Constant payment for flat loans; average payment for effective loans.
    pub monthly_payment: Money,
    pub first_payment: Money,
    pub last_payment: Money,
    pub max_payment: Money,
    pub total_payment: Money,
    /// total_payment − loan_amount.
    pub total_interest: Money,
    /// monthly_payment / monthly_income × 100.
    pub dti_ratio: Percent,
    pub dti_band: DtiBand,
}

/// Full simulation result handed to the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSimulation {
    pub summary: LoanSummary,
    pub yearly_breakdown: Vec<YearlyBreakdown>,
    pub schedule: RepaymentSchedule,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Validate a request against the built-in loan-type catalog.
pub fn validate(request: &LoanRequest) -> LoanSimResult<()> {
    validate_with_catalog(request, &LoanCatalog::builtin())
}

/// Validate a request against a caller-supplied catalog.
pub fn validate_with_catalog(request: &LoanRequest, catalog: &LoanCatalog) -> LoanSimResult<()> {
    if request.asset_price < Decimal::ZERO {
        return Err(LoanSimError::InvalidInput {
            field: "asset_price".into(),
            reason: "Asset price cannot be negative".into(),
        });
    }
    if request.down_payment_percent < Decimal::ZERO || request.down_payment_percent > PERCENT {
        return Err(LoanSimError::InvalidInput {
            field: "down_payment_percent".into(),
            reason: "Down payment must be between 0% and 100%".into(),
        });
    }

    let loan_amount = request.loan_amount();
    if loan_amount <= Decimal::ZERO {
        return Err(LoanSimError::InvalidAmount { loan_amount });
    }
    if request.monthly_income <= Decimal::ZERO {
        return Err(LoanSimError::InvalidIncome {
            monthly_income: request.monthly_income,
        });
    }
    if request.tenor_years == 0 {
        return Err(LoanSimError::InvalidTenor);
    }

    let spec = catalog.get(request.loan_type)?;
    let max_tenor_years = request.max_tenor_years.unwrap_or(spec.max_tenor_years);
    if request.tenor_years > max_tenor_years {
        return Err(LoanSimError::TenorExceedsMaximum {
            tenor_years: request.tenor_years,
            max_tenor_years,
            loan_type: spec.label.clone(),
        });
    }

    if request.fixed_rate_percent <= Decimal::ZERO {
        return Err(LoanSimError::InvalidInput {
            field: "fixed_rate_percent".into(),
            reason: "Interest rate must be positive".into(),
        });
    }

    if request.interest_type == InterestType::Effective {
        if request.fixed_period_years > request.tenor_years {
            return Err(LoanSimError::InvalidInput {
                field: "fixed_period_years".into(),
                reason: format!(
                    "Fixed period ({} years) cannot exceed tenor ({} years)",
                    request.fixed_period_years, request.tenor_years
                ),
            });
        }
        let needed = request.floating_years() as usize;
        if request.floating_rates_percent.len() < needed {
            return Err(LoanSimError::InvalidInput {
                field: "floating_rates_percent".into(),
                reason: format!(
                    "{} floating years need {} rates, got {}",
                    needed,
                    needed,
                    request.floating_rates_percent.len()
                ),
            });
        }
    }

    Ok(())
}

/// Validate, then build the repayment schedule and its summary.
pub fn compute_schedule(request: &LoanRequest) -> LoanSimResult<(RepaymentSchedule, LoanSummary)> {
    compute_schedule_with_catalog(request, &LoanCatalog::builtin())
}

pub fn compute_schedule_with_catalog(
    request: &LoanRequest,
    catalog: &LoanCatalog,
) -> LoanSimResult<(RepaymentSchedule, LoanSummary)> {
    validate_with_catalog(request, catalog)?;

    debug!(
        loan_type = %request.loan_type,
        interest_type = ?request.interest_type,
        loan_amount = %request.loan_amount(),
        tenor_years = request.tenor_years,
        fixed_period_years = request.fixed_period_years,
        "computing repayment schedule"
    );

    let schedule = match request.interest_type {
        InterestType::Flat => flat_schedule(request)?,
        InterestType::Effective => effective_schedule(request)?,
    };
    let summary = summarize(request, &schedule)?;

    debug!(
        months = schedule.len(),
        monthly_payment = %summary.monthly_payment,
        total_interest = %summary.total_interest,
        dti_ratio = %summary.dti_ratio,
        "repayment schedule computed"
    );

    Ok((schedule, summary))
}

/// Run a full simulation and wrap it in the standard output envelope.
pub fn simulate_loan(request: &LoanRequest) -> LoanSimResult<ComputationOutput<LoanSimulation>> {
    simulate_loan_with_catalog(request, &LoanCatalog::builtin())
}

pub fn simulate_loan_with_catalog(
    request: &LoanRequest,
    catalog: &LoanCatalog,
) -> LoanSimResult<ComputationOutput<LoanSimulation>> {
    let start = Instant::now();

    let (schedule, summary) = compute_schedule_with_catalog(request, catalog)?;
    let warnings = collect_warnings(request, &schedule, &summary);
    let breakdown = yearly_breakdown(&schedule);

    let methodology = match request.interest_type {
        InterestType::Flat => "Flat-rate amortization — simple interest on original principal",
        InterestType::Effective if request.floating_months() > 0 && request.fixed_months() > 0 => {
            "Effective-rate annuity — fixed period then annually re-priced floating years"
        }
        InterestType::Effective if request.fixed_months() == 0 => {
            "Effective-rate annuity — annually re-priced floating years"
        }
        InterestType::Effective => "Effective-rate annuity — level payment on declining balance",
    };

    let output = LoanSimulation {
        summary,
        yearly_breakdown: breakdown,
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology,
        &serde_json::json!({
            "loan_type": request.loan_type,
            "interest_type": request.interest_type,
            "asset_price": request.asset_price.to_string(),
            "down_payment_percent": request.down_payment_percent.to_string(),
            "loan_amount": request.loan_amount().to_string(),
            "tenor_years": request.tenor_years,
            "fixed_rate_percent": request.fixed_rate_percent.to_string(),
            "fixed_period_years": request.fixed_period_years,
            "floating_rates_percent": request
                .floating_rates_percent
                .iter()
                .map(|r| r.percent().to_string())
                .collect::<Vec<_>>(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Regimes
// ---------------------------------------------------------------------------

/// Equal principal and equal interest slices every month.
fn flat_schedule(request: &LoanRequest) -> LoanSimResult<RepaymentSchedule> {
    let loan_amount = request.loan_amount();
    let months = request.number_of_months();
    let n = Decimal::from(months);

    let total_interest = loan_amount
        .checked_mul(request.fixed_rate_percent / PERCENT)
        .and_then(|yearly| yearly.checked_mul(Decimal::from(request.tenor_years)))
        .ok_or_else(|| LoanSimError::overflow("flat interest"))?;
    let monthly_principal = loan_amount / n;
    let monthly_interest = total_interest / n;
    let monthly_payment = monthly_principal
        .checked_add(monthly_interest)
        .ok_or_else(|| LoanSimError::overflow("flat monthly payment"))?;

    let mut schedule = Vec::with_capacity(months as usize);
    let mut balance = loan_amount;

    for month in 1..=months {
        balance = (balance - monthly_principal).max(Decimal::ZERO);
        schedule.push(Installment {
            month,
            due_date: due_date(request.start_date, month)?,
            annual_rate_percent: request.fixed_rate_percent,
            payment: monthly_payment,
            principal_portion: monthly_principal,
            interest_portion: monthly_interest,
            remaining_balance: balance,
        });
    }

    Ok(schedule)
}

/// Annuity schedule, optionally split into a fixed window and floating years.
fn effective_schedule(request: &LoanRequest) -> LoanSimResult<RepaymentSchedule> {
    let months = request.number_of_months();
    let fixed_months = request.fixed_months();
    let floating_months = request.floating_months();

    let mut schedule = Vec::with_capacity(months as usize);
    let mut balance = request.loan_amount();

    if fixed_months > 0 {
        // Sized over the whole tenor, not just the fixed window.
        let rate = monthly_rate(request.fixed_rate_percent);
        let payment = annuity_payment(balance, rate, months)?;
        trace!(%payment, fixed_months, "fixed-period payment");

        for month in 1..=fixed_months {
            let installment = accrue(request, month, request.fixed_rate_percent, rate, payment, balance)?;
            balance = installment.remaining_balance;
            schedule.push(installment);
        }
    }

    let mut month = fixed_months;
    for (year, floating) in request.floating_rates_percent.iter().enumerate() {
        let elapsed = year as u32 * MONTHS_PER_YEAR;
        if elapsed >= floating_months {
            break;
        }
        let horizon = floating_months - elapsed;
        let months_in_chunk = horizon.min(MONTHS_PER_YEAR);
        let rate = floating.monthly_rate();

        let payment = if balance > Decimal::ZERO {
            annuity_payment(balance, rate, horizon)?
        } else {
            Decimal::ZERO
        };
        trace!(year, rate = %floating, %payment, horizon, "floating-year payment");

        for _ in 0..months_in_chunk {
            month += 1;
            let installment = accrue(request, month, floating.percent(), rate, payment, balance)?;
            balance = installment.remaining_balance;
            schedule.push(installment);
        }
    }

    Ok(schedule)
}

/// One month on the declining balance. A paid-off loan accrues nothing.
fn accrue(
    request: &LoanRequest,
    month: u32,
    annual_rate_percent: Percent,
    rate: Rate,
    payment: Money,
    balance: Money,
) -> LoanSimResult<Installment> {
    let (payment, interest, principal, remaining) = if balance <= Decimal::ZERO {
        (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
    } else {
        let interest = balance
            .checked_mul(rate)
            .ok_or_else(|| LoanSimError::overflow("monthly interest"))?;
        let principal = payment
            .checked_sub(interest)
            .ok_or_else(|| LoanSimError::overflow("principal portion"))?;
        let remaining = balance
            .checked_sub(principal)
            .ok_or_else(|| LoanSimError::overflow("remaining balance"))?;
        (payment, interest, principal, remaining.max(Decimal::ZERO))
    };

    Ok(Installment {
        month,
        due_date: due_date(request.start_date, month)?,
        annual_rate_percent,
        payment,
        principal_portion: principal,
        interest_portion: interest,
        remaining_balance: remaining,
    })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn due_date(start: Option<NaiveDate>, month: u32) -> LoanSimResult<Option<NaiveDate>> {
    match start {
        None => Ok(None),
        Some(start) => start
            .checked_add_months(Months::new(month))
            .map(Some)
            .ok_or_else(|| LoanSimError::InvalidInput {
                field: "start_date".into(),
                reason: format!("Due date for month {month} is out of calendar range"),
            }),
    }
}

fn summarize(request: &LoanRequest, schedule: &[Installment]) -> LoanSimResult<LoanSummary> {
    let (first, last) = match (schedule.first(), schedule.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return Err(LoanSimError::DivisionByZero {
                context: "summary of an empty schedule".into(),
            })
        }
    };

    let loan_amount = request.loan_amount();
    let number_of_months = schedule.len() as u32;
    let total_payment = schedule
        .iter()
        .try_fold(Decimal::ZERO, |acc, i| acc.checked_add(i.payment))
        .ok_or_else(|| LoanSimError::overflow("total payment"))?;
    let max_payment = schedule
        .iter()
        .map(|i| i.payment)
        .max()
        .unwrap_or(Decimal::ZERO);

    let monthly_payment = match request.interest_type {
        InterestType::Flat => first.payment,
        InterestType::Effective => total_payment / Decimal::from(number_of_months),
    };

    let dti_ratio = monthly_payment
        .checked_div(request.monthly_income)
        .and_then(|ratio| ratio.checked_mul(PERCENT))
        .ok_or_else(|| LoanSimError::overflow("DTI ratio"))?;

    Ok(LoanSummary {
        loan_amount,
        number_of_months,
        monthly_payment,
        first_payment: first.payment,
        last_payment: last.payment,
        max_payment,
        total_payment,
        total_interest: total_payment - loan_amount,
        dti_ratio,
        dti_band: DtiBand::classify(dti_ratio),
    })
}

fn collect_warnings(request: &LoanRequest, schedule: &[Installment], summary: &LoanSummary) -> Vec<String> {
    let mut warnings = Vec::new();

    match summary.dti_band {
        DtiBand::Healthy => {}
        DtiBand::Caution => warnings.push(format!(
            "DTI ratio {:.2}% is above the 30% comfort level",
            summary.dti_ratio
        )),
        DtiBand::HighRisk => warnings.push(format!(
            "DTI ratio {:.2}% exceeds 40%; repayment is high risk for this income",
            summary.dti_ratio
        )),
    }

    if request.down_payment_percent.is_zero() {
        warnings.push("No down payment: the full asset price is financed".into());
    }

    let fixed_months = request.fixed_months();
    if fixed_months > 0 && request.floating_months() > 0 {
        if let Some(end_of_fixed) = schedule.get(fixed_months as usize - 1) {
            warnings.push(format!(
                "Fixed-period payment is sized over the full {}-month tenor; {:.2} remains \
                 outstanding after month {} and is re-priced at floating rates",
                request.number_of_months(),
                end_of_fixed.remaining_balance,
                fixed_months
            ));
        }
    }

    let used = request.floating_years() as usize;
    if request.floating_rates_percent.len() > used {
        warnings.push(format!(
            "{} floating rate(s) supplied but unused",
            request.floating_rates_percent.len() - used
        ));
    }

    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn flat_request() -> LoanRequest {
        LoanRequest {
            loan_type: LoanType::MultiPurpose,
            asset_price: dec!(100_000_000),
            down_payment_percent: dec!(0),
            monthly_income: dec!(30_000_000),
            tenor_years: 1,
            max_tenor_years: None,
            interest_type: InterestType::Flat,
            fixed_rate_percent: dec!(10),
            fixed_period_years: 0,
            floating_rates_percent: vec![],
            start_date: None,
        }
    }

    fn split_request() -> LoanRequest {
        LoanRequest {
            loan_type: LoanType::Mortgage,
            asset_price: dec!(800_000_000),
            down_payment_percent: dec!(20),
            monthly_income: dec!(25_000_000),
            tenor_years: 5,
            max_tenor_years: None,
            interest_type: InterestType::Effective,
            fixed_rate_percent: dec!(6),
            fixed_period_years: 2,
            floating_rates_percent: vec![
                FloatingRate::new(dec!(10)).unwrap(),
                FloatingRate::new(dec!(11)).unwrap(),
                FloatingRate::new(dec!(12)).unwrap(),
            ],
            start_date: None,
        }
    }

    #[test]
    fn test_loan_amount_derivation() {
        let req = split_request();
        assert_eq!(req.loan_amount(), dec!(640_000_000));
        assert_eq!(req.fixed_months(), 24);
        assert_eq!(req.floating_months(), 36);
        assert_eq!(req.floating_years(), 3);
    }

    #[test]
    fn test_flat_constant_slices() {
        let (schedule, summary) = compute_schedule(&flat_request()).unwrap();
        assert_eq!(schedule.len(), 12);
        let first = &schedule[0];
        assert!(schedule.iter().all(|i| i.payment == first.payment));
        assert!(schedule.iter().all(|i| i.interest_portion == first.interest_portion));
        assert!((summary.total_interest - dec!(10_000_000)).abs() < dec!(0.000001));
        assert!((summary.monthly_payment - dec!(9_166_667)).abs() < dec!(1));
    }

    #[test]
    fn test_flat_ignores_fixed_period() {
        let mut req = flat_request();
        req.fixed_period_years = 5;
        assert!(validate(&req).is_ok());
        assert_eq!(req.floating_months(), 0);
    }

    #[test]
    fn test_split_fixed_then_floating_rates() {
        let (schedule, _) = compute_schedule(&split_request()).unwrap();
        assert_eq!(schedule.len(), 60);
        assert_eq!(schedule[23].annual_rate_percent, dec!(6));
        assert_eq!(schedule[24].annual_rate_percent, dec!(10));
        assert_eq!(schedule[36].annual_rate_percent, dec!(11));
        assert_eq!(schedule[59].annual_rate_percent, dec!(12));
        // Payment is level inside each floating year
        assert_eq!(schedule[24].payment, schedule[35].payment);
        assert!(schedule[59].remaining_balance < dec!(1));
    }

    #[test]
    fn test_fixed_payment_sized_over_full_tenor() {
        let req = split_request();
        let (schedule, _) = compute_schedule(&req).unwrap();
        let expected = annuity_payment(req.loan_amount(), monthly_rate(dec!(6)), 60).unwrap();
        assert_eq!(schedule[0].payment, expected);
    }

    #[test]
    fn test_all_floating_when_no_fixed_period() {
        let mut req = split_request();
        req.tenor_years = 2;
        req.fixed_period_years = 0;
        let (schedule, _) = compute_schedule(&req).unwrap();
        assert_eq!(schedule.len(), 24);
        assert_eq!(schedule[0].annual_rate_percent, dec!(10));
        assert_eq!(schedule[12].annual_rate_percent, dec!(11));
        assert!(schedule[23].remaining_balance < dec!(1));
    }

    #[test]
    fn test_missing_floating_rates_rejected() {
        let mut req = split_request();
        req.floating_rates_percent.pop();
        let err = validate(&req).unwrap_err();
        assert!(
            matches!(err, LoanSimError::InvalidInput { ref field, .. } if field == "floating_rates_percent")
        );
    }

    #[test]
    fn test_fixed_period_longer_than_tenor_rejected() {
        let mut req = split_request();
        req.fixed_period_years = 6;
        assert!(matches!(validate(&req), Err(LoanSimError::InvalidInput { .. })));
    }

    #[test]
    fn test_down_payment_out_of_range_rejected() {
        let mut req = flat_request();
        req.down_payment_percent = dec!(120);
        assert!(matches!(validate(&req), Err(LoanSimError::InvalidInput { .. })));
    }

    #[test]
    fn test_full_down_payment_is_invalid_amount() {
        let mut req = flat_request();
        req.down_payment_percent = dec!(100);
        assert!(matches!(validate(&req), Err(LoanSimError::InvalidAmount { .. })));
    }

    #[test]
    fn test_zero_tenor_rejected() {
        let mut req = flat_request();
        req.tenor_years = 0;
        assert!(matches!(validate(&req), Err(LoanSimError::InvalidTenor)));
    }

    #[test]
    fn test_tenor_ceiling_message_names_product() {
        let mut req = flat_request();
        req.loan_type = LoanType::AutoLoan;
        req.tenor_years = 8;
        let err = validate(&req).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("at most 7 years"), "{msg}");
        assert!(msg.contains("Auto Loan (KKB)"), "{msg}");
    }

    #[test]
    fn test_request_ceiling_override() {
        let mut req = flat_request();
        req.loan_type = LoanType::AutoLoan;
        req.tenor_years = 8;
        req.max_tenor_years = Some(8);
        assert!(validate(&req).is_ok());
    }

    #[test]
    fn test_due_dates_step_monthly() {
        let mut req = flat_request();
        req.start_date = NaiveDate::from_ymd_opt(2024, 1, 31);
        let (schedule, _) = compute_schedule(&req).unwrap();
        assert_eq!(schedule[0].due_date, NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(schedule[1].due_date, NaiveDate::from_ymd_opt(2024, 3, 31));
        assert_eq!(schedule[11].due_date, NaiveDate::from_ymd_opt(2025, 1, 31));
    }

    #[test]
    fn test_flat_interest_overflow_is_typed() {
        let mut req = flat_request();
        req.asset_price = Decimal::MAX / dec!(8);
        req.fixed_rate_percent = dec!(1000);
        assert!(validate(&req).is_ok());
        assert!(matches!(
            compute_schedule(&req),
            Err(LoanSimError::Overflow { .. })
        ));
    }

    #[test]
    fn test_paid_off_balance_accrues_nothing() {
        let req = flat_request();
        let inst = accrue(&req, 7, dec!(10), dec!(0.01), dec!(500), Decimal::ZERO).unwrap();
        assert_eq!(inst.payment, Decimal::ZERO);
        assert_eq!(inst.interest_portion, Decimal::ZERO);
        assert_eq!(inst.remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_simulation_warnings() {
        let mut req = split_request();
        req.monthly_income = dec!(5_000_000);
        req.floating_rates_percent.push(FloatingRate::new(dec!(9)).unwrap());
        let out = simulate_loan(&req).unwrap();
        let w = out.warnings.join("\n");
        assert!(w.contains("exceeds 40%"), "{w}");
        assert!(w.contains("re-priced at floating rates"), "{w}");
        assert!(w.contains("1 floating rate(s) supplied but unused"), "{w}");
        assert_eq!(out.result.summary.dti_band, DtiBand::HighRisk);
        assert_eq!(out.result.yearly_breakdown.len(), 5);
    }

    #[test]
    fn test_simulation_zero_down_payment_warning() {
        let out = simulate_loan(&flat_request()).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("No down payment")));
        assert!(out.methodology.starts_with("Flat-rate"));
    }

    #[test]
    fn test_request_deserializes_with_defaults() {
        let req: LoanRequest = serde_json::from_value(serde_json::json!({
            "loan_type": "auto_loan",
            "asset_price": "300000000",
            "down_payment_percent": 30,
            "monthly_income": 20000000,
            "tenor_years": 5,
            "interest_type": "flat",
            "fixed_rate_percent": "4.5"
        }))
        .unwrap();
        assert_eq!(req.fixed_period_years, 0);
        assert!(req.floating_rates_percent.is_empty());
        assert_eq!(req.loan_amount(), dec!(210_000_000));
    }
}

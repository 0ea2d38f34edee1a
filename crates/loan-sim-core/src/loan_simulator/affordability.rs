//! Debt-to-income banding and maximum affordable loan size.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LoanSimError;
use crate::time_value::{annuity_present_value, monthly_rate};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::LoanSimResult;

const HEALTHY_DTI_CEILING: Percent = dec!(30);
const CAUTION_DTI_CEILING: Percent = dec!(40);
const PERCENT: Decimal = dec!(100);

/// Risk band for a debt-to-income ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DtiBand {
    /// DTI ≤ 30%.
    Healthy,
    /// 30% < DTI ≤ 40%.
    Caution,
    /// DTI > 40%.
    HighRisk,
}

impl DtiBand {
    pub fn classify(dti_ratio: Percent) -> Self {
        if dti_ratio <= HEALTHY_DTI_CEILING {
            DtiBand::Healthy
        } else if dti_ratio <= CAUTION_DTI_CEILING {
            DtiBand::Caution
        } else {
            DtiBand::HighRisk
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityInput {
    pub monthly_income: Money,
    /// Highest acceptable DTI, in percent.
    #[serde(default = "default_max_dti")]
    pub max_dti_percent: Percent,
    /// Annual effective rate, in percent.
    pub annual_rate_percent: Percent,
    pub tenor_years: u32,
    /// Down payment used to gross the loan up to an asset price.
    #[serde(default)]
    pub down_payment_percent: Percent,
}

fn default_max_dti() -> Percent {
    HEALTHY_DTI_CEILING
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityOutput {
    /// Largest monthly installment within the DTI ceiling.
    pub max_monthly_payment: Money,
    /// Principal that installment amortizes over the tenor.
    pub max_loan_amount: Money,
    /// Asset price reachable with the given down payment.
    pub max_asset_price: Money,
    pub total_interest: Money,
}

/// Size the largest loan whose level annuity payment keeps DTI at the ceiling.
pub fn max_affordable_loan(
    input: &AffordabilityInput,
) -> LoanSimResult<ComputationOutput<AffordabilityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_affordability_input(input)?;

    let months = input.tenor_years.saturating_mul(12);
    let max_monthly_payment = input.monthly_income * (input.max_dti_percent / PERCENT);
    let rate = monthly_rate(input.annual_rate_percent);
    let max_loan_amount = annuity_present_value(max_monthly_payment, rate, months)?;

    let financed_share = Decimal::ONE - input.down_payment_percent / PERCENT;
    let max_asset_price = max_loan_amount
        .checked_div(financed_share)
        .ok_or_else(|| LoanSimError::overflow("maximum asset price"))?;
    let total_interest = max_monthly_payment
        .checked_mul(Decimal::from(months))
        .ok_or_else(|| LoanSimError::overflow("total interest"))?
        - max_loan_amount;

    if input.max_dti_percent > CAUTION_DTI_CEILING {
        warnings.push(format!(
            "DTI ceiling of {}% is above the 40% high-risk threshold",
            input.max_dti_percent
        ));
    }

    let output = AffordabilityOutput {
        max_monthly_payment,
        max_loan_amount,
        max_asset_price,
        total_interest,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Maximum affordable loan — annuity present value at DTI ceiling",
        &serde_json::json!({
            "monthly_income": input.monthly_income.to_string(),
            "max_dti_percent": input.max_dti_percent.to_string(),
            "annual_rate_percent": input.annual_rate_percent.to_string(),
            "tenor_years": input.tenor_years,
            "down_payment_percent": input.down_payment_percent.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn validate_affordability_input(input: &AffordabilityInput) -> LoanSimResult<()> {
    if input.monthly_income <= Decimal::ZERO {
        return Err(LoanSimError::InvalidIncome {
            monthly_income: input.monthly_income,
        });
    }
    if input.tenor_years == 0 {
        return Err(LoanSimError::InvalidTenor);
    }
    if input.max_dti_percent <= Decimal::ZERO || input.max_dti_percent > PERCENT {
        return Err(LoanSimError::InvalidInput {
            field: "max_dti_percent".into(),
            reason: "DTI ceiling must be in (0%, 100%]".into(),
        });
    }
    if input.annual_rate_percent < Decimal::ZERO {
        return Err(LoanSimError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }
    if input.down_payment_percent < Decimal::ZERO || input.down_payment_percent >= PERCENT {
        return Err(LoanSimError::InvalidInput {
            field: "down_payment_percent".into(),
            reason: "Down payment must be in [0%, 100%)".into(),
        });
    }
    Ok(())
}

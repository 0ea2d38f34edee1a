//! Schedule analytics: yearly roll-ups for charting and invariant checks.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LoanSimError;
use crate::types::Money;
use crate::LoanSimResult;

use super::amortization::Installment;

/// Relative tolerance for payment = principal + interest.
const CONSERVATION_TOLERANCE: Decimal = dec!(0.000001);
/// Absolute tolerance for the final balance, in currency units.
const FINAL_BALANCE_TOLERANCE: Decimal = dec!(1);

/// Principal and interest paid during one loan year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyBreakdown {
    /// 1-indexed loan year.
    pub year: u32,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub total_paid: Money,
    pub ending_balance: Money,
}

/// Roll monthly installments up into loan years of twelve months.
pub fn yearly_breakdown(schedule: &[Installment]) -> Vec<YearlyBreakdown> {
    schedule
        .chunks(12)
        .enumerate()
        .map(|(idx, months)| {
            let principal_paid: Money = months.iter().map(|i| i.principal_portion).sum();
            let interest_paid: Money = months.iter().map(|i| i.interest_portion).sum();
            YearlyBreakdown {
                year: idx as u32 + 1,
                principal_paid,
                interest_paid,
                total_paid: months.iter().map(|i| i.payment).sum(),
                ending_balance: months
                    .last()
                    .map(|i| i.remaining_balance)
                    .unwrap_or(Decimal::ZERO),
            }
        })
        .collect()
}

/// Check a schedule for internal consistency.
///
/// Every installment must satisfy `payment ≈ principal + interest`, balances
/// must never rise or go negative, and the loan must be paid off (within one
/// currency unit) by the final month.
pub fn verify_schedule(schedule: &[Installment], loan_amount: Money) -> LoanSimResult<()> {
    let last = schedule.last().ok_or_else(|| LoanSimError::ScheduleInvariant {
        month: 0,
        reason: "schedule is empty".into(),
    })?;

    let mut previous = loan_amount;
    for (idx, inst) in schedule.iter().enumerate() {
        let expected_month = idx as u32 + 1;
        if inst.month != expected_month {
            return Err(LoanSimError::ScheduleInvariant {
                month: inst.month,
                reason: format!("expected month {expected_month}"),
            });
        }

        let parts = inst.principal_portion + inst.interest_portion;
        let scale = inst.payment.abs().max(Decimal::ONE);
        if (inst.payment - parts).abs() > CONSERVATION_TOLERANCE * scale {
            return Err(LoanSimError::ScheduleInvariant {
                month: inst.month,
                reason: format!(
                    "payment {} differs from principal + interest {}",
                    inst.payment, parts
                ),
            });
        }

        if inst.remaining_balance < Decimal::ZERO {
            return Err(LoanSimError::ScheduleInvariant {
                month: inst.month,
                reason: format!("negative balance {}", inst.remaining_balance),
            });
        }

        if inst.remaining_balance > previous {
            return Err(LoanSimError::ScheduleInvariant {
                month: inst.month,
                reason: format!(
                    "balance rose from {} to {}",
                    previous, inst.remaining_balance
                ),
            });
        }
        previous = inst.remaining_balance;
    }

    if last.remaining_balance >= FINAL_BALANCE_TOLERANCE {
        return Err(LoanSimError::ScheduleInvariant {
            month: last.month,
            reason: format!("loan not paid off, {} outstanding", last.remaining_balance),
        });
    }

    Ok(())
}

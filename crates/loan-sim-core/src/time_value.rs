use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::LoanSimError;
use crate::types::{Money, Percent, Rate};
use crate::LoanSimResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

/// Convert an annual percentage (e.g. 12 for 12% p.a.) into a monthly decimal rate.
pub fn monthly_rate(annual_percent: Percent) -> Rate {
    annual_percent / PERCENT / MONTHS_PER_YEAR
}

/// Compound growth factor (1 + r)^n.
fn growth_factor(rate: Rate, periods: u32) -> LoanSimResult<Decimal> {
    (Decimal::ONE + rate)
        .checked_powi(i64::from(periods))
        .ok_or_else(|| LoanSimError::InvalidInput {
            field: "periods".into(),
            reason: format!("(1 + {rate})^{periods} overflows decimal range"),
        })
}

/// Level payment that fully amortizes `principal` over `periods` at `rate` per period.
///
/// `payment = P × r / (1 − (1+r)^−n)`; falls back to straight-line `P / n`
/// when the rate is zero.
pub fn annuity_payment(principal: Money, rate: Rate, periods: u32) -> LoanSimResult<Money> {
    if periods == 0 {
        return Err(LoanSimError::InvalidInput {
            field: "periods".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(periods));
    }

    let factor = growth_factor(rate, periods)?;
    if factor.is_zero() {
        return Err(LoanSimError::DivisionByZero {
            context: "annuity payment growth factor".into(),
        });
    }

    let discount = Decimal::ONE - Decimal::ONE / factor;
    if discount.is_zero() {
        return Err(LoanSimError::DivisionByZero {
            context: "annuity payment denominator".into(),
        });
    }

    principal
        .checked_mul(rate)
        .and_then(|interest| interest.checked_div(discount))
        .ok_or_else(|| LoanSimError::overflow("annuity payment"))
}

/// Principal that a level `payment` over `periods` at `rate` per period can service.
pub fn annuity_present_value(payment: Money, rate: Rate, periods: u32) -> LoanSimResult<Money> {
    if rate.is_zero() {
        return payment
            .checked_mul(Decimal::from(periods))
            .ok_or_else(|| LoanSimError::overflow("annuity present value"));
    }

    let factor = growth_factor(rate, periods)?;
    if factor.is_zero() {
        return Err(LoanSimError::DivisionByZero {
            context: "annuity present value factor".into(),
        });
    }

    (payment * (Decimal::ONE - Decimal::ONE / factor))
        .checked_div(rate)
        .ok_or_else(|| LoanSimError::overflow("annuity present value"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_monthly_rate() {
        assert_eq!(monthly_rate(dec!(12)), dec!(0.01));
        assert_eq!(monthly_rate(dec!(0)), Decimal::ZERO);
    }

    #[test]
    fn test_annuity_payment_basic() {
        // 100M at 1%/month over 12 months ≈ 8,884,878.87
        let pmt = annuity_payment(dec!(100_000_000), dec!(0.01), 12).unwrap();
        assert!((pmt - dec!(8_884_878.87)).abs() < dec!(0.01));
    }

    #[test]
    fn test_annuity_payment_zero_rate() {
        let pmt = annuity_payment(dec!(1200), Decimal::ZERO, 12).unwrap();
        assert_eq!(pmt, dec!(100));
    }

    #[test]
    fn test_annuity_payment_zero_periods() {
        let err = annuity_payment(dec!(1000), dec!(0.01), 0).unwrap_err();
        assert!(matches!(err, LoanSimError::InvalidInput { .. }));
    }

    #[test]
    fn test_annuity_payment_high_rate_long_horizon() {
        // 200% p.a. over 30 years: (1+r)^n is ~1.3e24, payment stays near P × r
        let rate = monthly_rate(dec!(200));
        let pmt = annuity_payment(dec!(800_000_000), rate, 360).unwrap();
        let interest_only = dec!(800_000_000) * rate;
        assert!(pmt >= interest_only);
        assert!(pmt - interest_only < dec!(0.0001));
    }

    #[test]
    fn test_annuity_payment_overflow_is_typed() {
        let err = annuity_payment(Decimal::MAX, dec!(2), 1).unwrap_err();
        assert!(matches!(err, LoanSimError::Overflow { .. }));
    }

    #[test]
    fn test_present_value_inverts_payment() {
        let principal = dec!(250_000_000);
        let rate = monthly_rate(dec!(9));
        let pmt = annuity_payment(principal, rate, 120).unwrap();
        let pv = annuity_present_value(pmt, rate, 120).unwrap();
        assert!((pv - principal).abs() < dec!(0.0001));
    }

    #[test]
    fn test_present_value_zero_rate() {
        let pv = annuity_present_value(dec!(100), Decimal::ZERO, 24).unwrap();
        assert_eq!(pv, dec!(2400));
    }
}

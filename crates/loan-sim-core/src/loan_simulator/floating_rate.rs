use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LoanSimError;
use crate::time_value::monthly_rate;
use crate::types::{Percent, Rate};
use crate::LoanSimResult;

pub const MIN_FLOATING_RATE_PERCENT: Percent = dec!(5);
pub const MAX_FLOATING_RATE_PERCENT: Percent = dec!(25);

/// Annual floating rate in percent, guaranteed to lie within 5%–25%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct FloatingRate(Percent);

impl FloatingRate {
    pub fn new(percent: Percent) -> LoanSimResult<Self> {
        if percent < MIN_FLOATING_RATE_PERCENT || percent > MAX_FLOATING_RATE_PERCENT {
            return Err(LoanSimError::InvalidFloatingRate { value: percent });
        }
        Ok(Self(percent))
    }

    /// Pull an arbitrary value into the allowed band, the way the dashboard's
    /// rate inputs behave.
    pub fn clamped(percent: Percent) -> Self {
        Self(percent.clamp(MIN_FLOATING_RATE_PERCENT, MAX_FLOATING_RATE_PERCENT))
    }

    pub fn percent(self) -> Percent {
        self.0
    }

    pub fn monthly_rate(self) -> Rate {
        monthly_rate(self.0)
    }
}

impl TryFrom<Decimal> for FloatingRate {
    type Error = LoanSimError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FloatingRate> for Decimal {
    fn from(rate: FloatingRate) -> Self {
        rate.0
    }
}

impl fmt::Display for FloatingRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

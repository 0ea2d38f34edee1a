//! Loan-type catalog: labels, tenor ceilings and default rates per product.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LoanSimError;
use crate::types::Percent;
use crate::LoanSimResult;

/// Retail loan products offered by the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanType {
    /// Home mortgage (KPR).
    Mortgage,
    /// Motor-vehicle loan (KKB).
    AutoLoan,
    /// Unsecured multi-purpose loan (KTA).
    MultiPurpose,
}

impl LoanType {
    pub const ALL: [LoanType; 3] = [LoanType::Mortgage, LoanType::AutoLoan, LoanType::MultiPurpose];

    /// Built-in product parameters for this loan type.
    pub fn spec(self) -> LoanTypeSpec {
        match self {
            LoanType::Mortgage => LoanTypeSpec {
                label: "Mortgage (KPR)".into(),
                max_tenor_years: 30,
                default_rate_percent: dec!(7.5),
            },
            LoanType::AutoLoan => LoanTypeSpec {
                label: "Auto Loan (KKB)".into(),
                max_tenor_years: 7,
                default_rate_percent: dec!(9),
            },
            LoanType::MultiPurpose => LoanTypeSpec {
                label: "Multi-Purpose Loan (KTA)".into(),
                max_tenor_years: 10,
                default_rate_percent: dec!(11),
            },
        }
    }
}

impl fmt::Display for LoanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LoanType::Mortgage => "mortgage",
            LoanType::AutoLoan => "auto_loan",
            LoanType::MultiPurpose => "multi_purpose",
        };
        f.write_str(s)
    }
}

/// Product parameters for a single loan type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTypeSpec {
    pub label: String,
    pub max_tenor_years: u32,
    pub default_rate_percent: Percent,
}

/// Mapping of loan type to product parameters.
///
/// Deserialises from a plain map, e.g. `{"mortgage": {"label": ..., ...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanCatalog {
    entries: BTreeMap<LoanType, LoanTypeSpec>,
}

impl LoanCatalog {
    pub fn builtin() -> Self {
        Self {
            entries: LoanType::ALL.iter().map(|t| (*t, t.spec())).collect(),
        }
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (LoanType, LoanTypeSpec)>) -> LoanSimResult<Self> {
        let catalog = Self {
            entries: entries.into_iter().collect(),
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Reject catalogs a caller could not sensibly simulate against.
    pub fn validate(&self) -> LoanSimResult<()> {
        if self.entries.is_empty() {
            return Err(LoanSimError::InvalidInput {
                field: "catalog".into(),
                reason: "Catalog must define at least one loan type".into(),
            });
        }
        for (loan_type, spec) in &self.entries {
            if spec.max_tenor_years == 0 {
                return Err(LoanSimError::InvalidInput {
                    field: format!("catalog.{loan_type}.max_tenor_years"),
                    reason: "Maximum tenor must be at least 1 year".into(),
                });
            }
            if spec.default_rate_percent <= Decimal::ZERO {
                return Err(LoanSimError::InvalidInput {
                    field: format!("catalog.{loan_type}.default_rate_percent"),
                    reason: "Default rate must be positive".into(),
                });
            }
        }
        Ok(())
    }

    pub fn get(&self, loan_type: LoanType) -> LoanSimResult<&LoanTypeSpec> {
        self.entries
            .get(&loan_type)
            .ok_or_else(|| LoanSimError::InvalidInput {
                field: "loan_type".into(),
                reason: format!("Loan type '{loan_type}' is not in the catalog"),
            })
    }

    pub fn max_tenor(&self, loan_type: LoanType) -> LoanSimResult<u32> {
        Ok(self.get(loan_type)?.max_tenor_years)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LoanType, &LoanTypeSpec)> {
        self.entries.iter()
    }
}

impl Default for LoanCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_builtin_ceilings() {
        let catalog = LoanCatalog::builtin();
        assert_eq!(catalog.max_tenor(LoanType::Mortgage).unwrap(), 30);
        assert_eq!(catalog.max_tenor(LoanType::AutoLoan).unwrap(), 7);
        assert_eq!(catalog.max_tenor(LoanType::MultiPurpose).unwrap(), 10);
    }

    #[test]
    fn test_catalog_json_round_trip_uses_snake_case_keys() {
        let json = serde_json::to_value(LoanCatalog::builtin()).unwrap();
        assert_eq!(json["auto_loan"]["max_tenor_years"], 7);
        assert_eq!(json["mortgage"]["label"], "Mortgage (KPR)");
    }

    #[test]
    fn test_partial_catalog_missing_type() {
        let catalog = LoanCatalog::from_entries([(
            LoanType::Mortgage,
            LoanTypeSpec {
                label: "Home".into(),
                max_tenor_years: 25,
                default_rate_percent: dec!(6),
            },
        )])
        .unwrap();
        assert_eq!(catalog.max_tenor(LoanType::Mortgage).unwrap(), 25);
        let err = catalog.max_tenor(LoanType::AutoLoan).unwrap_err();
        assert!(matches!(err, LoanSimError::InvalidInput { ref field, .. } if field == "loan_type"));
    }

    #[test]
    fn test_zero_tenor_catalog_rejected() {
        let err = LoanCatalog::from_entries([(
            LoanType::AutoLoan,
            LoanTypeSpec {
                label: "Car".into(),
                max_tenor_years: 0,
                default_rate_percent: dec!(8),
            },
        )])
        .unwrap_err();
        assert!(err.to_string().contains("auto_loan.max_tenor_years"));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(LoanCatalog::from_entries(Vec::<(LoanType, LoanTypeSpec)>::new()).is_err());
    }
}

//! Smart Loan Simulator: amortization schedules under flat, effective and
//! fixed-then-floating interest regimes, plus DTI-based affordability checks.

pub mod affordability;
pub mod amortization;
pub mod catalog;
pub mod comparison;
pub mod floating_rate;
pub mod schedule;

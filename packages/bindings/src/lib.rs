use napi::Result as NapiResult;
use napi_derive::napi;

use loan_sim_core::loan_simulator::{affordability, amortization, catalog, comparison};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Loan simulator
// ---------------------------------------------------------------------------

#[napi]
pub fn validate_loan(input_json: String) -> NapiResult<String> {
    let input: amortization::LoanRequest =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    amortization::validate(&input).map_err(to_napi_error)?;
    serde_json::to_string(&serde_json::json!({
        "valid": true,
        "loan_amount": input.loan_amount(),
        "number_of_months": input.number_of_months(),
    }))
    .map_err(to_napi_error)
}

#[napi]
pub fn simulate_loan(input_json: String) -> NapiResult<String> {
    let input: amortization::LoanRequest =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::simulate_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_interest_regimes(input_json: String) -> NapiResult<String> {
    let input: amortization::LoanRequest =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = comparison::compare_interest_regimes(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn max_affordable_loan(input_json: String) -> NapiResult<String> {
    let input: affordability::AffordabilityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = affordability::max_affordable_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn loan_types() -> NapiResult<String> {
    serde_json::to_string(&catalog::LoanCatalog::builtin()).map_err(to_napi_error)
}

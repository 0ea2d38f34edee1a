use serde_json::Value;

use super::format_cell;

/// Headline fields, in priority order, searched in the result and its summary.
const PRIORITY_KEYS: [&str; 6] = [
    "monthly_payment",
    "max_loan_amount",
    "interest_difference",
    "valid",
    "dti_ratio",
    "total_interest",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match headline(result_obj) {
        Some(line) => println!("{}", line),
        None => println!("{}", format_cell(result_obj)),
    }
}

fn headline(result: &Value) -> Option<String> {
    let map = result.as_object()?;
    let summary = map.get("summary").and_then(Value::as_object);

    for key in PRIORITY_KEYS {
        let found = map
            .get(key)
            .or_else(|| summary.and_then(|s| s.get(key)))
            .filter(|v| !v.is_null());
        if let Some(val) = found {
            return Some(format_cell(val));
        }
    }

    map.iter()
        .next()
        .map(|(key, val)| format!("{}: {}", key, format_cell(val)))
}

use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::format_cell;

/// Format output as tables using the tabled crate.
///
/// Scalar result fields share one Field/Value table; nested objects (the loan
/// summary) and arrays of rows (schedule, yearly breakdown) get their own.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_sections(map);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => print_sections(res_map),
        Value::Array(arr) => print_array_table(arr),
        other => println!("{}", format_cell(other)),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_sections(map: &Map<String, Value>) {
    let scalars: Vec<(&String, &Value)> = map
        .iter()
        .filter(|(_, v)| !v.is_object() && !is_row_array(v))
        .collect();
    if !scalars.is_empty() {
        println!("{}", field_value_table(scalars));
    }

    for (key, val) in map {
        match val {
            Value::Object(inner) => {
                println!("\n{}", title(key));
                println!("{}", field_value_table(inner.iter().collect()));
            }
            Value::Array(rows) if is_row_array(val) => {
                println!("\n{}", title(key));
                print_array_table(rows);
            }
            _ => {}
        }
    }
}

fn is_row_array(value: &Value) -> bool {
    matches!(value, Value::Array(arr) if arr.first().is_some_and(Value::is_object))
}

fn title(key: &str) -> String {
    key.replace('_', " ").to_uppercase()
}

fn field_value_table(rows: Vec<(&String, &Value)>) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in rows {
        builder.push_record([key.as_str(), &format_cell(val)]);
    }
    builder.build()
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_cell).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", builder.build());
    } else {
        for item in arr {
            println!("{}", format_cell(item));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_array_detection() {
        assert!(is_row_array(&json!([{ "month": 1 }])));
        assert!(!is_row_array(&json!([1, 2])));
        assert!(!is_row_array(&json!([])));
        assert!(!is_row_array(&json!("x")));
    }

    #[test]
    fn test_title() {
        assert_eq!(title("yearly_breakdown"), "YEARLY BREAKDOWN");
    }
}

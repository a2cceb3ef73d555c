use serde_json::Value;

use super::{decimal_of, format_money};

/// Print only what the patient pays, e.g. `3,098.80`.
pub fn print_minimal(value: &Value) {
    match final_cost(value) {
        Some(cost) => println!("{cost}"),
        None => eprintln!("No final cost in output"),
    }
}

fn final_cost(value: &Value) -> Option<String> {
    let cost = value.get("result")?.get("final_cost")?;
    decimal_of(cost).map(format_money)
}

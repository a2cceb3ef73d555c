use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{chart, decimal_of, format_money, format_percent};

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) if result.contains_key("scenarios") => {
                print_simulation(result);
                print_envelope_notes(map);
            }
            _ => print_flat_object(map),
        },
        _ => println!("{}", value),
    }
}

fn print_simulation(result: &Map<String, Value>) {
    let money = |key: &str| {
        result
            .get(key)
            .and_then(decimal_of)
            .map(format_money)
            .unwrap_or_default()
    };
    let metrics = result.get("metrics").and_then(Value::as_object);
    let metric = |key: &str| metrics.and_then(|m| m.get(key)).and_then(decimal_of);

    let mut builder = Builder::default();
    builder.push_record(["Metric", "Value"]);
    builder.push_record(["Total cost".to_string(), money("total_cost")]);
    builder.push_record([
        "Current reimbursement".to_string(),
        money("current_reimbursement"),
    ]);
    builder.push_record(["Patient pays".to_string(), money("final_cost")]);
    if let Some(rate) = metric("savings_rate") {
        builder.push_record(["Saved".to_string(), format_percent(rate)]);
    }
    if let Some(daily) = metric("daily_average_cost") {
        builder.push_record(["Daily average".to_string(), format_money(daily)]);
    }
    if let Some(monthly) = metric("monthly_average_cost") {
        builder.push_record(["Monthly average".to_string(), format_money(monthly)]);
    }
    if let Some(Value::String(policy)) = result.get("stacking_policy") {
        builder.push_record(["Stacking".to_string(), policy.clone()]);
    }
    if let Some(Value::Bool(true)) = result.get("capped") {
        builder.push_record(["Capped at total", "yes"]);
    }
    println!("{}", Table::from(builder));

    if let Some(Value::Array(programs)) = result.get("reimbursement_by_program") {
        if !programs.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["Program", "Type", "Enrolled", "Computed", "Applied", "Share"]);
            for p in programs {
                builder.push_record([
                    text(p, "id"),
                    text(p, "kind"),
                    text(p, "enabled"),
                    money_at(p, "computed"),
                    money_at(p, "applied"),
                    money_at(p, "capped_share"),
                ]);
            }
            println!("\n{}", Table::from(builder));
        }
    }

    if let Some(Value::Array(scenarios)) = result.get("scenarios") {
        let mut builder = Builder::default();
        builder.push_record(["Scenario", "Reimbursed", "Patient pays"]);
        for s in scenarios {
            builder.push_record([
                text(s, "label"),
                money_at(s, "reimbursement"),
                money_at(s, "scenario_cost"),
            ]);
        }
        println!("\n{}", Table::from(builder));

        println!();
        for line in chart::render_scenarios(scenarios) {
            println!("{}", line);
        }
    }
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
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

fn print_flat_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

fn money_at(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(decimal_of)
        .map(format_money)
        .unwrap_or_default()
}

fn text(value: &Value, key: &str) -> String {
    value.get(key).map(format_value).unwrap_or_default()
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

use serde_json::Value;
use std::io;

/// Write output as CSV to stdout.
///
/// Simulation results become one row per scenario; anything else is
/// written as field,value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value.as_object().and_then(|m| m.get("result"));
    match (result, value) {
        (Some(res), _) if res.get("scenarios").is_some() => {
            write_scenarios(&mut wtr, res);
        }
        (_, Value::Object(map)) => {
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in map {
                let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
            }
        }
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_scenarios<W: io::Write>(wtr: &mut csv::Writer<W>, result: &Value) {
    let total = result.get("total_cost").map(format_csv_value).unwrap_or_default();
    let _ = wtr.write_record(["scenario", "label", "total_cost", "reimbursement", "scenario_cost"]);

    if let Some(Value::Array(scenarios)) = result.get("scenarios") {
        for s in scenarios {
            let field = |key: &str| s.get(key).map(format_csv_value).unwrap_or_default();
            let _ = wtr.write_record([
                field("kind"),
                field("label"),
                total.clone(),
                field("reimbursement"),
                field("scenario_cost"),
            ]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

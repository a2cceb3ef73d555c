use colored::{ColoredString, Colorize};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

use super::{decimal_of, format_money};

const BAR_WIDTH: usize = 40;
const BAR_CHAR: &str = "█";

/// Bar length for `cost` when `max` fills `width` cells.
pub fn bar_width(cost: Decimal, max: Decimal, width: usize) -> usize {
    if width == 0 || max <= Decimal::ZERO || cost <= Decimal::ZERO {
        return 0;
    }
    let scaled = (cost / max * Decimal::from(width))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    // Any non-zero cost stays visible
    scaled.to_usize().unwrap_or(0).clamp(1, width)
}

fn paint(bar: String, tone: &str) -> ColoredString {
    match tone {
        "Warning" => bar.red(),
        "Neutral" => bar.yellow(),
        "Positive" => bar.green(),
        _ => bar.normal(),
    }
}

/// Horizontal bar chart of patient cost per scenario.
pub fn render_scenarios(scenarios: &[Value]) -> Vec<String> {
    let rows: Vec<(String, Decimal, String)> = scenarios
        .iter()
        .filter_map(|s| {
            let label = s.get("label")?.as_str()?.to_string();
            let cost = decimal_of(s.get("scenario_cost")?)?;
            let tone = s.get("tone").and_then(Value::as_str).unwrap_or("").to_string();
            Some((label, cost, tone))
        })
        .collect();

    let max = rows.iter().map(|(_, c, _)| *c).max().unwrap_or(Decimal::ZERO);
    let label_width = rows.iter().map(|(l, _, _)| l.chars().count()).max().unwrap_or(0);

    rows.iter()
        .map(|(label, cost, tone)| {
            let cells = bar_width(*cost, max, BAR_WIDTH);
            // Pad outside the escape codes so colored and plain output align
            format!(
                "{:<label_width$}  {}{}  {}",
                label,
                paint(BAR_CHAR.repeat(cells), tone),
                " ".repeat(BAR_WIDTH - cells),
                format_money(*cost),
            )
        })
        .collect()
}

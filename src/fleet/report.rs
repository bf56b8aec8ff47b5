// Service-order report rendering

use chrono::DateTime;
use serde_json::Value;

use super::models::{ServiceOrder, Vehicle};

const RULE: &str = "---------------------------------";
const NOT_AVAILABLE: &str = "N/A";

/// Render a creation timestamp as `DD/MM/YYYY hh:mm:ss`, keeping the raw
/// value when it does not parse
pub fn format_timestamp(raw: &str) -> String {
    let normalized = if raw.ends_with('Z') {
        raw.replace('Z', "+00:00")
    } else {
        raw.to_string()
    };

    DateTime::parse_from_rfc3339(&normalized)
        .map(|dt| dt.format("%d/%m/%Y %H:%M:%S").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Cost as a number; missing or unparsable costs count as zero
pub fn parse_cost(raw: Option<&Value>) -> f64 {
    match raw {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Brazilian currency: `R$ 1.234,56`
pub fn format_brl(amount: f64) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let cents = (amount.abs() * 100.0).round() as u64;
    let (units, fraction) = (cents / 100, cents % 100);

    let digits = units.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("R$ {}{},{:02}", sign, grouped, fraction)
}

/// A field as the API sent it: strings bare, anything else as JSON.
/// Missing, null and empty values read `N/A`.
fn display_value(raw: Option<&Value>) -> String {
    match raw {
        None | Some(Value::Null) => NOT_AVAILABLE.to_string(),
        Some(Value::String(s)) if s.is_empty() => NOT_AVAILABLE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_AVAILABLE)
}

/// Render one service order block, closed by a rule line
pub fn render_service_order(order: &ServiceOrder) -> String {
    let mut out = String::new();

    let created = match order.created_at.as_ref() {
        Some(Value::String(raw)) if !raw.is_empty() => format_timestamp(raw),
        other => display_value(other),
    };
    let vehicle = order.vehicle.as_ref().and_then(|v| v.name.as_deref());
    let cost = format_brl(parse_cost(order.total_cost.as_ref()));

    out.push_str(&format!("ID: {}\n", order.id));
    out.push_str(&format!("Name: {}\n", display_value(order.name.as_ref())));
    out.push_str(&format!("Status: {}\n", display_value(order.status.as_ref())));
    out.push_str(&format!("Created: {}\n", created));
    out.push_str(&format!("Vehicle: {}\n", or_na(vehicle)));
    out.push_str(&format!("Total cost: {}\n", cost));
    out.push_str(&format!(
        "Problem description: {}\n",
        display_value(order.problem_description.as_ref())
    ));
    out.push_str(&format!(
        "Supplier: {}\n",
        or_na(order.supplier.as_ref().and_then(|s| s.display_name()))
    ));
    out.push_str(&format!(
        "Employee: {}\n",
        or_na(order.employee.as_ref().and_then(|e| e.display_name()))
    ));

    match order.foreseen_service_order_items.as_deref() {
        Some(items) if !items.is_empty() => {
            out.push_str("Foreseen items:\n");
            for item in items {
                out.push_str(&format!(
                    "  - {} (qty: {})\n",
                    or_na(item.display_name()),
                    display_value(item.foreseen_quantity.as_ref())
                ));
            }
        }
        _ => out.push_str(&format!("Foreseen items: {}\n", NOT_AVAILABLE)),
    }

    out.push_str(RULE);
    out.push('\n');
    out
}

/// Orders belonging to `vehicle`, rendered with header and total
pub fn render_report(vehicle: &Vehicle, orders: &[ServiceOrder]) -> String {
    let matching: Vec<&ServiceOrder> = orders
        .iter()
        .filter(|order| order.belongs_to(&vehicle.id))
        .collect();

    let mut out = String::from("Service orders found:\n");
    out.push_str(RULE);
    out.push('\n');
    for order in &matching {
        out.push_str(&render_service_order(order));
    }
    out.push_str(&format!("Total found: {}", matching.len()));
    out
}

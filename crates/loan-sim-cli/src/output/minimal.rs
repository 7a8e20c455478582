use serde_json::Value;

/// Headline figure of each simulator, in lookup order.
const HEADLINE_KEYS: [&str; 8] = [
    "monthly_payment",
    "new_payment",
    "max_property_value",
    "applied_rate_percent",
    "max_term_years",
    "tier",
    "financed_amount",
    "auto",
];

/// Print just the headline value of a simulation.
///
/// Falls back to the first field when no known headline key is present.
pub fn print_minimal(result: &Value) {
    if let Value::Object(map) = result {
        for key in &HEADLINE_KEYS {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

use serde_json::Value;

/// Print just the headline figure of the output.
///
/// Rankings print one `company: payment` line per quote; other results
/// print the first well-known field present.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(Value::Array(quotes)) = result_obj.get("quotes") {
        for quote in quotes {
            println!(
                "{}: {}",
                quote.get("company").map(format_minimal).unwrap_or_default(),
                quote
                    .get("monthly_payment")
                    .map(format_minimal)
                    .unwrap_or_default()
            );
        }
        return;
    }

    let priority_keys = [
        "monthly_payment",
        "rate",
        "total_tax",
        "grades",
        "companies",
        "conditions",
        "samples_used",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
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

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(items) if items.iter().all(Value::is_string) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join("\n"),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::QUOTE_COLUMNS;

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => print_envelope(result, map),
            None => print_fields(map),
        },
        Value::Array(arr) => print_rows(arr, None),
        _ => println!("{}", value),
    }
}

fn print_envelope(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res) if res.contains_key("quotes") => print_ranking(res),
        Value::Object(res) => {
            print_fields(res);
            if let Some(Value::Object(details)) = res.get("details") {
                println!("\nDetails:");
                print_fields(details);
            }
            if let Some(Value::Array(trace)) = res.get("trace") {
                println!("\nTrace:");
                for line in trace.iter().filter_map(Value::as_str) {
                    println!("  {}", line);
                }
            }
        }
        other => println!("{}", format_value(other)),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_ranking(result: &Map<String, Value>) {
    if let Some(Value::Array(quotes)) = result.get("quotes") {
        print_rows(quotes, Some(&QUOTE_COLUMNS[..]));
    }
    if let Some(Value::Array(failures)) = result.get("failures") {
        if !failures.is_empty() {
            println!("\nNot priced:");
            print_rows(failures, None);
        }
    }
}

/// Field/value table; nested arrays and objects are left to the sections below it.
fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        if matches!(key.as_str(), "trace" | "details") {
            continue;
        }
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows(arr: &[Value], columns: Option<&[&str]>) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            println!("{}", format_value(item));
        }
        return;
    };

    let headers: Vec<String> = match columns {
        Some(cols) => cols.iter().map(|c| c.to_string()).collect(),
        None => first.keys().cloned().collect(),
    };

    let mut builder = Builder::default();
    builder.push_record(std::iter::once("#".to_string()).chain(headers.iter().cloned()));
    for (rank, item) in arr.iter().enumerate() {
        if let Value::Object(map) = item {
            let row = headers.iter().map(|h| {
                map.get(h.as_str())
                    .map(format_value)
                    .unwrap_or_default()
            });
            builder.push_record(std::iter::once((rank + 1).to_string()).chain(row));
        }
    }
    println!("{}", Table::from(builder));
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

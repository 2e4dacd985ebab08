use serde_json::{Map, Value};
use std::io;

use super::QUOTE_COLUMNS;

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => {
                if let Some(Value::Array(quotes)) = result.get("quotes") {
                    // Ranking: one row per company
                    write_rows(&mut wtr, quotes, &QUOTE_COLUMNS);
                } else {
                    write_fields(&mut wtr, result);
                }
            }
            _ => write_fields(&mut wtr, map),
        },
        Value::Array(arr) => {
            if let Some(Value::Object(first)) = arr.first() {
                let headers: Vec<&str> = first.keys().map(String::as_str).collect();
                write_rows(&mut wtr, arr, &headers);
            }
        }
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

/// Two-column CSV: field, value. Nested detail values are emitted as extra
/// `details.<field>` rows; the trace is left out.
fn write_fields(wtr: &mut StdoutWriter<'_>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        match (key.as_str(), val) {
            ("trace", _) => {}
            ("details", Value::Object(details)) => {
                for (k, v) in details {
                    let _ = wtr.write_record([format!("details.{k}"), format_csv_value(v)]);
                }
            }
            _ => {
                let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
            }
        }
    }
}

fn write_rows(wtr: &mut StdoutWriter<'_>, arr: &[Value], headers: &[&str]) {
    let _ = wtr.write_record(headers);
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
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

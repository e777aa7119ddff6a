use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

/// Format output as tables using the tabled crate.
///
/// Scalar result fields go into one Field/Value table. Nested sections (the
/// plan output's scenario, DTI and so on) and row arrays such as schedule
/// rows each get their own titled table.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result(result);
                print_envelope_notes(map);
            } else {
                print_section(None, map);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Value) {
    match result {
        Value::Object(map) => print_section(None, map),
        Value::Array(arr) => print_array_table(arr),
        other => println!("{}", format_value(other)),
    }
}

fn print_section(title: Option<&str>, map: &Map<String, Value>) {
    if let Some(title) = title {
        println!("\n{}", title);
    }

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut scalars = 0;
    let mut nested = Vec::new();

    for (key, val) in map {
        match val {
            Value::Object(inner) => nested.push((key.as_str(), NestedKind::Section(inner))),
            Value::Array(rows) if rows.first().is_some_and(Value::is_object) => {
                nested.push((key.as_str(), NestedKind::Rows(rows)))
            }
            _ => {
                builder.push_record([key.as_str(), &format_value(val)]);
                scalars += 1;
            }
        }
    }

    if scalars > 0 {
        println!("{}", Table::from(builder));
    }

    for (key, kind) in nested {
        match kind {
            NestedKind::Section(inner) => print_section(Some(key), inner),
            NestedKind::Rows(rows) => {
                println!("\n{}", key);
                print_array_table(rows);
            }
        }
    }
}

enum NestedKind<'a> {
    Section(&'a Map<String, Value>),
    Rows(&'a Vec<Value>),
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
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
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

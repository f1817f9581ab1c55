use dataforge_core::{DEFAULT_SCHEMA, load_schema, parse_schema};

fn main() {
    let input = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SCHEMA.to_string());
    let value = load_schema(&input).expect("load schema");
    let schema = parse_schema(&value).expect("parse schema");

    let described: serde_json::Map<String, serde_json::Value> = schema
        .iter()
        .map(|(name, descriptor)| {
            let value = serde_json::to_value(descriptor).expect("serialize descriptor");
            (name.to_string(), value)
        })
        .collect();

    let json = serde_json::to_string_pretty(&described).expect("serialize json");
    println!("{json}");
    for warning in schema.warnings() {
        eprintln!("warning: field '{}': {}", warning.field, warning.message);
    }
}

//! JSON I/O handling for CLI
//!
//! - Input: one JSON document via stdin
//! - Output: one JSON object per line via stdout
//! - UTF-8 only

use std::io::{self, Read, Write};

use serde_json::{json, Map, Number, Value as Json};

use super::errors::{CliError, CliResult};
use crate::schema::{FieldDef, FieldType, Record, Schema, Value};

/// Read a JSON document from `reader`
pub fn read_json<R: Read>(mut reader: R) -> CliResult<Json> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;

    if input.trim().is_empty() {
        return Err(CliError::input_error("Empty input"));
    }

    Ok(serde_json::from_str(&input)?)
}

/// Write a success response to stdout
pub fn write_response(data: Json) -> CliResult<()> {
    write_line(&mut io::stdout(), &json!({ "status": "ok", "data": data }))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_line(
        &mut io::stdout(),
        &json!({ "status": "error", "code": code, "message": message }),
    )
}

fn write_line<W: Write>(out: &mut W, response: &Json) -> CliResult<()> {
    serde_json::to_writer(&mut *out, response)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Converts a JSON object into a record of `schema`.
///
/// Fields the object leaves out stay missing so the store reports them.
pub fn record_from_json(schema: &Schema, input: &Json) -> CliResult<Record> {
    let object = input
        .as_object()
        .ok_or_else(|| CliError::input_error("Expected a JSON object"))?;

    let mut record = Record::new();
    for (name, raw) in object {
        let field = schema.field(name).ok_or_else(|| {
            CliError::input_error(format!(
                "field '{}' is not declared by schema '{}'",
                name, schema.name
            ))
        })?;
        record.set(name.clone(), value_from_json(field, raw)?);
    }
    Ok(record)
}

/// Converts a JSON object or array of objects into records
pub fn records_from_json(schema: &Schema, input: &Json) -> CliResult<Vec<Record>> {
    match input {
        Json::Array(items) => items
            .iter()
            .map(|item| record_from_json(schema, item))
            .collect(),
        other => Ok(vec![record_from_json(schema, other)?]),
    }
}

fn value_from_json(field: &FieldDef, raw: &Json) -> CliResult<Value> {
    let value = match (&field.field_type, raw) {
        (FieldType::Int, Json::Number(n)) => n.as_i64().map(Value::Int),
        (FieldType::Float, Json::Number(n)) => n.as_f64().map(Value::Float),
        (FieldType::Bool, Json::Bool(b)) => Some(Value::Bool(*b)),
        (FieldType::Text, Json::String(s)) => Some(Value::Text(s.clone())),
        (FieldType::Enum { .. }, Json::String(s)) => Some(Value::symbol(s.as_str())),
        (FieldType::Enum { symbols }, Json::Number(n)) => n
            .as_u64()
            .and_then(|i| usize::try_from(i).ok())
            .and_then(|i| symbols.get(i))
            .map(|s| Value::symbol(s.as_str())),
        _ => None,
    };

    value.ok_or_else(|| {
        CliError::input_error(format!(
            "field '{}' expects {}, got {}",
            field.name,
            field.field_type.type_name(),
            raw
        ))
    })
}

/// Converts a record to a JSON object. Non-finite floats become `null`.
pub fn record_to_json(schema: &Schema, record: &Record) -> Json {
    let mut object = Map::new();
    for field in &schema.fields {
        if let Some(value) = record.get(&field.name) {
            object.insert(field.name.clone(), value_to_json(value));
        }
    }
    Json::Object(object)
}

fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Int(i) => Json::from(*i),
        Value::Float(x) => Number::from_f64(*x).map_or(Json::Null, Json::Number),
        Value::Bool(b) => Json::Bool(*b),
        Value::Text(s) | Value::Symbol(s) => Json::String(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::new(
            "person",
            vec![
                FieldDef::int("ID"),
                FieldDef::text("Name"),
                FieldDef::float("Grade"),
                FieldDef::bool("IsActive"),
                FieldDef::enumeration("Role", ["Admin", "User"]),
            ],
        )
    }

    #[test]
    fn test_record_from_json() {
        let input = json!({
            "ID": 1, "Name": "A", "Grade": 20, "IsActive": true, "Role": 1
        });
        let record = record_from_json(&schema(), &input).unwrap();
        assert_eq!(record.get("ID"), Some(&Value::Int(1)));
        assert_eq!(record.get("Grade"), Some(&Value::Float(20.0)));
        assert_eq!(record.get("Role"), Some(&Value::symbol("User")));
        assert!(schema().check_record(&record).is_ok());
    }

    #[test]
    fn test_record_from_json_rejects_bad_input() {
        let err = record_from_json(&schema(), &json!({"ID": "1"})).unwrap_err();
        assert!(err.message().contains("'ID' expects int"));

        let err = record_from_json(&schema(), &json!({"Email": "x"})).unwrap_err();
        assert!(err.message().contains("not declared"));

        let err = record_from_json(&schema(), &json!({"Role": 5})).unwrap_err();
        assert!(err.message().contains("Role"));

        assert!(record_from_json(&schema(), &json!([1, 2])).is_err());
    }

    #[test]
    fn test_records_from_array() {
        let input = json!([{"ID": 1}, {"ID": 2}]);
        let records = records_from_json(&schema(), &input).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("ID"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_record_to_json() {
        let record = Record::new()
            .with("ID", 2i64)
            .with("Name", "B")
            .with("Grade", f64::NAN)
            .with("IsActive", false)
            .with("Role", Value::symbol("Admin"));
        assert_eq!(
            record_to_json(&schema(), &record),
            json!({"ID": 2, "Name": "B", "Grade": null, "IsActive": false, "Role": "Admin"})
        );
    }

    #[test]
    fn test_read_json() {
        let value = read_json("  {\"ID\": 3}\n".as_bytes()).unwrap();
        assert_eq!(value, json!({"ID": 3}));
        assert!(read_json(" \n".as_bytes()).is_err());
        assert!(read_json("{".as_bytes()).is_err());
    }

    #[test]
    fn test_write_line() {
        let mut out = Vec::new();
        write_line(&mut out, &json!({"status": "ok", "data": 1})).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), 1);
        let parsed: Json = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, json!({"status": "ok", "data": 1}));
    }
}

//! Record → line encoding

use super::errors::{CodecError, CodecResult};
use super::tags::{self, BREAK_SENTINEL, FIELD_SEPARATOR};
use crate::schema::{FieldDef, FieldType, KeyedSchema, Record, Value};

/// Encodes a record as one line (without terminator).
///
/// The key field comes first, then the remaining fields in declaration
/// order. Newlines in text values are replaced with the break sentinel.
///
/// # Errors
///
/// - `KeyContainsNewline` if the key text contains `\n`
/// - `ReservedToken` if any value contains a format token
/// - `MissingValue` / `WrongKind` if the record does not fit the schema
pub fn encode(schema: &KeyedSchema, record: &Record) -> CodecResult<String> {
    let key_field = schema.key_field();
    let key = record
        .get(&key_field.name)
        .ok_or_else(|| CodecError::MissingValue(key_field.name.clone()))?;

    let mut line = key_chunk(schema, key)?;

    for field in schema.line_order().skip(1) {
        let value = record
            .get(&field.name)
            .ok_or_else(|| CodecError::MissingValue(field.name.clone()))?;

        let mut text = render_value(field, value)?;
        if field.field_type == FieldType::Text {
            text = text.replace('\n', BREAK_SENTINEL);
        }

        line.push_str(FIELD_SEPARATOR);
        line.push_str(&tags::wrap(&field.name, &text));
    }

    Ok(line)
}

/// The first chunk of every line stored under `key`.
///
/// Lookups, updates and removals match lines by comparing this chunk.
pub fn key_chunk(schema: &KeyedSchema, key: &Value) -> CodecResult<String> {
    let field = schema.key_field();
    let text = render_value(field, key)?;

    if text.contains('\n') {
        return Err(CodecError::KeyContainsNewline {
            field: field.name.clone(),
        });
    }

    Ok(tags::wrap(&field.name, &text))
}

/// Renders a value as field text, before newline escaping.
pub fn render_value(field: &FieldDef, value: &Value) -> CodecResult<String> {
    if !field.field_type.accepts(value) {
        return Err(CodecError::WrongKind {
            field: field.name.clone(),
            expected: field.field_type.type_name(),
            actual: value.describe(),
        });
    }

    let text = match value {
        Value::Int(i) => i.to_string(),
        Value::Float(x) => tags::render_float(*x),
        Value::Bool(b) => tags::render_bool(*b).to_string(),
        Value::Text(s) | Value::Symbol(s) => s.clone(),
    };

    for token in [FIELD_SEPARATOR, BREAK_SENTINEL] {
        if text.contains(token) {
            return Err(CodecError::ReservedToken {
                field: field.name.clone(),
                token,
            });
        }
    }

    Ok(text)
}

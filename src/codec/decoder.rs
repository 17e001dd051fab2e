//! Line → record decoding

use super::errors::{CodecError, CodecResult};
use super::tags::{self, BREAK_SENTINEL, FIELD_SEPARATOR};
use crate::schema::{FieldDef, FieldType, Record, Schema, Value};

/// Decodes one line (without terminator) into a record.
///
/// Each chunk is matched to the first field, in declaration order, whose
/// open tag prefixes it. Chunks that match no field are skipped. Fields
/// absent from the line take their type's default value; a field present
/// twice keeps the later chunk.
pub fn decode(schema: &Schema, line: &str) -> CodecResult<Record> {
    let tags: Vec<(String, String)> = schema
        .fields
        .iter()
        .map(|f| (tags::open_tag(&f.name), tags::close_tag(&f.name)))
        .collect();

    let mut record = Record::new();

    for chunk in line.split(FIELD_SEPARATOR) {
        let matched = schema
            .fields
            .iter()
            .zip(&tags)
            .find(|(_, (open, _))| chunk.starts_with(open.as_str()));

        let (field, (open, close)) = match matched {
            Some(m) => m,
            None => continue,
        };

        let inner = chunk[open.len()..]
            .strip_suffix(close.as_str())
            .ok_or_else(|| CodecError::UnterminatedField(field.name.clone()))?;

        record.set(field.name.clone(), parse_value(field, inner)?);
    }

    for field in &schema.fields {
        if record.get(&field.name).is_none() {
            record.set(field.name.clone(), field.field_type.default_value());
        }
    }

    Ok(record)
}

/// Parses field text (the inner text of a chunk) into a value.
///
/// Enum text may be a symbol name or a numeric ordinal. Text values have
/// the break sentinel turned back into newlines.
pub fn parse_value(field: &FieldDef, text: &str) -> CodecResult<Value> {
    let invalid = |expected: &'static str| CodecError::InvalidValue {
        field: field.name.clone(),
        text: text.to_string(),
        expected,
    };

    match &field.field_type {
        FieldType::Int => tags::parse_int(text)
            .map(Value::Int)
            .ok_or_else(|| invalid("int")),
        FieldType::Float => tags::parse_float(text)
            .map(Value::Float)
            .ok_or_else(|| invalid("float")),
        FieldType::Bool => tags::parse_bool(text)
            .map(Value::Bool)
            .ok_or_else(|| invalid("bool")),
        FieldType::Text => Ok(Value::Text(text.replace(BREAK_SENTINEL, "\n"))),
        FieldType::Enum { symbols } => parse_symbol(field, symbols, text),
    }
}

fn parse_symbol(field: &FieldDef, symbols: &[String], text: &str) -> CodecResult<Value> {
    let trimmed = text.trim();

    if let Some(symbol) = symbols.iter().find(|s| *s == text || *s == trimmed) {
        return Ok(Value::Symbol(symbol.clone()));
    }

    trimmed
        .parse::<usize>()
        .ok()
        .and_then(|ordinal| symbols.get(ordinal))
        .map(|symbol| Value::Symbol(symbol.clone()))
        .ok_or_else(|| CodecError::UnknownSymbol {
            field: field.name.clone(),
            text: text.to_string(),
        })
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
    fn test_decode_line() {
        let line = "<db.ID>2</db.ID><db.br/><db.Name>Arash</db.Name><db.br/><db.Role>User</db.Role>\
                    <db.br/><db.Grade>21.992</db.Grade><db.br/><db.IsActive>True</db.IsActive>";
        let record = decode(&schema(), line).unwrap();

        assert_eq!(record.get("ID"), Some(&Value::Int(2)));
        assert_eq!(record.get("Name"), Some(&Value::Text("Arash".into())));
        assert_eq!(record.get("Grade"), Some(&Value::Float(21.992)));
        assert_eq!(record.get("IsActive"), Some(&Value::Bool(true)));
        assert_eq!(record.get("Role"), Some(&Value::symbol("User")));
    }

    #[test]
    fn test_break_sentinel_unescaped() {
        let line = "<db.ID>1</db.ID><db.br/><db.Name>a<db.break/>b</db.Name>";
        let record = decode(&schema(), line).unwrap();
        assert_eq!(record.get("Name"), Some(&Value::Text("a\nb".into())));
    }

    #[test]
    fn test_enum_ordinal_accepted() {
        let line = "<db.ID>1</db.ID><db.br/><db.Role>1</db.Role>";
        let record = decode(&schema(), line).unwrap();
        assert_eq!(record.get("Role"), Some(&Value::symbol("User")));
    }

    #[test]
    fn test_enum_unknown_rejected() {
        for text in ["Guest", "2", "-1"] {
            let line = format!("<db.ID>1</db.ID><db.br/><db.Role>{}</db.Role>", text);
            let err = decode(&schema(), &line).unwrap_err();
            assert!(matches!(err, CodecError::UnknownSymbol { .. }), "{}", text);
        }
    }

    #[test]
    fn test_unparsable_scalar_rejected() {
        let err = decode(&schema(), "<db.ID>one</db.ID>").unwrap_err();
        assert_eq!(
            err,
            CodecError::InvalidValue {
                field: "ID".into(),
                text: "one".into(),
                expected: "int",
            }
        );

        let err = decode(&schema(), "<db.ID>1</db.ID><db.br/><db.IsActive>maybe</db.IsActive>")
            .unwrap_err();
        assert_eq!(err.field(), "IsActive");
    }

    #[test]
    fn test_unknown_chunks_ignored() {
        let line = "<db.ID>1</db.ID><db.br/><db.Nickname>Ash</db.Nickname><db.br/>garbage";
        let record = decode(&schema(), line).unwrap();
        assert_eq!(record.get("ID"), Some(&Value::Int(1)));
        assert_eq!(record.get("Nickname"), None);
    }

    #[test]
    fn test_missing_fields_defaulted() {
        let record = decode(&schema(), "<db.ID>3</db.ID>").unwrap();
        assert_eq!(record.get("Name"), Some(&Value::Text(String::new())));
        assert_eq!(record.get("Grade"), Some(&Value::Float(0.0)));
        assert_eq!(record.get("IsActive"), Some(&Value::Bool(false)));
        assert_eq!(record.get("Role"), Some(&Value::symbol("Admin")));
        assert_eq!(record.len(), 5);
    }

    #[test]
    fn test_reordered_chunks() {
        let line = "<db.Name>Z</db.Name><db.br/><db.ID>8</db.ID>";
        let record = decode(&schema(), line).unwrap();
        assert_eq!(record.get("ID"), Some(&Value::Int(8)));
        assert_eq!(record.get("Name"), Some(&Value::Text("Z".into())));
    }

    #[test]
    fn test_later_duplicate_wins() {
        let line = "<db.ID>1</db.ID><db.br/><db.ID>2</db.ID>";
        let record = decode(&schema(), line).unwrap();
        assert_eq!(record.get("ID"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_unterminated_chunk_rejected() {
        let err = decode(&schema(), "<db.ID>1").unwrap_err();
        assert_eq!(err, CodecError::UnterminatedField("ID".into()));
    }

    #[test]
    fn test_scalar_forms_from_existing_files() {
        let line = "<db.ID> 4 </db.ID><db.br/><db.Grade>1.5E+20</db.Grade><db.br/>\
                    <db.IsActive>false</db.IsActive>";
        let record = decode(&schema(), line).unwrap();
        assert_eq!(record.get("ID"), Some(&Value::Int(4)));
        assert_eq!(record.get("Grade"), Some(&Value::Float(1.5e20)));
        assert_eq!(record.get("IsActive"), Some(&Value::Bool(false)));
    }
}

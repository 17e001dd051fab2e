//! Record codec for tagstore
//!
//! Turns one record into one line of tagged field text and back.
//!
//! ```text
//! <db.KEY>value</db.KEY><db.br/><db.FIELD>value</db.FIELD><db.br/>...
//! ```
//!
//! - Key field first, then the other fields in declaration order
//! - `<db.br/>` between chunks, none after the last
//! - Newlines in text values become `<db.break/>`
//! - Enum values are written as symbol names; ordinals are accepted on read

mod decoder;
mod encoder;
mod errors;
pub mod tags;

pub use decoder::{decode, parse_value};
pub use encoder::{encode, key_chunk, render_value};
pub use errors::{CodecError, CodecResult};
pub use tags::{BREAK_SENTINEL, FIELD_SEPARATOR, LINE_ENDING};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDef, Record, Schema, Value};

    #[test]
    fn test_round_trip() {
        let schema = Schema::new(
            "note",
            vec![
                FieldDef::text("Title"),
                FieldDef::int("ID"),
                FieldDef::text("Body"),
                FieldDef::float("Score"),
                FieldDef::bool("Pinned"),
                FieldDef::enumeration("Kind", ["Memo", "Todo", "Idea"]),
            ],
        )
        .with_key("ID")
        .unwrap();

        let records = [
            Record::new()
                .with("Title", "first")
                .with("ID", 1i64)
                .with("Body", "multi\nline\n\nbody")
                .with("Score", -0.125)
                .with("Pinned", true)
                .with("Kind", Value::symbol("Todo")),
            Record::new()
                .with("Title", "")
                .with("ID", -9_000_000_000i64)
                .with("Body", "<b>tags</b> & \"quotes\"")
                .with("Score", 6.02214076e23)
                .with("Pinned", false)
                .with("Kind", Value::symbol("Idea")),
        ];

        for record in records {
            let line = encode(&schema, &record).unwrap();
            assert_eq!(decode(schema.schema(), &line).unwrap(), record);
        }
    }

    #[test]
    fn test_every_symbol_round_trips() {
        let symbols = ["Admin", "User", "Guest"];
        let schema = Schema::new(
            "s",
            vec![FieldDef::int("ID"), FieldDef::enumeration("Role", symbols)],
        )
        .with_key("ID")
        .unwrap();

        for symbol in symbols {
            let record = Record::new().with("ID", 1i64).with("Role", Value::symbol(symbol));
            let line = encode(&schema, &record).unwrap();
            assert!(line.ends_with(&format!("<db.Role>{}</db.Role>", symbol)));
            assert_eq!(decode(schema.schema(), &line).unwrap(), record);
        }
    }
}

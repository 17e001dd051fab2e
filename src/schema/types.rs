//! Schema type definitions
//!
//! Supported field types:
//! - int: 64-bit signed integer
//! - float: 64-bit floating point
//! - bool: Boolean
//! - text: UTF-8 string
//! - enum: closed, ordered set of symbols (ordinal = position)

use serde::{Deserialize, Serialize};

use super::value::{Record, Value};

/// Supported field types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    /// 64-bit signed integer
    Int,
    /// 64-bit floating point
    Float,
    /// Boolean
    Bool,
    /// UTF-8 string
    Text,
    /// Enumerated symbol from a closed set
    Enum {
        /// Symbol names; a symbol's ordinal is its index
        symbols: Vec<String>,
    },
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Bool => "bool",
            FieldType::Text => "text",
            FieldType::Enum { .. } => "enum",
        }
    }

    /// Value a field takes when its chunk is absent from a line.
    pub fn default_value(&self) -> Value {
        match self {
            FieldType::Int => Value::Int(0),
            FieldType::Float => Value::Float(0.0),
            FieldType::Bool => Value::Bool(false),
            FieldType::Text => Value::Text(String::new()),
            FieldType::Enum { symbols } => {
                Value::Symbol(symbols.first().cloned().unwrap_or_default())
            }
        }
    }

    /// Returns true if `value` is an instance of this type.
    ///
    /// For enums the symbol must belong to the declared set.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (FieldType::Int, Value::Int(_)) => true,
            (FieldType::Float, Value::Float(_)) => true,
            (FieldType::Bool, Value::Bool(_)) => true,
            (FieldType::Text, Value::Text(_)) => true,
            (FieldType::Enum { symbols }, Value::Symbol(s)) => symbols.iter().any(|x| x == s),
            _ => false,
        }
    }
}

/// Field definition: a name and a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name, also the tag name on disk
    pub name: String,
    /// Field data type
    #[serde(flatten)]
    pub field_type: FieldType,
}

impl FieldDef {
    /// Create a field definition
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }

    /// Create an int field
    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Int)
    }

    /// Create a float field
    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Float)
    }

    /// Create a bool field
    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Bool)
    }

    /// Create a text field
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Text)
    }

    /// Create an enum field from its symbols, in ordinal order
    pub fn enumeration<I, S>(name: impl Into<String>, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            FieldType::Enum {
                symbols: symbols.into_iter().map(Into::into).collect(),
            },
        )
    }
}

/// Record type descriptor: a name and fields in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Schema name (used in messages only)
    pub name: String,
    /// Field definitions in declaration order
    pub fields: Vec<FieldDef>,
}

impl Schema {
    /// Create a new schema
    pub fn new(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Looks up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Position of a field in declaration order
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Validates the schema structure itself (not a record)
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.fields.is_empty() {
            return Err(format!("Schema '{}' declares no fields", self.name));
        }

        for (i, field) in self.fields.iter().enumerate() {
            if field.name.is_empty() {
                return Err(format!("Field #{} has an empty name", i));
            }
            // Names become tag names; these characters would break the tags.
            if field
                .name
                .chars()
                .any(|c| c == '<' || c == '>' || c == '/' || c.is_whitespace())
            {
                return Err(format!(
                    "Field name '{}' contains a character not allowed in a tag",
                    field.name
                ));
            }
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(format!("Duplicate field name '{}'", field.name));
            }

            if let FieldType::Enum { symbols } = &field.field_type {
                if symbols.is_empty() {
                    return Err(format!("Enum field '{}' declares no symbols", field.name));
                }
                for (j, symbol) in symbols.iter().enumerate() {
                    if symbol.is_empty() {
                        return Err(format!("Enum field '{}' has an empty symbol", field.name));
                    }
                    if symbols[..j].contains(symbol) {
                        return Err(format!(
                            "Enum field '{}' declares symbol '{}' twice",
                            field.name, symbol
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    /// Checks that a record carries exactly this schema's fields with
    /// values of the declared types.
    pub fn check_record(&self, record: &Record) -> Result<(), String> {
        for field in &self.fields {
            match record.get(&field.name) {
                None => return Err(format!("missing field '{}'", field.name)),
                Some(value) if !field.field_type.accepts(value) => {
                    return Err(format!(
                        "field '{}' expects {}, got {}",
                        field.name,
                        field.field_type.type_name(),
                        value.describe()
                    ))
                }
                Some(_) => {}
            }
        }

        if let Some(extra) = record.names().find(|name| self.field(name).is_none()) {
            return Err(format!(
                "field '{}' is not declared by schema '{}'",
                extra, self.name
            ));
        }

        Ok(())
    }

    /// Binds `key_field` as this schema's key.
    pub fn with_key(self, key_field: &str) -> Result<KeyedSchema, String> {
        self.validate_structure()?;
        let key_index = self.position(key_field).ok_or_else(|| {
            format!(
                "Key field '{}' is not declared by schema '{}'",
                key_field, self.name
            )
        })?;
        Ok(KeyedSchema {
            schema: self,
            key_index,
        })
    }
}

/// A validated schema with one designated key field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedSchema {
    schema: Schema,
    key_index: usize,
}

impl KeyedSchema {
    /// The underlying schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The key field definition
    pub fn key_field(&self) -> &FieldDef {
        &self.schema.fields[self.key_index]
    }

    /// Fields in line order: key first, then the rest in declaration order.
    pub fn line_order(&self) -> impl Iterator<Item = &FieldDef> {
        std::iter::once(self.key_field()).chain(
            self.schema
                .fields
                .iter()
                .enumerate()
                .filter(move |(i, _)| *i != self.key_index)
                .map(|(_, f)| f),
        )
    }
}

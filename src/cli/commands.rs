//! CLI command implementations
//!
//! Every command loads the configuration, opens the store, runs one
//! operation and returns the response data. Printing is left to [`run`].

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as Json};

use crate::codec;
use crate::observability::{log_event_with_fields, Event, Logger, Severity};
use crate::schema::{FieldType, Schema, Value};
use crate::store::{RecordStore, StoreConfig};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{
    read_json, record_from_json, record_to_json, records_from_json, write_error, write_response,
};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Store file path; relative paths resolve against the config file
    pub path: PathBuf,

    /// Name of the key field (required)
    pub key_field: String,

    /// Fsync appends and rewrites (optional, default true)
    #[serde(default = "default_sync_writes")]
    pub sync_writes: bool,

    /// Record schema (required)
    pub schema: Schema,
}

fn default_sync_writes() -> bool {
    true
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        if config.path.is_relative() {
            if let Some(base) = path.parent() {
                config.path = base.join(&config.path);
            }
        }

        config.validate()?;

        log_event_with_fields(
            Event::ConfigLoaded,
            &[
                ("config", &path.display().to_string()),
                ("path", &config.path.display().to_string()),
            ],
        );

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.path.as_os_str().is_empty() {
            return Err(CliError::config_error("path must be set"));
        }

        if self.key_field.is_empty() {
            return Err(CliError::config_error("key_field must be set"));
        }

        self.schema
            .validate_structure()
            .map_err(|e| CliError::config_error(format!("Invalid schema: {}", e)))?;

        if self.schema.field(&self.key_field).is_none() {
            return Err(CliError::config_error(format!(
                "key_field '{}' is not declared by schema '{}'",
                self.key_field, self.schema.name
            )));
        }

        Ok(())
    }

    /// Store configuration for this file
    pub fn to_store_config(&self) -> StoreConfig {
        StoreConfig::new(&self.path, &self.key_field).with_sync_writes(self.sync_writes)
    }

    /// Open the configured store
    pub fn open_store(&self) -> CliResult<RecordStore> {
        Ok(RecordStore::open(self.to_store_config(), self.schema.clone())?)
    }
}

/// Main CLI entry point
///
/// Parses arguments, runs the command and prints the JSON response.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();

    let result = init_logging(cli.log_level.as_deref())
        .and_then(|_| run_command(&cli.config, cli.command, io::stdin().lock()));

    match result {
        Ok(data) => write_response(data),
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

fn init_logging(level: Option<&str>) -> CliResult<()> {
    if let Some(level) = level {
        let threshold: Option<Severity> =
            Severity::parse_threshold(level).map_err(CliError::config_error)?;
        Logger::init(threshold);
    }
    Ok(())
}

/// Run one command against the store named by `config_path`.
///
/// `input` supplies the JSON body for `append` and `update`.
pub fn run_command<R: Read>(config_path: &Path, cmd: Command, input: R) -> CliResult<Json> {
    let config = Config::load(config_path)?;
    let store = config.open_store()?;

    match cmd {
        Command::Append => append(&store, &read_json(input)?),
        Command::List => list(&store),
        Command::Get { key } => get(&store, &key),
        Command::Update => update(&store, &read_json(input)?),
        Command::Remove { key } => remove(&store, &key),
    }
}

/// Append one record or an array of records
pub fn append(store: &RecordStore, input: &Json) -> CliResult<Json> {
    let schema = store.schema().schema();
    let appended = match input {
        Json::Array(_) => store.append_all(&records_from_json(schema, input)?)?,
        _ => {
            store.append(&record_from_json(schema, input)?)?;
            1
        }
    };
    Ok(json!({ "appended": appended }))
}

/// List every record in file order
pub fn list(store: &RecordStore) -> CliResult<Json> {
    let schema = store.schema().schema();
    let records = store.get_all()?;
    Ok(Json::Array(
        records.iter().map(|r| record_to_json(schema, r)).collect(),
    ))
}

/// Fetch the record stored under `key`, or `null`
pub fn get(store: &RecordStore, key: &str) -> CliResult<Json> {
    let key = parse_key(store, key)?;
    Ok(store
        .get_by_key(&key)?
        .map_or(Json::Null, |r| record_to_json(store.schema().schema(), &r)))
}

/// Replace the records sharing the input record's key
pub fn update(store: &RecordStore, input: &Json) -> CliResult<Json> {
    let record = record_from_json(store.schema().schema(), input)?;
    let updated = store.update(&record)?;
    Ok(json!({ "updated": updated }))
}

/// Remove the records stored under `key`
pub fn remove(store: &RecordStore, key: &str) -> CliResult<Json> {
    let key = parse_key(store, key)?;
    let removed = store.remove(&key)?;
    Ok(json!({ "removed": removed }))
}

fn parse_key(store: &RecordStore, text: &str) -> CliResult<Value> {
    let field = store.schema().key_field();
    match field.field_type {
        FieldType::Text => Ok(Value::Text(text.to_string())),
        _ => codec::parse_value(field, text).map_err(|e| CliError::input_error(e.to_string())),
    }
}

//! Store engine: append, scans and rewrites over one store file
//!
//! Every operation opens the file right before use and closes it before
//! returning, on success and on error. There is no locking: a reader that
//! races a rewrite sees either the old or the new file, and writers that
//! race each other can lose updates.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::config::StoreConfig;
use super::errors::{StoreError, StoreResult};
use super::rewrite;
use crate::codec::{self, FIELD_SEPARATOR, LINE_ENDING};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{KeyedSchema, Record, Schema, Value};

/// A record store bound to one file and one keyed schema.
#[derive(Debug, Clone)]
pub struct RecordStore {
    config: StoreConfig,
    schema: KeyedSchema,
}

impl RecordStore {
    /// Configures a store over `schema`.
    ///
    /// Nothing is read or created on disk; the file is created by the
    /// first append.
    ///
    /// # Errors
    ///
    /// `TAG_CONFIGURATION_ERROR` if the path or key field name is empty,
    /// the schema is malformed, or the key field is not declared.
    pub fn open(config: StoreConfig, schema: Schema) -> StoreResult<Self> {
        config.validate()?;
        let schema = schema
            .with_key(config.key_field())
            .map_err(StoreError::configuration)?;

        log_event_with_fields(
            Event::StoreOpened,
            &[
                ("path", &config.path().display().to_string()),
                ("schema", &schema.schema().name),
                ("key_field", config.key_field()),
            ],
        );

        Ok(Self { config, schema })
    }

    /// Store configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Path to the store file
    pub fn path(&self) -> &Path {
        self.config.path()
    }

    /// The keyed schema records are checked against
    pub fn schema(&self) -> &KeyedSchema {
        &self.schema
    }

    /// Appends one record as a new line.
    ///
    /// Duplicate keys are not detected; a later update or remove rewrites
    /// every line with that key.
    pub fn append(&self, record: &Record) -> StoreResult<()> {
        let mut line = self.encode_line(record)?;
        line.push_str(LINE_ENDING);

        let mut file = self.open_for_append()?;
        file.write_all(line.as_bytes())
            .map_err(|e| StoreError::io_error_at_path("append to", self.path(), e))?;
        if self.config.sync_writes() {
            file.sync_all()
                .map_err(|e| StoreError::io_error_at_path("fsync", self.path(), e))?;
        }

        log_event_with_fields(
            Event::RecordAppended,
            &[("path", &self.path().display().to_string())],
        );
        Ok(())
    }

    /// Appends records in order with one open/close of the file.
    ///
    /// Stops at the first record that fails validation or encoding. Lines
    /// written before it are flushed and stay in the file. Returns the
    /// number of records written. An empty batch does not touch the file.
    pub fn append_all(&self, records: &[Record]) -> StoreResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut writer = BufWriter::new(self.open_for_append()?);
        let mut written = 0;
        let mut failure = None;

        for record in records {
            let line = match self.encode_line(record) {
                Ok(line) => line,
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            };
            let result = writer
                .write_all(line.as_bytes())
                .and_then(|_| writer.write_all(LINE_ENDING.as_bytes()));
            if let Err(e) = result {
                failure = Some(StoreError::io_error_at_path("append to", self.path(), e));
                break;
            }
            written += 1;
        }

        let finished = self.finish_append(writer);
        let path = self.path().display().to_string();

        match failure {
            None => {
                finished?;
                log_event_with_fields(
                    Event::BatchAppended,
                    &[("path", &path), ("records", &written.to_string())],
                );
                Ok(written)
            }
            Some(e) => {
                log_event_with_fields(
                    Event::BatchAppendPartial,
                    &[
                        ("path", &path),
                        ("written", &written.to_string()),
                        ("error", &e.to_string()),
                    ],
                );
                Err(e)
            }
        }
    }

    /// Reads every record in file order.
    ///
    /// Returns an empty list if the file does not exist. The first line
    /// that fails to decode aborts the scan.
    pub fn get_all(&self) -> StoreResult<Vec<Record>> {
        let lines = match self.open_lines()? {
            Some(lines) => lines,
            None => return Ok(Vec::new()),
        };

        let mut records = Vec::new();
        for item in lines {
            let (number, line) = item?;
            records.push(self.decode_line(number, &line)?);
        }

        log_event_with_fields(
            Event::ScanComplete,
            &[
                ("path", &self.path().display().to_string()),
                ("records", &records.len().to_string()),
            ],
        );
        Ok(records)
    }

    /// Returns the first record stored under `key`, or `None`.
    ///
    /// Only the matching line is decoded.
    pub fn get_by_key(&self, key: &Value) -> StoreResult<Option<Record>> {
        let key_chunk = self.key_chunk(key)?;

        let lines = match self.open_lines()? {
            Some(lines) => lines,
            None => return Ok(None),
        };

        for item in lines {
            let (number, line) = item?;
            if line.split(FIELD_SEPARATOR).next() == Some(key_chunk.as_str()) {
                return self.decode_line(number, &line).map(Some);
            }
        }

        Ok(None)
    }

    /// Replaces every line stored under the record's key with the record.
    ///
    /// No-op if the file does not exist. Returns the number of lines
    /// replaced.
    pub fn update(&self, record: &Record) -> StoreResult<usize> {
        let line = self.encode_line(record)?;
        if !self.path().exists() {
            return Ok(0);
        }

        let key_chunk = line.split(FIELD_SEPARATOR).next().unwrap_or(&line);
        rewrite::rewrite_matching(
            self.path(),
            key_chunk,
            Some(line.as_str()),
            self.config.sync_writes(),
        )
    }

    /// Removes every line stored under `key`.
    ///
    /// No-op if the file does not exist. Returns the number of lines
    /// removed.
    pub fn remove(&self, key: &Value) -> StoreResult<usize> {
        let key_chunk = self.key_chunk(key)?;
        if !self.path().exists() {
            return Ok(0);
        }

        rewrite::rewrite_matching(self.path(), &key_chunk, None, self.config.sync_writes())
    }

    fn check_record(&self, record: &Record) -> StoreResult<()> {
        let schema = self.schema.schema();
        schema
            .check_record(record)
            .map_err(|reason| StoreError::type_mismatch(&schema.name, reason))
    }

    fn encode_line(&self, record: &Record) -> StoreResult<String> {
        self.check_record(record)?;
        codec::encode(&self.schema, record).map_err(StoreError::encoding)
    }

    fn key_chunk(&self, key: &Value) -> StoreResult<String> {
        let field = self.schema.key_field();
        if !field.field_type.accepts(key) {
            return Err(StoreError::type_mismatch(
                &self.schema.schema().name,
                format!(
                    "key field '{}' expects {}, got {}",
                    field.name,
                    field.field_type.type_name(),
                    key.describe()
                ),
            ));
        }
        codec::key_chunk(&self.schema, key).map_err(StoreError::encoding)
    }

    fn decode_line(&self, number: usize, line: &str) -> StoreResult<Record> {
        codec::decode(self.schema.schema(), line).map_err(|e| {
            log_event_with_fields(
                Event::DecodeFailed,
                &[
                    ("path", &self.path().display().to_string()),
                    ("line", &number.to_string()),
                    ("error", &e.to_string()),
                ],
            );
            StoreError::decode_at_line(self.path(), number, e)
        })
    }

    /// Opens the file for appending. If the last line lacks a terminator
    /// one is written first, so the next record starts a new line.
    fn open_for_append(&self) -> StoreResult<File> {
        let mut file = OpenOptions::new()
            .read(true)
            .create(true)
            .append(true)
            .open(self.path())
            .map_err(|e| StoreError::io_error_at_path("open for append", self.path(), e))?;

        if !ends_with_newline(&mut file)
            .map_err(|e| StoreError::io_error_at_path("read end of", self.path(), e))?
        {
            file.write_all(LINE_ENDING.as_bytes())
                .map_err(|e| StoreError::io_error_at_path("append to", self.path(), e))?;
        }
        Ok(file)
    }

    fn finish_append(&self, writer: BufWriter<File>) -> StoreResult<()> {
        let file = writer
            .into_inner()
            .map_err(|e| StoreError::io_error_at_path("flush", self.path(), e.into_error()))?;
        if self.config.sync_writes() {
            file.sync_all()
                .map_err(|e| StoreError::io_error_at_path("fsync", self.path(), e))?;
        }
        Ok(())
    }

    fn open_lines(&self) -> StoreResult<Option<StoreLines>> {
        match File::open(self.path()) {
            Ok(file) => Ok(Some(StoreLines {
                path: self.path().to_path_buf(),
                reader: BufReader::new(file),
                line_number: 0,
            })),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io_error_at_path("open store file", self.path(), e)),
        }
    }
}

/// True for an empty file or one whose last byte is `\n`.
fn ends_with_newline(file: &mut File) -> io::Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(true);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// Non-blank lines of the store file with 1-based line numbers,
/// terminators stripped.
struct StoreLines {
    path: PathBuf,
    reader: BufReader<File>,
    line_number: usize,
}

impl Iterator for StoreLines {
    type Item = StoreResult<(usize, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut raw = Vec::new();
        loop {
            raw.clear();
            match self.reader.read_until(b'\n', &mut raw) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_number += 1;
                    let (content, _) = rewrite::split_terminator(&raw);
                    if content.is_empty() {
                        continue;
                    }
                    let line = String::from_utf8(content.to_vec()).map_err(|e| {
                        StoreError::invalid_text_at_line(&self.path, self.line_number, e)
                    });
                    return Some(line.map(|line| (self.line_number, line)));
                }
                Err(e) => {
                    return Some(Err(StoreError::io_error_at_path(
                        "read store file",
                        &self.path,
                        e,
                    )))
                }
            }
        }
    }
}

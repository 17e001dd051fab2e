//! Rewrite protocol for update and remove
//!
//! 1. Stream the store file line by line into a sibling temporary file,
//!    replacing or dropping lines whose key chunk matches
//! 2. Flush and fsync the temporary file
//! 3. Rename it over the store file, then fsync the directory
//!
//! Until step 3 the store file is untouched, so a failure at any earlier
//! point leaves the original in place and the temporary file is deleted.
//! Lines that do not match are copied byte-for-byte and never decoded.

use std::fs::{self, File, Permissions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use super::errors::{StoreError, StoreResult};
use crate::codec::{FIELD_SEPARATOR, LINE_ENDING};
use crate::observability::{log_event_with_fields, Event};

/// Rewrites the store file, replacing each line keyed by `key_chunk` with
/// `replacement`, or dropping it when `replacement` is `None`.
///
/// Returns the number of matching lines. When nothing matches the store
/// file is left as it was.
pub(crate) fn rewrite_matching(
    path: &Path,
    key_chunk: &str,
    replacement: Option<&str>,
    sync: bool,
) -> StoreResult<usize> {
    let path_str = path.display().to_string();
    let mode = if replacement.is_some() { "replace" } else { "drop" };
    log_event_with_fields(Event::RewriteStart, &[("path", &path_str), ("mode", mode)]);

    match rewrite_pass(path, key_chunk, replacement, sync) {
        Ok(0) => {
            log_event_with_fields(Event::RewriteSkipped, &[("path", &path_str), ("mode", mode)]);
            Ok(0)
        }
        Ok(matched) => {
            log_event_with_fields(
                Event::RewriteComplete,
                &[
                    ("path", &path_str),
                    ("mode", mode),
                    ("matched", &matched.to_string()),
                ],
            );
            Ok(matched)
        }
        Err(e) => {
            log_event_with_fields(
                Event::RewriteAborted,
                &[("path", &path_str), ("error", &e.to_string())],
            );
            Err(e)
        }
    }
}

fn rewrite_pass(
    path: &Path,
    key_chunk: &str,
    replacement: Option<&str>,
    sync: bool,
) -> StoreResult<usize> {
    let source = File::open(path)
        .map_err(|e| StoreError::io_error_at_path("open store file", path, e))?;
    let permissions = source
        .metadata()
        .map_err(|e| StoreError::io_error_at_path("read metadata of", path, e))?
        .permissions();

    rewrite_from(
        path,
        BufReader::new(source),
        permissions,
        key_chunk,
        replacement,
        sync,
    )
}

/// Streams `reader` (the current contents of `path`) into a temporary file
/// and swaps it in when at least one line matched.
fn rewrite_from<R: BufRead>(
    path: &Path,
    mut reader: R,
    permissions: Permissions,
    key_chunk: &str,
    replacement: Option<&str>,
    sync: bool,
) -> StoreResult<usize> {
    let dir = parent_dir(path);
    let prefix = format!(
        ".{}.",
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    );
    // Dropped without persist() on every early return, which deletes it.
    let temp = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| StoreError::io_error_at_path("create temporary file in", dir, e))?;
    let temp_path = temp.path().to_path_buf();
    let mut writer = BufWriter::new(temp);

    let write_err = |e| StoreError::io_error_at_path("write temporary file", &temp_path, e);

    let mut matched = 0;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| StoreError::io_error_at_path("read store file", path, e))?;
        if n == 0 {
            break;
        }

        let (content, terminator) = split_terminator(&buf);
        if first_chunk(content) != key_chunk.as_bytes() {
            writer.write_all(&buf).map_err(write_err)?;
            continue;
        }

        matched += 1;
        if let Some(line) = replacement {
            writer.write_all(line.as_bytes()).map_err(write_err)?;
            // A replaced last line always gets a terminator so later
            // appends start on a fresh line.
            let terminator = if terminator.is_empty() {
                LINE_ENDING.as_bytes()
            } else {
                terminator
            };
            writer.write_all(terminator).map_err(write_err)?;
        }
    }
    drop(reader);

    if matched == 0 {
        return Ok(0);
    }

    let temp = writer.into_inner().map_err(|e| write_err(e.into_error()))?;
    if sync {
        temp.as_file().sync_all().map_err(|e| {
            StoreError::io_error_at_path("fsync temporary file", &temp_path, e)
        })?;
    }
    fs::set_permissions(&temp_path, permissions)
        .map_err(|e| StoreError::io_error_at_path("set permissions on", &temp_path, e))?;

    temp.persist(path)
        .map_err(|e| StoreError::io_error_at_path("replace store file", path, e.error))?;

    if sync {
        fsync_dir(dir)?;
    }

    Ok(matched)
}

/// Directory holding the store file
pub(crate) fn parent_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Splits a raw line into content and its terminator (`\n`, `\r\n` or none).
pub(crate) fn split_terminator(raw: &[u8]) -> (&[u8], &[u8]) {
    let content_len = if raw.ends_with(b"\r\n") {
        raw.len() - 2
    } else if raw.ends_with(b"\n") {
        raw.len() - 1
    } else {
        raw.len()
    };
    raw.split_at(content_len)
}

/// The bytes before the first field separator: the key chunk.
pub(crate) fn first_chunk(content: &[u8]) -> &[u8] {
    let sep = FIELD_SEPARATOR.as_bytes();
    content
        .windows(sep.len())
        .position(|w| w == sep)
        .map_or(content, |i| &content[..i])
}

#[cfg(unix)]
fn fsync_dir(dir: &Path) -> StoreResult<()> {
    use std::fs::OpenOptions;

    let handle = OpenOptions::new()
        .read(true)
        .open(dir)
        .map_err(|e| StoreError::io_error_at_path("open directory", dir, e))?;
    handle
        .sync_all()
        .map_err(|e| StoreError::io_error_at_path("fsync directory", dir, e))
}

#[cfg(not(unix))]
fn fsync_dir(_dir: &Path) -> StoreResult<()> {
    Ok(())
}

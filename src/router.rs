// src/router.rs - Per-language JSON Lines output

use crate::error::ProcessingError;
use crate::pipeline::config::RouterConfig;
use crate::pipeline::record::Record;
use indexmap::map::Entry;
use indexmap::IndexMap;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Derive the destination directory name for a record.
///
/// Commas in the language list become underscores. Path separators are
/// neutralized so a key always names a single directory under the output root.
pub fn routing_key(record: &Record, language_field: &str, default_language: &str) -> String {
    let raw = record.field_ci(language_field).unwrap_or("").trim();
    if raw.is_empty() {
        return default_language.to_string();
    }

    let key: String = raw
        .chars()
        .map(|c| match c {
            ',' | '/' | '\\' | '\0' => '_',
            other => other,
        })
        .collect();

    if key == "." || key == ".." {
        return key.replace('.', "_");
    }
    key
}

/// One open destination and how many records went into it
struct Destination {
    path: PathBuf,
    writer: BufWriter<File>,
    records: usize,
}

impl Destination {
    fn open(path: &Path, buffer_size: usize) -> Result<Self, ProcessingError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| ProcessingError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| ProcessingError::OpenOutput {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(path = %path.display(), "opened destination");
        Ok(Destination {
            path: path.to_path_buf(),
            writer: BufWriter::with_capacity(buffer_size.max(1), file),
            records: 0,
        })
    }

    fn write_record(&mut self, record: &Record) -> Result<(), ProcessingError> {
        serde_json::to_writer(&mut self.writer, record).map_err(|source| {
            if source.is_io() {
                ProcessingError::Write {
                    path: self.path.clone(),
                    source: source.into(),
                }
            } else {
                ProcessingError::Encode {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;
        self.writer
            .write_all(b"\n")
            .map_err(|source| ProcessingError::Write {
                path: self.path.clone(),
                source,
            })?;
        self.records += 1;
        Ok(())
    }
}

/// Per-destination totals reported when the router is closed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteSummary {
    pub destinations: Vec<(PathBuf, usize)>,
}

impl RouteSummary {
    pub fn total_records(&self) -> usize {
        self.destinations.iter().map(|(_, n)| n).sum()
    }
}

/// Routes records into `<output_root>/<routing key>/<file_name>`.
///
/// Handles are opened lazily in append mode on first use and cached for the
/// lifetime of the router. Dropping the router without [`OutputRouter::close`]
/// still flushes buffered output on a best-effort basis.
pub struct OutputRouter {
    config: RouterConfig,
    destinations: IndexMap<PathBuf, Destination>,
}

impl OutputRouter {
    pub fn new(config: RouterConfig) -> Self {
        OutputRouter {
            config,
            destinations: IndexMap::new(),
        }
    }

    pub fn destination_path(&self, record: &Record) -> PathBuf {
        let key = routing_key(
            record,
            &self.config.language_field,
            &self.config.default_language,
        );
        self.config.output_root.join(key).join(&self.config.file_name)
    }

    /// Append `record` as one JSON line to its destination
    pub fn route(&mut self, record: &Record) -> Result<(), ProcessingError> {
        let path = self.destination_path(record);
        let destination = match self.destinations.entry(path) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let destination = Destination::open(entry.key(), self.config.buffer_size)?;
                entry.insert(destination)
            }
        };
        destination.write_record(record)
    }

    pub fn open_destinations(&self) -> usize {
        self.destinations.len()
    }

    /// Flush and close every cached handle exactly once.
    ///
    /// All handles are closed even if one of them fails to flush; the first
    /// failure is returned.
    pub fn close(mut self) -> Result<RouteSummary, ProcessingError> {
        let mut summary = RouteSummary::default();
        let mut first_error = None;

        for (_, mut destination) in self.destinations.drain(..) {
            if let Err(source) = destination.writer.flush() {
                if first_error.is_none() {
                    first_error = Some(ProcessingError::Write {
                        path: destination.path.clone(),
                        source,
                    });
                }
            }
            debug!(
                path = %destination.path.display(),
                records = destination.records,
                "closed destination"
            );
            summary.destinations.push((destination.path, destination.records));
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(summary),
        }
    }
}

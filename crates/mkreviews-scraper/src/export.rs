//! Writes a [`Dataset`] to disk as CSV, TSV, or JSON lines.
//!
//! Output goes to a sibling temp file that is renamed over the target only
//! after every row is flushed, so a failed export leaves no partial file.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use indexmap::IndexMap;

use crate::dataset::{Cell, Dataset};
use crate::error::ScraperError;
use crate::types::FieldValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Tsv,
    JsonLines,
}

impl ExportFormat {
    /// Field delimiter, or `None` for JSON lines.
    #[must_use]
    pub fn delimiter(self) -> Option<u8> {
        match self {
            ExportFormat::Csv => Some(b','),
            ExportFormat::Tsv => Some(b'\t'),
            ExportFormat::JsonLines => None,
        }
    }

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::JsonLines => "jsonl",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "tsv" => Ok(ExportFormat::Tsv),
            "jsonl" | "jsonlines" | "json-lines" => Ok(ExportFormat::JsonLines),
            other => Err(format!(
                "unknown export format \"{other}\"; expected csv, tsv, or jsonl"
            )),
        }
    }
}

/// Writes `dataset` to `target`, returning the number of data rows written.
///
/// # Errors
///
/// Returns [`ScraperError::IoWrite`] if the temp file cannot be written or
/// renamed. The target is untouched in that case.
pub fn export(dataset: &Dataset, target: &Path, format: ExportFormat) -> Result<usize, ScraperError> {
    let partial = partial_path(target);
    let io_err = |source: io::Error| ScraperError::IoWrite {
        path: target.to_path_buf(),
        source,
    };

    let written = write_file(dataset, &partial, format).and_then(|rows| {
        fs::rename(&partial, target)?;
        Ok(rows)
    });

    match written {
        Ok(rows) => {
            tracing::info!(
                path = %target.display(),
                %format,
                rows,
                columns = dataset.column_count(),
                "exported dataset"
            );
            Ok(rows)
        }
        Err(source) => {
            if let Err(cleanup) = fs::remove_file(&partial) {
                if cleanup.kind() != io::ErrorKind::NotFound {
                    tracing::warn!(
                        path = %partial.display(),
                        error = %cleanup,
                        "could not remove partial export"
                    );
                }
            }
            Err(io_err(source))
        }
    }
}

fn partial_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map_or_else(|| "export".into(), |n| n.to_string_lossy().into_owned());
    target.with_file_name(format!(".{name}.partial"))
}

fn write_file(dataset: &Dataset, path: &Path, format: ExportFormat) -> io::Result<usize> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    let rows = match format.delimiter() {
        Some(delimiter) => write_delimited(dataset, &mut out, delimiter)?,
        None => write_json_lines(dataset, &mut out)?,
    };
    let file = out.into_inner().map_err(io::IntoInnerError::into_error)?;
    file.sync_all()?;
    Ok(rows)
}

fn write_delimited<W: Write>(dataset: &Dataset, out: W, delimiter: u8) -> io::Result<usize> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(out);
    if dataset.column_count() > 0 {
        writer.write_record(dataset.columns())?;
        for row in dataset.rendered_rows() {
            writer.write_record(&row)?;
        }
    }
    writer.flush()?;
    Ok(dataset.row_count())
}

fn write_json_lines<W: Write>(dataset: &Dataset, mut out: W) -> io::Result<usize> {
    for row in dataset.rows() {
        let object: IndexMap<&str, &Cell> = dataset
            .columns()
            .iter()
            .map(String::as_str)
            .zip(row)
            .collect();
        serde_json::to_writer(&mut out, &object)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(dataset.row_count())
}

/// Reads a CSV or TSV export back as text cells; blank fields become
/// [`Cell::Empty`].
///
/// # Errors
///
/// Returns [`ScraperError::IoRead`] if the file cannot be read, is ragged, or
/// `format` is JSON lines.
pub fn read_delimited(path: &Path, format: ExportFormat) -> Result<Dataset, ScraperError> {
    let io_err = |source: io::Error| ScraperError::IoRead {
        path: path.to_path_buf(),
        source,
    };
    let delimiter = format.delimiter().ok_or_else(|| {
        io_err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "JSON lines exports are not delimited",
        ))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_path(path)
        .map_err(|e| io_err(e.into()))?;

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| io_err(e.into()))?
        .iter()
        .map(str::to_owned)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| io_err(e.into()))?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Value(FieldValue::Text(field.to_owned()))
                    }
                })
                .collect(),
        );
    }

    Dataset::from_parts(columns, rows).ok_or_else(|| {
        io_err(io::Error::new(
            io::ErrorKind::InvalidData,
            "row width differs from header",
        ))
    })
}

//! Output sink: streaming CSV file writer

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Row-at-a-time CSV writer.
///
/// Records end with CRLF, as RFC 4180 prescribes.
/// The destination is created (or truncated) on construction and the header
/// is written immediately. Rows are serialized as they arrive, so the caller
/// never has to hold the full result set. The file handle is owned by the
/// inner writer and released on drop, including when an export aborts.
pub struct CsvSink {
    writer: csv::Writer<File>,
    path: PathBuf,
    row_count: usize,
}

impl std::fmt::Debug for CsvSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvSink")
            .field("path", &self.path)
            .field("row_count", &self.row_count)
            .finish_non_exhaustive()
    }
}

impl CsvSink {
    /// Create the destination file and write the header row
    pub fn create(path: &Path, header: &[&str]) -> Result<Self, io::Error> {
        let file = File::create(path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::CRLF)
            .from_writer(file);
        writer.write_record(header).map_err(csv_to_io)?;

        Ok(Self {
            writer,
            path: path.to_path_buf(),
            row_count: 0,
        })
    }

    /// Serialize one row. Field order follows the struct declaration order.
    pub fn write_row<T: Serialize>(&mut self, row: &T) -> Result<(), io::Error> {
        self.writer.serialize(row).map_err(csv_to_io)?;
        self.row_count += 1;
        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Finalize: flush buffered rows and close the file
    pub fn finalize(mut self) -> Result<usize, io::Error> {
        self.writer.flush()?;
        Ok(self.row_count)
    }
}

fn csv_to_io(e: csv::Error) -> io::Error {
    match e.into_kind() {
        csv::ErrorKind::Io(e) => e,
        other => io::Error::other(format!("{other:?}")),
    }
}

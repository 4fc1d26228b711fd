use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::data_model::{ExtractedRecord, HEADERS};
use crate::error::Result;
use crate::pipeline::writers::BaseWriter;

/// Writes records as tab-separated rows, header first.
///
/// Rows are separated by `\n` with no trailing newline. A missing language is
/// written as an empty field.
pub struct TsvWriter<W: Write> {
    writer: W,
    rows_written: usize,
}

impl<W: Write> TsvWriter<W> {
    pub fn new(writer: W) -> Result<Self> {
        let mut tsv = TsvWriter {
            writer,
            rows_written: 0,
        };
        tsv.write_row(&HEADERS.join("\t"))?;
        Ok(tsv)
    }

    fn write_row(&mut self, row: &str) -> Result<()> {
        if self.rows_written > 0 {
            self.writer.write_all(b"\n")?;
        }
        self.writer.write_all(row.as_bytes())?;
        self.rows_written += 1;
        Ok(())
    }

    /// Number of data rows written so far (the header is not counted).
    pub fn records_written(&self) -> usize {
        self.rows_written.saturating_sub(1)
    }

    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

fn format_row(record: &ExtractedRecord) -> String {
    [
        record.value.as_str(),
        record.record_type.as_str(),
        record.file.as_str(),
        record.language.as_deref().unwrap_or(""),
        &record.confidence.to_string(),
    ]
    .join("\t")
}

impl<W: Write> BaseWriter for TsvWriter<W> {
    fn write_batch(&mut self, records: &[ExtractedRecord]) -> Result<()> {
        for record in records {
            self.write_row(&format_row(record))?;
        }
        Ok(())
    }

    fn close(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes the records file into a temporary file inside `dir`.
///
/// Nothing is visible under the final name until [`commit`] is called; the
/// temporary file is deleted if it is dropped uncommitted.
pub fn stage_records(dir: &Path, records: &[ExtractedRecord]) -> Result<NamedTempFile> {
    let mut staged = NamedTempFile::new_in(dir)?;
    let mut writer = TsvWriter::new(BufWriter::new(staged.as_file_mut()))?;
    writer.write_batch(records)?;
    writer.close()?;
    Ok(staged)
}

/// Stages the raw metadata block as UTF-8 text, unmodified.
pub fn stage_metadata(dir: &Path, metadata: &str) -> Result<NamedTempFile> {
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(metadata.as_bytes())?;
    staged.flush()?;
    Ok(staged)
}

/// Moves a staged file to `path`, replacing whatever is there.
pub fn commit(staged: NamedTempFile, path: &Path) -> Result<()> {
    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}

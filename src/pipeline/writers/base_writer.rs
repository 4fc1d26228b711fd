use crate::data_model::ExtractedRecord;
use crate::error::Result;

/// Trait for writing extracted records to an output sink (e.g. file).
pub trait BaseWriter {
    /// Write a batch of records to the sink, in order.
    fn write_batch(&mut self, records: &[ExtractedRecord]) -> Result<()>;

    /// Finalize and close the output writer.
    fn close(self) -> Result<()>;
}

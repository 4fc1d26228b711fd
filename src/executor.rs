use std::path::{Path, PathBuf};

use tracing::{debug, info_span};

use crate::data_model::{ExtractedRecord, RecordType, WorkerOutcome};
use crate::error::{PipelineError, Result};
use crate::pipeline::language::LanguageDetector;
use crate::pipeline::markup::{cut_tag, extract_tag, ExtractMode};
use crate::pipeline::readers::{decode_document, read_raw_document};
use crate::pipeline::writers::{commit, stage_metadata, stage_records};
use crate::utils::prometheus_metrics::{FILE_PROCESSING_DURATION_SECONDS, RECORDS_EMITTED_TOTAL};
use crate::utils::text::flatten_field;

pub const METADATA_TAG: &str = "description";
pub const BODY_TAG: &str = "body";
pub const PARAGRAPH_TAG: &str = "p";

/// Structural categories in extraction priority. Each one is removed from the
/// body after extraction so later categories never see its text again.
pub const CATEGORY_ORDER: [(RecordType, &str, ExtractMode); 6] = [
    (RecordType::Table, "table", ExtractMode::Raw),
    (RecordType::Epigraph, "epigraph", ExtractMode::Normalized),
    (RecordType::Poem, "poem", ExtractMode::Normalized),
    (RecordType::Cite, "cite", ExtractMode::Normalized),
    (RecordType::Title, "title", ExtractMode::Normalized),
    (RecordType::Subtitle, "subtitle", ExtractMode::Normalized),
];

/// States a file moves through. `Skip` and `Done` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Skip,
    Decode,
    ExtractMetadata,
    ExtractBody,
    Classify,
    Serialize,
    Done,
}

impl PipelineStage {
    pub fn name(&self) -> &'static str {
        match self {
            PipelineStage::Skip => "skip",
            PipelineStage::Decode => "decode",
            PipelineStage::ExtractMetadata => "extract_metadata",
            PipelineStage::ExtractBody => "extract_body",
            PipelineStage::Classify => "classify",
            PipelineStage::Serialize => "serialize",
            PipelineStage::Done => "done",
        }
    }

    fn wrap<T>(self, result: Result<T>) -> Result<T> {
        result.map_err(|e| PipelineError::StepError {
            step_name: self.name().to_string(),
            source: Box::new(e),
        })
    }
}

/// Settings shared by every file of a batch.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub output_dir: PathBuf,
    pub force: bool,
    /// Base for the `file` column; record paths are written relative to it.
    pub working_dir: PathBuf,
}

/// The two artifacts produced for one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub metadata: PathBuf,
    pub records: PathBuf,
}

impl OutputPaths {
    pub fn exist(&self) -> bool {
        self.metadata.exists() && self.records.exists()
    }
}

impl PipelineContext {
    /// `dir/name.ext` maps to `<output_dir>/name.xml` and `<output_dir>/name.tsv`.
    pub fn output_paths(&self, input: &Path) -> OutputPaths {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        OutputPaths {
            metadata: self.output_dir.join(format!("{}.xml", stem)),
            records: self.output_dir.join(format!("{}.tsv", stem)),
        }
    }

    /// Path of `input` as written in the `file` column.
    pub fn relative_input_path(&self, input: &Path) -> String {
        let absolute = if input.is_absolute() {
            input.to_path_buf()
        } else {
            self.working_dir.join(input)
        };
        absolute
            .strip_prefix(&self.working_dir)
            .unwrap_or(input)
            .to_string_lossy()
            .into_owned()
    }
}

/// Raw metadata block: every `<description>` occurrence, markup preserved.
pub fn extract_metadata(text: &str) -> String {
    extract_tag(text, METADATA_TAG, ExtractMode::Raw).join("\n")
}

/// Pulls typed records out of the document body in category priority order,
/// followed by the remaining paragraphs as `text` records.
pub fn extract_body_records(text: &str) -> Vec<ExtractedRecord> {
    let mut body = extract_tag(text, BODY_TAG, ExtractMode::Raw).join("\n");
    let mut records = Vec::new();

    for (record_type, tag, mode) in CATEGORY_ORDER {
        let found = extract_tag(&body, tag, mode);
        debug!(category = %record_type, count = found.len(), "Extracted category");
        records.extend(
            found
                .into_iter()
                .map(|value| ExtractedRecord::unclassified(value, record_type)),
        );
        body = cut_tag(&body, tag);
    }

    records.extend(
        extract_tag(&body, PARAGRAPH_TAG, ExtractMode::Normalized)
            .into_iter()
            .map(|value| ExtractedRecord::unclassified(value, RecordType::Text)),
    );
    records
}

/// Runs one file from raw bytes to the metadata and records artifacts.
pub struct DocumentPipeline {
    context: PipelineContext,
}

impl DocumentPipeline {
    pub fn new(context: PipelineContext) -> Self {
        DocumentPipeline { context }
    }

    pub fn context(&self) -> &PipelineContext {
        &self.context
    }

    /// Processes `path`, returning `Processed` or `Ignored`. Any error aborts this
    /// file only and is reported wrapped with the stage it happened in.
    pub fn process_file(&self, path: &Path, detector: &mut LanguageDetector) -> Result<WorkerOutcome> {
        let span = info_span!("process_file", file = %path.display());
        let _enter = span.enter();
        let timer = FILE_PROCESSING_DURATION_SECONDS.start_timer();

        if !path.exists() {
            return PipelineStage::Decode.wrap(Err(PipelineError::InputNotFound(path.to_path_buf())));
        }
        let outputs = self.context.output_paths(path);
        if !self.context.force && outputs.exist() {
            debug!(stage = PipelineStage::Skip.name(), "Outputs already present");
            timer.stop_and_discard();
            return Ok(WorkerOutcome::Ignored);
        }

        let text = PipelineStage::Decode.wrap(
            read_raw_document(path).and_then(|document| decode_document(&document)),
        )?;

        // Artifacts are staged in the output directory. Metadata is committed last,
        // so a failed or interrupted file never leaves the pair the skip check wants.
        let staging_dir = &self.context.output_dir;
        let metadata = extract_metadata(&text);
        let staged_metadata =
            PipelineStage::ExtractMetadata.wrap(stage_metadata(staging_dir, &metadata))?;

        let records = extract_body_records(&text);
        debug!(stage = PipelineStage::ExtractBody.name(), records = records.len(), "Body extracted");

        let records = PipelineStage::Classify.wrap(self.classify(path, records, detector))?;

        PipelineStage::Serialize.wrap(
            stage_records(staging_dir, &records)
                .and_then(|staged| commit(staged, &outputs.records))
                .and_then(|_| commit(staged_metadata, &outputs.metadata)),
        )?;
        RECORDS_EMITTED_TOTAL.inc_by(records.len() as f64);

        debug!(stage = PipelineStage::Done.name(), records = records.len(), "File processed");
        timer.observe_duration();
        Ok(WorkerOutcome::Processed)
    }

    fn classify(
        &self,
        path: &Path,
        records: Vec<ExtractedRecord>,
        detector: &mut LanguageDetector,
    ) -> Result<Vec<ExtractedRecord>> {
        let file = self.context.relative_input_path(path);
        records
            .into_iter()
            .map(|mut record| {
                record.value = flatten_field(&record.value);
                record.file = file.clone();
                let guess = detector.detect(&record.value)?;
                record.language = guess.language;
                record.confidence = guess.confidence;
                Ok(record)
            })
            .collect()
    }
}

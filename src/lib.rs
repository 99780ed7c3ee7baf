mod assemble;
mod classify;
mod error;
mod extract;
mod game_log;
mod model;
mod options;
mod output;
mod rows;
mod schema;
mod standings;
mod warning;

use std::path::Path;

use tracing::debug;

use crate::output::{render_table, write_table};

pub use assemble::TableAssembler;
pub use classify::{Classification, ColumnClassifier, is_header_row};
pub use error::ReconstructError;
pub use extract::{OcrResponse, extract_words};
pub use model::{CellValue, Row, Table, TableRow, Vertex, Word};
pub use options::{LayoutConfig, OutputFormat, ReconstructOptions, SchemaKind};
pub use rows::{DEFAULT_Y_THRESHOLD, RowGrouper};
pub use schema::{ColumnBand, ColumnSpec, GameLogLayout, Schema, StandingsLayout, ValueShape};
pub use warning::{ReconstructWarning, WarningCode};

/// Largest OCR response accepted from disk.
pub const MAX_INPUT_BYTES: u64 = 16 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructionReport {
    pub word_count: usize,
    pub row_count: usize,
    pub rejected_rows: usize,
    pub warnings: Vec<ReconstructWarning>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    pub table: Table,
    pub report: ReconstructionReport,
}

/// One configured pipeline run: extract, group, classify, assemble.
///
/// The row threshold lives on the instance. Callers reconstructing tables
/// concurrently should give each request its own reconstructor.
#[derive(Debug, Clone)]
pub struct TableReconstructor {
    schema: Schema,
    grouper: RowGrouper,
    min_confidence: Option<f32>,
}

impl TableReconstructor {
    pub fn new(options: &ReconstructOptions) -> Result<Self, ReconstructError> {
        options.validate()?;
        Ok(Self {
            schema: options.schema()?,
            grouper: RowGrouper::new(options.y_threshold),
            min_confidence: options.min_confidence,
        })
    }

    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    #[must_use]
    pub fn y_threshold(&self) -> f64 {
        self.grouper.y_threshold()
    }

    pub fn set_y_threshold(&mut self, y_threshold: f64) {
        self.grouper.set_y_threshold(y_threshold);
    }

    pub fn reconstruct(&self, response: &OcrResponse) -> Result<Reconstruction, ReconstructError> {
        let mut warnings = Vec::new();
        let words = extract_words(response, self.min_confidence, &mut warnings)?;
        Ok(self.finish(words, warnings))
    }

    #[must_use]
    pub fn reconstruct_words(&self, words: Vec<Word>) -> Reconstruction {
        self.finish(words, Vec::new())
    }

    fn finish(&self, words: Vec<Word>, mut warnings: Vec<ReconstructWarning>) -> Reconstruction {
        let rows = self.grouper.group(&words);
        let classifier = ColumnClassifier::new(&self.schema);

        let mut accepted = Vec::new();
        let mut rejected_rows = 0_usize;
        for (index, row) in rows.iter().enumerate() {
            match classifier.classify(row) {
                Classification::Accepted(cells) => accepted.push(cells),
                Classification::Header => warnings.push(
                    ReconstructWarning::new(WarningCode::HeaderRowSkipped, "skipped header row")
                        .with_row(index),
                ),
                Classification::Rejected(_) => {
                    rejected_rows += 1;
                    warnings.push(
                        ReconstructWarning::new(
                            WarningCode::RowRejected,
                            format!(
                                "dropped row missing anchor columns: {}",
                                row.texts().collect::<Vec<_>>().join(" ")
                            ),
                        )
                        .with_row(index),
                    );
                }
            }
        }

        let table = TableAssembler::new(&self.schema).assemble(accepted);
        if table.rows.is_empty() {
            warnings.push(ReconstructWarning::new(
                WarningCode::NoRowsDetected,
                "no table rows survived classification",
            ));
        }

        debug!(
            words = words.len(),
            rows = rows.len(),
            accepted = table.row_count(),
            rejected = rejected_rows,
            "rebuilt table"
        );

        Reconstruction {
            report: ReconstructionReport {
                word_count: words.len(),
                row_count: table.row_count(),
                rejected_rows,
                warnings,
            },
            table,
        }
    }
}

/// Rebuilds a table from an OCR response body and renders it in
/// `options.format`.
pub fn reconstruct_json_to_string(
    input: &str,
    options: &ReconstructOptions,
) -> Result<(String, ReconstructionReport), ReconstructError> {
    let reconstructor = TableReconstructor::new(options)?;
    let response = OcrResponse::from_json(input)?;
    let Reconstruction { table, report } = reconstructor.reconstruct(&response)?;
    Ok((render_table(&table, options.format)?, report))
}

pub fn reconstruct_file(
    input: &Path,
    output: &Path,
    options: &ReconstructOptions,
) -> Result<ReconstructionReport, ReconstructError> {
    let reconstructor = TableReconstructor::new(options)?;

    let metadata = std::fs::metadata(input).map_err(|error| {
        ReconstructError::Validation(format!("cannot read '{}': {error}", input.display()))
    })?;
    if !metadata.is_file() {
        return Err(ReconstructError::Validation(format!(
            "'{}' is not a file",
            input.display()
        )));
    }
    if metadata.len() > MAX_INPUT_BYTES {
        return Err(ReconstructError::Validation(format!(
            "'{}' is {} bytes, above the {MAX_INPUT_BYTES} byte limit",
            input.display(),
            metadata.len()
        )));
    }

    let body = std::fs::read_to_string(input)?;
    let response = OcrResponse::from_json(&body)?;
    let Reconstruction { table, report } = reconstructor.reconstruct(&response)?;
    write_table(output, &table, options.format)?;
    Ok(report)
}

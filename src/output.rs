use std::path::Path;

use csv::WriterBuilder;
use serde::Serialize;

use crate::error::ReconstructError;
use crate::model::{CellValue, Table};
use crate::options::OutputFormat;

#[derive(Serialize)]
struct RecordsDocument<'a> {
    headers: &'a [String],
    df: Vec<Vec<Option<&'a CellValue>>>,
}

pub(crate) fn render_table(table: &Table, format: OutputFormat) -> Result<String, ReconstructError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(table)?),
        OutputFormat::Records => Ok(serde_json::to_string_pretty(&RecordsDocument {
            headers: &table.headers,
            df: table.records(),
        })?),
        OutputFormat::Csv => write_csv_to_string(table),
    }
}

pub(crate) fn write_table(
    path: &Path,
    table: &Table,
    format: OutputFormat,
) -> Result<(), ReconstructError> {
    let rendered = render_table(table, format)?;
    std::fs::write(path, rendered)?;
    Ok(())
}

fn write_csv_to_string(table: &Table) -> Result<String, ReconstructError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::<u8>::new());
    writer.write_record(&table.headers)?;
    for record in table.records() {
        writer.write_record(
            record
                .into_iter()
                .map(|cell| cell.map(ToString::to_string).unwrap_or_default()),
        )?;
    }
    writer.flush()?;

    let bytes = writer
        .into_inner()
        .map_err(|error| ReconstructError::Csv(error.into_error().into()))?;
    String::from_utf8(bytes)
        .map_err(|error| ReconstructError::InvalidOption(format!("invalid utf-8 csv output: {error}")))
}

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
}

impl Vertex {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One recognized token with its bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    text: String,
    corners: [Vertex; 4],
    x_center: f64,
    y_center: f64,
    confidence: Option<f32>,
}

impl Word {
    #[must_use]
    pub fn new(text: impl Into<String>, corners: [Vertex; 4], confidence: Option<f32>) -> Self {
        let x_center = corners.iter().map(|v| f64::from(v.x)).sum::<f64>() / 4.0;
        let y_center = corners.iter().map(|v| f64::from(v.y)).sum::<f64>() / 4.0;
        Self {
            text: text.into(),
            corners,
            x_center,
            y_center,
            confidence,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn corners(&self) -> &[Vertex; 4] {
        &self.corners
    }

    #[must_use]
    pub fn x_center(&self) -> f64 {
        self.x_center
    }

    #[must_use]
    pub fn y_center(&self) -> f64 {
        self.y_center
    }

    /// `None` means the OCR engine did not report a confidence.
    #[must_use]
    pub fn confidence(&self) -> Option<f32> {
        self.confidence
    }
}

/// Words judged to sit on one horizontal line, ordered left to right.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    words: Vec<Word>,
}

impl Row {
    pub(crate) fn from_unsorted(mut words: Vec<Word>) -> Self {
        words.sort_by(|a, b| {
            a.x_center
                .total_cmp(&b.x_center)
                .then_with(|| a.text.cmp(&b.text))
        });
        Self { words }
    }

    #[must_use]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(Word::text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl CellValue {
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            Self::Decimal(value) => Some(*value),
            #[allow(clippy::cast_precision_loss)]
            Self::Integer(value) => Some(*value as f64),
            Self::Text(_) => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Decimal(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

/// One detected entity, keyed by column name. Unmatched columns are absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableRow {
    cells: BTreeMap<String, CellValue>,
}

impl TableRow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: &str, value: impl Into<CellValue>) {
        self.cells.insert(column.to_string(), value.into());
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    #[must_use]
    pub fn has(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }

    /// True when the column holds a value that is not blank text.
    #[must_use]
    pub fn is_filled(&self, column: &str) -> bool {
        match self.cells.get(column) {
            Some(CellValue::Text(text)) => !text.trim().is_empty(),
            Some(_) => true,
            None => false,
        }
    }

    #[must_use]
    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(CellValue::as_text)
    }

    #[must_use]
    pub fn integer(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(CellValue::as_integer)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl Table {
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Rows as fixed-order lists aligned with `headers`.
    #[must_use]
    pub fn records(&self) -> Vec<Vec<Option<&CellValue>>> {
        self.rows
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .map(|header| row.get(header))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
pub(crate) fn word_at(text: &str, x: i32, y: i32) -> Word {
    Word::new(
        text,
        [
            Vertex::new(x - 5, y - 4),
            Vertex::new(x + 5, y - 4),
            Vertex::new(x + 5, y + 4),
            Vertex::new(x - 5, y + 4),
        ],
        None,
    )
}

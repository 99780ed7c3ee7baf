#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningCode {
    WordSkipped,
    LowConfidenceWord,
    HeaderRowSkipped,
    RowRejected,
    NoRowsDetected,
}

/// Non-fatal diagnostic collected while rebuilding a table.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructWarning {
    pub code: WarningCode,
    pub message: String,
    pub row: Option<usize>,
    pub word: Option<usize>,
}

impl ReconstructWarning {
    #[must_use]
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            row: None,
            word: None,
        }
    }

    #[must_use]
    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    #[must_use]
    pub fn with_word(mut self, word: usize) -> Self {
        self.word = Some(word);
        self
    }
}

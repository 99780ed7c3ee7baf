use crate::game_log::classify_game_log_row;
use crate::model::{Row, TableRow};
use crate::schema::{DATE, POSITION, Schema, TEAM, TEAM1};
use crate::standings::classify_standings_row;

/// Outcome of classifying one grouped row.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// The row repeats the table header or column captions.
    Header,
    /// The row lacks one of the schema's anchor columns.
    Rejected(TableRow),
    Accepted(TableRow),
}

/// Assigns the words of a row to the columns of the caller's schema.
#[derive(Debug, Clone, Copy)]
pub struct ColumnClassifier<'a> {
    schema: &'a Schema,
}

impl<'a> ColumnClassifier<'a> {
    #[must_use]
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    #[must_use]
    pub fn classify(&self, row: &Row) -> Classification {
        if is_header_row(row, self.schema.header_keywords()) {
            return Classification::Header;
        }

        let cells = match self.schema {
            Schema::Standings(layout) => classify_standings_row(row, layout),
            Schema::GameLog(layout) => classify_game_log_row(row, layout),
        };

        if self.accepts(&cells) {
            Classification::Accepted(cells)
        } else {
            Classification::Rejected(cells)
        }
    }

    /// Anchor columns every emitted row must carry.
    #[must_use]
    pub fn accepts(&self, cells: &TableRow) -> bool {
        match self.schema {
            Schema::Standings(_) => cells.integer(POSITION).is_some() && cells.is_filled(TEAM),
            Schema::GameLog(_) => cells.is_filled(DATE) && cells.is_filled(TEAM1),
        }
    }
}

/// Uppercases a token and trims edge punctuation, keeping '/' so captions
/// like "G/M" and "O/U" survive.
pub(crate) fn normalize_token(token: &str) -> String {
    token
        .trim_matches(|ch: char| !ch.is_alphanumeric() && ch != '/')
        .to_uppercase()
}

pub(crate) fn keyword_set_contains(keywords: &[String], token: &str) -> bool {
    let normalized = normalize_token(token);
    !normalized.is_empty()
        && keywords
            .iter()
            .any(|keyword| keyword.eq_ignore_ascii_case(&normalized))
}

#[must_use]
pub fn is_header_row(row: &Row, keywords: &[String]) -> bool {
    row.texts()
        .any(|token| keyword_set_contains(keywords, token))
}

use tracing::trace;

use crate::model::{CellValue, Row, TableRow, Word};
use crate::schema::{POSITION, StandingsLayout, TEAM, ValueShape, is_all_digits};

fn cell_value(shape: ValueShape, token: &str) -> Option<CellValue> {
    match shape {
        ValueShape::Integer => token.parse::<i64>().ok().map(CellValue::Integer),
        ValueShape::Decimal => token
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(CellValue::Decimal),
        ValueShape::Ratio | ValueShape::Text => Some(CellValue::Text(token.to_string())),
    }
}

/// OCR tends to split "1. BOS" so the dot lands in front of the team name.
fn clean_team_name(raw: &str) -> String {
    let raw = raw.trim();
    raw.strip_prefix('.').unwrap_or(raw).trim().to_string()
}

fn leading_position(token: &str) -> Option<i64> {
    let digits = token.trim().trim_end_matches('.');
    if !is_all_digits(digits) {
        return None;
    }
    digits.parse().ok()
}

/// Fills a standings row: position from the leading token, the team name
/// from the words left of `team_cutoff`, then every remaining word goes to
/// the first open column whose band and value shape both fit it.
pub(crate) fn classify_standings_row(row: &Row, layout: &StandingsLayout) -> TableRow {
    let mut cells = TableRow::new();
    let Some((leading, rest)) = row.words().split_first() else {
        return cells;
    };

    if let Some(position) = leading_position(leading.text()) {
        cells.set(POSITION, position);
    }

    let team_len = rest
        .iter()
        .take_while(|word| word.x_center() < layout.team_cutoff)
        .count();
    let (team_words, remaining) = rest.split_at(team_len);
    let team = clean_team_name(
        &team_words
            .iter()
            .map(Word::text)
            .collect::<Vec<_>>()
            .join(" "),
    );
    if !team.is_empty() {
        cells.set(TEAM, team);
    }

    for word in remaining {
        let token = word.text();
        let column = layout
            .columns
            .iter()
            .find(|column| !cells.has(&column.name) && column.accepts(word.x_center(), token));
        match column.and_then(|column| Some((column, cell_value(column.shape, token)?))) {
            Some((column, value)) => cells.set(&column.name, value),
            None => trace!(token, x = word.x_center(), "word fits no standings column"),
        }
    }

    cells
}

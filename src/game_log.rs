use crate::classify::{keyword_set_contains, normalize_token};
use crate::model::{Row, TableRow};
use crate::schema::{
    DATE, GameLogLayout, OU_TYPE, RESULT, SCORE, SPREAD, TEAM1, TEAM2, TOTAL, is_all_digits,
    is_decimal,
};

#[derive(Debug, Default)]
struct GameLine {
    date: Option<String>,
    team1: Option<String>,
    team2: Option<String>,
    score: Option<String>,
    spread: Option<String>,
    ou_type: Option<String>,
    total: Option<String>,
}

fn exact_team(token: &str, layout: &GameLogLayout) -> Option<String> {
    let normalized = normalize_token(token);
    layout
        .teams
        .iter()
        .find(|team| team.eq_ignore_ascii_case(&normalized))
        .map(|team| team.to_uppercase())
}

fn embedded_team(token: &str, layout: &GameLogLayout, exclude: Option<&str>) -> Option<String> {
    let upper = token.to_uppercase();
    layout
        .teams
        .iter()
        .map(|team| team.to_uppercase())
        .find(|team| upper.contains(team.as_str()) && exclude != Some(team.as_str()))
}

/// `102-98`: digits on both sides of a single dash.
fn is_score(token: &str) -> bool {
    token
        .split_once('-')
        .is_some_and(|(home, away)| is_all_digits(home) && is_all_digits(away))
}

fn is_spread(token: &str) -> bool {
    token.contains(".5") && token.contains(['+', '-'])
}

/// The signed number inside a spread token, without any glued team text:
/// `DET-4.5` and `+4.5DET` give `-4.5` and `+4.5`.
fn spread_value(token: &str) -> &str {
    let Some(sign) = token.find(['+', '-']) else {
        return token;
    };
    let digits = &token[sign + 1..];
    let end = digits
        .find(|ch: char| !(ch.is_ascii_digit() || ch == '.'))
        .unwrap_or(digits.len());
    &token[sign..=sign + end]
}

fn ou_marker(token: &str, layout: &GameLogLayout) -> Option<&'static str> {
    if keyword_set_contains(&layout.over_markers, token) {
        Some("O")
    } else if keyword_set_contains(&layout.under_markers, token) {
        Some("U")
    } else {
        None
    }
}

/// Fills a game-log row. Each token is claimed by at most one column, in
/// row order: date, teams, score, spread, over/under marker (which also
/// claims the total right after it). Leftover numbers fall back to the
/// total, and a final pass looks for an opponent embedded in another token.
pub(crate) fn classify_game_log_row(row: &Row, layout: &GameLogLayout) -> TableRow {
    let tokens = row.texts().collect::<Vec<_>>();
    let mut claimed = vec![false; tokens.len()];
    let mut line = GameLine::default();

    for index in 0..tokens.len() {
        if claimed[index] {
            continue;
        }
        let token = tokens[index];

        if line.date.is_none() && token.contains('/') {
            line.date = Some(token.to_string());
            claimed[index] = true;
            continue;
        }

        if let Some(team) = exact_team(token, layout) {
            if line.team1.is_none() {
                line.team1 = Some(team);
                claimed[index] = true;
                continue;
            }
            if line.team2.is_none() {
                line.team2 = Some(team);
                claimed[index] = true;
                continue;
            }
        }

        if line.score.is_none() && is_score(token) {
            line.score = Some(token.to_string());
            claimed[index] = true;
            continue;
        }

        if line.spread.is_none() && is_spread(token) {
            if line.team2.is_none() {
                line.team2 = embedded_team(token, layout, line.team1.as_deref());
            }
            line.spread = Some(spread_value(token).to_string());
            claimed[index] = true;
            continue;
        }

        if line.ou_type.is_none() {
            if let Some(marker) = ou_marker(token, layout) {
                line.ou_type = Some(marker.to_string());
                claimed[index] = true;
                let next = index + 1;
                if next < tokens.len() && !claimed[next] && is_decimal(tokens[next]) {
                    line.total = Some(tokens[next].to_string());
                    claimed[next] = true;
                }
                continue;
            }
        }
    }

    if line.total.is_none() {
        if let Some(index) = (0..tokens.len()).find(|&i| !claimed[i] && is_decimal(tokens[i])) {
            line.total = Some(tokens[index].to_string());
            claimed[index] = true;
        }
    }

    if line.team2.is_none() && line.team1.is_some() && line.score.is_some() {
        let opponent = (0..tokens.len())
            .filter(|&i| !claimed[i])
            .find_map(|i| embedded_team(tokens[i], layout, line.team1.as_deref()));
        line.team2 = opponent;
    }

    let won = tokens
        .iter()
        .any(|token| token.chars().any(|ch| ch.eq_ignore_ascii_case(&'w')));

    let mut cells = TableRow::new();
    for (column, value) in [
        (DATE, line.date),
        (TEAM1, line.team1),
        (SCORE, line.score),
        (TEAM2, line.team2),
        (SPREAD, line.spread),
        (OU_TYPE, line.ou_type),
        (TOTAL, line.total),
    ] {
        if let Some(value) = value {
            cells.set(column, value);
        }
    }
    cells.set(RESULT, if won { "W" } else { "L" });
    cells
}

//! Column layouts for the two supported table renderings.
//!
//! The defaults were tuned against one captured page layout (screenshot
//! resolution and theme); they are configuration, not properties of the
//! domain. Layout files can replace any of them.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReconstructError;

pub const POSITION: &str = "Position";
pub const TEAM: &str = "Team";
pub const MATCHES_PLAYED: &str = "MP";
pub const OVER: &str = "O";
pub const UNDER: &str = "U";
pub const GOALS: &str = "G";
pub const GOALS_PER_MATCH: &str = "G/M";

pub const DATE: &str = "Date";
pub const TEAM1: &str = "Team1";
pub const SCORE: &str = "Score";
pub const RESULT: &str = "Result";
pub const TEAM2: &str = "Team2";
pub const SPREAD: &str = "Spread";
pub const OU_TYPE: &str = "OU_Type";
pub const TOTAL: &str = "Total";

pub const GAME_LOG_HEADERS: [&str; 8] =
    [DATE, TEAM1, SCORE, RESULT, TEAM2, SPREAD, OU_TYPE, TOTAL];

const NBA_TEAMS: [&str; 30] = [
    "ATL", "BOS", "BKN", "CHA", "CHI", "CLE", "DAL", "DEN", "DET", "GSW", "HOU", "IND", "LAC",
    "LAL", "MEM", "MIA", "MIL", "MIN", "NOP", "NYK", "OKC", "ORL", "PHI", "PHX", "POR", "SAC",
    "SAS", "TOR", "UTA", "WAS",
];

/// Half-open x-coordinate range `[xmin, xmax)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnBand {
    pub xmin: f64,
    pub xmax: f64,
}

impl ColumnBand {
    #[must_use]
    pub const fn new(xmin: f64, xmax: f64) -> Self {
        Self { xmin, xmax }
    }

    #[must_use]
    pub fn contains(&self, x: f64) -> bool {
        x >= self.xmin && x < self.xmax
    }

    pub(crate) fn validate(&self, column: &str) -> Result<(), ReconstructError> {
        if !self.xmin.is_finite() || !self.xmax.is_finite() || self.xmax <= self.xmin {
            return Err(ReconstructError::InvalidLayout(format!(
                "column '{column}' band requires finite xmin < xmax, got [{}, {})",
                self.xmin, self.xmax
            )));
        }
        Ok(())
    }
}

impl FromStr for ColumnBand {
    type Err = String;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let (start, end) = spec
            .split_once('-')
            .ok_or_else(|| format!("invalid band '{spec}', expected xmin-xmax"))?;
        let xmin: f64 = start
            .trim()
            .parse()
            .map_err(|_| format!("invalid band start: '{start}'"))?;
        let xmax: f64 = end
            .trim()
            .parse()
            .map_err(|_| format!("invalid band end: '{end}'"))?;
        if !xmin.is_finite() || !xmax.is_finite() || xmax <= xmin {
            return Err(format!("invalid band '{spec}': requires xmin < xmax"));
        }
        Ok(Self { xmin, xmax })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueShape {
    Integer,
    Decimal,
    Ratio,
    Text,
}

impl ValueShape {
    #[must_use]
    pub fn matches(self, token: &str) -> bool {
        match self {
            Self::Integer => is_all_digits(token),
            Self::Decimal => is_decimal(token),
            Self::Ratio => token.contains(':'),
            Self::Text => !token.trim().is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(default)]
    pub band: Option<ColumnBand>,
    pub shape: ValueShape,
}

impl ColumnSpec {
    #[must_use]
    pub fn banded(name: &str, band: ColumnBand, shape: ValueShape) -> Self {
        Self {
            name: name.to_string(),
            band: Some(band),
            shape,
        }
    }

    #[must_use]
    pub fn anywhere(name: &str, shape: ValueShape) -> Self {
        Self {
            name: name.to_string(),
            band: None,
            shape,
        }
    }

    /// A word fits when it lies inside the band (if any) and has the right shape.
    #[must_use]
    pub fn accepts(&self, x: f64, token: &str) -> bool {
        self.band.is_none_or(|band| band.contains(x)) && self.shape.matches(token)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandingsLayout {
    /// Words of the team name must sit left of this x-coordinate.
    pub team_cutoff: f64,
    pub columns: Vec<ColumnSpec>,
    pub header_keywords: Vec<String>,
}

impl Default for StandingsLayout {
    fn default() -> Self {
        Self {
            team_cutoff: 300.0,
            columns: vec![
                ColumnSpec::banded(
                    MATCHES_PLAYED,
                    ColumnBand::new(330.0, 370.0),
                    ValueShape::Integer,
                ),
                ColumnSpec::banded(OVER, ColumnBand::new(370.0, 400.0), ValueShape::Integer),
                ColumnSpec::banded(UNDER, ColumnBand::new(400.0, 430.0), ValueShape::Integer),
                ColumnSpec::anywhere(GOALS, ValueShape::Ratio),
                ColumnSpec::banded(
                    GOALS_PER_MATCH,
                    ColumnBand::new(480.0, 540.0),
                    ValueShape::Decimal,
                ),
            ],
            header_keywords: to_strings(&[
                "TEAM", "TEAMS", "EQUIPO", "POS", "POSITION", "MP", "PJ", "GP", "OVER", "UNDER",
                "GOALS", "G/M", "GPM",
            ]),
        }
    }
}

impl StandingsLayout {
    #[must_use]
    pub fn headers(&self) -> Vec<String> {
        let mut headers = vec![POSITION.to_string(), TEAM.to_string()];
        headers.extend(self.columns.iter().map(|column| column.name.clone()));
        headers
    }

    pub(crate) fn validate(&self) -> Result<(), ReconstructError> {
        if !self.team_cutoff.is_finite() {
            return Err(ReconstructError::InvalidLayout(
                "team_cutoff must be finite".to_string(),
            ));
        }
        for column in &self.columns {
            if column.name == POSITION || column.name == TEAM {
                return Err(ReconstructError::InvalidLayout(format!(
                    "column name '{}' is reserved",
                    column.name
                )));
            }
            if let Some(band) = &column.band {
                band.validate(&column.name)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameLogLayout {
    pub teams: Vec<String>,
    pub over_markers: Vec<String>,
    pub under_markers: Vec<String>,
    pub header_keywords: Vec<String>,
}

impl Default for GameLogLayout {
    fn default() -> Self {
        Self {
            teams: to_strings(&NBA_TEAMS),
            over_markers: to_strings(&["O", "OV", "OVER"]),
            under_markers: to_strings(&["U", "UN", "UNDER"]),
            header_keywords: to_strings(&[
                "DATE", "FECHA", "OPP", "OPPONENT", "SCORE", "RESULT", "SPREAD", "ATS", "TOTAL",
                "O/U", "LINE",
            ]),
        }
    }
}

impl GameLogLayout {
    #[must_use]
    pub fn headers(&self) -> Vec<String> {
        to_strings(&GAME_LOG_HEADERS)
    }

    pub(crate) fn validate(&self) -> Result<(), ReconstructError> {
        if self.teams.iter().any(|team| team.trim().is_empty()) {
            return Err(ReconstructError::InvalidLayout(
                "team vocabulary cannot contain blank entries".to_string(),
            ));
        }
        if self.over_markers.is_empty() || self.under_markers.is_empty() {
            return Err(ReconstructError::InvalidLayout(
                "over/under marker sets cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Layout chosen by the caller for one reconstruction run.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Standings(StandingsLayout),
    GameLog(GameLogLayout),
}

impl Schema {
    #[must_use]
    pub fn headers(&self) -> Vec<String> {
        match self {
            Self::Standings(layout) => layout.headers(),
            Self::GameLog(layout) => layout.headers(),
        }
    }

    #[must_use]
    pub fn header_keywords(&self) -> &[String] {
        match self {
            Self::Standings(layout) => &layout.header_keywords,
            Self::GameLog(layout) => &layout.header_keywords,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ReconstructError> {
        match self {
            Self::Standings(layout) => layout.validate(),
            Self::GameLog(layout) => layout.validate(),
        }
    }
}

pub(crate) fn is_all_digits(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

pub(crate) fn is_decimal(token: &str) -> bool {
    let mut digits = 0_usize;
    let mut dots = 0_usize;
    for b in token.bytes() {
        match b {
            b'0'..=b'9' => digits += 1,
            b'.' => dots += 1,
            _ => return false,
        }
    }
    digits > 0 && dots <= 1
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReconstructError;
use crate::rows::DEFAULT_Y_THRESHOLD;
use crate::schema::{GameLogLayout, Schema, StandingsLayout};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Standings,
    GameLog,
}

impl FromStr for SchemaKind {
    type Err = String;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        match spec.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "standings" | "league" => Ok(Self::Standings),
            "game-log" | "gamelog" | "games" => Ok(Self::GameLog),
            other => Err(format!(
                "unknown schema '{other}', expected standings or game-log"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `{"headers": [...], "rows": [{...}]}`
    Json,
    /// `{"headers": [...], "df": [[...]]}`
    Records,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        match spec.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "records" | "df" => Ok(Self::Records),
            "csv" => Ok(Self::Csv),
            other => Err(format!(
                "unknown output format '{other}', expected json, records or csv"
            )),
        }
    }
}

/// Per-schema layout overrides, usually loaded from a JSON file. Fields
/// missing from the file keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub standings: StandingsLayout,
    pub game_log: GameLogLayout,
}

impl LayoutConfig {
    pub fn from_json_str(input: &str) -> Result<Self, ReconstructError> {
        let config: Self = serde_json::from_str(input)
            .map_err(|error| ReconstructError::InvalidLayout(error.to_string()))?;
        config.standings.validate()?;
        config.game_log.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ReconstructError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_json_str(&input)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructOptions {
    pub schema: SchemaKind,
    pub y_threshold: f64,
    pub min_confidence: Option<f32>,
    pub format: OutputFormat,
    pub layout: LayoutConfig,
}

impl Default for ReconstructOptions {
    fn default() -> Self {
        Self {
            schema: SchemaKind::Standings,
            y_threshold: DEFAULT_Y_THRESHOLD,
            min_confidence: None,
            format: OutputFormat::Json,
            layout: LayoutConfig::default(),
        }
    }
}

impl ReconstructOptions {
    pub(crate) fn validate(&self) -> Result<(), ReconstructError> {
        if !self.y_threshold.is_finite() || self.y_threshold < 0.0 {
            return Err(ReconstructError::InvalidOption(format!(
                "y_threshold must be a finite non-negative number, got {}",
                self.y_threshold
            )));
        }
        if let Some(min) = self.min_confidence {
            if !(0.0..=1.0).contains(&min) {
                return Err(ReconstructError::InvalidOption(format!(
                    "min_confidence must be within 0..=1, got {min}"
                )));
            }
        }
        Ok(())
    }

    /// Resolves the selected schema against the layout overrides.
    pub fn schema(&self) -> Result<Schema, ReconstructError> {
        let schema = match self.schema {
            SchemaKind::Standings => Schema::Standings(self.layout.standings.clone()),
            SchemaKind::GameLog => Schema::GameLog(self.layout.game_log.clone()),
        };
        schema.validate()?;
        Ok(schema)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{LayoutConfig, OutputFormat, ReconstructOptions, SchemaKind};
    use crate::error::ReconstructError;
    use crate::schema::Schema;

    #[test]
    fn parse_schema_kind() {
        assert_eq!(SchemaKind::from_str("Standings"), Ok(SchemaKind::Standings));
        assert_eq!(SchemaKind::from_str("game_log"), Ok(SchemaKind::GameLog));
        let err = SchemaKind::from_str("boxscore").expect_err("unknown schema should fail");
        assert!(err.contains("unknown schema"));
    }

    #[test]
    fn parse_output_format() {
        assert_eq!(OutputFormat::from_str("CSV"), Ok(OutputFormat::Csv));
        assert_eq!(OutputFormat::from_str("df"), Ok(OutputFormat::Records));
        assert!(OutputFormat::from_str("xml").is_err());
    }

    #[test]
    fn layout_overrides_selected_schema() {
        let layout = LayoutConfig::from_json_str(
            r#"{"game_log": {"teams": ["AME", "CHV"]}, "standings": {"team_cutoff": 280}}"#,
        )
        .expect("layout should parse");
        let options = ReconstructOptions {
            schema: SchemaKind::GameLog,
            layout,
            ..ReconstructOptions::default()
        };

        match options.schema().expect("schema should resolve") {
            Schema::GameLog(game_log) => {
                assert_eq!(game_log.teams, vec!["AME", "CHV"]);
                assert_eq!(game_log.over_markers, vec!["O", "OV", "OVER"]);
            }
            Schema::Standings(_) => panic!("expected game-log schema"),
        }
    }

    #[test]
    fn reject_inverted_band_in_layout() {
        let err = LayoutConfig::from_json_str(
            r#"{"standings": {"columns": [{"name": "MP", "band": {"xmin": 370, "xmax": 330}, "shape": "integer"}]}}"#,
        )
        .expect_err("inverted band should fail");
        assert!(matches!(err, ReconstructError::InvalidLayout(_)));
    }

    #[test]
    fn reject_negative_threshold() {
        let options = ReconstructOptions {
            y_threshold: -1.0,
            ..ReconstructOptions::default()
        };
        assert!(options.validate().is_err());
    }
}

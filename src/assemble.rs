use crate::model::{Table, TableRow};
use crate::schema::{POSITION, Schema};

/// Orders accepted rows and attaches the schema headers.
#[derive(Debug, Clone, Copy)]
pub struct TableAssembler<'a> {
    schema: &'a Schema,
}

impl<'a> TableAssembler<'a> {
    #[must_use]
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Standings are sorted by position (stable, so ties keep screen
    /// order); game logs keep the order rows were detected in.
    #[must_use]
    pub fn assemble(&self, mut rows: Vec<TableRow>) -> Table {
        if let Schema::Standings(_) = self.schema {
            rows.sort_by_key(|row| row.integer(POSITION).unwrap_or(i64::MAX));
        }

        Table {
            headers: self.schema.headers(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TableAssembler;
    use crate::model::TableRow;
    use crate::schema::{GameLogLayout, Schema, StandingsLayout};

    fn standing(position: i64, team: &str) -> TableRow {
        let mut row = TableRow::new();
        row.set("Position", position);
        row.set("Team", team);
        row
    }

    #[test]
    fn empty_input_keeps_headers() {
        let schema = Schema::Standings(StandingsLayout::default());
        let table = TableAssembler::new(&schema).assemble(Vec::new());
        assert_eq!(
            table.headers,
            vec!["Position", "Team", "MP", "O", "U", "G", "G/M"]
        );
        assert!(table.rows.is_empty());
    }

    #[test]
    fn standings_sorted_by_position() {
        let schema = Schema::Standings(StandingsLayout::default());
        let table = TableAssembler::new(&schema).assemble(vec![
            standing(3, "C"),
            standing(1, "A"),
            standing(2, "B"),
        ]);
        let teams = table
            .rows
            .iter()
            .filter_map(|row| row.text("Team"))
            .collect::<Vec<_>>();
        assert_eq!(teams, vec!["A", "B", "C"]);
    }

    #[test]
    fn game_log_keeps_detection_order() {
        let schema = Schema::GameLog(GameLogLayout::default());
        let mut late = TableRow::new();
        late.set("Date", "3/20");
        let mut early = TableRow::new();
        early.set("Date", "3/14");

        let table = TableAssembler::new(&schema).assemble(vec![late, early]);
        assert_eq!(table.rows[0].text("Date"), Some("3/20"));
        assert_eq!(table.headers.len(), 8);
    }
}

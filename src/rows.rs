use tracing::debug;

use crate::model::{Row, Word};

pub const DEFAULT_Y_THRESHOLD: f64 = 10.0;

/// Clusters words into horizontal rows.
///
/// Greedy single pass over words sorted by `y_center`: a word joins the open
/// row while its distance to the row's first (anchor) word is within
/// `y_threshold`, otherwise it anchors a new row. Words are never compared to
/// the row centroid, so a tall or skewed row can drift and split. Column
/// bands downstream were tuned against this exact behaviour.
#[derive(Debug, Clone, PartialEq)]
pub struct RowGrouper {
    y_threshold: f64,
}

impl Default for RowGrouper {
    fn default() -> Self {
        Self::new(DEFAULT_Y_THRESHOLD)
    }
}

impl RowGrouper {
    #[must_use]
    pub fn new(y_threshold: f64) -> Self {
        let mut grouper = Self { y_threshold: 0.0 };
        grouper.set_y_threshold(y_threshold);
        grouper
    }

    #[must_use]
    pub fn y_threshold(&self) -> f64 {
        self.y_threshold
    }

    /// Negative and NaN thresholds collapse to 0.
    pub fn set_y_threshold(&mut self, y_threshold: f64) {
        self.y_threshold = if y_threshold.is_nan() {
            0.0
        } else {
            y_threshold.max(0.0)
        };
    }

    #[must_use]
    pub fn group(&self, words: &[Word]) -> Vec<Row> {
        let mut sorted = words.iter().collect::<Vec<_>>();
        sorted.sort_by(|a, b| {
            a.y_center()
                .total_cmp(&b.y_center())
                .then_with(|| a.x_center().total_cmp(&b.x_center()))
                .then_with(|| a.text().cmp(b.text()))
        });

        let mut rows = Vec::new();
        let mut current: Vec<Word> = Vec::new();
        let mut anchor_y = 0.0_f64;

        for word in sorted {
            if !current.is_empty() && (word.y_center() - anchor_y).abs() > self.y_threshold {
                rows.push(Row::from_unsorted(std::mem::take(&mut current)));
            }
            if current.is_empty() {
                anchor_y = word.y_center();
            }
            current.push(word.clone());
        }
        if !current.is_empty() {
            rows.push(Row::from_unsorted(current));
        }

        debug!(
            words = words.len(),
            rows = rows.len(),
            y_threshold = self.y_threshold,
            "grouped words into rows"
        );
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::RowGrouper;
    use crate::model::word_at;

    fn texts(rows: &[crate::model::Row]) -> Vec<Vec<&str>> {
        rows.iter().map(|row| row.texts().collect()).collect()
    }

    #[test]
    fn no_words_no_rows() {
        assert!(RowGrouper::default().group(&[]).is_empty());
    }

    #[test]
    fn groups_by_y_and_orders_by_x() {
        let words = vec![
            word_at("BOS", 60, 102),
            word_at("2.", 10, 140),
            word_at("1.", 10, 100),
            word_at("NYK", 60, 141),
        ];
        let rows = RowGrouper::new(5.0).group(&words);
        assert_eq!(texts(&rows), vec![vec!["1.", "BOS"], vec!["2.", "NYK"]]);
    }

    #[test]
    fn compares_against_anchor_not_previous_word() {
        // Each step is 4px but the third word is 8px from the anchor.
        let words = vec![
            word_at("a", 10, 100),
            word_at("b", 20, 104),
            word_at("c", 30, 108),
        ];
        let rows = RowGrouper::new(5.0).group(&words);
        assert_eq!(texts(&rows), vec![vec!["a", "b"], vec!["c"]]);
    }

    #[test]
    fn threshold_is_inclusive() {
        let words = vec![word_at("a", 10, 100), word_at("b", 20, 110)];
        assert_eq!(RowGrouper::new(10.0).group(&words).len(), 1);
        assert_eq!(RowGrouper::new(9.5).group(&words).len(), 2);
    }

    #[test]
    fn setter_changes_grouping() {
        let words = vec![word_at("a", 10, 100), word_at("b", 20, 120)];
        let mut grouper = RowGrouper::new(5.0);
        assert_eq!(grouper.group(&words).len(), 2);
        grouper.set_y_threshold(25.0);
        assert_eq!(grouper.group(&words).len(), 1);
    }

    #[test]
    fn negative_threshold_clamps_to_zero() {
        let grouper = RowGrouper::new(-3.0);
        assert!(grouper.y_threshold().abs() < f64::EPSILON);
        let words = vec![word_at("a", 10, 100), word_at("b", 20, 100)];
        assert_eq!(grouper.group(&words).len(), 1);
    }
}

mod common;

use ocr_table_rebuild::{Row, RowGrouper, Word};
use proptest::prelude::*;

fn word_strategy() -> impl Strategy<Value = Word> {
    ("[A-Z0-9:.]{1,5}", 0..600_i32, 0..400_i32).prop_map(|(text, x, y)| common::word(&text, x, y))
}

fn snapshot(rows: &[Row]) -> Vec<Vec<(String, i64, i64)>> {
    rows.iter()
        .map(|row| {
            row.words()
                .iter()
                .map(|word| {
                    (
                        word.text().to_string(),
                        word.x_center().round() as i64,
                        word.y_center().round() as i64,
                    )
                })
                .collect()
        })
        .collect()
}

proptest! {
    #[test]
    fn grouping_ignores_input_order(
        words in proptest::collection::vec(word_strategy(), 0..40),
        threshold in 0.0..30.0_f64,
        seed in any::<u64>(),
    ) {
        let grouper = RowGrouper::new(threshold);
        let mut shuffled = words.clone();
        // Deterministic permutation driven by the seed.
        let len = shuffled.len();
        if len > 1 {
            let mut state = seed;
            for i in (1..len).rev() {
                state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
                let j = usize::try_from(state >> 33).unwrap_or(0) % (i + 1);
                shuffled.swap(i, j);
            }
        }

        prop_assert_eq!(snapshot(&grouper.group(&words)), snapshot(&grouper.group(&shuffled)));
    }

    #[test]
    fn larger_threshold_never_adds_rows(
        words in proptest::collection::vec(word_strategy(), 0..40),
        low in 0.0..20.0_f64,
        extra in 0.0..20.0_f64,
    ) {
        let tight = RowGrouper::new(low).group(&words);
        let loose = RowGrouper::new(low + extra).group(&words);
        prop_assert!(loose.len() <= tight.len());
        prop_assert_eq!(
            loose.iter().map(Row::len).sum::<usize>(),
            tight.iter().map(Row::len).sum::<usize>()
        );
    }

    #[test]
    fn rows_are_sorted_left_to_right(
        words in proptest::collection::vec(word_strategy(), 0..40),
        threshold in 0.0..30.0_f64,
    ) {
        for row in RowGrouper::new(threshold).group(&words) {
            let xs = row.words().iter().map(Word::x_center).collect::<Vec<_>>();
            prop_assert!(xs.windows(2).all(|pair| pair[0] <= pair[1]));
        }
    }
}

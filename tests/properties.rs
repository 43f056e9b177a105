use binconf::{row, validate_table, BinaryConfusionMatrix, RowTable, Table, Value};
use proptest::prelude::*;

const LABELS: [&str; 3] = ["P", "N", "Q"];

fn label(choice: usize) -> Value {
    LABELS
        .get(choice)
        .map_or(Value::Missing, |label| Value::from(*label))
}

fn table_strategy(classes: usize) -> impl Strategy<Value = RowTable> {
    prop::collection::vec(
        (
            0..=LABELS.len(),
            0..=classes,
            prop_oneof![
                4 => (0i64..1000).prop_map(Value::Int),
                1 => (-50i64..0).prop_map(Value::Int),
                1 => Just(Value::Missing),
                1 => Just(Value::from("12")),
            ],
        ),
        0..40,
    )
    .prop_map(move |rows| {
        rows.into_iter()
            .map(|(predicted, actual, count)| {
                let actual = if actual < classes {
                    label(actual)
                } else {
                    Value::Missing
                };
                row!["Predicted" => label(predicted), "Actual" => actual, "Count" => count]
            })
            .collect()
    })
}

fn valid_count(table: &RowTable) -> u128 {
    let labeled = |row: usize, column: &str| {
        table.value(row, column).and_then(Value::as_str).is_some()
    };
    (0..table.len())
        .filter(|&row| labeled(row, "Predicted") && labeled(row, "Actual"))
        .filter_map(|row| table.value(row, "Count")?.as_count())
        .map(u128::from)
        .sum()
}

proptest! {
    #[test]
    fn cells_sum_to_valid_counts(table in table_strategy(2)) {
        if let Ok(cm) = BinaryConfusionMatrix::new(&table, "Predicted", "Actual", "P") {
            prop_assert_eq!(
                cm.true_positive() + cm.false_positive() + cm.false_negative() + cm.true_negative(),
                valid_count(&table)
            );
        }
    }

    #[test]
    fn ratios_stay_in_unit_interval(table in table_strategy(2), positive in 0..LABELS.len()) {
        if let Ok(cm) = BinaryConfusionMatrix::new(&table, "Predicted", "Actual", LABELS[positive]) {
            for value in [cm.recall(), cm.precision(), cm.accuracy(), cm.f1_score()] {
                prop_assert!((0.0..=1.0).contains(&value), "{value} out of range");
            }
        }
    }

    #[test]
    fn construction_agrees_with_validation(table in table_strategy(3)) {
        prop_assert_eq!(
            validate_table(&table, "Predicted", "Actual"),
            BinaryConfusionMatrix::new(&table, "Predicted", "Actual", "P").is_ok()
        );
        prop_assert!(!validate_table(&table, "Prediction", "Actual"));
    }

    #[test]
    fn zero_denominators_yield_zero(table in table_strategy(2)) {
        if let Ok(cm) = BinaryConfusionMatrix::new(&table, "Predicted", "Actual", "P") {
            if cm.true_positive() + cm.false_negative() == 0 {
                prop_assert_eq!(cm.recall(), 0.0);
            }
            if cm.true_positive() + cm.false_positive() == 0 {
                prop_assert_eq!(cm.precision(), 0.0);
            }
            if cm.recall() == 0.0 && cm.precision() == 0.0 {
                prop_assert_eq!(cm.f1_score(), 0.0);
            }
        }
    }
}

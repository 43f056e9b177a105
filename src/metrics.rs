use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

use crate::table::Table;

/// Column holding the number of observations each row stands for.
pub const COUNT_COLUMN: &str = "Count";

const NEGATIVE: usize = 0;
const POSITIVE: usize = 1;

/// Reasons a table cannot produce a binary confusion matrix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfusionMatrixError {
    #[error("the data table is empty")]
    EmptyDataset,
    #[error("column '{column}' does not exist (available columns: {})", .available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },
    #[error("not a binary classification: found {0} distinct classes")]
    InvalidClassCount(usize),
}

/// Checks that `table` can be tabulated as a binary classification and
/// returns the two labels found in `actual_column`, sorted.
pub fn check_table<T: Table + ?Sized>(
    table: &T,
    predicted_column: &str,
    actual_column: &str,
) -> Result<IndexSet<String>, ConfusionMatrixError> {
    if table.is_empty() {
        warn!("data table is empty");
        return Err(ConfusionMatrixError::EmptyDataset);
    }

    for column in [predicted_column, actual_column] {
        if !table.has_column(column) {
            let available: Vec<String> =
                table.column_names().into_iter().map(str::to_owned).collect();
            warn!(column, available = %available.join(", "), "column not found");
            return Err(ConfusionMatrixError::MissingColumn {
                column: column.to_owned(),
                available,
            });
        }
    }

    let mut labels: IndexSet<String> = (0..table.len())
        .filter_map(|row| table.value(row, actual_column)?.as_str())
        .map(str::to_owned)
        .collect();
    labels.sort();

    if labels.len() != 2 {
        warn!(classes = labels.len(), "not a binary classification");
        return Err(ConfusionMatrixError::InvalidClassCount(labels.len()));
    }

    Ok(labels)
}

/// Returns whether `table` can be tabulated as a binary classification.
pub fn validate_table<T: Table + ?Sized>(
    table: &T,
    predicted_column: &str,
    actual_column: &str,
) -> bool {
    check_table(table, predicted_column, actual_column).is_ok()
}

/// Maps a label to its matrix index: 1 for the positive class, 0 otherwise.
#[inline]
pub fn class_index(label: &str, positive_class: &str) -> usize {
    if label == positive_class {
        POSITIVE
    } else {
        NEGATIVE
    }
}

/// A 2x2 confusion matrix indexed as `matrix[actual][predicted]`,
/// with index 1 for the positive class.
///
/// Cells are `u128`: no in-memory table of `i64` counts can overflow them.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryConfusionMatrix {
    matrix: [[u128; 2]; 2],
    /// The two labels found in the actual column, sorted.
    labels: IndexSet<String>,
    positive_class: String,
}

impl BinaryConfusionMatrix {
    /// Tabulates every row of `table` against `positive_class`.
    ///
    /// Rows without a string label in either column, or without a
    /// non-negative integer in [`COUNT_COLUMN`], are skipped.
    pub fn new<T: Table + ?Sized>(
        table: &T,
        predicted_column: &str,
        actual_column: &str,
        positive_class: &str,
    ) -> Result<Self, ConfusionMatrixError> {
        let labels = check_table(table, predicted_column, actual_column)?;

        if !labels.contains(positive_class) {
            warn!(
                positive_class,
                labels = ?labels,
                "positive class is not one of the detected labels; every row will count as negative"
            );
        }

        let mut matrix = [[0u128; 2]; 2];
        let mut skipped = 0usize;

        for row in 0..table.len() {
            let actual = table.value(row, actual_column).and_then(|v| v.as_str());
            let predicted = table.value(row, predicted_column).and_then(|v| v.as_str());
            let count = table.value(row, COUNT_COLUMN).and_then(|v| v.as_count());

            let (Some(actual), Some(predicted), Some(count)) = (actual, predicted, count) else {
                debug!(row, "skipping malformed row");
                skipped += 1;
                continue;
            };

            matrix[class_index(actual, positive_class)][class_index(predicted, positive_class)] +=
                u128::from(count);
        }

        debug!(rows = table.len(), skipped, "confusion matrix computed");

        Ok(Self {
            matrix,
            labels,
            positive_class: positive_class.to_owned(),
        })
    }

    /// The raw counts, indexed as `[actual][predicted]`.
    #[inline]
    pub fn matrix(&self) -> &[[u128; 2]; 2] {
        &self.matrix
    }

    /// The two labels found in the actual column, sorted.
    pub fn labels(&self) -> &IndexSet<String> {
        &self.labels
    }

    /// The label tabulated as positive.
    pub fn positive_class(&self) -> &str {
        &self.positive_class
    }

    /// Whether the positive class is one of the detected labels.
    pub fn positive_class_detected(&self) -> bool {
        self.labels.contains(self.positive_class.as_str())
    }

    #[inline]
    pub fn true_positive(&self) -> u128 {
        self.matrix[POSITIVE][POSITIVE]
    }

    #[inline]
    pub fn false_positive(&self) -> u128 {
        self.matrix[NEGATIVE][POSITIVE]
    }

    #[inline]
    pub fn false_negative(&self) -> u128 {
        self.matrix[POSITIVE][NEGATIVE]
    }

    #[inline]
    pub fn true_negative(&self) -> u128 {
        self.matrix[NEGATIVE][NEGATIVE]
    }

    /// Total number of tabulated observations.
    pub fn total(&self) -> u128 {
        self.matrix.iter().flatten().sum()
    }

    /// TP / (TP + FN), or 0 when there are no actual positives.
    pub fn recall(&self) -> f64 {
        ratio(self.true_positive(), self.true_positive() + self.false_negative())
    }

    /// TP / (TP + FP), or 0 when nothing was predicted positive.
    pub fn precision(&self) -> f64 {
        ratio(self.true_positive(), self.true_positive() + self.false_positive())
    }

    /// (TP + TN) / total, or 0 for an empty matrix.
    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positive() + self.true_negative(), self.total())
    }

    /// Harmonic mean of precision and recall, or 0 when both are 0.
    pub fn f1_score(&self) -> f64 {
        let recall = self.recall();
        let precision = self.precision();
        let denominator = recall + precision;
        if denominator == 0.0 {
            0.0
        } else {
            2.0 * recall * precision / denominator
        }
    }

    /// Renders the matrix with the positive row and column first.
    pub fn matrix_graph(&self) -> String {
        let mut graph = String::from("Actual\\Predicted | Positive | Negative\n");
        graph += &format!(
            "Positive | {} | {}\n",
            self.true_positive(),
            self.false_negative()
        );
        graph += &format!(
            "Negative | {} | {}\n",
            self.false_positive(),
            self.true_negative()
        );
        graph
    }

    /// A serializable snapshot of the counts and derived ratios.
    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            positive_class: self.positive_class.clone(),
            labels: self.labels.iter().cloned().collect(),
            true_positive: self.true_positive(),
            false_positive: self.false_positive(),
            false_negative: self.false_negative(),
            true_negative: self.true_negative(),
            total: self.total(),
            accuracy: self.accuracy(),
            precision: self.precision(),
            recall: self.recall(),
            f1_score: self.f1_score(),
        }
    }
}

impl fmt::Display for BinaryConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.matrix_graph())
    }
}

fn ratio(numerator: u128, denominator: u128) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Counts and ratios of a [`BinaryConfusionMatrix`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub positive_class: String,
    pub labels: Vec<String>,
    pub true_positive: u128,
    pub false_positive: u128,
    pub false_negative: u128,
    pub true_negative: u128,
    pub total: u128,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

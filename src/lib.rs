//! Binary classification confusion matrices over pre-aggregated label tables.
//!
//! Each table row carries a predicted label, an actual label and a `Count`
//! of observations. [`BinaryConfusionMatrix`] tabulates those rows against a
//! positive class and derives precision, recall, accuracy and F1.

pub mod metrics;
pub mod parquet_table;
pub mod table;

pub use metrics::{
    check_table, class_index, validate_table, BinaryConfusionMatrix, ConfusionMatrixError,
    MetricsReport, COUNT_COLUMN,
};
pub use parquet_table::{load_parquet, read_parquet};
pub use table::{Row, RowTable, Table, TableError, Value};

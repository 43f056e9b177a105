use parquet::{
    file::{
        reader::{ChunkReader, FileReader},
        serialized_reader::SerializedFileReader,
    },
    record::Field,
};
use std::path::Path;
use tracing::debug;

use crate::table::{Row, RowTable, Table, TableError, Value};

/// Reads every row of a parquet file into memory.
///
/// The schema is taken from the file metadata, so a column that holds only
/// nulls is still reported by [`crate::table::Table::column_names`].
pub fn read_parquet<R: ChunkReader + 'static>(reader: R) -> Result<RowTable, TableError> {
    let reader = SerializedFileReader::new(reader)?;
    let columns: Vec<String> = reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .root_schema()
        .get_fields()
        .iter()
        .map(|field| field.name().to_owned())
        .collect();

    let mut table = RowTable::with_columns(columns);
    for row in reader.get_row_iter(None)? {
        let row = row?;
        table.push_row(
            row.get_column_iter()
                .map(|(name, field)| (name.as_str().into(), value_from_field(field)))
                .collect::<Row>(),
        );
    }

    debug!(rows = table.len(), "loaded parquet table");
    Ok(table)
}

/// Opens and reads the parquet file at `path`.
pub fn load_parquet(path: impl AsRef<Path>) -> Result<RowTable, TableError> {
    read_parquet(std::fs::File::open(path)?)
}

fn value_from_field(field: &Field) -> Value {
    match field {
        Field::Bool(b) => Value::Bool(*b),
        Field::Byte(n) => Value::Int(i64::from(*n)),
        Field::Short(n) => Value::Int(i64::from(*n)),
        Field::Int(n) => Value::Int(i64::from(*n)),
        Field::Long(n) => Value::Int(*n),
        Field::UByte(n) => Value::Int(i64::from(*n)),
        Field::UShort(n) => Value::Int(i64::from(*n)),
        Field::UInt(n) => Value::Int(i64::from(*n)),
        Field::ULong(n) => i64::try_from(*n).map_or(Value::Missing, Value::Int),
        Field::Float(x) => Value::Double(f64::from(*x)),
        Field::Double(x) => Value::Double(*x),
        Field::Str(s) => Value::String(s.clone()),
        _ => Value::Missing,
    }
}

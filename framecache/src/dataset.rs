//! Tabular dataset seam between the ingestion layer and the cache core.
//!
//! The cache never interprets data values. All it needs from a dataset is
//! a row count and a canonical byte serialization of a row range, which the
//! fingerprinter feeds into its hash. The [`Dataset`] trait captures that
//! narrow contract; [`Table`] is the concrete column-oriented implementation
//! used by the ingestion layer and throughout the tests.
//!
//! The canonical form is order-sensitive on purpose: reordering rows or
//! columns is a content change and must produce a different fingerprint.

use std::ops::Range;
use thiserror::Error;

/// Errors constructing or mutating a [`Table`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DatasetError {
    /// Columns passed to `Table::new` have differing lengths
    #[error("column '{column}' has {actual} rows, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// A row has the wrong number of cells
    #[error("row has {actual} cells, table has {expected} columns")]
    RowShape { expected: usize, actual: usize },

    /// A cell value does not match the column's type
    #[error("type mismatch in column '{column}'")]
    TypeMismatch { column: String },

    /// Cell coordinates outside the table
    #[error("cell ({row}, {column}) is out of bounds")]
    OutOfBounds { row: usize, column: usize },
}

/// One cell value, used when appending rows or overwriting cells.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

/// Typed storage for one column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Int(Vec<i64>),
    Float(Vec<f64>),
    Str(Vec<String>),
    Bool(Vec<bool>),
}

impl ColumnValues {
    fn len(&self) -> usize {
        match self {
            ColumnValues::Int(v) => v.len(),
            ColumnValues::Float(v) => v.len(),
            ColumnValues::Str(v) => v.len(),
            ColumnValues::Bool(v) => v.len(),
        }
    }

    /// Short type tag used in the canonical schema line.
    fn type_tag(&self) -> &'static str {
        match self {
            ColumnValues::Int(_) => "int",
            ColumnValues::Float(_) => "float",
            ColumnValues::Str(_) => "str",
            ColumnValues::Bool(_) => "bool",
        }
    }

    /// Append a cell's serialized form to `out`.
    ///
    /// Each value carries a one-byte type prefix; strings are length-prefixed
    /// so no value can alias another across cell boundaries. Floats are
    /// written as their IEEE-754 bit pattern, which is exact and avoids any
    /// dependence on decimal formatting.
    fn write_cell(&self, row: usize, out: &mut Vec<u8>) {
        match self {
            ColumnValues::Int(v) => {
                out.push(b'i');
                out.extend_from_slice(v[row].to_string().as_bytes());
            }
            ColumnValues::Float(v) => {
                out.push(b'f');
                out.extend_from_slice(format!("{:016x}", v[row].to_bits()).as_bytes());
            }
            ColumnValues::Str(v) => {
                let s = &v[row];
                out.push(b's');
                out.extend_from_slice(s.len().to_string().as_bytes());
                out.push(b':');
                out.extend_from_slice(s.as_bytes());
            }
            ColumnValues::Bool(v) => {
                out.push(b'b');
                out.push(if v[row] { b'1' } else { b'0' });
            }
        }
    }

    fn push_cell(&mut self, cell: Cell) -> Result<(), Cell> {
        match (self, cell) {
            (ColumnValues::Int(v), Cell::Int(x)) => v.push(x),
            (ColumnValues::Float(v), Cell::Float(x)) => v.push(x),
            (ColumnValues::Str(v), Cell::Str(x)) => v.push(x),
            (ColumnValues::Bool(v), Cell::Bool(x)) => v.push(x),
            (_, cell) => return Err(cell),
        }
        Ok(())
    }

    fn set_cell(&mut self, row: usize, cell: Cell) -> Result<(), Cell> {
        match (self, cell) {
            (ColumnValues::Int(v), Cell::Int(x)) => v[row] = x,
            (ColumnValues::Float(v), Cell::Float(x)) => v[row] = x,
            (ColumnValues::Str(v), Cell::Str(x)) => v[row] = x,
            (ColumnValues::Bool(v), Cell::Bool(x)) => v[row] = x,
            (_, cell) => return Err(cell),
        }
        Ok(())
    }
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: ColumnValues,
}

impl Column {
    /// Create an integer column.
    pub fn int(name: impl Into<String>, values: Vec<i64>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Int(values),
        }
    }

    /// Create a float column.
    pub fn float(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Float(values),
        }
    }

    /// Create a string column.
    pub fn str(name: impl Into<String>, values: Vec<&str>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Str(values.into_iter().map(String::from).collect()),
        }
    }

    /// Create a boolean column.
    pub fn bool(name: impl Into<String>, values: Vec<bool>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Bool(values),
        }
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Narrow dataset contract consumed by the fingerprinter.
///
/// Implementations must serialize deterministically: the same content in
/// the same order always yields the same bytes.
pub trait Dataset {
    /// Number of rows in the dataset.
    fn row_count(&self) -> usize;

    /// Append the canonical schema description (column names and types).
    fn write_schema(&self, out: &mut Vec<u8>);

    /// Append the canonical serialization of `rows` (half-open range).
    fn write_rows(&self, rows: Range<usize>, out: &mut Vec<u8>);
}

/// In-memory column-oriented table.
///
/// All columns have equal length; `Table::new` enforces this. Mutation is
/// limited to appending whole rows and overwriting single cells, which is
/// all the interactive tooling (and the cache tests) need.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    /// Create a table from columns, validating equal lengths.
    pub fn new(columns: Vec<Column>) -> Result<Self, DatasetError> {
        let rows = columns.first().map_or(0, |c| c.values.len());
        for col in &columns {
            if col.values.len() != rows {
                return Err(DatasetError::ColumnLengthMismatch {
                    column: col.name.clone(),
                    expected: rows,
                    actual: col.values.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    /// Create an empty table with no columns and no rows.
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: 0,
        }
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Append one row; cells must match column types positionally.
    pub fn push_row(&mut self, cells: Vec<Cell>) -> Result<(), DatasetError> {
        if cells.len() != self.columns.len() {
            return Err(DatasetError::RowShape {
                expected: self.columns.len(),
                actual: cells.len(),
            });
        }
        for (i, cell) in cells.into_iter().enumerate() {
            if self.columns[i].values.push_cell(cell).is_err() {
                // Roll back the cells already appended to earlier columns
                for col in &mut self.columns[..i] {
                    match &mut col.values {
                        ColumnValues::Int(v) => {
                            v.pop();
                        }
                        ColumnValues::Float(v) => {
                            v.pop();
                        }
                        ColumnValues::Str(v) => {
                            v.pop();
                        }
                        ColumnValues::Bool(v) => {
                            v.pop();
                        }
                    }
                }
                return Err(DatasetError::TypeMismatch {
                    column: self.columns[i].name.clone(),
                });
            }
        }
        self.rows += 1;
        Ok(())
    }

    /// Overwrite a single cell.
    pub fn set(&mut self, row: usize, column: usize, cell: Cell) -> Result<(), DatasetError> {
        if row >= self.rows || column >= self.columns.len() {
            return Err(DatasetError::OutOfBounds { row, column });
        }
        self.columns[column]
            .values
            .set_cell(row, cell)
            .map_err(|_| DatasetError::TypeMismatch {
                column: self.columns[column].name.clone(),
            })
    }
}

impl Dataset for Table {
    fn row_count(&self) -> usize {
        self.rows
    }

    fn write_schema(&self, out: &mut Vec<u8>) {
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                out.push(b',');
            }
            out.push(b's');
            out.extend_from_slice(col.name.len().to_string().as_bytes());
            out.push(b':');
            out.extend_from_slice(col.name.as_bytes());
            out.push(b':');
            out.extend_from_slice(col.values.type_tag().as_bytes());
        }
        out.push(b'\n');
    }

    fn write_rows(&self, rows: Range<usize>, out: &mut Vec<u8>) {
        for row in rows {
            for (i, col) in self.columns.iter().enumerate() {
                if i > 0 {
                    out.push(b'|');
                }
                col.values.write_cell(row, out);
            }
            out.push(b'\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        Table::new(vec![
            Column::int("id", vec![1, 2, 3]),
            Column::float("score", vec![0.5, 1.5, 2.5]),
            Column::str("label", vec!["a", "b", "c"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_new_validates_column_lengths() {
        let result = Table::new(vec![
            Column::int("a", vec![1, 2]),
            Column::int("b", vec![1, 2, 3]),
        ]);
        assert_eq!(
            result.unwrap_err(),
            DatasetError::ColumnLengthMismatch {
                column: "b".to_string(),
                expected: 2,
                actual: 3,
            }
        );
    }

    #[test]
    fn test_empty_table_has_no_rows() {
        let table = Table::empty();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 0);
    }

    #[test]
    fn test_push_row_increments_row_count() {
        let mut table = sample_table();
        table
            .push_row(vec![Cell::Int(4), Cell::Float(3.5), Cell::Str("d".into())])
            .unwrap();
        assert_eq!(table.row_count(), 4);
    }

    #[test]
    fn test_push_row_rejects_wrong_shape() {
        let mut table = sample_table();
        let err = table.push_row(vec![Cell::Int(4)]).unwrap_err();
        assert_eq!(
            err,
            DatasetError::RowShape {
                expected: 3,
                actual: 1
            }
        );
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn test_push_row_rejects_type_mismatch_and_rolls_back() {
        let mut table = sample_table();
        let err = table
            .push_row(vec![Cell::Int(4), Cell::Str("oops".into()), Cell::Str("d".into())])
            .unwrap_err();
        assert_eq!(
            err,
            DatasetError::TypeMismatch {
                column: "score".to_string()
            }
        );
        assert_eq!(table.row_count(), 3);

        // Table must still serialize consistently after the failed append
        let mut before = Vec::new();
        sample_table().write_rows(0..3, &mut before);
        let mut after = Vec::new();
        table.write_rows(0..3, &mut after);
        assert_eq!(before, after);
    }

    #[test]
    fn test_set_cell_changes_serialization() {
        let mut table = sample_table();
        let mut before = Vec::new();
        table.write_rows(0..3, &mut before);

        table.set(1, 0, Cell::Int(99)).unwrap();
        let mut after = Vec::new();
        table.write_rows(0..3, &mut after);
        assert_ne!(before, after);
    }

    #[test]
    fn test_set_cell_out_of_bounds() {
        let mut table = sample_table();
        assert_eq!(
            table.set(10, 0, Cell::Int(0)).unwrap_err(),
            DatasetError::OutOfBounds { row: 10, column: 0 }
        );
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let table = sample_table();
        let mut a = Vec::new();
        table.write_schema(&mut a);
        table.write_rows(0..3, &mut a);

        let mut b = Vec::new();
        table.write_schema(&mut b);
        table.write_rows(0..3, &mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_schema_includes_names_and_types() {
        let table = sample_table();
        let mut out = Vec::new();
        table.write_schema(&mut out);
        let schema = String::from_utf8(out).unwrap();
        assert!(schema.contains("id:int"));
        assert!(schema.contains("score:float"));
        assert!(schema.contains("label:str"));
    }

    #[test]
    fn test_string_values_are_length_prefixed() {
        // "a|b" in a cell must not alias two separate cells
        let t1 = Table::new(vec![Column::str("x", vec!["a|b"])]).unwrap();
        let t2 = Table::new(vec![Column::str("x", vec!["a"])]).unwrap();
        let mut b1 = Vec::new();
        let mut b2 = Vec::new();
        t1.write_rows(0..1, &mut b1);
        t2.write_rows(0..1, &mut b2);
        assert_ne!(b1, b2);
    }
}

//! A minimal columnar table.
//!
//! Atom data is wide and sparse, so it is stored column-wise with
//! per-value nullability. The surface here is intentionally small:
//! exactly the capabilities the extraction and assembly operations
//! need, nothing resembling a general dataframe API.

use std::fmt;

/// Logical type of a [`Column`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Str,
    Int,
    Float,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Str => write!(f, "str"),
            DataType::Int => write!(f, "int"),
            DataType::Float => write!(f, "float"),
        }
    }
}

/// A single column of nullable values.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Str(Vec<Option<String>>),
    Int(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
}

impl Column {
    /// Creates an empty column of the given type.
    pub fn empty(data_type: DataType) -> Self {
        match data_type {
            DataType::Str => Column::Str(Vec::new()),
            DataType::Int => Column::Int(Vec::new()),
            DataType::Float => Column::Float(Vec::new()),
        }
    }

    /// Creates a column of `len` nulls.
    pub fn nulls(data_type: DataType, len: usize) -> Self {
        match data_type {
            DataType::Str => Column::Str(vec![None; len]),
            DataType::Int => Column::Int(vec![None; len]),
            DataType::Float => Column::Float(vec![None; len]),
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Column::Str(_) => DataType::Str,
            Column::Int(_) => DataType::Int,
            Column::Float(_) => DataType::Float,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Str(values) => values.len(),
            Column::Int(values) => values.len(),
            Column::Float(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_null(&self, row: usize) -> bool {
        match self {
            Column::Str(values) => values[row].is_none(),
            Column::Int(values) => values[row].is_none(),
            Column::Float(values) => values[row].is_none(),
        }
    }

    pub fn as_str(&self) -> Option<&[Option<String>]> {
        match self {
            Column::Str(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<&[Option<i64>]> {
        match self {
            Column::Int(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<&[Option<f64>]> {
        match self {
            Column::Float(values) => Some(values),
            _ => None,
        }
    }

    fn filter(&self, mask: &[bool]) -> Column {
        fn keep<T: Clone>(values: &[Option<T>], mask: &[bool]) -> Vec<Option<T>> {
            values
                .iter()
                .zip(mask)
                .filter(|(_, keep)| **keep)
                .map(|(value, _)| value.clone())
                .collect()
        }

        match self {
            Column::Str(values) => Column::Str(keep(values, mask)),
            Column::Int(values) => Column::Int(keep(values, mask)),
            Column::Float(values) => Column::Float(keep(values, mask)),
        }
    }

    fn take(&self, indices: &[usize]) -> Column {
        fn gather<T: Clone>(values: &[Option<T>], indices: &[usize]) -> Vec<Option<T>> {
            indices.iter().map(|&i| values[i].clone()).collect()
        }

        match self {
            Column::Str(values) => Column::Str(gather(values, indices)),
            Column::Int(values) => Column::Int(gather(values, indices)),
            Column::Float(values) => Column::Float(gather(values, indices)),
        }
    }

    fn append(&mut self, other: &Column) {
        debug_assert_eq!(self.data_type(), other.data_type());
        match (self, other) {
            (Column::Str(into), Column::Str(from)) => into.extend(from.iter().cloned()),
            (Column::Int(into), Column::Int(from)) => into.extend(from.iter().cloned()),
            (Column::Float(into), Column::Float(from)) => into.extend(from.iter().cloned()),
            _ => {}
        }
    }
}

/// An ordered collection of equally-sized named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<(String, Column)>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows. A table with no columns has zero rows.
    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, |(_, column)| column.len())
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// True when the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.height() == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, column)| column)
    }

    pub fn str_column(&self, name: &str) -> Option<&[Option<String>]> {
        self.column(name).and_then(Column::as_str)
    }

    pub fn int_column(&self, name: &str) -> Option<&[Option<i64>]> {
        self.column(name).and_then(Column::as_int)
    }

    pub fn float_column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.column(name).and_then(Column::as_float)
    }

    /// Appends a column, replacing any existing column with the same name
    /// in place. The column must match the table height.
    pub fn push_column(&mut self, name: impl Into<String>, column: Column) {
        let name = name.into();
        debug_assert!(
            self.columns.is_empty() || column.len() == self.height(),
            "column '{}' has {} rows, table has {}",
            name,
            column.len(),
            self.height()
        );
        if let Some(slot) = self.columns.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = column;
        } else {
            self.columns.push((name, column));
        }
    }

    /// Builder-style variant of [`Table::push_column`].
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Self {
        self.push_column(name, column);
        self
    }

    /// Removes a column if present.
    pub fn drop_column(&mut self, name: &str) {
        self.columns.retain(|(n, _)| n != name);
    }

    /// Keeps rows whose mask entry is true. The mask must match the height.
    pub fn filter(&self, mask: &[bool]) -> Table {
        debug_assert_eq!(mask.len(), self.height());
        let columns = self
            .columns
            .iter()
            .map(|(name, column)| (name.clone(), column.filter(mask)))
            .collect();
        Table { columns }
    }

    /// Gathers rows by index, in order. Indices may repeat.
    pub fn take(&self, indices: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|(name, column)| (name.clone(), column.take(indices)))
            .collect();
        Table { columns }
    }

    /// True when every value in the row is null.
    pub fn row_is_all_null(&self, row: usize) -> bool {
        self.columns.iter().all(|(_, column)| column.is_null(row))
    }

    /// Drops rows where every column is null.
    pub fn drop_all_null_rows(&self) -> Table {
        let mask: Vec<bool> = (0..self.height())
            .map(|row| !self.row_is_all_null(row))
            .collect();
        self.filter(&mask)
    }

    /// Vertically concatenates tables sharing one schema. The first table
    /// defines the column order; an empty input yields an empty table.
    pub fn concat<'a>(tables: impl IntoIterator<Item = &'a Table>) -> Table {
        let mut tables = tables.into_iter();
        let Some(first) = tables.next() else {
            return Table::new();
        };

        let mut result = first.clone();
        for table in tables {
            debug_assert_eq!(result.width(), table.width());
            for (name, column) in &mut result.columns {
                let other = table
                    .column(name)
                    .unwrap_or_else(|| panic!("concat of mismatched schemas: missing '{}'", name));
                column.append(other);
            }
        }
        result
    }
}

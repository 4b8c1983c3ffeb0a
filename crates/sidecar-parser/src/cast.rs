use std::fmt;

use serde::{Deserialize, Serialize};

/// A single cell after type inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value}"),
            Value::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
}

/// One column of the table, homogeneously typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "snake_case")]
pub enum Column {
    Integer(Vec<i64>),
    Float(Vec<f64>),
    Text(Vec<String>),
}

impl Column {
    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::Integer(_) => ColumnKind::Integer,
            Column::Float(_) => ColumnKind::Float,
            Column::Text(_) => ColumnKind::Text,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Integer(values) => values.len(),
            Column::Float(values) => values.len(),
            Column::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, row: usize) -> Option<Value> {
        match self {
            Column::Integer(values) => values.get(row).copied().map(Value::Integer),
            Column::Float(values) => values.get(row).copied().map(Value::Float),
            Column::Text(values) => values.get(row).cloned().map(Value::Text),
        }
    }

    /// Compare the cell at `row` against `expected` without cloning it.
    pub fn value_eq(&self, row: usize, expected: &Value) -> bool {
        match (self, expected) {
            (Column::Integer(values), Value::Integer(expected)) => {
                values.get(row) == Some(expected)
            }
            (Column::Float(values), Value::Float(expected)) => values.get(row) == Some(expected),
            (Column::Text(values), Value::Text(expected)) => {
                values.get(row).map(String::as_str) == Some(expected.as_str())
            }
            _ => false,
        }
    }

    /// Rewrite every text cell in place. Numeric columns are left alone and
    /// reported as unchanged.
    pub fn map_text<F>(&mut self, mut f: F) -> bool
    where
        F: FnMut(&str) -> String,
    {
        match self {
            Column::Text(values) => {
                for value in values.iter_mut() {
                    *value = f(value);
                }
                true
            }
            _ => false,
        }
    }
}

pub(crate) fn parse_integer(cell: &str) -> Option<i64> {
    cell.trim().parse::<i64>().ok()
}

/// Finite floats only; `NaN` and infinities stay text so the column survives
/// JSON persistence.
pub(crate) fn parse_float(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Cast a column of cells to the narrowest type that holds every value.
///
/// Integer wins over float; a single non-numeric cell keeps the whole column
/// as text.
pub fn best_cast<S: AsRef<str>>(cells: &[S]) -> Column {
    if let Some(values) = cells
        .iter()
        .map(|cell| parse_integer(cell.as_ref()))
        .collect::<Option<Vec<_>>>()
    {
        return Column::Integer(values);
    }

    if let Some(values) = cells
        .iter()
        .map(|cell| parse_float(cell.as_ref()))
        .collect::<Option<Vec<_>>>()
    {
        return Column::Float(values);
    }

    Column::Text(cells.iter().map(|cell| cell.as_ref().to_string()).collect())
}

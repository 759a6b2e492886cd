// src/table.rs

//! A minimal time-indexed column table used for every tabular output of a run.

use crate::errors::TableError;
use crate::types::Value;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

/// Rows are indexed by unix timestamp (or by row number for single-row
/// summaries). Columns keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    index: Vec<i64>,
    columns: Vec<Column>,
}

impl Frame {
    pub fn new(index: Vec<i64>) -> Self {
        Self {
            index,
            columns: Vec::new(),
        }
    }

    /// A one-row frame at index 0.
    pub fn single_row<I, K>(row: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let columns = row
            .into_iter()
            .map(|(name, value)| Column {
                name: name.into(),
                values: vec![value],
            })
            .collect();
        Self {
            index: vec![0],
            columns,
        }
    }

    /// Builds one column per key seen in any row; rows missing a key get
    /// [`Value::Null`].
    pub fn from_rows<'a, I>(index: Vec<i64>, rows: I) -> Self
    where
        I: IntoIterator<Item = &'a BTreeMap<String, Value>>,
    {
        let rows: Vec<&BTreeMap<String, Value>> = rows.into_iter().collect();
        let names: BTreeSet<&String> = rows.iter().flat_map(|r| r.keys()).collect();

        let columns = names
            .into_iter()
            .map(|name| Column {
                name: name.clone(),
                values: rows
                    .iter()
                    .map(|r| r.get(name).cloned().unwrap_or(Value::Null))
                    .collect(),
            })
            .collect();

        Self { index, columns }
    }

    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<Value>,
    ) -> Result<(), TableError> {
        let name = name.into();
        if values.len() != self.index.len() {
            return Err(TableError::ColumnLength {
                name,
                got: values.len(),
                expected: self.index.len(),
            });
        }
        if self.column(&name).is_some() {
            return Err(TableError::DuplicateColumn(name));
        }
        self.columns.push(Column { name, values });
        Ok(())
    }

    /// Moves `other`'s columns onto the right of this frame. Nothing is added
    /// unless the indexes match and every column name is new.
    pub fn append(&mut self, other: Frame) -> Result<(), TableError> {
        if other.index != self.index {
            return Err(TableError::IndexMismatch);
        }
        let mut seen: BTreeSet<&str> = self.column_names().collect();
        if let Some(dup) = other.columns.iter().find(|c| !seen.insert(c.name.as_str())) {
            return Err(TableError::DuplicateColumn(dup.name.clone()));
        }
        self.columns.extend(other.columns);
        Ok(())
    }

    /// Joins frames side by side. All frames must share the same index.
    pub fn concat(frames: &[Frame]) -> Result<Frame, TableError> {
        let Some(first) = frames.first() else {
            return Ok(Frame::default());
        };
        let mut out = Frame::new(first.index.clone());
        for frame in frames {
            out.append(frame.clone())?;
        }
        Ok(out)
    }

    pub fn index(&self) -> &[i64] {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Numeric view of a column; `None` if missing or any cell is non-numeric.
    pub fn column_f64(&self, name: &str) -> Option<Vec<f64>> {
        self.column(name)?.iter().map(Value::as_f64).collect()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

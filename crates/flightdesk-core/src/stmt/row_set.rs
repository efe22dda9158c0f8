use super::Record;
use crate::{Error, Result};

use std::fmt;

/// The materialized result of a read query: column names plus records in
/// the order the database returned them.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RowSet {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl RowSet {
    pub fn new(columns: Vec<String>, rows: Vec<Record>) -> RowSet {
        RowSet { columns, rows }
    }

    /// A result with the given columns and no rows.
    pub fn empty(columns: Vec<String>) -> RowSet {
        RowSet {
            columns,
            rows: vec![],
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&Record> {
        self.rows.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.rows.iter()
    }

    /// Returns the single integer of a one-row, one-column result.
    pub fn scalar_i64(&self) -> Result<i64> {
        match &self.rows[..] {
            [row] if row.len() == 1 => row
                .get_i64(0)?
                .ok_or_else(|| Error::invalid_result("expected an integer, got NULL")),
            rows => Err(Error::invalid_result(format!(
                "expected one row with one column, got {} rows",
                rows.len()
            ))),
        }
    }
}

impl IntoIterator for RowSet {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a RowSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Tab-separated rendering: a header line of column names, then one line
/// per record. NULL renders as an empty field.
impl fmt::Display for RowSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.columns.join("\t"))?;

        for row in &self.rows {
            let mut first = true;
            for value in row.iter() {
                if !first {
                    f.write_str("\t")?;
                }
                first = false;
                f.write_str(value.unwrap_or(""))?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

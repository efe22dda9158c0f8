use crate::{stmt::RowSet, Error, Result};

#[derive(Debug)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug)]
pub enum Rows {
    /// Number of rows impacted by the operation
    Count(u64),

    /// Materialized result of a read query
    RowSet(RowSet),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
        }
    }

    pub fn row_set(row_set: RowSet) -> Self {
        Self {
            rows: Rows::RowSet(row_set),
        }
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn is_row_set(&self) -> bool {
        matches!(self, Self::RowSet(_))
    }

    pub fn into_count(self) -> Result<u64> {
        match self {
            Rows::Count(count) => Ok(count),
            Rows::RowSet(row_set) => Err(Error::invalid_result(format!(
                "expected a row count, got {} rows",
                row_set.len()
            ))),
        }
    }

    pub fn into_row_set(self) -> Result<RowSet> {
        match self {
            Rows::RowSet(row_set) => Ok(row_set),
            Rows::Count(count) => Err(Error::invalid_result(format!(
                "expected rows, got a count of {count}"
            ))),
        }
    }
}

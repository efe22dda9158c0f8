use crate::{Error, Result};

/// One materialized row: an ordered sequence of nullable text values.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Record {
    values: Vec<Option<String>>,
}

impl Record {
    pub fn from_vec(values: Vec<Option<String>>) -> Record {
        Record { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the value at `index`. `None` for both SQL NULL and an
    /// out-of-range index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(|value| value.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&str>> {
        self.values.iter().map(|value| value.as_deref())
    }

    /// Parses the value at `index` as an integer.
    pub fn get_i64(&self, index: usize) -> Result<Option<i64>> {
        let Some(value) = self.values.get(index) else {
            return Err(Error::invalid_result(format!(
                "column {index} out of range for a record with {} values",
                self.values.len()
            )));
        };

        match value {
            None => Ok(None),
            Some(text) => text.trim().parse().map(Some).map_err(|_| {
                Error::invalid_result(format!("expected an integer, got `{text}`"))
            }),
        }
    }

    pub fn into_values(self) -> Vec<Option<String>> {
        self.values
    }
}

impl From<Vec<Option<String>>> for Record {
    fn from(values: Vec<Option<String>>) -> Record {
        Record::from_vec(values)
    }
}

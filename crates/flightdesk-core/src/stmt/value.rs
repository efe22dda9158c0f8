use crate::{Error, Result};

/// A value bound to a statement parameter.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum Value {
    /// Null value
    #[default]
    Null,

    /// Signed 64-bit integer
    I64(i64),

    /// String value
    String(String),

    /// Calendar date in `YYYY-MM-DD` form
    Date(String),
}

impl Value {
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Builds a date value from an ISO 8601 calendar date. The stored text
    /// is always `YYYY-MM-DD`.
    pub fn date(src: &str) -> Result<Self> {
        let src = src.trim();
        let date: jiff::civil::Date = src
            .parse()
            .map_err(|_| Error::invalid_input("date", src))?;

        Ok(Self::Date(date.to_string()))
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Self {
        Self::I64(src)
    }
}

impl From<i32> for Value {
    fn from(src: i32) -> Self {
        Self::I64(src.into())
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<&String> for Value {
    fn from(src: &String) -> Self {
        Self::String(src.clone())
    }
}

impl<T> From<Option<T>> for Value
where
    Value: From<T>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Value::from(value),
            None => Value::Null,
        }
    }
}

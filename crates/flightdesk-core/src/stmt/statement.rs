use super::Value;

/// A SQL statement assembled from static text and bound parameters.
///
/// SQL text only enters a statement as `&'static str`, so values supplied at
/// runtime can only travel as parameters. The serializer in `flightdesk-sql`
/// turns the fragments into dialect-specific SQL with placeholders.
///
/// ```
/// # use flightdesk_core::stmt::{Statement, Value};
/// let stmt = Statement::new("SELECT fnum FROM flight WHERE fnum = ")
///     .param(7)
///     .sql(" AND num_sold < ")
///     .param(10);
///
/// assert_eq!(stmt.params().collect::<Vec<_>>(), [&Value::I64(7), &Value::I64(10)]);
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Statement {
    fragments: Vec<Fragment>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Literal SQL text
    Sql(&'static str),

    /// A bound parameter
    Param(Value),

    /// The calendar year of a date column, as an integer. Rendered per
    /// dialect.
    YearOf(&'static str),
}

impl Statement {
    pub fn new(sql: &'static str) -> Statement {
        Statement {
            fragments: vec![Fragment::Sql(sql)],
        }
    }

    pub fn sql(mut self, sql: &'static str) -> Statement {
        self.fragments.push(Fragment::Sql(sql));
        self
    }

    pub fn param(mut self, value: impl Into<Value>) -> Statement {
        self.fragments.push(Fragment::Param(value.into()));
        self
    }

    pub fn year_of(mut self, column: &'static str) -> Statement {
        self.fragments.push(Fragment::YearOf(column));
        self
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Bound parameters in the order they appear.
    pub fn params(&self) -> impl Iterator<Item = &Value> {
        self.fragments.iter().filter_map(|fragment| match fragment {
            Fragment::Param(value) => Some(value),
            _ => None,
        })
    }
}

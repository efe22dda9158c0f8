use super::Operation;

use crate::stmt;

#[derive(Debug, Clone)]
pub struct ExecSql {
    /// The SQL statement to execute. Any rows it returns are discarded.
    pub stmt: stmt::Statement,
}

impl From<ExecSql> for Operation {
    fn from(value: ExecSql) -> Self {
        Self::ExecSql(value)
    }
}

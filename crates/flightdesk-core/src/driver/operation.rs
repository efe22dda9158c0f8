mod exec_sql;
pub use exec_sql::ExecSql;

mod query_sql;
pub use query_sql::QuerySql;

mod transaction;
pub use transaction::Transaction;

#[derive(Debug, Clone)]
pub enum Operation {
    /// Execute a SQL query and materialize its rows
    QuerySql(QuerySql),

    /// Execute a data-mutating SQL statement and report rows affected
    ExecSql(ExecSql),

    /// Execute a transaction lifecycle op
    Transaction(Transaction),
}

impl Operation {
    /// Short label used when logging.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::QuerySql(_) => "query_sql",
            Operation::ExecSql(_) => "exec_sql",
            Operation::Transaction(Transaction::Start { .. }) => "transaction_start",
            Operation::Transaction(Transaction::Commit) => "transaction_commit",
            Operation::Transaction(Transaction::Rollback) => "transaction_rollback",
        }
    }
}

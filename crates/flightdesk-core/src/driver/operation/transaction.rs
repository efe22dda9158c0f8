use super::Operation;
use crate::driver::IsolationLevel;

#[derive(Debug, Clone)]
pub enum Transaction {
    /// Start a transaction
    Start { isolation: Option<IsolationLevel> },

    /// Commit a transaction
    Commit,

    /// Rollback a transaction
    Rollback,
}

impl From<Transaction> for Operation {
    fn from(value: Transaction) -> Operation {
        Operation::Transaction(value)
    }
}

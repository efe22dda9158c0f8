use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsolationLevel {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl IsolationLevel {
    /// Returns the ANSI SQL name, usable in PostgreSQL.
    pub fn sql_name(&self) -> &'static str {
        match self {
            IsolationLevel::ReadUncommitted => "READ UNCOMMITTED",
            IsolationLevel::ReadCommitted => "READ COMMITTED",
            IsolationLevel::RepeatableRead => "REPEATABLE READ",
            IsolationLevel::Serializable => "SERIALIZABLE",
        }
    }
}

/// Tracks whether a transaction is open on a connection and produces the
/// SQL for `BEGIN`, `COMMIT`, and `ROLLBACK`.
///
/// Each SQL driver embeds one of these. Transactions do not nest: starting
/// a second one before the first finishes is an error, as is committing or
/// rolling back when none is open.
#[derive(Debug)]
pub struct TransactionManager {
    active: bool,
    flavor: super::SqlFlavor,
}

impl TransactionManager {
    /// SQLite transactions begin with `BEGIN IMMEDIATE`, taking the write
    /// lock up front.
    pub fn sqlite() -> Self {
        Self {
            active: false,
            flavor: super::SqlFlavor::Sqlite,
        }
    }

    pub fn postgresql() -> Self {
        Self {
            active: false,
            flavor: super::SqlFlavor::Postgresql,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the SQL to begin a transaction.
    pub fn start(&mut self, isolation: Option<IsolationLevel>) -> Result<String> {
        if self.active {
            return Err(Error::invalid_result(
                "a transaction is already open on this connection",
            ));
        }
        self.active = true;

        Ok(match (self.flavor, isolation) {
            (super::SqlFlavor::Sqlite, _) => "BEGIN IMMEDIATE".to_string(),
            (super::SqlFlavor::Postgresql, Some(level)) => {
                format!("BEGIN ISOLATION LEVEL {}", level.sql_name())
            }
            (super::SqlFlavor::Postgresql, None) => "BEGIN".to_string(),
        })
    }

    /// Returns the SQL to commit the open transaction.
    pub fn commit(&mut self) -> Result<&'static str> {
        self.finish()?;
        Ok("COMMIT")
    }

    /// Returns the SQL to roll back the open transaction.
    pub fn rollback(&mut self) -> Result<&'static str> {
        self.finish()?;
        Ok("ROLLBACK")
    }

    fn finish(&mut self) -> Result<()> {
        if !self.active {
            return Err(Error::invalid_result("no transaction is open"));
        }
        self.active = false;
        Ok(())
    }
}

mod builder;
pub use builder::Builder;

mod connect;
pub use connect::driver_for_url;

mod transaction;
pub use transaction::Transaction;

use crate::Result;

use flightdesk_core::{
    async_trait,
    driver::{
        operation::{ExecSql, QuerySql, Transaction as TransactionOp},
        Capability, Connection, Driver, Operation,
    },
    stmt::{RowSet, Statement},
    Error,
};
use tokio::sync::Mutex;

use std::{sync::Arc, time::Duration};

/// Shared state between all `Db` clones.
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) driver: Box<dyn Driver>,

    pub(crate) connection: Mutex<Slot>,

    pub(crate) transaction_timeout: Duration,
}

/// The single connection, plus any cleanup owed before its next use.
#[derive(Debug)]
pub(crate) struct Slot {
    /// `None` once the handle has been closed.
    connection: Option<Box<dyn Connection>>,

    /// Set when a [`Transaction`] is dropped before it commits or rolls
    /// back. The rollback runs before the next operation on the slot.
    rollback_pending: bool,
}

impl Slot {
    pub(crate) fn new(connection: Box<dyn Connection>) -> Slot {
        Slot {
            connection: Some(connection),
            rollback_pending: false,
        }
    }

    pub(crate) fn abandon_transaction(&mut self) {
        self.rollback_pending = true;
    }

    /// Returns the open connection, first rolling back any abandoned
    /// transaction.
    pub(crate) async fn ready(&mut self) -> Result<&mut Box<dyn Connection>> {
        let connection = self.connection.as_mut().ok_or_else(|| {
            Error::connectivity(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "the database handle has been closed",
            ))
        })?;

        if std::mem::take(&mut self.rollback_pending) {
            log::debug!("rolling back abandoned transaction");
            if let Err(err) = connection.exec(TransactionOp::Rollback.into()).await {
                log::warn!("failed to roll back abandoned transaction: {err}");
            }
        }

        Ok(connection)
    }

    pub(crate) async fn exec(
        &mut self,
        op: Operation,
    ) -> Result<flightdesk_core::driver::Response> {
        log::trace!("exec {}", op.name());
        self.ready().await?.exec(op).await
    }
}

/// A handle to the airline database.
///
/// Every clone shares one connection. Statements run one at a time; a
/// [`Transaction`] holds the connection from `BEGIN` until it commits or
/// rolls back. The connection closes when the last clone is dropped, or
/// earlier with [`Db::close`].
#[derive(Debug, Clone)]
pub struct Db {
    shared: Arc<Shared>,
}

/// Runs statements, either directly on a [`Db`] or inside an open
/// [`Transaction`].
#[async_trait]
pub trait Executor: Send {
    /// Runs a read query and materializes every row.
    async fn query(&mut self, stmt: Statement) -> Result<RowSet>;

    /// Runs a data-mutating statement and returns the number of rows
    /// affected.
    async fn execute(&mut self, stmt: Statement) -> Result<u64>;
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Connects with default settings.
    pub async fn connect(url: &str) -> Result<Db> {
        Builder::default().connect(url).await
    }

    pub fn url(&self) -> std::borrow::Cow<'_, str> {
        self.shared.driver.url()
    }

    pub fn capability(&self) -> &'static Capability {
        self.shared.driver.capability()
    }

    /// The timeout applied by [`Db::transaction`].
    pub fn transaction_timeout(&self) -> Duration {
        self.shared.transaction_timeout
    }

    /// Runs a read query and returns its rows in the order the database
    /// produced them.
    pub async fn query(&self, stmt: Statement) -> Result<RowSet> {
        let mut slot = self.shared.connection.lock().await;
        slot.exec(QuerySql { stmt }.into())
            .await?
            .rows
            .into_row_set()
    }

    /// Runs a single data-mutating statement outside of any transaction.
    pub async fn execute(&self, stmt: Statement) -> Result<u64> {
        let mut slot = self.shared.connection.lock().await;
        slot.exec(ExecSql { stmt }.into())
            .await?
            .rows
            .into_count()
    }

    /// Creates any missing airline tables.
    pub async fn push_schema(&self) -> Result<()> {
        let mut slot = self.shared.connection.lock().await;
        slot.ready().await?.push_schema().await
    }

    /// Drops and recreates every airline table. Intended for tests.
    pub async fn reset_db(&self) -> Result<()> {
        let mut slot = self.shared.connection.lock().await;
        slot.ready().await?.reset_db().await
    }

    /// Closes the connection. Every later call on this handle or its clones
    /// fails with a connectivity error.
    pub async fn close(&self) {
        let mut slot = self.shared.connection.lock().await;
        slot.rollback_pending = false;
        if slot.connection.take().is_some() {
            log::debug!("closed connection to {}", self.url());
        }
    }

    pub async fn is_closed(&self) -> bool {
        self.shared.connection.lock().await.connection.is_none()
    }
}

#[async_trait]
impl Executor for Db {
    async fn query(&mut self, stmt: Statement) -> Result<RowSet> {
        Db::query(self, stmt).await
    }

    async fn execute(&mut self, stmt: Statement) -> Result<u64> {
        Db::execute(self, stmt).await
    }
}

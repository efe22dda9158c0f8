use super::{Db, Executor, Slot};
use crate::Result;

use flightdesk_core::{
    async_trait,
    driver::{
        operation::{ExecSql, QuerySql, Transaction as TransactionOp},
        IsolationLevel,
    },
    stmt::{RowSet, Statement},
    Error,
};
use tokio::{sync::MutexGuard, time::timeout};

use std::time::Duration;

/// An open transaction. Holds the connection until it is committed or
/// rolled back.
///
/// Dropping a transaction without finishing it, including cancelling the
/// future that owns it, rolls it back before the connection is used again.
#[derive(Debug)]
pub struct Transaction<'a> {
    slot: MutexGuard<'a, Slot>,
    finished: bool,
}

impl Transaction<'_> {
    async fn finish(&mut self, op: TransactionOp) -> Result<()> {
        let res = self.slot.exec(op.into()).await;
        self.finished = true;
        res?;
        Ok(())
    }

    pub async fn commit(mut self) -> Result<()> {
        self.finish(TransactionOp::Commit).await?;
        log::debug!("transaction committed");
        Ok(())
    }

    pub async fn rollback(mut self) -> Result<()> {
        self.finish(TransactionOp::Rollback).await?;
        log::debug!("transaction rolled back");
        Ok(())
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            log::debug!("transaction dropped while open");
            self.slot.abandon_transaction();
        }
    }
}

#[async_trait]
impl Executor for Transaction<'_> {
    async fn query(&mut self, stmt: Statement) -> Result<RowSet> {
        self.slot
            .exec(QuerySql { stmt }.into())
            .await?
            .rows
            .into_row_set()
    }

    async fn execute(&mut self, stmt: Statement) -> Result<u64> {
        self.slot
            .exec(ExecSql { stmt }.into())
            .await?
            .rows
            .into_count()
    }
}

impl Db {
    /// Starts a transaction at `READ COMMITTED`, waiting for any statement
    /// or transaction already running on the connection.
    pub async fn begin(&self) -> Result<Transaction<'_>> {
        let mut tx = Transaction {
            slot: self.shared.connection.lock().await,
            finished: false,
        };

        let start = TransactionOp::Start {
            isolation: Some(IsolationLevel::ReadCommitted),
        };

        if let Err(err) = tx.slot.exec(start.into()).await {
            // Nothing was opened.
            tx.finished = true;
            return Err(err);
        }

        log::debug!("transaction started");
        Ok(tx)
    }

    /// Runs `f` inside a transaction bounded by the handle's transaction
    /// timeout.
    pub async fn transaction<O>(
        &self,
        f: impl AsyncFnOnce(&mut Transaction<'_>) -> Result<O>,
    ) -> Result<O> {
        self.transaction_with_timeout(self.shared.transaction_timeout, f)
            .await
    }

    /// Runs `f` inside a transaction. The transaction commits if `f` returns
    /// `Ok` and rolls back if it returns `Err` or does not finish within
    /// `duration`.
    pub async fn transaction_with_timeout<O>(
        &self,
        duration: Duration,
        f: impl AsyncFnOnce(&mut Transaction<'_>) -> Result<O>,
    ) -> Result<O> {
        let mut tx = self.begin().await?;

        let res = timeout(duration, f(&mut tx)).await;

        let Ok(res) = res else {
            log::warn!("transaction timed out after {duration:?}; rolling back");
            if let Err(rollback) = tx.rollback().await {
                log::warn!("rollback after timeout failed: {rollback}");
            }
            return Err(Error::transaction_timed_out(duration));
        };

        match res {
            Ok(res) => {
                tx.commit().await?;
                Ok(res)
            }
            Err(err) => {
                log::warn!("rolling back transaction: {err}");
                if let Err(rollback) = tx.rollback().await {
                    log::warn!("rollback failed: {rollback}");
                }
                Err(err)
            }
        }
    }
}

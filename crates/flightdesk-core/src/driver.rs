mod capability;
pub use capability::{Capability, SqlFlavor};

mod response;
pub use response::{Response, Rows};

pub mod operation;
pub use operation::Operation;

mod transaction;
pub use transaction::{IsolationLevel, TransactionManager};

use crate::async_trait;

use std::{borrow::Cow, fmt::Debug};

#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Returns the URL this driver is connecting to.
    fn url(&self) -> Cow<'_, str>;

    /// Describes the driver's capability, which informs SQL serialization.
    fn capability(&self) -> &'static Capability;

    /// Creates a new connection to the database.
    ///
    /// A `Db` handle calls this exactly once and keeps the connection for
    /// its whole lifetime.
    async fn connect(&self) -> crate::Result<Box<dyn Connection>>;
}

#[async_trait]
pub trait Connection: Debug + Send + 'static {
    /// Execute a database operation
    async fn exec(&mut self, op: Operation) -> crate::Result<Response>;

    /// Creates every airline table that does not exist yet.
    async fn push_schema(&mut self) -> crate::Result<()>;

    /// Drops and recreates every airline table.
    async fn reset_db(&mut self) -> crate::Result<()>;
}

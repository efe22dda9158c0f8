mod value;
pub(crate) use value::Value;

use flightdesk_core::{
    async_trait,
    driver::{
        operation::{Operation, Transaction},
        Capability, Driver, Response, TransactionManager,
    },
    stmt::{Record, RowSet, Statement},
    Error, Result,
};
use flightdesk_sql::{schema, Serializer};
use rusqlite::Connection as RusqliteConnection;
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
    time::Duration,
};
use url::Url;

/// How long a statement waits on another connection's lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub enum Sqlite {
    File(PathBuf),
    InMemory,
}

impl Sqlite {
    /// Create a new SQLite driver with an arbitrary connection URL
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(|err| {
            Error::invalid_connection_url(format!("{err}; url={url_str}"))
        })?;

        if url.scheme() != "sqlite" {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `sqlite` scheme; url={}",
                url_str
            )));
        }

        if url.path() == ":memory:" {
            Ok(Self::InMemory)
        } else if url.path().is_empty() {
            Err(Error::invalid_connection_url(format!(
                "connection URL has no database path; url={url_str}"
            )))
        } else {
            Ok(Self::File(PathBuf::from(url.path())))
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }
}

#[async_trait]
impl Driver for Sqlite {
    fn url(&self) -> Cow<'_, str> {
        match self {
            Sqlite::InMemory => Cow::Borrowed("sqlite::memory:"),
            Sqlite::File(path) => Cow::Owned(format!("sqlite:{}", path.display())),
        }
    }

    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }

    async fn connect(&self) -> Result<Box<dyn flightdesk_core::Connection>> {
        let connection = match self {
            Sqlite::File(path) => Connection::open(path)?,
            Sqlite::InMemory => Connection::in_memory()?,
        };
        Ok(Box::new(connection))
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: RusqliteConnection,
    transaction_manager: TransactionManager,
}

impl Connection {
    pub fn in_memory() -> Result<Self> {
        let connection = RusqliteConnection::open_in_memory().map_err(Error::connectivity)?;
        Self::configure(connection)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = RusqliteConnection::open(path).map_err(Error::connectivity)?;
        Self::configure(connection)
    }

    fn configure(connection: RusqliteConnection) -> Result<Self> {
        connection
            .busy_timeout(BUSY_TIMEOUT)
            .map_err(Error::connectivity)?;

        Ok(Self {
            connection,
            transaction_manager: TransactionManager::sqlite(),
        })
    }

    fn query(&mut self, stmt: &Statement) -> Result<RowSet> {
        let mut params = Vec::new();
        let sql = Serializer::sqlite().serialize(stmt, &mut params);
        log::debug!("query: {sql}");

        let params: Vec<Value> = params.into_iter().map(Value::from).collect();

        // The prepared statement and its cursor live only for this call.
        let mut stmt = self
            .connection
            .prepare_cached(&sql)
            .map_err(Error::query_failed)?;

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let mut rows = stmt
            .query(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::query_failed)?;

        let mut ret = vec![];

        while let Some(row) = rows.next().map_err(Error::query_failed)? {
            let mut items = Vec::with_capacity(width);

            for index in 0..width {
                items.push(Value::text_from_row(row, index).map_err(Error::query_failed)?);
            }

            ret.push(Record::from_vec(items));
        }

        Ok(RowSet::new(columns, ret))
    }

    fn execute(&mut self, stmt: &Statement) -> Result<u64> {
        let mut params = Vec::new();
        let sql = Serializer::sqlite().serialize(stmt, &mut params);
        log::debug!("execute: {sql}");

        let params: Vec<Value> = params.into_iter().map(Value::from).collect();

        let mut stmt = self
            .connection
            .prepare_cached(&sql)
            .map_err(Error::mutation_failed)?;

        let count = stmt
            .execute(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::mutation_failed)?;

        Ok(count as u64)
    }

    fn execute_batch(&mut self, sql: &str) -> Result<()> {
        log::debug!("execute: {sql}");
        self.connection
            .execute_batch(sql)
            .map_err(Error::mutation_failed)
    }

    fn create_tables(&mut self) -> Result<()> {
        let serializer = Serializer::sqlite();

        for table in schema::TABLES {
            self.execute_batch(&serializer.create_table(table))?;
        }

        self.execute_batch(schema::SEED_RESERVATION_COUNTER)
    }
}

#[async_trait]
impl flightdesk_core::driver::Connection for Connection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        match op {
            Operation::QuerySql(op) => Ok(Response::row_set(self.query(&op.stmt)?)),
            Operation::ExecSql(op) => Ok(Response::count(self.execute(&op.stmt)?)),
            Operation::Transaction(Transaction::Start { isolation }) => {
                let sql = self.transaction_manager.start(isolation)?;
                if let Err(err) = self.execute_batch(&sql) {
                    // Nothing was opened; let the next start try again.
                    let _ = self.transaction_manager.rollback();
                    return Err(err);
                }
                Ok(Response::count(0))
            }
            Operation::Transaction(Transaction::Commit) => {
                let sql = self.transaction_manager.commit()?;
                if let Err(err) = self.execute_batch(sql) {
                    // SQLite keeps the transaction open when COMMIT fails.
                    if let Err(rollback) = self.execute_batch("ROLLBACK") {
                        log::warn!("rollback after failed commit failed: {rollback}");
                    }
                    return Err(err);
                }
                Ok(Response::count(0))
            }
            Operation::Transaction(Transaction::Rollback) => {
                let sql = self.transaction_manager.rollback()?;
                self.execute_batch(sql)?;
                Ok(Response::count(0))
            }
        }
    }

    async fn push_schema(&mut self) -> Result<()> {
        self.create_tables()
    }

    async fn reset_db(&mut self) -> Result<()> {
        let serializer = Serializer::sqlite();

        for table in schema::TABLES.iter().rev() {
            self.execute_batch(&serializer.drop_table(table))?;
        }

        self.create_tables()
    }
}

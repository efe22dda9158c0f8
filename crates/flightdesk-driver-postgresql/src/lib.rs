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
use postgres::{
    tls::MakeTlsConnect,
    types::{ToSql, Type},
    Socket,
};
use std::{borrow::Cow, collections::HashMap};
use tokio_postgres::{Client, Config};
use url::Url;

#[derive(Debug)]
pub struct PostgreSQL {
    url: String,
    config: Config,
    /// Schema to create and select with `search_path` on connect.
    schema: Option<String>,
}

impl PostgreSQL {
    /// Create a new PostgreSQL driver from a connection URL.
    ///
    /// The optional `schema` query parameter names a schema that is created
    /// if missing and used for every statement on the connection.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(|err| {
            Error::invalid_connection_url(format!("{err}; url={url_str}"))
        })?;

        if !matches!(url.scheme(), "postgresql" | "postgres") {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `postgresql` scheme; url={url_str}"
            )));
        }

        let host = url.host_str().ok_or_else(|| {
            Error::invalid_connection_url(format!("missing host in connection URL; url={url_str}"))
        })?;

        let dbname = url.path().trim_start_matches('/');
        if dbname.is_empty() {
            return Err(Error::invalid_connection_url(format!(
                "no database specified - missing path in connection URL; url={url_str}"
            )));
        }

        let mut config = Config::new();
        config.host(host);
        config.dbname(dbname);

        if let Some(port) = url.port() {
            config.port(port);
        }

        if !url.username().is_empty() {
            config.user(url.username());
        }

        if let Some(password) = url.password() {
            config.password(password);
        }

        let mut schema = None;
        for (key, value) in url.query_pairs() {
            match &*key {
                "schema" => {
                    if value.is_empty()
                        || !value
                            .chars()
                            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
                    {
                        return Err(Error::invalid_connection_url(format!(
                            "schema must be a lowercase identifier; url={url_str}"
                        )));
                    }
                    schema = Some(value.into_owned());
                }
                _ => {
                    return Err(Error::invalid_connection_url(format!(
                        "unsupported connection parameter `{key}`; url={url_str}"
                    )))
                }
            }
        }

        Ok(Self {
            url: url_str,
            config,
            schema,
        })
    }
}

#[async_trait]
impl Driver for PostgreSQL {
    fn url(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.url)
    }

    fn capability(&self) -> &'static Capability {
        &Capability::POSTGRESQL
    }

    async fn connect(&self) -> Result<Box<dyn flightdesk_core::Connection>> {
        let connection =
            Connection::connect_with_config(self.config.clone(), tokio_postgres::NoTls).await?;

        if let Some(schema) = &self.schema {
            // The name was restricted to `[a-z0-9_]` when the URL was parsed.
            connection
                .client
                .batch_execute(&format!(
                    "CREATE SCHEMA IF NOT EXISTS {schema}; SET search_path TO {schema}"
                ))
                .await
                .map_err(Error::connectivity)?;
        }

        Ok(Box::new(connection))
    }
}

#[derive(Debug)]
pub struct Connection {
    client: Client,
    /// Prepared statements by SQL text and parameter types. Cleared when the
    /// tables are recreated.
    prepared: HashMap<(String, Vec<Type>), tokio_postgres::Statement>,
    transaction_manager: TransactionManager,
}

impl Connection {
    /// Initialize a connection using an initialized client.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            prepared: HashMap::new(),
            transaction_manager: TransactionManager::postgresql(),
        }
    }

    /// Connects to a PostgreSQL database using a [`Config`].
    ///
    /// The connection task is spawned onto the current Tokio runtime and
    /// logs any error it ends with.
    pub async fn connect_with_config<T>(config: Config, tls: T) -> Result<Self>
    where
        T: MakeTlsConnect<Socket> + 'static,
        T::Stream: Send,
    {
        let (client, connection) = config.connect(tls).await.map_err(Error::connectivity)?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                log::error!("postgresql connection error: {e}");
            }
        });

        Ok(Self::new(client))
    }

    async fn prepare(
        &mut self,
        sql: String,
        types: Vec<Type>,
    ) -> std::result::Result<tokio_postgres::Statement, tokio_postgres::Error> {
        let key = (sql, types);

        if let Some(statement) = self.prepared.get(&key) {
            return Ok(statement.clone());
        }

        let statement = self.client.prepare_typed(&key.0, &key.1).await?;
        self.prepared.insert(key, statement.clone());
        Ok(statement)
    }

    async fn query(&mut self, stmt: &Statement) -> Result<RowSet> {
        let (sql, params, types) = serialize(stmt);
        log::debug!("query: {sql}");

        let statement = self
            .prepare(sql, types)
            .await
            .map_err(|err| classify(err, Error::query_failed))?;

        let columns: Vec<String> = statement
            .columns()
            .iter()
            .map(|column| column.name().to_string())
            .collect();

        let args = params
            .iter()
            .map(|param| param as &(dyn ToSql + Sync))
            .collect::<Vec<_>>();

        let rows = self
            .client
            .query(&statement, &args)
            .await
            .map_err(|err| classify(err, Error::query_failed))?;

        let mut ret = Vec::with_capacity(rows.len());

        for row in &rows {
            let mut items = Vec::with_capacity(columns.len());
            for (index, column) in row.columns().iter().enumerate() {
                items.push(value::text_from_row(row, index, column)?);
            }
            ret.push(Record::from_vec(items));
        }

        Ok(RowSet::new(columns, ret))
    }

    async fn execute(&mut self, stmt: &Statement) -> Result<u64> {
        let (sql, params, types) = serialize(stmt);
        log::debug!("execute: {sql}");

        let statement = self
            .prepare(sql, types)
            .await
            .map_err(|err| classify(err, Error::mutation_failed))?;

        let args = params
            .iter()
            .map(|param| param as &(dyn ToSql + Sync))
            .collect::<Vec<_>>();

        self.client
            .execute(&statement, &args)
            .await
            .map_err(|err| classify(err, Error::mutation_failed))
    }

    async fn batch_execute(&mut self, sql: &str) -> Result<()> {
        log::debug!("execute: {sql}");
        self.client
            .batch_execute(sql)
            .await
            .map_err(|err| classify(err, Error::mutation_failed))
    }

    async fn create_tables(&mut self) -> Result<()> {
        let serializer = Serializer::postgresql();

        for table in schema::TABLES {
            self.batch_execute(&serializer.create_table(table)).await?;
        }

        self.batch_execute(schema::SEED_RESERVATION_COUNTER).await
    }
}

#[async_trait]
impl flightdesk_core::driver::Connection for Connection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        match op {
            Operation::QuerySql(op) => Ok(Response::row_set(self.query(&op.stmt).await?)),
            Operation::ExecSql(op) => Ok(Response::count(self.execute(&op.stmt).await?)),
            Operation::Transaction(Transaction::Start { isolation }) => {
                let sql = self.transaction_manager.start(isolation)?;
                if let Err(err) = self.batch_execute(&sql).await {
                    let _ = self.transaction_manager.rollback();
                    return Err(err);
                }
                Ok(Response::count(0))
            }
            Operation::Transaction(Transaction::Commit) => {
                let sql = self.transaction_manager.commit()?;
                if let Err(err) = self.batch_execute(sql).await {
                    if let Err(rollback) = self.batch_execute("ROLLBACK").await {
                        log::warn!("rollback after failed commit failed: {rollback}");
                    }
                    return Err(err);
                }
                Ok(Response::count(0))
            }
            Operation::Transaction(Transaction::Rollback) => {
                let sql = self.transaction_manager.rollback()?;
                self.batch_execute(sql).await?;
                Ok(Response::count(0))
            }
        }
    }

    async fn push_schema(&mut self) -> Result<()> {
        self.create_tables().await
    }

    async fn reset_db(&mut self) -> Result<()> {
        let serializer = Serializer::postgresql();

        for table in schema::TABLES.iter().rev() {
            self.batch_execute(&serializer.drop_table(table)).await?;
        }

        self.prepared.clear();
        self.create_tables().await
    }
}

/// Renders `stmt` and returns the SQL, the values to bind, and the types
/// to prepare them with.
fn serialize(stmt: &Statement) -> (String, Vec<Value>, Vec<Type>) {
    let mut params = Vec::new();
    let sql = Serializer::postgresql().serialize(stmt, &mut params);

    let types = params.iter().map(value::postgres_ty_for_value).collect();
    let params = params.into_iter().map(Value::from).collect();

    (sql, params, types)
}

/// A closed connection is a connectivity failure whatever the statement.
fn classify(err: tokio_postgres::Error, otherwise: fn(tokio_postgres::Error) -> Error) -> Error {
    if err.is_closed() {
        Error::connectivity(err)
    } else {
        otherwise(err)
    }
}

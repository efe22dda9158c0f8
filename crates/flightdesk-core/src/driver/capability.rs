#[derive(Debug)]
pub struct Capability {
    /// Placeholder style and other dialect details used by the serializer.
    pub flavor: SqlFlavor,

    /// Supports `UPDATE ... RETURNING`.
    pub returning: bool,

    /// Supports row-level locking. If false, the driver is expected to take
    /// a database-wide write lock when a transaction begins.
    pub select_for_update: bool,

    /// Supports a typed `DATE` column; otherwise dates are stored as
    /// ISO-8601 text.
    pub native_date: bool,
}

/// SQL dialect spoken by a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlFlavor {
    Sqlite,
    Postgresql,
}

impl Capability {
    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        flavor: SqlFlavor::Sqlite,
        returning: true,
        select_for_update: false,
        native_date: false,
    };

    /// PostgreSQL capabilities
    pub const POSTGRESQL: Self = Self {
        flavor: SqlFlavor::Postgresql,
        select_for_update: true,
        native_date: true,
        ..Self::SQLITE
    };
}

//! Table definitions for the airline database.
//!
//! These are created with `CREATE TABLE IF NOT EXISTS` when a database is
//! bootstrapped. There is no migration support: changing a definition
//! requires resetting the database.

/// Column storage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Integer,
    Text,
    /// Fixed-width character column.
    Char(u32),
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub ty: Type,
    pub nullable: bool,
    pub primary_key: bool,
    pub unique: bool,
    pub default: Option<&'static str>,
    /// `(table, column)` this column references.
    pub references: Option<(&'static str, &'static str)>,
    /// Boolean SQL expression for a column `CHECK` constraint.
    pub check: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column],
}

impl Column {
    pub const fn new(name: &'static str, ty: Type) -> Column {
        Column {
            name,
            ty,
            nullable: false,
            primary_key: false,
            unique: false,
            default: None,
            references: None,
            check: None,
        }
    }

    pub const fn primary_key(self) -> Column {
        Column {
            primary_key: true,
            ..self
        }
    }

    pub const fn unique(self) -> Column {
        Column {
            unique: true,
            ..self
        }
    }

    pub const fn default(self, expr: &'static str) -> Column {
        Column {
            default: Some(expr),
            ..self
        }
    }

    pub const fn references(self, table: &'static str, column: &'static str) -> Column {
        Column {
            references: Some((table, column)),
            ..self
        }
    }

    pub const fn check(self, expr: &'static str) -> Column {
        Column {
            check: Some(expr),
            ..self
        }
    }
}

pub const PLANE: Table = Table {
    name: "plane",
    columns: &[
        Column::new("id", Type::Integer).primary_key(),
        Column::new("make", Type::Text),
        Column::new("model", Type::Text),
        Column::new("age", Type::Integer).check("age >= 0"),
        Column::new("seats", Type::Integer).check("seats > 0"),
    ],
};

pub const PILOT: Table = Table {
    name: "pilot",
    columns: &[
        Column::new("id", Type::Integer).primary_key(),
        Column::new("fullname", Type::Text),
        Column::new("nationality", Type::Text),
    ],
};

pub const TECHNICIAN: Table = Table {
    name: "technician",
    columns: &[
        Column::new("id", Type::Integer).primary_key(),
        Column::new("full_name", Type::Text),
    ],
};

pub const CUSTOMER: Table = Table {
    name: "customer",
    columns: &[
        Column::new("id", Type::Integer).primary_key(),
        Column::new("fname", Type::Text),
        Column::new("lname", Type::Text),
    ],
};

pub const FLIGHT: Table = Table {
    name: "flight",
    columns: &[
        Column::new("fnum", Type::Integer).primary_key(),
        Column::new("num_sold", Type::Integer)
            .default("0")
            .check("num_sold >= 0"),
    ],
};

pub const FLIGHTINFO: Table = Table {
    name: "flightinfo",
    columns: &[
        Column::new("fiid", Type::Integer).primary_key(),
        Column::new("flight_id", Type::Integer)
            .unique()
            .references("flight", "fnum"),
        Column::new("pilot_id", Type::Integer).references("pilot", "id"),
        Column::new("plane_id", Type::Integer).references("plane", "id"),
    ],
};

pub const RESERVATION: Table = Table {
    name: "reservation",
    columns: &[
        Column::new("rnum", Type::Integer).primary_key(),
        Column::new("cid", Type::Integer).references("customer", "id"),
        Column::new("fid", Type::Integer).references("flight", "fnum"),
        Column::new("status", Type::Char(1)).check("status IN ('R', 'W', 'C')"),
    ],
};

pub const REPAIRS: Table = Table {
    name: "repairs",
    columns: &[
        Column::new("rid", Type::Integer).primary_key(),
        Column::new("plane_id", Type::Integer).references("plane", "id"),
        Column::new("repair_date", Type::Date),
    ],
};

/// Single-row table holding the last reservation number handed out.
pub const RESERVATION_COUNTER: Table = Table {
    name: "reservation_counter",
    columns: &[
        Column::new("id", Type::Integer).primary_key().check("id = 1"),
        Column::new("last_rnum", Type::Integer),
    ],
};

/// Every table, ordered so referenced tables come first.
pub const TABLES: &[Table] = &[
    PLANE,
    PILOT,
    TECHNICIAN,
    CUSTOMER,
    FLIGHT,
    FLIGHTINFO,
    RESERVATION,
    REPAIRS,
    RESERVATION_COUNTER,
];

/// Seeds the reservation counter past any reservation already stored. Does
/// nothing if the counter row exists.
pub const SEED_RESERVATION_COUNTER: &str = "INSERT INTO reservation_counter (id, last_rnum) \
     SELECT 1, COALESCE(MAX(rnum), 0) FROM reservation WHERE 1 = 1 \
     ON CONFLICT (id) DO NOTHING;";

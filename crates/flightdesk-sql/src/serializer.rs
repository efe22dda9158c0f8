mod flavor;
use flavor::Flavor;

mod params;
pub use params::{Params, Placeholder};

mod ddl;

use flightdesk_core::{
    driver::{Capability, SqlFlavor},
    stmt::{Fragment, Statement},
};

use std::fmt::Write;

/// Serialize a statement to a SQL string
#[derive(Debug)]
pub struct Serializer {
    /// The database flavor handles the differences between SQL dialects.
    flavor: Flavor,
}

impl Serializer {
    /// Picks the dialect from a driver's capability.
    pub fn for_capability(capability: &Capability) -> Serializer {
        match capability.flavor {
            SqlFlavor::Sqlite => Serializer::sqlite(),
            SqlFlavor::Postgresql => Serializer::postgresql(),
        }
    }

    /// Renders `stmt` as SQL, pushing each bound value onto `params` and
    /// writing its placeholder in its place.
    pub fn serialize(&self, stmt: &Statement, params: &mut impl Params) -> String {
        let mut ret = String::new();

        for fragment in stmt.fragments() {
            match fragment {
                Fragment::Sql(sql) => ret.push_str(sql),
                Fragment::Param(value) => {
                    let placeholder = params.push(value);
                    self.write_placeholder(&mut ret, placeholder, value);
                }
                Fragment::YearOf(column) => self.write_year_of(&mut ret, column),
            }
        }

        ret.push(';');
        ret
    }

    fn write_placeholder(
        &self,
        dst: &mut String,
        placeholder: Placeholder,
        value: &flightdesk_core::stmt::Value,
    ) {
        use flightdesk_core::stmt::Value;

        // Writing to a String never fails.
        let _ = match (&self.flavor, value) {
            (Flavor::Postgresql, Value::Date(_)) => {
                write!(dst, "CAST(${} AS DATE)", placeholder.0)
            }
            (Flavor::Postgresql, _) => write!(dst, "${}", placeholder.0),
            (Flavor::Sqlite, _) => write!(dst, "?{}", placeholder.0),
        };
    }

    fn write_year_of(&self, dst: &mut String, column: &str) {
        let _ = match self.flavor {
            Flavor::Sqlite => write!(dst, "CAST(strftime('%Y', {column}) AS INTEGER)"),
            Flavor::Postgresql => write!(dst, "CAST(EXTRACT(YEAR FROM {column}) AS INTEGER)"),
        };
    }
}

use super::{Flavor, Serializer};
use crate::schema::{Column, Table, Type};

use std::fmt::Write;

impl Serializer {
    /// `CREATE TABLE IF NOT EXISTS` for `table`.
    pub fn create_table(&self, table: &Table) -> String {
        let mut ret = format!("CREATE TABLE IF NOT EXISTS {} (", table.name);

        for (i, column) in table.columns.iter().enumerate() {
            if i > 0 {
                ret.push_str(", ");
            }
            self.write_column_def(&mut ret, column);
        }

        ret.push_str(");");
        ret
    }

    pub fn drop_table(&self, table: &Table) -> String {
        format!("DROP TABLE IF EXISTS {};", table.name)
    }

    fn write_column_def(&self, dst: &mut String, column: &Column) {
        let _ = write!(dst, "{} {}", column.name, self.column_type(column.ty));

        if column.primary_key {
            dst.push_str(" PRIMARY KEY");
        } else if !column.nullable {
            dst.push_str(" NOT NULL");
        }

        if column.unique {
            dst.push_str(" UNIQUE");
        }

        if let Some(default) = column.default {
            let _ = write!(dst, " DEFAULT {default}");
        }

        if let Some(check) = column.check {
            let _ = write!(dst, " CHECK ({check})");
        }

        if let Some((table, referenced)) = column.references {
            let _ = write!(dst, " REFERENCES {table} ({referenced})");
        }
    }

    fn column_type(&self, ty: Type) -> String {
        match (&self.flavor, ty) {
            (Flavor::Sqlite, Type::Integer) => "INTEGER".to_string(),
            (Flavor::Postgresql, Type::Integer) => "BIGINT".to_string(),
            (_, Type::Text) => "TEXT".to_string(),
            (_, Type::Char(n)) => format!("CHAR({n})"),
            // SQLite has no date type; ISO-8601 text sorts and parses correctly.
            (Flavor::Sqlite, Type::Date) => "TEXT".to_string(),
            (Flavor::Postgresql, Type::Date) => "DATE".to_string(),
        }
    }
}

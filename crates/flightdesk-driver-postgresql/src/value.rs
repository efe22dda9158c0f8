use flightdesk_core::stmt::Value as CoreValue;
use postgres::types::{private::BytesMut, to_sql_checked, IsNull, ToSql, Type};
use postgres::{Column, Row};

/// Binds a core value as a PostgreSQL parameter.
#[derive(Debug)]
pub struct Value(pub(crate) CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

/// The parameter type a value is prepared with.
///
/// Integers bind as `INT8`. Everything else binds as `TEXT`; dates are cast
/// to `DATE` in the SQL itself.
pub(crate) fn postgres_ty_for_value(value: &CoreValue) -> Type {
    match value {
        CoreValue::I64(_) => Type::INT8,
        CoreValue::String(_) | CoreValue::Date(_) | CoreValue::Null => Type::TEXT,
    }
}

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> std::result::Result<IsNull, Box<dyn std::error::Error + Sync + Send>>
    where
        Self: Sized,
    {
        match &self.0 {
            CoreValue::I64(value) => match *ty {
                Type::INT2 => i16::try_from(*value)?.to_sql(ty, out),
                Type::INT4 => i32::try_from(*value)?.to_sql(ty, out),
                _ => value.to_sql(ty, out),
            },
            CoreValue::String(value) | CoreValue::Date(value) => value.to_sql(ty, out),
            CoreValue::Null => Ok(IsNull::Yes),
        }
    }

    fn accepts(_: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

/// A result column whose type has no text mapping.
#[derive(Debug)]
pub(crate) struct UnsupportedColumnType {
    column: String,
    ty: Type,
}

impl std::error::Error for UnsupportedColumnType {}

impl std::fmt::Display for UnsupportedColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "column `{}` has type `{}`, which cannot be materialized as text",
            self.column, self.ty
        )
    }
}

/// Materializes the column at `index` as text.
pub(crate) fn text_from_row(
    row: &Row,
    index: usize,
    column: &Column,
) -> flightdesk_core::Result<Option<String>> {
    use flightdesk_core::Error;

    // The PostgreSQL type enum is not matchable, so compare each case.
    let ty = column.type_();

    let text = if *ty == Type::INT2 {
        get::<i16>(row, index)?.map(|v| v.to_string())
    } else if *ty == Type::INT4 {
        get::<i32>(row, index)?.map(|v| v.to_string())
    } else if *ty == Type::INT8 {
        get::<i64>(row, index)?.map(|v| v.to_string())
    } else if *ty == Type::FLOAT4 {
        get::<f32>(row, index)?.map(|v| v.to_string())
    } else if *ty == Type::FLOAT8 {
        get::<f64>(row, index)?.map(|v| v.to_string())
    } else if *ty == Type::BOOL {
        get::<bool>(row, index)?.map(|v| if v { "t" } else { "f" }.to_string())
    } else if *ty == Type::TEXT
        || *ty == Type::VARCHAR
        || *ty == Type::BPCHAR
        || *ty == Type::NAME
    {
        get::<String>(row, index)?
    } else {
        return Err(Error::query_failed(UnsupportedColumnType {
            column: column.name().to_string(),
            ty: ty.clone(),
        }));
    };

    Ok(text)
}

fn get<'a, T>(row: &'a Row, index: usize) -> flightdesk_core::Result<Option<T>>
where
    T: postgres::types::FromSql<'a>,
{
    row.try_get::<usize, Option<T>>(index)
        .map_err(flightdesk_core::Error::query_failed)
}

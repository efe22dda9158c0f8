mod record;
pub use record::Record;

mod row_set;
pub use row_set::RowSet;

mod statement;
pub use statement::{Fragment, Statement};

mod value;
pub use value::Value;

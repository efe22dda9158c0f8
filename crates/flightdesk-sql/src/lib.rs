pub mod schema;
pub use schema::{Column, Table, Type};

pub mod serializer;
pub use serializer::{Params, Placeholder, Serializer};

pub mod column_type;

pub use column_type::{ALL_COLUMN_TYPES, ColumnType};

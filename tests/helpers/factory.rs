pub use super::factories::{ColumnBuffersFactory, PartitionFactory};

use crate::engine::types::ColumnType;

pub struct Factory;

impl Factory {
    pub fn column(column_type: ColumnType) -> ColumnBuffersFactory {
        ColumnBuffersFactory::new(column_type)
    }

    pub fn partition() -> PartitionFactory {
        PartitionFactory::new()
    }
}

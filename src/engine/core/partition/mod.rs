pub mod readable_partition;
pub mod symbol_table;

pub use readable_partition::{
    ColumnView, Partition, PartitionBuilder, PartitionColumn, ReadablePartition,
};
pub use symbol_table::SymbolTable;

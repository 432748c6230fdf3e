pub mod partition_metadata;

pub use partition_metadata::{ColumnDescriptor, PartitionMetadata};

pub mod column;
pub mod metadata;
pub mod partition;
pub mod read;
pub mod write;

pub use column::{ColumnChunkBuffers, PackedPhysicalType, PhysicalType};
pub use metadata::{ColumnDescriptor, PartitionMetadata};
pub use partition::{ColumnView, Partition, PartitionBuilder, ReadablePartition, SymbolTable};
pub use read::PartitionDecoder;
pub use write::{CompressionKind, EncodeOptions, PartitionEncoder};

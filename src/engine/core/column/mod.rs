pub mod chunk_buffers;
pub mod physical_type;
pub mod type_mapper;

pub use chunk_buffers::ColumnChunkBuffers;
pub use physical_type::{PackedPhysicalType, PhysicalType};

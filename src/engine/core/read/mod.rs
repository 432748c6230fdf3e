pub mod column_decoder;
pub mod partition_decoder;
pub mod source;

pub use partition_decoder::PartitionDecoder;

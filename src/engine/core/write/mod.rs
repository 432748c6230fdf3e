pub mod column_encoder;
pub mod encode_options;
pub mod partition_encoder;

pub use encode_options::{CompressionKind, EncodeOptions};
pub use partition_encoder::PartitionEncoder;

#[cfg(test)]
mod encode_options_test;

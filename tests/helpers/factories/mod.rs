pub mod column_buffers_factory;
pub mod partition_factory;

pub use column_buffers_factory::ColumnBuffersFactory;
pub use partition_factory::PartitionFactory;

#[cfg(test)]
mod column_buffers_factory_test;
#[cfg(test)]
mod partition_factory_test;

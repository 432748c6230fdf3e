//! Entry points used by the query engine.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;

use crate::engine::core::{
    ColumnChunkBuffers, PartitionDecoder, PartitionEncoder, PartitionMetadata, ReadablePartition,
};
use crate::engine::errors::CodecError;
use crate::engine::types::ColumnType;

pub fn open_for_read(source: impl Into<Bytes>) -> Result<PartitionDecoder, CodecError> {
    PartitionDecoder::open(source).inspect_err(|e| e.log_error())
}

pub fn open_path_for_read(path: impl AsRef<Path>) -> Result<PartitionDecoder, CodecError> {
    PartitionDecoder::open_path(path).inspect_err(|e| e.log_error())
}

pub fn metadata(handle: &PartitionDecoder) -> Arc<PartitionMetadata> {
    Arc::clone(handle.metadata())
}

pub fn decode_column(
    handle: &PartitionDecoder,
    row_group: usize,
    column: usize,
    target: ColumnType,
) -> Result<ColumnChunkBuffers, CodecError> {
    let mut out = ColumnChunkBuffers::for_type(target);
    handle
        .decode_column_chunk(row_group, column, target, &mut out)
        .inspect_err(|e| e.log_error())?;
    Ok(out)
}

/// Encodes the whole partition with configured options; returns the row group count.
pub fn encode_partition<P, W>(partition: &P, sink: W) -> Result<usize, CodecError>
where
    P: ReadablePartition + ?Sized,
    W: Write + Send,
{
    PartitionEncoder::from_config()
        .and_then(|encoder| encoder.encode(partition, 0, sink))
        .inspect_err(|e| e.log_error())
}

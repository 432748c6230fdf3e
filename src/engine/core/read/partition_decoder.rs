use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use parquet::file::reader::{FileReader, SerializedFileReader};
use tracing::{debug, info};

use crate::engine::core::column::ColumnChunkBuffers;
use crate::engine::core::column::type_mapper::decode_plan;
use crate::engine::core::metadata::PartitionMetadata;
use crate::engine::core::read::column_decoder::{ChunkContext, decode_chunk};
use crate::engine::core::read::source::{chunk_range, map_file};
use crate::engine::errors::{CodecError, split_io_error};
use crate::engine::types::ColumnType;

const MAGIC: &[u8; 4] = b"PAR1";

/// Open interchange file. Owns its byte source until dropped or closed.
pub struct PartitionDecoder {
    reader: SerializedFileReader<Bytes>,
    metadata: Arc<PartitionMetadata>,
    source_len: u64,
}

impl std::fmt::Debug for PartitionDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartitionDecoder")
            .field("source_len", &self.source_len)
            .field("metadata", &self.metadata)
            .finish()
    }
}

impl PartitionDecoder {
    /// Parses and validates the footer. Column data is left untouched.
    pub fn open(source: impl Into<Bytes>) -> Result<Self, CodecError> {
        let bytes: Bytes = source.into();
        let source_len = bytes.len() as u64;
        if bytes.len() < 2 * MAGIC.len() + 4 {
            return Err(CodecError::malformed(format!(
                "{} bytes is too short for a Parquet file",
                bytes.len()
            )));
        }
        if &bytes[..MAGIC.len()] != MAGIC {
            return Err(CodecError::malformed("missing leading PAR1 magic"));
        }

        let reader = SerializedFileReader::new(bytes).map_err(|e| match split_io_error(e) {
            Ok(io_err) => CodecError::SourceReadFailure(io_err),
            Err(other) => CodecError::malformed(other.to_string()),
        })?;
        let metadata = PartitionMetadata::from_parquet(reader.metadata())?;

        info!(
            target: "partition_codec::decode",
            bytes = source_len,
            rows = metadata.row_count(),
            row_groups = metadata.row_group_count(),
            columns = metadata.column_count(),
            "Opened partition file"
        );

        Ok(Self {
            reader,
            metadata: Arc::new(metadata),
            source_len,
        })
    }

    /// Memory-maps `path` and opens it.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self, CodecError> {
        let path = path.as_ref();
        debug!(target: "partition_codec::decode", path = %path.display(), "Mapping partition file");
        Self::open(map_file(path)?)
    }

    pub fn metadata(&self) -> &Arc<PartitionMetadata> {
        &self.metadata
    }

    /// Decodes one column chunk into `out`, interpreting stored values as `target`.
    ///
    /// `out` is cleared first and keeps its allocations, so one buffer can be
    /// reused across chunks.
    pub fn decode_column_chunk(
        &self,
        row_group: usize,
        column: usize,
        target: ColumnType,
        out: &mut ColumnChunkBuffers,
    ) -> Result<(), CodecError> {
        let expected_rows = self.metadata.row_group_row_count(row_group)?;
        let descriptor = self.metadata.column(column)?;

        let parquet_meta = self.reader.metadata();
        let schema_column = parquet_meta.file_metadata().schema_descr().column(column);
        if schema_column.max_rep_level() > 0 {
            return Err(CodecError::unsupported(column, "repeated columns are not supported"));
        }
        let plan = decode_plan(descriptor.physical, descriptor.annotation, target)
            .map_err(|reason| CodecError::unsupported(column, reason))?;

        let chunk = parquet_meta.row_group(row_group).column(column);
        let range = chunk_range(chunk, self.source_len, column, row_group)?;
        let expected_rows = usize::try_from(expected_rows).map_err(|_| CodecError::CorruptChunk {
            column,
            row_group,
            offset: range.start,
            reason: format!("row count {} exceeds address space", expected_rows),
        })?;
        let ctx = ChunkContext {
            column,
            row_group,
            offset: range.start,
            max_def_level: schema_column.max_def_level(),
            expected_rows,
        };

        out.reset(target);
        out.reserve_rows(expected_rows.min(1 << 20));

        let rg_reader = self
            .reader
            .get_row_group(row_group)
            .map_err(|e| ctx.read_error(e))?;
        let column_reader = rg_reader
            .get_column_reader(column)
            .map_err(|e| ctx.read_error(e))?;
        decode_chunk(column_reader, plan, target, &ctx, out)?;

        debug!(
            target: "partition_codec::decode",
            row_group,
            column,
            column_type = %target,
            rows = out.row_count(),
            "Decoded column chunk"
        );
        Ok(())
    }

    /// Decodes a chunk as the column's inverse-mapped type.
    pub fn decode_column(&self, row_group: usize, column: usize) -> Result<ColumnChunkBuffers, CodecError> {
        let descriptor = self.metadata.column(column)?;
        let target = descriptor.column_type.ok_or_else(|| {
            CodecError::unsupported(
                column,
                format!("{} column {} has no engine type", descriptor.physical, descriptor.name),
            )
        })?;
        let mut out = ColumnChunkBuffers::for_type(target);
        self.decode_column_chunk(row_group, column, target, &mut out)?;
        Ok(out)
    }

    /// Releases the source. Dropping the decoder has the same effect.
    pub fn close(self) {
        debug!(target: "partition_codec::decode", bytes = self.source_len, "Closed partition file");
    }
}

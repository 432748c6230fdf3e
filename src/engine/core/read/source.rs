use std::fs::File;
use std::ops::Range;
use std::path::Path;

use bytes::Bytes;
use memmap2::MmapOptions;
use parquet::file::metadata::ColumnChunkMetaData;

use crate::engine::errors::CodecError;

/// Maps `path` read-only. The mapping is released when the last `Bytes`
/// handle over it drops.
pub fn map_file(path: &Path) -> Result<Bytes, CodecError> {
    let file = File::open(path).map_err(CodecError::SourceReadFailure)?;
    let len = file
        .metadata()
        .map_err(CodecError::SourceReadFailure)?
        .len();
    if len == 0 {
        return Ok(Bytes::new());
    }
    let mmap = unsafe {
        MmapOptions::new()
            .map(&file)
            .map_err(CodecError::SourceReadFailure)?
    };
    Ok(Bytes::from_owner(mmap))
}

/// Byte range of a column chunk, checked against the source length.
pub fn chunk_range(
    chunk: &ColumnChunkMetaData,
    source_len: u64,
    column: usize,
    row_group: usize,
) -> Result<Range<u64>, CodecError> {
    let start = match chunk.dictionary_page_offset() {
        Some(dict) => dict,
        None => chunk.data_page_offset(),
    };
    let len = chunk.compressed_size();
    if start < 0 || len < 0 {
        return Err(CodecError::CorruptChunk {
            column,
            row_group,
            offset: start.max(0) as u64,
            reason: format!("negative chunk offset {} or length {}", start, len),
        });
    }
    let (start, len) = (start as u64, len as u64);
    match start.checked_add(len) {
        Some(end) if end <= source_len => Ok(start..end),
        _ => Err(CodecError::TruncatedChunk {
            column,
            row_group,
            offset: start,
            declared: len,
            available: source_len.saturating_sub(start),
        }),
    }
}

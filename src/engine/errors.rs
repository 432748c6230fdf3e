use std::io;
use thiserror::Error;
use tracing::{debug, error};

use crate::engine::types::ColumnType;

/// Errors raised while encoding partitions to, or decoding them from, Parquet.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Malformed file: {reason}")]
    MalformedFile { reason: String },

    #[error("Unsupported type for column {column}: {reason}")]
    UnsupportedType { column: usize, reason: String },

    #[error(
        "Narrowing overflow in column {column}, row group {row_group}, row {row}: value {value} does not fit {target}"
    )]
    NarrowingOverflow {
        column: usize,
        row_group: usize,
        row: usize,
        value: i64,
        target: ColumnType,
    },

    #[error(
        "Truncated chunk for column {column}, row group {row_group}: {declared} bytes declared at offset {offset}, only {available} available"
    )]
    TruncatedChunk {
        column: usize,
        row_group: usize,
        offset: u64,
        declared: u64,
        available: u64,
    },

    #[error("Corrupt chunk for column {column}, row group {row_group} at offset {offset}: {reason}")]
    CorruptChunk {
        column: usize,
        row_group: usize,
        offset: u64,
        reason: String,
    },

    #[error("Sink write failed: {0}")]
    SinkWriteFailure(#[source] io::Error),

    #[error("Source read failed: {0}")]
    SourceReadFailure(#[source] io::Error),

    #[error("Partition {table} has no rows or columns to encode")]
    EmptyPartition { table: String },

    #[error("Invalid data for column {column}: {reason}")]
    InvalidColumnData { column: usize, reason: String },

    #[error("{what} index {index} out of range [0, {len})")]
    OutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl CodecError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        CodecError::MalformedFile {
            reason: reason.into(),
        }
    }

    pub fn unsupported(column: usize, reason: impl Into<String>) -> Self {
        CodecError::UnsupportedType {
            column,
            reason: reason.into(),
        }
    }

    pub fn invalid_config(reason: impl Into<String>) -> Self {
        CodecError::InvalidConfig {
            reason: reason.into(),
        }
    }

    pub fn invalid_data(column: usize, reason: impl Into<String>) -> Self {
        CodecError::InvalidColumnData {
            column,
            reason: reason.into(),
        }
    }

    /// Short, stable label for the error kind. Used in logs and the CLI.
    pub fn kind(&self) -> &'static str {
        match self {
            CodecError::MalformedFile { .. } => "MalformedFile",
            CodecError::UnsupportedType { .. } => "UnsupportedType",
            CodecError::NarrowingOverflow { .. } => "NarrowingOverflow",
            CodecError::TruncatedChunk { .. } => "TruncatedChunk",
            CodecError::CorruptChunk { .. } => "CorruptChunk",
            CodecError::SinkWriteFailure(_) => "SinkWriteFailure",
            CodecError::SourceReadFailure(_) => "SourceReadFailure",
            CodecError::EmptyPartition { .. } => "EmptyPartition",
            CodecError::InvalidColumnData { .. } => "InvalidColumnData",
            CodecError::OutOfRange { .. } => "OutOfRange",
            CodecError::InvalidConfig { .. } => "InvalidConfig",
        }
    }

    /// Errors scoped to one column chunk leave the rest of the file decodable.
    pub fn is_chunk_local(&self) -> bool {
        matches!(
            self,
            CodecError::UnsupportedType { .. }
                | CodecError::NarrowingOverflow { .. }
                | CodecError::TruncatedChunk { .. }
                | CodecError::CorruptChunk { .. }
        )
    }

    pub fn log_error(&self) {
        match self {
            CodecError::MalformedFile { reason } => {
                error!("Malformed file: {}", reason);
                debug!("Malformed file details: {:?}", self);
            }
            CodecError::UnsupportedType { column, reason } => {
                error!("Unsupported type for column {}: {}", column, reason);
                debug!("Unsupported type details: {:?}", self);
            }
            CodecError::NarrowingOverflow {
                column,
                row_group,
                row,
                value,
                target,
            } => {
                error!(
                    "Narrowing overflow: column={} row_group={} row={}",
                    column, row_group, row
                );
                debug!("Value {} does not fit {}", value, target);
            }
            CodecError::TruncatedChunk {
                column,
                row_group,
                offset,
                ..
            } => {
                error!(
                    "Truncated chunk: column={} row_group={} offset={}",
                    column, row_group, offset
                );
                debug!("Truncated chunk details: {:?}", self);
            }
            CodecError::CorruptChunk {
                column,
                row_group,
                reason,
                ..
            } => {
                error!(
                    "Corrupt chunk: column={} row_group={}: {}",
                    column, row_group, reason
                );
                debug!("Corrupt chunk details: {:?}", self);
            }
            CodecError::SinkWriteFailure(e) => {
                error!("Sink write failed: {}", e);
                debug!("Sink write error details: {:?}", e);
            }
            CodecError::SourceReadFailure(e) => {
                error!("Source read failed: {}", e);
                debug!("Source read error details: {:?}", e);
            }
            CodecError::EmptyPartition { table } => {
                error!("Nothing to encode for partition {}", table);
            }
            CodecError::InvalidColumnData { column, reason } => {
                error!("Invalid data for column {}: {}", column, reason);
                debug!("Invalid column data details: {:?}", self);
            }
            CodecError::OutOfRange { what, index, len } => {
                error!("{} index {} out of range (len {})", what, index, len);
            }
            CodecError::InvalidConfig { reason } => {
                error!("Invalid configuration: {}", reason);
            }
        }
    }
}

/// Splits out the I/O error a Parquet writer or reader surfaced from its sink
/// or source, handing back any other error untouched.
pub fn split_io_error(
    err: parquet::errors::ParquetError,
) -> Result<io::Error, parquet::errors::ParquetError> {
    match err {
        parquet::errors::ParquetError::External(boxed) => match boxed.downcast::<io::Error>() {
            Ok(io_err) => Ok(*io_err),
            Err(other) => Err(parquet::errors::ParquetError::External(other)),
        },
        other => Err(other),
    }
}

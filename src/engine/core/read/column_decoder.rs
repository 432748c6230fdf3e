use parquet::column::reader::{ColumnReader, ColumnReaderImpl};
use parquet::data_type::{AsBytes, DataType};
use parquet::errors::ParquetError;

use crate::engine::core::column::ColumnChunkBuffers;
use crate::engine::core::column::chunk_buffers::DecodeScratch;
use crate::engine::core::column::type_mapper::{DecodePlan, TimeScale};
use crate::engine::errors::{CodecError, split_io_error};
use crate::engine::types::ColumnType;

/// Records pulled from the page reader per call.
const DECODE_BATCH_ROWS: usize = 8 * 1024;

/// Where a chunk lives, for error reporting.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ChunkContext {
    pub column: usize,
    pub row_group: usize,
    pub offset: u64,
    pub max_def_level: i16,
    pub expected_rows: usize,
}

impl ChunkContext {
    pub fn corrupt(&self, reason: impl Into<String>) -> CodecError {
        CodecError::CorruptChunk {
            column: self.column,
            row_group: self.row_group,
            offset: self.offset,
            reason: reason.into(),
        }
    }

    pub fn read_error(&self, err: ParquetError) -> CodecError {
        match split_io_error(err) {
            Ok(io_err) => CodecError::SourceReadFailure(io_err),
            Err(other) => self.corrupt(other.to_string()),
        }
    }

    fn overflow(&self, row: usize, value: i64, target: ColumnType) -> CodecError {
        CodecError::NarrowingOverflow {
            column: self.column,
            row_group: self.row_group,
            row,
            value,
            target,
        }
    }
}

/// Decodes every page of one chunk into `out`, which must already be reset
/// to `target`.
pub(crate) fn decode_chunk(
    reader: ColumnReader,
    plan: DecodePlan,
    target: ColumnType,
    ctx: &ChunkContext,
    out: &mut ColumnChunkBuffers,
) -> Result<(), CodecError> {
    // The scratch lives inside `out`; lift it out so both can be borrowed.
    let mut scratch = std::mem::take(&mut out.scratch);
    let result = decode_with_scratch(reader, plan, target, ctx, out, &mut scratch);
    out.scratch = scratch;
    result
}

fn decode_with_scratch(
    reader: ColumnReader,
    plan: DecodePlan,
    target: ColumnType,
    ctx: &ChunkContext,
    out: &mut ColumnChunkBuffers,
    scratch: &mut DecodeScratch,
) -> Result<(), CodecError> {
    let DecodeScratch {
        def_levels,
        bools,
        ints32,
        ints64,
        floats,
        doubles,
        bytes,
        fixed,
    } = scratch;

    match (reader, plan) {
        (ColumnReader::BoolColumnReader(mut r), DecodePlan::Boolean) => {
            drain(&mut r, ctx, def_levels, bools, out, |v, _, out| {
                out.push_bool(*v);
                Ok(())
            })
        }
        (ColumnReader::Int32ColumnReader(mut r), DecodePlan::Integer { unsigned, scale }) => {
            drain(&mut r, ctx, def_levels, ints32, out, |v, row, out| {
                let value = if unsigned { *v as u32 as i64 } else { *v as i64 };
                push_integer(out, value, value, scale, target, row, ctx)
            })
        }
        (ColumnReader::Int64ColumnReader(mut r), DecodePlan::Integer { unsigned, scale }) => {
            drain(&mut r, ctx, def_levels, ints64, out, |v, row, out| {
                let value = if unsigned {
                    i64::try_from(*v as u64).map_err(|_| ctx.overflow(row, *v, target))?
                } else {
                    *v
                };
                push_integer(out, *v, value, scale, target, row, ctx)
            })
        }
        (ColumnReader::FloatColumnReader(mut r), DecodePlan::Float { widen }) => {
            drain(&mut r, ctx, def_levels, floats, out, |v, _, out| {
                if widen {
                    out.push_f64(*v as f64);
                } else {
                    out.push_f32(*v);
                }
                Ok(())
            })
        }
        (ColumnReader::DoubleColumnReader(mut r), DecodePlan::Double) => {
            drain(&mut r, ctx, def_levels, doubles, out, |v, _, out| {
                out.push_f64(*v);
                Ok(())
            })
        }
        (
            ColumnReader::ByteArrayColumnReader(mut r),
            DecodePlan::Utf8 | DecodePlan::Symbol | DecodePlan::Binary,
        ) => drain(&mut r, ctx, def_levels, bytes, out, |v, row, out| {
            let raw = v.as_bytes();
            match plan {
                DecodePlan::Binary => out.push_var(Some(raw)),
                _ => {
                    let text = std::str::from_utf8(raw)
                        .map_err(|e| ctx.corrupt(format!("row {}: invalid UTF-8: {}", row, e)))?;
                    if plan == DecodePlan::Symbol {
                        out.push_symbol(Some(text));
                    } else {
                        out.push_str(Some(text));
                    }
                }
            }
            Ok(())
        }),
        (ColumnReader::FixedLenByteArrayColumnReader(mut r), DecodePlan::FixedBytes { reverse }) => {
            let width = target.fixed_width().unwrap_or(0);
            let mut staged = Vec::with_capacity(width);
            drain(&mut r, ctx, def_levels, fixed, out, |v, row, out| {
                let raw = v.as_bytes();
                if raw.len() != width {
                    return Err(ctx.corrupt(format!(
                        "row {}: {} bytes in a {}-byte column",
                        row,
                        raw.len(),
                        width
                    )));
                }
                staged.clear();
                staged.extend_from_slice(raw);
                if reverse {
                    staged.reverse();
                }
                out.push_fixed(&staged);
                Ok(())
            })
        }
        (_, plan) => Err(CodecError::unsupported(
            ctx.column,
            format!("reader does not match decode plan {:?} for {}", plan, target),
        )),
    }
}

fn push_integer(
    out: &mut ColumnChunkBuffers,
    stored: i64,
    value: i64,
    scale: TimeScale,
    target: ColumnType,
    row: usize,
    ctx: &ChunkContext,
) -> Result<(), CodecError> {
    let scaled = scale
        .apply(value)
        .ok_or_else(|| ctx.overflow(row, stored, target))?;
    let (min, max) = target.integer_range().unwrap_or((i64::MIN, i64::MAX));
    if scaled < min || scaled > max {
        return Err(ctx.overflow(row, stored, target));
    }
    out.push_integer(scaled);
    Ok(())
}

/// Pulls records in batches, walking definition levels so nulls land as the
/// target's null representation, then cross-checks the row count.
fn drain<T, F>(
    reader: &mut ColumnReaderImpl<T>,
    ctx: &ChunkContext,
    defs: &mut Vec<i16>,
    values: &mut Vec<T::T>,
    out: &mut ColumnChunkBuffers,
    mut emit: F,
) -> Result<(), CodecError>
where
    T: DataType,
    F: FnMut(&T::T, usize, &mut ColumnChunkBuffers) -> Result<(), CodecError>,
{
    let max_def = ctx.max_def_level;
    let mut decoded = 0usize;
    while decoded < ctx.expected_rows {
        let want = (ctx.expected_rows - decoded).min(DECODE_BATCH_ROWS);
        defs.clear();
        values.clear();
        let levels = if max_def > 0 { Some(&mut *defs) } else { None };
        let (records, _, _) = reader
            .read_records(want, levels, None, values)
            .map_err(|e| ctx.read_error(e))?;
        if records == 0 {
            break;
        }

        if max_def > 0 {
            if defs.len() != records {
                return Err(ctx.corrupt(format!(
                    "{} definition levels for {} records",
                    defs.len(),
                    records
                )));
            }
            let present = defs.iter().filter(|d| **d == max_def).count();
            if present != values.len() {
                return Err(ctx.corrupt(format!(
                    "{} values for {} non-null levels",
                    values.len(),
                    present
                )));
            }
            let mut next = 0usize;
            for (i, level) in defs.iter().enumerate() {
                if *level == max_def {
                    emit(&values[next], decoded + i, out)?;
                    next += 1;
                } else {
                    out.push_null();
                }
            }
        } else {
            if values.len() != records {
                return Err(ctx.corrupt(format!(
                    "{} values for {} required records",
                    values.len(),
                    records
                )));
            }
            for (i, value) in values.iter().enumerate() {
                emit(value, decoded + i, out)?;
            }
        }
        decoded += records;
    }

    if decoded != ctx.expected_rows {
        return Err(ctx.corrupt(format!(
            "chunk decoded to {} rows, row group declares {}",
            decoded, ctx.expected_rows
        )));
    }

    defs.clear();
    values.clear();
    let levels = if max_def > 0 { Some(&mut *defs) } else { None };
    let (extra, _, _) = reader
        .read_records(1, levels, None, values)
        .map_err(|e| ctx.read_error(e))?;
    if extra > 0 {
        return Err(ctx.corrupt(format!(
            "chunk holds more rows than the {} its row group declares",
            ctx.expected_rows
        )));
    }
    Ok(())
}

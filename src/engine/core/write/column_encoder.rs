use std::ops::Range;

use parquet::data_type::{
    BoolType, ByteArray, ByteArrayType, DataType, DoubleType, FixedLenByteArray,
    FixedLenByteArrayType, FloatType, Int32Type, Int64Type,
};
use parquet::errors::ParquetError;
use parquet::file::writer::SerializedColumnWriter;

use crate::engine::core::column::chunk_buffers::read_var_entry;
use crate::engine::core::partition::ColumnView;
use crate::engine::errors::{CodecError, split_io_error};
use crate::engine::types::ColumnType;

/// Rows converted per `write_batch` call. Bounds the staging vectors; page
/// sizing is left to the Parquet writer.
const WRITE_BATCH_ROWS: usize = 64 * 1024;

/// Converts one partition column from native layout into Parquet values and
/// definition levels.
pub(crate) struct ColumnEncoder<'a> {
    view: ColumnView<'a>,
    ordinal: usize,
}

impl<'a> ColumnEncoder<'a> {
    pub fn new(view: ColumnView<'a>, ordinal: usize) -> Self {
        Self { view, ordinal }
    }

    /// Checks the native buffers cover `rows` before any byte reaches the sink.
    pub fn validate(&self, rows: &Range<usize>) -> Result<(), CodecError> {
        let column_type = self.view.column_type;
        match column_type.fixed_width() {
            Some(width) => {
                let need = rows.end.checked_mul(width).ok_or_else(|| {
                    CodecError::invalid_data(self.ordinal, "row span overflows buffer size")
                })?;
                if self.view.data.len() < need {
                    return Err(CodecError::invalid_data(
                        self.ordinal,
                        format!(
                            "{} column {} holds {} bytes, {} rows need {}",
                            column_type,
                            self.view.name,
                            self.view.data.len(),
                            rows.end,
                            need
                        ),
                    ));
                }
            }
            None => {
                if self.view.aux.len() < rows.end.saturating_mul(8) {
                    return Err(CodecError::invalid_data(
                        self.ordinal,
                        format!(
                            "{} column {} has {} offsets, {} rows needed",
                            column_type,
                            self.view.name,
                            self.view.aux.len() / 8,
                            rows.end
                        ),
                    ));
                }
            }
        }
        if column_type == ColumnType::Symbol && self.view.symbols.is_none() {
            return Err(CodecError::invalid_data(
                self.ordinal,
                "symbol column has no symbol table",
            ));
        }
        Ok(())
    }

    pub fn write(
        &self,
        writer: &mut SerializedColumnWriter<'_>,
        rows: Range<usize>,
    ) -> Result<(), CodecError> {
        let mut start = rows.start;
        while start < rows.end {
            let end = (start + WRITE_BATCH_ROWS).min(rows.end);
            self.write_batch(writer, start..end)?;
            start = end;
        }
        Ok(())
    }

    fn write_batch(
        &self,
        writer: &mut SerializedColumnWriter<'_>,
        rows: Range<usize>,
    ) -> Result<(), CodecError> {
        match self.view.column_type {
            ColumnType::Boolean => self.write_fixed::<BoolType, _>(writer, rows, |raw| Ok(raw[0] != 0)),
            ColumnType::Byte | ColumnType::GeoByte => {
                self.write_fixed::<Int32Type, _>(writer, rows, |raw| Ok(raw[0] as i8 as i32))
            }
            ColumnType::Short | ColumnType::GeoShort => {
                self.write_fixed::<Int32Type, _>(writer, rows, |raw| {
                    Ok(i16::from_le_bytes(le::<2>(raw)) as i32)
                })
            }
            ColumnType::Char => self.write_fixed::<Int32Type, _>(writer, rows, |raw| {
                Ok(u16::from_le_bytes(le::<2>(raw)) as i32)
            }),
            ColumnType::Int | ColumnType::GeoInt => {
                self.write_fixed::<Int32Type, _>(writer, rows, |raw| Ok(i32::from_le_bytes(le::<4>(raw))))
            }
            // Stored as the bit pattern of the unsigned address.
            ColumnType::IPv4 => self.write_fixed::<Int32Type, _>(writer, rows, |raw| {
                Ok(u32::from_le_bytes(le::<4>(raw)) as i32)
            }),
            ColumnType::Long | ColumnType::Date | ColumnType::Timestamp | ColumnType::GeoLong => {
                self.write_fixed::<Int64Type, _>(writer, rows, |raw| Ok(i64::from_le_bytes(le::<8>(raw))))
            }
            ColumnType::Float => {
                self.write_fixed::<FloatType, _>(writer, rows, |raw| Ok(f32::from_le_bytes(le::<4>(raw))))
            }
            ColumnType::Double => {
                self.write_fixed::<DoubleType, _>(writer, rows, |raw| Ok(f64::from_le_bytes(le::<8>(raw))))
            }
            // Parquet UUIDs are big-endian; the engine keeps lo/hi little-endian halves.
            ColumnType::Uuid => self.write_fixed::<FixedLenByteArrayType, _>(writer, rows, |raw| {
                let mut bytes = raw.to_vec();
                bytes.reverse();
                Ok(FixedLenByteArray::from(bytes))
            }),
            ColumnType::Long128 | ColumnType::Long256 => {
                self.write_fixed::<FixedLenByteArrayType, _>(writer, rows, |raw| {
                    Ok(FixedLenByteArray::from(raw.to_vec()))
                })
            }
            ColumnType::Symbol => self.write_symbols(writer, rows),
            ColumnType::String | ColumnType::Varchar | ColumnType::Binary => {
                self.write_var(writer, rows)
            }
        }
    }

    fn write_fixed<T, F>(
        &self,
        writer: &mut SerializedColumnWriter<'_>,
        rows: Range<usize>,
        convert: F,
    ) -> Result<(), CodecError>
    where
        T: DataType,
        F: Fn(&[u8]) -> Result<T::T, String>,
    {
        let column_type = self.view.column_type;
        let width = column_type.fixed_width().unwrap_or(1);
        let nullable = column_type.is_nullable();

        let mut values = Vec::with_capacity(rows.len());
        let mut defs: Vec<i16> = Vec::with_capacity(if nullable { rows.len() } else { 0 });
        for row in rows {
            let raw = &self.view.data[row * width..(row + 1) * width];
            if nullable {
                if column_type.is_null_value(raw) {
                    defs.push(0);
                    continue;
                }
                defs.push(1);
            }
            let value = convert(raw)
                .map_err(|reason| CodecError::invalid_data(self.ordinal, format!("row {}: {}", row, reason)))?;
            values.push(value);
        }
        self.flush::<T>(writer, &values, nullable.then_some(defs.as_slice()))
    }

    fn write_symbols(
        &self,
        writer: &mut SerializedColumnWriter<'_>,
        rows: Range<usize>,
    ) -> Result<(), CodecError> {
        let symbols = self
            .view
            .symbols
            .ok_or_else(|| CodecError::invalid_data(self.ordinal, "symbol column has no symbol table"))?;
        let mut values = Vec::with_capacity(rows.len());
        let mut defs: Vec<i16> = Vec::with_capacity(rows.len());
        for row in rows {
            let key = i32::from_le_bytes(le::<4>(&self.view.data[row * 4..row * 4 + 4]));
            if key < 0 {
                defs.push(0);
                continue;
            }
            let value = symbols.get(key).ok_or_else(|| {
                CodecError::invalid_data(
                    self.ordinal,
                    format!("row {}: symbol key {} not in table of {}", row, key, symbols.len()),
                )
            })?;
            defs.push(1);
            values.push(ByteArray::from(value));
        }
        self.flush::<ByteArrayType>(writer, &values, Some(&defs))
    }

    fn write_var(
        &self,
        writer: &mut SerializedColumnWriter<'_>,
        rows: Range<usize>,
    ) -> Result<(), CodecError> {
        let text = self.view.column_type != ColumnType::Binary;
        let mut values = Vec::with_capacity(rows.len());
        let mut defs: Vec<i16> = Vec::with_capacity(rows.len());
        for row in rows {
            let entry = read_var_entry(self.view.data, self.view.aux, row)
                .map_err(|reason| CodecError::invalid_data(self.ordinal, reason))?;
            match entry {
                None => defs.push(0),
                Some(bytes) => {
                    if text && std::str::from_utf8(bytes).is_err() {
                        return Err(CodecError::invalid_data(
                            self.ordinal,
                            format!("row {}: invalid UTF-8", row),
                        ));
                    }
                    defs.push(1);
                    values.push(ByteArray::from(bytes.to_vec()));
                }
            }
        }
        self.flush::<ByteArrayType>(writer, &values, Some(&defs))
    }

    fn flush<T: DataType>(
        &self,
        writer: &mut SerializedColumnWriter<'_>,
        values: &[T::T],
        defs: Option<&[i16]>,
    ) -> Result<(), CodecError> {
        writer
            .typed::<T>()
            .write_batch(values, defs, None)
            .map_err(|e| self.column_error(e))?;
        Ok(())
    }

    pub fn column_error(&self, err: ParquetError) -> CodecError {
        match split_io_error(err) {
            Ok(io_err) => CodecError::SinkWriteFailure(io_err),
            Err(other) => CodecError::invalid_data(self.ordinal, other.to_string()),
        }
    }
}

fn le<const N: usize>(raw: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&raw[..N]);
    out
}

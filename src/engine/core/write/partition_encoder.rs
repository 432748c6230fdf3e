use std::io::{self, Write};
use std::ops::Range;
use std::sync::Arc;

use parquet::errors::ParquetError;
use parquet::file::writer::SerializedFileWriter;
use parquet::format::KeyValue;
use parquet::schema::types::Type;
use tracing::{debug, info};

use crate::engine::core::column::type_mapper::parquet_field;
use crate::engine::core::metadata::partition_metadata::{TABLE_NAME_KEY, column_types_entry};
use crate::engine::core::metadata::{ColumnDescriptor, PartitionMetadata};
use crate::engine::core::partition::ReadablePartition;
use crate::engine::core::write::column_encoder::ColumnEncoder;
use crate::engine::core::write::encode_options::{CREATED_BY, EncodeOptions};
use crate::engine::errors::{CodecError, split_io_error};
use crate::shared::config::{Settings, try_config};

/// Writes partitions as Parquet files.
#[derive(Debug, Clone, Default)]
pub struct PartitionEncoder {
    options: EncodeOptions,
}

impl PartitionEncoder {
    pub fn new(options: EncodeOptions) -> Self {
        Self { options }
    }

    /// Encoder with the shared settings. A configuration that fails to load
    /// is `InvalidConfig`.
    pub fn from_config() -> Result<Self, CodecError> {
        let settings = try_config().map_err(CodecError::invalid_config)?;
        Ok(Self::from_settings(&settings))
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(EncodeOptions::from_config(&settings.codec))
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    /// Encodes rows `row_offset..` of `partition` into `sink` and returns the
    /// number of row groups written.
    pub fn encode<P, W>(&self, partition: &P, row_offset: usize, sink: W) -> Result<usize, CodecError>
    where
        P: ReadablePartition + ?Sized,
        W: Write + Send,
    {
        let end = partition.row_count();
        let rows = row_offset.min(end)..end;
        let metadata = self.encode_range(partition, rows, sink)?;
        Ok(metadata.row_group_count())
    }

    pub fn encode_range<P, W>(
        &self,
        partition: &P,
        rows: Range<usize>,
        sink: W,
    ) -> Result<PartitionMetadata, CodecError>
    where
        P: ReadablePartition + ?Sized,
        W: Write + Send,
    {
        let table = partition.table_name().to_string();
        if rows.end > partition.row_count() {
            return Err(CodecError::OutOfRange {
                what: "row",
                index: rows.end,
                len: partition.row_count(),
            });
        }
        if rows.is_empty() {
            return Err(CodecError::EmptyPartition { table });
        }

        let selection: Vec<usize> = match &self.options.columns {
            Some(columns) => columns.clone(),
            None => (0..partition.column_count()).collect(),
        };
        if selection.is_empty() {
            return Err(CodecError::EmptyPartition { table });
        }

        let mut encoders = Vec::with_capacity(selection.len());
        let mut descriptors = Vec::with_capacity(selection.len());
        let mut fields = Vec::with_capacity(selection.len());
        for (id, &ordinal) in selection.iter().enumerate() {
            let view = partition.column(ordinal).ok_or(CodecError::OutOfRange {
                what: "column",
                index: ordinal,
                len: partition.column_count(),
            })?;
            let field = parquet_field(view.column_type, view.name, id as i32)
                .map_err(|e| CodecError::unsupported(ordinal, e.to_string()))?;
            let encoder = ColumnEncoder::new(view, ordinal);
            encoder.validate(&rows)?;

            descriptors.push(ColumnDescriptor::for_encode(id as i32, view.name, view.column_type));
            fields.push(field);
            encoders.push(encoder);
        }

        let schema = Type::group_type_builder("schema")
            .with_fields(fields)
            .build()
            .map_err(|e| CodecError::unsupported(selection[0], e.to_string()))?;

        let mut key_value = vec![KeyValue::new(TABLE_NAME_KEY.to_string(), table.clone())];
        key_value.extend(column_types_entry(&descriptors));
        let props = self.options.writer_properties(key_value);

        let mut writer =
            SerializedFileWriter::new(sink, Arc::new(schema), props).map_err(sink_error)?;

        let group_size = self.options.row_group_size.unwrap_or(rows.len()).max(1);
        let mut row_groups = Vec::new();
        let mut start = rows.start;
        while start < rows.end {
            let end = (start + group_size).min(rows.end);
            let mut rg_writer = writer.next_row_group().map_err(sink_error)?;
            for encoder in &encoders {
                let mut column_writer = rg_writer
                    .next_column()
                    .map_err(sink_error)?
                    .ok_or_else(|| sink_error(ParquetError::General("schema ran out of columns".into())))?;
                encoder.write(&mut column_writer, start..end)?;
                column_writer.close().map_err(|e| encoder.column_error(e))?;
            }
            rg_writer.close().map_err(sink_error)?;
            debug!(
                target: "partition_codec::encode",
                table = %table,
                row_group = row_groups.len(),
                first_row = start,
                rows = end - start,
                "Row group written"
            );
            row_groups.push((end - start) as u64);
            start = end;
        }
        writer.close().map_err(sink_error)?;

        info!(
            target: "partition_codec::encode",
            table = %table,
            rows = rows.len(),
            columns = descriptors.len(),
            row_groups = row_groups.len(),
            "Partition encoded"
        );

        Ok(PartitionMetadata::from_encoded(
            descriptors,
            row_groups,
            Some(CREATED_BY.to_string()),
            Some(table),
        ))
    }
}

fn sink_error(err: ParquetError) -> CodecError {
    match split_io_error(err) {
        Ok(io_err) => CodecError::SinkWriteFailure(io_err),
        Err(other) => CodecError::SinkWriteFailure(io::Error::other(other)),
    }
}

use parquet::file::metadata::ParquetMetaData;
use parquet::format::KeyValue;
use tracing::debug;

use crate::engine::core::column::PackedPhysicalType;
use crate::engine::core::column::type_mapper::{
    Annotation, annotation_of, logical_type_for, mapping_for, packed_physical_of,
};
use crate::engine::errors::CodecError;
use crate::engine::types::ColumnType;

/// Key/value entry listing each column's logical type as the encoder saw it.
pub const COLUMN_TYPES_KEY: &str = "partition_codec.column_types";
/// Key/value entry naming the source table.
pub const TABLE_NAME_KEY: &str = "partition_codec.table";

/// One column of an interchange file, in ordinal order.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    pub id: i32,
    pub name: String,
    /// `None` when the stored column has no inverse mapping.
    pub column_type: Option<ColumnType>,
    pub physical: PackedPhysicalType,
    pub fixed_width: Option<usize>,
    pub annotation: Annotation,
    pub nullable: bool,
    pub declared_type: Option<ColumnType>,
}

impl ColumnDescriptor {
    /// Descriptor for a column the encoder is about to write.
    pub fn for_encode(id: i32, name: &str, column_type: ColumnType) -> Self {
        let mapping = mapping_for(column_type);
        Self {
            id,
            name: name.to_string(),
            column_type: logical_type_for(mapping.physical, mapping.annotation, false),
            physical: mapping.physical,
            fixed_width: mapping.physical.byte_width(),
            annotation: mapping.annotation,
            nullable: !mapping.required,
            declared_type: Some(column_type),
        }
    }
}

/// Immutable schema and row-group directory of one interchange file.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionMetadata {
    columns: Vec<ColumnDescriptor>,
    row_groups: Vec<u64>,
    row_count: u64,
    created_by: Option<String>,
    table_name: Option<String>,
}

impl PartitionMetadata {
    /// Metadata of a file the encoder produced. Row groups are listed by row count.
    pub fn from_encoded(
        columns: Vec<ColumnDescriptor>,
        row_groups: Vec<u64>,
        created_by: Option<String>,
        table_name: Option<String>,
    ) -> Self {
        let row_count = row_groups.iter().sum();
        Self {
            columns,
            row_groups,
            row_count,
            created_by,
            table_name,
        }
    }

    /// Builds and validates the model from a parsed footer.
    pub fn from_parquet(meta: &ParquetMetaData) -> Result<Self, CodecError> {
        let file = meta.file_metadata();
        let schema = file.schema_descr();
        let leaf_count = schema.num_columns();

        let top_level = schema.root_schema().get_fields();
        if top_level.len() != leaf_count || top_level.iter().any(|f| f.is_group()) {
            return Err(CodecError::malformed(format!(
                "nested schema: {} top-level fields, {} leaf columns",
                top_level.len(),
                leaf_count
            )));
        }

        if file.num_rows() < 0 {
            return Err(CodecError::malformed(format!(
                "negative total row count {}",
                file.num_rows()
            )));
        }

        let mut row_groups = Vec::with_capacity(meta.num_row_groups());
        let mut total: u64 = 0;
        for (i, rg) in meta.row_groups().iter().enumerate() {
            if rg.num_columns() != leaf_count {
                return Err(CodecError::malformed(format!(
                    "row group {} has {} columns, schema has {}",
                    i,
                    rg.num_columns(),
                    leaf_count
                )));
            }
            let rows = u64::try_from(rg.num_rows()).map_err(|_| {
                CodecError::malformed(format!(
                    "row group {} has negative row count {}",
                    i,
                    rg.num_rows()
                ))
            })?;
            total = total
                .checked_add(rows)
                .ok_or_else(|| CodecError::malformed("row count overflow"))?;
            row_groups.push(rows);
        }
        if total != file.num_rows() as u64 {
            return Err(CodecError::malformed(format!(
                "row groups hold {} rows, footer declares {}",
                total,
                file.num_rows()
            )));
        }

        let kv = file.key_value_metadata();
        let declared = declared_types(kv, leaf_count);

        let mut columns = Vec::with_capacity(leaf_count);
        for i in 0..leaf_count {
            let column = schema.column(i);
            let info = column.self_type().get_basic_info();
            let physical = packed_physical_of(&column);
            let annotation = annotation_of(&column);
            let repeated = column.max_rep_level() > 0;
            columns.push(ColumnDescriptor {
                id: if info.has_id() { info.id() } else { -1 },
                name: column.name().to_string(),
                column_type: logical_type_for(physical, annotation, repeated),
                physical,
                fixed_width: physical.byte_width(),
                annotation,
                nullable: column.max_def_level() > 0,
                declared_type: declared.as_ref().and_then(|d| d[i]),
            });
        }

        Ok(Self {
            columns,
            row_groups,
            row_count: total,
            created_by: file.created_by().map(str::to_string),
            table_name: kv_value(kv, TABLE_NAME_KEY).map(str::to_string),
        })
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    pub fn row_group_count(&self) -> usize {
        self.row_groups.len()
    }

    pub fn row_group_row_count(&self, row_group: usize) -> Result<u64, CodecError> {
        self.row_groups
            .get(row_group)
            .copied()
            .ok_or(CodecError::OutOfRange {
                what: "row group",
                index: row_group,
                len: self.row_groups.len(),
            })
    }

    pub fn column(&self, index: usize) -> Result<&ColumnDescriptor, CodecError> {
        self.columns.get(index).ok_or(CodecError::OutOfRange {
            what: "column",
            index,
            len: self.columns.len(),
        })
    }

    pub fn columns(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter()
    }

    pub fn column_name(&self, index: usize) -> Result<&str, CodecError> {
        Ok(&self.column(index)?.name)
    }

    pub fn column_id(&self, index: usize) -> Result<i32, CodecError> {
        Ok(self.column(index)?.id)
    }

    /// Packed `(length << 32) | code` value.
    pub fn column_physical_type(&self, index: usize) -> Result<i64, CodecError> {
        Ok(self.column(index)?.physical.pack())
    }

    pub fn column_type(&self, index: usize) -> Result<Option<ColumnType>, CodecError> {
        Ok(self.column(index)?.column_type)
    }

    /// Type recorded by the writer. Advisory: decoding always uses the caller's target.
    pub fn declared_column_type(&self, index: usize) -> Result<Option<ColumnType>, CodecError> {
        Ok(self.column(index)?.declared_type)
    }

    pub fn created_by(&self) -> Option<&str> {
        self.created_by.as_deref()
    }

    pub fn table_name(&self) -> Option<&str> {
        self.table_name.as_deref()
    }
}

/// Serializes the declared types in the form [`PartitionMetadata::from_parquet`] reads back.
pub fn column_types_entry(columns: &[ColumnDescriptor]) -> Option<KeyValue> {
    let declared: Vec<Option<ColumnType>> = columns.iter().map(|c| c.declared_type).collect();
    serde_json::to_string(&declared)
        .ok()
        .map(|json| KeyValue::new(COLUMN_TYPES_KEY.to_string(), json))
}

fn kv_value<'a>(kv: Option<&'a Vec<KeyValue>>, key: &str) -> Option<&'a str> {
    kv?.iter()
        .find(|entry| entry.key == key)
        .and_then(|entry| entry.value.as_deref())
}

fn declared_types(kv: Option<&Vec<KeyValue>>, column_count: usize) -> Option<Vec<Option<ColumnType>>> {
    let raw = kv_value(kv, COLUMN_TYPES_KEY)?;
    match serde_json::from_str::<Vec<Option<ColumnType>>>(raw) {
        Ok(types) if types.len() == column_count => Some(types),
        Ok(types) => {
            debug!(
                target: "partition_codec::decode",
                recorded = types.len(),
                column_count,
                "Ignoring column type record of wrong length"
            );
            None
        }
        Err(e) => {
            debug!(target: "partition_codec::decode", error = %e, "Ignoring unreadable column type record");
            None
        }
    }
}

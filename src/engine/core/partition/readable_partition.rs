use crate::engine::core::column::ColumnChunkBuffers;
use crate::engine::core::partition::SymbolTable;
use crate::engine::errors::CodecError;
use crate::engine::types::ColumnType;

/// Borrowed view of one partition column in the engine's native layout.
#[derive(Debug, Clone, Copy)]
pub struct ColumnView<'a> {
    pub name: &'a str,
    pub column_type: ColumnType,
    pub data: &'a [u8],
    /// Per-row `u64` offsets into `data`; empty for fixed-width columns.
    pub aux: &'a [u8],
    pub symbols: Option<&'a SymbolTable>,
}

/// What the encoder needs from a stored partition. Column data may live on
/// the heap or in a mapped file; the codec only borrows it.
pub trait ReadablePartition {
    fn table_name(&self) -> &str;
    fn column_count(&self) -> usize;
    fn row_count(&self) -> usize;
    fn column(&self, index: usize) -> Option<ColumnView<'_>>;
}

#[derive(Debug, Clone)]
pub struct PartitionColumn {
    name: String,
    column_type: ColumnType,
    buffers: ColumnChunkBuffers,
}

impl PartitionColumn {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn buffers(&self) -> &ColumnChunkBuffers {
        &self.buffers
    }
}

/// In-memory partition, mostly built from decoded chunks or by tests.
#[derive(Debug, Clone)]
pub struct Partition {
    table_name: String,
    row_count: usize,
    columns: Vec<PartitionColumn>,
}

impl Partition {
    pub fn builder(table_name: &str) -> PartitionBuilder {
        PartitionBuilder::new(table_name)
    }

    pub fn columns(&self) -> &[PartitionColumn] {
        &self.columns
    }
}

impl ReadablePartition for Partition {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn row_count(&self) -> usize {
        self.row_count
    }

    fn column(&self, index: usize) -> Option<ColumnView<'_>> {
        let column = self.columns.get(index)?;
        Some(ColumnView {
            name: &column.name,
            column_type: column.column_type,
            data: column.buffers.data(),
            aux: column.buffers.aux(),
            symbols: (column.column_type == ColumnType::Symbol)
                .then(|| column.buffers.symbols()),
        })
    }
}

pub struct PartitionBuilder {
    table_name: String,
    columns: Vec<PartitionColumn>,
}

impl PartitionBuilder {
    pub fn new(table_name: &str) -> Self {
        Self {
            table_name: table_name.to_string(),
            columns: Vec::new(),
        }
    }

    /// Adds a column whose buffers were filled through the `push_*` helpers.
    pub fn column(mut self, name: &str, buffers: ColumnChunkBuffers) -> Self {
        let column_type = buffers.column_type().unwrap_or(ColumnType::Binary);
        self.columns.push(PartitionColumn {
            name: name.to_string(),
            column_type,
            buffers,
        });
        self
    }

    /// Fails when columns disagree on row count.
    pub fn build(self) -> Result<Partition, CodecError> {
        let row_count = self
            .columns
            .first()
            .map(|c| c.buffers.row_count())
            .unwrap_or(0);
        for (i, column) in self.columns.iter().enumerate() {
            if column.buffers.column_type().is_none() {
                return Err(CodecError::invalid_data(i, "column buffers have no type"));
            }
            if column.buffers.row_count() != row_count {
                return Err(CodecError::invalid_data(
                    i,
                    format!(
                        "column {} has {} rows, expected {}",
                        column.name,
                        column.buffers.row_count(),
                        row_count
                    ),
                ));
            }
        }
        Ok(Partition {
            table_name: self.table_name,
            row_count,
            columns: self.columns,
        })
    }
}

use crate::engine::core::partition::Partition;
use crate::engine::types::{ALL_COLUMN_TYPES, ColumnType};

use super::column_buffers_factory::ColumnBuffersFactory;

pub struct PartitionFactory {
    table: String,
    rows: usize,
    seed: u64,
    columns: Vec<(String, ColumnType)>,
}

impl PartitionFactory {
    pub fn new() -> Self {
        Self {
            table: "trades".into(),
            rows: 32,
            seed: 7,
            columns: vec![
                ("ts".into(), ColumnType::Timestamp),
                ("symbol".into(), ColumnType::Symbol),
                ("price".into(), ColumnType::Double),
            ],
        }
    }

    pub fn with_table(mut self, table: &str) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_columns(mut self, columns: &[(&str, ColumnType)]) -> Self {
        self.columns = columns
            .iter()
            .map(|(name, t)| (name.to_string(), *t))
            .collect();
        self
    }

    /// One column per engine type, named after the type.
    pub fn with_all_types(mut self) -> Self {
        self.columns = ALL_COLUMN_TYPES
            .iter()
            .map(|t| (format!("col_{}", t), *t))
            .collect();
        self
    }

    pub fn create(self) -> Partition {
        let mut builder = Partition::builder(&self.table);
        for (i, (name, column_type)) in self.columns.iter().enumerate() {
            let buffers = ColumnBuffersFactory::new(*column_type)
                .with_rows(self.rows)
                .with_seed(self.seed.wrapping_add(i as u64))
                .create();
            builder = builder.column(name, buffers);
        }
        builder.build().expect("factory columns share a row count")
    }
}

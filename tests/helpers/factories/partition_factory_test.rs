use crate::engine::core::partition::ReadablePartition;
use crate::engine::types::{ALL_COLUMN_TYPES, ColumnType};
use crate::test_helpers::factory::Factory;

#[test]
fn default_partition_has_three_columns() {
    let partition = Factory::partition().create();
    assert_eq!(partition.table_name(), "trades");
    assert_eq!(partition.column_count(), 3);
    assert_eq!(partition.row_count(), 32);
    assert_eq!(partition.column(1).unwrap().column_type, ColumnType::Symbol);
}

#[test]
fn all_types_partition_covers_every_type() {
    let partition = Factory::partition().with_all_types().with_rows(5).create();
    assert_eq!(partition.column_count(), ALL_COLUMN_TYPES.len());
    for (i, t) in ALL_COLUMN_TYPES.iter().enumerate() {
        let view = partition.column(i).unwrap();
        assert_eq!(view.column_type, *t);
        assert_eq!(view.name, format!("col_{}", t));
    }
}

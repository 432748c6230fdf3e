use crate::engine::types::ColumnType;
use crate::test_helpers::factory::Factory;

#[test]
fn same_seed_gives_same_buffers() {
    let a = Factory::column(ColumnType::Varchar).with_seed(3).create();
    let b = Factory::column(ColumnType::Varchar).with_seed(3).create();
    assert_eq!(a.data(), b.data());
    assert_eq!(a.aux(), b.aux());
}

#[test]
fn bounds_lead_and_nulls_follow_the_interval() {
    let buffers = Factory::column(ColumnType::Int)
        .with_rows(10)
        .with_null_every(4)
        .create();
    assert_eq!(buffers.row_count(), 10);
    assert_eq!(buffers.fixed_value(0), Some(&(i32::MIN + 1).to_le_bytes()[..]));
    assert_eq!(buffers.fixed_value(1), Some(&i32::MAX.to_le_bytes()[..]));
    assert_eq!(buffers.fixed_value(3), Some(&i32::MIN.to_le_bytes()[..]));
    assert_eq!(buffers.fixed_value(7), Some(&i32::MIN.to_le_bytes()[..]));
}

#[test]
fn non_nullable_types_never_get_nulls() {
    let buffers = Factory::column(ColumnType::Short).with_rows(20).create();
    assert_eq!(buffers.row_count(), 20);
    assert_eq!(buffers.data().len(), 40);
}

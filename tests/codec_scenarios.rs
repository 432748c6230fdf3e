use partition_codec::engine::CodecError;
use partition_codec::engine::codec;
use partition_codec::engine::core::{
    ColumnChunkBuffers, EncodeOptions, PackedPhysicalType, Partition, PartitionDecoder,
    PartitionEncoder, PhysicalType, ReadablePartition,
};
use partition_codec::engine::types::{ALL_COLUMN_TYPES, ColumnType};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn generate(column_type: ColumnType, rows: usize, rng: &mut StdRng) -> ColumnChunkBuffers {
    let mut out = ColumnChunkBuffers::for_type(column_type);
    for row in 0..rows {
        if column_type.is_nullable() && row % 11 == 10 {
            out.push_null();
            continue;
        }
        match column_type {
            ColumnType::Boolean => out.push_bool(row % 3 == 0),
            ColumnType::Byte | ColumnType::GeoByte => out.push_i8(rng.gen_range(0..=i8::MAX)),
            ColumnType::Short | ColumnType::GeoShort => out.push_i16(rng.gen_range(0..=i16::MAX)),
            ColumnType::Char => out.push_u16(rng.gen_range(0x20..0x7f)),
            ColumnType::Int => out.push_i32(rng.gen_range(-1_000_000..1_000_000)),
            ColumnType::GeoInt => out.push_i32(rng.gen_range(0..=i32::MAX)),
            ColumnType::IPv4 => out.push_u32(rng.gen_range(1..=u32::MAX)),
            ColumnType::Long | ColumnType::GeoLong => out.push_i64(rng.gen_range(0..=i64::MAX)),
            ColumnType::Date => out.push_i64(1_700_000_000_000 + row as i64 * 86_400_000),
            ColumnType::Timestamp => out.push_i64(1_700_000_000_000_000 + row as i64 * 1_000),
            ColumnType::Float => out.push_f32(rng.gen_range(-100.0f32..100.0)),
            ColumnType::Double => out.push_f64(rng.gen_range(-1.0e9f64..1.0e9)),
            ColumnType::String | ColumnType::Varchar => {
                out.push_str(Some(&format!("row-{}-{}", row, rng.gen_range(0..1000))))
            }
            ColumnType::Symbol => out.push_symbol(Some(["bid", "ask", "mid"][row % 3])),
            ColumnType::Binary => {
                let len = rng.gen_range(0..16);
                let bytes: Vec<u8> = (0..len).map(|_| rng.r#gen()).collect();
                out.push_var(Some(&bytes));
            }
            ColumnType::Uuid | ColumnType::Long128 => {
                let mut bytes = [0u8; 16];
                rng.fill(&mut bytes[..]);
                out.push_fixed(&bytes);
            }
            ColumnType::Long256 => {
                let mut bytes = [0u8; 32];
                rng.fill(&mut bytes[..]);
                out.push_fixed(&bytes);
            }
        }
    }
    out
}

/// Every engine type once, plus a second long and symbol column.
fn wide_partition(table: &str, rows: usize, seed: u64) -> Partition {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut builder = Partition::builder(table);
    for t in ALL_COLUMN_TYPES {
        builder = builder.column(&format!("c_{}", t), generate(t, rows, &mut rng));
    }
    builder = builder
        .column("extra_long", generate(ColumnType::Long, rows, &mut rng))
        .column("extra_symbol", generate(ColumnType::Symbol, rows, &mut rng));
    builder.build().unwrap()
}

fn expected_physical(t: ColumnType) -> PackedPhysicalType {
    match t {
        ColumnType::Boolean => PackedPhysicalType::new(PhysicalType::Boolean),
        ColumnType::Byte
        | ColumnType::Short
        | ColumnType::Char
        | ColumnType::Int
        | ColumnType::IPv4
        | ColumnType::GeoByte
        | ColumnType::GeoShort
        | ColumnType::GeoInt => PackedPhysicalType::new(PhysicalType::Int32),
        ColumnType::Long | ColumnType::Date | ColumnType::Timestamp | ColumnType::GeoLong => {
            PackedPhysicalType::new(PhysicalType::Int64)
        }
        ColumnType::Float => PackedPhysicalType::new(PhysicalType::Float),
        ColumnType::Double => PackedPhysicalType::new(PhysicalType::Double),
        ColumnType::String | ColumnType::Varchar | ColumnType::Symbol | ColumnType::Binary => {
            PackedPhysicalType::new(PhysicalType::ByteArray)
        }
        ColumnType::Uuid | ColumnType::Long128 => PackedPhysicalType::fixed(16),
        ColumnType::Long256 => PackedPhysicalType::fixed(32),
    }
}

/// The type a decoder reports for a column written from `t`.
fn expected_column_type(t: ColumnType) -> ColumnType {
    match t {
        ColumnType::GeoByte => ColumnType::Byte,
        ColumnType::Char | ColumnType::GeoShort => ColumnType::Short,
        ColumnType::IPv4 | ColumnType::GeoInt => ColumnType::Int,
        ColumnType::GeoLong => ColumnType::Long,
        ColumnType::String | ColumnType::Symbol => ColumnType::Varchar,
        other => other,
    }
}

fn encode(partition: &Partition, options: EncodeOptions) -> Vec<u8> {
    let mut buf = Vec::new();
    PartitionEncoder::new(options)
        .encode(partition, 0, &mut buf)
        .unwrap();
    buf
}

fn assert_column_matches(decoded: &ColumnChunkBuffers, original: &ColumnChunkBuffers, rows: std::ops::Range<usize>) {
    let column_type = original.column_type().unwrap();
    for (i, row) in rows.enumerate() {
        match column_type {
            ColumnType::Symbol => {
                assert_eq!(decoded.symbol_value(i), original.symbol_value(row), "row {row}")
            }
            t if t.is_var_size() => assert_eq!(
                decoded.var_value(i).unwrap(),
                original.var_value(row).unwrap(),
                "{t} row {row}"
            ),
            t => assert_eq!(decoded.fixed_value(i), original.fixed_value(row), "{t} row {row}"),
        }
    }
}

#[test]
fn wide_partition_lands_in_one_row_group() {
    let partition = wide_partition("quotes", 1001, 1);
    let decoder = PartitionDecoder::open(encode(&partition, EncodeOptions::default())).unwrap();
    let meta = decoder.metadata();

    assert_eq!(meta.row_count(), 1001);
    assert_eq!(meta.row_group_count(), 1);
    assert_eq!(meta.column_count(), 24);

    for (i, column) in partition.columns().iter().enumerate() {
        let expected = expected_physical(column.column_type());
        assert_eq!(
            meta.column_physical_type(i).unwrap(),
            expected.pack(),
            "{}",
            column.name()
        );
        assert_eq!(
            meta.column_type(i).unwrap(),
            Some(expected_column_type(column.column_type())),
            "{}",
            column.name()
        );
        assert_eq!(meta.column_id(i).unwrap(), i as i32);
        assert_eq!(meta.column_name(i).unwrap(), column.name());

        let mut out = ColumnChunkBuffers::new();
        decoder
            .decode_column_chunk(0, i, column.column_type(), &mut out)
            .unwrap();
        assert_column_matches(&out, column.buffers(), 0..1001);
    }
}

#[test]
fn separate_files_decode_independently() {
    let first = wide_partition("first", 40, 2);
    let second = Partition::builder("second")
        .column("v", generate(ColumnType::Double, 7, &mut StdRng::seed_from_u64(3)))
        .build()
        .unwrap();

    let first_bytes = encode(&first, EncodeOptions::default());
    let second_bytes = encode(&second, EncodeOptions::default().with_row_group_size(3));

    let a = PartitionDecoder::open(first_bytes).unwrap();
    let b = PartitionDecoder::open(second_bytes).unwrap();

    assert_eq!(a.metadata().table_name(), Some("first"));
    assert_eq!(a.metadata().row_count(), 40);
    assert_eq!(a.metadata().column_count(), 24);
    assert_eq!(b.metadata().table_name(), Some("second"));
    assert_eq!(b.metadata().row_count(), 7);
    assert_eq!(b.metadata().row_group_count(), 3);
    assert_eq!(b.metadata().column_count(), 1);

    let v = b.decode_column(2, 0).unwrap();
    assert_eq!(v.row_count(), 1);
    assert_column_matches(&v, second.columns()[0].buffers(), 6..7);
    let first_double = a.decode_column(0, 9).unwrap();
    assert_column_matches(&first_double, first.columns()[9].buffers(), 0..40);
}

#[test]
fn row_group_counts_sum_to_total() {
    let partition = wide_partition("split", 257, 4);
    let decoder = PartitionDecoder::open(encode(
        &partition,
        EncodeOptions::default().with_row_group_size(64),
    ))
    .unwrap();
    let meta = decoder.metadata();
    assert_eq!(meta.row_group_count(), 5);

    let mut sum = 0;
    let mut start = 0usize;
    for rg in 0..meta.row_group_count() {
        let rows = meta.row_group_row_count(rg).unwrap();
        sum += rows;
        let end = start + rows as usize;
        for (i, column) in partition.columns().iter().enumerate() {
            let mut out = ColumnChunkBuffers::new();
            decoder
                .decode_column_chunk(rg, i, column.column_type(), &mut out)
                .unwrap();
            assert_eq!(out.row_count(), rows as usize);
            assert_column_matches(&out, column.buffers(), start..end);
        }
        start = end;
    }
    assert_eq!(sum, meta.row_count());
    assert_eq!(sum, partition.row_count() as u64);
}

#[test]
fn truncated_file_fails_to_open() {
    let partition = wide_partition("cut", 100, 5);
    let bytes = encode(&partition, EncodeOptions::default());
    let err = codec::open_for_read(bytes[..bytes.len() - 10].to_vec()).unwrap_err();
    assert!(matches!(err, CodecError::MalformedFile { .. }), "{err}");
}

#[test]
fn wide_value_into_narrow_target_overflows() {
    let mut values = ColumnChunkBuffers::for_type(ColumnType::Long);
    values.push_i64(7);
    values.push_i64(1 << 40);
    let partition = Partition::builder("n").column("v", values).build().unwrap();
    let handle = codec::open_for_read(encode(&partition, EncodeOptions::default())).unwrap();

    let err = codec::decode_column(&handle, 0, 0, ColumnType::Int).unwrap_err();
    assert!(matches!(
        err,
        CodecError::NarrowingOverflow { column: 0, row_group: 0, row: 1, value, target: ColumnType::Int }
            if value == 1 << 40
    ));
}

#[test]
fn column_group_selection_writes_a_subset() {
    let partition = wide_partition("subset", 30, 6);
    let selection = vec![21, 7, 11];
    let decoder = PartitionDecoder::open(encode(
        &partition,
        EncodeOptions::default().with_columns(selection.clone()),
    ))
    .unwrap();
    let meta = decoder.metadata();
    assert_eq!(meta.column_count(), 3);
    for (id, ordinal) in selection.iter().enumerate() {
        let column = &partition.columns()[*ordinal];
        assert_eq!(meta.column_id(id).unwrap(), id as i32);
        assert_eq!(meta.column_name(id).unwrap(), column.name());
        assert_eq!(meta.declared_column_type(id).unwrap(), Some(column.column_type()));

        let mut out = ColumnChunkBuffers::new();
        decoder
            .decode_column_chunk(0, id, column.column_type(), &mut out)
            .unwrap();
        assert_column_matches(&out, column.buffers(), 0..30);
    }
}

use parquet::basic::Compression;
use parquet::file::properties::EnabledStatistics;
use parquet::format::KeyValue;
use parquet::schema::types::ColumnPath;

use crate::engine::core::write::encode_options::{CREATED_BY, CompressionKind, EncodeOptions};
use crate::shared::config::CodecConfig;

#[test]
fn compression_names_parse_case_insensitively() {
    assert_eq!(
        CompressionKind::from_name("ZSTD", 7),
        Some(CompressionKind::Zstd(7))
    );
    assert_eq!(
        CompressionKind::from_name("snappy", 0),
        Some(CompressionKind::Snappy)
    );
    assert_eq!(
        CompressionKind::from_name("lz4", 0),
        Some(CompressionKind::Lz4Raw)
    );
    assert_eq!(
        CompressionKind::from_name("none", 0),
        Some(CompressionKind::Uncompressed)
    );
    assert_eq!(CompressionKind::from_name("brotli", 0), None);
}

#[test]
fn from_config_copies_settings() {
    let cfg = CodecConfig {
        row_group_size: Some(1000),
        data_page_size: 4096,
        compression: "zstd".into(),
        compression_level: 9,
        statistics: false,
        dictionary: true,
    };
    let options = EncodeOptions::from_config(&cfg);
    assert_eq!(options.row_group_size, Some(1000));
    assert_eq!(options.data_page_size, 4096);
    assert_eq!(options.compression, CompressionKind::Zstd(9));
    assert!(!options.statistics);
    assert!(options.dictionary);
    assert_eq!(options.columns, None);
}

#[test]
fn from_config_falls_back_on_bad_values() {
    let cfg = CodecConfig {
        row_group_size: Some(0),
        data_page_size: 0,
        compression: "lzma".into(),
        ..CodecConfig::default()
    };
    let options = EncodeOptions::from_config(&cfg);
    assert_eq!(options.row_group_size, None);
    assert_eq!(options.data_page_size, 1);
    assert_eq!(options.compression, CompressionKind::Uncompressed);
}

#[test]
fn builder_methods_chain() {
    let options = EncodeOptions::default()
        .with_row_group_size(0)
        .with_compression(CompressionKind::Snappy)
        .with_columns(vec![3, 1])
        .with_statistics(false)
        .with_dictionary(true);
    assert_eq!(options.row_group_size, Some(1));
    assert_eq!(options.compression, CompressionKind::Snappy);
    assert_eq!(options.columns, Some(vec![3, 1]));
    assert!(!options.statistics);
    assert!(options.dictionary);
}

#[test]
fn writer_properties_reflect_options() {
    let options = EncodeOptions::default()
        .with_compression(CompressionKind::Snappy)
        .with_statistics(false);
    let props = options.writer_properties(vec![KeyValue::new("k".to_string(), "v".to_string())]);

    let path = ColumnPath::from("price");
    assert_eq!(props.created_by(), CREATED_BY);
    assert_eq!(props.compression(&path), Compression::SNAPPY);
    assert!(!props.dictionary_enabled(&path));
    assert_eq!(props.statistics_enabled(&path), EnabledStatistics::None);
    assert_eq!(props.data_page_size_limit(), 1024 * 1024);
    let kv = props.key_value_metadata().unwrap();
    assert_eq!(kv.len(), 1);
    assert_eq!(kv[0].key, "k");
}

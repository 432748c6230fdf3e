use std::sync::Arc;

use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::{EnabledStatistics, WriterProperties, WriterVersion};
use parquet::format::KeyValue;

use crate::shared::config::CodecConfig;

pub const CREATED_BY: &str = concat!("partition_codec version ", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionKind {
    Uncompressed,
    Snappy,
    Zstd(i32),
    Lz4Raw,
}

impl CompressionKind {
    /// Parses a codec name as written in configuration.
    pub fn from_name(name: &str, level: i32) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "uncompressed" | "none" => Some(CompressionKind::Uncompressed),
            "snappy" => Some(CompressionKind::Snappy),
            "zstd" => Some(CompressionKind::Zstd(level)),
            "lz4_raw" | "lz4" => Some(CompressionKind::Lz4Raw),
            _ => None,
        }
    }

    fn to_parquet(self) -> Compression {
        match self {
            CompressionKind::Uncompressed => Compression::UNCOMPRESSED,
            CompressionKind::Snappy => Compression::SNAPPY,
            CompressionKind::Zstd(level) => {
                Compression::ZSTD(ZstdLevel::try_new(level).unwrap_or_default())
            }
            CompressionKind::Lz4Raw => Compression::LZ4_RAW,
        }
    }
}

/// Knobs for one encode call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    pub row_group_size: Option<usize>,
    pub data_page_size: usize,
    pub compression: CompressionKind,
    pub statistics: bool,
    pub dictionary: bool,
    /// Partition column ordinals to write, in output order. `None` writes all.
    pub columns: Option<Vec<usize>>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            row_group_size: None,
            data_page_size: 1024 * 1024,
            compression: CompressionKind::Uncompressed,
            statistics: true,
            dictionary: false,
            columns: None,
        }
    }
}

impl EncodeOptions {
    pub fn from_config(cfg: &CodecConfig) -> Self {
        Self {
            row_group_size: cfg.row_group_size.filter(|n| *n > 0),
            data_page_size: cfg.data_page_size.max(1),
            compression: CompressionKind::from_name(&cfg.compression, cfg.compression_level)
                .unwrap_or(CompressionKind::Uncompressed),
            statistics: cfg.statistics,
            dictionary: cfg.dictionary,
            columns: None,
        }
    }

    pub fn with_row_group_size(mut self, rows: usize) -> Self {
        self.row_group_size = Some(rows.max(1));
        self
    }

    pub fn with_compression(mut self, compression: CompressionKind) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_columns(mut self, columns: Vec<usize>) -> Self {
        self.columns = Some(columns);
        self
    }

    pub fn with_statistics(mut self, enabled: bool) -> Self {
        self.statistics = enabled;
        self
    }

    pub fn with_dictionary(mut self, enabled: bool) -> Self {
        self.dictionary = enabled;
        self
    }

    pub(crate) fn writer_properties(&self, key_value: Vec<KeyValue>) -> Arc<WriterProperties> {
        let statistics = if self.statistics {
            EnabledStatistics::Chunk
        } else {
            EnabledStatistics::None
        };
        Arc::new(
            WriterProperties::builder()
                .set_writer_version(WriterVersion::PARQUET_1_0)
                .set_created_by(CREATED_BY.to_string())
                .set_compression(self.compression.to_parquet())
                .set_dictionary_enabled(self.dictionary)
                .set_statistics_enabled(statistics)
                .set_data_page_size_limit(self.data_page_size)
                .set_key_value_metadata(Some(key_value))
                .build(),
        )
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Native column types of the host engine.
///
/// The encoder records variants by name in the file's key/value metadata, so
/// variants must never be renamed. The numeric tag is stable as well.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Boolean = 1,
    Byte = 2,
    Short = 3,
    Char = 4,
    Int = 5,
    Long = 6,
    Date = 7,
    Timestamp = 8,
    Float = 9,
    Double = 10,
    String = 11,
    Symbol = 12,
    Long256 = 13,
    GeoByte = 14,
    GeoShort = 15,
    GeoInt = 16,
    GeoLong = 17,
    Binary = 18,
    Uuid = 19,
    Long128 = 24,
    IPv4 = 25,
    Varchar = 26,
}

pub const ALL_COLUMN_TYPES: [ColumnType; 22] = [
    ColumnType::Boolean,
    ColumnType::Byte,
    ColumnType::Short,
    ColumnType::Char,
    ColumnType::Int,
    ColumnType::Long,
    ColumnType::Date,
    ColumnType::Timestamp,
    ColumnType::Float,
    ColumnType::Double,
    ColumnType::String,
    ColumnType::Symbol,
    ColumnType::Long256,
    ColumnType::GeoByte,
    ColumnType::GeoShort,
    ColumnType::GeoInt,
    ColumnType::GeoLong,
    ColumnType::Binary,
    ColumnType::Uuid,
    ColumnType::Long128,
    ColumnType::IPv4,
    ColumnType::Varchar,
];

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Boolean => "boolean",
            ColumnType::Byte => "byte",
            ColumnType::Short => "short",
            ColumnType::Char => "char",
            ColumnType::Int => "int",
            ColumnType::Long => "long",
            ColumnType::Date => "date",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Float => "float",
            ColumnType::Double => "double",
            ColumnType::String => "string",
            ColumnType::Symbol => "symbol",
            ColumnType::Long256 => "long256",
            ColumnType::GeoByte => "geobyte",
            ColumnType::GeoShort => "geoshort",
            ColumnType::GeoInt => "geoint",
            ColumnType::GeoLong => "geolong",
            ColumnType::Binary => "binary",
            ColumnType::Uuid => "uuid",
            ColumnType::Long128 => "long128",
            ColumnType::IPv4 => "ipv4",
            ColumnType::Varchar => "varchar",
        }
    }

    pub fn tag(&self) -> u8 {
        *self as u8
    }

    /// Bytes per row in the native data buffer, or `None` for var-width types.
    /// Symbol columns store an `i32` key per row.
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            ColumnType::Boolean | ColumnType::Byte | ColumnType::GeoByte => Some(1),
            ColumnType::Short | ColumnType::Char | ColumnType::GeoShort => Some(2),
            ColumnType::Int
            | ColumnType::Float
            | ColumnType::IPv4
            | ColumnType::GeoInt
            | ColumnType::Symbol => Some(4),
            ColumnType::Long
            | ColumnType::Date
            | ColumnType::Timestamp
            | ColumnType::Double
            | ColumnType::GeoLong => Some(8),
            ColumnType::Uuid | ColumnType::Long128 => Some(16),
            ColumnType::Long256 => Some(32),
            ColumnType::String | ColumnType::Varchar | ColumnType::Binary => None,
        }
    }

    pub fn is_var_size(&self) -> bool {
        matches!(
            self,
            ColumnType::String | ColumnType::Varchar | ColumnType::Binary
        )
    }

    pub fn is_geohash(&self) -> bool {
        matches!(
            self,
            ColumnType::GeoByte | ColumnType::GeoShort | ColumnType::GeoInt | ColumnType::GeoLong
        )
    }

    /// Boolean, byte, short and char have no null representation in the engine.
    pub fn is_nullable(&self) -> bool {
        !matches!(
            self,
            ColumnType::Boolean | ColumnType::Byte | ColumnType::Short | ColumnType::Char
        )
    }

    /// Integer-like types share the INT32/INT64 storage path and the narrowing rules.
    pub fn is_integer_like(&self) -> bool {
        matches!(
            self,
            ColumnType::Byte
                | ColumnType::Short
                | ColumnType::Char
                | ColumnType::Int
                | ColumnType::Long
                | ColumnType::Date
                | ColumnType::Timestamp
                | ColumnType::IPv4
                | ColumnType::GeoByte
                | ColumnType::GeoShort
                | ColumnType::GeoInt
                | ColumnType::GeoLong
        )
    }

    /// Inclusive value range accepted when an integer is narrowed into this type.
    pub fn integer_range(&self) -> Option<(i64, i64)> {
        match self {
            ColumnType::Byte | ColumnType::GeoByte => Some((i8::MIN as i64, i8::MAX as i64)),
            ColumnType::Short | ColumnType::GeoShort => Some((i16::MIN as i64, i16::MAX as i64)),
            ColumnType::Char => Some((0, u16::MAX as i64)),
            ColumnType::Int | ColumnType::GeoInt => Some((i32::MIN as i64, i32::MAX as i64)),
            ColumnType::IPv4 => Some((0, u32::MAX as i64)),
            ColumnType::Long
            | ColumnType::Date
            | ColumnType::Timestamp
            | ColumnType::GeoLong => Some((i64::MIN, i64::MAX)),
            _ => None,
        }
    }

    /// Little-endian bytes of the null sentinel for fixed-width types.
    pub fn null_value(&self) -> &'static [u8] {
        match self {
            ColumnType::Boolean | ColumnType::Byte => &BYTE_NULL,
            ColumnType::Short | ColumnType::Char => &SHORT_NULL,
            ColumnType::Int => &INT_NULL,
            ColumnType::Long | ColumnType::Date | ColumnType::Timestamp => &LONG_NULL,
            ColumnType::Float => &FLOAT_NULL,
            ColumnType::Double => &DOUBLE_NULL,
            ColumnType::IPv4 => &IPV4_NULL,
            ColumnType::GeoByte => &GEO_BYTE_NULL,
            ColumnType::GeoShort => &GEO_SHORT_NULL,
            ColumnType::GeoInt => &GEO_INT_NULL,
            ColumnType::GeoLong => &GEO_LONG_NULL,
            ColumnType::Uuid | ColumnType::Long128 => &LONG128_NULL,
            ColumnType::Long256 => &LONG256_NULL,
            ColumnType::Symbol => &SYMBOL_NULL,
            ColumnType::String | ColumnType::Varchar | ColumnType::Binary => &[],
        }
    }

    /// True when a fixed-width native value equals this type's null sentinel.
    /// Float and double treat every NaN as null.
    pub fn is_null_value(&self, value: &[u8]) -> bool {
        if !self.is_nullable() {
            return false;
        }
        match self {
            ColumnType::Float => value
                .try_into()
                .map(|b: [u8; 4]| f32::from_le_bytes(b).is_nan())
                .unwrap_or(false),
            ColumnType::Double => value
                .try_into()
                .map(|b: [u8; 8]| f64::from_le_bytes(b).is_nan())
                .unwrap_or(false),
            ColumnType::Symbol => value
                .try_into()
                .map(|b: [u8; 4]| i32::from_le_bytes(b) < 0)
                .unwrap_or(false),
            _ => value == self.null_value(),
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        ALL_COLUMN_TYPES.iter().copied().find(|t| t.tag() == tag)
    }
}

const BYTE_NULL: [u8; 1] = [0];
const SHORT_NULL: [u8; 2] = 0i16.to_le_bytes();
const INT_NULL: [u8; 4] = i32::MIN.to_le_bytes();
const LONG_NULL: [u8; 8] = i64::MIN.to_le_bytes();
const FLOAT_NULL: [u8; 4] = f32::NAN.to_le_bytes();
const DOUBLE_NULL: [u8; 8] = f64::NAN.to_le_bytes();
const IPV4_NULL: [u8; 4] = 0u32.to_le_bytes();
const GEO_BYTE_NULL: [u8; 1] = (-1i8).to_le_bytes();
const GEO_SHORT_NULL: [u8; 2] = (-1i16).to_le_bytes();
const GEO_INT_NULL: [u8; 4] = (-1i32).to_le_bytes();
const GEO_LONG_NULL: [u8; 8] = (-1i64).to_le_bytes();
const SYMBOL_NULL: [u8; 4] = (-1i32).to_le_bytes();
const LONG128_NULL: [u8; 16] = repeat_long_null::<16>();
const LONG256_NULL: [u8; 32] = repeat_long_null::<32>();

const fn repeat_long_null<const N: usize>() -> [u8; N] {
    let limb = i64::MIN.to_le_bytes();
    let mut out = [0u8; N];
    let mut i = 0;
    while i < N {
        out[i] = limb[i % 8];
        i += 1;
    }
    out
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        ALL_COLUMN_TYPES
            .iter()
            .copied()
            .find(|t| t.as_str() == lowered)
            .ok_or(())
    }
}

impl TryFrom<u8> for ColumnType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ColumnType::from_tag(value).ok_or(())
    }
}

use parquet::basic::Type as ParquetPhysicalType;

/// Parquet physical storage types, numbered as in the Thrift `Type` enum.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhysicalType {
    Boolean = 0,
    Int32 = 1,
    Int64 = 2,
    Int96 = 3,
    Float = 4,
    Double = 5,
    ByteArray = 6,
    FixedLenByteArray = 7,
}

impl PhysicalType {
    pub fn code(&self) -> u32 {
        *self as u32
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(PhysicalType::Boolean),
            1 => Some(PhysicalType::Int32),
            2 => Some(PhysicalType::Int64),
            3 => Some(PhysicalType::Int96),
            4 => Some(PhysicalType::Float),
            5 => Some(PhysicalType::Double),
            6 => Some(PhysicalType::ByteArray),
            7 => Some(PhysicalType::FixedLenByteArray),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PhysicalType::Boolean => "BOOLEAN",
            PhysicalType::Int32 => "INT32",
            PhysicalType::Int64 => "INT64",
            PhysicalType::Int96 => "INT96",
            PhysicalType::Float => "FLOAT",
            PhysicalType::Double => "DOUBLE",
            PhysicalType::ByteArray => "BYTE_ARRAY",
            PhysicalType::FixedLenByteArray => "FIXED_LEN_BYTE_ARRAY",
        }
    }
}

impl From<ParquetPhysicalType> for PhysicalType {
    fn from(t: ParquetPhysicalType) -> Self {
        match t {
            ParquetPhysicalType::BOOLEAN => PhysicalType::Boolean,
            ParquetPhysicalType::INT32 => PhysicalType::Int32,
            ParquetPhysicalType::INT64 => PhysicalType::Int64,
            ParquetPhysicalType::INT96 => PhysicalType::Int96,
            ParquetPhysicalType::FLOAT => PhysicalType::Float,
            ParquetPhysicalType::DOUBLE => PhysicalType::Double,
            ParquetPhysicalType::BYTE_ARRAY => PhysicalType::ByteArray,
            ParquetPhysicalType::FIXED_LEN_BYTE_ARRAY => PhysicalType::FixedLenByteArray,
        }
    }
}

impl From<PhysicalType> for ParquetPhysicalType {
    fn from(t: PhysicalType) -> Self {
        match t {
            PhysicalType::Boolean => ParquetPhysicalType::BOOLEAN,
            PhysicalType::Int32 => ParquetPhysicalType::INT32,
            PhysicalType::Int64 => ParquetPhysicalType::INT64,
            PhysicalType::Int96 => ParquetPhysicalType::INT96,
            PhysicalType::Float => ParquetPhysicalType::FLOAT,
            PhysicalType::Double => ParquetPhysicalType::DOUBLE,
            PhysicalType::ByteArray => ParquetPhysicalType::BYTE_ARRAY,
            PhysicalType::FixedLenByteArray => ParquetPhysicalType::FIXED_LEN_BYTE_ARRAY,
        }
    }
}

/// Physical type plus the byte length FIXED_LEN_BYTE_ARRAY carries.
///
/// Packed into one `i64` for metadata queries: low 32 bits hold the type
/// code, high 32 bits the fixed length (zero for every other type).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PackedPhysicalType {
    pub phys: PhysicalType,
    pub fixed_len: u32,
}

impl PackedPhysicalType {
    pub fn new(phys: PhysicalType) -> Self {
        Self { phys, fixed_len: 0 }
    }

    pub fn fixed(len: u32) -> Self {
        Self {
            phys: PhysicalType::FixedLenByteArray,
            fixed_len: len,
        }
    }

    /// Stored width of one value; `None` for bit-packed booleans and byte arrays.
    pub fn byte_width(&self) -> Option<usize> {
        match self.phys {
            PhysicalType::Int32 | PhysicalType::Float => Some(4),
            PhysicalType::Int64 | PhysicalType::Double => Some(8),
            PhysicalType::Int96 => Some(12),
            PhysicalType::FixedLenByteArray => Some(self.fixed_len as usize),
            PhysicalType::Boolean | PhysicalType::ByteArray => None,
        }
    }

    pub fn pack(&self) -> i64 {
        match self.phys {
            PhysicalType::FixedLenByteArray => {
                ((self.fixed_len as i64) << 32) | (self.phys.code() as i64)
            }
            other => other.code() as i64,
        }
    }

    pub fn unpack(value: i64) -> Option<Self> {
        let code = (value & 0xFFFF_FFFF) as u32;
        let fixed_len = ((value as u64) >> 32) as u32;
        let phys = PhysicalType::from_code(code)?;
        match phys {
            PhysicalType::FixedLenByteArray => Some(Self::fixed(fixed_len)),
            _ if fixed_len != 0 => None,
            _ => Some(Self::new(phys)),
        }
    }
}

impl std::fmt::Display for PackedPhysicalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.phys {
            PhysicalType::FixedLenByteArray => write!(f, "{}({})", self.phys.as_str(), self.fixed_len),
            _ => f.write_str(self.phys.as_str()),
        }
    }
}

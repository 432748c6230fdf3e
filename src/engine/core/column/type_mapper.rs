use std::sync::Arc;

use parquet::basic::{ConvertedType, LogicalType, Repetition, TimeUnit};
use parquet::schema::types::{ColumnDescriptor as ParquetColumn, Type};

use crate::engine::core::column::physical_type::{PackedPhysicalType, PhysicalType};
use crate::engine::types::ColumnType;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeUnitKind {
    Days,
    Millis,
    Micros,
    Nanos,
}

impl TimeUnitKind {
    fn nanos(&self) -> i64 {
        match self {
            TimeUnitKind::Days => 86_400_000_000_000,
            TimeUnitKind::Millis => 1_000_000,
            TimeUnitKind::Micros => 1_000,
            TimeUnitKind::Nanos => 1,
        }
    }

    fn to_parquet(self) -> TimeUnit {
        match self {
            TimeUnitKind::Millis => TimeUnit::MILLIS(Default::default()),
            TimeUnitKind::Micros => TimeUnit::MICROS(Default::default()),
            TimeUnitKind::Nanos | TimeUnitKind::Days => TimeUnit::NANOS(Default::default()),
        }
    }
}

/// The part of a Parquet logical/converted annotation the codec cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Annotation {
    None,
    Int { bits: u8, signed: bool },
    Date,
    Timestamp(TimeUnitKind),
    String,
    Uuid,
    Other,
}

impl Annotation {
    pub fn to_logical_type(self) -> Option<LogicalType> {
        match self {
            Annotation::Int { bits, signed } => Some(LogicalType::Integer {
                bit_width: bits as i8,
                is_signed: signed,
            }),
            Annotation::Date => Some(LogicalType::Date),
            Annotation::Timestamp(unit) => Some(LogicalType::Timestamp {
                is_adjusted_to_u_t_c: true,
                unit: unit.to_parquet(),
            }),
            Annotation::String => Some(LogicalType::String),
            Annotation::Uuid => Some(LogicalType::Uuid),
            Annotation::None | Annotation::Other => None,
        }
    }

    fn from_logical(logical: &LogicalType) -> Self {
        match logical {
            LogicalType::Integer {
                bit_width,
                is_signed,
            } => Annotation::Int {
                bits: *bit_width as u8,
                signed: *is_signed,
            },
            LogicalType::Date => Annotation::Date,
            LogicalType::Timestamp { unit, .. } => Annotation::Timestamp(match unit {
                TimeUnit::MILLIS(_) => TimeUnitKind::Millis,
                TimeUnit::MICROS(_) => TimeUnitKind::Micros,
                TimeUnit::NANOS(_) => TimeUnitKind::Nanos,
            }),
            LogicalType::String | LogicalType::Enum | LogicalType::Json => Annotation::String,
            LogicalType::Uuid => Annotation::Uuid,
            _ => Annotation::Other,
        }
    }

    fn from_converted(converted: ConvertedType) -> Self {
        match converted {
            ConvertedType::NONE => Annotation::None,
            ConvertedType::UTF8 | ConvertedType::ENUM | ConvertedType::JSON => Annotation::String,
            ConvertedType::INT_8 => Annotation::Int { bits: 8, signed: true },
            ConvertedType::INT_16 => Annotation::Int { bits: 16, signed: true },
            ConvertedType::INT_32 => Annotation::Int { bits: 32, signed: true },
            ConvertedType::INT_64 => Annotation::Int { bits: 64, signed: true },
            ConvertedType::UINT_8 => Annotation::Int { bits: 8, signed: false },
            ConvertedType::UINT_16 => Annotation::Int { bits: 16, signed: false },
            ConvertedType::UINT_32 => Annotation::Int { bits: 32, signed: false },
            ConvertedType::UINT_64 => Annotation::Int { bits: 64, signed: false },
            ConvertedType::DATE => Annotation::Date,
            ConvertedType::TIMESTAMP_MILLIS => Annotation::Timestamp(TimeUnitKind::Millis),
            ConvertedType::TIMESTAMP_MICROS => Annotation::Timestamp(TimeUnitKind::Micros),
            _ => Annotation::Other,
        }
    }

    fn is_unsigned(&self) -> bool {
        matches!(self, Annotation::Int { signed: false, .. })
    }

    fn time_unit(&self) -> Option<TimeUnitKind> {
        match self {
            Annotation::Date => Some(TimeUnitKind::Days),
            Annotation::Timestamp(unit) => Some(*unit),
            _ => None,
        }
    }
}

/// How a logical type is laid out in a Parquet file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParquetMapping {
    pub physical: PackedPhysicalType,
    pub annotation: Annotation,
    /// The engine has no null for this type, so the column is REQUIRED.
    pub required: bool,
}

pub fn mapping_for(column_type: ColumnType) -> ParquetMapping {
    use ColumnType::*;
    let int32 = PackedPhysicalType::new(PhysicalType::Int32);
    let int64 = PackedPhysicalType::new(PhysicalType::Int64);
    let byte_array = PackedPhysicalType::new(PhysicalType::ByteArray);
    let (physical, annotation) = match column_type {
        Boolean => (PackedPhysicalType::new(PhysicalType::Boolean), Annotation::None),
        Byte | GeoByte => (int32, Annotation::Int { bits: 8, signed: true }),
        Short | GeoShort => (int32, Annotation::Int { bits: 16, signed: true }),
        Char => (int32, Annotation::Int { bits: 16, signed: false }),
        Int => (int32, Annotation::Int { bits: 32, signed: true }),
        IPv4 | GeoInt => (int32, Annotation::None),
        Long => (int64, Annotation::Int { bits: 64, signed: true }),
        GeoLong => (int64, Annotation::None),
        Date => (int64, Annotation::Timestamp(TimeUnitKind::Millis)),
        Timestamp => (int64, Annotation::Timestamp(TimeUnitKind::Micros)),
        Float => (PackedPhysicalType::new(PhysicalType::Float), Annotation::None),
        Double => (PackedPhysicalType::new(PhysicalType::Double), Annotation::None),
        String | Varchar | Symbol => (byte_array, Annotation::String),
        Binary => (byte_array, Annotation::None),
        Uuid => (PackedPhysicalType::fixed(16), Annotation::Uuid),
        Long128 => (PackedPhysicalType::fixed(16), Annotation::None),
        Long256 => (PackedPhysicalType::fixed(32), Annotation::None),
    };
    ParquetMapping {
        physical,
        annotation,
        required: !column_type.is_nullable(),
    }
}

/// Builds the flat Parquet schema field for one column.
pub fn parquet_field(
    column_type: ColumnType,
    name: &str,
    id: i32,
) -> parquet::errors::Result<Arc<Type>> {
    let mapping = mapping_for(column_type);
    let repetition = if mapping.required {
        Repetition::REQUIRED
    } else {
        Repetition::OPTIONAL
    };
    let mut builder = Type::primitive_type_builder(name, mapping.physical.phys.into())
        .with_repetition(repetition)
        .with_logical_type(mapping.annotation.to_logical_type())
        .with_id(Some(id));
    if mapping.physical.phys == PhysicalType::FixedLenByteArray {
        builder = builder.with_length(mapping.physical.fixed_len as i32);
    }
    Ok(Arc::new(builder.build()?))
}

/// Reads the annotation of a file column, falling back to the legacy
/// converted type when the writer left no logical type.
pub fn annotation_of(column: &ParquetColumn) -> Annotation {
    match column.logical_type() {
        Some(logical) => Annotation::from_logical(&logical),
        None => Annotation::from_converted(column.converted_type()),
    }
}

pub fn packed_physical_of(column: &ParquetColumn) -> PackedPhysicalType {
    let phys = PhysicalType::from(column.physical_type());
    match phys {
        PhysicalType::FixedLenByteArray => PackedPhysicalType::fixed(column.type_length().max(0) as u32),
        other => PackedPhysicalType::new(other),
    }
}

/// Inverse mapping: the logical type a file column reads back as, if any.
pub fn logical_type_for(
    physical: PackedPhysicalType,
    annotation: Annotation,
    repeated: bool,
) -> Option<ColumnType> {
    if repeated {
        return None;
    }
    match (physical.phys, annotation) {
        (PhysicalType::Boolean, Annotation::None) => Some(ColumnType::Boolean),
        (PhysicalType::Int32, Annotation::None) => Some(ColumnType::Int),
        (PhysicalType::Int32, Annotation::Int { bits, signed }) => match (bits, signed) {
            (8, true) => Some(ColumnType::Byte),
            // INT(16, unsigned) is how chars are stored; they report as Short
            // and read back as Char only when the caller asks for it.
            (8, false) | (16, _) => Some(ColumnType::Short),
            (32, true) => Some(ColumnType::Int),
            (32, false) => Some(ColumnType::Long),
            _ => None,
        },
        (PhysicalType::Int32, Annotation::Date) => Some(ColumnType::Date),
        (PhysicalType::Int64, Annotation::None) => Some(ColumnType::Long),
        (PhysicalType::Int64, Annotation::Int { bits: 64, signed: true }) => Some(ColumnType::Long),
        (PhysicalType::Int64, Annotation::Timestamp(TimeUnitKind::Millis)) => Some(ColumnType::Date),
        (PhysicalType::Int64, Annotation::Timestamp(_)) => Some(ColumnType::Timestamp),
        (PhysicalType::Float, Annotation::None) => Some(ColumnType::Float),
        (PhysicalType::Double, Annotation::None) => Some(ColumnType::Double),
        (PhysicalType::ByteArray, Annotation::String) => Some(ColumnType::Varchar),
        (PhysicalType::ByteArray, Annotation::None) => Some(ColumnType::Binary),
        (PhysicalType::FixedLenByteArray, Annotation::Uuid) if physical.fixed_len == 16 => {
            Some(ColumnType::Uuid)
        }
        (PhysicalType::FixedLenByteArray, Annotation::None) => match physical.fixed_len {
            16 => Some(ColumnType::Long128),
            32 => Some(ColumnType::Long256),
            _ => None,
        },
        _ => None,
    }
}

/// Rescaling applied to integer values on their way into a temporal target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeScale {
    None,
    Multiply(i64),
    Divide(i64),
}

impl TimeScale {
    fn between(from: TimeUnitKind, to: TimeUnitKind) -> Self {
        let (from, to) = (from.nanos(), to.nanos());
        if from > to {
            TimeScale::Multiply(from / to)
        } else if from < to {
            TimeScale::Divide(to / from)
        } else {
            TimeScale::None
        }
    }

    /// `None` when the rescaled value leaves the i64 range.
    pub fn apply(&self, value: i64) -> Option<i64> {
        match self {
            TimeScale::None => Some(value),
            TimeScale::Multiply(factor) => value.checked_mul(*factor),
            TimeScale::Divide(divisor) => Some(value.div_euclid(*divisor)),
        }
    }
}

/// Per-value conversion a decode will run, chosen from the stored physical
/// type, its annotation and the caller's target type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodePlan {
    Boolean,
    Integer { unsigned: bool, scale: TimeScale },
    Float { widen: bool },
    Double,
    Utf8,
    Symbol,
    Binary,
    FixedBytes { reverse: bool },
}

fn native_time_unit(target: ColumnType) -> Option<TimeUnitKind> {
    match target {
        ColumnType::Date => Some(TimeUnitKind::Millis),
        ColumnType::Timestamp => Some(TimeUnitKind::Micros),
        _ => None,
    }
}

pub fn decode_plan(
    physical: PackedPhysicalType,
    annotation: Annotation,
    target: ColumnType,
) -> Result<DecodePlan, String> {
    let plan = match (physical.phys, target) {
        (PhysicalType::Boolean, ColumnType::Boolean) => Some(DecodePlan::Boolean),
        (PhysicalType::Int32 | PhysicalType::Int64, t) if t.is_integer_like() => {
            // An INT32 read as IPv4 is a bit pattern, not a signed number.
            let unsigned = annotation.is_unsigned()
                || (physical.phys == PhysicalType::Int32 && t == ColumnType::IPv4);
            let scale = match (annotation.time_unit(), native_time_unit(t)) {
                (Some(from), Some(to)) => TimeScale::between(from, to),
                _ => TimeScale::None,
            };
            Some(DecodePlan::Integer { unsigned, scale })
        }
        (PhysicalType::Float, ColumnType::Float) => Some(DecodePlan::Float { widen: false }),
        (PhysicalType::Float, ColumnType::Double) => Some(DecodePlan::Float { widen: true }),
        (PhysicalType::Double, ColumnType::Double) => Some(DecodePlan::Double),
        (PhysicalType::ByteArray, ColumnType::String | ColumnType::Varchar) => {
            Some(DecodePlan::Utf8)
        }
        (PhysicalType::ByteArray, ColumnType::Symbol) => Some(DecodePlan::Symbol),
        (PhysicalType::ByteArray, ColumnType::Binary) => Some(DecodePlan::Binary),
        (PhysicalType::FixedLenByteArray, ColumnType::Uuid) if physical.fixed_len == 16 => {
            Some(DecodePlan::FixedBytes { reverse: true })
        }
        (PhysicalType::FixedLenByteArray, ColumnType::Long128) if physical.fixed_len == 16 => {
            Some(DecodePlan::FixedBytes { reverse: false })
        }
        (PhysicalType::FixedLenByteArray, ColumnType::Long256) if physical.fixed_len == 32 => {
            Some(DecodePlan::FixedBytes { reverse: false })
        }
        _ => None,
    };
    plan.ok_or_else(|| format!("cannot decode {} as {}", physical, target))
}

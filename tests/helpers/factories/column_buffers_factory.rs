use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::core::column::ColumnChunkBuffers;
use crate::engine::types::ColumnType;

const SYMBOLS: [&str; 4] = ["BTC-USD", "ETH-USD", "SOL-USD", "XRP-USD"];

/// Builds native column buffers with seeded values. Rows 0 and 1 hold the
/// type's lower and upper bounds; every `null_every`-th row is null when the
/// type has a null.
pub struct ColumnBuffersFactory {
    column_type: ColumnType,
    rows: usize,
    seed: u64,
    null_every: Option<usize>,
}

impl ColumnBuffersFactory {
    pub fn new(column_type: ColumnType) -> Self {
        Self {
            column_type,
            rows: 16,
            seed: 42,
            null_every: Some(7),
        }
    }

    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_null_every(mut self, n: usize) -> Self {
        self.null_every = Some(n.max(3));
        self
    }

    pub fn without_nulls(mut self) -> Self {
        self.null_every = None;
        self
    }

    pub fn create(self) -> ColumnChunkBuffers {
        let mut rng = StdRng::seed_from_u64(self.seed ^ self.column_type.tag() as u64);
        let mut out = ColumnChunkBuffers::for_type(self.column_type);
        for row in 0..self.rows {
            let is_null = self.column_type.is_nullable()
                && self.null_every.is_some_and(|n| row % n == n - 1);
            if is_null {
                out.push_null();
            } else {
                push_value(&mut out, self.column_type, row, &mut rng);
            }
        }
        out
    }
}

fn push_value(out: &mut ColumnChunkBuffers, column_type: ColumnType, row: usize, rng: &mut StdRng) {
    match column_type {
        ColumnType::Boolean => out.push_bool(rng.r#gen()),
        ColumnType::Byte => out.push_i8(bounded(row, i8::MIN, i8::MAX, rng)),
        ColumnType::Short => out.push_i16(bounded(row, i16::MIN, i16::MAX, rng)),
        ColumnType::Char => out.push_u16(bounded(row, 0, u16::MAX, rng)),
        ColumnType::Int => out.push_i32(bounded(row, i32::MIN + 1, i32::MAX, rng)),
        ColumnType::Long => out.push_i64(bounded(row, i64::MIN + 1, i64::MAX, rng)),
        ColumnType::Date => out.push_i64(bounded(row, i64::MIN + 1, i64::MAX, rng)),
        ColumnType::Timestamp => out.push_i64(bounded(
            row,
            0,
            4_102_444_800_000_000,
            rng,
        )),
        ColumnType::Float => out.push_f32(match row {
            0 => f32::MIN,
            1 => f32::MAX,
            _ => rng.gen_range(-1.0e6f32..1.0e6),
        }),
        ColumnType::Double => out.push_f64(match row {
            0 => f64::MIN,
            1 => f64::MAX,
            _ => rng.gen_range(-1.0e12f64..1.0e12),
        }),
        ColumnType::IPv4 => out.push_u32(bounded(row, 1, u32::MAX, rng)),
        ColumnType::GeoByte => out.push_i8(bounded(row, 0, i8::MAX, rng)),
        ColumnType::GeoShort => out.push_i16(bounded(row, 0, i16::MAX, rng)),
        ColumnType::GeoInt => out.push_i32(bounded(row, 0, i32::MAX, rng)),
        ColumnType::GeoLong => out.push_i64(bounded(row, 0, i64::MAX, rng)),
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
        ColumnType::String | ColumnType::Varchar => {
            let text = match row {
                0 => String::new(),
                1 => "ünïcødé ✓".to_string(),
                _ => {
                    let len = rng.gen_range(1..24);
                    rng.sample_iter(&Alphanumeric)
                        .take(len)
                        .map(char::from)
                        .collect()
                }
            };
            out.push_str(Some(&text));
        }
        ColumnType::Binary => {
            let len = if row == 0 { 0 } else { rng.gen_range(1..64) };
            let mut bytes = vec![0u8; len];
            rng.fill(&mut bytes[..]);
            out.push_var(Some(&bytes));
        }
        ColumnType::Symbol => {
            let pick = rng.gen_range(0..SYMBOLS.len());
            out.push_symbol(Some(SYMBOLS[pick]));
        }
    }
}

fn bounded<T>(row: usize, min: T, max: T, rng: &mut StdRng) -> T
where
    T: rand::distributions::uniform::SampleUniform + PartialOrd + Copy,
{
    match row {
        0 => min,
        1 => max,
        _ => rng.gen_range(min..=max),
    }
}

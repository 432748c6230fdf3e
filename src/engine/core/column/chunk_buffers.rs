use parquet::data_type::{ByteArray, FixedLenByteArray};

use crate::engine::core::partition::SymbolTable;
use crate::engine::types::ColumnType;

/// Length prefix marking a null var-width entry.
pub const VAR_NULL_LEN: i32 = -1;
/// Key stored for a null symbol.
pub const SYMBOL_NULL_KEY: i32 = -1;

/// Native column buffers for one column: `data` holds the values in the
/// engine's layout, `aux` the per-row offsets of var-width columns.
///
/// Instances are reused across decode calls; [`ColumnChunkBuffers::reset`]
/// drops the contents but keeps every allocation, the decode scratch included.
#[derive(Debug, Default, Clone)]
pub struct ColumnChunkBuffers {
    column_type: Option<ColumnType>,
    data: Vec<u8>,
    aux: Vec<u8>,
    row_count: usize,
    symbols: SymbolTable,
    pub(crate) scratch: DecodeScratch,
}

/// Page-level read buffers handed to the Parquet column readers.
#[derive(Debug, Default, Clone)]
pub(crate) struct DecodeScratch {
    pub def_levels: Vec<i16>,
    pub bools: Vec<bool>,
    pub ints32: Vec<i32>,
    pub ints64: Vec<i64>,
    pub floats: Vec<f32>,
    pub doubles: Vec<f64>,
    pub bytes: Vec<ByteArray>,
    pub fixed: Vec<FixedLenByteArray>,
}

impl DecodeScratch {
    pub fn clear(&mut self) {
        self.def_levels.clear();
        self.bools.clear();
        self.ints32.clear();
        self.ints64.clear();
        self.floats.clear();
        self.doubles.clear();
        self.bytes.clear();
        self.fixed.clear();
    }
}

impl ColumnChunkBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_type(column_type: ColumnType) -> Self {
        let mut buffers = Self::new();
        buffers.column_type = Some(column_type);
        buffers
    }

    /// Clears contents and retargets the buffers at `column_type`.
    pub fn reset(&mut self, column_type: ColumnType) {
        self.column_type = Some(column_type);
        self.data.clear();
        self.aux.clear();
        self.row_count = 0;
        self.symbols.clear();
        self.scratch.clear();
    }

    pub fn column_type(&self) -> Option<ColumnType> {
        self.column_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn aux(&self) -> &[u8] {
        &self.aux
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn reserve_rows(&mut self, rows: usize) {
        if let Some(width) = self.column_type.and_then(|t| t.fixed_width()) {
            self.data.reserve(rows * width);
        } else {
            self.aux.reserve(rows * 8);
        }
    }

    pub fn push_bool(&mut self, value: bool) {
        self.push_raw(&[value as u8]);
    }

    pub fn push_i8(&mut self, value: i8) {
        self.push_raw(&value.to_le_bytes());
    }

    pub fn push_i16(&mut self, value: i16) {
        self.push_raw(&value.to_le_bytes());
    }

    pub fn push_u16(&mut self, value: u16) {
        self.push_raw(&value.to_le_bytes());
    }

    pub fn push_i32(&mut self, value: i32) {
        self.push_raw(&value.to_le_bytes());
    }

    pub fn push_u32(&mut self, value: u32) {
        self.push_raw(&value.to_le_bytes());
    }

    pub fn push_i64(&mut self, value: i64) {
        self.push_raw(&value.to_le_bytes());
    }

    pub fn push_f32(&mut self, value: f32) {
        self.push_raw(&value.to_le_bytes());
    }

    pub fn push_f64(&mut self, value: f64) {
        self.push_raw(&value.to_le_bytes());
    }

    /// Writes the low bytes of `value` at the column's native width. The caller
    /// has already checked that the value fits.
    pub fn push_integer(&mut self, value: i64) {
        let width = self.column_type.and_then(|t| t.fixed_width()).unwrap_or(8);
        let bytes = value.to_le_bytes();
        self.push_raw(&bytes[..width.min(8)]);
    }

    /// Appends one fixed-width value already in native byte order.
    pub fn push_fixed(&mut self, value: &[u8]) {
        self.push_raw(value);
    }

    pub fn push_var(&mut self, value: Option<&[u8]>) {
        let offset = self.data.len() as u64;
        self.aux.extend_from_slice(&offset.to_le_bytes());
        match value {
            Some(bytes) => {
                self.data
                    .extend_from_slice(&(bytes.len() as i32).to_le_bytes());
                self.data.extend_from_slice(bytes);
            }
            None => self.data.extend_from_slice(&VAR_NULL_LEN.to_le_bytes()),
        }
        self.row_count += 1;
    }

    pub fn push_str(&mut self, value: Option<&str>) {
        self.push_var(value.map(str::as_bytes));
    }

    pub fn push_symbol(&mut self, value: Option<&str>) {
        let key = match value {
            Some(s) => self.symbols.intern(s),
            None => SYMBOL_NULL_KEY,
        };
        self.push_raw(&key.to_le_bytes());
    }

    /// Appends the column type's null representation.
    pub fn push_null(&mut self) {
        match self.column_type {
            Some(t) if t.is_var_size() => self.push_var(None),
            Some(ColumnType::Symbol) => self.push_raw(&SYMBOL_NULL_KEY.to_le_bytes()),
            Some(t) => self.push_raw(t.null_value()),
            None => {}
        }
    }

    /// Replaces the symbol dictionary. Keys already pushed are not remapped.
    pub fn set_symbols(&mut self, symbols: SymbolTable) {
        self.symbols = symbols;
    }

    /// Native bytes of a fixed-width row.
    pub fn fixed_value(&self, row: usize) -> Option<&[u8]> {
        let width = self.column_type?.fixed_width()?;
        self.data.get(row * width..(row + 1) * width)
    }

    /// Contents of a var-width row; `Ok(None)` for null.
    pub fn var_value(&self, row: usize) -> Result<Option<&[u8]>, String> {
        read_var_entry(&self.data, &self.aux, row)
    }

    pub fn symbol_value(&self, row: usize) -> Option<&str> {
        let raw = self.fixed_value(row)?;
        let key = i32::from_le_bytes(raw.try_into().ok()?);
        self.symbols.get(key)
    }

    fn push_raw(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
        self.row_count += 1;
    }
}

/// Reads row `row` of a var-width column from its `data`/`aux` pair.
pub fn read_var_entry<'a>(data: &'a [u8], aux: &[u8], row: usize) -> Result<Option<&'a [u8]>, String> {
    let slot = aux
        .get(row * 8..row * 8 + 8)
        .ok_or_else(|| format!("missing offset for row {}", row))?;
    let offset = u64::from_le_bytes(slot.try_into().map_err(|_| "bad offset slot".to_string())?);
    let offset = usize::try_from(offset).map_err(|_| format!("offset {} too large", offset))?;
    let header = data
        .get(offset..offset.saturating_add(4))
        .ok_or_else(|| format!("row {} offset {} past end of data", row, offset))?;
    let len = i32::from_le_bytes(header.try_into().map_err(|_| "bad length header".to_string())?);
    if len == VAR_NULL_LEN {
        return Ok(None);
    }
    if len < 0 {
        return Err(format!("row {} has negative length {}", row, len));
    }
    let start = offset + 4;
    data.get(start..start + len as usize)
        .map(Some)
        .ok_or_else(|| format!("row {} length {} overruns data", row, len))
}

use std::collections::HashMap;

/// Ordered dictionary backing a symbol column. Keys are positions in the list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    values: Vec<String>,
    index: HashMap<String, i32>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for v in values {
            let value: String = v.into();
            table.intern(&value);
        }
        table
    }

    /// Returns the key for `value`, appending it when not yet present.
    pub fn intern(&mut self, value: &str) -> i32 {
        if let Some(key) = self.index.get(value) {
            return *key;
        }
        let key = self.values.len() as i32;
        self.values.push(value.to_string());
        self.index.insert(value.to_string(), key);
        key
    }

    pub fn key_of(&self, value: &str) -> Option<i32> {
        self.index.get(value).copied()
    }

    pub fn get(&self, key: i32) -> Option<&str> {
        if key < 0 {
            return None;
        }
        self.values.get(key as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.index.clear();
    }
}

//! `Headers`: the unordered key-value map carried in the second block of a
//! message.

use std::collections::HashMap;

use crate::{
    block::Block,
    codec::{get_count, get_string, put_string},
    errors::Result,
};

/// Unordered string-to-string map. Keys are unique; [`Self::set`] is
/// insert-or-assign. Wire encoding collapses duplicate keys the same way —
/// last one wins (spec §3/§4.2).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    table: HashMap<String, String>,
}

impl Headers {
    /// An empty header map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `key`'s value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.table.insert(key.into(), value.into());
    }

    /// Look up a value by borrowed key. Returns `None` if absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.table.get(key).map(String::as_str)
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// True if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Iterate over `(key, value)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.table.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Pack into a block stamped with `id`. Payload: `[count] ++ count ×
    /// (pack(key) ++ pack(value))`. Emission order is unspecified.
    #[must_use]
    pub fn pack(&self, id: i32) -> Block {
        let mut buf = Vec::new();
        #[allow(clippy::expect_used)]
        let count = u32::try_from(self.table.len()).expect("header count fits in u32");
        buf.extend_from_slice(&count.to_le_bytes());
        for (key, value) in &self.table {
            put_string(&mut buf, key);
            put_string(&mut buf, value);
        }
        Block::new(id, buf)
    }

    /// Unpack from a block's content. Duplicate keys collapse via
    /// insert-or-assign, so the last occurrence on the wire wins.
    pub fn unpack(block: &Block) -> Result<Self> {
        let mut cursor = block.content();
        let count = get_count(&mut cursor)?;
        let mut headers = Self::new();
        for _ in 0..count {
            let key = get_string(&mut cursor)?;
            let value = get_string(&mut cursor)?;
            headers.set(key, value);
        }
        Ok(headers)
    }
}

impl FromIterator<(String, String)> for Headers {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self { table: iter.into_iter().collect() }
    }
}

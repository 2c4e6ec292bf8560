//! Key table parsing.
//!
//! Mapping keys are stored once, in a region near the start of the file, and
//! referenced from mapping footers by their offset within that region.
//!
//! # Record Structure
//! ```text
//! [2 bytes] Key length (u16 LE)
//! [N bytes] UTF-8 key text
//! [1 byte]  Terminator
//! ```

use std::collections::HashMap;

use log::{debug, trace};

use super::scalars;
use crate::mdplist::cursor::ByteCursor;
use crate::mdplist::types::{error::Result, models::MdplistHeader};

/// Key text indexed by offset relative to the key region's start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyTable {
    entries: HashMap<u32, String>,
}

impl KeyTable {
    pub fn get(&self, offset: u32) -> Option<&str> {
        self.entries.get(&offset).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(relative offset, key)` pairs in ascending offset order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        let mut pairs: Vec<_> = self
            .entries
            .iter()
            .map(|(offset, key)| (*offset, key.as_str()))
            .collect();
        pairs.sort_unstable_by_key(|(offset, _)| *offset);
        pairs.into_iter()
    }
}

/// Reads every key record between the header's start and end offsets.
///
/// A start offset of zero means the file has no key table.
pub fn parse(cursor: &mut ByteCursor<'_>, header: &MdplistHeader) -> Result<KeyTable> {
    let start = u64::from(header.key_table_start);
    let end = u64::from(header.key_table_end);
    let mut table = KeyTable::default();

    if start == 0 {
        debug!("No key table present");
        return Ok(table);
    }

    cursor.seek(start);
    while cursor.position() < end {
        let record_pos = cursor.position();
        let relative = (record_pos - start) as u32;
        let len = cursor.read_u16()?;
        let text_pos = cursor.position();
        let key = scalars::decode_utf8(cursor.read_bytes(len as usize)?, text_pos)?;
        cursor.skip(1)?;
        trace!("Key at +{}: {:?}", relative, key);
        table.entries.insert(relative, key);
    }

    debug!("Key table parsed: {} keys", table.len());
    Ok(table)
}

//! MDPLIST file header parsing.
//!
//! # Header Structure
//! ```text
//! [0..4]   Magic                DE BA 00 01
//! [4..6]   (not used)
//! [6..10]  Key table end        u32 LE, absolute
//! [10..14] Key table start      u32 LE, absolute, 0 = no key table
//! [14..18] Root offset          u32 LE
//! [18]     Root type            u8
//! [19..23] Root end offset      u32 LE
//! ```

use log::{debug, trace};

use crate::mdplist::cursor::ByteCursor;
use crate::mdplist::types::{
    error::{MdplistError, Result},
    models::{EntryDescriptor, EntryType, MdplistHeader, MAGIC},
};

const KEY_TABLE_FIELDS_POS: u64 = 6;
const ROOT_DESCRIPTOR_POS: u64 = 14;

/// Fails with [`MdplistError::InvalidMagic`] unless `data` starts with the signature.
pub fn check_magic(data: &[u8]) -> Result<()> {
    if data.starts_with(&MAGIC) {
        return Ok(());
    }
    let mut found = [0u8; 4];
    let n = data.len().min(4);
    found[..n].copy_from_slice(&data[..n]);
    Err(MdplistError::InvalidMagic { found })
}

/// Reads the fixed header fields. The magic is checked by [`check_magic`].
pub fn parse(cursor: &mut ByteCursor<'_>) -> Result<MdplistHeader> {
    cursor.seek(KEY_TABLE_FIELDS_POS);
    let key_table_end = cursor.read_u32()?;
    let key_table_start = cursor.read_u32()?;
    trace!(
        "Key table fields: start={}, end={}",
        key_table_start,
        key_table_end
    );

    cursor.seek(ROOT_DESCRIPTOR_POS);
    let root_offset = cursor.read_u32()?;
    let root_type = EntryType::from(cursor.read_u8()?);
    let root_end_offset = cursor.read_u32()?;
    debug!(
        "Root descriptor: offset={}, type={:?}, end={}",
        root_offset, root_type, root_end_offset
    );

    Ok(MdplistHeader {
        key_table_end,
        key_table_start,
        root: EntryDescriptor {
            offset: root_offset,
            entry_type: root_type,
        },
        root_end_offset,
    })
}

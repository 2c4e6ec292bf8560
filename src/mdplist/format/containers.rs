//! Sequence and mapping decoding.
//!
//! # Container Structure
//! ```text
//! Sequence                           Mapping
//! [4] total length  u32              [4] total length  u32
//! [2] record count  u16              [2] record count  u16
//! [4] data length   u32              [4] data length   u32
//!                                    [2] prefix count  u16 (stored minus one)
//! [data length - 10] inner data      [data length - 12] inner data
//! [total - data + 4] footer:         [total - data + 4] footer:
//!   count × (offset u32, type u8)      (prefix count) × u16
//!                                      count × (key u32, offset u32, type u8)
//! ```
//!
//! `data length` counts the header. Children are located only through the
//! footer; the inner data is skipped. The meaning of the mapping's leading
//! u16 prefix entries is not known, so they are kept opaque.

use log::debug;

use super::dispatch::Decoder;
use crate::mdplist::cursor::ByteCursor;
use crate::mdplist::types::{
    error::{MdplistError, Result},
    models::{
        ContainerKind, Diagnostic, EntryDescriptor, EntryType, Mapping, StridePolicy, Value,
    },
};

/// The raw layout of one container, before its children are decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerFrame<'a> {
    pub kind: ContainerKind,
    pub offset: u32,
    pub total_len: u32,
    pub record_count: u16,
    pub data_len: u32,
    /// Bytes between the header and the footer.
    pub inner_data: &'a [u8],
    /// Uninterpreted u16 entries at the start of a mapping footer. Empty for sequences.
    pub prefix: Vec<u16>,
    /// Footer bytes after the prefix: the per-child records.
    pub records: &'a [u8],
}

impl ContainerFrame<'_> {
    /// Footer length in bytes, prefix included.
    pub fn footer_len(&self) -> usize {
        self.prefix.len() * 2 + self.records.len()
    }

    /// Whether the record area is exactly `stride × record count` bytes.
    ///
    /// Empty containers always match.
    pub fn stride_matches(&self) -> bool {
        self.record_count == 0
            || self.records.len() == self.kind.stride() * usize::from(self.record_count)
    }
}

/// Reads a container header and slices out its inner data and footer.
pub fn read_frame<'a>(
    cursor: &mut ByteCursor<'a>,
    kind: ContainerKind,
    offset: u32,
) -> Result<ContainerFrame<'a>> {
    cursor.seek(u64::from(offset));
    let total_len = cursor.read_u32()?;
    let record_count = cursor.read_u16()?;
    let data_len = cursor.read_u32()?;
    let prefix_count = match kind {
        ContainerKind::Sequence => 0,
        ContainerKind::Mapping => usize::from(cursor.read_u16()?) + 1,
    };

    let header_len = kind.header_len();
    let inner_len = data_len
        .checked_sub(header_len)
        .ok_or(MdplistError::OutOfBounds {
            offset: u64::from(offset),
            needed: u64::from(header_len),
            available: u64::from(data_len),
        })?;
    let inner_data = cursor.read_bytes(inner_len as usize)?;

    // The total length excludes its own four bytes.
    let footer_len = (u64::from(total_len) + 4)
        .checked_sub(u64::from(data_len))
        .ok_or(MdplistError::OutOfBounds {
            offset: u64::from(offset),
            needed: u64::from(data_len),
            available: u64::from(total_len) + 4,
        })?;
    let footer_pos = cursor.position();
    let footer = cursor.read_bytes(footer_len as usize)?;

    let mut footer_cursor = ByteCursor::new(footer);
    let prefix = (0..prefix_count)
        .map(|_| footer_cursor.read_u16())
        .collect::<Result<Vec<_>>>()
        .map_err(|_| MdplistError::OutOfBounds {
            offset: footer_pos,
            needed: prefix_count as u64 * 2,
            available: footer_len,
        })?;
    let records = &footer[prefix.len() * 2..];

    debug!(
        "{} at {}: {} records, data={} bytes, footer={} bytes",
        kind, offset, record_count, data_len, footer_len
    );

    Ok(ContainerFrame {
        kind,
        offset,
        total_len,
        record_count,
        data_len,
        inner_data,
        prefix,
        records,
    })
}

impl<'a> Decoder<'a> {
    /// Reads a frame and applies the stride policy to it.
    fn checked_frame(&mut self, kind: ContainerKind, offset: u32) -> Result<ContainerFrame<'a>> {
        let frame = read_frame(&mut self.cursor, kind, offset)?;
        if !frame.stride_matches() {
            let footer_len = frame.records.len();
            let record_count = frame.record_count;
            let stride = kind.stride();
            match self.options.stride_policy {
                StridePolicy::Strict => {
                    return Err(MdplistError::StrideMismatch {
                        kind,
                        offset,
                        footer_len,
                        record_count,
                        stride,
                    });
                }
                StridePolicy::Lenient => self.report(Diagnostic::StrideMismatch {
                    kind,
                    offset,
                    footer_len,
                    record_count,
                    stride,
                }),
            }
        }
        Ok(frame)
    }

    /// Tag 0xF0: children in footer order.
    pub(super) fn decode_sequence(&mut self, offset: u32) -> Result<Value> {
        let frame = self.checked_frame(ContainerKind::Sequence, offset)?;
        let mut records = ByteCursor::new(frame.records);
        let descriptors = (0..frame.record_count)
            .map(|_| -> Result<EntryDescriptor> {
                Ok(EntryDescriptor {
                    offset: records.read_u32()?,
                    entry_type: EntryType::from(records.read_u8()?),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut items = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            items.push(self.process(descriptor)?);
        }
        Ok(Value::Sequence(items))
    }

    /// Tag 0xF1: key offsets resolved through the key table.
    pub(super) fn decode_mapping(&mut self, offset: u32) -> Result<Value> {
        let frame = self.checked_frame(ContainerKind::Mapping, offset)?;
        let mut records = ByteCursor::new(frame.records);
        let entries = (0..frame.record_count)
            .map(|_| -> Result<(u32, EntryDescriptor)> {
                let key_offset = records.read_u32()?;
                let descriptor = EntryDescriptor {
                    offset: records.read_u32()?,
                    entry_type: EntryType::from(records.read_u8()?),
                };
                Ok((key_offset, descriptor))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut map = Mapping::with_capacity(entries.len());
        for (key_offset, descriptor) in entries {
            let key = self
                .keys
                .get(key_offset)
                .ok_or(MdplistError::MissingKey {
                    key_offset,
                    container_offset: offset,
                })?
                .to_owned();
            let value = self.process(descriptor)?;
            if map.contains_key(&key) {
                self.report(Diagnostic::DuplicateKey {
                    key: key.clone(),
                    container_offset: offset,
                });
            }
            map.insert(key, value);
        }
        Ok(Value::Mapping(map))
    }
}

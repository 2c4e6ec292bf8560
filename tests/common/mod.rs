#![allow(dead_code)]

use std::collections::HashMap;

use mdplist_reader::MAGIC;

pub const HEADER_LEN: usize = 23;

/// An `(offset, tag)` descriptor for something already written.
#[derive(Debug, Clone, Copy)]
pub struct Entry {
    pub offset: u32,
    pub tag: u8,
}

impl Entry {
    pub fn inline(tag: u8, raw: u32) -> Self {
        Self { offset: raw, tag }
    }

    pub fn null() -> Self {
        Self::inline(0xE0, 0)
    }
}

/// Lays out MDPLIST documents byte by byte: header, key table, then entries
/// in the order they are added.
pub struct DocBuilder {
    buf: Vec<u8>,
    keys: HashMap<String, u32>,
}

impl DocBuilder {
    pub fn new(keys: &[&str]) -> Self {
        let mut buf = vec![0u8; HEADER_LEN];
        buf[..4].copy_from_slice(&MAGIC);
        let mut offsets = HashMap::new();

        if !keys.is_empty() {
            let start = buf.len() as u32;
            for key in keys {
                offsets.insert(key.to_string(), buf.len() as u32 - start);
                buf.extend_from_slice(&(key.len() as u16).to_le_bytes());
                buf.extend_from_slice(key.as_bytes());
                buf.push(0);
            }
            let end = buf.len() as u32;
            buf[6..10].copy_from_slice(&end.to_le_bytes());
            buf[10..14].copy_from_slice(&start.to_le_bytes());
        }

        Self { buf, keys: offsets }
    }

    pub fn key_offset(&self, key: &str) -> u32 {
        self.keys[key]
    }

    fn here(&self) -> u32 {
        self.buf.len() as u32
    }

    fn u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn raw(&mut self, bytes: &[u8]) -> u32 {
        let at = self.here();
        self.buf.extend_from_slice(bytes);
        at
    }

    /// Tag 0xF4, with the trailing terminator counted in the length.
    pub fn text(&mut self, s: &str) -> Entry {
        let offset = self.here();
        self.u32(s.len() as u32 + 1);
        self.buf.extend_from_slice(s.as_bytes());
        self.buf.push(0);
        Entry { offset, tag: 0xF4 }
    }

    /// Tag 0xF5 over already-encoded bytes (BOM included, if any).
    pub fn wide_text(&mut self, bytes: &[u8]) -> Entry {
        let offset = self.here();
        self.u32(bytes.len() as u32);
        self.buf.extend_from_slice(bytes);
        Entry { offset, tag: 0xF5 }
    }

    pub fn binary(&mut self, bytes: &[u8]) -> Entry {
        let offset = self.here();
        self.u32(bytes.len() as u32);
        self.buf.extend_from_slice(bytes);
        Entry { offset, tag: 0xF6 }
    }

    pub fn platform_text(&mut self, s: &str) -> Entry {
        let offset = self.here();
        self.buf.extend_from_slice(&[0xAA; 8]);
        self.u32(s.len() as u32);
        self.buf.extend_from_slice(s.as_bytes());
        Entry { offset, tag: 0xF7 }
    }

    pub fn int64(&mut self, v: i64) -> Entry {
        let offset = self.raw(&v.to_le_bytes());
        Entry { offset, tag: 0x23 }
    }

    pub fn float64(&mut self, v: f64) -> Entry {
        let offset = self.raw(&v.to_le_bytes());
        Entry { offset, tag: 0x33 }
    }

    pub fn date(&mut self, seconds: f64) -> Entry {
        let offset = self.raw(&seconds.to_le_bytes());
        Entry { offset, tag: 0x13 }
    }

    /// A sequence whose footer is exactly `children.len()` records.
    pub fn sequence(&mut self, children: &[Entry]) -> Entry {
        let footer: Vec<u8> = children.iter().flat_map(sequence_record).collect();
        self.sequence_with(children.len() as u16, &[], &footer)
    }

    /// A sequence with explicit record count, inner data and footer bytes.
    pub fn sequence_with(&mut self, record_count: u16, inner: &[u8], footer: &[u8]) -> Entry {
        let offset = self.here();
        let data_len = 10 + inner.len() as u32;
        self.u32(data_len + footer.len() as u32 - 4);
        self.u16(record_count);
        self.u32(data_len);
        self.buf.extend_from_slice(inner);
        self.buf.extend_from_slice(footer);
        Entry { offset, tag: 0xF0 }
    }

    /// A mapping with one prefix entry and exactly one record per pair.
    pub fn mapping(&mut self, pairs: &[(&str, Entry)]) -> Entry {
        let records: Vec<(u32, Entry)> = pairs
            .iter()
            .map(|(key, entry)| (self.key_offset(key), *entry))
            .collect();
        self.mapping_with(&[0], &[], &records)
    }

    /// A mapping with explicit prefix entries, inner data and key offsets.
    pub fn mapping_with(&mut self, prefix: &[u16], inner: &[u8], records: &[(u32, Entry)]) -> Entry {
        let mut footer = Vec::new();
        for p in prefix {
            footer.extend_from_slice(&p.to_le_bytes());
        }
        for (key_offset, entry) in records {
            footer.extend_from_slice(&key_offset.to_le_bytes());
            footer.extend_from_slice(&sequence_record(entry));
        }
        self.mapping_raw(records.len() as u16, prefix.len() as u16, inner, &footer)
    }

    /// A mapping built from raw footer bytes. `prefix_count` is the real
    /// number of prefix entries; the stored field is one less.
    pub fn mapping_raw(&mut self, record_count: u16, prefix_count: u16, inner: &[u8], footer: &[u8]) -> Entry {
        let offset = self.here();
        let data_len = 12 + inner.len() as u32;
        self.u32(data_len + footer.len() as u32 - 4);
        self.u16(record_count);
        self.u32(data_len);
        self.u16(prefix_count - 1);
        self.buf.extend_from_slice(inner);
        self.buf.extend_from_slice(footer);
        Entry { offset, tag: 0xF1 }
    }

    /// Points the header at `root` and returns the finished buffer.
    pub fn finish(mut self, root: Entry) -> Vec<u8> {
        let end = self.here();
        self.buf[14..18].copy_from_slice(&root.offset.to_le_bytes());
        self.buf[18] = root.tag;
        self.buf[19..23].copy_from_slice(&end.to_le_bytes());
        self.buf
    }
}

pub fn sequence_record(entry: &Entry) -> Vec<u8> {
    let mut record = entry.offset.to_le_bytes().to_vec();
    record.push(entry.tag);
    record
}

/// A document whose root is a single scalar built by `build`.
pub fn single(build: impl FnOnce(&mut DocBuilder) -> Entry) -> Vec<u8> {
    let mut doc = DocBuilder::new(&[]);
    let root = build(&mut doc);
    doc.finish(root)
}

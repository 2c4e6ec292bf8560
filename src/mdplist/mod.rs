//! Core MDPLIST reader module

pub mod cursor;
pub mod format;
pub mod json;
pub mod types;

use std::fs;
use std::path::Path;

use log::{debug, info};

use cursor::ByteCursor;
use format::containers::{self, ContainerFrame};
use format::dispatch::Decoder;
use format::header;
use format::keys::{self, KeyTable};
pub use types::error::{MdplistError, Result};
use types::models::*;

/// Parses an MDPLIST file from the given path with default options.
///
/// Diagnostics are logged and dropped; use [`MdplistReader`] to inspect them.
pub fn load(path: impl AsRef<Path>) -> Result<Value> {
    MdplistReader::open(path, ParseOptions::default())?
        .parse()
        .map(Document::into_root)
}

/// Parses an MDPLIST buffer with default options.
pub fn loads(data: &[u8]) -> Result<Value> {
    MdplistReader::from_bytes(data, ParseOptions::default())?
        .parse()
        .map(Document::into_root)
}

/// A reader over one MDPLIST buffer.
///
/// Construction validates the header and loads the key table; both are
/// immutable afterwards, so [`parse`](Self::parse) can be called repeatedly.
#[derive(Debug, Clone)]
pub struct MdplistReader {
    data: Vec<u8>,
    header: MdplistHeader,
    keys: KeyTable,
    options: ParseOptions,
}

impl MdplistReader {
    /// Reads an MDPLIST file into memory.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file cannot be read
    /// - The file does not start with the MDPLIST signature
    /// - The header or key table runs past the end of the file
    pub fn open(path: impl AsRef<Path>, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening MDPLIST file: {}", path.display());
        let data = fs::read(path)?;
        Self::from_bytes(data, options)
    }

    /// Takes ownership of an in-memory MDPLIST buffer.
    pub fn from_bytes(data: impl Into<Vec<u8>>, options: ParseOptions) -> Result<Self> {
        let data = data.into();
        header::check_magic(&data)?;

        let mut cursor = ByteCursor::new(&data);
        let header = header::parse(&mut cursor)?;
        let keys = keys::parse(&mut cursor, &header)?;
        info!(
            "MDPLIST opened: {} bytes, {} keys, root {:?}",
            data.len(),
            keys.len(),
            header.root.entry_type
        );

        Ok(Self {
            data,
            header,
            keys,
            options,
        })
    }

    /// Decodes the whole document starting at the root descriptor.
    pub fn parse(&self) -> Result<Document> {
        self.decode_entry(self.header.root)
    }

    /// Decodes the subtree described by an arbitrary descriptor.
    pub fn decode_entry(&self, descriptor: EntryDescriptor) -> Result<Document> {
        let mut decoder = Decoder::new(&self.data, &self.keys, self.options);
        let root = decoder.process(descriptor)?;
        let diagnostics = decoder.into_diagnostics();
        debug!(
            "Decoded {} with {} diagnostics",
            root.type_name(),
            diagnostics.len()
        );
        Ok(Document { root, diagnostics })
    }

    /// Reads the raw layout of the container at `offset` without decoding its children.
    pub fn container_frame(&self, kind: ContainerKind, offset: u32) -> Result<ContainerFrame<'_>> {
        containers::read_frame(&mut ByteCursor::new(&self.data), kind, offset)
    }

    pub fn header(&self) -> &MdplistHeader {
        &self.header
    }

    pub fn keys(&self) -> &KeyTable {
        &self.keys
    }

    pub fn options(&self) -> ParseOptions {
        self.options
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

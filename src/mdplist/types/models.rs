//! Core data structures for MDPLIST format components.
//!
//! This module defines the fundamental types used throughout the library:
//! - The decoded value tree
//! - File header and entry type tags
//! - Parse options and returned diagnostics

use std::fmt;

use chrono::NaiveDateTime;
use indexmap::IndexMap;

/// Signature every MDPLIST buffer starts with.
pub const MAGIC: [u8; 4] = [0xDE, 0xBA, 0x00, 0x01];

/// Key/value pairs of a decoded mapping, in footer order.
pub type Mapping = IndexMap<String, Value>;

/// A decoded MDPLIST value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float32(f32),
    Float64(f64),
    /// Instant relative to 2001-01-01T00:00:00, microsecond precision.
    DateTime(NaiveDateTime),
    Text(String),
    /// String whose encoding was chosen by its byte-order mark.
    WideText(String),
    /// CFString-flavored string.
    PlatformText(String),
    Binary(Vec<u8>),
    Sequence(Vec<Value>),
    Mapping(Mapping),
    /// Entry with a tag this reader does not understand.
    ///
    /// `raw` is the descriptor's 32-bit field, left uninterpreted.
    Unknown { tag: u8, raw: u32 },
}

impl Value {
    /// Short name of the variant, used in logs and error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float32(_) => "float32",
            Value::Float64(_) => "float64",
            Value::DateTime(_) => "datetime",
            Value::Text(_) => "text",
            Value::WideText(_) => "wide text",
            Value::PlatformText(_) => "platform text",
            Value::Binary(_) => "binary",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
            Value::Unknown { .. } => "unknown",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns either float variant widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float32(f) => Some(f64::from(*f)),
            Value::Float64(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the text of any of the three string variants.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) | Value::WideText(s) | Value::PlatformText(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Binary(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&NaiveDateTime> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up `key` if this value is a mapping.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|map| map.get(key))
    }
}

/// Type tag carried by every entry descriptor.
///
/// Tags the reader does not know are kept in [`EntryType::Unknown`] so that
/// decoding can continue past them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryType {
    Sequence,
    Mapping,
    Text,
    WideText,
    Binary,
    PlatformText,
    Null,
    /// Inline: the descriptor field is the value.
    Boolean,
    /// Inline: the descriptor field is the value.
    InlineInteger,
    /// Inline: the descriptor field holds IEEE-754 single precision bits.
    InlineFloat32,
    DateTime,
    Integer64,
    Float64,
    Unknown(u8),
}

impl EntryType {
    /// The tag byte as stored in the file.
    pub fn tag(self) -> u8 {
        match self {
            EntryType::Sequence => 0xF0,
            EntryType::Mapping => 0xF1,
            EntryType::Text => 0xF4,
            EntryType::WideText => 0xF5,
            EntryType::Binary => 0xF6,
            EntryType::PlatformText => 0xF7,
            EntryType::Null => 0xE0,
            EntryType::Boolean => 0xE1,
            EntryType::InlineInteger => 0xE2,
            EntryType::InlineFloat32 => 0xE3,
            EntryType::DateTime => 0x13,
            EntryType::Integer64 => 0x23,
            EntryType::Float64 => 0x33,
            EntryType::Unknown(tag) => tag,
        }
    }

    /// Whether the descriptor's 32-bit field is a payload rather than a buffer position.
    pub fn is_inline(self) -> bool {
        matches!(
            self,
            EntryType::Null | EntryType::Boolean | EntryType::InlineInteger | EntryType::InlineFloat32
        )
    }
}

impl From<u8> for EntryType {
    fn from(tag: u8) -> Self {
        match tag {
            0xF0 => Self::Sequence,
            0xF1 => Self::Mapping,
            0xF4 => Self::Text,
            0xF5 => Self::WideText,
            0xF6 => Self::Binary,
            0xF7 => Self::PlatformText,
            0xE0 => Self::Null,
            0xE1 => Self::Boolean,
            0xE2 => Self::InlineInteger,
            0xE3 => Self::InlineFloat32,
            0x13 => Self::DateTime,
            0x23 => Self::Integer64,
            0x33 => Self::Float64,
            other => Self::Unknown(other),
        }
    }
}

/// Fixed fields at the start of an MDPLIST buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MdplistHeader {
    /// End of the key region (absolute).
    pub key_table_end: u32,
    /// Start of the key region (absolute); zero means there is no key table.
    pub key_table_start: u32,
    /// The root entry descriptor.
    pub root: EntryDescriptor,
    /// Read but not needed to decode the tree.
    pub root_end_offset: u32,
}

/// An `(offset, type)` pair locating one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryDescriptor {
    /// Buffer position, or the inline payload for inline types.
    pub offset: u32,
    pub entry_type: EntryType,
}

/// The two container layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Sequence,
    Mapping,
}

impl ContainerKind {
    /// Size in bytes of one footer record.
    pub fn stride(self) -> usize {
        match self {
            ContainerKind::Sequence => 5,
            ContainerKind::Mapping => 9,
        }
    }

    /// Size in bytes of the container header, which `data length` includes.
    pub fn header_len(self) -> u32 {
        match self {
            ContainerKind::Sequence => 10,
            ContainerKind::Mapping => 12,
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerKind::Sequence => f.write_str("sequence"),
            ContainerKind::Mapping => f.write_str("mapping"),
        }
    }
}

/// How to treat a footer whose length is not `stride × record count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StridePolicy {
    /// Record a [`Diagnostic::StrideMismatch`] and decode the declared records.
    #[default]
    Lenient,
    /// Fail with [`MdplistError::StrideMismatch`](super::error::MdplistError::StrideMismatch).
    Strict,
}

/// Settings for a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub stride_policy: StridePolicy,
    /// Deepest container nesting accepted before failing.
    ///
    /// The default leaves headroom on a 2 MiB thread stack in unoptimized builds.
    pub max_depth: usize,
}

impl ParseOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 128;

    pub fn strict() -> Self {
        Self {
            stride_policy: StridePolicy::Strict,
            ..Self::default()
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            stride_policy: StridePolicy::Lenient,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

/// A non-fatal irregularity found while decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A footer's length is not `stride × record count`.
    StrideMismatch {
        kind: ContainerKind,
        offset: u32,
        footer_len: usize,
        record_count: u16,
        stride: usize,
    },
    /// An entry carried a tag this reader does not know.
    UnknownType { tag: u8, raw: u32 },
    /// A mapping listed the same key more than once; the last value was kept.
    DuplicateKey { key: String, container_offset: u32 },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::StrideMismatch {
                kind,
                offset,
                footer_len,
                record_count,
                stride,
            } => write!(
                f,
                "{} at offset {}: footer of {} bytes is not {} records of {} bytes",
                kind, offset, footer_len, record_count, stride
            ),
            Diagnostic::UnknownType { tag, raw } => {
                write!(f, "unknown type {:#04x} with field {:#x}", tag, raw)
            }
            Diagnostic::DuplicateKey {
                key,
                container_offset,
            } => write!(
                f,
                "mapping at offset {} repeats key {:?}",
                container_offset, key
            ),
        }
    }
}

/// The result of a successful parse.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Value,
    /// Non-fatal findings, in the order they were encountered.
    pub diagnostics: Vec<Diagnostic>,
}

impl Document {
    pub fn into_root(self) -> Value {
        self.root
    }

    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

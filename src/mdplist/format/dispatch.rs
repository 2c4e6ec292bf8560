//! Entry dispatch: from an `(offset, type)` descriptor to a decoded value.
//!
//! [`Decoder`] holds the state of one parse. Container decoders call back
//! into [`Decoder::process`] once per child, so a parse is a depth-first walk
//! starting at the root descriptor.

use log::{trace, warn};

use super::keys::KeyTable;
use super::scalars;
use crate::mdplist::cursor::ByteCursor;
use crate::mdplist::types::{
    error::{MdplistError, Result},
    models::{Diagnostic, EntryDescriptor, EntryType, ParseOptions, Value},
};

/// Decoding state for a single parse.
pub struct Decoder<'a> {
    pub(super) cursor: ByteCursor<'a>,
    pub(super) keys: &'a KeyTable,
    pub(super) options: ParseOptions,
    diagnostics: Vec<Diagnostic>,
    depth: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8], keys: &'a KeyTable, options: ParseOptions) -> Self {
        Self {
            cursor: ByteCursor::new(data),
            keys,
            options,
            diagnostics: Vec::new(),
            depth: 0,
        }
    }

    /// Decodes the entry described by `descriptor`, recursing into containers.
    pub fn process(&mut self, descriptor: EntryDescriptor) -> Result<Value> {
        let EntryDescriptor { offset, entry_type } = descriptor;
        if entry_type.is_inline() {
            trace!("Inline {:?} = {:#x}", entry_type, offset);
        } else {
            trace!("Entry {:?} at {}", entry_type, offset);
        }

        let value = match entry_type {
            EntryType::Sequence => self.descend(offset, |d| d.decode_sequence(offset))?,
            EntryType::Mapping => self.descend(offset, |d| d.decode_mapping(offset))?,
            EntryType::Text => Value::Text(scalars::read_text(&mut self.cursor, offset)?),
            EntryType::WideText => {
                Value::WideText(scalars::read_wide_text(&mut self.cursor, offset)?)
            }
            EntryType::Binary => Value::Binary(scalars::read_binary(&mut self.cursor, offset)?),
            EntryType::PlatformText => {
                Value::PlatformText(scalars::read_platform_text(&mut self.cursor, offset)?)
            }
            EntryType::Null => Value::Null,
            EntryType::Boolean => Value::Boolean(scalars::boolean(offset)),
            EntryType::InlineInteger => Value::Integer(scalars::inline_integer(offset)),
            EntryType::InlineFloat32 => Value::Float32(scalars::inline_float32(offset)),
            EntryType::DateTime => Value::DateTime(scalars::read_date(&mut self.cursor, offset)?),
            EntryType::Integer64 => {
                Value::Integer(scalars::read_integer64(&mut self.cursor, offset)?)
            }
            EntryType::Float64 => Value::Float64(scalars::read_float64(&mut self.cursor, offset)?),
            EntryType::Unknown(tag) => {
                self.report(Diagnostic::UnknownType { tag, raw: offset });
                Value::Unknown { tag, raw: offset }
            }
        };
        Ok(value)
    }

    /// Runs a container decoder one nesting level deeper.
    fn descend<F>(&mut self, offset: u32, decode: F) -> Result<Value>
    where
        F: FnOnce(&mut Self) -> Result<Value>,
    {
        if self.depth >= self.options.max_depth {
            return Err(MdplistError::DepthExceeded {
                max_depth: self.options.max_depth,
                offset,
            });
        }
        self.depth += 1;
        let result = decode(self);
        self.depth -= 1;
        result
    }

    /// Records a non-fatal finding.
    pub(super) fn report(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    /// Consumes the decoder, returning what was reported along the way.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

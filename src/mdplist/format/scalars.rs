//! Leaf value decoders.
//!
//! Each decoder takes the descriptor's 32-bit field. For most tags it is a
//! position to seek to; for the inline tags (boolean, inline integer, inline
//! float) it is the value itself.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use encoding_rs::{Encoding, UTF_8};
use log::trace;

use crate::mdplist::cursor::ByteCursor;
use crate::mdplist::types::error::{MdplistError, Result};

/// CFString payloads start after this many bytes.
const PLATFORM_TEXT_PREFIX: u64 = 8;

/// Decodes `bytes` strictly in `encoding`. `offset` is only used for the error.
fn decode_strict(bytes: &[u8], encoding: &'static Encoding, offset: u64) -> Result<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
        .ok_or(MdplistError::InvalidText {
            offset,
            encoding: encoding.name(),
        })
}

pub fn decode_utf8(bytes: &[u8], offset: u64) -> Result<String> {
    decode_strict(bytes, UTF_8, offset)
}

/// Picks the encoding for wide text from its leading bytes.
///
/// Returns the encoding and the number of BOM bytes to strip: `FF FE` is
/// UTF-16LE, `FE FF` is UTF-16BE, `EF BB BF` is UTF-8. Text without a BOM
/// is UTF-8.
pub fn sniff_bom(bytes: &[u8]) -> (&'static Encoding, usize) {
    Encoding::for_bom(bytes).unwrap_or((UTF_8, 0))
}

/// Tag 0xF4: u32 length (terminator included), then UTF-8 text.
pub fn read_text(cursor: &mut ByteCursor<'_>, offset: u32) -> Result<String> {
    cursor.seek(u64::from(offset));
    let bytes = cursor.read_length_prefixed_terminated()?;
    decode_utf8(bytes, u64::from(offset))
}

/// Tag 0xF5: u32 length, then text in the encoding named by its BOM.
pub fn read_wide_text(cursor: &mut ByteCursor<'_>, offset: u32) -> Result<String> {
    cursor.seek(u64::from(offset));
    let bytes = cursor.read_length_prefixed()?;
    let (encoding, strip) = sniff_bom(bytes);
    trace!("Wide text at {}: {} ({} bytes)", offset, encoding.name(), bytes.len());
    decode_strict(&bytes[strip..], encoding, u64::from(offset))
}

/// Tag 0xF6: u32 length, then raw bytes.
pub fn read_binary(cursor: &mut ByteCursor<'_>, offset: u32) -> Result<Vec<u8>> {
    cursor.seek(u64::from(offset));
    Ok(cursor.read_length_prefixed()?.to_vec())
}

/// Tag 0xF7: 8 skipped bytes, u32 length, then UTF-8 text.
pub fn read_platform_text(cursor: &mut ByteCursor<'_>, offset: u32) -> Result<String> {
    let start = u64::from(offset) + PLATFORM_TEXT_PREFIX;
    cursor.seek(start);
    let bytes = cursor.read_length_prefixed()?;
    decode_utf8(bytes, start)
}

/// Tag 0xE1.
pub fn boolean(raw: u32) -> bool {
    raw != 0
}

/// Tag 0xE2. The field is read unsigned.
pub fn inline_integer(raw: u32) -> i64 {
    i64::from(raw)
}

/// Tag 0xE3: the field's bits as an IEEE-754 single.
pub fn inline_float32(raw: u32) -> f32 {
    f32::from_bits(raw)
}

/// Tag 0x23.
pub fn read_integer64(cursor: &mut ByteCursor<'_>, offset: u32) -> Result<i64> {
    cursor.seek(u64::from(offset));
    cursor.read_i64()
}

/// Tag 0x33.
pub fn read_float64(cursor: &mut ByteCursor<'_>, offset: u32) -> Result<f64> {
    cursor.seek(u64::from(offset));
    cursor.read_f64()
}

/// Tag 0x13: f64 seconds since 2001-01-01T00:00:00.
pub fn read_date(cursor: &mut ByteCursor<'_>, offset: u32) -> Result<NaiveDateTime> {
    let seconds = read_float64(cursor, offset)?;
    date_from_seconds(seconds).ok_or(MdplistError::InvalidDate { offset, seconds })
}

/// 2001-01-01T00:00:00, the reference point for dates.
pub fn reference_epoch() -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(2001, 1, 1).and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Converts seconds since the reference epoch to an instant, at microsecond precision.
///
/// Returns `None` for non-finite or out of range values.
pub fn date_from_seconds(seconds: f64) -> Option<NaiveDateTime> {
    let micros = (seconds * 1_000_000.0).round();
    if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
        return None;
    }
    reference_epoch()?.checked_add_signed(Duration::microseconds(micros as i64))
}

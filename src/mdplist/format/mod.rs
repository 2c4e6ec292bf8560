//! File format parsing layer for MDPLIST files.
//!
//! # Module Organization
//!
//! - [`header`]: Validates the magic and reads the fixed header fields
//! - [`keys`]: Loads the key table shared by every mapping
//! - [`scalars`]: Decodes leaf values
//! - [`containers`]: Decodes sequences and mappings from their footers
//! - [`dispatch`]: Routes each `(offset, type)` descriptor to its decoder
//!
//! # Architecture
//!
//! ```text
//! File Structure:
//! ┌─────────────────┐
//! │  Header         │ ← header::parse()
//! ├─────────────────┤
//! │  Key Table      │ ← keys::parse()
//! ├─────────────────┤
//! │  Entries        │ ← dispatch::Decoder::process()
//! │  (containers    │     ├─ containers (recurse per footer record)
//! │   and scalars)  │     └─ scalars
//! └─────────────────┘
//! ```

pub mod containers;
pub(crate) mod dispatch;
pub(crate) mod header;
pub mod keys;
pub(crate) mod scalars;

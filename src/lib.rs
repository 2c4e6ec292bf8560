//! # mdplist-reader
//!
//! A reader for DEBA/MDPLIST binary property list files.
//! Decodes the whole document into a [`Value`] tree of mappings, sequences,
//! strings, numbers, dates, binary blobs, booleans and nulls.
pub mod mdplist;

// Re-export the main types for convenience
pub use mdplist::{
    format::{containers::ContainerFrame, keys::KeyTable},
    json::{to_json, to_json_string},
    load, loads, MdplistError, MdplistReader, Result,
    types::models::{
        ContainerKind, Diagnostic, Document, EntryDescriptor, EntryType, Mapping,
        MdplistHeader, ParseOptions, StridePolicy, Value, MAGIC,
    },
};

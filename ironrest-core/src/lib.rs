//! # IronRest Core
//!
//! Wire-codec runtime shared by every IronRest generated type.
//!
//! This crate provides:
//! - The [`Value`] model that records, unions and patches marshal into
//! - Compact JSON and URL-safe (ROR2) text forms of that model
//! - [`Marshal`] / [`Unmarshal`] traits with record reader and writer helpers
//! - Deterministic FNV-1a hashing through [`ComputeHash`]
//! - The partial-update contract ([`PartialUpdate`], [`PatchFieldChecker`])
//! - Prebuilt common types in their generated form

pub mod common;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod hash;
pub mod json;
pub mod patch;
pub mod raw;
pub mod ror2;
pub mod value;

pub use decoder::{RequiredFields, Unmarshal, from_json, from_ror2, read_record};
pub use encoder::{Marshal, RecordWriter, to_json, to_ror2};
pub use error::{CodecError, Result};
pub use hash::{ComputeHash, Hash};
pub use indexmap::IndexMap;
pub use patch::{
    DELETE_FIELD, PATCH_FIELD, PATCH_REQUIRED_FIELDS, PATCH_SECTIONS_REQUIRED_FIELDS, PartialUpdate,
    PatchFieldChecker, SET_FIELD, marshal_partial_update, read_delete_fields, unmarshal_partial_update,
};
pub use raw::{RawPartialUpdate, RawRecord};
pub use value::{Bytes, Value};

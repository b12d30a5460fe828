// DO NOT EDIT
//
// Code automatically generated by ironrest
// Source files:
// - schemas/com/example/Greeting.pdl

pub mod common;

pub mod greeting_key;
pub use greeting_key::*;

pub use crate::generated::cyclic::api::body::*;
pub use crate::generated::cyclic::api::greeting::*;
pub use crate::generated::cyclic::api::md5::*;
pub use crate::generated::cyclic::api::tone::*;

// DO NOT EDIT
//
// Code automatically generated by ironrest
// Source files:
// - schemas/com/example/common/Text.pdl

pub mod text;
pub use text::*;

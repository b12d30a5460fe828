// DO NOT EDIT
//
// Code automatically generated by ironrest
// Source files:
// - schemas/com/example/Greeting.pdl

pub mod body;
pub use body::*;
pub mod greeting;
pub use greeting::*;
pub mod md5;
pub use md5::*;
pub mod tone;
pub use tone::*;

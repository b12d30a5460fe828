//! # IronRest Example
//!
//! Types generated by the build script from `schemas/`, compiled against
//! `ironrest-core`. The `common` root holds `Text`; the `api` root holds a
//! `Greeting` that refers to itself through the `Body` union, so its types
//! are emitted into the cyclic module of that root.

pub mod generated;

//! Deterministic value hashing.
//!
//! Generated types fold each present field, in declaration order, into an
//! FNV-1a 64-bit accumulator. The result is stable across platforms and runs,
//! and is meant for value-based lookup acceleration only.

use crate::value::{Bytes, Value};
use indexmap::IndexMap;

const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const PRIME: u64 = 0x0000_0100_0000_01b3;
// Written after every variable-length item so that "ab"+"c" and "a"+"bc" differ.
const TERMINATOR: u8 = 0xff;

/// Running FNV-1a accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hash(u64);

impl Hash {
    /// Creates a fresh accumulator seeded with the FNV offset basis.
    #[must_use]
    pub const fn new() -> Self {
        Self(OFFSET_BASIS)
    }

    /// The hash of an absent value.
    #[must_use]
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Returns the accumulated hash.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Folds raw bytes into the accumulator.
    pub fn add_raw(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= u64::from(b);
            self.0 = self.0.wrapping_mul(PRIME);
        }
    }

    /// Folds a boolean.
    pub fn add_bool(&mut self, value: bool) {
        self.add_raw(&[u8::from(value)]);
    }

    /// Folds a 32-bit integer.
    pub fn add_int(&mut self, value: i32) {
        self.add_raw(&value.to_le_bytes());
    }

    /// Folds a 64-bit integer.
    pub fn add_long(&mut self, value: i64) {
        self.add_raw(&value.to_le_bytes());
    }

    /// Folds a 32-bit float by its bit pattern. `-0.0` folds as `0.0`.
    pub fn add_float(&mut self, value: f32) {
        let value = if value == 0.0 { 0.0 } else { value };
        self.add_raw(&value.to_bits().to_le_bytes());
    }

    /// Folds a 64-bit float by its bit pattern. `-0.0` folds as `0.0`.
    pub fn add_double(&mut self, value: f64) {
        let value = if value == 0.0 { 0.0 } else { value };
        self.add_raw(&value.to_bits().to_le_bytes());
    }

    /// Folds a string.
    pub fn add_string(&mut self, value: &str) {
        self.add_raw(value.as_bytes());
        self.add_raw(&[TERMINATOR]);
    }

    /// Folds a byte string.
    pub fn add_bytes(&mut self, value: &[u8]) {
        self.add_raw(value);
        self.add_raw(&[TERMINATOR]);
    }

    /// Folds another hash.
    pub fn add_hash(&mut self, other: Hash) {
        self.add_long(other.0 as i64);
    }

    /// Folds any hashable value.
    pub fn add<T: ComputeHash + ?Sized>(&mut self, value: &T) {
        self.add_hash(value.compute_hash());
    }
}

impl Default for Hash {
    fn default() -> Self {
        Self::new()
    }
}

/// Types that produce a deterministic [`Hash`].
///
/// Equal values (per `PartialEq`) must produce equal hashes.
pub trait ComputeHash {
    /// Computes the hash of this value.
    fn compute_hash(&self) -> Hash;
}

macro_rules! impl_scalar_hash {
    ($($ty:ty => $method:ident),* $(,)?) => {
        $(
            impl ComputeHash for $ty {
                fn compute_hash(&self) -> Hash {
                    let mut hash = Hash::new();
                    hash.$method(*self);
                    hash
                }
            }
        )*
    };
}

impl_scalar_hash! {
    bool => add_bool,
    i32 => add_int,
    i64 => add_long,
    f32 => add_float,
    f64 => add_double,
}

impl ComputeHash for str {
    fn compute_hash(&self) -> Hash {
        let mut hash = Hash::new();
        hash.add_string(self);
        hash
    }
}

impl ComputeHash for String {
    fn compute_hash(&self) -> Hash {
        self.as_str().compute_hash()
    }
}

impl ComputeHash for Bytes {
    fn compute_hash(&self) -> Hash {
        let mut hash = Hash::new();
        hash.add_bytes(self);
        hash
    }
}

impl<T: ComputeHash + ?Sized> ComputeHash for Box<T> {
    fn compute_hash(&self) -> Hash {
        (**self).compute_hash()
    }
}

impl<T: ComputeHash> ComputeHash for Option<T> {
    fn compute_hash(&self) -> Hash {
        match self {
            Some(value) => value.compute_hash(),
            None => Hash::zero(),
        }
    }
}

impl<T: ComputeHash> ComputeHash for Vec<T> {
    fn compute_hash(&self) -> Hash {
        let mut hash = Hash::new();
        for item in self {
            hash.add(item);
        }
        hash
    }
}

/// Entries are folded in key order so that maps equal under `PartialEq`
/// (which ignores insertion order) hash equally.
impl<T: ComputeHash> ComputeHash for IndexMap<String, T> {
    fn compute_hash(&self) -> Hash {
        let mut entries: Vec<(&String, &T)> = self.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        let mut hash = Hash::new();
        for (key, value) in entries {
            hash.add_string(key);
            hash.add(value);
        }
        hash
    }
}

impl ComputeHash for Value {
    fn compute_hash(&self) -> Hash {
        match self {
            Self::Bool(b) => b.compute_hash(),
            Self::Int(i) => i.compute_hash(),
            Self::Long(l) => l.compute_hash(),
            Self::Float(f) => f.compute_hash(),
            Self::Double(d) => d.compute_hash(),
            Self::String(s) => s.compute_hash(),
            Self::Bytes(b) => b.compute_hash(),
            Self::Array(items) => items.compute_hash(),
            Self::Map(entries) => entries.compute_hash(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fnv1a_reference_values() {
        let mut hash = Hash::new();
        hash.add_raw(b"hello");
        assert_eq!(hash.value(), 0xa430_d846_80aa_bd0b);
        assert_eq!(Hash::new().value(), 0xcbf2_9ce4_8422_2325);
    }

    #[test]
    fn test_absent_value_hashes_to_zero() {
        let absent: Option<String> = None;
        assert_eq!(absent.compute_hash(), Hash::zero());
        assert_ne!(Some(String::new()).compute_hash(), Hash::zero());
    }

    #[test]
    fn test_signed_zero_hashes_like_zero() {
        assert_eq!((-0.0_f64).compute_hash(), 0.0_f64.compute_hash());
        assert_eq!((-0.0_f32).compute_hash(), 0.0_f32.compute_hash());
        assert_ne!(1.5_f64.compute_hash(), (-1.5_f64).compute_hash());
    }

    #[test]
    fn test_string_boundaries_matter() {
        let mut a = Hash::new();
        a.add_string("ab");
        a.add_string("c");
        let mut b = Hash::new();
        b.add_string("a");
        b.add_string("bc");
        assert_ne!(a, b);
    }

    #[test]
    fn test_map_hash_ignores_insertion_order() {
        let mut first = IndexMap::new();
        first.insert("a".to_string(), 1i32);
        first.insert("b".to_string(), 2i32);
        let mut second = IndexMap::new();
        second.insert("b".to_string(), 2i32);
        second.insert("a".to_string(), 1i32);
        assert_eq!(first, second);
        assert_eq!(first.compute_hash(), second.compute_hash());
    }

    #[test]
    fn test_array_hash_is_order_sensitive() {
        assert_ne!(vec![1i32, 2].compute_hash(), vec![2i32, 1].compute_hash());
    }
}

// DO NOT EDIT
//
// Code automatically generated by ironrest
// Source files:
// - schemas/com/example/Greeting.pdl

use ironrest_core as rt;

// Md5

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Md5(rt::Bytes);

impl Md5 {
    /// Number of bytes every value holds.
    pub const SIZE: usize = 4;

    /// Creates a value, checking its length.
    ///
    /// # Errors
    /// Returns `CodecError` if the length is not `SIZE`.
    pub fn new(bytes: impl Into<Vec<u8>>) -> rt::Result<Self> {
        let bytes = rt::Bytes::new(bytes);
        if bytes.len() != Self::SIZE {
            return Err(rt::CodecError::invalid(format!(
                "com.example.Md5 expects {} bytes, found {}",
                Self::SIZE,
                bytes.len()
            )));
        }
        Ok(Self(bytes))
    }

    /// Returns the bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl rt::ComputeHash for Md5 {
    fn compute_hash(&self) -> rt::Hash {
        rt::ComputeHash::compute_hash(&self.0)
    }
}

impl rt::Marshal for Md5 {
    fn marshal(&self) -> rt::Result<rt::Value> {
        rt::Marshal::marshal(&self.0)
    }
}

impl rt::Unmarshal for Md5 {
    fn unmarshal(value: &rt::Value) -> rt::Result<Self> {
        Self::new(value.as_bytes()?.0)
    }
}


// DO NOT EDIT
//
// Code automatically generated by ironrest
// Source files:
// - schemas/com/example/Greeting.pdl

use ironrest_core as rt;

// Tone

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// `FRIENDLY`
    Friendly,
    /// `SINCERE`
    Sincere,
    /// A symbol unknown to this version of the schema.
    Unrecognized,
}

impl Tone {
    /// Returns the wire symbol.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Friendly => "FRIENDLY",
            Self::Sincere => "SINCERE",
            Self::Unrecognized => "$UNKNOWN",
        }
    }

    /// Parses a wire symbol; unknown symbols map to the fallback variant.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Self {
        match symbol {
            "FRIENDLY" => Self::Friendly,
            "SINCERE" => Self::Sincere,
            _ => Self::Unrecognized,
        }
    }
}

impl rt::ComputeHash for Tone {
    fn compute_hash(&self) -> rt::Hash {
        let mut hash = rt::Hash::new();
        hash.add_string(self.as_str());
        hash
    }
}

impl rt::Marshal for Tone {
    fn marshal(&self) -> rt::Result<rt::Value> {
        if *self == Self::Unrecognized {
            return Err(rt::CodecError::invalid("cannot marshal an unrecognized com.example.Tone symbol"));
        }
        Ok(rt::Value::from(self.as_str()))
    }
}

impl rt::Unmarshal for Tone {
    fn unmarshal(value: &rt::Value) -> rt::Result<Self> {
        value.as_str().map(Self::from_symbol)
    }
}


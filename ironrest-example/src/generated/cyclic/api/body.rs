// DO NOT EDIT
//
// Code automatically generated by ironrest
// Source files:
// - schemas/com/example/Greeting.pdl

use ironrest_core as rt;

// Body

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    String(String),
    Reply(Box<crate::generated::com::example::Greeting>),
}

impl rt::ComputeHash for Body {
    fn compute_hash(&self) -> rt::Hash {
        let mut hash = rt::Hash::new();
        match self {
            Self::String(member) => {
                hash.add_string("string");
                hash.add(member);
            }
            Self::Reply(member) => {
                hash.add_string("reply");
                hash.add(member);
            }
        }
        hash
    }
}

impl rt::Marshal for Body {
    fn marshal(&self) -> rt::Result<rt::Value> {
        let mut writer = rt::RecordWriter::new();
        match self {
            Self::String(member) => writer.field("string", member)?,
            Self::Reply(member) => writer.field("reply", member)?,
        };
        Ok(writer.finish())
    }
}

impl rt::Unmarshal for Body {
    fn unmarshal(value: &rt::Value) -> rt::Result<Self> {
        let entries = value.as_map()?;
        let mut iter = entries.iter();
        let (Some((key, member)), None) = (iter.next(), iter.next()) else {
            return Err(rt::CodecError::invalid(format!(
                "union com.example.Body must hold exactly one member, found {}",
                entries.len()
            )));
        };
        let read = match key.as_str() {
            "string" => rt::Unmarshal::unmarshal(member).map(Self::String),
            "reply" => rt::Unmarshal::unmarshal(member).map(Self::Reply),
            other => {
                return Err(rt::CodecError::invalid(format!(
                    "unknown member '{other}' of union com.example.Body"
                )));
            }
        };
        read.map_err(|e| e.in_field(key.as_str()))
    }
}


// DO NOT EDIT
//
// Code automatically generated by ironrest
// Source files:
// - schemas/com/example/Greeting.pdl

use ironrest_core as rt;

// GreetingKey

#[derive(Debug, Clone, PartialEq)]
pub struct GreetingKey {
    pub key: crate::generated::com::example::common::Text,
    pub params: Option<crate::generated::com::example::common::Text>,
}

impl rt::ComputeHash for GreetingKey {
    fn compute_hash(&self) -> rt::Hash {
        let mut hash = rt::Hash::new();
        hash.add(&self.key);
        hash.add(&self.params);
        hash
    }
}

impl rt::Marshal for GreetingKey {
    fn marshal(&self) -> rt::Result<rt::Value> {
        let mut value = rt::Marshal::marshal(&self.key)?;
        if let Some(params) = &self.params {
            let params = rt::Marshal::marshal(params)
                .map_err(|e: rt::CodecError| e.in_field("$params"))?;
            if let rt::Value::Map(entries) = &mut value {
                entries.insert("$params".to_string(), params);
            }
        }
        Ok(value)
    }
}

impl rt::Unmarshal for GreetingKey {
    fn unmarshal(value: &rt::Value) -> rt::Result<Self> {
        let key: crate::generated::com::example::common::Text = rt::Unmarshal::unmarshal(value)?;
        let params: Option<crate::generated::com::example::common::Text> = match value.as_map()?.get("$params") {
            Some(params) => Some(
                rt::Unmarshal::unmarshal(params)
                    .map_err(|e: rt::CodecError| e.in_field("$params"))?,
            ),
            None => None,
        };
        Ok(Self { key, params })
    }
}


//! Adapter for `serde_json_bytes::Value`, whose keys and strings are
//! reference-counted byte strings.

use serde::de::DeserializeOwned;
use serde_json_bytes::{ByteString, Map, Value};

use super::{match_key, JsonNode};

type Object = Map<ByteString, Value>;

fn key_for(map: &Object, name: &str) -> Option<String> {
    let keys: Vec<&str> = map.keys().map(ByteString::as_str).collect();
    match_key(&keys, name).map(str::to_owned)
}

impl JsonNode for Value {
    fn null() -> Self {
        Value::Null
    }

    fn object() -> Self {
        Value::Object(Map::new())
    }

    fn array(elements: Vec<Self>) -> Self {
        Value::Array(elements)
    }

    fn string(value: &str) -> Self {
        Value::String(ByteString::from(value))
    }

    fn boolean(value: bool) -> Self {
        Value::Bool(value)
    }

    fn number(value: u64) -> Self {
        Value::Number(value.into())
    }

    fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    fn field_names(&self) -> Vec<String> {
        match self {
            Value::Object(map) => map.keys().map(|key| key.as_str().to_owned()).collect(),
            _ => Vec::new(),
        }
    }

    fn field_count(&self) -> usize {
        match self {
            Value::Object(map) => map.len(),
            _ => 0,
        }
    }

    fn field(&self, name: &str) -> Option<&Self> {
        let Value::Object(map) = self else {
            return None;
        };
        let key = key_for(map, name)?;
        map.get(key.as_str())
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut Self> {
        let Value::Object(map) = self else {
            return None;
        };
        let key = key_for(map, name)?;
        map.get_mut(key.as_str())
    }

    fn take_field(&mut self, name: &str) -> Option<Self> {
        let Value::Object(map) = self else {
            return None;
        };
        let key = key_for(map, name)?;
        map.remove(key.as_str())
    }

    fn set_field(&mut self, name: &str, value: Self) {
        if let Value::Object(map) = self {
            let stale: Vec<String> = map
                .keys()
                .filter(|key| key.as_str().eq_ignore_ascii_case(name))
                .map(|key| key.as_str().to_owned())
                .collect();
            for key in stale {
                map.remove(key.as_str());
            }
            map.insert(ByteString::from(name), value);
        }
    }

    fn children_mut(&mut self) -> Vec<&mut Self> {
        match self {
            Value::Object(map) => map.values_mut().collect(),
            Value::Array(items) => items.iter_mut().collect(),
            _ => Vec::new(),
        }
    }

    fn into_elements(self) -> std::result::Result<Vec<Self>, Self> {
        match self {
            Value::Array(items) => Ok(items),
            other => Err(other),
        }
    }

    fn deserialize_into<T: DeserializeOwned>(self) -> serde_json::Result<T> {
        serde_json_bytes::from_value(self)
    }
}

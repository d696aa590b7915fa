//! JSON tree capabilities required by the pagination rewriter.
//!
//! The rewrite algorithm is written once against [`JsonNode`]; each supported
//! JSON library gets a thin adapter in a submodule.

use serde::{de::DeserializeOwned, Serialize};

mod bytes;
mod value;

/// A mutable JSON tree node.
///
/// Field lookups are case-insensitive: GraphQL servers do not agree on the
/// casing of connection fields, so `PageInfo`, `pageInfo` and `pageinfo` all
/// resolve to the same field. An exact match wins over a case-folded one.
pub trait JsonNode: Clone + Serialize + DeserializeOwned {
    fn null() -> Self;
    fn object() -> Self;
    fn array(elements: Vec<Self>) -> Self;
    fn string(value: &str) -> Self;
    fn boolean(value: bool) -> Self;
    fn number(value: u64) -> Self;

    fn is_null(&self) -> bool;
    fn is_object(&self) -> bool;
    fn is_array(&self) -> bool;

    fn as_str(&self) -> Option<&str>;
    fn as_bool(&self) -> Option<bool>;
    fn as_u64(&self) -> Option<u64>;

    /// Field names of an object in insertion order; empty for anything else.
    fn field_names(&self) -> Vec<String>;

    fn field(&self, name: &str) -> Option<&Self>;
    fn field_mut(&mut self, name: &str) -> Option<&mut Self>;

    /// Removes a field and returns its value.
    fn take_field(&mut self, name: &str) -> Option<Self>;

    /// Sets `name` to `value`, replacing every case-insensitive match so the
    /// object ends up with exactly one `name` key. No-op on non-objects.
    fn set_field(&mut self, name: &str, value: Self);

    /// Direct children: object field values or array elements.
    fn children_mut(&mut self) -> Vec<&mut Self>;

    /// Consumes an array into its elements, handing back anything else.
    fn into_elements(self) -> std::result::Result<Vec<Self>, Self>;

    /// Structural bind of this node into `T`.
    fn deserialize_into<T: DeserializeOwned>(self) -> serde_json::Result<T>;

    fn field_count(&self) -> usize {
        self.field_names().len()
    }

    fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

/// Picks the key matching `name`, preferring an exact match.
pub(crate) fn match_key<'a>(keys: &[&'a str], name: &str) -> Option<&'a str> {
    keys.iter()
        .find(|key| **key == name)
        .or_else(|| keys.iter().find(|key| key.eq_ignore_ascii_case(name)))
        .copied()
}

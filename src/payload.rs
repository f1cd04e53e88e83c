//! Ordered key/value payloads produced by the render pipeline.
//!
//! Field order is part of the contract: template projection zips a template's
//! keys positionally against the payload's values, so `{code, msg, http}` must
//! stay in declaration order. Payloads are small (three to five fields), so
//! they live inline in a [`SmallVec`].

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use smallvec::SmallVec;
use std::borrow::Cow;
use std::fmt;

/// Ordered, key-unique collection of payload fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    fields: SmallVec<[(Cow<'static, str>, Value); 4]>,
}

impl Payload {
    /// Empty payload.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Payload::insert`].
    ///
    /// ```rust
    /// use business_errors::Payload;
    ///
    /// let extra = Payload::new().with("field", "email").with("retry", false);
    /// assert_eq!(extra.len(), 2);
    /// ```
    #[must_use]
    pub fn with(mut self, key: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set `key`, keeping its position if it already exists.
    ///
    /// Returns the replaced value.
    pub fn insert(&mut self, key: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.fields.push((key, value));
                None
            }
        }
    }

    /// Overlay `other` onto `self`; keys from `other` win.
    pub fn merge(&mut self, other: Payload) {
        for (key, value) in other.fields {
            self.insert(key, value);
        }
    }

    /// Look up a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    /// Field keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_ref())
    }

    /// Field values in order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|(_, value)| value)
    }

    /// Fields in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(key, value)| (key.as_ref(), value))
    }

    /// Number of fields.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check for an empty payload.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Convert into a JSON object, preserving field order.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect(),
        )
    }
}

impl<K, V> FromIterator<(K, V)> for Payload
where
    K: Into<Cow<'static, str>>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut payload = Self::new();
        for (key, value) in iter {
            payload.insert(key, value);
        }
        payload
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

impl IntoIterator for Payload {
    type Item = (Cow<'static, str>, Value);
    type IntoIter = smallvec::IntoIter<[(Cow<'static, str>, Value); 4]>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key.as_ref(), value)?;
        }
        map.end()
    }
}

impl fmt::Display for Payload {
    /// Compact JSON, in field order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_keeps_position_on_overwrite() {
        let mut payload = Payload::new().with("a", 1).with("b", 2).with("c", 3);
        let previous = payload.insert("b", 20);

        assert_eq!(previous, Some(json!(2)));
        assert_eq!(payload.keys().collect::<Vec<_>>(), ["a", "b", "c"]);
        assert_eq!(payload.get("b"), Some(&json!(20)));
    }

    #[test]
    fn merge_lets_other_win() {
        let mut base = Payload::new().with("c", 1).with("m", "Bad");
        base.merge(Payload::new().with("m", "Worse").with("hint", "retry"));

        assert_eq!(base.to_json(), json!({"c": 1, "m": "Worse", "hint": "retry"}));
    }

    #[test]
    fn display_is_ordered_json() {
        let payload = Payload::new().with("z", 1).with("a", "x");
        assert_eq!(payload.to_string(), r#"{"z":1,"a":"x"}"#);
    }

    #[test]
    fn spills_past_inline_capacity() {
        let payload: Payload = (0..10).map(|i| (format!("k{i}"), i)).collect();
        assert_eq!(payload.len(), 10);
        assert_eq!(payload.get("k9"), Some(&json!(9)));
    }

    #[test]
    fn from_json_map_preserves_order() {
        let Value::Object(map) = json!({"second": 2, "first": 1}) else {
            unreachable!("literal is an object");
        };
        let payload = Payload::from(map);
        assert_eq!(payload.keys().collect::<Vec<_>>(), ["second", "first"]);
    }
}

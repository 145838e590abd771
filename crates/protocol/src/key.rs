use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Stable identity of a datum across animation frames.
///
/// Bars are matched to records by this key on every tick, and the same
/// name is carried by the record, the scene element and every `DrawRect`
/// emitted for it. Cloning only bumps a refcount.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(Arc<str>);

impl Key {
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Key {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Key {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Key {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Key {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Key {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Serialized as a bare string so JSON consumers see `"key": "A"`.
impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Key::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeSet, HashMap};

    #[test]
    fn equal_by_content_not_pointer() {
        let a = Key::from("A");
        let b = Key::from(String::from("A"));
        assert_eq!(a, b);
        assert_eq!(a, "A");
    }

    #[test]
    fn lookups_by_borrowed_str() {
        let mut heights = HashMap::new();
        heights.insert(Key::from("E"), 0.127);
        assert_eq!(heights.get("E"), Some(&0.127));
        assert!(heights.get("Z").is_none());
    }

    #[test]
    fn ordered_like_strings() {
        let keys: BTreeSet<Key> = ["C", "A", "B"].into_iter().map(Key::from).collect();
        let names: Vec<&str> = keys.iter().map(Key::as_str).collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[test]
    fn json_is_a_plain_string() {
        let key = Key::from("Q");
        assert_eq!(serde_json::to_string(&key).ok().as_deref(), Some("\"Q\""));
        let back: Option<Key> = serde_json::from_str("\"Q\"").ok();
        assert_eq!(back, Some(key));
    }
}

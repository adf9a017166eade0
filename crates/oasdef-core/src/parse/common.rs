use std::fmt;
use std::marker::PhantomData;

use indexmap::IndexMap;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Specification extensions (`x-*` keys) attached to an object.
pub type Extensions = IndexMap<String, Value>;

/// Prefix every specification extension key starts with.
pub const EXTENSION_PREFIX: &str = "x-";

/// Extension prefixes reserved for the OpenAPI Initiative.
pub const RESERVED_EXTENSION_PREFIXES: [&str; 2] = ["x-oai-", "x-oas-"];

pub fn is_extension(key: &str) -> bool {
    key.starts_with(EXTENSION_PREFIX)
}

pub fn is_reserved_extension(key: &str) -> bool {
    RESERVED_EXTENSION_PREFIXES
        .iter()
        .any(|prefix| key.starts_with(prefix))
}

/// Serde adapter for a flattened [`Extensions`] field: only `x-` keys are
/// kept, everything else the containing struct did not claim is dropped.
pub mod extensions {
    use super::*;

    pub fn serialize<S>(extensions: &Extensions, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in extensions.iter().filter(|(k, _)| is_extension(k)) {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Extensions, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut map = IndexMap::<String, Value>::deserialize(deserializer)?;
        map.retain(|k, _| is_extension(k));
        Ok(map)
    }
}

/// Deserialize a field that was present in the input, keeping an explicit
/// `null` as `Some(Value::Null)`. Pair with `#[serde(default)]`.
pub(crate) fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// A map-shaped object whose `x-` keys are extensions and whose other keys
/// are entries of type `T` (Paths, Responses, Callback).
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensibleMap<T> {
    pub entries: IndexMap<String, T>,
    pub extensions: Extensions,
}

impl<T> Default for ExtensibleMap<T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
            extensions: Extensions::new(),
        }
    }
}

impl<T> ExtensibleMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.extensions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: T) -> Option<T> {
        self.entries.insert(key.into(), value)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, T> {
        self.entries.iter()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, T> {
        self.entries.keys()
    }
}

impl<T> FromIterator<(String, T)> for ExtensibleMap<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            extensions: Extensions::new(),
        }
    }
}

impl<T: Serialize> Serialize for ExtensibleMap<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len() + self.extensions.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        for (key, value) in &self.extensions {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ExtensibleMap<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ExtensibleMapVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for ExtensibleMapVisitor<T> {
            type Value = ExtensibleMap<T>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut out = ExtensibleMap::new();
                while let Some(key) = access.next_key::<String>()? {
                    let value: Value = access.next_value()?;
                    if is_extension(&key) {
                        out.extensions.insert(key, value);
                        continue;
                    }
                    let entry = T::deserialize(value)
                        .map_err(|e| de::Error::custom(format!("{key}: {e}")))?;
                    out.entries.insert(key, entry);
                }
                Ok(out)
            }
        }

        deserializer.deserialize_map(ExtensibleMapVisitor(PhantomData))
    }
}

/// Contact information for the exposed API.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

/// A reference to external documentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalDocumentation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub url: String,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

/// Tag definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocumentation>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

/// Discriminator for polymorphic schemas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discriminator {
    #[serde(rename = "propertyName")]
    pub property_name: String,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub mapping: IndexMap<String, String>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

/// XML serialization hints for a schema property.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Xml {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapped: Option<bool>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extensions_keep_only_x_keys() {
        let contact: Contact = serde_json::from_value(json!({
            "name": "API Support",
            "x-team": "platform",
            "stray": true
        }))
        .unwrap();
        assert_eq!(contact.name.as_deref(), Some("API Support"));
        assert_eq!(contact.extensions.len(), 1);
        assert_eq!(contact.extensions["x-team"], "platform");

        let back = serde_json::to_value(&contact).unwrap();
        assert_eq!(back, json!({"name": "API Support", "x-team": "platform"}));
    }

    #[test]
    fn test_extensible_map_splits_entries_and_extensions() {
        let map: ExtensibleMap<String> = serde_json::from_value(json!({
            "/pets": "a",
            "x-internal": {"owner": "core"},
            "/pets/{id}": "b"
        }))
        .unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.keys().collect::<Vec<_>>(), ["/pets", "/pets/{id}"]);
        assert_eq!(map.extensions["x-internal"]["owner"], "core");
    }

    #[test]
    fn test_extensible_map_error_names_key() {
        let err = serde_json::from_value::<ExtensibleMap<u32>>(json!({"ok": 1, "bad": "x"}))
            .unwrap_err();
        assert!(err.to_string().starts_with("bad:"), "{err}");
    }

    #[test]
    fn test_reserved_extension_prefixes() {
        assert!(is_reserved_extension("x-oai-foo"));
        assert!(is_reserved_extension("x-oas-bar"));
        assert!(!is_reserved_extension("x-oa"));
        assert!(!is_reserved_extension("x-internal"));
    }
}

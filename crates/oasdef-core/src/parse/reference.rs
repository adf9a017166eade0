use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A `$ref` indirection node.
///
/// `summary` and `description` override the target's values and are only
/// permitted by OpenAPI 3.1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "$ref")]
    pub reference: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Reference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            summary: None,
            description: None,
        }
    }

    /// Split a local component pointer such as `#/components/schemas/Pet`
    /// into `("schemas", "Pet")`. Returns `None` for any other shape.
    pub fn local_component(&self) -> Option<(&str, &str)> {
        let rest = self.reference.strip_prefix("#/components/")?;
        let (section, name) = rest.split_once('/')?;
        if section.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some((section, name))
    }
}

/// A reference or an inline value.
///
/// Any object carrying a `$ref` key decodes as [`ReferenceOr::Reference`];
/// everything else is decoded as `T` so its own errors are reported intact.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReferenceOr<T> {
    Reference(Reference),
    Item(T),
}

impl<T> ReferenceOr<T> {
    pub fn reference(reference: impl Into<String>) -> Self {
        ReferenceOr::Reference(Reference::new(reference))
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, ReferenceOr::Reference(_))
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            ReferenceOr::Reference(r) => Some(r),
            ReferenceOr::Item(_) => None,
        }
    }

    pub fn as_item(&self) -> Option<&T> {
        match self {
            ReferenceOr::Reference(_) => None,
            ReferenceOr::Item(item) => Some(item),
        }
    }

    pub fn into_item(self) -> Option<T> {
        match self {
            ReferenceOr::Reference(_) => None,
            ReferenceOr::Item(item) => Some(item),
        }
    }
}

impl<T> From<T> for ReferenceOr<T> {
    fn from(item: T) -> Self {
        ReferenceOr::Item(item)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ReferenceOr<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let is_ref = value
            .as_object()
            .is_some_and(|map| map.contains_key("$ref"));
        if is_ref {
            Reference::deserialize(value)
                .map(ReferenceOr::Reference)
                .map_err(de::Error::custom)
        } else {
            T::deserialize(value)
                .map(ReferenceOr::Item)
                .map_err(de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Named {
        name: String,
    }

    #[test]
    fn test_ref_wins_when_present() {
        let r: ReferenceOr<Named> =
            serde_json::from_value(json!({"$ref": "#/components/schemas/Pet"})).unwrap();
        let reference = r.as_reference().unwrap();
        assert_eq!(reference.local_component(), Some(("schemas", "Pet")));
    }

    #[test]
    fn test_item_errors_are_not_masked() {
        let err = serde_json::from_value::<ReferenceOr<Named>>(json!({"title": "x"})).unwrap_err();
        assert!(err.to_string().contains("missing field `name`"), "{err}");
    }

    #[test]
    fn test_reference_override_fields() {
        let r: ReferenceOr<Named> = serde_json::from_value(json!({
            "$ref": "#/components/responses/NotFound",
            "summary": "Missing",
            "description": "The pet does not exist"
        }))
        .unwrap();
        let reference = r.as_reference().unwrap();
        assert_eq!(reference.summary.as_deref(), Some("Missing"));
        assert_eq!(
            serde_json::to_value(&r).unwrap()["description"],
            "The pet does not exist"
        );
    }

    #[test]
    fn test_local_component_rejects_other_pointers() {
        assert_eq!(Reference::new("Pet.yaml").local_component(), None);
        assert_eq!(Reference::new("#/definitions/Pet").local_component(), None);
        assert_eq!(
            Reference::new("#/components/schemas/a/b").local_component(),
            None
        );
    }
}

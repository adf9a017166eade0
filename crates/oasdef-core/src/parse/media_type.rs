use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::common::{Extensions, extensions};
use super::example::Examples;
use super::parameter::{Header, QueryStyle};
use super::reference::ReferenceOr;

/// Encoding object for `multipart` and `application/x-www-form-urlencoded`
/// request bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "S: Deserialize<'de>"))]
pub struct Encoding<S> {
    #[serde(rename = "contentType", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, ReferenceOr<Header<S>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<QueryStyle>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub explode: Option<bool>,

    #[serde(rename = "allowReserved", skip_serializing_if = "Option::is_none")]
    pub allow_reserved: Option<bool>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

/// A media type object: the schema and examples for one content type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "S: Deserialize<'de>"))]
pub struct MediaType<S> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<S>,

    #[serde(flatten)]
    pub examples: Examples,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub encoding: IndexMap<String, Encoding<S>>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

impl<S> Default for MediaType<S> {
    fn default() -> Self {
        Self {
            schema: None,
            examples: Examples::None,
            encoding: IndexMap::new(),
            extensions: Extensions::new(),
        }
    }
}

impl<S> MediaType<S> {
    pub fn with_schema(schema: S) -> Self {
        Self {
            schema: Some(schema),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::example::ExampleValue;
    use serde_json::{Value, json};

    #[test]
    fn test_named_examples_and_encoding() {
        let mt: MediaType<Value> = serde_json::from_value(json!({
            "schema": {"type": "object"},
            "examples": {
                "cat": {"summary": "A cat", "value": {"name": "Tom"}},
                "shared": {"$ref": "#/components/examples/Dog"}
            },
            "encoding": {
                "photo": {"contentType": "image/png", "headers": {
                    "X-Rate-Limit": {"schema": {"type": "integer"}}
                }}
            }
        }))
        .unwrap();

        let Examples::Named(named) = &mt.examples else {
            panic!("expected named examples");
        };
        assert_eq!(
            named["cat"].as_item().unwrap().value,
            Some(ExampleValue::Inline(json!({"name": "Tom"})))
        );
        assert!(named["shared"].is_reference());
        assert_eq!(
            mt.encoding["photo"].content_type.as_deref(),
            Some("image/png")
        );
    }

    #[test]
    fn test_empty_media_type_round_trips() {
        let mt: MediaType<Value> = serde_json::from_value(json!({})).unwrap();
        assert_eq!(mt, MediaType::default());
        assert_eq!(serde_json::to_value(&mt).unwrap(), json!({}));
    }
}

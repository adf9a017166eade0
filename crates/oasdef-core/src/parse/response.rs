use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::common::{ExtensibleMap, Extensions, extensions};
use super::media_type::MediaType;
use super::operation::Link;
use super::parameter::Header;
use super::reference::ReferenceOr;

/// A response definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "S: Deserialize<'de>"))]
pub struct Response<S> {
    pub description: String,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, ReferenceOr<Header<S>>>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaType<S>>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub links: IndexMap<String, ReferenceOr<Link>>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

/// Responses keyed by status code (`200`, `4XX`) or `default`.
pub type Responses<S> = ExtensibleMap<ReferenceOr<Response<S>>>;

/// Whether a Responses key is `default`, a status code in 100..=599, or a
/// range such as `2XX`.
pub fn is_valid_status_key(key: &str) -> bool {
    if key == "default" {
        return true;
    }
    let bytes = key.as_bytes();
    if bytes.len() != 3 || !(b'1'..=b'5').contains(&bytes[0]) {
        return false;
    }
    let digits = bytes[1..].iter().all(u8::is_ascii_digit);
    let range = bytes[1..].iter().all(|b| *b == b'X');
    digits || range
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_status_keys() {
        for ok in ["default", "200", "404", "5XX", "1XX", "599"] {
            assert!(is_valid_status_key(ok), "{ok}");
        }
        for bad in ["20", "2000", "600", "0XX", "2xx", "2X0", "ok"] {
            assert!(!is_valid_status_key(bad), "{bad}");
        }
    }

    #[test]
    fn test_responses_keep_extensions_apart() {
        let responses: Responses<Value> = serde_json::from_value(json!({
            "200": {"description": "ok"},
            "default": {"$ref": "#/components/responses/Error"},
            "x-cache": "none"
        }))
        .unwrap();
        assert_eq!(responses.len(), 2);
        assert!(responses.get("default").unwrap().is_reference());
        assert_eq!(responses.extensions["x-cache"], "none");
    }

    #[test]
    fn test_response_requires_description() {
        let result = serde_json::from_value::<Response<Value>>(json!({"content": {}}));
        assert!(result.is_err());
    }
}

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::common::{Extensions, extensions};

/// A server variable for URL templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerVariable {
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,

    pub default: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

/// A server URL definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub variables: IndexMap<String, ServerVariable>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

impl Server {
    /// Substitute every `{variable}` in the URL template with its default.
    /// Unknown variables are left untouched.
    pub fn default_url(&self) -> String {
        let mut url = self.url.clone();
        for (name, variable) in &self.variables {
            url = url.replace(&format!("{{{name}}}"), &variable.default);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_url_expands_variables() {
        let server: Server = serde_json::from_value(json!({
            "url": "https://{username}.example.com:{port}/{basePath}",
            "variables": {
                "username": {"default": "demo"},
                "port": {"enum": ["8443", "443"], "default": "8443"},
                "basePath": {"default": "v2"}
            }
        }))
        .unwrap();
        assert_eq!(server.default_url(), "https://demo.example.com:8443/v2");
        assert_eq!(server.variables["port"].enum_values.len(), 2);
    }

    #[test]
    fn test_missing_variable_default_is_an_error() {
        let result = serde_json::from_value::<Server>(json!({
            "url": "https://{region}.example.com",
            "variables": {"region": {"enum": ["eu"]}}
        }));
        assert!(result.is_err());
    }
}

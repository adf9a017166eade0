use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::common::{ExtensibleMap, Extensions, ExternalDocumentation, extensions, present};
use super::parameter::Parameter;
use super::reference::ReferenceOr;
use super::request_body::RequestBody;
use super::response::Responses;
use super::security::SecurityRequirement;
use super::server::Server;
use crate::error::ModelError;

/// HTTP methods a path item can hold an operation for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
        HttpMethod::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Trace => "trace",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        HttpMethod::ALL.into_iter().find(|m| m.as_str() == name)
    }
}

impl Serialize for HttpMethod {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which operation a Link points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// `operationRef`: a URI reference to an operation.
    OperationRef(String),
    /// `operationId`: the id of an operation in this document.
    OperationId(String),
}

/// A Link object describing a design-time relation between responses and
/// operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLink", into = "RawLink")]
pub struct Link {
    pub target: Option<LinkTarget>,
    pub parameters: IndexMap<String, Value>,
    pub request_body: Option<Value>,
    pub description: Option<String>,
    pub server: Option<Server>,
    pub extensions: Extensions,
}

#[derive(Serialize, Deserialize)]
struct RawLink {
    #[serde(rename = "operationRef", skip_serializing_if = "Option::is_none")]
    operation_ref: Option<String>,
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    operation_id: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    parameters: IndexMap<String, Value>,
    #[serde(
        rename = "requestBody",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    request_body: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    server: Option<Server>,
    #[serde(flatten, with = "extensions")]
    extensions: Extensions,
}

impl TryFrom<RawLink> for Link {
    type Error = ModelError;

    fn try_from(raw: RawLink) -> Result<Self, Self::Error> {
        let target = match (raw.operation_ref, raw.operation_id) {
            (Some(_), Some(_)) => {
                return Err(ModelError::MutuallyExclusive("operationRef", "operationId"));
            }
            (Some(r), None) => Some(LinkTarget::OperationRef(r)),
            (None, Some(id)) => Some(LinkTarget::OperationId(id)),
            (None, None) => None,
        };
        Ok(Link {
            target,
            parameters: raw.parameters,
            request_body: raw.request_body,
            description: raw.description,
            server: raw.server,
            extensions: raw.extensions,
        })
    }
}

impl From<Link> for RawLink {
    fn from(link: Link) -> Self {
        let (operation_ref, operation_id) = match link.target {
            Some(LinkTarget::OperationRef(r)) => (Some(r), None),
            Some(LinkTarget::OperationId(id)) => (None, Some(id)),
            None => (None, None),
        };
        RawLink {
            operation_ref,
            operation_id,
            parameters: link.parameters,
            request_body: link.request_body,
            description: link.description,
            server: link.server,
            extensions: link.extensions,
        }
    }
}

/// An API operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "S: Deserialize<'de>"))]
pub struct Operation<S> {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocumentation>,

    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ReferenceOr<Parameter<S>>>,

    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<ReferenceOr<RequestBody<S>>>,

    /// Required in 3.0, optional in 3.1.
    #[serde(default, skip_serializing_if = "ExtensibleMap::is_empty")]
    pub responses: Responses<S>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub callbacks: IndexMap<String, ReferenceOr<Callback<S>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

/// A path item, containing operations keyed by HTTP method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "S: Deserialize<'de>"))]
pub struct PathItem<S> {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation<S>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation<S>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation<S>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation<S>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation<S>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation<S>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation<S>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Operation<S>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ReferenceOr<Parameter<S>>>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

impl<S> Default for PathItem<S> {
    fn default() -> Self {
        Self {
            reference: None,
            summary: None,
            description: None,
            get: None,
            put: None,
            post: None,
            delete: None,
            options: None,
            head: None,
            patch: None,
            trace: None,
            servers: Vec::new(),
            parameters: Vec::new(),
            extensions: Extensions::new(),
        }
    }
}

impl<S> PathItem<S> {
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation<S>> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Options => self.options.as_ref(),
            HttpMethod::Head => self.head.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Trace => self.trace.as_ref(),
        }
    }

    /// Operations present on this path item, in method declaration order.
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation<S>)> + '_ {
        HttpMethod::ALL
            .into_iter()
            .filter_map(move |m| self.operation(m).map(|op| (m, op)))
    }
}

/// Callback object: runtime expressions mapped to path items.
pub type Callback<S> = ExtensibleMap<PathItem<S>>;

/// Paths object: URL templates mapped to path items.
pub type Paths<S> = ExtensibleMap<PathItem<S>>;

/// Replace every `{name}` segment of a path template with `{}` so that
/// templates differing only in parameter names compare equal.
pub fn normalize_template(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut in_param = false;
    for c in path.chars() {
        match c {
            '{' => {
                in_param = true;
                out.push('{');
            }
            '}' if in_param => {
                in_param = false;
                out.push('}');
            }
            _ if in_param => {}
            _ => out.push(c),
        }
    }
    out
}

/// Names of the `{params}` in a path template.
pub fn template_params(path: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut rest = path;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        params.push(&rest[start + 1..start + len]);
        rest = &rest[start + len + 1..];
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operations_in_method_order() {
        let item: PathItem<Value> = serde_json::from_value(json!({
            "post": {"responses": {"201": {"description": "created"}}},
            "get": {"operationId": "listPets", "responses": {"200": {"description": "ok"}}},
            "x-owner": "pets"
        }))
        .unwrap();
        let methods: Vec<_> = item.operations().map(|(m, _)| m).collect();
        assert_eq!(methods, [HttpMethod::Get, HttpMethod::Post]);
        assert_eq!(
            item.get.as_ref().unwrap().operation_id.as_deref(),
            Some("listPets")
        );
        assert_eq!(item.extensions["x-owner"], "pets");
    }

    #[test]
    fn test_link_targets() {
        let link: Link = serde_json::from_value(json!({
            "operationId": "getUserAddress",
            "parameters": {"userId": "$request.path.id"}
        }))
        .unwrap();
        assert_eq!(
            link.target,
            Some(LinkTarget::OperationId("getUserAddress".into()))
        );

        let err = serde_json::from_value::<Link>(json!({
            "operationId": "a",
            "operationRef": "#/paths/~1users/get"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("mutually exclusive"), "{err}");
    }

    #[test]
    fn test_normalize_template() {
        assert_eq!(normalize_template("/pets/{petId}"), "/pets/{}");
        assert_eq!(
            normalize_template("/users/{id}/posts/{postId}.json"),
            "/users/{}/posts/{}.json"
        );
        assert_eq!(normalize_template("/plain"), "/plain");
    }

    #[test]
    fn test_template_params() {
        assert_eq!(template_params("/a/{x}/b/{y}"), ["x", "y"]);
        assert!(template_params("/a/b").is_empty());
        assert_eq!(template_params("/a/{unclosed"), Vec::<&str>::new());
    }

    #[test]
    fn test_http_method_names() {
        for m in HttpMethod::ALL {
            assert_eq!(HttpMethod::from_name(m.as_str()), Some(m));
        }
        assert_eq!(HttpMethod::from_name("connect"), None);
    }
}

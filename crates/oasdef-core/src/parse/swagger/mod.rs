//! The legacy Swagger 2.0 document family.

pub mod schema;

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{
    Contact, ExtensibleMap, Extensions, ExternalDocumentation, Tag, extensions, present,
};
use super::operation::HttpMethod;
use super::parameter::True;
use super::reference::ReferenceOr;
use super::security::{ApiKeyLocation, Scopes, SecurityRequirement};

pub use schema::{
    AdditionalProperties, CollectionFormat, Constraints, Items, ItemsType, Schema, SchemaItems,
    SchemaRef, SchemaType, TypeSet,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "termsOfService", skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,

    pub version: String,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

/// Transfer protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    Https,
    Ws,
    Wss,
}

/// Where a Swagger 2.0 parameter lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParameterLocation {
    Body,
    Query,
    Header,
    Path,
    FormData,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Body => "body",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Path => "path",
            ParameterLocation::FormData => "formData",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "body" => Some(ParameterLocation::Body),
            "query" => Some(ParameterLocation::Query),
            "header" => Some(ParameterLocation::Header),
            "path" => Some(ParameterLocation::Path),
            "formData" => Some(ParameterLocation::FormData),
            _ => None,
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `body` parameter: the payload described by a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyParameter {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    pub schema: SchemaRef,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

/// A `query`, `header` or `formData` parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralParameter {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(rename = "type")]
    pub parameter_type: ItemsType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Only `query` and `formData` accept this.
    #[serde(rename = "allowEmptyValue", skip_serializing_if = "Option::is_none")]
    pub allow_empty_value: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Items>,

    #[serde(rename = "collectionFormat", skip_serializing_if = "Option::is_none")]
    pub collection_format: Option<CollectionFormat>,

    #[serde(
        rename = "default",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_value: Option<Value>,

    #[serde(flatten)]
    pub constraints: Constraints,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

/// A `path` parameter; always required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathParameter {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub required: True,

    #[serde(rename = "type")]
    pub parameter_type: ItemsType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Items>,

    #[serde(rename = "collectionFormat", skip_serializing_if = "Option::is_none")]
    pub collection_format: Option<CollectionFormat>,

    #[serde(
        rename = "default",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_value: Option<Value>,

    #[serde(flatten)]
    pub constraints: Constraints,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

/// A Swagger 2.0 parameter, discriminated by `in`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "in")]
pub enum Parameter {
    #[serde(rename = "body")]
    Body(BodyParameter),
    #[serde(rename = "query")]
    Query(GeneralParameter),
    #[serde(rename = "header")]
    Header(GeneralParameter),
    #[serde(rename = "path")]
    Path(PathParameter),
    #[serde(rename = "formData")]
    FormData(GeneralParameter),
}

impl Parameter {
    pub fn name(&self) -> &str {
        match self {
            Parameter::Body(p) => &p.name,
            Parameter::Path(p) => &p.name,
            Parameter::Query(p) | Parameter::Header(p) | Parameter::FormData(p) => &p.name,
        }
    }

    pub fn location(&self) -> ParameterLocation {
        match self {
            Parameter::Body(_) => ParameterLocation::Body,
            Parameter::Query(_) => ParameterLocation::Query,
            Parameter::Header(_) => ParameterLocation::Header,
            Parameter::Path(_) => ParameterLocation::Path,
            Parameter::FormData(_) => ParameterLocation::FormData,
        }
    }

    pub fn identity(&self) -> (&str, ParameterLocation) {
        (self.name(), self.location())
    }

    pub fn is_required(&self) -> bool {
        match self {
            Parameter::Body(p) => p.required,
            Parameter::Path(_) => true,
            Parameter::Query(p) | Parameter::Header(p) | Parameter::FormData(p) => p.required,
        }
    }
}

/// A response header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "type")]
    pub header_type: ItemsType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Items>,

    #[serde(rename = "collectionFormat", skip_serializing_if = "Option::is_none")]
    pub collection_format: Option<CollectionFormat>,

    #[serde(
        rename = "default",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_value: Option<Value>,

    #[serde(flatten)]
    pub constraints: Constraints,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaRef>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, Header>,

    /// Example payloads keyed by MIME type.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub examples: IndexMap<String, Value>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

pub type Responses = ExtensibleMap<ReferenceOr<Response>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
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
    pub consumes: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ReferenceOr<Parameter>>,

    pub responses: Responses,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemes: Vec<Scheme>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

/// A path item. Swagger 2.0 has no `trace` operation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ReferenceOr<Parameter>>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

impl PathItem {
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Options => self.options.as_ref(),
            HttpMethod::Head => self.head.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Trace => None,
        }
    }

    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> + '_ {
        HttpMethod::ALL
            .into_iter()
            .filter_map(move |m| self.operation(m).map(|op| (m, op)))
    }
}

pub type Paths = ExtensibleMap<PathItem>;

/// OAuth2 flow kinds in Swagger 2.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OAuth2Flow {
    Implicit,
    Password,
    Application,
    AccessCode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicScheme {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKeyScheme {
    pub name: String,

    /// `query` or `header`; `cookie` did not exist in Swagger 2.0.
    #[serde(rename = "in")]
    pub location: ApiKeyLocation,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuth2Scheme {
    pub flow: OAuth2Flow,

    /// Required for `implicit` and `accessCode`.
    #[serde(rename = "authorizationUrl", skip_serializing_if = "Option::is_none")]
    pub authorization_url: Option<String>,

    /// Required for `password`, `application` and `accessCode`.
    #[serde(rename = "tokenUrl", skip_serializing_if = "Option::is_none")]
    pub token_url: Option<String>,

    #[serde(default)]
    pub scopes: Scopes,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SecurityScheme {
    #[serde(rename = "basic")]
    Basic(BasicScheme),
    #[serde(rename = "apiKey")]
    ApiKey(ApiKeyScheme),
    #[serde(rename = "oauth2")]
    OAuth2(OAuth2Scheme),
}

/// Top-level Swagger 2.0 document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swagger {
    pub swagger: String,

    pub info: Info,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(rename = "basePath", skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemes: Vec<Scheme>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,

    pub paths: Paths,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub definitions: IndexMap<String, Schema>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, Parameter>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, Response>,

    #[serde(
        rename = "securityDefinitions",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub security_definitions: IndexMap<String, SecurityScheme>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,

    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocumentation>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

impl Swagger {
    pub fn operations(&self) -> impl Iterator<Item = (&str, HttpMethod, &Operation)> + '_ {
        self.paths.iter().flat_map(|(path, item)| {
            item.operations()
                .map(move |(method, op)| (path.as_str(), method, op))
        })
    }

    /// Number of definitions per reusable section.
    pub fn counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("definitions", self.definitions.len()),
            ("parameters", self.parameters.len()),
            ("responses", self.responses.len()),
            ("securityDefinitions", self.security_definitions.len()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_body_and_form_parameters() {
        let params: Vec<Parameter> = serde_json::from_value(json!([
            {"in": "body", "name": "pet", "required": true, "schema": {"$ref": "#/definitions/Pet"}},
            {"in": "formData", "name": "file", "type": "file"},
            {"in": "query", "name": "tags", "type": "array", "items": {"type": "string"}, "collectionFormat": "multi"}
        ]))
        .unwrap();
        assert_eq!(params[0].identity(), ("pet", ParameterLocation::Body));
        assert!(params[0].is_required());
        let Parameter::FormData(file) = &params[1] else {
            panic!("expected formData");
        };
        assert_eq!(file.parameter_type, ItemsType::File);
        let Parameter::Query(tags) = &params[2] else {
            panic!("expected query");
        };
        assert_eq!(tags.collection_format, Some(CollectionFormat::Multi));
    }

    #[test]
    fn test_path_parameter_must_be_required() {
        let err = serde_json::from_value::<Parameter>(json!({
            "in": "path", "name": "petId", "type": "integer", "required": false
        }))
        .unwrap_err();
        assert!(err.to_string().contains("true"), "{err}");
    }

    #[test]
    fn test_security_definitions() {
        let schemes: IndexMap<String, SecurityScheme> = serde_json::from_value(json!({
            "petstore_auth": {
                "type": "oauth2",
                "flow": "implicit",
                "authorizationUrl": "http://petstore.swagger.io/oauth/dialog",
                "scopes": {"write:pets": "modify pets"}
            },
            "api_key": {"type": "apiKey", "name": "api_key", "in": "header"},
            "basic": {"type": "basic"}
        }))
        .unwrap();
        let SecurityScheme::OAuth2(oauth) = &schemes["petstore_auth"] else {
            panic!("expected oauth2");
        };
        assert_eq!(oauth.flow, OAuth2Flow::Implicit);
        assert!(matches!(schemes["basic"], SecurityScheme::Basic(_)));
    }

    #[test]
    fn test_no_trace_operation() {
        let item: PathItem = serde_json::from_value(json!({
            "get": {"responses": {"200": {"description": "ok"}}},
            "trace": {"responses": {"200": {"description": "ignored"}}}
        }))
        .unwrap();
        assert_eq!(item.operations().count(), 1);
    }
}

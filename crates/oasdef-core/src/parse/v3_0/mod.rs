//! The OpenAPI 3.0.x document family.

pub mod schema;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::common::{Contact, Extensions, ExternalDocumentation, Tag, extensions};
use super::example::Example;
use super::operation::{self, HttpMethod, Link};
use super::reference::ReferenceOr;
use super::security::{SecurityRequirement, SecurityScheme};
use super::server::Server;
use super::{media_type, parameter, request_body, response};

pub use schema::{AdditionalProperties, Schema, SchemaKind, SchemaRef, SchemaType};

pub type Parameter = parameter::Parameter<SchemaRef>;
pub type Header = parameter::Header<SchemaRef>;
pub type MediaType = media_type::MediaType<SchemaRef>;
pub type Encoding = media_type::Encoding<SchemaRef>;
pub type RequestBody = request_body::RequestBody<SchemaRef>;
pub type Response = response::Response<SchemaRef>;
pub type Responses = response::Responses<SchemaRef>;
pub type Operation = operation::Operation<SchemaRef>;
pub type PathItem = operation::PathItem<SchemaRef>;
pub type Paths = operation::Paths<SchemaRef>;
pub type Callback = operation::Callback<SchemaRef>;

/// License information. OpenAPI 3.0 only knows `url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

/// Info object describing the API.
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

/// Components object holding reusable definitions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Components {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, SchemaRef>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, ReferenceOr<Response>>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, ReferenceOr<Parameter>>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub examples: IndexMap<String, ReferenceOr<Example>>,

    #[serde(
        rename = "requestBodies",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub request_bodies: IndexMap<String, ReferenceOr<RequestBody>>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, ReferenceOr<Header>>,

    #[serde(
        rename = "securitySchemes",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub security_schemes: IndexMap<String, ReferenceOr<SecurityScheme>>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub links: IndexMap<String, ReferenceOr<Link>>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub callbacks: IndexMap<String, ReferenceOr<Callback>>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

impl Components {
    /// Number of definitions per section, in declaration order.
    pub fn counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("schemas", self.schemas.len()),
            ("responses", self.responses.len()),
            ("parameters", self.parameters.len()),
            ("examples", self.examples.len()),
            ("requestBodies", self.request_bodies.len()),
            ("headers", self.headers.len()),
            ("securitySchemes", self.security_schemes.len()),
            ("links", self.links.len()),
            ("callbacks", self.callbacks.len()),
        ]
    }
}

/// Top-level OpenAPI 3.0.x document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApi {
    pub openapi: String,

    pub info: Info,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,

    pub paths: Paths,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,

    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocumentation>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

impl OpenApi {
    /// Every operation under `paths` as `(path, method, operation)`.
    pub fn operations(&self) -> impl Iterator<Item = (&str, HttpMethod, &Operation)> + '_ {
        self.paths.iter().flat_map(|(path, item)| {
            item.operations()
                .map(move |(method, op)| (path.as_str(), method, op))
        })
    }

    pub fn schema(&self, name: &str) -> Option<&SchemaRef> {
        self.components.as_ref()?.schemas.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> serde_json::Value {
        json!({
            "openapi": "3.0.3",
            "info": {"title": "Pets", "version": "1.0.0"},
            "paths": {
                "/pets": {
                    "get": {
                        "operationId": "listPets",
                        "responses": {"200": {"description": "ok"}}
                    }
                }
            }
        })
    }

    #[test]
    fn test_minimal_document() {
        let doc: OpenApi = serde_json::from_value(minimal()).unwrap();
        let ops: Vec<_> = doc
            .operations()
            .map(|(path, method, op)| (path, method, op.operation_id.as_deref()))
            .collect();
        assert_eq!(ops, [("/pets", HttpMethod::Get, Some("listPets"))]);
    }

    #[test]
    fn test_paths_are_required() {
        let mut value = minimal();
        value.as_object_mut().unwrap().remove("paths");
        let err = serde_json::from_value::<OpenApi>(value).unwrap_err();
        assert!(err.to_string().contains("missing field `paths`"), "{err}");
    }

    #[test]
    fn test_later_version_fields_are_not_modelled() {
        let mut value = minimal();
        value["webhooks"] = json!({"newPet": {}});
        value["info"]["summary"] = json!("short");
        let doc: OpenApi = serde_json::from_value(value).unwrap();
        let back = serde_json::to_value(&doc).unwrap();
        assert!(back.get("webhooks").is_none());
        assert!(back["info"].get("summary").is_none());
    }

    #[test]
    fn test_component_counts() {
        let components: Components = serde_json::from_value(json!({
            "schemas": {"Pet": {"type": "object"}, "Pets": {"type": "array", "items": {"$ref": "#/components/schemas/Pet"}}},
            "securitySchemes": {"api_key": {"type": "apiKey", "name": "api_key", "in": "header"}}
        }))
        .unwrap();
        let counts = components.counts();
        assert_eq!(counts[0], ("schemas", 2));
        assert_eq!(counts[6], ("securitySchemes", 1));
    }
}

//! The OpenAPI 3.1.x document family.

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
use crate::error::ModelError;

pub use schema::{Schema, SchemaKind, SchemaObject, SchemaType, TypeSet};

/// Dialect assumed for schemas when `jsonSchemaDialect` is absent.
pub const DEFAULT_DIALECT: &str = "https://spec.openapis.org/oas/3.1/dialect/base";

pub type Parameter = parameter::Parameter<Schema>;
pub type Header = parameter::Header<Schema>;
pub type MediaType = media_type::MediaType<Schema>;
pub type Encoding = media_type::Encoding<Schema>;
pub type RequestBody = request_body::RequestBody<Schema>;
pub type Response = response::Response<Schema>;
pub type Responses = response::Responses<Schema>;
pub type Operation = operation::Operation<Schema>;
pub type PathItem = operation::PathItem<Schema>;
pub type Paths = operation::Paths<Schema>;
pub type Callback = operation::Callback<Schema>;

/// How a license is pointed at: a URL or an SPDX expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LicenseLocator {
    Url(String),
    Identifier(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLicense", into = "RawLicense")]
pub struct License {
    pub name: String,
    pub locator: Option<LicenseLocator>,
    pub extensions: Extensions,
}

#[derive(Serialize, Deserialize)]
struct RawLicense {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(flatten, with = "extensions")]
    extensions: Extensions,
}

impl TryFrom<RawLicense> for License {
    type Error = ModelError;

    fn try_from(raw: RawLicense) -> Result<Self, Self::Error> {
        let locator = match (raw.url, raw.identifier) {
            (Some(_), Some(_)) => return Err(ModelError::MutuallyExclusive("url", "identifier")),
            (Some(url), None) => Some(LicenseLocator::Url(url)),
            (None, Some(id)) => Some(LicenseLocator::Identifier(id)),
            (None, None) => None,
        };
        Ok(License {
            name: raw.name,
            locator,
            extensions: raw.extensions,
        })
    }
}

impl From<License> for RawLicense {
    fn from(license: License) -> Self {
        let (url, identifier) = match license.locator {
            Some(LicenseLocator::Url(url)) => (Some(url), None),
            Some(LicenseLocator::Identifier(id)) => (None, Some(id)),
            None => (None, None),
        };
        RawLicense {
            name: license.name,
            identifier,
            url,
            extensions: license.extensions,
        }
    }
}

/// Info object describing the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

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
    pub schemas: IndexMap<String, Schema>,

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

    #[serde(rename = "pathItems", default, skip_serializing_if = "IndexMap::is_empty")]
    pub path_items: IndexMap<String, PathItem>,

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
            ("pathItems", self.path_items.len()),
        ]
    }
}

/// Top-level OpenAPI 3.1.x document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApi {
    pub openapi: String,

    pub info: Info,

    #[serde(rename = "jsonSchemaDialect", skip_serializing_if = "Option::is_none")]
    pub json_schema_dialect: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<Paths>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub webhooks: IndexMap<String, PathItem>,

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
    /// Webhooks are not included.
    pub fn operations(&self) -> impl Iterator<Item = (&str, HttpMethod, &Operation)> + '_ {
        self.paths.iter().flat_map(|paths| paths.iter()).flat_map(|(path, item)| {
            item.operations()
                .map(move |(method, op)| (path.as_str(), method, op))
        })
    }

    /// Webhook operations as `(name, method, operation)`. Operations living
    /// behind a path item `$ref` are not followed.
    pub fn webhook_operations(
        &self,
    ) -> impl Iterator<Item = (&str, HttpMethod, &Operation)> + '_ {
        self.webhooks.iter().flat_map(|(name, item)| {
            item.operations()
                .map(move |(method, op)| (name.as_str(), method, op))
        })
    }

    pub fn schema_dialect(&self) -> &str {
        self.json_schema_dialect
            .as_deref()
            .unwrap_or(DEFAULT_DIALECT)
    }

    pub fn schema(&self, name: &str) -> Option<&Schema> {
        self.components.as_ref()?.schemas.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_webhooks_only_document() {
        let doc: OpenApi = serde_json::from_value(json!({
            "openapi": "3.1.0",
            "info": {"title": "Webhook Example", "version": "1.0.0"},
            "webhooks": {
                "newPet": {
                    "post": {
                        "requestBody": {
                            "content": {
                                "application/json": {"schema": {"$ref": "#/components/schemas/Pet"}}
                            }
                        },
                        "responses": {"200": {"description": "ok"}}
                    }
                }
            }
        }))
        .unwrap();
        assert!(doc.paths.is_none());
        assert_eq!(doc.operations().count(), 0);
        let hooks: Vec<_> = doc.webhook_operations().map(|(n, m, _)| (n, m)).collect();
        assert_eq!(hooks, [("newPet", HttpMethod::Post)]);
        assert_eq!(doc.schema_dialect(), DEFAULT_DIALECT);
    }

    #[test]
    fn test_license_locator() {
        let license: License =
            serde_json::from_value(json!({"name": "Apache 2.0", "identifier": "Apache-2.0"}))
                .unwrap();
        assert_eq!(
            license.locator,
            Some(LicenseLocator::Identifier("Apache-2.0".into()))
        );

        let err = serde_json::from_value::<License>(json!({
            "name": "MIT",
            "identifier": "MIT",
            "url": "https://opensource.org/licenses/MIT"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("`url` and `identifier`"), "{err}");
    }

    #[test]
    fn test_component_path_items() {
        let components: Components = serde_json::from_value(json!({
            "pathItems": {"Ping": {"get": {"responses": {"204": {"description": "pong"}}}}},
            "schemas": {"Anything": true}
        }))
        .unwrap();
        assert_eq!(components.path_items.len(), 1);
        assert_eq!(components.schemas["Anything"], Schema::Bool(true));
    }

    #[test]
    fn test_webhook_ref_keeps_sibling_operations() {
        let doc: OpenApi = serde_json::from_value(json!({
            "openapi": "3.1.0",
            "info": {"title": "Hooks", "version": "1"},
            "webhooks": {
                "hook": {
                    "$ref": "#/components/pathItems/Shared",
                    "summary": "local override",
                    "post": {"responses": {"202": {"description": "accepted"}}}
                }
            },
            "components": {
                "pathItems": {
                    "Shared": {
                        "$ref": "https://example.com/hooks.yaml#/Base",
                        "get": {"responses": {"204": {"description": "pong"}}}
                    }
                }
            }
        }))
        .unwrap();

        let hook = &doc.webhooks["hook"];
        assert_eq!(hook.reference.as_deref(), Some("#/components/pathItems/Shared"));
        assert_eq!(hook.summary.as_deref(), Some("local override"));
        let hooks: Vec<_> = doc.webhook_operations().map(|(n, m, _)| (n, m)).collect();
        assert_eq!(hooks, [("hook", HttpMethod::Post)]);

        let shared = &doc.components.as_ref().unwrap().path_items["Shared"];
        assert!(shared.reference.is_some());
        assert!(shared.get.is_some());
    }
}

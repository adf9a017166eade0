pub mod common;
pub mod example;
pub mod media_type;
pub mod operation;
pub mod parameter;
pub mod reference;
pub mod request_body;
pub mod response;
pub mod security;
pub mod server;
pub mod swagger;
pub mod v3_0;
pub mod v3_1;

use std::path::Path;

use indexmap::IndexMap;
use log::debug;
use serde::Serialize;
use serde_json::Value;

use crate::error::ParseError;
use crate::version::{self, SpecVersion};
use operation::HttpMethod;
use reference::ReferenceOr;

/// Text encoding of a document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Yaml,
}

impl SourceFormat {
    /// `.json` files are JSON; everything else is read as YAML, which is a
    /// superset of JSON anyway.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SourceFormat::Json,
            _ => SourceFormat::Yaml,
        }
    }
}

/// A decoded document of any supported version.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Document {
    Swagger2(Box<swagger::Swagger>),
    V30(Box<v3_0::OpenApi>),
    V31(Box<v3_1::OpenApi>),
}

/// One operation as listed by [`Document::operations`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationSummary {
    pub method: HttpMethod,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    pub deprecated: bool,
}

/// Parse a document from YAML.
pub fn from_yaml(input: &str) -> Result<Document, ParseError> {
    let value: Value = serde_yaml_ng::from_str(input)?;
    from_value(value)
}

/// Parse a document from JSON.
pub fn from_json(input: &str) -> Result<Document, ParseError> {
    let value: Value = serde_json::from_str(input)?;
    from_value(value)
}

pub fn from_str(input: &str, format: SourceFormat) -> Result<Document, ParseError> {
    match format {
        SourceFormat::Json => from_json(input),
        SourceFormat::Yaml => from_yaml(input),
    }
}

/// Read and parse a document, picking the format from the file extension.
pub fn from_path(path: &Path) -> Result<Document, ParseError> {
    let input = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.display().to_string(),
        source,
    })?;
    from_str(&input, SourceFormat::from_path(path))
}

/// Decode an already-parsed tree. The version field picks the model family.
pub fn from_value(value: Value) -> Result<Document, ParseError> {
    let version = version::detect(&value)?;
    debug!("decoding document as {} model", version);
    let document = match version {
        SpecVersion::Swagger2 => Document::Swagger2(Box::new(serde_json::from_value(value)?)),
        SpecVersion::V30 { .. } => Document::V30(Box::new(serde_json::from_value(value)?)),
        SpecVersion::V31 { .. } => Document::V31(Box::new(serde_json::from_value(value)?)),
    };
    Ok(document)
}

impl Document {
    /// The declared version. A hand-built document with a malformed version
    /// string reports the first release of its family.
    pub fn version(&self) -> SpecVersion {
        match self {
            Document::Swagger2(_) => SpecVersion::Swagger2,
            Document::V30(doc) => doc
                .openapi
                .parse()
                .unwrap_or(SpecVersion::V30 { patch: 0 }),
            Document::V31(doc) => doc
                .openapi
                .parse()
                .unwrap_or(SpecVersion::V31 { patch: 0 }),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Document::Swagger2(doc) => &doc.info.title,
            Document::V30(doc) => &doc.info.title,
            Document::V31(doc) => &doc.info.title,
        }
    }

    /// The API's own version (`info.version`).
    pub fn api_version(&self) -> &str {
        match self {
            Document::Swagger2(doc) => &doc.info.version,
            Document::V30(doc) => &doc.info.version,
            Document::V31(doc) => &doc.info.version,
        }
    }

    /// Operations under `paths`, in document order.
    pub fn operations(&self) -> Vec<OperationSummary> {
        fn summary(
            path: &str,
            method: HttpMethod,
            id: Option<&String>,
            deprecated: Option<bool>,
        ) -> OperationSummary {
            OperationSummary {
                method,
                path: path.to_string(),
                operation_id: id.cloned(),
                deprecated: deprecated.unwrap_or(false),
            }
        }

        match self {
            Document::Swagger2(doc) => doc
                .operations()
                .map(|(p, m, op)| summary(p, m, op.operation_id.as_ref(), op.deprecated))
                .collect(),
            Document::V30(doc) => doc
                .operations()
                .map(|(p, m, op)| summary(p, m, op.operation_id.as_ref(), op.deprecated))
                .collect(),
            Document::V31(doc) => doc
                .operations()
                .map(|(p, m, op)| summary(p, m, op.operation_id.as_ref(), op.deprecated))
                .collect(),
        }
    }

    /// Number of webhooks (3.1 only).
    pub fn webhook_count(&self) -> usize {
        match self {
            Document::V31(doc) => doc.webhooks.len(),
            _ => 0,
        }
    }

    /// Definitions per reusable section (`components` or the Swagger 2.0
    /// top-level pools). Empty sections are omitted.
    pub fn component_counts(&self) -> Vec<(&'static str, usize)> {
        let counts = match self {
            Document::Swagger2(doc) => doc.counts(),
            Document::V30(doc) => doc
                .components
                .as_ref()
                .map(|c| c.counts())
                .unwrap_or_default(),
            Document::V31(doc) => doc
                .components
                .as_ref()
                .map(|c| c.counts())
                .unwrap_or_default(),
        };
        counts.into_iter().filter(|(_, n)| *n > 0).collect()
    }

    /// How many named schemas fall into each kind: a type name,
    /// `composition`, `reference`, `boolean`, `multiple` or `untyped`.
    pub fn schema_kinds(&self) -> IndexMap<&'static str, usize> {
        let mut kinds = IndexMap::new();
        let mut bump = |kind: &'static str| *kinds.entry(kind).or_insert(0) += 1;
        match self {
            Document::Swagger2(doc) => {
                for schema in doc.definitions.values() {
                    bump(swagger_kind(schema));
                }
            }
            Document::V30(doc) => {
                let schemas = doc.components.iter().flat_map(|c| c.schemas.values());
                for slot in schemas {
                    bump(match slot {
                        ReferenceOr::Reference(_) => "reference",
                        ReferenceOr::Item(schema) => match schema.kind() {
                            v3_0::SchemaKind::Composition => "composition",
                            v3_0::SchemaKind::Typed(t) => t.as_str(),
                            v3_0::SchemaKind::Untyped => "untyped",
                        },
                    });
                }
            }
            Document::V31(doc) => {
                let schemas = doc.components.iter().flat_map(|c| c.schemas.values());
                for schema in schemas {
                    bump(match schema.kind() {
                        v3_1::SchemaKind::Boolean(_) => "boolean",
                        v3_1::SchemaKind::Reference(_) => "reference",
                        v3_1::SchemaKind::Composition => "composition",
                        v3_1::SchemaKind::Typed(v3_1::TypeSet::Single(t)) => t.as_str(),
                        v3_1::SchemaKind::Typed(v3_1::TypeSet::Multiple(_)) => "multiple",
                        v3_1::SchemaKind::Untyped => "untyped",
                    });
                }
            }
        }
        kinds
    }

    pub fn to_value(&self) -> Result<Value, ParseError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ParseError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> Result<String, ParseError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}

fn swagger_kind(schema: &swagger::Schema) -> &'static str {
    if !schema.all_of.is_empty() {
        return "composition";
    }
    match &schema.schema_type {
        Some(swagger::TypeSet::Single(t)) => t.as_str(),
        Some(swagger::TypeSet::Multiple(_)) => "multiple",
        None => "untyped",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_source_format_from_path() {
        assert_eq!(
            SourceFormat::from_path(&PathBuf::from("api/openapi.JSON")),
            SourceFormat::Json
        );
        assert_eq!(
            SourceFormat::from_path(&PathBuf::from("openapi.yml")),
            SourceFormat::Yaml
        );
        assert_eq!(SourceFormat::from_path(&PathBuf::from("openapi")), SourceFormat::Yaml);
    }

    #[test]
    fn test_family_follows_version_field() {
        let v30 = from_yaml("openapi: 3.0.1\ninfo: {title: A, version: '1'}\npaths: {}\n").unwrap();
        assert!(matches!(v30, Document::V30(_)));
        assert_eq!(v30.version(), SpecVersion::V30 { patch: 1 });

        let v31 = from_yaml("openapi: 3.1.0\ninfo: {title: B, version: '2'}\n").unwrap();
        assert!(matches!(v31, Document::V31(_)));
        assert_eq!(v31.api_version(), "2");

        let v2 = from_yaml("swagger: '2.0'\ninfo: {title: C, version: '3'}\npaths: {}\n").unwrap();
        assert_eq!(v2.version(), SpecVersion::Swagger2);
        assert_eq!(v2.title(), "C");
    }

    #[test]
    fn test_unquoted_version_number_is_invalid() {
        let err = from_yaml("openapi: 3.0\ninfo: {title: A, version: '1'}\npaths: {}\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidVersion(_)), "{err}");
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = from_path(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }), "{err}");
    }
}

use std::fmt;

use indexmap::IndexMap;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::common::{Extensions, extensions};
use super::example::Examples;
use super::media_type::MediaType;
use crate::error::ModelError;

/// Parameter location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    Cookie,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Path => "path",
            ParameterLocation::Cookie => "cookie",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "query" => Some(ParameterLocation::Query),
            "header" => Some(ParameterLocation::Header),
            "path" => Some(ParameterLocation::Path),
            "cookie" => Some(ParameterLocation::Cookie),
            _ => None,
        }
    }

    /// Serialization styles permitted for this location; the first entry is
    /// the default.
    pub fn allowed_styles(&self) -> &'static [&'static str] {
        match self {
            ParameterLocation::Path => &["simple", "matrix", "label"],
            ParameterLocation::Query => &["form", "spaceDelimited", "pipeDelimited", "deepObject"],
            ParameterLocation::Header => &["simple"],
            ParameterLocation::Cookie => &["form"],
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PathStyle {
    Matrix,
    Label,
    #[default]
    Simple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryStyle {
    #[default]
    Form,
    SpaceDelimited,
    PipeDelimited,
    DeepObject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HeaderStyle {
    #[default]
    Simple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CookieStyle {
    #[default]
    Form,
}

/// A boolean that can only be `true`. Used for `required` on path
/// parameters, where `false` or an absent value is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct True;

impl Serialize for True {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bool(true)
    }
}

impl<'de> Deserialize<'de> for True {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if bool::deserialize(deserializer)? {
            Ok(True)
        } else {
            Err(de::Error::custom(ModelError::ExpectedTrue))
        }
    }
}

/// How a parameter's value is described: by a schema plus serialization
/// rules, or by a single-entry media type map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParameterFormat<S, St> {
    Simple(SimpleFormat<S, St>),
    Complex(ComplexFormat<S>),
}

/// The `schema` side of a parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimpleFormat<S, St> {
    pub schema: S,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<St>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub explode: Option<bool>,

    #[serde(rename = "allowReserved", skip_serializing_if = "Option::is_none")]
    pub allow_reserved: Option<bool>,

    #[serde(flatten)]
    pub examples: Examples,
}

/// The `content` side of a parameter. Holds exactly one media type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplexFormat<S> {
    pub content: IndexMap<String, MediaType<S>>,
}

impl<S, St> ParameterFormat<S, St> {
    pub fn simple(schema: S) -> Self {
        ParameterFormat::Simple(SimpleFormat {
            schema,
            style: None,
            explode: None,
            allow_reserved: None,
            examples: Examples::None,
        })
    }

    pub fn schema(&self) -> Option<&S> {
        match self {
            ParameterFormat::Simple(simple) => Some(&simple.schema),
            ParameterFormat::Complex(_) => None,
        }
    }

    pub fn content(&self) -> Option<&IndexMap<String, MediaType<S>>> {
        match self {
            ParameterFormat::Simple(_) => None,
            ParameterFormat::Complex(complex) => Some(&complex.content),
        }
    }
}

#[derive(Deserialize)]
struct RawFormat<S, St> {
    schema: Option<S>,
    style: Option<St>,
    explode: Option<bool>,
    #[serde(rename = "allowReserved")]
    allow_reserved: Option<bool>,
    content: Option<IndexMap<String, MediaType<S>>>,
    #[serde(flatten)]
    examples: Examples,
}

impl<S, St> TryFrom<RawFormat<S, St>> for ParameterFormat<S, St> {
    type Error = ModelError;

    fn try_from(raw: RawFormat<S, St>) -> Result<Self, Self::Error> {
        match (raw.schema, raw.content) {
            (Some(_), Some(_)) => Err(ModelError::MutuallyExclusive("schema", "content")),
            (None, None) => Err(ModelError::MissingOneOf("schema", "content")),
            (Some(schema), None) => Ok(ParameterFormat::Simple(SimpleFormat {
                schema,
                style: raw.style,
                explode: raw.explode,
                allow_reserved: raw.allow_reserved,
                examples: raw.examples,
            })),
            (None, Some(content)) => {
                if content.len() != 1 {
                    return Err(ModelError::ContentEntryCount(content.len()));
                }
                if raw.style.is_some() || raw.explode.is_some() || raw.allow_reserved.is_some() {
                    return Err(ModelError::MutuallyExclusive("content", "style"));
                }
                if !raw.examples.is_none() {
                    return Err(ModelError::MutuallyExclusive("content", "example"));
                }
                Ok(ParameterFormat::Complex(ComplexFormat { content }))
            }
        }
    }
}

impl<'de, S, St> Deserialize<'de> for ParameterFormat<S, St>
where
    S: Deserialize<'de>,
    St: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawFormat::<S, St>::deserialize(deserializer)?;
        ParameterFormat::try_from(raw).map_err(de::Error::custom)
    }
}

/// `in: path`. Always required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "S: Deserialize<'de>"))]
pub struct PathParameter<S> {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub required: True,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(flatten)]
    pub format: ParameterFormat<S, PathStyle>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

/// `in: query`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "S: Deserialize<'de>"))]
pub struct QueryParameter<S> {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(rename = "allowEmptyValue", skip_serializing_if = "Option::is_none")]
    pub allow_empty_value: Option<bool>,

    #[serde(flatten)]
    pub format: ParameterFormat<S, QueryStyle>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

/// `in: header`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "S: Deserialize<'de>"))]
pub struct HeaderParameter<S> {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(flatten)]
    pub format: ParameterFormat<S, HeaderStyle>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

/// `in: cookie`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "S: Deserialize<'de>"))]
pub struct CookieParameter<S> {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(flatten)]
    pub format: ParameterFormat<S, CookieStyle>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

/// An operation parameter, discriminated by its `in` location.
///
/// `S` is the schema slot of the dialect: `ReferenceOr<v3_0::Schema>` for
/// 3.0 documents and `v3_1::Schema` for 3.1 documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "S: Deserialize<'de>"))]
#[serde(tag = "in", rename_all = "lowercase")]
pub enum Parameter<S> {
    Path(PathParameter<S>),
    Query(QueryParameter<S>),
    Header(HeaderParameter<S>),
    Cookie(CookieParameter<S>),
}

impl<S> Parameter<S> {
    pub fn name(&self) -> &str {
        match self {
            Parameter::Path(p) => &p.name,
            Parameter::Query(p) => &p.name,
            Parameter::Header(p) => &p.name,
            Parameter::Cookie(p) => &p.name,
        }
    }

    pub fn location(&self) -> ParameterLocation {
        match self {
            Parameter::Path(_) => ParameterLocation::Path,
            Parameter::Query(_) => ParameterLocation::Query,
            Parameter::Header(_) => ParameterLocation::Header,
            Parameter::Cookie(_) => ParameterLocation::Cookie,
        }
    }

    /// The `(name, in)` pair that identifies a parameter within a list.
    pub fn identity(&self) -> (&str, ParameterLocation) {
        (self.name(), self.location())
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Parameter::Path(p) => p.description.as_deref(),
            Parameter::Query(p) => p.description.as_deref(),
            Parameter::Header(p) => p.description.as_deref(),
            Parameter::Cookie(p) => p.description.as_deref(),
        }
    }

    pub fn is_required(&self) -> bool {
        match self {
            Parameter::Path(_) => true,
            Parameter::Query(p) => p.required,
            Parameter::Header(p) => p.required,
            Parameter::Cookie(p) => p.required,
        }
    }

    pub fn is_deprecated(&self) -> bool {
        let deprecated = match self {
            Parameter::Path(p) => p.deprecated,
            Parameter::Query(p) => p.deprecated,
            Parameter::Header(p) => p.deprecated,
            Parameter::Cookie(p) => p.deprecated,
        };
        deprecated.unwrap_or(false)
    }

    pub fn schema(&self) -> Option<&S> {
        match self {
            Parameter::Path(p) => p.format.schema(),
            Parameter::Query(p) => p.format.schema(),
            Parameter::Header(p) => p.format.schema(),
            Parameter::Cookie(p) => p.format.schema(),
        }
    }

    pub fn content(&self) -> Option<&IndexMap<String, MediaType<S>>> {
        match self {
            Parameter::Path(p) => p.format.content(),
            Parameter::Query(p) => p.format.content(),
            Parameter::Header(p) => p.format.content(),
            Parameter::Cookie(p) => p.format.content(),
        }
    }
}

/// A Header object: a header parameter without `name` and `in`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "S: Deserialize<'de>"))]
pub struct Header<S> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(flatten)]
    pub format: ParameterFormat<S, HeaderStyle>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    // Schemas stay opaque here; the dialect modules bind the real type.
    type Param = Parameter<Value>;

    #[test]
    fn test_query_parameter_with_schema() {
        let p: Param = serde_json::from_value(json!({
            "name": "limit",
            "in": "query",
            "style": "form",
            "schema": {"type": "integer"},
            "x-order": 1
        }))
        .unwrap();
        assert_eq!(p.identity(), ("limit", ParameterLocation::Query));
        assert!(!p.is_required());
        assert_eq!(p.schema(), Some(&json!({"type": "integer"})));
        match &p {
            Parameter::Query(q) => {
                assert_eq!(q.extensions["x-order"], 1);
                match &q.format {
                    ParameterFormat::Simple(s) => assert_eq!(s.style, Some(QueryStyle::Form)),
                    ParameterFormat::Complex(_) => panic!("expected simple format"),
                }
            }
            _ => panic!("expected query parameter"),
        }
    }

    #[test]
    fn test_header_parameter_with_content() {
        let p: Param = serde_json::from_value(json!({
            "name": "X-Filter",
            "in": "header",
            "content": {"application/json": {"schema": {"type": "object"}}}
        }))
        .unwrap();
        assert!(p.schema().is_none());
        assert_eq!(p.content().unwrap().len(), 1);
    }

    #[test]
    fn test_path_parameter_must_be_required() {
        let missing = serde_json::from_value::<Param>(json!({
            "name": "id", "in": "path", "schema": {"type": "string"}
        }));
        assert!(missing.is_err());

        let explicit_false = serde_json::from_value::<Param>(json!({
            "name": "id", "in": "path", "required": false, "schema": {"type": "string"}
        }));
        assert!(explicit_false.is_err());

        let ok: Param = serde_json::from_value(json!({
            "name": "id", "in": "path", "required": true, "schema": {"type": "string"}
        }))
        .unwrap();
        assert!(ok.is_required());
        assert_eq!(serde_json::to_value(&ok).unwrap()["required"], true);
    }

    #[test]
    fn test_schema_and_content_are_exclusive() {
        let err = serde_json::from_value::<Param>(json!({
            "name": "q",
            "in": "query",
            "schema": {"type": "string"},
            "content": {"text/plain": {}}
        }))
        .unwrap_err();
        assert!(err.to_string().contains("mutually exclusive"), "{err}");

        let err = serde_json::from_value::<Param>(json!({"name": "q", "in": "query"}))
            .unwrap_err();
        assert!(err.to_string().contains("one of `schema` or `content`"), "{err}");
    }

    #[test]
    fn test_content_needs_exactly_one_entry() {
        let err = serde_json::from_value::<Param>(json!({
            "name": "q",
            "in": "query",
            "content": {"text/plain": {}, "application/json": {}}
        }))
        .unwrap_err();
        assert!(err.to_string().contains("exactly one entry"), "{err}");
    }

    #[test]
    fn test_style_is_checked_per_location() {
        let result = serde_json::from_value::<Param>(json!({
            "name": "session", "in": "cookie", "style": "deepObject", "schema": {}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_serializes_flat_with_location_tag() {
        let p: Param = serde_json::from_value(json!({
            "name": "id",
            "in": "path",
            "required": true,
            "schema": {"type": "string"},
            "example": "abc"
        }))
        .unwrap();
        assert_eq!(
            serde_json::to_value(&p).unwrap(),
            json!({
                "in": "path",
                "name": "id",
                "required": true,
                "schema": {"type": "string"},
                "example": "abc"
            })
        );
    }
}

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Number, Value};

use crate::parse::common::{Discriminator, ExternalDocumentation, Xml, present};

/// A JSON Schema 2020-12 `type` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Null,
    Boolean,
    Object,
    Array,
    Number,
    String,
    Integer,
}

impl SchemaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::Null => "null",
            SchemaType::Boolean => "boolean",
            SchemaType::Object => "object",
            SchemaType::Array => "array",
            SchemaType::Number => "number",
            SchemaType::String => "string",
            SchemaType::Integer => "integer",
        }
    }
}

/// The `type` keyword: a single type or an array of types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(SchemaType),
    Multiple(Vec<SchemaType>),
}

impl TypeSet {
    pub fn contains(&self, t: SchemaType) -> bool {
        match self {
            TypeSet::Single(s) => *s == t,
            TypeSet::Multiple(many) => many.contains(&t),
        }
    }

    pub fn types(&self) -> &[SchemaType] {
        match self {
            TypeSet::Single(s) => std::slice::from_ref(s),
            TypeSet::Multiple(many) => many,
        }
    }
}

/// An OpenAPI 3.1 schema: a boolean schema or a schema object.
///
/// `$ref` is an ordinary keyword here and coexists with its siblings, so
/// schema slots are never wrapped in [`ReferenceOr`](crate::parse::reference::ReferenceOr).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Schema {
    Bool(bool),
    Object(Box<SchemaObject>),
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Bool(b) => Ok(Schema::Bool(b)),
            other => SchemaObject::deserialize(other)
                .map(|object| Schema::Object(Box::new(object)))
                .map_err(de::Error::custom),
        }
    }
}

impl Default for Schema {
    fn default() -> Self {
        Schema::Bool(true)
    }
}

impl From<SchemaObject> for Schema {
    fn from(object: SchemaObject) -> Self {
        Schema::Object(Box::new(object))
    }
}

/// Classification of a 3.1 schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind<'a> {
    Boolean(bool),
    /// A schema object whose only job is `$ref`/`$dynamicRef`.
    Reference(&'a str),
    Composition,
    Typed(&'a TypeSet),
    Untyped,
}

impl Schema {
    pub fn as_object(&self) -> Option<&SchemaObject> {
        match self {
            Schema::Bool(_) => None,
            Schema::Object(object) => Some(object),
        }
    }

    pub fn kind(&self) -> SchemaKind<'_> {
        let object = match self {
            Schema::Bool(b) => return SchemaKind::Boolean(*b),
            Schema::Object(object) => object,
        };
        if object.is_composition() {
            return SchemaKind::Composition;
        }
        if let Some(t) = &object.schema_type {
            return SchemaKind::Typed(t);
        }
        match object.reference.as_deref().or(object.dynamic_reference.as_deref()) {
            Some(target) => SchemaKind::Reference(target),
            None => SchemaKind::Untyped,
        }
    }
}

/// A JSON Schema 2020-12 schema object with the OpenAPI vocabulary.
///
/// Keywords this model does not name (including `x-` extensions) are kept
/// in `unknown` so documents round-trip intact.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaObject {
    // Core
    #[serde(rename = "$id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub dialect: Option<String>,
    #[serde(rename = "$anchor", skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    #[serde(rename = "$dynamicAnchor", skip_serializing_if = "Option::is_none")]
    pub dynamic_anchor: Option<String>,
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(rename = "$dynamicRef", skip_serializing_if = "Option::is_none")]
    pub dynamic_reference: Option<String>,
    #[serde(rename = "$defs", default, skip_serializing_if = "IndexMap::is_empty")]
    pub defs: IndexMap<String, Schema>,
    #[serde(rename = "$comment", skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(rename = "$vocabulary", default, skip_serializing_if = "IndexMap::is_empty")]
    pub vocabulary: IndexMap<String, bool>,

    // Applicators
    #[serde(rename = "allOf", default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<Schema>,
    #[serde(rename = "anyOf", default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<Schema>,
    #[serde(rename = "oneOf", default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<Schema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not: Option<Schema>,
    #[serde(rename = "if", skip_serializing_if = "Option::is_none")]
    pub if_schema: Option<Schema>,
    #[serde(rename = "then", skip_serializing_if = "Option::is_none")]
    pub then_schema: Option<Schema>,
    #[serde(rename = "else", skip_serializing_if = "Option::is_none")]
    pub else_schema: Option<Schema>,
    #[serde(rename = "dependentSchemas", default, skip_serializing_if = "IndexMap::is_empty")]
    pub dependent_schemas: IndexMap<String, Schema>,
    #[serde(rename = "prefixItems", default, skip_serializing_if = "Vec::is_empty")]
    pub prefix_items: Vec<Schema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Schema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contains: Option<Schema>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Schema>,
    #[serde(rename = "patternProperties", default, skip_serializing_if = "IndexMap::is_empty")]
    pub pattern_properties: IndexMap<String, Schema>,
    #[serde(rename = "additionalProperties", skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Schema>,
    #[serde(rename = "propertyNames", skip_serializing_if = "Option::is_none")]
    pub property_names: Option<Schema>,
    #[serde(rename = "unevaluatedItems", skip_serializing_if = "Option::is_none")]
    pub unevaluated_items: Option<Schema>,
    #[serde(rename = "unevaluatedProperties", skip_serializing_if = "Option::is_none")]
    pub unevaluated_properties: Option<Schema>,

    // Validation
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<TypeSet>,
    #[serde(
        rename = "const",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub const_value: Option<Value>,
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,
    #[serde(rename = "multipleOf", skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,
    #[serde(rename = "exclusiveMaximum", skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,
    #[serde(rename = "exclusiveMinimum", skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<Number>,
    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(rename = "minLength", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(rename = "maxItems", skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    #[serde(rename = "minItems", skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(rename = "uniqueItems", skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,
    #[serde(rename = "maxContains", skip_serializing_if = "Option::is_none")]
    pub max_contains: Option<u64>,
    #[serde(rename = "minContains", skip_serializing_if = "Option::is_none")]
    pub min_contains: Option<u64>,
    #[serde(rename = "maxProperties", skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<u64>,
    #[serde(rename = "minProperties", skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(rename = "dependentRequired", default, skip_serializing_if = "IndexMap::is_empty")]
    pub dependent_required: IndexMap<String, Vec<String>>,

    // Format and content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(rename = "contentEncoding", skip_serializing_if = "Option::is_none")]
    pub content_encoding: Option<String>,
    #[serde(rename = "contentMediaType", skip_serializing_if = "Option::is_none")]
    pub content_media_type: Option<String>,
    #[serde(rename = "contentSchema", skip_serializing_if = "Option::is_none")]
    pub content_schema: Option<Schema>,

    // Meta-data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        rename = "default",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
    #[serde(rename = "readOnly", skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(rename = "writeOnly", skip_serializing_if = "Option::is_none")]
    pub write_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<Value>,

    // OpenAPI vocabulary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xml: Option<Xml>,
    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocumentation>,
    /// Deprecated in favour of `examples`.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,

    #[serde(flatten)]
    pub unknown: IndexMap<String, Value>,
}

impl SchemaObject {
    pub fn reference(target: impl Into<String>) -> Self {
        Self {
            reference: Some(target.into()),
            ..Self::default()
        }
    }

    pub fn of_type(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(TypeSet::Single(schema_type)),
            ..Self::default()
        }
    }

    pub fn is_composition(&self) -> bool {
        !self.all_of.is_empty()
            || !self.one_of.is_empty()
            || !self.any_of.is_empty()
            || self.not.is_some()
    }

    /// Whether `null` is an accepted type.
    pub fn is_nullable(&self) -> bool {
        self.schema_type
            .as_ref()
            .is_some_and(|t| t.contains(SchemaType::Null))
    }

    /// `x-` keys among the unrecognized keywords.
    pub fn extensions(&self) -> impl Iterator<Item = (&String, &Value)> + '_ {
        self.unknown
            .iter()
            .filter(|(k, _)| crate::parse::common::is_extension(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_boolean_schemas() {
        let schema: Schema = serde_json::from_value(json!(false)).unwrap();
        assert_eq!(schema.kind(), SchemaKind::Boolean(false));
        assert_eq!(serde_json::to_value(&schema).unwrap(), json!(false));
        assert!(serde_json::from_value::<Schema>(json!("string")).is_err());
    }

    #[test]
    fn test_ref_with_siblings() {
        let schema: Schema = serde_json::from_value(json!({
            "$ref": "#/components/schemas/Pet",
            "description": "The adopted pet",
            "deprecated": true
        }))
        .unwrap();
        let object = schema.as_object().unwrap();
        assert_eq!(object.reference.as_deref(), Some("#/components/schemas/Pet"));
        assert_eq!(object.description.as_deref(), Some("The adopted pet"));
        assert_eq!(schema.kind(), SchemaKind::Reference("#/components/schemas/Pet"));
    }

    #[test]
    fn test_type_arrays_and_null() {
        let schema: SchemaObject = serde_json::from_value(json!({
            "type": ["string", "null"],
            "exclusiveMinimum": 0
        }))
        .unwrap();
        assert!(schema.is_nullable());
        assert_eq!(
            schema.schema_type.as_ref().unwrap().types(),
            [SchemaType::String, SchemaType::Null]
        );
        assert_eq!(schema.exclusive_minimum, Some(Number::from(0)));

        assert!(serde_json::from_value::<SchemaObject>(json!({"exclusiveMinimum": true})).is_err());
    }

    #[test]
    fn test_unknown_keywords_round_trip() {
        let input = json!({
            "type": "object",
            "$dynamicAnchor": "node",
            "prefixItems": [{"type": "integer"}, true],
            "x-go-type": "Node",
            "nullable": true
        });
        let schema: Schema = serde_json::from_value(input.clone()).unwrap();
        let object = schema.as_object().unwrap();
        assert_eq!(object.prefix_items.len(), 2);
        assert_eq!(object.extensions().count(), 1);
        assert!(object.unknown.contains_key("nullable"));
        assert_eq!(serde_json::to_value(&schema).unwrap(), input);
    }

    #[test]
    fn test_composition_kind() {
        let schema: Schema = serde_json::from_value(json!({
            "anyOf": [{"type": "string"}, {"type": "integer"}]
        }))
        .unwrap();
        assert_eq!(schema.kind(), SchemaKind::Composition);
    }
}

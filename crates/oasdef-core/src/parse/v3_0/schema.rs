use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Number, Value};

use crate::parse::common::{Discriminator, Extensions, ExternalDocumentation, Xml, extensions, present};
use crate::parse::reference::ReferenceOr;

/// A JSON Schema `type` value as restricted by OpenAPI 3.0. There is no
/// `null`; nullability is expressed with [`Schema::nullable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
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
            SchemaType::Boolean => "boolean",
            SchemaType::Object => "object",
            SchemaType::Array => "array",
            SchemaType::Number => "number",
            SchemaType::String => "string",
            SchemaType::Integer => "integer",
        }
    }
}

/// A schema slot in OpenAPI 3.0: a pure `$ref` node or an inline schema.
pub type SchemaRef = ReferenceOr<Schema>;

/// `additionalProperties`: a boolean or a schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<SchemaRef>),
}

impl<'de> Deserialize<'de> for AdditionalProperties {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Bool(b) => Ok(AdditionalProperties::Bool(b)),
            other => SchemaRef::deserialize(other)
                .map(|s| AdditionalProperties::Schema(Box::new(s)))
                .map_err(de::Error::custom),
        }
    }
}

/// The Composition | Normal split of a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    /// Carries `allOf`, `oneOf`, `anyOf` or `not`.
    Composition,
    Typed(SchemaType),
    Untyped,
}

/// An OpenAPI 3.0 Schema object (extended subset of JSON Schema Wright
/// draft 00).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(rename = "multipleOf", skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,
    #[serde(rename = "exclusiveMaximum", skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,
    #[serde(rename = "exclusiveMinimum", skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<bool>,

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

    #[serde(rename = "maxProperties", skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<u64>,
    #[serde(rename = "minProperties", skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,

    // Composition
    #[serde(rename = "allOf", default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<SchemaRef>,
    #[serde(rename = "oneOf", default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<SchemaRef>,
    #[serde(rename = "anyOf", default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<SchemaRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<SchemaRef>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaRef>>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, SchemaRef>,

    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<AdditionalProperties>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(
        rename = "default",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_value: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,

    #[serde(rename = "readOnly", skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(rename = "writeOnly", skip_serializing_if = "Option::is_none")]
    pub write_only: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub xml: Option<Xml>,

    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocumentation>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

impl Schema {
    pub fn of_type(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Self::default()
        }
    }

    pub fn is_composition(&self) -> bool {
        !self.all_of.is_empty()
            || !self.one_of.is_empty()
            || !self.any_of.is_empty()
            || self.not.is_some()
    }

    pub fn kind(&self) -> SchemaKind {
        if self.is_composition() {
            return SchemaKind::Composition;
        }
        match self.schema_type {
            Some(t) => SchemaKind::Typed(t),
            None => SchemaKind::Untyped,
        }
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable.unwrap_or(false)
    }

    /// Direct sub-schemas in keyword order.
    pub fn subschemas(&self) -> impl Iterator<Item = &SchemaRef> + '_ {
        let additional = match &self.additional_properties {
            Some(AdditionalProperties::Schema(s)) => Some(s.as_ref()),
            _ => None,
        };
        self.all_of
            .iter()
            .chain(&self.one_of)
            .chain(&self.any_of)
            .chain(self.not.as_deref())
            .chain(self.items.as_deref())
            .chain(self.properties.values())
            .chain(additional)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_classification() {
        let composed: Schema = serde_json::from_value(json!({
            "type": "object",
            "oneOf": [{"$ref": "#/components/schemas/Cat"}, {"$ref": "#/components/schemas/Dog"}],
            "discriminator": {"propertyName": "petType"}
        }))
        .unwrap();
        assert_eq!(composed.kind(), SchemaKind::Composition);
        assert_eq!(composed.subschemas().count(), 2);

        let typed = Schema::of_type(SchemaType::Integer);
        assert_eq!(typed.kind(), SchemaKind::Typed(SchemaType::Integer));
        assert_eq!(Schema::default().kind(), SchemaKind::Untyped);
    }

    #[test]
    fn test_null_type_is_rejected() {
        assert!(serde_json::from_value::<Schema>(json!({"type": "null"})).is_err());
        assert!(serde_json::from_value::<Schema>(json!({"type": ["string", "null"]})).is_err());
    }

    #[test]
    fn test_boolean_exclusive_bounds() {
        let schema: Schema = serde_json::from_value(json!({
            "type": "integer", "minimum": 1, "exclusiveMinimum": true, "nullable": true
        }))
        .unwrap();
        assert_eq!(schema.exclusive_minimum, Some(true));
        assert!(schema.is_nullable());
        assert_eq!(serde_json::to_value(&schema).unwrap()["minimum"], json!(1));

        assert!(serde_json::from_value::<Schema>(json!({"exclusiveMinimum": 5})).is_err());
    }

    #[test]
    fn test_additional_properties_variants() {
        let open: Schema = serde_json::from_value(json!({"additionalProperties": true})).unwrap();
        assert_eq!(open.additional_properties, Some(AdditionalProperties::Bool(true)));

        let map: Schema = serde_json::from_value(json!({
            "type": "object",
            "additionalProperties": {"type": "integer", "format": "int32"}
        }))
        .unwrap();
        let Some(AdditionalProperties::Schema(inner)) = &map.additional_properties else {
            panic!("expected a schema");
        };
        assert_eq!(
            inner.as_item().and_then(|s| s.format.as_deref()),
            Some("int32")
        );
    }

    #[test]
    fn test_ref_node_is_pure_reference() {
        let slot: SchemaRef = serde_json::from_value(json!({
            "$ref": "#/components/schemas/Pet",
            "description": "ignored by the typed model"
        }))
        .unwrap();
        assert!(slot.is_reference());
    }
}

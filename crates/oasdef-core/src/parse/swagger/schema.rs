use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Number, Value};

use crate::parse::common::{Extensions, ExternalDocumentation, Xml, extensions, present};
use crate::parse::reference::ReferenceOr;

/// Primitive types a Swagger 2.0 schema may declare. `file` is only
/// meaningful on response schemas and `formData` parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Array,
    Boolean,
    Integer,
    Number,
    Null,
    Object,
    String,
    File,
}

impl SchemaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::Array => "array",
            SchemaType::Boolean => "boolean",
            SchemaType::Integer => "integer",
            SchemaType::Number => "number",
            SchemaType::Null => "null",
            SchemaType::Object => "object",
            SchemaType::String => "string",
            SchemaType::File => "file",
        }
    }
}

/// The draft-04 `type` keyword: a single type or an array of types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(SchemaType),
    Multiple(Vec<SchemaType>),
}

/// Types allowed on non-body parameters, headers and `items`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemsType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    /// Only valid for `formData` parameters.
    File,
}

/// How array values are joined on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionFormat {
    #[default]
    Csv,
    Ssv,
    Tsv,
    Pipes,
    /// Repeated keys; only valid for `query` and `formData`.
    Multi,
}

/// Validation keywords shared by parameters, headers and `items`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Constraints {
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
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,
    #[serde(rename = "multipleOf", skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<Number>,
}

/// A primitive array item description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Items {
    #[serde(rename = "type")]
    pub items_type: ItemsType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Items>>,

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

/// `items` on a schema: one schema or a tuple of schemas.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SchemaItems {
    Single(Box<SchemaRef>),
    Tuple(Vec<SchemaRef>),
}

impl<'de> Deserialize<'de> for SchemaItems {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Array(items) => items
                .into_iter()
                .map(SchemaRef::deserialize)
                .collect::<Result<Vec<_>, _>>()
                .map(SchemaItems::Tuple)
                .map_err(de::Error::custom),
            other => SchemaRef::deserialize(other)
                .map(|s| SchemaItems::Single(Box::new(s)))
                .map_err(de::Error::custom),
        }
    }
}

/// A Swagger 2.0 Schema object (draft-04 subset).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
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

    #[serde(flatten)]
    pub constraints: Constraints,

    #[serde(rename = "maxProperties", skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<u64>,
    #[serde(rename = "minProperties", skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<TypeSet>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<SchemaItems>,
    #[serde(rename = "allOf", default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<SchemaRef>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, SchemaRef>,
    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<AdditionalProperties>,

    /// Name of the property that carries the concrete type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,
    #[serde(rename = "readOnly", skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xml: Option<Xml>,
    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocumentation>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

impl Schema {
    pub fn is_file(&self) -> bool {
        matches!(self.schema_type, Some(TypeSet::Single(SchemaType::File)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_discriminator_is_a_property_name() {
        let schema: Schema = serde_json::from_value(json!({
            "type": "object",
            "discriminator": "petType",
            "required": ["name", "petType"],
            "properties": {
                "name": {"type": "string"},
                "petType": {"type": "string"}
            }
        }))
        .unwrap();
        assert_eq!(schema.discriminator.as_deref(), Some("petType"));
        assert_eq!(schema.properties.len(), 2);
    }

    #[test]
    fn test_tuple_items() {
        let schema: Schema = serde_json::from_value(json!({
            "type": "array",
            "items": [{"type": "string"}, {"$ref": "#/definitions/Pet"}]
        }))
        .unwrap();
        let Some(SchemaItems::Tuple(items)) = &schema.items else {
            panic!("expected tuple items");
        };
        assert!(items[1].is_reference());
    }

    #[test]
    fn test_constraints_are_flattened() {
        let items: Items = serde_json::from_value(json!({
            "type": "integer",
            "minimum": 1,
            "maximum": 10,
            "collectionFormat": "pipes"
        }))
        .unwrap();
        assert_eq!(items.constraints.minimum, Some(Number::from(1)));
        assert_eq!(items.collection_format, Some(CollectionFormat::Pipes));
        let back = serde_json::to_value(&items).unwrap();
        assert_eq!(back["maximum"], json!(10));
    }

    #[test]
    fn test_file_schema() {
        let schema: Schema = serde_json::from_value(json!({"type": "file"})).unwrap();
        assert!(schema.is_file());
    }
}

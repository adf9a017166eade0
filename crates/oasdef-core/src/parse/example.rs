use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{Extensions, extensions, present};
use super::reference::ReferenceOr;
use crate::error::ModelError;

/// The payload of an Example object: either embedded or pointed to by URL.
#[derive(Debug, Clone, PartialEq)]
pub enum ExampleValue {
    Inline(Value),
    External(String),
}

/// An Example object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawExample", into = "RawExample")]
pub struct Example {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub value: Option<ExampleValue>,
    pub extensions: Extensions,
}

#[derive(Serialize, Deserialize)]
struct RawExample {
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    #[serde(rename = "externalValue", skip_serializing_if = "Option::is_none")]
    external_value: Option<String>,
    #[serde(flatten, with = "extensions")]
    extensions: Extensions,
}

impl TryFrom<RawExample> for Example {
    type Error = ModelError;

    fn try_from(raw: RawExample) -> Result<Self, Self::Error> {
        let value = match (raw.value, raw.external_value) {
            (Some(_), Some(_)) => {
                return Err(ModelError::MutuallyExclusive("value", "externalValue"));
            }
            (Some(v), None) => Some(ExampleValue::Inline(v)),
            (None, Some(url)) => Some(ExampleValue::External(url)),
            (None, None) => None,
        };
        Ok(Example {
            summary: raw.summary,
            description: raw.description,
            value,
            extensions: raw.extensions,
        })
    }
}

impl From<Example> for RawExample {
    fn from(example: Example) -> Self {
        let (value, external_value) = match example.value {
            Some(ExampleValue::Inline(v)) => (Some(v), None),
            Some(ExampleValue::External(url)) => (None, Some(url)),
            None => (None, None),
        };
        RawExample {
            summary: example.summary,
            description: example.description,
            value,
            external_value,
            extensions: example.extensions,
        }
    }
}

/// The `example` / `examples` pair shared by Parameter, Header and
/// MediaType. Flattened into its owner.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawExamples", into = "RawExamples")]
pub enum Examples {
    #[default]
    None,
    Single(Value),
    Named(IndexMap<String, ReferenceOr<Example>>),
}

impl Examples {
    pub fn is_none(&self) -> bool {
        matches!(self, Examples::None)
    }
}

#[derive(Serialize, Deserialize)]
struct RawExamples {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    example: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    examples: Option<IndexMap<String, ReferenceOr<Example>>>,
}

impl TryFrom<RawExamples> for Examples {
    type Error = ModelError;

    fn try_from(raw: RawExamples) -> Result<Self, Self::Error> {
        match (raw.example, raw.examples) {
            (Some(_), Some(_)) => Err(ModelError::MutuallyExclusive("example", "examples")),
            (Some(v), None) => Ok(Examples::Single(v)),
            (None, Some(named)) => Ok(Examples::Named(named)),
            (None, None) => Ok(Examples::None),
        }
    }
}

impl From<Examples> for RawExamples {
    fn from(examples: Examples) -> Self {
        match examples {
            Examples::None => RawExamples {
                example: None,
                examples: None,
            },
            Examples::Single(v) => RawExamples {
                example: Some(v),
                examples: None,
            },
            Examples::Named(named) => RawExamples {
                example: None,
                examples: Some(named),
            },
        }
    }
}

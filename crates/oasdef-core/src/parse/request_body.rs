use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::common::{Extensions, extensions};
use super::media_type::MediaType;

/// A request body definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "S: Deserialize<'de>"))]
pub struct RequestBody<S> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub content: IndexMap<String, MediaType<S>>,

    #[serde(default)]
    pub required: bool,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::ParseError;

/// The document family selected by the root version field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecVersion {
    /// `swagger: "2.0"` (legacy swagger-schema-official shape).
    Swagger2,
    /// `openapi: 3.0.N`
    V30 { patch: u32 },
    /// `openapi: 3.1.N`
    V31 { patch: u32 },
}

impl SpecVersion {
    pub fn is_swagger(&self) -> bool {
        matches!(self, SpecVersion::Swagger2)
    }

    pub fn is_v30(&self) -> bool {
        matches!(self, SpecVersion::V30 { .. })
    }

    pub fn is_v31(&self) -> bool {
        matches!(self, SpecVersion::V31 { .. })
    }

    /// Name of the root field carrying the version string.
    pub fn field_name(&self) -> &'static str {
        match self {
            SpecVersion::Swagger2 => "swagger",
            _ => "openapi",
        }
    }
}

impl fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecVersion::Swagger2 => write!(f, "2.0"),
            SpecVersion::V30 { patch } => write!(f, "3.0.{patch}"),
            SpecVersion::V31 { patch } => write!(f, "3.1.{patch}"),
        }
    }
}

impl FromStr for SpecVersion {
    type Err = ParseError;

    /// Accepts `2.0`, `3.0.N` and `3.1.N`, each optionally followed by a
    /// `-suffix` (e.g. `3.1.0-rc1`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "2.0" {
            return Ok(SpecVersion::Swagger2);
        }

        let core = match s.split_once('-') {
            Some((core, suffix)) if !suffix.is_empty() => core,
            Some(_) => return Err(ParseError::InvalidVersion(s.to_string())),
            None => s,
        };

        let parts: Vec<&str> = core.split('.').collect();
        let [major, minor, patch] = parts.as_slice() else {
            return Err(ParseError::InvalidVersion(s.to_string()));
        };
        let numeric = |p: &str| -> Result<u32, ParseError> {
            if p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ParseError::InvalidVersion(s.to_string()));
            }
            p.parse()
                .map_err(|_| ParseError::InvalidVersion(s.to_string()))
        };
        let (major, minor, patch) = (numeric(*major)?, numeric(*minor)?, numeric(*patch)?);

        match (major, minor) {
            (3, 0) => Ok(SpecVersion::V30 { patch }),
            (3, 1) => Ok(SpecVersion::V31 { patch }),
            _ => Err(ParseError::UnsupportedVersion(s.to_string())),
        }
    }
}

/// Detect the document family from the root object of a decoded document.
pub fn detect(document: &Value) -> Result<SpecVersion, ParseError> {
    let root = document.as_object().ok_or(ParseError::NotAnObject)?;

    if let Some(openapi) = root.get("openapi") {
        let raw = openapi.as_str().ok_or_else(|| {
            ParseError::InvalidVersion(format!("`openapi` must be a string, found {openapi}"))
        })?;
        let version: SpecVersion = raw.parse()?;
        if version.is_swagger() {
            return Err(ParseError::UnsupportedVersion(raw.to_string()));
        }
        log::debug!("detected OpenAPI {version} document");
        return Ok(version);
    }

    if let Some(swagger) = root.get("swagger") {
        return match swagger.as_str() {
            Some("2.0") => {
                log::debug!("detected Swagger 2.0 document");
                Ok(SpecVersion::Swagger2)
            }
            Some(other) => Err(ParseError::UnsupportedVersion(other.to_string())),
            None => Err(ParseError::InvalidVersion(format!(
                "`swagger` must be the string \"2.0\", found {swagger}"
            ))),
        };
    }

    Err(ParseError::MissingVersion)
}

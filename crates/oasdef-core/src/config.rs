use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Top-level project configuration loaded from `.oasdef.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OasdefConfig {
    pub input: String,
    pub validate: ValidateOptions,
    pub output: OutputOptions,
}

impl Default for OasdefConfig {
    fn default() -> Self {
        Self {
            input: "openapi.yaml".to_string(),
            validate: ValidateOptions::default(),
            output: OutputOptions::default(),
        }
    }
}

/// Knobs for the structural validator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidateOptions {
    pub unknown_fields: FieldPolicy,
    pub version_gated: VersionGatePolicy,
    /// Treat warnings as failures when deciding the exit status.
    pub fail_on_warnings: bool,
    /// Check security requirement names and scopes against the declared schemes.
    pub check_security: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            unknown_fields: FieldPolicy::Error,
            version_gated: VersionGatePolicy::Reject,
            fail_on_warnings: false,
            check_security: true,
        }
    }
}

/// How fields outside an object's fixed field table are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldPolicy {
    #[default]
    Error,
    Warn,
    Allow,
}

/// What to do with 3.1-only keywords found in a 3.0 document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionGatePolicy {
    /// Report them as errors.
    #[default]
    Reject,
    /// Report a warning and skip them.
    Ignore,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    pub format: OutputFormat,
}

/// Serialization format for `convert`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".oasdef.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<OasdefConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let config: OasdefConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# oasdef configuration
input: openapi.yaml

validate:
  unknown_fields: error     # error | warn | allow
  version_gated: reject     # reject | ignore (3.1-only keywords in 3.0 documents)
  fail_on_warnings: false
  check_security: true      # security requirement names and scopes

output:
  format: yaml              # yaml | json
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OasdefConfig::default();
        assert_eq!(config.input, "openapi.yaml");
        assert_eq!(config.validate.unknown_fields, FieldPolicy::Error);
        assert_eq!(config.validate.version_gated, VersionGatePolicy::Reject);
        assert!(!config.validate.fail_on_warnings);
        assert!(config.validate.check_security);
        assert_eq!(config.output.format, OutputFormat::Yaml);
    }

    #[test]
    fn test_parse_config_yaml() {
        let yaml = r#"
input: api/spec.json
validate:
  unknown_fields: warn
  version_gated: ignore
  fail_on_warnings: true
  check_security: false
output:
  format: json
"#;
        let config: OasdefConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input, "api/spec.json");
        assert_eq!(config.validate.unknown_fields, FieldPolicy::Warn);
        assert_eq!(config.validate.version_gated, VersionGatePolicy::Ignore);
        assert!(config.validate.fail_on_warnings);
        assert!(!config.validate.check_security);
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: OasdefConfig = serde_yaml_ng::from_str("input: api.yaml\n").unwrap();
        assert_eq!(config.input, "api.yaml");
        // Defaults applied
        assert_eq!(config.validate, ValidateOptions::default());
    }

    #[test]
    fn test_default_content_parses_to_defaults() {
        let config: OasdefConfig = serde_yaml_ng::from_str(default_config_content()).unwrap();
        assert_eq!(config, OasdefConfig::default());
    }

    #[test]
    fn test_load_config_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        assert!(load_config(&path).unwrap().is_none());

        std::fs::write(&path, "validate:\n  unknown_fields: allow\n").unwrap();
        let config = load_config(&path).unwrap().unwrap();
        assert_eq!(config.validate.unknown_fields, FieldPolicy::Allow);

        std::fs::write(&path, "validate: [not, a, map]\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "{err}");
    }
}

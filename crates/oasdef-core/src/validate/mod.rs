//! Structural validation of undecoded documents.
//!
//! The walkers check every object against the fixed field table of the
//! detected version and collect issues instead of stopping at the first
//! one. A document that passes is then decoded into the typed model as a
//! final cross-check.

mod oas3;
pub mod report;
mod swagger;

use std::collections::{HashMap, HashSet};

use log::{debug, warn};
use serde_json::{Map, Value};

use crate::config::{FieldPolicy, ValidateOptions, VersionGatePolicy};
use crate::error::ParseError;
use crate::parse::operation::normalize_template;
use crate::parse::{self, SourceFormat, common};
use crate::pointer::Pointer;
use crate::version;
pub use report::{Issue, Severity, ValidationReport};
use report::*;

/// Validate a decoded JSON/YAML tree.
pub fn validate_value(document: &Value, options: &ValidateOptions) -> ValidationReport {
    let mut cx = Context::new(options);
    match version::detect(document) {
        Ok(version) if version.is_swagger() => swagger::walk(&mut cx, document),
        Ok(version) => oas3::walk(&mut cx, document, version),
        Err(e) => {
            let path = ["openapi", "swagger"]
                .into_iter()
                .find(|k| document.get(k).is_some())
                .map(|k| Pointer::root().join(k))
                .unwrap_or_default();
            cx.push(
                Issue::error(E_INVALID_VERSION, &path, e.to_string())
                    .with_suggestion("use `openapi: 3.0.x`, `openapi: 3.1.x` or `swagger: \"2.0\"`"),
            );
            return cx.finish();
        }
    }

    let mut report = cx.finish();
    if report.ok {
        if let Err(e) = parse::from_value(document.clone()) {
            report.push(Issue::error(E_MODEL_MISMATCH, &Pointer::root(), e.to_string()));
        }
    }
    debug!(
        "validation finished: {} error(s), {} warning(s)",
        report.count(Severity::Error),
        report.count(Severity::Warning)
    );
    report
}

/// Parse `input` and validate it. Only syntax errors are returned as `Err`;
/// everything structural ends up in the report.
pub fn validate_str(
    input: &str,
    format: SourceFormat,
    options: &ValidateOptions,
) -> Result<ValidationReport, ParseError> {
    let value: Value = match format {
        SourceFormat::Json => serde_json::from_str(input)?,
        SourceFormat::Yaml => serde_yaml_ng::from_str(input)?,
    };
    Ok(validate_value(&value, options))
}

/// Shared state and primitive checks for the walkers.
pub(crate) struct Context<'a> {
    options: &'a ValidateOptions,
    issues: Vec<Issue>,
    /// Keywords introduced after the document's version are gated.
    gate_later: bool,
    /// `x-oai-`/`x-oas-` are reserved (OpenAPI 3.x only).
    reserved_extensions: bool,
    /// First location of every operationId seen so far.
    operation_ids: HashMap<String, Pointer>,
}

impl<'a> Context<'a> {
    fn new(options: &'a ValidateOptions) -> Self {
        Self {
            options,
            issues: Vec::new(),
            gate_later: false,
            reserved_extensions: false,
            operation_ids: HashMap::new(),
        }
    }

    fn finish(self) -> ValidationReport {
        ValidationReport::from_issues(self.issues)
    }

    fn options(&self) -> &ValidateOptions {
        self.options
    }

    fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    fn error(&mut self, code: &'static str, path: &Pointer, message: impl Into<String>) {
        self.push(Issue::error(code, path, message));
    }

    fn warning(&mut self, code: &'static str, path: &Pointer, message: impl Into<String>) {
        self.push(Issue::warning(code, path, message));
    }

    /// Check the keys of `obj` against the fixed fields of `kind`.
    ///
    /// `later` lists fields that only exist in a later minor version; they
    /// are accepted as known unless gating is on.
    fn fields(
        &mut self,
        obj: &Map<String, Value>,
        path: &Pointer,
        kind: &str,
        known: &[&str],
        later: &[&str],
    ) {
        for key in obj.keys() {
            if common::is_extension(key) {
                self.extension(key, path);
            } else if known.contains(&key.as_str()) {
                continue;
            } else if later.contains(&key.as_str()) {
                if self.gate_later {
                    self.version_gated(&path.join(key), key, kind);
                }
            } else {
                self.unknown_field(&path.join(key), key, kind);
            }
        }
    }

    /// Only the extension keys of `obj` (for objects that accept any key).
    fn extensions(&mut self, obj: &Map<String, Value>, path: &Pointer) {
        for key in obj.keys().filter(|k| common::is_extension(k)) {
            self.extension(key, path);
        }
    }

    fn extension(&mut self, key: &str, path: &Pointer) {
        if self.reserved_extensions && common::is_reserved_extension(key) {
            self.error(
                E_RESERVED_EXTENSION,
                &path.join(key),
                format!("`{key}` uses a prefix reserved by the OpenAPI Initiative"),
            );
        }
    }

    fn unknown_field(&mut self, path: &Pointer, key: &str, kind: &str) {
        let message = format!("`{key}` is not a field of {kind}");
        match self.options.unknown_fields {
            FieldPolicy::Error => self.push(
                Issue::error(E_UNKNOWN_FIELD, path, message)
                    .with_suggestion(format!("prefix custom fields with `x-`, e.g. `x-{key}`")),
            ),
            FieldPolicy::Warn => self.warning(E_UNKNOWN_FIELD, path, message),
            FieldPolicy::Allow => {}
        }
    }

    /// A keyword from a later version. Gated keywords are never descended.
    fn version_gated(&mut self, path: &Pointer, key: &str, kind: &str) {
        let message = format!("`{key}` on {kind} requires OpenAPI 3.1");
        match self.options.version_gated {
            VersionGatePolicy::Reject => self.push(
                Issue::error(E_VERSION_GATED, path, message)
                    .with_suggestion("upgrade the document to `openapi: 3.1.0` or remove the field"),
            ),
            VersionGatePolicy::Ignore => {
                warn!("ignoring {key} at {path}");
                self.warning(E_VERSION_GATED, path, message);
            }
        }
    }

    fn list<'v>(&mut self, value: &'v Value, path: &Pointer) -> Option<&'v Vec<Value>> {
        let items = value.as_array();
        if items.is_none() {
            self.error(
                E_INVALID_TYPE,
                path,
                format!("expected an array, found {}", type_name(value)),
            );
        }
        items
    }

    fn object<'v>(
        &mut self,
        value: &'v Value,
        path: &Pointer,
        kind: &str,
    ) -> Option<&'v Map<String, Value>> {
        match value.as_object() {
            Some(obj) => Some(obj),
            None => {
                self.error(
                    E_INVALID_TYPE,
                    path,
                    format!("{kind} must be an object, found {}", type_name(value)),
                );
                None
            }
        }
    }

    fn require<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        path: &Pointer,
        kind: &str,
        key: &str,
    ) -> Option<&'v Value> {
        let value = obj.get(key);
        if value.is_none() {
            self.error(
                E_MISSING_FIELD,
                path,
                format!("{kind} is missing required field `{key}`"),
            );
        }
        value
    }

    /// A required string field.
    fn require_str<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        path: &Pointer,
        kind: &str,
        key: &str,
    ) -> Option<&'v str> {
        self.require(obj, path, kind, key)?;
        self.string(obj, path, key)
    }

    fn string<'v>(&mut self, obj: &'v Map<String, Value>, path: &Pointer, key: &str) -> Option<&'v str> {
        let value = obj.get(key)?;
        let s = value.as_str();
        if s.is_none() {
            self.expected(path, key, "a string", value);
        }
        s
    }

    fn boolean(&mut self, obj: &Map<String, Value>, path: &Pointer, key: &str) -> Option<bool> {
        let value = obj.get(key)?;
        let b = value.as_bool();
        if b.is_none() {
            self.expected(path, key, "a boolean", value);
        }
        b
    }

    fn array<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        path: &Pointer,
        key: &str,
    ) -> Option<&'v Vec<Value>> {
        let value = obj.get(key)?;
        let a = value.as_array();
        if a.is_none() {
            self.expected(path, key, "an array", value);
        }
        a
    }

    fn map<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        path: &Pointer,
        key: &str,
    ) -> Option<&'v Map<String, Value>> {
        let value = obj.get(key)?;
        let m = value.as_object();
        if m.is_none() {
            self.expected(path, key, "an object", value);
        }
        m
    }

    fn number(&mut self, obj: &Map<String, Value>, path: &Pointer, key: &str) {
        if let Some(value) = obj.get(key) {
            if !value.is_number() {
                self.expected(path, key, "a number", value);
            }
        }
    }

    fn non_negative(&mut self, obj: &Map<String, Value>, path: &Pointer, key: &str) {
        if let Some(value) = obj.get(key) {
            if !value.is_u64() {
                self.expected(path, key, "a non-negative integer", value);
            }
        }
    }

    /// An array whose items must all be strings.
    fn strings<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        path: &Pointer,
        key: &str,
    ) -> Vec<&'v str> {
        let Some(items) = self.array(obj, path, key) else {
            return Vec::new();
        };
        let field = path.join(key);
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match item.as_str() {
                Some(s) => out.push(s),
                None => self.error(
                    E_INVALID_TYPE,
                    &field.index(i),
                    format!("expected a string, found {}", type_name(item)),
                ),
            }
        }
        out
    }

    fn expected(&mut self, path: &Pointer, key: &str, what: &str, found: &Value) {
        self.error(
            E_INVALID_TYPE,
            &path.join(key),
            format!("`{key}` must be {what}, found {}", type_name(found)),
        );
    }

    /// Report `a` and `b` both being present. Returns true on conflict.
    fn exclusive(&mut self, obj: &Map<String, Value>, path: &Pointer, a: &str, b: &str) -> bool {
        let conflict = obj.contains_key(a) && obj.contains_key(b);
        if conflict {
            self.error(
                E_MUTUALLY_EXCLUSIVE,
                &path.join(b),
                format!("`{a}` and `{b}` are mutually exclusive"),
            );
        }
        conflict
    }

    /// Report neither `a` nor `b` being present.
    fn one_of(&mut self, obj: &Map<String, Value>, path: &Pointer, kind: &str, a: &str, b: &str) {
        if !obj.contains_key(a) && !obj.contains_key(b) {
            self.error(
                E_MISSING_ONE_OF,
                path,
                format!("{kind} requires one of `{a}` or `{b}`"),
            );
        }
    }

    fn not_applicable(&mut self, path: &Pointer, key: &str, reason: impl AsRef<str>) {
        self.error(
            E_NOT_APPLICABLE,
            &path.join(key),
            format!("`{key}` does not apply {}", reason.as_ref()),
        );
    }
}

// Objects shared by every version.
impl Context<'_> {
    /// operationIds are unique across the whole document.
    fn operation_id(&mut self, op: &Map<String, Value>, path: &Pointer) {
        let Some(id) = self.string(op, path, "operationId") else {
            return;
        };
        match self.operation_ids.get(id) {
            Some(first) => {
                let message = format!("operationId `{id}` is already used by {first}");
                self.error(E_DUPLICATE_OPERATION_ID, &path.join("operationId"), message);
            }
            None => {
                self.operation_ids.insert(id.to_string(), path.clone());
            }
        }
    }

    /// Key checks of a Paths object: templates start with `/` and no two are
    /// equal once parameter names are erased.
    fn path_templates(&mut self, paths: &Map<String, Value>, path: &Pointer) {
        self.extensions(paths, path);
        let mut seen: HashMap<String, &str> = HashMap::new();
        for (template, _) in entries(paths) {
            let item_path = path.join(template);
            if !template.starts_with('/') {
                self.push(
                    Issue::error(
                        E_INVALID_PATH_KEY,
                        &item_path,
                        format!("path `{template}` must start with `/`"),
                    )
                    .with_suggestion(format!("/{template}")),
                );
            }
            let normalized = normalize_template(template);
            if let Some(other) = seen.get(&normalized).copied() {
                self.error(
                    E_DUPLICATE_PATH,
                    &item_path,
                    format!("`{template}` is equivalent to `{other}`"),
                );
            } else {
                seen.insert(normalized, template);
            }
        }
    }

    fn contact(&mut self, value: &Value, path: &Pointer) {
        let kind = "Contact Object";
        let Some(contact) = self.object(value, path, kind) else {
            return;
        };
        self.fields(contact, path, kind, &["name", "url", "email"], &[]);
        for key in ["name", "url", "email"] {
            self.string(contact, path, key);
        }
    }

    fn external_docs(&mut self, value: &Value, path: &Pointer) {
        let kind = "External Documentation Object";
        let Some(docs) = self.object(value, path, kind) else {
            return;
        };
        self.fields(docs, path, kind, &["description", "url"], &[]);
        self.string(docs, path, "description");
        self.require_str(docs, path, kind, "url");
    }

    fn tags(&mut self, value: &Value, path: &Pointer) {
        let Some(tags) = self.list(value, path) else {
            return;
        };
        let kind = "Tag Object";
        let mut seen = HashSet::new();
        for (i, tag) in tags.iter().enumerate() {
            let path = path.index(i);
            let Some(tag) = self.object(tag, &path, kind) else {
                continue;
            };
            self.fields(tag, &path, kind, &["name", "description", "externalDocs"], &[]);
            self.string(tag, &path, "description");
            if let Some(docs) = tag.get("externalDocs") {
                self.external_docs(docs, &path.join("externalDocs"));
            }
            if let Some(name) = self.require_str(tag, &path, kind, "name") {
                if !seen.insert(name) {
                    self.error(
                        E_DUPLICATE_TAG,
                        &path.join("name"),
                        format!("tag `{name}` is declared twice"),
                    );
                }
            }
        }
    }

    fn xml(&mut self, value: &Value, path: &Pointer) {
        let kind = "XML Object";
        let Some(xml) = self.object(value, path, kind) else {
            return;
        };
        self.fields(
            xml,
            path,
            kind,
            &["name", "namespace", "prefix", "attribute", "wrapped"],
            &[],
        );
        for key in ["name", "namespace", "prefix"] {
            self.string(xml, path, key);
        }
        for key in ["attribute", "wrapped"] {
            self.boolean(xml, path, key);
        }
    }
}

/// JSON type name for messages.
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Whether `name` matches `^[a-zA-Z0-9.\-_]+$`.
fn is_component_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
}

/// Names of the map's non-extension keys.
fn entries(obj: &Map<String, Value>) -> impl Iterator<Item = (&String, &Value)> {
    obj.iter().filter(|(k, _)| !common::is_extension(k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options() -> ValidateOptions {
        ValidateOptions::default()
    }

    #[test]
    fn test_invalid_version_points_at_field() {
        let report = validate_value(&json!({"openapi": "4.0.0", "info": {}}), &options());
        assert!(!report.ok);
        assert_eq!(report.codes(), [E_INVALID_VERSION]);
        assert_eq!(report.issues[0].path.to_string(), "#/openapi");

        let report = validate_value(&json!({"info": {}}), &options());
        assert_eq!(report.issues[0].path.to_string(), "#");
    }

    #[test]
    fn test_validate_str_reports_syntax_errors() {
        let result = validate_str("openapi: [", SourceFormat::Yaml, &options());
        assert!(matches!(result, Err(ParseError::Yaml(_))));
    }

    #[test]
    fn test_component_name_charset() {
        assert!(is_component_name("Pet.v1-final_2"));
        assert!(!is_component_name("Pet Store"));
        assert!(!is_component_name("Pet/Store"));
        assert!(!is_component_name(""));
    }

    #[test]
    fn test_unknown_field_policy() {
        let doc = json!({
            "openapi": "3.0.3",
            "info": {"title": "t", "version": "1", "owner": "me"},
            "paths": {}
        });
        let strict = validate_value(&doc, &options());
        assert_eq!(strict.codes(), [E_UNKNOWN_FIELD]);
        assert!(!strict.ok);

        let lenient = ValidateOptions {
            unknown_fields: FieldPolicy::Warn,
            ..options()
        };
        let report = validate_value(&doc, &lenient);
        assert!(report.ok);
        assert_eq!(report.issues[0].severity, Severity::Warning);

        let silent = ValidateOptions {
            unknown_fields: FieldPolicy::Allow,
            ..options()
        };
        assert!(validate_value(&doc, &silent).issues.is_empty());
    }
}

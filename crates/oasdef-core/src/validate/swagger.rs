//! Walker for Swagger 2.0 documents.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::report::*;
use super::{Context, entries, type_name};
use crate::parse::operation::HttpMethod;
use crate::parse::response::is_valid_status_key;
use crate::parse::swagger::ParameterLocation;
use crate::pointer::Pointer;

const ROOT: &[&str] = &[
    "swagger",
    "info",
    "host",
    "basePath",
    "schemes",
    "consumes",
    "produces",
    "paths",
    "definitions",
    "parameters",
    "responses",
    "securityDefinitions",
    "security",
    "tags",
    "externalDocs",
];
const INFO: &[&str] = &[
    "title",
    "description",
    "termsOfService",
    "contact",
    "license",
    "version",
];
const PATH_ITEM: &[&str] = &[
    "$ref",
    "get",
    "put",
    "post",
    "delete",
    "options",
    "head",
    "patch",
    "parameters",
];
const OPERATION: &[&str] = &[
    "tags",
    "summary",
    "description",
    "externalDocs",
    "operationId",
    "consumes",
    "produces",
    "parameters",
    "responses",
    "schemes",
    "deprecated",
    "security",
];
const CONSTRAINTS: &[&str] = &[
    "maximum",
    "exclusiveMaximum",
    "minimum",
    "exclusiveMinimum",
    "maxLength",
    "minLength",
    "pattern",
    "maxItems",
    "minItems",
    "uniqueItems",
    "enum",
    "multipleOf",
];
/// Parameter fields that only make sense next to a primitive `type`.
const PRIMITIVE_FIELDS: &[&str] = &[
    "type",
    "format",
    "allowEmptyValue",
    "items",
    "collectionFormat",
    "default",
];
const PARAMETER: &[&str] = &["name", "in", "description", "required", "schema"];
const ITEMS: &[&str] = &["type", "format", "items", "collectionFormat", "default"];
const HEADER: &[&str] = &[
    "description",
    "type",
    "format",
    "items",
    "collectionFormat",
    "default",
];
const RESPONSE: &[&str] = &["description", "schema", "headers", "examples"];
const SCHEMA: &[&str] = &[
    "$ref",
    "format",
    "title",
    "description",
    "default",
    "maxProperties",
    "minProperties",
    "required",
    "type",
    "items",
    "allOf",
    "properties",
    "additionalProperties",
    "discriminator",
    "readOnly",
    "xml",
    "externalDocs",
    "example",
];
const SECURITY_SCHEME: &[&str] = &[
    "type",
    "description",
    "name",
    "in",
    "flow",
    "authorizationUrl",
    "tokenUrl",
    "scopes",
];
const SCHEME_SPECIFIC: [&str; 6] = [
    "name",
    "in",
    "flow",
    "authorizationUrl",
    "tokenUrl",
    "scopes",
];
/// OAuth2 flow and the URLs it requires.
const FLOW_URLS: [(&str, &[&str]); 4] = [
    ("implicit", &["authorizationUrl"]),
    ("password", &["tokenUrl"]),
    ("application", &["tokenUrl"]),
    ("accessCode", &["authorizationUrl", "tokenUrl"]),
];

const SCHEMES: [&str; 4] = ["http", "https", "ws", "wss"];
const PRIMITIVE_TYPES: [&str; 5] = ["string", "number", "integer", "boolean", "array"];
const SCHEMA_TYPES: [&str; 8] = [
    "array", "boolean", "integer", "null", "number", "object", "string", "file",
];
const COLLECTION_FORMATS: [&str; 5] = ["csv", "ssv", "tsv", "pipes", "multi"];

pub(super) fn walk(cx: &mut Context<'_>, document: &Value) {
    let Some(root) = document.as_object() else {
        return;
    };
    let mut walker = Walker {
        cx,
        definitions: declared_schemes(root),
    };
    walker.root(root);
}

/// `securityDefinitions` names and their `type`.
fn declared_schemes(root: &Map<String, Value>) -> IndexMap<String, Option<String>> {
    root.get("securityDefinitions")
        .and_then(Value::as_object)
        .map(|definitions| {
            definitions
                .iter()
                .map(|(name, scheme)| {
                    let scheme_type = scheme.get("type").and_then(Value::as_str);
                    (name.clone(), scheme_type.map(str::to_string))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Where a parameter came from, keyed by `(name, in)`.
type ParameterSet = IndexMap<(String, ParameterLocation), Pointer>;

struct Walker<'c, 'a> {
    cx: &'c mut Context<'a>,
    definitions: IndexMap<String, Option<String>>,
}

impl Walker<'_, '_> {
    fn root(&mut self, root: &Map<String, Value>) {
        let path = Pointer::root();
        let kind = "Swagger Object";
        self.cx.fields(root, &path, kind, ROOT, &[]);

        if let Some(info) = self.cx.require(root, &path, kind, "info") {
            self.info(info, &path.join("info"));
        }
        if let Some(host) = self.cx.string(root, &path, "host") {
            if host.contains("://") || host.contains('/') {
                self.cx.push(
                    Issue::error(
                        E_INVALID_VALUE,
                        &path.join("host"),
                        format!("host `{host}` must be a bare host name with an optional port"),
                    )
                    .with_suggestion("move the scheme to `schemes` and the path to `basePath`"),
                );
            }
        }
        if let Some(base_path) = self.cx.string(root, &path, "basePath") {
            if !base_path.starts_with('/') {
                self.cx.error(
                    E_INVALID_VALUE,
                    &path.join("basePath"),
                    format!("basePath `{base_path}` must start with `/`"),
                );
            }
        }
        self.schemes(root, &path);
        self.cx.strings(root, &path, "consumes");
        self.cx.strings(root, &path, "produces");

        if let Some(paths) = self.cx.require(root, &path, kind, "paths") {
            self.paths(paths, &path.join("paths"));
        }
        if let Some(definitions) = self.cx.map(root, &path, "definitions") {
            let base = path.join("definitions");
            for (name, schema) in definitions {
                self.schema(schema, &base.join(name));
            }
        }
        if let Some(parameters) = self.cx.map(root, &path, "parameters") {
            let base = path.join("parameters");
            for (name, parameter) in parameters {
                let path = base.join(name);
                if let Some(parameter) = self.cx.object(parameter, &path, "Parameter Object") {
                    self.parameter(parameter, &path);
                }
            }
        }
        if let Some(responses) = self.cx.map(root, &path, "responses") {
            let base = path.join("responses");
            for (name, response) in responses {
                let path = base.join(name);
                if let Some(response) = self.cx.object(response, &path, "Response Object") {
                    self.response(response, &path);
                }
            }
        }
        if let Some(definitions) = self.cx.map(root, &path, "securityDefinitions") {
            let base = path.join("securityDefinitions");
            for (name, scheme) in definitions {
                self.security_scheme(scheme, &base.join(name));
            }
        }
        if let Some(security) = root.get("security") {
            self.security(security, &path.join("security"));
        }
        if let Some(tags) = root.get("tags") {
            self.cx.tags(tags, &path.join("tags"));
        }
        if let Some(docs) = root.get("externalDocs") {
            self.cx.external_docs(docs, &path.join("externalDocs"));
        }
    }

    fn info(&mut self, value: &Value, path: &Pointer) {
        let kind = "Info Object";
        let Some(info) = self.cx.object(value, path, kind) else {
            return;
        };
        self.cx.fields(info, path, kind, INFO, &[]);
        self.cx.require_str(info, path, kind, "title");
        self.cx.require_str(info, path, kind, "version");
        self.cx.string(info, path, "description");
        self.cx.string(info, path, "termsOfService");
        if let Some(contact) = info.get("contact") {
            self.cx.contact(contact, &path.join("contact"));
        }
        if let Some(license) = info.get("license") {
            let path = path.join("license");
            let kind = "License Object";
            if let Some(license) = self.cx.object(license, &path, kind) {
                self.cx.fields(license, &path, kind, &["name", "url"], &[]);
                self.cx.require_str(license, &path, kind, "name");
                self.cx.string(license, &path, "url");
            }
        }
    }

    fn schemes(&mut self, obj: &Map<String, Value>, path: &Pointer) {
        let field = path.join("schemes");
        for (i, scheme) in self.cx.strings(obj, path, "schemes").into_iter().enumerate() {
            if !SCHEMES.contains(&scheme) {
                self.cx.error(
                    E_INVALID_VALUE,
                    &field.index(i),
                    format!("`{scheme}` is not a transfer protocol"),
                );
            }
        }
    }

    fn paths(&mut self, value: &Value, path: &Pointer) {
        let Some(paths) = self.cx.object(value, path, "Paths Object") else {
            return;
        };
        self.cx.path_templates(paths, path);
        for (template, item) in entries(paths) {
            self.path_item(item, &path.join(template));
        }
    }

    fn path_item(&mut self, value: &Value, path: &Pointer) {
        let kind = "Path Item Object";
        let Some(item) = self.cx.object(value, path, kind) else {
            return;
        };
        self.cx.fields(item, path, kind, PATH_ITEM, &[]);
        self.cx.string(item, path, "$ref");
        let shared = match item.get("parameters") {
            Some(parameters) => self.parameters(parameters, &path.join("parameters")),
            None => ParameterSet::new(),
        };
        for method in HttpMethod::ALL {
            if method == HttpMethod::Trace {
                continue;
            }
            if let Some(op) = item.get(method.as_str()) {
                self.operation(op, &path.join(method.as_str()), &shared);
            }
        }
    }

    fn operation(&mut self, value: &Value, path: &Pointer, shared: &ParameterSet) {
        let kind = "Operation Object";
        let Some(op) = self.cx.object(value, path, kind) else {
            return;
        };
        self.cx.fields(op, path, kind, OPERATION, &[]);
        self.cx.strings(op, path, "tags");
        self.cx.string(op, path, "summary");
        self.cx.string(op, path, "description");
        self.cx.strings(op, path, "consumes");
        self.cx.strings(op, path, "produces");
        self.cx.boolean(op, path, "deprecated");
        self.schemes(op, path);
        self.cx.operation_id(op, path);

        // Operation parameters override path-level ones with the same identity.
        let mut effective = shared.clone();
        if let Some(parameters) = op.get("parameters") {
            effective.extend(self.parameters(parameters, &path.join("parameters")));
        }
        self.payload(&effective);

        if let Some(responses) = self.cx.require(op, path, kind, "responses") {
            self.responses(responses, &path.join("responses"));
        }
        if let Some(security) = op.get("security") {
            self.security(security, &path.join("security"));
        }
        if let Some(docs) = op.get("externalDocs") {
            self.cx.external_docs(docs, &path.join("externalDocs"));
        }
    }

    /// At most one `body`, and never together with `formData`.
    fn payload(&mut self, effective: &ParameterSet) {
        let bodies: Vec<&Pointer> = effective
            .iter()
            .filter(|((_, location), _)| *location == ParameterLocation::Body)
            .map(|(_, at)| at)
            .collect();
        for at in bodies.iter().skip(1) {
            self.cx.error(
                E_DUPLICATE_PARAMETER,
                at,
                "an operation can have only one body parameter",
            );
        }
        let form = effective
            .iter()
            .find(|((_, location), _)| *location == ParameterLocation::FormData);
        if let (Some(_), Some((_, at))) = (bodies.first(), form) {
            self.cx.error(
                E_MUTUALLY_EXCLUSIVE,
                at,
                "body and formData parameters cannot be used together",
            );
        }
    }

    /// Walks a parameter list and returns the inline parameters by identity.
    fn parameters(&mut self, value: &Value, path: &Pointer) -> ParameterSet {
        let mut found = ParameterSet::new();
        let Some(parameters) = self.cx.list(value, path) else {
            return found;
        };
        for (i, parameter) in parameters.iter().enumerate() {
            let path = path.index(i);
            let Some(parameter) = self.inline(parameter, &path, "Parameter Object") else {
                continue;
            };
            let Some((name, location)) = self.parameter(parameter, &path) else {
                continue;
            };
            if found.contains_key(&(name.to_string(), location)) {
                self.cx.error(
                    E_DUPLICATE_PARAMETER,
                    &path,
                    format!("parameter `{name}` in {location} is declared twice"),
                );
            } else {
                found.insert((name.to_string(), location), path);
            }
        }
        found
    }

    fn inline<'v>(
        &mut self,
        value: &'v Value,
        path: &Pointer,
        kind: &str,
    ) -> Option<&'v Map<String, Value>> {
        let obj = self.cx.object(value, path, kind)?;
        if obj.contains_key("$ref") {
            self.reference(obj, path);
            return None;
        }
        Some(obj)
    }

    fn reference(&mut self, obj: &Map<String, Value>, path: &Pointer) {
        self.cx.string(obj, path, "$ref");
        for key in obj.keys().filter(|k| *k != "$ref") {
            self.cx.push(
                Issue::error(
                    E_REF_SIBLINGS,
                    &path.join(key),
                    format!("`{key}` is not allowed next to `$ref`"),
                )
                .with_suggestion("siblings of `$ref` are ignored; move them into the target"),
            );
        }
    }

    fn parameter<'v>(
        &mut self,
        param: &'v Map<String, Value>,
        path: &Pointer,
    ) -> Option<(&'v str, ParameterLocation)> {
        let kind = "Parameter Object";
        let known: Vec<&str> = PARAMETER
            .iter()
            .chain(PRIMITIVE_FIELDS)
            .chain(CONSTRAINTS)
            .copied()
            .collect();
        self.cx.fields(param, path, kind, &known, &[]);
        let name = self.cx.require_str(param, path, kind, "name");
        let location = match self.cx.require_str(param, path, kind, "in") {
            Some(location) => {
                let parsed = ParameterLocation::from_name(location);
                if parsed.is_none() {
                    self.cx.push(
                        Issue::error(
                            E_INVALID_VALUE,
                            &path.join("in"),
                            format!("`{location}` is not a parameter location"),
                        )
                        .with_suggestion("use one of body, query, header, path, formData"),
                    );
                }
                parsed
            }
            None => None,
        };
        self.cx.string(param, path, "description");
        self.cx.boolean(param, path, "required");

        match location {
            Some(ParameterLocation::Body) => {
                for key in PRIMITIVE_FIELDS.iter().chain(CONSTRAINTS) {
                    if param.contains_key(*key) {
                        self.cx.not_applicable(path, key, "to body parameters");
                    }
                }
                if let Some(schema) = self.cx.require(param, path, kind, "schema") {
                    self.schema(schema, &path.join("schema"));
                }
            }
            Some(location) => {
                if param.contains_key("schema") {
                    self.cx
                        .not_applicable(path, "schema", format!("to {location} parameters"));
                }
                let form_like = matches!(
                    location,
                    ParameterLocation::Query | ParameterLocation::FormData
                );
                if param.contains_key("allowEmptyValue") && !form_like {
                    self.cx
                        .not_applicable(path, "allowEmptyValue", format!("to {location} parameters"));
                }
                self.cx.boolean(param, path, "allowEmptyValue");
                if location == ParameterLocation::Path
                    && param.get("required") != Some(&Value::Bool(true))
                {
                    self.cx.push(
                        Issue::error(
                            E_PATH_PARAM_NOT_REQUIRED,
                            path,
                            format!("path parameter `{}` must be required", name.unwrap_or("?")),
                        )
                        .with_suggestion("set `required: true`"),
                    );
                }
                let allow_file = location == ParameterLocation::FormData;
                self.primitive(param, path, kind, allow_file, form_like);
            }
            None => {}
        }
        Some((name?, location?))
    }

    /// The `type`-based description shared by parameters, headers and items.
    fn primitive(
        &mut self,
        obj: &Map<String, Value>,
        path: &Pointer,
        kind: &str,
        allow_file: bool,
        allow_multi: bool,
    ) {
        if let Some(primitive) = self.cx.require_str(obj, path, kind, "type") {
            if primitive == "file" && !allow_file {
                self.cx.error(
                    E_INVALID_VALUE,
                    &path.join("type"),
                    "`file` is only allowed for formData parameters",
                );
            } else if primitive != "file" && !PRIMITIVE_TYPES.contains(&primitive) {
                self.cx.push(
                    Issue::error(
                        E_INVALID_VALUE,
                        &path.join("type"),
                        format!("`{primitive}` is not a valid type for {kind}"),
                    )
                    .with_suggestion(format!("use one of: {}", PRIMITIVE_TYPES.join(", "))),
                );
            }
            if primitive == "array" {
                if let Some(items) = self.cx.require(obj, path, kind, "items") {
                    self.items(items, &path.join("items"));
                }
            }
        }
        self.cx.string(obj, path, "format");
        if let Some(format) = self.cx.string(obj, path, "collectionFormat") {
            if !COLLECTION_FORMATS.contains(&format) {
                self.cx.error(
                    E_INVALID_VALUE,
                    &path.join("collectionFormat"),
                    format!("`{format}` is not a collection format"),
                );
            } else if format == "multi" && !allow_multi {
                self.cx.error(
                    E_INVALID_VALUE,
                    &path.join("collectionFormat"),
                    "`multi` is only valid for query and formData parameters",
                );
            }
        }
        self.constraints(obj, path);
    }

    fn constraints(&mut self, obj: &Map<String, Value>, path: &Pointer) {
        for key in ["maximum", "minimum", "multipleOf"] {
            self.cx.number(obj, path, key);
        }
        for key in ["exclusiveMaximum", "exclusiveMinimum", "uniqueItems"] {
            self.cx.boolean(obj, path, key);
        }
        for key in ["maxLength", "minLength", "maxItems", "minItems"] {
            self.cx.non_negative(obj, path, key);
        }
        self.cx.string(obj, path, "pattern");
        self.cx.array(obj, path, "enum");
    }

    fn items(&mut self, value: &Value, path: &Pointer) {
        let kind = "Items Object";
        let Some(items) = self.cx.object(value, path, kind) else {
            return;
        };
        let known: Vec<&str> = ITEMS.iter().chain(CONSTRAINTS).copied().collect();
        self.cx.fields(items, path, kind, &known, &[]);
        self.primitive(items, path, kind, false, false);
    }

    fn header(&mut self, value: &Value, path: &Pointer) {
        let kind = "Header Object";
        let Some(header) = self.cx.object(value, path, kind) else {
            return;
        };
        let known: Vec<&str> = HEADER.iter().chain(CONSTRAINTS).copied().collect();
        self.cx.fields(header, path, kind, &known, &[]);
        self.cx.string(header, path, "description");
        self.primitive(header, path, kind, false, false);
    }

    fn responses(&mut self, value: &Value, path: &Pointer) {
        let Some(responses) = self.cx.object(value, path, "Responses Object") else {
            return;
        };
        self.cx.extensions(responses, path);
        let mut count = 0;
        for (code, response) in entries(responses) {
            count += 1;
            let path = path.join(code);
            // Ranges such as `2XX` arrived with OpenAPI 3.0.
            if !is_valid_status_key(code) || code.contains('X') {
                self.cx.push(
                    Issue::error(
                        E_INVALID_STATUS_CODE,
                        &path,
                        format!("`{code}` is not a status code or `default`"),
                    )
                    .with_suggestion("quote status codes in YAML, e.g. \"200\""),
                );
            }
            if let Some(response) = self.inline(response, &path, "Response Object") {
                self.response(response, &path);
            }
        }
        if count == 0 {
            self.cx.error(
                E_EMPTY_RESPONSES,
                path,
                "`responses` must declare at least one response",
            );
        }
    }

    fn response(&mut self, response: &Map<String, Value>, path: &Pointer) {
        let kind = "Response Object";
        self.cx.fields(response, path, kind, RESPONSE, &[]);
        self.cx.require_str(response, path, kind, "description");
        if let Some(schema) = response.get("schema") {
            self.schema(schema, &path.join("schema"));
        }
        if let Some(headers) = self.cx.map(response, path, "headers") {
            let base = path.join("headers");
            for (name, header) in headers {
                self.header(header, &base.join(name));
            }
        }
        self.cx.map(response, path, "examples");
    }

    fn schema(&mut self, value: &Value, path: &Pointer) {
        let kind = "Schema Object";
        let Some(schema) = self.inline(value, path, kind) else {
            return;
        };
        let known: Vec<&str> = SCHEMA.iter().chain(CONSTRAINTS).copied().collect();
        self.cx.fields(schema, path, kind, &known, &[]);

        if let Some(types) = schema.get("type") {
            let names: Vec<&Value> = match types {
                Value::Array(items) => items.iter().collect(),
                single => vec![single],
            };
            for name in names {
                match name.as_str() {
                    Some(n) if SCHEMA_TYPES.contains(&n) => {}
                    Some(n) => self.cx.error(
                        E_INVALID_VALUE,
                        &path.join("type"),
                        format!("`{n}` is not a schema type"),
                    ),
                    None => self.cx.error(
                        E_INVALID_TYPE,
                        &path.join("type"),
                        format!("`type` entries must be strings, found {}", type_name(name)),
                    ),
                }
            }
        }
        self.constraints(schema, path);
        for key in ["maxProperties", "minProperties"] {
            self.cx.non_negative(schema, path, key);
        }
        for key in ["format", "title", "description"] {
            self.cx.string(schema, path, key);
        }
        self.cx.boolean(schema, path, "readOnly");
        let required = self.cx.strings(schema, path, "required");
        if let Some(discriminator) = self.cx.string(schema, path, "discriminator") {
            if !required.contains(&discriminator) {
                self.cx.push(
                    Issue::error(
                        E_INVALID_VALUE,
                        &path.join("discriminator"),
                        format!("discriminator `{discriminator}` must be a required property"),
                    )
                    .with_suggestion(format!("add `{discriminator}` to `required`")),
                );
            }
        }
        if let Some(xml) = schema.get("xml") {
            self.cx.xml(xml, &path.join("xml"));
        }
        if let Some(docs) = schema.get("externalDocs") {
            self.cx.external_docs(docs, &path.join("externalDocs"));
        }

        match schema.get("items") {
            Some(Value::Array(tuple)) => {
                let base = path.join("items");
                for (i, item) in tuple.iter().enumerate() {
                    self.schema(item, &base.index(i));
                }
            }
            Some(item) => self.schema(item, &path.join("items")),
            None => {}
        }
        if let Some(all_of) = self.cx.array(schema, path, "allOf") {
            let base = path.join("allOf");
            for (i, sub) in all_of.iter().enumerate() {
                self.schema(sub, &base.index(i));
            }
        }
        if let Some(properties) = self.cx.map(schema, path, "properties") {
            let base = path.join("properties");
            for (name, sub) in properties {
                self.schema(sub, &base.join(name));
            }
        }
        if let Some(additional) = schema.get("additionalProperties") {
            if !additional.is_boolean() {
                self.schema(additional, &path.join("additionalProperties"));
            }
        }
    }

    fn security_scheme(&mut self, value: &Value, path: &Pointer) {
        let kind = "Security Scheme Object";
        let Some(scheme) = self.cx.object(value, path, kind) else {
            return;
        };
        self.cx.fields(scheme, path, kind, SECURITY_SCHEME, &[]);
        self.cx.string(scheme, path, "description");
        let Some(scheme_type) = self.cx.require_str(scheme, path, kind, "type") else {
            return;
        };
        let specific: &[&str] = match scheme_type {
            "basic" => &[],
            "apiKey" => {
                self.cx.require_str(scheme, path, kind, "name");
                if let Some(location) = self.cx.require_str(scheme, path, kind, "in") {
                    if location != "query" && location != "header" {
                        self.cx.error(
                            E_INVALID_VALUE,
                            &path.join("in"),
                            format!("`{location}` is not an API key location"),
                        );
                    }
                }
                &["name", "in"]
            }
            "oauth2" => {
                self.oauth2(scheme, path);
                &["flow", "authorizationUrl", "tokenUrl", "scopes"]
            }
            other => {
                self.cx.push(
                    Issue::error(
                        E_INVALID_VALUE,
                        &path.join("type"),
                        format!("`{other}` is not a security scheme type"),
                    )
                    .with_suggestion("use one of basic, apiKey, oauth2"),
                );
                return;
            }
        };
        for key in SCHEME_SPECIFIC {
            if scheme.contains_key(key) && !specific.contains(&key) {
                self.cx
                    .not_applicable(path, key, format!("to `{scheme_type}` security schemes"));
            }
        }
    }

    fn oauth2(&mut self, scheme: &Map<String, Value>, path: &Pointer) {
        let kind = "Security Scheme Object";
        if let Some(flow) = self.cx.require_str(scheme, path, kind, "flow") {
            match FLOW_URLS.iter().find(|(name, _)| *name == flow) {
                Some((name, urls)) => {
                    for url in urls.iter() {
                        self.cx.require_str(scheme, path, kind, url);
                    }
                    for url in ["authorizationUrl", "tokenUrl"] {
                        if scheme.contains_key(url) && !urls.contains(&url) {
                            self.cx
                                .not_applicable(path, url, format!("to the {name} flow"));
                        }
                    }
                }
                None => self.cx.push(
                    Issue::error(
                        E_INVALID_VALUE,
                        &path.join("flow"),
                        format!("`{flow}` is not an OAuth2 flow"),
                    )
                    .with_suggestion("use one of implicit, password, application, accessCode"),
                ),
            }
        }
        let Some(scopes) = self.cx.require(scheme, path, kind, "scopes") else {
            return;
        };
        let path = path.join("scopes");
        let Some(scopes) = self.cx.object(scopes, &path, "Scopes Object") else {
            return;
        };
        for (scope, description) in entries(scopes) {
            if !description.is_string() {
                self.cx.error(
                    E_INVALID_TYPE,
                    &path.join(scope),
                    format!(
                        "scope description must be a string, found {}",
                        type_name(description)
                    ),
                );
            }
        }
    }

    fn security(&mut self, value: &Value, path: &Pointer) {
        let Some(requirements) = self.cx.list(value, path) else {
            return;
        };
        for (i, requirement) in requirements.iter().enumerate() {
            let path = path.index(i);
            let Some(requirement) =
                self.cx
                    .object(requirement, &path, "Security Requirement Object")
            else {
                continue;
            };
            for (name, scopes) in requirement {
                let path = path.join(name);
                let Some(scopes) = self.cx.list(scopes, &path) else {
                    continue;
                };
                if scopes.iter().any(|s| !s.is_string()) {
                    self.cx
                        .error(E_INVALID_TYPE, &path, "scope names must be strings");
                }
                if self.cx.options().check_security {
                    self.requirement(name, scopes, &path);
                }
            }
        }
    }

    fn requirement(&mut self, name: &str, scopes: &[Value], path: &Pointer) {
        match self.definitions.get(name) {
            None => {
                let declared: Vec<&str> = self.definitions.keys().map(String::as_str).collect();
                let mut issue = Issue::error(
                    E_UNKNOWN_SECURITY_SCHEME,
                    path,
                    format!("`{name}` is not declared in securityDefinitions"),
                );
                if !declared.is_empty() {
                    issue = issue.with_suggestion(format!("declared schemes: {}", declared.join(", ")));
                }
                self.cx.push(issue);
            }
            Some(Some(scheme_type)) if scheme_type != "oauth2" && !scopes.is_empty() => {
                let message = format!("`{name}` is a {scheme_type} scheme and cannot list scopes");
                self.cx.push(
                    Issue::error(E_NON_OAUTH_SCOPES, path, message)
                        .with_suggestion("use an empty list"),
                );
            }
            Some(_) => {}
        }
    }
}

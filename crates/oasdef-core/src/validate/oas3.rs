//! Walker for OpenAPI 3.0.x and 3.1.x documents.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::report::*;
use super::{Context, entries, is_component_name, type_name};
use crate::parse::operation::HttpMethod;
use crate::parse::parameter::ParameterLocation;
use crate::parse::response::is_valid_status_key;
use crate::pointer::Pointer;
use crate::version::SpecVersion;

const ROOT: &[&str] = &[
    "openapi",
    "info",
    "servers",
    "paths",
    "components",
    "security",
    "tags",
    "externalDocs",
];
const ROOT_31: &[&str] = &["jsonSchemaDialect", "webhooks"];
const INFO: &[&str] = &[
    "title",
    "description",
    "termsOfService",
    "contact",
    "license",
    "version",
];
const LICENSE: &[&str] = &["name", "url"];
const SERVER: &[&str] = &["url", "description", "variables"];
const SERVER_VARIABLE: &[&str] = &["enum", "default", "description"];
const PATH_ITEM: &[&str] = &[
    "$ref",
    "summary",
    "description",
    "get",
    "put",
    "post",
    "delete",
    "options",
    "head",
    "patch",
    "trace",
    "servers",
    "parameters",
];
const OPERATION: &[&str] = &[
    "tags",
    "summary",
    "description",
    "externalDocs",
    "operationId",
    "parameters",
    "requestBody",
    "responses",
    "callbacks",
    "deprecated",
    "security",
    "servers",
];
const PARAMETER: &[&str] = &[
    "name",
    "in",
    "description",
    "required",
    "deprecated",
    "allowEmptyValue",
    "style",
    "explode",
    "allowReserved",
    "schema",
    "example",
    "examples",
    "content",
];
const PARAMETER_FLAGS: [&str; 5] = [
    "required",
    "deprecated",
    "allowEmptyValue",
    "explode",
    "allowReserved",
];
const MEDIA_TYPE: &[&str] = &["schema", "example", "examples", "encoding"];
const ENCODING: &[&str] = &[
    "contentType",
    "headers",
    "style",
    "explode",
    "allowReserved",
];
const REQUEST_BODY: &[&str] = &["description", "content", "required"];
const RESPONSE: &[&str] = &["description", "headers", "content", "links"];
const LINK: &[&str] = &[
    "operationRef",
    "operationId",
    "parameters",
    "requestBody",
    "description",
    "server",
];
const EXAMPLE: &[&str] = &["summary", "description", "value", "externalValue"];
const COMPONENTS: &[&str] = &[
    "schemas",
    "responses",
    "parameters",
    "examples",
    "requestBodies",
    "headers",
    "securitySchemes",
    "links",
    "callbacks",
];
const SECURITY_SCHEME: &[&str] = &[
    "type",
    "description",
    "name",
    "in",
    "scheme",
    "bearerFormat",
    "flows",
    "openIdConnectUrl",
];
/// Fields that belong to exactly one security scheme type.
const SCHEME_SPECIFIC: [&str; 6] = [
    "name",
    "in",
    "scheme",
    "bearerFormat",
    "flows",
    "openIdConnectUrl",
];
const OAUTH_FLOWS: &[&str] = &[
    "implicit",
    "password",
    "clientCredentials",
    "authorizationCode",
];
const OAUTH_FLOW: &[&str] = &["authorizationUrl", "tokenUrl", "refreshUrl", "scopes"];
/// Flow name and the URLs it requires.
const FLOW_URLS: [(&str, &[&str]); 4] = [
    ("implicit", &["authorizationUrl"]),
    ("password", &["tokenUrl"]),
    ("clientCredentials", &["tokenUrl"]),
    ("authorizationCode", &["authorizationUrl", "tokenUrl"]),
];

const SCHEMA_30: &[&str] = &[
    "title",
    "multipleOf",
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
    "maxProperties",
    "minProperties",
    "required",
    "enum",
    "type",
    "allOf",
    "oneOf",
    "anyOf",
    "not",
    "items",
    "properties",
    "additionalProperties",
    "description",
    "format",
    "default",
    "nullable",
    "discriminator",
    "readOnly",
    "writeOnly",
    "xml",
    "externalDocs",
    "example",
    "deprecated",
];
/// JSON Schema 2020-12 keywords OpenAPI 3.0 does not know.
const SCHEMA_2020_12: &[&str] = &[
    "$id",
    "$schema",
    "$anchor",
    "$dynamicAnchor",
    "$dynamicRef",
    "$defs",
    "$comment",
    "$vocabulary",
    "const",
    "if",
    "then",
    "else",
    "prefixItems",
    "contains",
    "minContains",
    "maxContains",
    "dependentSchemas",
    "dependentRequired",
    "patternProperties",
    "propertyNames",
    "unevaluatedItems",
    "unevaluatedProperties",
    "contentEncoding",
    "contentMediaType",
    "contentSchema",
    "examples",
];
const SCHEMA_TYPES_30: &[&str] = &["array", "boolean", "integer", "number", "object", "string"];
const SCHEMA_TYPES_31: &[&str] = &[
    "array", "boolean", "integer", "null", "number", "object", "string",
];
const SIZE_KEYWORDS: [&str; 6] = [
    "maxLength",
    "minLength",
    "maxItems",
    "minItems",
    "maxProperties",
    "minProperties",
];

/// Request headers that are controlled elsewhere and ignored as parameters.
const IGNORED_HEADERS: [&str; 3] = ["accept", "content-type", "authorization"];

pub(super) fn walk(cx: &mut Context<'_>, document: &Value, version: SpecVersion) {
    let Some(root) = document.as_object() else {
        return;
    };
    cx.gate_later = version.is_v30();
    cx.reserved_extensions = true;
    let mut walker = Walker {
        cx,
        v31: version.is_v31(),
        schemes: declared_schemes(root),
    };
    walker.root(root);
}

/// Declared security scheme names and their `type` (`None` for references).
fn declared_schemes(root: &Map<String, Value>) -> IndexMap<String, Option<String>> {
    root.get("components")
        .and_then(|c| c.get("securitySchemes"))
        .and_then(Value::as_object)
        .map(|schemes| {
            schemes
                .iter()
                .map(|(name, scheme)| {
                    let scheme_type = scheme.get("type").and_then(Value::as_str);
                    (name.clone(), scheme_type.map(str::to_string))
                })
                .collect()
        })
        .unwrap_or_default()
}

struct Walker<'c, 'a> {
    cx: &'c mut Context<'a>,
    v31: bool,
    schemes: IndexMap<String, Option<String>>,
}

impl Walker<'_, '_> {
    fn root(&mut self, root: &Map<String, Value>) {
        let path = Pointer::root();
        let kind = "OpenAPI Object";
        self.cx.fields(root, &path, kind, ROOT, ROOT_31);

        if let Some(info) = self.cx.require(root, &path, kind, "info") {
            self.info(info, &path.join("info"));
        }
        if self.v31 {
            if !["paths", "components", "webhooks"]
                .iter()
                .any(|k| root.contains_key(*k))
            {
                self.cx.error(
                    E_MISSING_ONE_OF,
                    &path,
                    "an OpenAPI 3.1 document needs at least one of `paths`, `components` or `webhooks`",
                );
            }
        } else {
            self.cx.require(root, &path, kind, "paths");
        }

        if let Some(servers) = root.get("servers") {
            self.servers(servers, &path.join("servers"));
        }
        if let Some(paths) = root.get("paths") {
            self.paths(paths, &path.join("paths"));
        }
        if self.v31 {
            self.cx.string(root, &path, "jsonSchemaDialect");
            if let Some(webhooks) = self.cx.map(root, &path, "webhooks") {
                let base = path.join("webhooks");
                for (name, item) in webhooks {
                    self.path_item(item, &base.join(name));
                }
            }
        }
        if let Some(components) = root.get("components") {
            self.components(components, &path.join("components"));
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
        self.cx.fields(info, path, kind, INFO, &["summary"]);
        self.cx.require_str(info, path, kind, "title");
        self.cx.require_str(info, path, kind, "version");
        for key in ["description", "termsOfService", "summary"] {
            self.cx.string(info, path, key);
        }
        if let Some(contact) = info.get("contact") {
            self.cx.contact(contact, &path.join("contact"));
        }
        if let Some(license) = info.get("license") {
            self.license(license, &path.join("license"));
        }
    }

    fn license(&mut self, value: &Value, path: &Pointer) {
        let kind = "License Object";
        let Some(license) = self.cx.object(value, path, kind) else {
            return;
        };
        self.cx.fields(license, path, kind, LICENSE, &["identifier"]);
        self.cx.require_str(license, path, kind, "name");
        self.cx.string(license, path, "url");
        if self.v31 {
            self.cx.string(license, path, "identifier");
            self.cx.exclusive(license, path, "url", "identifier");
        }
    }

    fn servers(&mut self, value: &Value, path: &Pointer) {
        let Some(servers) = self.cx.list(value, path) else {
            return;
        };
        for (i, server) in servers.iter().enumerate() {
            self.server(server, &path.index(i));
        }
    }

    fn server(&mut self, value: &Value, path: &Pointer) {
        let kind = "Server Object";
        let Some(server) = self.cx.object(value, path, kind) else {
            return;
        };
        self.cx.fields(server, path, kind, SERVER, &[]);
        self.cx.require_str(server, path, kind, "url");
        self.cx.string(server, path, "description");

        let Some(variables) = self.cx.map(server, path, "variables") else {
            return;
        };
        let base = path.join("variables");
        let kind = "Server Variable Object";
        for (name, variable) in variables {
            let path = base.join(name);
            let Some(variable) = self.cx.object(variable, &path, kind) else {
                continue;
            };
            self.cx.fields(variable, &path, kind, SERVER_VARIABLE, &[]);
            self.cx.string(variable, &path, "description");
            let default = self.cx.require_str(variable, &path, kind, "default");
            if !variable.contains_key("enum") {
                continue;
            }
            let options = self.cx.strings(variable, &path, "enum");
            if matches!(variable.get("enum"), Some(Value::Array(a)) if a.is_empty()) {
                self.cx
                    .error(E_INVALID_VALUE, &path.join("enum"), "`enum` must not be empty");
            }
            if let Some(default) = default {
                if !options.is_empty() && !options.contains(&default) {
                    self.cx.error(
                        E_INVALID_VALUE,
                        &path.join("default"),
                        format!("default `{default}` is not one of the enum values"),
                    );
                }
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
        for key in ["$ref", "summary", "description"] {
            self.cx.string(item, path, key);
        }
        for method in HttpMethod::ALL {
            if let Some(op) = item.get(method.as_str()) {
                self.operation(op, &path.join(method.as_str()));
            }
        }
        if let Some(servers) = item.get("servers") {
            self.servers(servers, &path.join("servers"));
        }
        if let Some(parameters) = item.get("parameters") {
            self.parameters(parameters, &path.join("parameters"));
        }
    }

    fn operation(&mut self, value: &Value, path: &Pointer) {
        let kind = "Operation Object";
        let Some(op) = self.cx.object(value, path, kind) else {
            return;
        };
        self.cx.fields(op, path, kind, OPERATION, &[]);
        self.cx.strings(op, path, "tags");
        self.cx.string(op, path, "summary");
        self.cx.string(op, path, "description");
        self.cx.boolean(op, path, "deprecated");
        self.cx.operation_id(op, path);

        if let Some(parameters) = op.get("parameters") {
            self.parameters(parameters, &path.join("parameters"));
        }
        if let Some(body) = op.get("requestBody") {
            let path = path.join("requestBody");
            if let Some(body) = self.inline(body, &path, "Request Body Object") {
                self.request_body(body, &path);
            }
        }
        match op.get("responses") {
            Some(responses) => self.responses(responses, &path.join("responses")),
            None if !self.v31 => {
                self.cx.require(op, path, kind, "responses");
            }
            None => {}
        }
        if let Some(callbacks) = self.cx.map(op, path, "callbacks") {
            let base = path.join("callbacks");
            for (name, callback) in callbacks {
                let path = base.join(name);
                if let Some(callback) = self.inline(callback, &path, "Callback Object") {
                    self.callback(callback, &path);
                }
            }
        }
        if let Some(security) = op.get("security") {
            self.security(security, &path.join("security"));
        }
        if let Some(servers) = op.get("servers") {
            self.servers(servers, &path.join("servers"));
        }
        if let Some(docs) = op.get("externalDocs") {
            self.cx.external_docs(docs, &path.join("externalDocs"));
        }
    }

    /// The object behind `value` unless it is a Reference Object, which is
    /// checked on the spot.
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
            if self.v31 && (key == "summary" || key == "description") {
                self.cx.string(obj, path, key);
                continue;
            }
            let hint = if self.v31 {
                "a Reference Object may only add `summary` and `description`"
            } else {
                "a Reference Object may only contain `$ref`"
            };
            self.cx.push(
                Issue::error(
                    E_REF_SIBLINGS,
                    &path.join(key),
                    format!("`{key}` is not allowed next to `$ref`"),
                )
                .with_suggestion(hint),
            );
        }
    }

    fn parameters(&mut self, value: &Value, path: &Pointer) {
        let Some(parameters) = self.cx.list(value, path) else {
            return;
        };
        let mut seen = HashSet::new();
        for (i, parameter) in parameters.iter().enumerate() {
            let path = path.index(i);
            let Some(parameter) = self.inline(parameter, &path, "Parameter Object") else {
                continue;
            };
            if let Some((name, location)) = self.parameter(parameter, &path) {
                if !seen.insert((name, location)) {
                    self.cx.error(
                        E_DUPLICATE_PARAMETER,
                        &path,
                        format!("parameter `{name}` in {location} is declared twice"),
                    );
                }
            }
        }
    }

    /// Returns the parameter's identity when both parts are valid.
    fn parameter<'v>(
        &mut self,
        param: &'v Map<String, Value>,
        path: &Pointer,
    ) -> Option<(&'v str, ParameterLocation)> {
        let kind = "Parameter Object";
        self.cx.fields(param, path, kind, PARAMETER, &[]);
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
                        .with_suggestion("use one of query, header, path, cookie"),
                    );
                }
                parsed
            }
            None => None,
        };
        self.cx.string(param, path, "description");
        for key in PARAMETER_FLAGS {
            self.cx.boolean(param, path, key);
        }

        if let Some(location) = location {
            if location == ParameterLocation::Path
                && param.get("required") != Some(&Value::Bool(true))
            {
                let at = if param.contains_key("required") {
                    path.join("required")
                } else {
                    path.clone()
                };
                self.cx.push(
                    Issue::error(
                        E_PATH_PARAM_NOT_REQUIRED,
                        &at,
                        format!("path parameter `{}` must be required", name.unwrap_or("?")),
                    )
                    .with_suggestion("set `required: true`"),
                );
            }
            if location != ParameterLocation::Query {
                for key in ["allowEmptyValue", "allowReserved"] {
                    if param.contains_key(key) {
                        self.cx.not_applicable(path, key, format!("to {location} parameters"));
                    }
                }
            }
            if location == ParameterLocation::Header {
                if let Some(name) = name {
                    if IGNORED_HEADERS.contains(&name.to_ascii_lowercase().as_str()) {
                        self.cx.warning(
                            E_IGNORED_HEADER,
                            &path.join("name"),
                            format!("header parameter `{name}` is ignored"),
                        );
                    }
                }
            }
            let target = format!("{location} parameters");
            self.style(param, path, location.allowed_styles(), &target);
        }
        self.format(param, path, kind);
        Some((name?, location?))
    }

    fn style(&mut self, obj: &Map<String, Value>, path: &Pointer, allowed: &[&str], target: &str) {
        let Some(style) = self.cx.string(obj, path, "style") else {
            return;
        };
        if !allowed.contains(&style) {
            self.cx.push(
                Issue::error(
                    E_INVALID_STYLE,
                    &path.join("style"),
                    format!("style `{style}` is not allowed for {target}"),
                )
                .with_suggestion(format!("use one of: {}", allowed.join(", "))),
            );
        }
    }

    /// `schema` or `content` on a parameter or header.
    fn format(&mut self, obj: &Map<String, Value>, path: &Pointer, kind: &str) {
        if !self.cx.exclusive(obj, path, "schema", "content") {
            self.cx.one_of(obj, path, kind, "schema", "content");
        }
        self.cx.exclusive(obj, path, "example", "examples");
        // Serialization and examples live on the media type under `content`.
        for key in ["style", "explode", "allowReserved", "example", "examples"] {
            self.cx.exclusive(obj, path, "content", key);
        }
        if let Some(schema) = obj.get("schema") {
            self.schema(schema, &path.join("schema"));
        }
        if let Some(content) = obj.get("content") {
            let path = path.join("content");
            if let Some(count) = self.content(content, &path) {
                if count != 1 {
                    self.cx.error(
                        E_CONTENT_ENTRY_COUNT,
                        &path,
                        format!("`content` must have exactly one entry, found {count}"),
                    );
                }
            }
        }
        if let Some(examples) = obj.get("examples") {
            self.examples(examples, &path.join("examples"));
        }
    }

    /// Returns the number of media types.
    fn content(&mut self, value: &Value, path: &Pointer) -> Option<usize> {
        let content = self.cx.object(value, path, "content map")?;
        for (media_type, entry) in content {
            self.media_type(entry, &path.join(media_type));
        }
        Some(content.len())
    }

    fn media_type(&mut self, value: &Value, path: &Pointer) {
        let kind = "Media Type Object";
        let Some(media) = self.cx.object(value, path, kind) else {
            return;
        };
        self.cx.fields(media, path, kind, MEDIA_TYPE, &[]);
        self.cx.exclusive(media, path, "example", "examples");
        if let Some(schema) = media.get("schema") {
            self.schema(schema, &path.join("schema"));
        }
        if let Some(examples) = media.get("examples") {
            self.examples(examples, &path.join("examples"));
        }
        if let Some(encoding) = self.cx.map(media, path, "encoding") {
            let base = path.join("encoding");
            for (property, entry) in encoding {
                self.encoding(entry, &base.join(property));
            }
        }
    }

    fn encoding(&mut self, value: &Value, path: &Pointer) {
        let kind = "Encoding Object";
        let Some(encoding) = self.cx.object(value, path, kind) else {
            return;
        };
        self.cx.fields(encoding, path, kind, ENCODING, &[]);
        self.cx.string(encoding, path, "contentType");
        self.cx.boolean(encoding, path, "explode");
        self.cx.boolean(encoding, path, "allowReserved");
        self.style(
            encoding,
            path,
            ParameterLocation::Query.allowed_styles(),
            "encodings",
        );
        self.headers(encoding, path);
    }

    fn headers(&mut self, obj: &Map<String, Value>, path: &Pointer) {
        let Some(headers) = self.cx.map(obj, path, "headers") else {
            return;
        };
        let base = path.join("headers");
        for (name, header) in headers {
            let path = base.join(name);
            if name.eq_ignore_ascii_case("content-type") {
                self.cx.warning(
                    E_IGNORED_HEADER,
                    &path,
                    "a `Content-Type` header definition is ignored",
                );
            }
            if let Some(header) = self.inline(header, &path, "Header Object") {
                self.header(header, &path);
            }
        }
    }

    fn header(&mut self, header: &Map<String, Value>, path: &Pointer) {
        let kind = "Header Object";
        self.cx.fields(header, path, kind, PARAMETER, &[]);
        self.cx.string(header, path, "description");
        for key in PARAMETER_FLAGS {
            self.cx.boolean(header, path, key);
        }
        for key in ["name", "in", "allowEmptyValue", "allowReserved"] {
            if header.contains_key(key) {
                self.cx.not_applicable(path, key, "to headers");
            }
        }
        self.style(
            header,
            path,
            ParameterLocation::Header.allowed_styles(),
            "headers",
        );
        self.format(header, path, kind);
    }

    fn request_body(&mut self, body: &Map<String, Value>, path: &Pointer) {
        let kind = "Request Body Object";
        self.cx.fields(body, path, kind, REQUEST_BODY, &[]);
        self.cx.string(body, path, "description");
        self.cx.boolean(body, path, "required");
        if let Some(content) = self.cx.require(body, path, kind, "content") {
            self.content(content, &path.join("content"));
        }
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
            if !is_valid_status_key(code) {
                self.cx.push(
                    Issue::error(
                        E_INVALID_STATUS_CODE,
                        &path,
                        format!("`{code}` is not a status code, range or `default`"),
                    )
                    .with_suggestion("use `default`, a code such as `200` or a range such as `2XX`"),
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
        self.headers(response, path);
        if let Some(content) = response.get("content") {
            self.content(content, &path.join("content"));
        }
        if let Some(links) = self.cx.map(response, path, "links") {
            let base = path.join("links");
            for (name, link) in links {
                let path = base.join(name);
                if let Some(link) = self.inline(link, &path, "Link Object") {
                    self.link(link, &path);
                }
            }
        }
    }

    fn link(&mut self, link: &Map<String, Value>, path: &Pointer) {
        let kind = "Link Object";
        self.cx.fields(link, path, kind, LINK, &[]);
        if !self.cx.exclusive(link, path, "operationRef", "operationId") {
            self.cx.one_of(link, path, kind, "operationRef", "operationId");
        }
        for key in ["operationRef", "operationId", "description"] {
            self.cx.string(link, path, key);
        }
        self.cx.map(link, path, "parameters");
        if let Some(server) = link.get("server") {
            self.server(server, &path.join("server"));
        }
    }

    fn callback(&mut self, callback: &Map<String, Value>, path: &Pointer) {
        self.cx.extensions(callback, path);
        for (expression, item) in entries(callback) {
            self.path_item(item, &path.join(expression));
        }
    }

    fn examples(&mut self, value: &Value, path: &Pointer) {
        let Some(examples) = self.cx.object(value, path, "examples map") else {
            return;
        };
        for (name, example) in examples {
            let path = path.join(name);
            if let Some(example) = self.inline(example, &path, "Example Object") {
                self.example(example, &path);
            }
        }
    }

    fn example(&mut self, example: &Map<String, Value>, path: &Pointer) {
        self.cx.fields(example, path, "Example Object", EXAMPLE, &[]);
        self.cx.exclusive(example, path, "value", "externalValue");
        for key in ["summary", "description", "externalValue"] {
            self.cx.string(example, path, key);
        }
    }

    fn components(&mut self, value: &Value, path: &Pointer) {
        let kind = "Components Object";
        let Some(components) = self.cx.object(value, path, kind) else {
            return;
        };
        self.cx.fields(components, path, kind, COMPONENTS, &["pathItems"]);
        for (section, definitions) in entries(components) {
            let known = COMPONENTS.contains(&section.as_str())
                || (section == "pathItems" && self.v31);
            if !known {
                continue;
            }
            let base = path.join(section);
            let Some(definitions) = self.cx.object(definitions, &base, "component map") else {
                continue;
            };
            for (name, definition) in definitions {
                let path = base.join(name);
                if !is_component_name(name) {
                    self.cx.error(
                        E_INVALID_COMPONENT_NAME,
                        &path,
                        format!("component name `{name}` must match ^[a-zA-Z0-9.\\-_]+$"),
                    );
                }
                self.component(section, definition, &path);
            }
        }
    }

    fn component(&mut self, section: &str, value: &Value, path: &Pointer) {
        let kind = match section {
            "schemas" => return self.schema(value, path),
            "pathItems" => return self.path_item(value, path),
            "responses" => "Response Object",
            "parameters" => "Parameter Object",
            "examples" => "Example Object",
            "requestBodies" => "Request Body Object",
            "headers" => "Header Object",
            "securitySchemes" => "Security Scheme Object",
            "links" => "Link Object",
            "callbacks" => "Callback Object",
            _ => return,
        };
        let Some(obj) = self.inline(value, path, kind) else {
            return;
        };
        match section {
            "responses" => self.response(obj, path),
            "parameters" => {
                self.parameter(obj, path);
            }
            "examples" => self.example(obj, path),
            "requestBodies" => self.request_body(obj, path),
            "headers" => self.header(obj, path),
            "securitySchemes" => self.security_scheme(obj, path),
            "links" => self.link(obj, path),
            _ => self.callback(obj, path),
        }
    }

    fn security_scheme(&mut self, scheme: &Map<String, Value>, path: &Pointer) {
        let kind = "Security Scheme Object";
        self.cx.fields(scheme, path, kind, SECURITY_SCHEME, &[]);
        self.cx.string(scheme, path, "description");
        let Some(scheme_type) = self.cx.require_str(scheme, path, kind, "type") else {
            return;
        };
        let specific: &[&str] = match scheme_type {
            "apiKey" => {
                self.cx.require_str(scheme, path, kind, "name");
                if let Some(location) = self.cx.require_str(scheme, path, kind, "in") {
                    if !["query", "header", "cookie"].contains(&location) {
                        self.cx.error(
                            E_INVALID_VALUE,
                            &path.join("in"),
                            format!("`{location}` is not an API key location"),
                        );
                    }
                }
                &["name", "in"]
            }
            "http" => {
                self.cx.require_str(scheme, path, kind, "scheme");
                self.cx.string(scheme, path, "bearerFormat");
                &["scheme", "bearerFormat"]
            }
            "oauth2" => {
                if let Some(flows) = self.cx.require(scheme, path, kind, "flows") {
                    self.flows(flows, &path.join("flows"));
                }
                &["flows"]
            }
            "openIdConnect" => {
                self.cx.require_str(scheme, path, kind, "openIdConnectUrl");
                &["openIdConnectUrl"]
            }
            "mutualTLS" => {
                if !self.v31 {
                    self.cx.version_gated(&path.join("type"), "mutualTLS", kind);
                }
                &[]
            }
            other => {
                let mut types = String::from("apiKey, http, oauth2, openIdConnect");
                if self.v31 {
                    types.push_str(", mutualTLS");
                }
                self.cx.push(
                    Issue::error(
                        E_INVALID_VALUE,
                        &path.join("type"),
                        format!("`{other}` is not a security scheme type"),
                    )
                    .with_suggestion(format!("use one of {types}")),
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

    fn flows(&mut self, value: &Value, path: &Pointer) {
        let Some(flows) = self.cx.object(value, path, "OAuth Flows Object") else {
            return;
        };
        self.cx.fields(flows, path, "OAuth Flows Object", OAUTH_FLOWS, &[]);
        let kind = "OAuth Flow Object";
        for (name, urls) in FLOW_URLS {
            let Some(flow) = flows.get(name) else {
                continue;
            };
            let path = path.join(name);
            let Some(flow) = self.cx.object(flow, &path, kind) else {
                continue;
            };
            self.cx.fields(flow, &path, kind, OAUTH_FLOW, &[]);
            for url in urls {
                self.cx.require_str(flow, &path, kind, url);
            }
            for url in ["authorizationUrl", "tokenUrl"] {
                if flow.contains_key(url) && !urls.contains(&url) {
                    self.cx
                        .not_applicable(&path, url, format!("to the {name} flow"));
                }
            }
            self.cx.string(flow, &path, "refreshUrl");
            let Some(scopes) = self.cx.require(flow, &path, kind, "scopes") else {
                continue;
            };
            let path = path.join("scopes");
            let Some(scopes) = self.cx.object(scopes, &path, "scopes map") else {
                continue;
            };
            for (scope, description) in scopes {
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
        match self.schemes.get(name) {
            None => {
                let declared: Vec<&str> = self.schemes.keys().map(String::as_str).collect();
                let mut issue = Issue::error(
                    E_UNKNOWN_SECURITY_SCHEME,
                    path,
                    format!("`{name}` is not declared in components.securitySchemes"),
                );
                if !declared.is_empty() {
                    issue = issue.with_suggestion(format!("declared schemes: {}", declared.join(", ")));
                }
                self.cx.push(issue);
            }
            // 3.1 lets every scheme type list the roles it needs.
            Some(Some(scheme_type))
                if !self.v31
                    && !scopes.is_empty()
                    && !matches!(scheme_type.as_str(), "oauth2" | "openIdConnect") =>
            {
                let message =
                    format!("`{name}` is a {scheme_type} scheme and cannot list scopes in OpenAPI 3.0");
                self.cx.push(
                    Issue::error(E_NON_OAUTH_SCOPES, path, message)
                        .with_suggestion("use an empty list or upgrade to OpenAPI 3.1"),
                );
            }
            Some(_) => {}
        }
    }

    fn schema(&mut self, value: &Value, path: &Pointer) {
        if self.v31 {
            self.schema_31(value, path);
        } else {
            self.schema_30(value, path);
        }
    }

    fn schema_30(&mut self, value: &Value, path: &Pointer) {
        let kind = "Schema Object";
        let Some(schema) = self.inline(value, path, kind) else {
            return;
        };
        self.cx.fields(schema, path, kind, SCHEMA_30, SCHEMA_2020_12);

        match schema.get("type") {
            None => {}
            Some(Value::String(name)) if SCHEMA_TYPES_30.contains(&name.as_str()) => {}
            Some(Value::String(name)) if name == "null" => self.cx.push(
                Issue::error(
                    E_INVALID_VALUE,
                    &path.join("type"),
                    "`null` is not a type in OpenAPI 3.0",
                )
                .with_suggestion("use `nullable: true`"),
            ),
            Some(Value::String(name)) => self.cx.error(
                E_INVALID_VALUE,
                &path.join("type"),
                format!("`{name}` is not a schema type"),
            ),
            Some(Value::Array(_)) => self.cx.push(
                Issue::error(
                    E_INVALID_TYPE,
                    &path.join("type"),
                    "`type` must be a single string in OpenAPI 3.0",
                )
                .with_suggestion("use one type with `nullable: true`, or `oneOf`"),
            ),
            Some(other) => self.cx.expected(path, "type", "a string", other),
        }
        for key in ["exclusiveMinimum", "exclusiveMaximum"] {
            if let Some(value) = schema.get(key) {
                if !value.is_boolean() {
                    self.cx.push(
                        Issue::error(
                            E_INVALID_TYPE,
                            &path.join(key),
                            format!("`{key}` must be a boolean in OpenAPI 3.0"),
                        )
                        .with_suggestion("put the bound in `minimum`/`maximum` and set this to true"),
                    );
                }
            }
        }
        self.cx.boolean(schema, path, "nullable");
        self.schema_common(schema, path);
        if schema.get("type").and_then(Value::as_str) == Some("array")
            && !schema.contains_key("items")
        {
            self.cx.error(
                E_MISSING_FIELD,
                path,
                "array schemas must declare `items`",
            );
        }

        for key in ["allOf", "oneOf", "anyOf"] {
            self.schema_list(schema, path, key);
        }
        for key in ["not", "items"] {
            if let Some(sub) = schema.get(key) {
                self.schema_30(sub, &path.join(key));
            }
        }
        self.schema_map(schema, path, "properties");
        if let Some(additional) = schema.get("additionalProperties") {
            if !additional.is_boolean() {
                self.schema_30(additional, &path.join("additionalProperties"));
            }
        }
    }

    fn schema_31(&mut self, value: &Value, path: &Pointer) {
        let schema = match value {
            Value::Bool(_) => return,
            Value::Object(schema) => schema,
            other => {
                self.cx.error(
                    E_INVALID_TYPE,
                    path,
                    format!(
                        "Schema Object must be an object or boolean, found {}",
                        type_name(other)
                    ),
                );
                return;
            }
        };
        self.cx.extensions(schema, path);
        for key in [
            "$ref",
            "$dynamicRef",
            "$id",
            "$schema",
            "$anchor",
            "$dynamicAnchor",
            "$comment",
            "contentEncoding",
            "contentMediaType",
        ] {
            self.cx.string(schema, path, key);
        }

        if let Some(types) = schema.get("type") {
            let names: Vec<&Value> = match types {
                Value::Array(items) => items.iter().collect(),
                single => vec![single],
            };
            let mut seen = HashSet::new();
            for name in names {
                match name.as_str() {
                    Some(n) if SCHEMA_TYPES_31.contains(&n) => {
                        if !seen.insert(n) {
                            self.cx.error(
                                E_INVALID_VALUE,
                                &path.join("type"),
                                format!("type `{n}` is listed twice"),
                            );
                        }
                    }
                    Some(n) => self.cx.error(
                        E_INVALID_VALUE,
                        &path.join("type"),
                        format!("`{n}` is not a schema type"),
                    ),
                    None => self.cx.error(
                        E_INVALID_TYPE,
                        &path.join("type"),
                        "`type` must be a string or an array of strings",
                    ),
                }
            }
        }
        for key in ["exclusiveMinimum", "exclusiveMaximum"] {
            if let Some(value) = schema.get(key) {
                if !value.is_number() {
                    self.cx.push(
                        Issue::error(
                            E_INVALID_TYPE,
                            &path.join(key),
                            format!("`{key}` must be a number in OpenAPI 3.1"),
                        )
                        .with_suggestion(format!("write the bound itself, e.g. `{key}: 0`")),
                    );
                }
            }
        }
        if schema.contains_key("nullable") {
            self.cx.push(
                Issue::warning(
                    E_DEPRECATED_KEYWORD,
                    &path.join("nullable"),
                    "`nullable` has no effect in OpenAPI 3.1",
                )
                .with_suggestion("add \"null\" to `type`"),
            );
        }
        self.schema_common(schema, path);
        self.cx.non_negative(schema, path, "maxContains");
        self.cx.non_negative(schema, path, "minContains");
        self.cx.array(schema, path, "examples");
        if let Some(dependent) = self.cx.map(schema, path, "dependentRequired") {
            let base = path.join("dependentRequired");
            for property in dependent.keys() {
                self.cx.strings(dependent, &base, property);
            }
        }

        for key in ["allOf", "anyOf", "oneOf", "prefixItems"] {
            self.schema_list(schema, path, key);
        }
        for key in [
            "not",
            "if",
            "then",
            "else",
            "items",
            "contains",
            "additionalProperties",
            "propertyNames",
            "unevaluatedItems",
            "unevaluatedProperties",
            "contentSchema",
        ] {
            if let Some(sub) = schema.get(key) {
                self.schema_31(sub, &path.join(key));
            }
        }
        for key in ["properties", "patternProperties", "$defs", "dependentSchemas"] {
            self.schema_map(schema, path, key);
        }
    }

    /// Keywords that mean the same thing in both dialects.
    fn schema_common(&mut self, schema: &Map<String, Value>, path: &Pointer) {
        for key in ["multipleOf", "maximum", "minimum"] {
            self.cx.number(schema, path, key);
        }
        for key in SIZE_KEYWORDS {
            self.cx.non_negative(schema, path, key);
        }
        for key in ["title", "description", "format", "pattern"] {
            self.cx.string(schema, path, key);
        }
        for key in ["uniqueItems", "readOnly", "writeOnly", "deprecated"] {
            self.cx.boolean(schema, path, key);
        }
        self.cx.strings(schema, path, "required");
        self.cx.array(schema, path, "enum");

        let flag = |key: &str| schema.get(key) == Some(&Value::Bool(true));
        if flag("readOnly") && flag("writeOnly") {
            self.cx.error(
                E_MUTUALLY_EXCLUSIVE,
                &path.join("writeOnly"),
                "a schema cannot be both `readOnly` and `writeOnly`",
            );
        }
        if let Some(discriminator) = schema.get("discriminator") {
            self.discriminator(discriminator, &path.join("discriminator"));
        }
        if let Some(xml) = schema.get("xml") {
            self.cx.xml(xml, &path.join("xml"));
        }
        if let Some(docs) = schema.get("externalDocs") {
            self.cx.external_docs(docs, &path.join("externalDocs"));
        }
    }

    fn discriminator(&mut self, value: &Value, path: &Pointer) {
        let kind = "Discriminator Object";
        let Some(discriminator) = self.cx.object(value, path, kind) else {
            return;
        };
        self.cx
            .fields(discriminator, path, kind, &["propertyName", "mapping"], &[]);
        self.cx.require_str(discriminator, path, kind, "propertyName");
        if let Some(mapping) = self.cx.map(discriminator, path, "mapping") {
            let base = path.join("mapping");
            for key in mapping.keys() {
                self.cx.string(mapping, &base, key);
            }
        }
    }

    fn schema_list(&mut self, schema: &Map<String, Value>, path: &Pointer, key: &str) {
        let Some(items) = self.cx.array(schema, path, key) else {
            return;
        };
        let base = path.join(key);
        for (i, item) in items.iter().enumerate() {
            self.schema(item, &base.index(i));
        }
    }

    fn schema_map(&mut self, schema: &Map<String, Value>, path: &Pointer, key: &str) {
        let Some(map) = self.cx.map(schema, path, key) else {
            return;
        };
        let base = path.join(key);
        for (name, sub) in map {
            self.schema(sub, &base.join(name));
        }
    }
}

use oasdef_core::config::{FieldPolicy, ValidateOptions, VersionGatePolicy};
use oasdef_core::parse::SourceFormat;
use oasdef_core::validate::{self, Severity, ValidationReport};
use serde_json::{Value, json};

const FIXTURES: &[(&str, &str)] = &[
    ("petstore-3.0", include_str!("fixtures/petstore-3.0.yaml")),
    ("uspto-3.0", include_str!("fixtures/uspto-3.0.yaml")),
    ("callback-3.0", include_str!("fixtures/callback-3.0.yaml")),
    ("link-3.0", include_str!("fixtures/link-3.0.yaml")),
    ("webhook-3.1", include_str!("fixtures/webhook-3.1.yaml")),
    (
        "non-oauth-scopes-3.1",
        include_str!("fixtures/non-oauth-scopes-3.1.yaml"),
    ),
    ("petstore-2.0", include_str!("fixtures/petstore-2.0.yaml")),
];

fn load(name: &str) -> Value {
    let (_, text) = FIXTURES
        .iter()
        .find(|(n, _)| *n == name)
        .expect("unknown fixture");
    serde_yaml_ng::from_str(text).expect("fixture should be valid YAML")
}

fn check(doc: &Value) -> ValidationReport {
    validate::validate_value(doc, &ValidateOptions::default())
}

/// `code path` lines, in report order.
fn located(report: &ValidationReport) -> Vec<String> {
    report
        .issues
        .iter()
        .map(|i| format!("{} {}", i.code, i.path))
        .collect()
}

#[test]
fn fixtures_are_valid() {
    for (name, text) in FIXTURES {
        let report = validate::validate_str(text, SourceFormat::Yaml, &ValidateOptions::default())
            .unwrap_or_else(|e| panic!("{name}: {e}"));
        assert_eq!(report, ValidationReport::success(), "{name}");
    }
}

#[test]
fn petstore_required_and_operation_ids() {
    let mut doc = load("petstore-3.0");
    doc["paths"]["/pets/{id}"]["get"]["parameters"][0]["required"] = json!(false);
    doc["paths"]["/pets/{id}"]["delete"]["operationId"] = json!("addPet");

    let report = check(&doc);
    assert!(!report.ok);
    insta::assert_json_snapshot!(located(&report), @r##"
    [
      "E_PATH_PARAM_NOT_REQUIRED #/paths/~1pets~1{id}/get/parameters/0/required",
      "E_DUPLICATE_OPERATION_ID #/paths/~1pets~1{id}/delete/operationId"
    ]
    "##);
}

#[test]
fn petstore_unknown_fields_follow_policy() {
    let mut doc = load("petstore-3.0");
    doc["info"]["owner"] = json!("pets team");

    assert_eq!(check(&doc).codes(), ["E_UNKNOWN_FIELD"]);

    let options = ValidateOptions {
        unknown_fields: FieldPolicy::Warn,
        ..ValidateOptions::default()
    };
    let report = validate::validate_value(&doc, &options);
    assert!(report.ok);
    assert_eq!(report.issues[0].severity, Severity::Warning);

    let options = ValidateOptions {
        unknown_fields: FieldPolicy::Allow,
        ..ValidateOptions::default()
    };
    assert!(validate::validate_value(&doc, &options).issues.is_empty());
}

#[test]
fn non_oauth_scopes_need_3_1() {
    let mut doc = load("non-oauth-scopes-3.1");
    doc["openapi"] = json!("3.0.3");

    let report = check(&doc);
    insta::assert_json_snapshot!(located(&report), @r##"
    [
      "E_MISSING_FIELD #/paths/~1users/get",
      "E_NON_OAUTH_SCOPES #/paths/~1users/get/security/0/bearerAuth"
    ]
    "##);

    let options = ValidateOptions {
        check_security: false,
        ..ValidateOptions::default()
    };
    assert_eq!(
        validate::validate_value(&doc, &options).codes(),
        ["E_MISSING_FIELD"]
    );
}

#[test]
fn webhooks_are_gated_in_3_0() {
    let mut doc = load("webhook-3.1");
    doc["openapi"] = json!("3.0.3");

    let report = check(&doc);
    let codes = report.codes();
    assert!(codes.contains(&"E_VERSION_GATED"), "{codes:?}");
    assert!(codes.contains(&"E_MISSING_FIELD"), "{codes:?}");

    let options = ValidateOptions {
        version_gated: VersionGatePolicy::Ignore,
        ..ValidateOptions::default()
    };
    let report = validate::validate_value(&doc, &options);
    let gated = report
        .issues
        .iter()
        .find(|i| i.code == "E_VERSION_GATED")
        .expect("gated keyword is still reported");
    assert_eq!(gated.severity, Severity::Warning);
    assert_eq!(gated.path.to_string(), "#/webhooks");
}

#[test]
fn swagger_rejects_ranges_and_unknown_schemes() {
    let mut doc = load("petstore-2.0");
    let responses = &mut doc["paths"]["/pets"]["post"]["responses"];
    let created = responses["201"].clone();
    responses["2XX"] = created;
    doc["security"] = json!([{"oauth": ["write:pets"]}]);

    let report = check(&doc);
    insta::assert_json_snapshot!(located(&report), @r##"
    [
      "E_INVALID_STATUS_CODE #/paths/~1pets/post/responses/2XX",
      "E_UNKNOWN_SECURITY_SCHEME #/security/0/oauth"
    ]
    "##);
    assert_eq!(
        report.issues[1].suggestion.as_deref(),
        Some("declared schemes: api_key, petstore_auth")
    );
}

#[test]
fn swagger_body_parameter_rules() {
    let mut doc = load("petstore-2.0");
    let parameters = doc["paths"]["/pets"]["post"]["parameters"]
        .as_array_mut()
        .expect("parameter list");
    parameters.push(json!({"name": "name", "in": "formData", "type": "string"}));

    assert_eq!(check(&doc).codes(), ["E_MUTUALLY_EXCLUSIVE"]);
}

#[test]
fn validate_json_source() {
    let json = r#"{"openapi": "3.1.0", "info": {"title": "T", "version": "1"}}"#;
    let report = validate::validate_str(json, SourceFormat::Json, &ValidateOptions::default())
        .expect("valid JSON");
    assert_eq!(report.codes(), ["E_MISSING_ONE_OF"]);
    assert_eq!(report.issues[0].path.to_string(), "#");

    let broken = validate::validate_str("{", SourceFormat::Json, &ValidateOptions::default());
    assert!(broken.is_err());
}

#[test]
fn report_serializes_for_tooling() {
    let mut doc = load("petstore-3.0");
    doc["x-oai-internal"] = json!(true);

    let report = check(&doc);
    insta::assert_json_snapshot!(report, @r##"
    {
      "ok": false,
      "issues": [
        {
          "code": "E_RESERVED_EXTENSION",
          "severity": "error",
          "message": "`x-oai-internal` uses a prefix reserved by the OpenAPI Initiative",
          "path": "#/x-oai-internal"
        }
      ]
    }
    "##);
}

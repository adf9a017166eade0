use oasdef_core::config::ValidateOptions;
use oasdef_core::parse;
use oasdef_core::validate;

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

#[test]
fn json_output_decodes_to_the_same_model() {
    for (name, text) in FIXTURES {
        let doc = parse::from_yaml(text).unwrap_or_else(|e| panic!("{name}: {e}"));
        let json = doc.to_json().unwrap();
        let again = parse::from_json(&json).unwrap_or_else(|e| panic!("{name}: {e}\n{json}"));
        assert_eq!(again, doc, "{name}");
    }
}

#[test]
fn yaml_output_decodes_to_the_same_model() {
    for (name, text) in FIXTURES {
        let doc = parse::from_yaml(text).unwrap();
        let yaml = doc.to_yaml().unwrap();
        let again = parse::from_yaml(&yaml).unwrap_or_else(|e| panic!("{name}: {e}\n{yaml}"));
        assert_eq!(again, doc, "{name}");
    }
}

#[test]
fn extensions_survive_a_round_trip() {
    let json = r#"{
        "openapi": "3.1.0",
        "info": {"title": "Ext", "version": "1", "x-audience": "internal"},
        "paths": {
            "x-generated": true,
            "/ping": {
                "get": {
                    "x-rate-limit": {"per-minute": 60},
                    "responses": {"204": {"description": "pong"}}
                }
            }
        }
    }"#;
    let doc = parse::from_json(json).unwrap();
    let value = doc.to_value().unwrap();
    assert_eq!(value["info"]["x-audience"], "internal");
    assert_eq!(value["paths"]["x-generated"], true);
    assert_eq!(value["paths"]["/ping"]["get"]["x-rate-limit"]["per-minute"], 60);
    assert_eq!(doc.operations().len(), 1);
}

#[test]
fn webhook_ref_siblings_survive_a_round_trip() {
    let json = r##"{
        "openapi": "3.1.0",
        "info": {"title": "Hooks", "version": "1"},
        "webhooks": {
            "hook": {
                "$ref": "#/components/pathItems/Shared",
                "summary": "s",
                "post": {"responses": {"202": {"description": "accepted"}}}
            }
        },
        "components": {
            "pathItems": {
                "Shared": {"get": {"responses": {"204": {"description": "pong"}}}}
            }
        }
    }"##;
    let source: serde_json::Value = serde_json::from_str(json).unwrap();
    let report = validate::validate_value(&source, &ValidateOptions::default());
    assert!(report.ok, "{:?}", report.issues);

    let doc = parse::from_json(json).unwrap();
    let value = doc.to_value().unwrap();
    assert_eq!(value["webhooks"], source["webhooks"]);
    assert_eq!(value["components"], source["components"]);
}

use oasdef_core::parse::operation::{HttpMethod, LinkTarget};
use oasdef_core::parse::reference::ReferenceOr;
use oasdef_core::parse::security::SecurityScheme;
use oasdef_core::parse::{self, Document, swagger};
use oasdef_core::SpecVersion;

const PETSTORE: &str = include_str!("fixtures/petstore-3.0.yaml");
const USPTO: &str = include_str!("fixtures/uspto-3.0.yaml");
const CALLBACK: &str = include_str!("fixtures/callback-3.0.yaml");
const LINK: &str = include_str!("fixtures/link-3.0.yaml");
const WEBHOOK: &str = include_str!("fixtures/webhook-3.1.yaml");
const NON_OAUTH_SCOPES: &str = include_str!("fixtures/non-oauth-scopes-3.1.yaml");
const SWAGGER_PETSTORE: &str = include_str!("fixtures/petstore-2.0.yaml");

#[test]
fn parse_petstore_yaml() {
    let doc = parse::from_yaml(PETSTORE).expect("should parse petstore");
    assert_eq!(doc.version(), SpecVersion::V30 { patch: 0 });
    assert_eq!(doc.title(), "Petstore Expanded");
    assert_eq!(doc.api_version(), "1.0.0");

    let ops = doc.operations();
    assert_eq!(ops.len(), 4);
    assert_eq!(ops[0].method, HttpMethod::Get);
    assert_eq!(ops[0].path, "/pets");
    assert_eq!(ops[0].operation_id.as_deref(), Some("findPets"));
    assert!(ops[3].deprecated);

    assert_eq!(doc.component_counts(), [("schemas", 3)]);
    let kinds = doc.schema_kinds();
    assert_eq!(kinds.get("composition"), Some(&1));
    assert_eq!(kinds.get("object"), Some(&2));

    let Document::V30(spec) = &doc else {
        panic!("expected a 3.0 document");
    };
    let pet = spec.paths.get("/pets/{id}").expect("should have /pets/{id}");
    let get = pet.operation(HttpMethod::Get).expect("should have GET");
    let param = get.parameters[0].as_item().expect("inline parameter");
    assert_eq!(param.name(), "id");
    assert!(param.is_required());
    assert!(param.schema().is_some());
    assert!(get.responses.contains_key("default"));
}

#[test]
fn parse_uspto_server_variables() {
    let doc = parse::from_yaml(USPTO).expect("should parse uspto");
    assert_eq!(doc.version(), SpecVersion::V30 { patch: 1 });

    let Document::V30(spec) = &doc else {
        panic!("expected a 3.0 document");
    };
    assert_eq!(
        spec.servers[0].default_url(),
        "https://data.example.gov/ds-api"
    );
    assert_eq!(spec.tags.len(), 2);

    let ids: Vec<_> = doc
        .operations()
        .into_iter()
        .filter_map(|op| op.operation_id)
        .collect();
    assert_eq!(
        ids,
        ["list-data-sets", "list-searchable-fields", "perform-search"]
    );
}

#[test]
fn parse_callbacks() {
    let doc = parse::from_yaml(CALLBACK).expect("should parse callbacks");
    let Document::V30(spec) = &doc else {
        panic!("expected a 3.0 document");
    };

    let op = spec
        .paths
        .get("/streams")
        .and_then(|item| item.operation(HttpMethod::Post))
        .expect("should have POST /streams");
    let callback = op
        .callbacks
        .get("onData")
        .and_then(ReferenceOr::as_item)
        .expect("inline callback");
    let item = callback
        .get("{$request.query.callbackUrl}/data")
        .expect("callback expression key");
    let post = item.operation(HttpMethod::Post).expect("callback POST");
    assert!(post.request_body.is_some());
    assert_eq!(post.responses.len(), 2);
}

#[test]
fn parse_links() {
    let doc = parse::from_yaml(LINK).expect("should parse links");
    let Document::V30(spec) = &doc else {
        panic!("expected a 3.0 document");
    };
    assert_eq!(doc.operations().len(), 6);

    let components = spec.components.as_ref().expect("should have components");
    assert_eq!(components.links.len(), 4);
    let merge = components
        .links
        .get("PullRequestMerge")
        .and_then(ReferenceOr::as_item)
        .expect("inline link");
    assert_eq!(
        merge.target,
        Some(LinkTarget::OperationId("mergePullRequest".into()))
    );
    assert_eq!(merge.parameters.len(), 3);
    assert_eq!(merge.parameters["pid"], "$response.body#/id");

    let response = spec
        .paths
        .get("/2.0/users/{username}")
        .and_then(|item| item.operation(HttpMethod::Get))
        .and_then(|op| op.responses.get("200"))
        .and_then(ReferenceOr::as_item)
        .expect("inline 200 response");
    let link = response.links.get("userRepositories").expect("link slot");
    assert_eq!(
        link.as_reference().map(|r| r.reference.as_str()),
        Some("#/components/links/UserRepositories")
    );
}

#[test]
fn parse_webhooks_without_paths() {
    let doc = parse::from_yaml(WEBHOOK).expect("should parse webhooks");
    assert_eq!(doc.version(), SpecVersion::V31 { patch: 0 });
    assert!(doc.operations().is_empty());
    assert_eq!(doc.webhook_count(), 1);
    assert_eq!(doc.schema_kinds().get("untyped"), Some(&1));

    let Document::V31(spec) = &doc else {
        panic!("expected a 3.1 document");
    };
    assert!(spec.paths.is_none());
    let (name, method, _) = spec
        .webhook_operations()
        .next()
        .expect("one webhook operation");
    assert_eq!((name, method), ("newPet", HttpMethod::Post));
}

#[test]
fn parse_non_oauth_scopes() {
    let doc = parse::from_yaml(NON_OAUTH_SCOPES).expect("should parse");
    let Document::V31(spec) = &doc else {
        panic!("expected a 3.1 document");
    };

    let (_, _, op) = spec.operations().next().expect("one operation");
    assert!(op.responses.is_empty());
    let requirement = &op.security.as_ref().expect("security")[0];
    assert_eq!(requirement["bearerAuth"], ["read:users", "public"]);

    let scheme = spec
        .components
        .as_ref()
        .and_then(|c| c.security_schemes.get("bearerAuth"))
        .and_then(ReferenceOr::as_item)
        .expect("inline scheme");
    assert!(matches!(scheme, SecurityScheme::Http(http) if http.scheme == "bearer"));
}

#[test]
fn parse_swagger_petstore() {
    let doc = parse::from_yaml(SWAGGER_PETSTORE).expect("should parse swagger");
    assert_eq!(doc.version(), SpecVersion::Swagger2);
    assert_eq!(doc.title(), "Swagger Petstore");
    assert_eq!(doc.operations().len(), 3);
    assert_eq!(
        doc.component_counts(),
        [("definitions", 3), ("securityDefinitions", 2)]
    );
    assert_eq!(doc.schema_kinds().get("array"), Some(&1));

    let Document::Swagger2(spec) = &doc else {
        panic!("expected a 2.0 document");
    };
    assert_eq!(spec.host.as_deref(), Some("petstore.example.com"));
    assert_eq!(spec.base_path.as_deref(), Some("/v1"));

    let (_, _, create) = spec
        .operations()
        .find(|(_, method, _)| *method == HttpMethod::Post)
        .expect("createPets");
    let body = create.parameters[0].as_item().expect("inline body");
    assert!(matches!(body, swagger::Parameter::Body(_)));
    assert_eq!(body.location(), swagger::ParameterLocation::Body);
}

#[test]
fn parse_json_input() {
    let json = r#"{
        "openapi": "3.0.2",
        "info": { "title": "Json", "version": "0.1" },
        "paths": {}
    }"#;
    let doc = parse::from_json(json).expect("should parse json");
    assert_eq!(doc.version(), SpecVersion::V30 { patch: 2 });
    assert!(doc.operations().is_empty());
    assert!(doc.component_counts().is_empty());
}

#[test]
fn parse_invalid_version() {
    let yaml = r#"
openapi: "2.0.0"
info:
  title: Test
  version: "1.0"
paths: {}
"#;
    assert!(parse::from_yaml(yaml).is_err());
}

#[test]
fn parse_from_path_picks_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spec.json");
    std::fs::write(&path, r#"{"swagger":"2.0","info":{"title":"T","version":"1"},"paths":{}}"#)
        .unwrap();

    let doc = parse::from_path(&path).expect("should parse from disk");
    assert_eq!(doc.version(), SpecVersion::Swagger2);

    let missing = parse::from_path(&dir.path().join("missing.yaml"));
    assert!(missing.is_err());
}

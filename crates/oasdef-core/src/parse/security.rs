use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::common::{Extensions, extensions};

/// Location of an API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    Query,
    Header,
    Cookie,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKeyScheme {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ApiKeyLocation,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpScheme {
    /// RFC 7235 scheme name, e.g. `basic` or `bearer`.
    pub scheme: String,

    #[serde(rename = "bearerFormat", skip_serializing_if = "Option::is_none")]
    pub bearer_format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuth2Scheme {
    pub flows: OAuthFlows,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenIdConnectScheme {
    #[serde(rename = "openIdConnectUrl")]
    pub open_id_connect_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutualTlsScheme {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

/// A security scheme definition, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SecurityScheme {
    #[serde(rename = "apiKey")]
    ApiKey(ApiKeyScheme),
    #[serde(rename = "http")]
    Http(HttpScheme),
    #[serde(rename = "oauth2")]
    OAuth2(OAuth2Scheme),
    #[serde(rename = "openIdConnect")]
    OpenIdConnect(OpenIdConnectScheme),
    /// OpenAPI 3.1 only.
    #[serde(rename = "mutualTLS")]
    MutualTls(MutualTlsScheme),
}

impl SecurityScheme {
    pub fn type_name(&self) -> &'static str {
        match self {
            SecurityScheme::ApiKey(_) => "apiKey",
            SecurityScheme::Http(_) => "http",
            SecurityScheme::OAuth2(_) => "oauth2",
            SecurityScheme::OpenIdConnect(_) => "openIdConnect",
            SecurityScheme::MutualTls(_) => "mutualTLS",
        }
    }

    /// Whether requirements on this scheme may list scopes under OpenAPI 3.0.
    pub fn uses_scopes(&self) -> bool {
        matches!(
            self,
            SecurityScheme::OAuth2(_) | SecurityScheme::OpenIdConnect(_)
        )
    }
}

/// Scopes offered by a flow: scope name to description.
pub type Scopes = IndexMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplicitFlow {
    #[serde(rename = "authorizationUrl")]
    pub authorization_url: String,
    #[serde(rename = "refreshUrl", skip_serializing_if = "Option::is_none")]
    pub refresh_url: Option<String>,
    pub scopes: Scopes,
    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordFlow {
    #[serde(rename = "tokenUrl")]
    pub token_url: String,
    #[serde(rename = "refreshUrl", skip_serializing_if = "Option::is_none")]
    pub refresh_url: Option<String>,
    pub scopes: Scopes,
    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientCredentialsFlow {
    #[serde(rename = "tokenUrl")]
    pub token_url: String,
    #[serde(rename = "refreshUrl", skip_serializing_if = "Option::is_none")]
    pub refresh_url: Option<String>,
    pub scopes: Scopes,
    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationCodeFlow {
    #[serde(rename = "authorizationUrl")]
    pub authorization_url: String,
    #[serde(rename = "tokenUrl")]
    pub token_url: String,
    #[serde(rename = "refreshUrl", skip_serializing_if = "Option::is_none")]
    pub refresh_url: Option<String>,
    pub scopes: Scopes,
    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

/// OAuth2 flows configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OAuthFlows {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implicit: Option<ImplicitFlow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<PasswordFlow>,
    #[serde(rename = "clientCredentials", skip_serializing_if = "Option::is_none")]
    pub client_credentials: Option<ClientCredentialsFlow>,
    #[serde(rename = "authorizationCode", skip_serializing_if = "Option::is_none")]
    pub authorization_code: Option<AuthorizationCodeFlow>,
    #[serde(flatten, with = "extensions")]
    pub extensions: Extensions,
}

impl OAuthFlows {
    /// Every scope name declared by any flow.
    pub fn scope_names(&self) -> impl Iterator<Item = &str> + '_ {
        let implicit = self.implicit.iter().flat_map(|f| f.scopes.keys());
        let password = self.password.iter().flat_map(|f| f.scopes.keys());
        let client = self.client_credentials.iter().flat_map(|f| f.scopes.keys());
        let code = self.authorization_code.iter().flat_map(|f| f.scopes.keys());
        implicit
            .chain(password)
            .chain(client)
            .chain(code)
            .map(String::as_str)
    }
}

/// A security requirement: map of scheme name → required scopes.
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

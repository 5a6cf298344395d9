//! Secret vault HTTP client

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

/// Environment variable carrying the workspace base URL
pub const WORKSPACE_HOST_VAR: &str = "WORKSPACE_HOST";

/// Environment variable carrying the workspace API token
pub const WORKSPACE_TOKEN_VAR: &str = "WORKSPACE_TOKEN";

/// Client for the platform secret vault
#[derive(Debug, Clone)]
pub struct VaultClient {
    /// Workspace base URL, no trailing slash
    base_url: String,
    /// API token sent as a bearer credential
    token: String,
    /// HTTP client
    http: Client,
}

/// Wire shape of a vault secret response
#[derive(Debug, Deserialize)]
struct SecretResponse {
    /// Base64-encoded secret payload
    value: String,
}

/// The well-known credential keys of a secret scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeCredentials {
    /// Full connection string stored in the scope
    pub connection_string: String,
    /// Username stored in the scope
    pub user_name: String,
    /// Password stored in the scope
    pub password: String,
}

impl ScopeCredentials {
    /// JSON view for template interpolation
    pub fn as_json(&self) -> Value {
        serde_json::json!({
            "connection_string": self.connection_string,
            "user_name": self.user_name,
            "password": self.password,
        })
    }
}

impl VaultClient {
    /// Create a client for the vault at `base_url`
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            http: Client::new(),
        }
    }

    /// Create a client from the workspace environment
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(WORKSPACE_HOST_VAR)
            .map_err(|_| Error::config(format!("{WORKSPACE_HOST_VAR} is not set")))?;
        let token = std::env::var(WORKSPACE_TOKEN_VAR)
            .map_err(|_| Error::config(format!("{WORKSPACE_TOKEN_VAR} is not set")))?;
        Ok(Self::new(base_url, token))
    }

    /// Fetch one secret from a scope and decode its payload
    pub async fn get_secret(&self, scope: &str, key: &str) -> Result<String> {
        let url = format!("{}/api/2.0/secrets/get", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("scope", scope), ("key", key)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        let payload: SecretResponse = response
            .json()
            .await
            .map_err(|e| Error::secret(scope, key, format!("invalid response: {e}")))?;

        let bytes = BASE64
            .decode(payload.value.as_bytes())
            .map_err(|e| Error::secret(scope, key, format!("payload is not valid base64: {e}")))?;

        String::from_utf8(bytes)
            .map_err(|_| Error::secret(scope, key, "payload is not valid UTF-8"))
    }

    /// Fetch the well-known credential keys of a scope
    pub async fn get_scope_credentials(&self, scope: &str) -> Result<ScopeCredentials> {
        let connection_string = self.get_secret(scope, "connection_string").await?;
        let user_name = self.get_secret(scope, "user_name").await?;
        let password = self.get_secret(scope, "password").await?;

        Ok(ScopeCredentials {
            connection_string,
            user_name,
            password,
        })
    }
}

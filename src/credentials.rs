//! Database credential resolution
//!
//! Local platforms read the username and password straight from the sink's
//! connection configuration; managed workspaces fetch them from the
//! connection's named secret scope.

use crate::config::{ConnectionConfig, Platform};
use crate::error::{Error, Result};
use crate::secrets::VaultClient;
use serde_json::Value;

/// Username and password for a relational connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbCredentials {
    /// Username
    pub user: String,
    /// Password
    pub password: String,
}

impl DbCredentials {
    /// JSON view for template interpolation, under the same key names the
    /// secret scope uses
    pub fn as_json(&self) -> Value {
        serde_json::json!({
            "user_name": self.user,
            "password": self.password,
        })
    }
}

/// Resolve credentials for a relational connection on the given platform
pub async fn resolve(
    platform: Platform,
    connection: &ConnectionConfig,
    vault: Option<&VaultClient>,
) -> Result<DbCredentials> {
    match platform {
        Platform::Local => from_config(connection),
        Platform::Workspace => {
            let scope = connection
                .scope_name
                .as_deref()
                .ok_or_else(|| Error::missing_field("connection.scope_name"))?;
            let vault = vault.ok_or_else(|| {
                Error::credentials("no vault client available on the workspace platform")
            })?;
            from_scope(vault, scope).await
        }
    }
}

/// Read credentials from the connection configuration
fn from_config(connection: &ConnectionConfig) -> Result<DbCredentials> {
    let user = connection
        .user
        .clone()
        .ok_or_else(|| Error::missing_field("connection.user"))?;
    let password = connection
        .password
        .clone()
        .ok_or_else(|| Error::missing_field("connection.password"))?;
    Ok(DbCredentials { user, password })
}

/// Fetch credentials from a secret scope
async fn from_scope(vault: &VaultClient, scope: &str) -> Result<DbCredentials> {
    let user = vault.get_secret(scope, "user_name").await?;
    let password = vault.get_secret(scope, "password").await?;
    Ok(DbCredentials { user, password })
}

//! Secret vault access
//!
//! HTTP client for the managed platform's secret vault. Secrets live in
//! named scopes; the vault returns payloads base64-encoded.

mod vault;

pub use vault::{ScopeCredentials, VaultClient, WORKSPACE_HOST_VAR, WORKSPACE_TOKEN_VAR};

#[cfg(test)]
mod tests;

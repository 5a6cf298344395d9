//! Feature-repository sink
//!
//! HTTP client for the managed platform's feature registry. Creates the
//! feature table when it does not exist yet, then writes rows serialized
//! from the Arrow batches.

use crate::config::FeatureStoreSinkConfig;
use crate::error::{Error, Result};
use crate::secrets::{WORKSPACE_HOST_VAR, WORKSPACE_TOKEN_VAR};
use crate::types::{ResultTable, WriteMode};
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};

/// Writer for feature-repository destinations
pub struct FeatureStoreWriter {
    /// Sink configuration
    config: FeatureStoreSinkConfig,
    /// Registry base URL, no trailing slash
    base_url: String,
    /// API token, when the environment provides one
    token: Option<String>,
    /// HTTP client
    http: Client,
}

impl FeatureStoreWriter {
    /// Create a writer for the configured registry.
    ///
    /// The endpoint comes from the sink config, falling back to the
    /// `WORKSPACE_HOST` environment variable.
    pub fn new(config: FeatureStoreSinkConfig) -> Result<Self> {
        let base_url = config
            .endpoint
            .clone()
            .or_else(|| std::env::var(WORKSPACE_HOST_VAR).ok())
            .ok_or_else(|| Error::missing_field(format!("{}.endpoint", config.name)))?;

        // Fail at construction rather than on the first request
        url::Url::parse(&base_url)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: std::env::var(WORKSPACE_TOKEN_VAR).ok(),
            http: Client::new(),
            config,
        })
    }

    /// Build a POST request with bearer auth when a token is available
    fn post(&self, url: &str) -> RequestBuilder {
        let req = self.http.post(url);
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Register the feature table; an already-registered table is not an
    /// error
    pub async fn ensure_table(&self) -> Result<()> {
        let url = format!("{}/api/2.0/feature-tables/create", self.base_url);
        let body = json!({
            "name": self.config.table,
            "primary_keys": self.config.primary_keys,
            "description": self.config.description,
        });

        let response = self.post(&url).json(&body).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        if status.as_u16() == 409 || text.contains("RESOURCE_ALREADY_EXISTS") {
            tracing::debug!(table = %self.config.table, "feature table already registered");
            return Ok(());
        }

        Err(Error::http_status(status.as_u16(), text))
    }

    /// Write the result table to the registry, returning the feature table
    /// name and the number of rows written
    pub async fn write(&self, table: &ResultTable) -> Result<(String, usize)> {
        self.ensure_table().await?;

        let rows = rows_as_json(table)?;
        let row_count = rows.len();

        let mode = match self.config.mode {
            WriteMode::Overwrite => "overwrite",
            WriteMode::Append | WriteMode::ErrorIfExists => "merge",
        };

        let url = format!("{}/api/2.0/feature-tables/write", self.base_url);
        let body = json!({
            "name": self.config.table,
            "mode": mode,
            "rows": rows,
        });

        let response = self.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), text));
        }

        Ok((self.config.table.clone(), row_count))
    }
}

/// Serialize all batches of a table as JSON records
fn rows_as_json(table: &ResultTable) -> Result<Vec<Value>> {
    let mut writer = arrow::json::ArrayWriter::new(Vec::new());
    let batches: Vec<_> = table.batches().iter().collect();
    writer.write_batches(&batches)?;
    writer.finish()?;

    let buf = writer.into_inner();
    if buf.is_empty() {
        return Ok(Vec::new());
    }
    let rows: Vec<Value> = serde_json::from_slice(&buf)
        .map_err(|e| Error::feature_store(format!("Failed to serialize rows: {e}")))?;
    Ok(rows)
}

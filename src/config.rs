//! Configuration types for sink routing
//!
//! This module contains the configuration structures used to declare
//! output destinations in YAML format.

use crate::error::{Error, Result};
use crate::types::WriteMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// Platform
// ============================================================================

/// Where the code is running: a local/test context or a managed workspace job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Local or test execution
    #[default]
    Local,
    /// Managed workspace job
    Workspace,
}

impl Platform {
    /// Detect the platform from the engine session id.
    ///
    /// Local engine sessions carry "local" in their id; anything else is
    /// treated as a managed workspace session.
    pub fn detect(session_id: &str) -> Self {
        if session_id.contains("local") {
            Self::Local
        } else {
            Self::Workspace
        }
    }
}

// ============================================================================
// Top-Level Router Config
// ============================================================================

/// Complete routing configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Platform the job runs on
    #[serde(default)]
    pub platform: Platform,

    /// Configured output destinations, processed in order
    #[serde(default)]
    pub data_sinks: Vec<SinkConfig>,
}

impl RouterConfig {
    /// Load a routing configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!("Failed to read config '{}': {e}", path.display()))
            }
        })?;
        Self::from_str(&content)
    }

    /// Parse a routing configuration from a YAML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints that serde cannot express
    pub fn validate(&self) -> Result<()> {
        for sink in &self.data_sinks {
            if sink.name().is_empty() {
                return Err(Error::missing_field("data_sinks[].name"));
            }
            if let SinkConfig::Relational(cfg) = sink {
                if cfg.table.is_empty() {
                    return Err(Error::missing_field(format!("{}.table", cfg.name)));
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Sink Config
// ============================================================================

/// A configured output destination, dispatched on its declared type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SinkConfig {
    /// Relational database destination
    Relational(RelationalSinkConfig),
    /// File/object-store destination
    File(FileSinkConfig),
    /// Managed feature-repository destination
    FeatureStore(FeatureStoreSinkConfig),
}

impl SinkConfig {
    /// Sink name
    pub fn name(&self) -> &str {
        match self {
            Self::Relational(c) => &c.name,
            Self::File(c) => &c.name,
            Self::FeatureStore(c) => &c.name,
        }
    }

    /// Name of the result table this sink consumes: the explicit `input_id`
    /// when set, the sink name otherwise.
    pub fn input_key(&self) -> &str {
        let input_id = match self {
            Self::Relational(c) => c.input_id.as_deref(),
            Self::File(c) => c.input_id.as_deref(),
            Self::FeatureStore(c) => c.input_id.as_deref(),
        };
        input_id.unwrap_or_else(|| self.name())
    }
}

// ============================================================================
// Relational Sink
// ============================================================================

/// Target database kind for the relational sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseKind {
    /// PostgreSQL over the wire
    #[default]
    Postgres,
    /// MySQL over the wire
    Mysql,
    /// DuckDB database file (used in tests and local runs)
    Duckdb,
}

/// Relational database destination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationalSinkConfig {
    /// Unique sink name
    pub name: String,

    /// Result table to write (defaults to the sink name)
    #[serde(default)]
    pub input_id: Option<String>,

    /// Target database kind
    #[serde(default)]
    pub db_type: DatabaseKind,

    /// Destination table, optionally schema-qualified ("schema.table")
    pub table: String,

    /// Write mode
    #[serde(default)]
    pub mode: WriteMode,

    /// Connection settings
    #[serde(default)]
    pub connection: ConnectionConfig,
}

/// Connection settings for a relational destination.
///
/// Either a full `connection_string` (may contain `{{ ... }}` placeholders)
/// or individual components. Credentials come from `user`/`password` on a
/// local platform and from `scope_name` on a managed workspace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Full connection string; rendered through the template engine
    #[serde(default)]
    pub connection_string: Option<String>,

    /// Host name
    #[serde(default)]
    pub host: Option<String>,

    /// Port (defaults per database kind)
    #[serde(default)]
    pub port: Option<u16>,

    /// Database name (or file path for DuckDB)
    #[serde(default)]
    pub database: Option<String>,

    /// Username for local platforms
    #[serde(default)]
    pub user: Option<String>,

    /// Password for local platforms
    #[serde(default)]
    pub password: Option<String>,

    /// Secret scope holding credentials on managed workspaces
    #[serde(default)]
    pub scope_name: Option<String>,
}

// ============================================================================
// File Sink
// ============================================================================

/// Encoding for file destinations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    /// Parquet with Snappy compression
    #[default]
    Parquet,
    /// JSON array of records
    Json,
}

impl FileFormat {
    /// File extension used in output paths
    pub fn extension(self) -> &'static str {
        match self {
            Self::Parquet => "parquet",
            Self::Json => "json",
        }
    }
}

/// File/object-store destination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSinkConfig {
    /// Unique sink name
    pub name: String,

    /// Result table to write (defaults to the sink name)
    #[serde(default)]
    pub input_id: Option<String>,

    /// Destination URL: `s3://bucket/path`, `gs://bucket/path`,
    /// `az://container/path`, or a local directory
    pub location: String,

    /// Output encoding
    #[serde(default)]
    pub format: FileFormat,

    /// Write under a Hive-style `dt=YYYY-MM-DD` partition directory
    #[serde(default = "default_true")]
    pub partitioned: bool,
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Feature Store Sink
// ============================================================================

/// Managed feature-repository destination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureStoreSinkConfig {
    /// Unique sink name
    pub name: String,

    /// Result table to write (defaults to the sink name)
    #[serde(default)]
    pub input_id: Option<String>,

    /// Feature table name in the registry
    pub table: String,

    /// Primary key columns of the feature table
    #[serde(default)]
    pub primary_keys: Vec<String>,

    /// Description used when the table is created
    #[serde(default)]
    pub description: Option<String>,

    /// Registry base URL; falls back to the `WORKSPACE_HOST` environment
    /// variable when unset
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Write mode
    #[serde(default)]
    pub mode: WriteMode,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_parse_minimal_config() {
        let yaml = r"
platform: local
data_sinks: []
";
        let config = RouterConfig::from_str(yaml).unwrap();
        assert_eq!(config.platform, Platform::Local);
        assert!(config.data_sinks.is_empty());
    }

    #[test]
    fn test_parse_relational_sink() {
        let yaml = r"
platform: workspace
data_sinks:
  - type: relational
    name: orders_db
    db_type: postgres
    table: analytics.orders
    mode: overwrite
    connection:
      host: db.internal
      port: 5432
      database: warehouse
      scope_name: prod-warehouse
";
        let config = RouterConfig::from_str(yaml).unwrap();
        assert_eq!(config.platform, Platform::Workspace);
        assert_eq!(config.data_sinks.len(), 1);

        match &config.data_sinks[0] {
            SinkConfig::Relational(cfg) => {
                assert_eq!(cfg.name, "orders_db");
                assert_eq!(cfg.db_type, DatabaseKind::Postgres);
                assert_eq!(cfg.table, "analytics.orders");
                assert_eq!(cfg.mode, WriteMode::Overwrite);
                assert_eq!(cfg.connection.scope_name.as_deref(), Some("prod-warehouse"));
            }
            other => panic!("Expected relational sink, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_file_sink_defaults() {
        let yaml = r"
data_sinks:
  - type: file
    name: orders_export
    location: s3://exports/orders
";
        let config = RouterConfig::from_str(yaml).unwrap();
        match &config.data_sinks[0] {
            SinkConfig::File(cfg) => {
                assert_eq!(cfg.format, FileFormat::Parquet);
                assert!(cfg.partitioned);
            }
            other => panic!("Expected file sink, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_feature_store_sink() {
        let yaml = r"
data_sinks:
  - type: feature_store
    name: user_features
    input_id: users_enriched
    table: features.users
    primary_keys: [user_id]
";
        let config = RouterConfig::from_str(yaml).unwrap();
        let sink = &config.data_sinks[0];
        assert_eq!(sink.name(), "user_features");
        assert_eq!(sink.input_key(), "users_enriched");
    }

    #[test]
    fn test_input_key_falls_back_to_name() {
        let yaml = r"
data_sinks:
  - type: file
    name: orders
    location: /tmp/out
";
        let config = RouterConfig::from_str(yaml).unwrap();
        assert_eq!(config.data_sinks[0].input_key(), "orders");
    }

    #[test]
    fn test_unknown_sink_type_rejected() {
        let yaml = r"
data_sinks:
  - type: message_queue
    name: orders
";
        assert!(RouterConfig::from_str(yaml).is_err());
    }

    #[test]
    fn test_relational_requires_table() {
        let yaml = r"
data_sinks:
  - type: relational
    name: orders_db
    table: ''
";
        let err = RouterConfig::from_str(yaml).unwrap_err();
        assert!(err.to_string().contains("orders_db.table"));
    }

    #[test_case("local-1715352034825", Platform::Local ; "local session")]
    #[test_case("app-20240510-0042", Platform::Workspace ; "workspace session")]
    fn test_platform_detect(session_id: &str, expected: Platform) {
        assert_eq!(Platform::detect(session_id), expected);
    }
}

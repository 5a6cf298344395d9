//! Output routing
//!
//! Single-pass dispatch of computed result tables to their configured sinks.
//! The router iterates the configured sinks once, in order; it introduces no
//! retries, queuing, or parallelism of its own.

use crate::config::{RouterConfig, SinkConfig};
use crate::context::JobContext;
use crate::credentials;
use crate::error::Result;
use crate::lineage::{self, LineageReport};
use crate::secrets::VaultClient;
use crate::sink::{FeatureStoreWriter, FileSinkWriter, RelationalWriter};
use crate::types::{ResultSet, ResultTable};
use serde::Serialize;

/// Outcome of routing one result table to one sink
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SinkOutcome {
    /// The sink was written
    Written {
        /// Destination the rows landed in (path, table, or connection info)
        destination: String,
        /// Rows written
        rows: usize,
        /// Lineage recovered from the result's plan text, when available
        #[serde(skip_serializing_if = "Option::is_none")]
        lineage: Option<LineageReport>,
    },
    /// The sink was skipped
    Skipped {
        /// Why the sink was skipped
        reason: String,
    },
}

/// Per-sink routing report
#[derive(Debug, Clone, Serialize)]
pub struct SinkReport {
    /// Sink name
    pub sink: String,
    /// What happened
    #[serde(flatten)]
    pub outcome: SinkOutcome,
}

/// Routes result tables to their configured sinks
pub struct OutputRouter {
    /// Routing configuration
    config: RouterConfig,
    /// Resolved job context
    job: JobContext,
    /// Vault client for workspace credential resolution
    vault: Option<VaultClient>,
}

impl OutputRouter {
    /// Create a router for the given configuration.
    ///
    /// Resolves the job context up front; on a workspace platform a vault
    /// client is built from the environment.
    pub fn new(config: RouterConfig) -> Result<Self> {
        let job = JobContext::resolve(config.platform)?;
        let vault = match config.platform {
            crate::config::Platform::Workspace => Some(VaultClient::from_env()?),
            crate::config::Platform::Local => None,
        };
        Ok(Self { config, job, vault })
    }

    /// Create a router with an explicit vault client, skipping environment
    /// resolution (used by callers that manage tokens themselves)
    pub fn new_with_vault(config: RouterConfig, vault: VaultClient) -> Result<Self> {
        let job = JobContext::resolve(config.platform)?;
        Ok(Self {
            config,
            job,
            vault: Some(vault),
        })
    }

    /// The resolved job context
    pub fn job(&self) -> &JobContext {
        &self.job
    }

    /// Route every result table to its sinks.
    ///
    /// Sinks are processed in configuration order. A sink whose input table
    /// is absent is skipped with a warning; a sink whose write fails aborts
    /// the pass.
    pub async fn write_to_sinks(&self, results: &ResultSet) -> Result<Vec<SinkReport>> {
        let mut reports = Vec::with_capacity(self.config.data_sinks.len());

        for sink in &self.config.data_sinks {
            let input = sink.input_key();
            let Some(table) = results.get(input) else {
                tracing::warn!(
                    sink = sink.name(),
                    input,
                    "no result table for sink, skipping"
                );
                reports.push(SinkReport {
                    sink: sink.name().to_string(),
                    outcome: SinkOutcome::Skipped {
                        reason: format!("no result table named '{input}'"),
                    },
                });
                continue;
            };

            let report = match sink {
                SinkConfig::Relational(cfg) => self.write_relational(cfg, table).await?,
                SinkConfig::File(cfg) => self.write_file(cfg, input, table).await?,
                SinkConfig::FeatureStore(cfg) => self.write_feature_store(cfg, table).await?,
            };
            reports.push(report);
        }

        Ok(reports)
    }

    /// Write one table to a relational sink, extracting lineage first
    async fn write_relational(
        &self,
        cfg: &crate::config::RelationalSinkConfig,
        table: &ResultTable,
    ) -> Result<SinkReport> {
        let lineage = table.plan().map(lineage::parse_plan);
        match &lineage {
            Some(report) => {
                tracing::info!(
                    sink = %cfg.name,
                    lineage = %serde_json::to_string(report)?,
                    "extracted lineage"
                );
            }
            None => tracing::debug!(sink = %cfg.name, "result carries no plan text"),
        }

        let creds =
            credentials::resolve(self.config.platform, &cfg.connection, self.vault.as_ref())
                .await?;

        let writer = RelationalWriter::connect(cfg, &creds, &self.job)?;
        let rows = writer.write(table, &cfg.table, cfg.mode)?;

        let destination = format!("{}/{}", writer.connection_info(), cfg.table);
        tracing::info!(sink = %cfg.name, %destination, rows, "wrote relational sink");

        Ok(SinkReport {
            sink: cfg.name.clone(),
            outcome: SinkOutcome::Written {
                destination,
                rows,
                lineage,
            },
        })
    }

    /// Write one table to a file sink
    async fn write_file(
        &self,
        cfg: &crate::config::FileSinkConfig,
        input: &str,
        table: &ResultTable,
    ) -> Result<SinkReport> {
        let writer = FileSinkWriter::new(cfg.clone())?;
        let (destination, rows) = writer.write(input, table).await?;

        tracing::info!(sink = %cfg.name, %destination, rows, "wrote file sink");

        Ok(SinkReport {
            sink: cfg.name.clone(),
            outcome: SinkOutcome::Written {
                destination,
                rows,
                lineage: None,
            },
        })
    }

    /// Write one table to a feature-repository sink
    async fn write_feature_store(
        &self,
        cfg: &crate::config::FeatureStoreSinkConfig,
        table: &ResultTable,
    ) -> Result<SinkReport> {
        let writer = FeatureStoreWriter::new(cfg.clone())?;
        let (feature_table, rows) = writer.write(table).await?;

        tracing::info!(sink = %cfg.name, table = %feature_table, rows, "wrote feature store sink");

        Ok(SinkReport {
            sink: cfg.name.clone(),
            outcome: SinkOutcome::Written {
                destination: feature_table,
                rows,
                lineage: None,
            },
        })
    }
}

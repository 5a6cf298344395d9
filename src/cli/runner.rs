//! CLI runner - executes commands

use crate::cli::{Cli, Commands};
use crate::config::{Platform, RouterConfig};
use crate::context::JobContext;
use crate::error::{Error, Result};
use crate::lineage;
use crate::router::OutputRouter;
use crate::types::{ResultSet, ResultTable};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Executes CLI commands
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a runner for the parsed arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the selected command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Route { inputs, plans } => self.run_route(inputs, plans).await,
            Commands::Lineage { plan_file, pretty } => self.run_lineage(plan_file, *pretty),
            Commands::Validate => self.run_validate(),
            Commands::Context { session_id } => self.run_context(session_id.as_deref()),
        }
    }

    /// Path of the routing configuration, required by most commands
    fn config_path(&self) -> Result<&Path> {
        self.cli
            .config
            .as_deref()
            .ok_or_else(|| Error::config("--config is required for this command"))
    }

    /// `route`: load inputs, attach plan texts, run the router
    async fn run_route(&self, inputs: &[String], plans: &[String]) -> Result<()> {
        let config = RouterConfig::load(self.config_path()?)?;

        let mut plan_paths: HashMap<String, String> = HashMap::new();
        for pair in plans {
            let (name, path) = split_pair(pair)?;
            plan_paths.insert(name, path);
        }

        let mut results = ResultSet::new();
        for pair in inputs {
            let (name, path) = split_pair(pair)?;
            let mut table = read_parquet_table(&path)?;
            if let Some(plan_path) = plan_paths.get(&name) {
                let text = std::fs::read_to_string(plan_path).map_err(|e| {
                    Error::config(format!("Failed to read plan file '{plan_path}': {e}"))
                })?;
                table = table.with_plan(text);
            }
            tracing::debug!(table = %name, rows = table.num_rows(), "loaded result table");
            results.insert(name, table);
        }

        let router = OutputRouter::new(config)?;
        let reports = router.write_to_sinks(&results).await?;

        println!("{}", serde_json::to_string_pretty(&reports)?);
        Ok(())
    }

    /// `lineage`: scrape one plan file and print the report
    fn run_lineage(&self, plan_file: &Path, pretty: bool) -> Result<()> {
        let text = std::fs::read_to_string(plan_file).map_err(|e| {
            Error::config(format!(
                "Failed to read plan file '{}': {e}",
                plan_file.display()
            ))
        })?;

        let report = lineage::parse_plan(&text);
        let output = if pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        println!("{output}");
        Ok(())
    }

    /// `validate`: parse the configuration and report sink count
    fn run_validate(&self) -> Result<()> {
        let config = RouterConfig::load(self.config_path()?)?;
        println!(
            "Configuration OK: {} sink(s), platform {:?}",
            config.data_sinks.len(),
            config.platform
        );
        Ok(())
    }

    /// `context`: resolve and print the job context
    fn run_context(&self, session_id: Option<&str>) -> Result<()> {
        let platform = match session_id {
            Some(id) => Platform::detect(id),
            None => match &self.cli.config {
                Some(path) => RouterConfig::load(path)?.platform,
                None => Platform::Local,
            },
        };

        let context = JobContext::resolve(platform)?;
        println!("{}", serde_json::to_string_pretty(&context.as_json())?);
        Ok(())
    }
}

/// Split a NAME=PATH argument
fn split_pair(pair: &str) -> Result<(String, String)> {
    match pair.split_once('=') {
        Some((name, path)) if !name.is_empty() && !path.is_empty() => {
            Ok((name.to_string(), path.to_string()))
        }
        _ => Err(Error::config(format!(
            "Expected NAME=PATH, got '{pair}'"
        ))),
    }
}

/// Load a Parquet file as a result table
fn read_parquet_table(path: &str) -> Result<ResultTable> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.to_string(),
            }
        } else {
            Error::config(format!("Failed to open '{path}': {e}"))
        }
    })?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let reader = builder.build()?;
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(ResultTable::with_schema(schema, batches))
}

//! File/object-store sink
//!
//! Encodes result tables as Parquet or JSON and writes them to S3, GCS,
//! Azure, or the local filesystem.

use crate::config::{FileFormat, FileSinkConfig};
use crate::error::{Error, Result};
use crate::types::ResultTable;
use bytes::Bytes;
use chrono::Utc;
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::sync::Arc;

/// Build a Hive-style partitioned path for output files
///
/// Format: `{table}/dt={YYYY-MM-DD}/data.{ext}`
pub fn build_partitioned_path(table_name: &str, extension: &str) -> String {
    let date = Utc::now().format("%Y-%m-%d");
    // Dots in table names would nest directories on some stores
    let sanitized = table_name.replace('.', "_");
    format!("{sanitized}/dt={date}/data.{extension}")
}

/// Object-store destination parsed from a URL
#[derive(Debug, Clone)]
pub struct FileDestination {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Base path prefix within the bucket/container
    prefix: String,
    /// Original URL scheme for logging
    scheme: String,
}

impl FileDestination {
    /// Parse a destination URL and create the matching object store
    ///
    /// Supported formats:
    /// - `s3://bucket/path/` - AWS S3
    /// - `gs://bucket/path/` - Google Cloud Storage
    /// - `az://container/path/` - Azure Blob Storage
    /// - `/local/path/` or `./path/` - Local filesystem
    pub fn parse(url: &str) -> Result<Self> {
        if url.starts_with("s3://") {
            Self::parse_s3(url)
        } else if url.starts_with("gs://") {
            Self::parse_gcs(url)
        } else if url.starts_with("az://") {
            Self::parse_azure(url)
        } else {
            Self::parse_local(url)
        }
    }

    /// Parse an S3 URL
    fn parse_s3(url: &str) -> Result<Self> {
        let without_scheme = url
            .strip_prefix("s3://")
            .ok_or_else(|| Error::config(format!("Invalid s3 URL: {url}")))?;
        let (bucket, prefix) = split_bucket(without_scheme);

        let store = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::config(format!("Failed to create s3 client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            scheme: "s3".to_string(),
        })
    }

    /// Parse a GCS URL
    fn parse_gcs(url: &str) -> Result<Self> {
        let without_scheme = url
            .strip_prefix("gs://")
            .ok_or_else(|| Error::config(format!("Invalid GCS URL: {url}")))?;
        let (bucket, prefix) = split_bucket(without_scheme);

        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::config(format!("Failed to create GCS client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            scheme: "gs".to_string(),
        })
    }

    /// Parse an Azure Blob URL
    fn parse_azure(url: &str) -> Result<Self> {
        let without_scheme = url
            .strip_prefix("az://")
            .ok_or_else(|| Error::config(format!("Invalid Azure URL: {url}")))?;
        let (container, prefix) = split_bucket(without_scheme);

        let store = MicrosoftAzureBuilder::from_env()
            .with_container_name(container)
            .build()
            .map_err(|e| Error::config(format!("Failed to create Azure client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            scheme: "az".to_string(),
        })
    }

    /// Parse a local filesystem path
    fn parse_local(path: &str) -> Result<Self> {
        let path = path.strip_prefix("file://").unwrap_or(path);

        std::fs::create_dir_all(path)
            .map_err(|e| Error::config(format!("Failed to create directory {path}: {e}")))?;

        let store = LocalFileSystem::new_with_prefix(path)
            .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: String::new(),
            scheme: "file".to_string(),
        })
    }

    /// Check if this is a cloud destination (not local)
    pub fn is_cloud(&self) -> bool {
        self.scheme != "file"
    }

    /// Get the scheme (s3, gs, az, file)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Write bytes to a file in the destination, returning the full path
    pub async fn write(&self, filename: &str, data: Bytes) -> Result<String> {
        let path = if self.prefix.is_empty() {
            ObjectPath::from(filename)
        } else {
            ObjectPath::from(format!("{}/{filename}", self.prefix.trim_end_matches('/')))
        };

        self.store
            .put(&path, data.into())
            .await
            .map_err(|e| Error::output(format!("Failed to write {path}: {e}")))?;

        Ok(format!("{}://{path}", self.scheme))
    }
}

/// Split `bucket/rest` into bucket and prefix
fn split_bucket(without_scheme: &str) -> (&str, String) {
    match without_scheme.find('/') {
        Some(idx) => (
            &without_scheme[..idx],
            without_scheme[idx + 1..].to_string(),
        ),
        None => (without_scheme, String::new()),
    }
}

// ============================================================================
// File Sink Writer
// ============================================================================

/// Writes a result table to a configured file destination
pub struct FileSinkWriter {
    config: FileSinkConfig,
    destination: FileDestination,
}

impl FileSinkWriter {
    /// Create a writer for the configured destination
    pub fn new(config: FileSinkConfig) -> Result<Self> {
        let destination = FileDestination::parse(&config.location)?;
        Ok(Self {
            config,
            destination,
        })
    }

    /// Encode and write the result table, returning the path written and the
    /// number of rows
    pub async fn write(&self, input_name: &str, table: &ResultTable) -> Result<(String, usize)> {
        let data = match self.config.format {
            FileFormat::Parquet => batches_to_parquet_bytes(table)?,
            FileFormat::Json => batches_to_json_bytes(table)?,
        };

        let filename = if self.config.partitioned {
            build_partitioned_path(input_name, self.config.format.extension())
        } else {
            format!("{input_name}.{}", self.config.format.extension())
        };

        let path = self.destination.write(&filename, data).await?;
        Ok((path, table.num_rows()))
    }
}

/// Encode all batches of a table as a Parquet buffer.
///
/// An empty table produces a schema-only file.
fn batches_to_parquet_bytes(table: &ResultTable) -> Result<Bytes> {
    let mut buf = Vec::new();
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    let mut writer = ArrowWriter::try_new(&mut buf, table.schema().clone(), Some(props))?;
    for batch in table.batches() {
        writer.write(batch)?;
    }
    writer.close()?;

    Ok(Bytes::from(buf))
}

/// Encode all batches of a table as a JSON array buffer
fn batches_to_json_bytes(table: &ResultTable) -> Result<Bytes> {
    let mut writer = arrow::json::ArrayWriter::new(Vec::new());
    let batches: Vec<_> = table.batches().iter().collect();
    writer.write_batches(&batches)?;
    writer.finish()?;
    Ok(Bytes::from(writer.into_inner()))
}

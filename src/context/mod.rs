//! Platform context resolution
//!
//! Detects whether code runs locally or inside a managed workspace job and
//! resolves the active job's organization id and job name.
//!
//! On a workspace, the platform publishes a context document (a JSON file
//! whose path is exported in `WORKSPACE_CONTEXT_FILE`). When the document is
//! missing or unparsable the resolver falls back to the ambient environment
//! variables the job launcher sets directly.

use crate::config::Platform;
use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::Value;

/// Environment variable pointing at the platform context document
pub const CONTEXT_FILE_VAR: &str = "WORKSPACE_CONTEXT_FILE";

/// Fallback environment variable for the organization id
pub const ORG_ID_VAR: &str = "WORKSPACE_ORG_ID";

/// Fallback environment variable for the job name
pub const JOB_NAME_VAR: &str = "WORKSPACE_JOB_NAME";

/// Identity of the running job
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobContext {
    /// Organization the job belongs to
    pub org_id: String,
    /// Name of the job
    pub job_name: String,
}

impl JobContext {
    /// Context used for local and test runs
    pub fn local() -> Self {
        Self {
            org_id: "local".to_string(),
            job_name: "local".to_string(),
        }
    }

    /// Resolve the job context for the given platform.
    ///
    /// Local platforms resolve without any I/O. Workspace platforms read the
    /// platform context document first and fall back to the environment.
    pub fn resolve(platform: Platform) -> Result<Self> {
        match platform {
            Platform::Local => Ok(Self::local()),
            Platform::Workspace => match Self::from_context_file() {
                Ok(ctx) => Ok(ctx),
                Err(err) => {
                    tracing::debug!("context document unavailable ({err}), trying environment");
                    Self::from_env()
                }
            },
        }
    }

    /// Read the context document named by `WORKSPACE_CONTEXT_FILE`
    fn from_context_file() -> Result<Self> {
        let path = std::env::var(CONTEXT_FILE_VAR)
            .map_err(|_| Error::context(format!("{CONTEXT_FILE_VAR} is not set")))?;
        let content = std::fs::read_to_string(&path)
            .map_err(|e| Error::context(format!("cannot read context document '{path}': {e}")))?;
        Self::from_context_document(&content)
    }

    /// Parse a platform context document.
    ///
    /// The document shape is `{"attributes": {"orgId": ..., "jobName": ...}}`;
    /// both identifiers may be strings or numbers.
    pub fn from_context_document(json: &str) -> Result<Self> {
        let doc: Value = serde_json::from_str(json)
            .map_err(|e| Error::context(format!("invalid context document: {e}")))?;

        let attributes = doc
            .get("attributes")
            .ok_or_else(|| Error::context("context document has no 'attributes' object"))?;

        let org_id = attribute_string(attributes, "orgId")
            .ok_or_else(|| Error::context("context document has no 'orgId' attribute"))?;
        let job_name = attribute_string(attributes, "jobName")
            .ok_or_else(|| Error::context("context document has no 'jobName' attribute"))?;

        Ok(Self { org_id, job_name })
    }

    /// Read the job identity directly from the environment
    fn from_env() -> Result<Self> {
        let org_id = std::env::var(ORG_ID_VAR)
            .map_err(|_| Error::context(format!("{ORG_ID_VAR} is not set")))?;
        let job_name = std::env::var(JOB_NAME_VAR)
            .map_err(|_| Error::context(format!("{JOB_NAME_VAR} is not set")))?;
        Ok(Self { org_id, job_name })
    }

    /// JSON view of the context for template interpolation
    pub fn as_json(&self) -> Value {
        serde_json::json!({
            "org_id": self.org_id,
            "job_name": self.job_name,
        })
    }
}

/// Fetch an attribute as a string, accepting string or numeric JSON values
fn attribute_string(attributes: &Value, key: &str) -> Option<String> {
    match attributes.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_local_platform_resolves_without_io() {
        let ctx = JobContext::resolve(Platform::Local).unwrap();
        assert_eq!(ctx.org_id, "local");
        assert_eq!(ctx.job_name, "local");
    }

    #[test]
    fn test_parse_context_document() {
        let doc = r#"{"attributes": {"orgId": "8323178732", "jobName": "nightly_orders"}}"#;
        let ctx = JobContext::from_context_document(doc).unwrap();
        assert_eq!(ctx.org_id, "8323178732");
        assert_eq!(ctx.job_name, "nightly_orders");
    }

    #[test]
    fn test_parse_context_document_numeric_org() {
        let doc = r#"{"attributes": {"orgId": 8323178732, "jobName": "nightly_orders"}}"#;
        let ctx = JobContext::from_context_document(doc).unwrap();
        assert_eq!(ctx.org_id, "8323178732");
    }

    #[test]
    fn test_parse_context_document_missing_attributes() {
        let err = JobContext::from_context_document(r"{}").unwrap_err();
        assert!(err.to_string().contains("attributes"));

        let err = JobContext::from_context_document(r#"{"attributes": {}}"#).unwrap_err();
        assert!(err.to_string().contains("orgId"));
    }

    #[test]
    fn test_workspace_resolution_with_env_fallback() {
        // Exercises both workspace paths in one test since they share
        // process-wide environment variables.
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"attributes": {{"orgId": "42", "jobName": "from_document"}}}}"#
        )
        .unwrap();

        std::env::set_var(CONTEXT_FILE_VAR, file.path());
        let ctx = JobContext::resolve(Platform::Workspace).unwrap();
        assert_eq!(ctx.job_name, "from_document");

        // Document gone: fall back to the launcher environment.
        std::env::set_var(CONTEXT_FILE_VAR, "/nonexistent/context.json");
        std::env::set_var(ORG_ID_VAR, "42");
        std::env::set_var(JOB_NAME_VAR, "from_env");
        let ctx = JobContext::resolve(Platform::Workspace).unwrap();
        assert_eq!(ctx.job_name, "from_env");

        // Neither path available: context error.
        std::env::remove_var(ORG_ID_VAR);
        std::env::remove_var(JOB_NAME_VAR);
        let err = JobContext::resolve(Platform::Workspace).unwrap_err();
        assert!(err.to_string().contains(ORG_ID_VAR));

        std::env::remove_var(CONTEXT_FILE_VAR);
    }

    #[test]
    fn test_as_json() {
        let ctx = JobContext::local();
        let json = ctx.as_json();
        assert_eq!(json["org_id"], "local");
        assert_eq!(json["job_name"], "local");
    }
}

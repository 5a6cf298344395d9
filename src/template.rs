//! Template interpolation for connection strings and endpoints
//!
//! Handles `{{ variable }}` interpolation in sink configurations.
//! Supports nested access like `{{ secrets.password }}` and
//! `{{ context.job_name }}`.

use crate::error::{Error, Result};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Regex for matching template variables: {{ variable.path }}
static TEMPLATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)*)\s*\}\}").unwrap()
});

/// Context for template interpolation
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    /// Sink configuration values
    pub config: Value,
    /// Resolved secrets (credentials, connection strings)
    pub secrets: Value,
    /// Job context values (org id, job name)
    pub context: Value,
    /// Additional context variables
    pub vars: Value,
}

impl TemplateContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create context with config values
    pub fn with_config(config: Value) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Set config values
    pub fn set_config(&mut self, config: Value) -> &mut Self {
        self.config = config;
        self
    }

    /// Set resolved secrets
    pub fn set_secrets(&mut self, secrets: Value) -> &mut Self {
        self.secrets = secrets;
        self
    }

    /// Set job context values
    pub fn set_context(&mut self, context: Value) -> &mut Self {
        self.context = context;
        self
    }

    /// Set additional variables
    pub fn set_vars(&mut self, vars: Value) -> &mut Self {
        self.vars = vars;
        self
    }

    /// Get a value by path (e.g., "secrets.password")
    pub fn get(&self, path: &str) -> Option<&Value> {
        let parts: Vec<&str> = path.split('.').collect();
        if parts.is_empty() {
            return None;
        }

        // First part determines the root object
        let root = match parts[0] {
            "config" => &self.config,
            "secrets" => &self.secrets,
            "context" => &self.context,
            "vars" => &self.vars,
            // Also support top-level access to config fields directly
            _ => {
                if let Some(val) = get_nested_value(&self.config, &parts) {
                    return Some(val);
                }
                return get_nested_value(&self.vars, &parts);
            }
        };

        // Navigate the remaining path
        if parts.len() == 1 {
            Some(root)
        } else {
            get_nested_value(root, &parts[1..])
        }
    }
}

/// Get a nested value from a JSON value by path
fn get_nested_value<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for part in path {
        match current {
            Value::Object(map) => {
                current = map.get(*part)?;
            }
            _ => return None,
        }
    }
    Some(current)
}

/// Render a template string with the given context
pub fn render(template: &str, ctx: &TemplateContext) -> Result<String> {
    let mut result = template.to_string();
    let mut errors = Vec::new();

    for cap in TEMPLATE_REGEX.captures_iter(template) {
        let full_match = cap.get(0).unwrap().as_str();
        let var_path = cap.get(1).unwrap().as_str();

        match ctx.get(var_path) {
            Some(value) => {
                let replacement = value_to_string(value);
                result = result.replace(full_match, &replacement);
            }
            None => {
                errors.push(var_path.to_string());
            }
        }
    }

    if errors.is_empty() {
        Ok(result)
    } else {
        Err(Error::undefined_var(errors.join(", ")))
    }
}

/// Check if a string contains template variables
pub fn has_templates(s: &str) -> bool {
    TEMPLATE_REGEX.is_match(s)
}

/// Extract all variable names from a template
pub fn extract_variables(template: &str) -> Vec<String> {
    TEMPLATE_REGEX
        .captures_iter(template)
        .map(|cap| cap.get(1).unwrap().as_str().to_string())
        .collect()
}

/// Convert a JSON value to a string for template substitution
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        // For complex types, use JSON serialization
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_simple_substitution() {
        let ctx = TemplateContext::with_config(json!({
            "database": "warehouse"
        }));

        let result = render("db={{ config.database }}", &ctx).unwrap();
        assert_eq!(result, "db=warehouse");
    }

    #[test]
    fn test_secrets_substitution() {
        let mut ctx = TemplateContext::new();
        ctx.set_secrets(json!({
            "user_name": "svc_etl",
            "password": "hunter2"
        }));

        let result = render(
            "postgresql://{{ secrets.user_name }}:{{ secrets.password }}@db:5432/warehouse",
            &ctx,
        )
        .unwrap();
        assert_eq!(result, "postgresql://svc_etl:hunter2@db:5432/warehouse");
    }

    #[test]
    fn test_context_substitution() {
        let mut ctx = TemplateContext::new();
        ctx.set_context(json!({"org_id": "8323", "job_name": "nightly_load"}));

        let result = render("runs/{{ context.org_id }}/{{ context.job_name }}", &ctx).unwrap();
        assert_eq!(result, "runs/8323/nightly_load");
    }

    #[test]
    fn test_nested_value() {
        let ctx = TemplateContext::with_config(json!({
            "connection": { "host": "db.internal" }
        }));

        let result = render("{{ config.connection.host }}", &ctx).unwrap();
        assert_eq!(result, "db.internal");
    }

    #[test]
    fn test_undefined_variable() {
        let ctx = TemplateContext::new();
        let result = render("{{ secrets.missing }}", &ctx);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("secrets.missing"));
    }

    #[test]
    fn test_no_templates() {
        let ctx = TemplateContext::new();
        let result = render("plain string without templates", &ctx).unwrap();
        assert_eq!(result, "plain string without templates");
    }

    #[test]
    fn test_has_templates() {
        assert!(has_templates("{{ secrets.password }}"));
        assert!(has_templates("prefix {{ var }} suffix"));
        assert!(!has_templates("no templates here"));
        assert!(!has_templates("{ not a template }"));
    }

    #[test]
    fn test_extract_variables() {
        let vars = extract_variables("{{ config.a }} and {{ secrets.b }}");
        assert_eq!(vars, vec!["config.a", "secrets.b"]);
    }
}

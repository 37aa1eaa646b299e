//! Tool for resolving custom field names to JIRA field ids

use crate::config::JiraConfig;
use crate::error::{JiraFieldsError, JiraFieldsResult};
use crate::field_resolver::{FieldRequestMap, FieldResolver, ResolvedFieldMap};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Parameters for resolving custom fields
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ResolveCustomFieldsParams {
    /// Output column -> comma-separated JIRA field names,
    /// e.g. {"team": "Team", "environment": "Environment,Found In"}.
    /// An empty string requests no field for that column.
    /// Defaults to the server's configured custom_fields.
    #[serde(default)]
    pub custom_fields: Option<FieldRequestMap>,
}

/// Result from resolving custom fields
#[derive(Debug, Serialize)]
pub struct ResolveCustomFieldsResult {
    /// Every resolved field id, column by column
    pub field_ids: Vec<String>,

    /// Requested names and resolved ids per output column
    pub columns: ResolvedFieldMap,

    /// Number of resolved ids
    pub total_count: usize,

    /// Summary for the user
    pub message: String,
}

/// Tool for resolving custom fields
pub struct ResolveCustomFieldsTool {
    resolver: FieldResolver,
    config: Arc<JiraConfig>,
}

impl ResolveCustomFieldsTool {
    pub fn new(resolver: FieldResolver, config: Arc<JiraConfig>) -> Self {
        Self { resolver, config }
    }

    #[instrument(skip(self))]
    pub async fn execute(
        &self,
        params: ResolveCustomFieldsParams,
    ) -> JiraFieldsResult<ResolveCustomFieldsResult> {
        let request = match params.custom_fields {
            Some(custom_fields) if !custom_fields.is_empty() => custom_fields,
            _ => self.config.custom_fields.clone(),
        };

        if request.is_empty() {
            return Err(JiraFieldsError::invalid_param(
                "custom_fields",
                "No custom fields given and none configured (set JIRA_CUSTOM_FIELDS)",
            ));
        }

        info!("Resolving custom fields for {} column(s)", request.len());

        let resolution = self.resolver.resolve(&request).await?;

        Ok(ResolveCustomFieldsResult {
            total_count: resolution.field_ids.len(),
            message: format!(
                "Resolved {} field id(s) for {} column(s).",
                resolution.field_ids.len(),
                resolution.columns.len()
            ),
            field_ids: resolution.field_ids,
            columns: resolution.columns,
        })
    }
}

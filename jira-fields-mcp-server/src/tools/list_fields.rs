//! Tool for listing the fields defined on the JIRA instance

use crate::catalog::{duplicate_display_names, fold_name, FieldSpec};
use crate::error::JiraFieldsResult;
use crate::field_resolver::FieldResolver;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Parameters for listing fields
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListFieldsParams {
    /// Only return fields whose name contains this text (case-insensitive)
    #[serde(default)]
    pub name_filter: Option<String>,

    /// Only return custom fields (default: false)
    #[serde(default)]
    pub custom_only: Option<bool>,
}

/// Result from listing fields
#[derive(Debug, Serialize)]
pub struct ListFieldsResult {
    /// Matching fields, in the order JIRA reports them
    pub fields: Vec<FieldSpec>,

    /// Number of matching fields
    pub total_count: usize,

    /// Names used by more than one field; a request for one of these
    /// resolves to several ids
    pub duplicate_names: Vec<String>,
}

/// Tool for listing fields
pub struct ListFieldsTool {
    resolver: FieldResolver,
}

impl ListFieldsTool {
    pub fn new(resolver: FieldResolver) -> Self {
        Self { resolver }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, params: ListFieldsParams) -> JiraFieldsResult<ListFieldsResult> {
        let catalog = self.resolver.catalog().await?;
        let filter = params.name_filter.as_deref().map(fold_name);
        let custom_only = params.custom_only.unwrap_or(false);

        let fields: Vec<FieldSpec> = catalog
            .into_iter()
            .filter(|field| !custom_only || field.custom)
            .filter(|field| match &filter {
                Some(needle) => fold_name(&field.display_name).contains(needle.as_str()),
                None => true,
            })
            .collect();

        info!("Listing {} JIRA fields", fields.len());

        Ok(ListFieldsResult {
            total_count: fields.len(),
            duplicate_names: duplicate_display_names(&fields),
            fields,
        })
    }
}

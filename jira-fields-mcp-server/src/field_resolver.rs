//! Resolution of human-entered JIRA field names to field ids
//!
//! Callers describe their output columns as `column -> "Name A,Name B"`. The
//! resolver checks every name against the instance's field catalog and
//! returns the ids to request from JIRA plus a per-column breakdown used to
//! label extracted values.

use crate::catalog::{fold_name, FieldCatalogProvider, FieldSpec};
use crate::error::{JiraFieldsError, JiraFieldsResult};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Output column -> comma-separated JIRA field names.
///
/// Names are split on "," and used verbatim; no whitespace is trimmed. An
/// empty value requests nothing, and so do empty segments such as the one a
/// trailing comma leaves (`"Environment,"` requests only "Environment").
/// Neither is ever reported as a missing field.
pub type FieldRequestMap = IndexMap<String, String>;

/// Output column -> what was requested and what it resolved to
pub type ResolvedFieldMap = IndexMap<String, ResolvedColumn>;

/// One output column after resolution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResolvedColumn {
    /// Field names as the caller wrote them, in order
    pub requested: Vec<String>,

    /// Field ids matching those names, in request order
    pub field_ids: Vec<String>,
}

impl ResolvedColumn {
    /// Requested names followed by resolved ids, in one list
    pub fn combined(&self) -> Vec<String> {
        self.requested
            .iter()
            .chain(self.field_ids.iter())
            .cloned()
            .collect()
    }
}

/// Result of a successful resolution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct FieldResolution {
    /// Every resolved id, column by column, duplicates kept
    pub field_ids: Vec<String>,

    /// Per-column breakdown, in request order
    pub columns: ResolvedFieldMap,
}

impl FieldResolution {
    /// Column whose ids include `field_id`, for labelling extracted values
    pub fn column_for(&self, field_id: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(_, column)| column.field_ids.iter().any(|id| id == field_id))
            .map(|(name, _)| name.as_str())
    }
}

/// Names requested for one column. Empty values and empty segments request nothing.
fn split_names(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value
        .split(',')
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolve `request` against a catalog snapshot.
///
/// Fails with [`JiraFieldsError::FieldValidation`] listing every requested
/// name that matches no catalog entry; nothing is resolved in that case.
pub fn resolve(
    request: &FieldRequestMap,
    catalog: &[FieldSpec],
) -> JiraFieldsResult<FieldResolution> {
    let requested: IndexMap<&str, Vec<String>> = request
        .iter()
        .map(|(column, value)| (column.as_str(), split_names(value)))
        .collect();

    let known: HashSet<String> = catalog
        .iter()
        .map(|field| fold_name(&field.display_name))
        .collect();

    let missing: BTreeSet<&str> = requested
        .values()
        .flatten()
        .filter(|name| !known.contains(&fold_name(name)))
        .map(String::as_str)
        .collect();

    if !missing.is_empty() {
        warn!("Requested JIRA fields not found: {:?}", missing);
        return Err(JiraFieldsError::missing_fields(missing));
    }

    let folded_catalog: Vec<(String, &str)> = catalog
        .iter()
        .map(|field| (fold_name(&field.display_name), field.id.as_str()))
        .collect();

    let mut resolution = FieldResolution::default();
    for (column, names) in requested {
        let mut field_ids = Vec::new();
        for name in &names {
            let folded = fold_name(name);
            field_ids.extend(
                folded_catalog
                    .iter()
                    .filter(|(candidate, _)| *candidate == folded)
                    .map(|(_, id)| id.to_string()),
            );
        }

        debug!("Column '{}' resolved to {:?}", column, field_ids);
        resolution.field_ids.extend(field_ids.iter().cloned());
        resolution.columns.insert(
            column.to_string(),
            ResolvedColumn {
                requested: names,
                field_ids,
            },
        );
    }

    Ok(resolution)
}

/// Resolver bound to a catalog provider; fetches a fresh catalog per call
#[derive(Clone)]
pub struct FieldResolver {
    provider: Arc<dyn FieldCatalogProvider>,
}

impl FieldResolver {
    pub fn new(provider: Arc<dyn FieldCatalogProvider>) -> Self {
        Self { provider }
    }

    /// Fetch the field catalog
    pub async fn catalog(&self) -> JiraFieldsResult<Vec<FieldSpec>> {
        self.provider.fetch_fields().await
    }

    /// Fetch the catalog once and resolve `request` against it
    #[instrument(skip(self, request), fields(columns = request.len()))]
    pub async fn resolve(&self, request: &FieldRequestMap) -> JiraFieldsResult<FieldResolution> {
        let catalog = self.provider.fetch_fields().await?;
        debug!("Fetched {} fields from catalog provider", catalog.len());

        let resolution = resolve(request, &catalog)?;
        info!(
            "Resolved {} field id(s) for {} column(s)",
            resolution.field_ids.len(),
            resolution.columns.len()
        );
        Ok(resolution)
    }
}

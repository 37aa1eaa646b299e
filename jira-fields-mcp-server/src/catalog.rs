//! Field catalog: the fields a JIRA instance reports, and the capability that fetches them
//!
//! The resolver only ever sees a [`FieldCatalogProvider`]. The JIRA-backed
//! implementation lives in `jira_client`; [`StaticFieldCatalog`] serves a fixed
//! snapshot.

use crate::error::JiraFieldsResult;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A field as reported by `GET /rest/api/2/field`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldSpec {
    /// Internal identifier (e.g. "customfield_10016" or "summary")
    pub id: String,

    /// Name shown in the JIRA administration UI
    #[serde(rename = "name")]
    pub display_name: String,

    /// Whether this is a custom field
    #[serde(default)]
    pub custom: bool,
}

impl FieldSpec {
    pub fn new(display_name: impl Into<String>, id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            custom: id.starts_with("customfield_"),
            display_name: display_name.into(),
            id,
        }
    }
}

/// Case folding used for every display-name comparison.
///
/// Full Unicode default case folding, so "STRASSE" and "Straße" compare equal.
pub fn fold_name(name: &str) -> String {
    caseless::default_case_fold_str(name)
}

/// Capability to fetch the full field catalog of one provider account
#[async_trait]
pub trait FieldCatalogProvider: Send + Sync {
    /// Fetch every field the provider knows about.
    ///
    /// Implementations report authentication failures as
    /// `JiraFieldsError::Authentication` and leave other failures in their
    /// own category.
    async fn fetch_fields(&self) -> JiraFieldsResult<Vec<FieldSpec>>;
}

/// Fixed in-memory catalog
#[derive(Debug, Clone, Default)]
pub struct StaticFieldCatalog {
    fields: Vec<FieldSpec>,
}

impl StaticFieldCatalog {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// Build from `(display_name, id)` pairs
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(name, id)| FieldSpec::new(name, id))
                .collect(),
        )
    }
}

#[async_trait]
impl FieldCatalogProvider for StaticFieldCatalog {
    async fn fetch_fields(&self) -> JiraFieldsResult<Vec<FieldSpec>> {
        Ok(self.fields.clone())
    }
}

/// Display names shared by more than one field, compared case-insensitively.
///
/// Each group is reported once, under the spelling that appears first in the
/// catalog, sorted by folded name.
pub fn duplicate_display_names(catalog: &[FieldSpec]) -> Vec<String> {
    let mut groups: BTreeMap<String, (String, usize)> = BTreeMap::new();
    for field in catalog {
        groups
            .entry(fold_name(&field.display_name))
            .or_insert_with(|| (field.display_name.clone(), 0))
            .1 += 1;
    }

    groups
        .into_values()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| name)
        .collect()
}

//! JIRA client wrapper around gouqi
//!
//! Reads session information through gouqi and fetches the field catalog with
//! a plain HTTP request, so the response status is available when a fetch
//! fails. Authentication problems are recognised here and nowhere else.

use crate::catalog::{FieldCatalogProvider, FieldSpec};
use crate::config::JiraConfig;
use crate::error::{JiraFieldsError, JiraFieldsResult};
use async_trait::async_trait;
use gouqi::r#async::Jira;
use gouqi::Session;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info, instrument, warn};

/// Field catalog endpoint, relative to the JIRA base URL
const FIELD_CATALOG_PATH: &str = "/rest/api/2/field";

const LOGIN_PAGE_MESSAGE: &str = "JIRA authentication failed - received login page instead of API response. \
     Please check your connection on the JIRA site and verify your credentials (username/token). \
     You may need to log in to JIRA again and reconnect.";

/// JIRA client wrapper that provides the field catalog
#[derive(Debug, Clone)]
pub struct JiraClient {
    client: Arc<Jira>,
    http: reqwest::Client,
    config: Arc<JiraConfig>,
}

/// User information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub account_id: String,
    pub display_name: String,
    pub email_address: Option<String>,
    pub active: bool,
}

/// Turn a `/field` response into the field list or an error category.
///
/// The status decides: 401 is an authentication failure, 403 a permission
/// failure, 429 and 5xx are transient. A 2xx body that is not JSON is the
/// HTML login page JIRA serves once the session is gone; a 2xx JSON body of
/// the wrong shape is an internal error.
pub fn classify_field_catalog_response(
    status: u16,
    body: &str,
) -> JiraFieldsResult<Vec<FieldSpec>> {
    match status {
        200..=299 => match serde_json::from_str::<Vec<FieldSpec>>(body) {
            Ok(fields) => Ok(fields),
            Err(e) if serde_json::from_str::<serde_json::Value>(body).is_ok() => Err(
                JiraFieldsError::internal(format!("Unexpected field list payload from JIRA: {}", e)),
            ),
            Err(_) => Err(JiraFieldsError::auth(LOGIN_PAGE_MESSAGE)),
        },
        401 => Err(JiraFieldsError::auth(LOGIN_PAGE_MESSAGE)),
        403 => Err(JiraFieldsError::permission(
            "The configured JIRA account is not allowed to list fields",
        )),
        404 => Err(JiraFieldsError::config(
            "JIRA REST endpoint not found. Check that JIRA_URL points at your JIRA site.",
        )),
        429 | 500..=599 => Err(JiraFieldsError::network(format!(
            "JIRA is temporarily unavailable (HTTP {}) while fetching fields. Please try again later.",
            status
        ))),
        other => Err(JiraFieldsError::internal(format!(
            "Unexpected HTTP {} from JIRA while fetching fields",
            other
        ))),
    }
}

impl JiraClient {
    /// Create a new JIRA client with the given configuration
    #[instrument(skip_all)]
    pub async fn new(config: Arc<JiraConfig>) -> JiraFieldsResult<Self> {
        info!(
            "Initializing JIRA client for URL: {} (auth: {})",
            config.jira_url,
            config.auth.kind()
        );

        let credentials = config.to_gouqi_credentials();

        let client = timeout(Duration::from_secs(config.request_timeout_seconds), async {
            Jira::new(&config.jira_url, credentials)
        })
        .await
        .map_err(|_| JiraFieldsError::network("Timeout connecting to JIRA instance"))?
        .map_err(JiraFieldsError::from)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| JiraFieldsError::config(format!("Failed to build HTTP client: {}", e)))?;

        let jira_client = Self {
            client: Arc::new(client),
            http,
            config,
        };

        jira_client.test_connection().await?;

        info!("JIRA client initialized successfully");
        Ok(jira_client)
    }

    /// Test the connection to the JIRA instance
    #[instrument(skip_all)]
    async fn test_connection(&self) -> JiraFieldsResult<()> {
        debug!("Testing JIRA connection");

        match self.get_current_user().await {
            Ok(user) => {
                info!(
                    "Connection test successful, authenticated as: {}",
                    user.display_name
                );
                Ok(())
            }
            Err(e) => {
                error!("Connection test failed: {}", e);
                Err(e)
            }
        }
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config.request_timeout_seconds)
    }

    /// Get current user information
    #[instrument(skip_all)]
    pub async fn get_current_user(&self) -> JiraFieldsResult<UserInfo> {
        debug!("Fetching current user information");

        let session = timeout(self.request_timeout(), async {
            self.client.session().await
        })
        .await
        .map_err(|_| JiraFieldsError::network("Timeout getting current user"))?
        .map_err(JiraFieldsError::from)?;

        Ok(convert_session_to_user_info(&session))
    }

    /// Fetch every field defined on the instance
    #[instrument(skip_all)]
    pub async fn get_all_fields(&self) -> JiraFieldsResult<Vec<FieldSpec>> {
        debug!("Fetching JIRA field catalog");

        let url = format!(
            "{}{}",
            self.config.jira_url.trim_end_matches('/'),
            FIELD_CATALOG_PATH
        );
        let request = self
            .config
            .authorize_request(self.http.get(&url))
            .header("Accept", "application/json");

        let (status, body) = timeout(self.request_timeout(), async {
            let response = request.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        })
        .await
        .map_err(|_| JiraFieldsError::network("Timeout fetching JIRA fields"))?
        .map_err(|e| JiraFieldsError::network(format!("Failed to fetch JIRA fields: {}", e)))?;

        debug!(status, "Field catalog response received");

        let fields = classify_field_catalog_response(status, &body).inspect_err(|e| {
            warn!(status, category = e.category(), "Field catalog request failed");
        })?;

        info!("Fetched {} fields from JIRA", fields.len());
        Ok(fields)
    }
}

#[async_trait]
impl FieldCatalogProvider for JiraClient {
    async fn fetch_fields(&self) -> JiraFieldsResult<Vec<FieldSpec>> {
        self.get_all_fields().await
    }
}

/// Convert gouqi Session to our UserInfo format
fn convert_session_to_user_info(session: &Session) -> UserInfo {
    UserInfo {
        account_id: session.name.clone(),
        display_name: session.name.clone(),
        email_address: None,
        active: true,
    }
}

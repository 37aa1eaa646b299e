//! JIRA Fields MCP Server Library
//!
//! Resolves the human-readable JIRA field names a data-extraction toolkit is
//! configured with (e.g. `{"team": "Team", "environment": "Environment"}`)
//! into the field ids JIRA's REST API expects, and fails with an actionable
//! message when a configured field does not exist.
//!
//! ## Features
//!
//! - **Field resolution**: case-insensitive, all-or-nothing, duplicate-aware
//! - **Field discovery**: list the instance's fields without admin access
//! - **Clear failures**: unknown fields, expired sessions and transport errors
//!   are reported as distinct error categories

use crate::catalog::FieldCatalogProvider;
use crate::config::JiraConfig;
use crate::error::{JiraFieldsError, JiraFieldsResult};
use crate::field_resolver::FieldResolver;
use crate::jira_client::JiraClient;
use crate::tools::{
    ListFieldsParams, ListFieldsResult, ListFieldsTool, ResolveCustomFieldsParams,
    ResolveCustomFieldsResult, ResolveCustomFieldsTool,
};

use pulseengine_mcp_macros::{mcp_server, mcp_tools};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument};

pub mod catalog;
pub mod config;
pub mod error;
pub mod field_resolver;
pub mod jira_client;
pub mod tools;

/// Server status information
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JiraFieldsServerStatus {
    pub server_name: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub timestamp: String,
    pub jira_url: String,
    pub jira_connection_status: String,
    pub authenticated_user: Option<String>,
    pub configured_columns: usize,
    pub tools_count: usize,
}

/// JIRA Fields MCP Server
///
/// Uses the #[mcp_server] macro for automatic MCP infrastructure generation.
#[mcp_server(
    name = "JIRA Fields MCP Server",
    version = "0.1.0",
    description = "Resolves JIRA custom field names to field ids for data extraction",
    auth = "disabled"
)]
#[derive(Clone)]
pub struct JiraFieldsMcpServer {
    /// Server start time for uptime calculation
    start_time: Instant,

    /// JIRA client for API operations
    jira_client: Arc<JiraClient>,

    /// Configuration
    config: Arc<JiraConfig>,

    /// Tool implementations
    resolve_tool: Arc<ResolveCustomFieldsTool>,
    list_fields_tool: Arc<ListFieldsTool>,
}

impl Default for JiraFieldsMcpServer {
    fn default() -> Self {
        panic!(
            "JiraFieldsMcpServer cannot be created with default(). Use JiraFieldsMcpServer::new() instead."
        )
    }
}

impl JiraFieldsMcpServer {
    /// Create a new server from environment and file configuration
    #[instrument]
    pub async fn new() -> JiraFieldsResult<Self> {
        info!("Initializing JIRA Fields MCP Server");

        let config = JiraConfig::load().map_err(|e| JiraFieldsError::config(e.to_string()))?;
        info!(
            "Configuration loaded successfully ({} configured column(s))",
            config.custom_fields.len()
        );

        Self::with_config(config).await
    }

    /// Create server with custom configuration
    #[instrument(skip(config))]
    pub async fn with_config(config: JiraConfig) -> JiraFieldsResult<Self> {
        let config = Arc::new(config);

        let jira_client = Arc::new(JiraClient::new(Arc::clone(&config)).await?);
        info!("JIRA client initialized");

        let provider: Arc<dyn FieldCatalogProvider> = jira_client.clone();
        let resolver = FieldResolver::new(provider);

        let resolve_tool = Arc::new(ResolveCustomFieldsTool::new(
            resolver.clone(),
            Arc::clone(&config),
        ));
        let list_fields_tool = Arc::new(ListFieldsTool::new(resolver));

        info!("JIRA Fields MCP Server initialized successfully");

        Ok(Self {
            start_time: Instant::now(),
            jira_client,
            config,
            resolve_tool,
            list_fields_tool,
        })
    }

    /// Get server uptime in seconds
    fn get_uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// All public methods in this impl block become MCP tools automatically
#[mcp_tools]
impl JiraFieldsMcpServer {
    /// Resolve JIRA field names to field ids
    ///
    /// Takes a mapping of output column names to comma-separated JIRA field names
    /// and returns the field ids to request from JIRA, plus the ids per column.
    /// Names are matched case-insensitively against the instance's field list.
    /// Fails, naming every unknown field, if any name does not exist.
    ///
    /// # Examples
    /// - Resolve one column: `{"custom_fields": {"team": "Team"}}`
    /// - Several names per column: `{"custom_fields": {"environment": "Environment,Found In"}}`
    /// - Use the configured mapping: `{}`
    #[instrument(skip(self))]
    pub async fn resolve_custom_fields(
        &self,
        params: ResolveCustomFieldsParams,
    ) -> anyhow::Result<ResolveCustomFieldsResult> {
        self.resolve_tool.execute(params).await.map_err(|e| {
            error!(
                category = e.category(),
                "resolve_custom_fields failed: {}", e
            );
            anyhow::anyhow!(e)
        })
    }

    /// List the fields defined on the JIRA instance
    ///
    /// Useful for finding the exact name of a field before configuring it.
    ///
    /// # Examples
    /// - All fields: `{}`
    /// - Custom fields containing "team": `{"name_filter": "team", "custom_only": true}`
    #[instrument(skip(self))]
    pub async fn list_fields(&self, params: ListFieldsParams) -> anyhow::Result<ListFieldsResult> {
        self.list_fields_tool.execute(params).await.map_err(|e| {
            error!(category = e.category(), "list_fields failed: {}", e);
            anyhow::anyhow!(e)
        })
    }

    /// Get server status and connection information
    #[instrument(skip(self))]
    pub async fn get_server_status(&self) -> anyhow::Result<JiraFieldsServerStatus> {
        info!("Getting server status");

        let (connection_status, authenticated_user) =
            match self.jira_client.get_current_user().await {
                Ok(user) => ("Connected".to_string(), Some(user.display_name)),
                Err(e) => (format!("Connection Error: {}", e), None),
            };

        Ok(JiraFieldsServerStatus {
            server_name: "JIRA Fields MCP Server".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.get_uptime_seconds(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            jira_url: self.config.jira_url.clone(),
            jira_connection_status: connection_status,
            authenticated_user,
            configured_columns: self.config.custom_fields.len(),
            tools_count: 4, // resolve_custom_fields, list_fields, get_server_status, test_connection
        })
    }

    /// Test JIRA connection and authentication
    #[instrument(skip(self))]
    pub async fn test_connection(&self) -> anyhow::Result<String> {
        info!("Testing JIRA connection");

        match self.jira_client.get_current_user().await {
            Ok(user) => {
                info!("Connection test successful for user: {}", user.display_name);
                Ok(format!(
                    "✅ Connection successful!\n\
                     JIRA URL: {}\n\
                     Authenticated as: {}",
                    self.config.jira_url, user.display_name
                ))
            }
            Err(e) => {
                error!("Connection test failed: {}", e);
                Ok(format!(
                    "❌ Connection failed!\n\
                     JIRA URL: {}\n\
                     Error: {}\n\
                     \n\
                     Please check:\n\
                     - JIRA URL is correct and accessible\n\
                     - Authentication credentials are valid\n\
                     - Network connectivity to JIRA instance",
                    self.config.jira_url, e
                ))
            }
        }
    }
}

//! Configuration management for the JIRA Fields MCP Server
//!
//! Handles loading configuration from environment variables, TOML files,
//! and provides sensible defaults for all settings.

use crate::field_resolver::FieldRequestMap;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tracing::{debug, info, warn};

/// Main configuration structure for the JIRA Fields MCP Server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JiraConfig {
    /// JIRA instance URL (required)
    pub jira_url: String,

    /// Authentication configuration (required)
    pub auth: AuthConfig,

    /// HTTP request timeout in seconds (default: 30)
    pub request_timeout_seconds: u64,

    /// Default output columns: column name -> comma-separated JIRA field names
    pub custom_fields: FieldRequestMap,
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AuthConfig {
    /// Personal Access Token (recommended)
    PersonalAccessToken(String),

    /// Basic authentication (username + password or API token)
    Basic { username: String, password: String },

    /// Bearer token
    Bearer(String),

    /// Anonymous access (limited functionality)
    Anonymous,
}

impl AuthConfig {
    /// Short label for logs; never includes the secret
    pub fn kind(&self) -> &'static str {
        match self {
            AuthConfig::PersonalAccessToken(_) => "pat",
            AuthConfig::Basic { .. } => "basic",
            AuthConfig::Bearer(_) => "bearer",
            AuthConfig::Anonymous => "anonymous",
        }
    }
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            jira_url: String::new(),
            auth: AuthConfig::Anonymous,
            request_timeout_seconds: 30,
            custom_fields: FieldRequestMap::new(),
        }
    }
}

impl JiraConfig {
    /// Load configuration from environment variables, TOML file, and defaults
    /// Priority: env vars > TOML file > defaults
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Try to load from TOML file first
        if let Ok(file_config) = Self::load_from_file("config/jira-fields-config.toml") {
            info!("Loaded configuration from TOML file");
            config = file_config;
        } else if let Ok(file_config) = Self::load_from_file("jira-fields-config.toml") {
            info!("Loaded configuration from TOML file in current directory");
            config = file_config;
        } else {
            debug!("No TOML configuration file found, using defaults and environment variables");
        }

        // Override with environment variables
        config.load_from_env()?;

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from environment variables
    fn load_from_env(&mut self) -> Result<()> {
        // JIRA URL (required if not in TOML)
        if let Ok(url) = env::var("JIRA_URL") {
            self.jira_url = url;
            debug!("Loaded JIRA_URL from environment");
        }

        // Authentication configuration
        if let Ok(auth_type) = env::var("JIRA_AUTH_TYPE") {
            match auth_type.to_lowercase().as_str() {
                "pat" | "personal_access_token" => {
                    if let Ok(token) = env::var("JIRA_TOKEN") {
                        self.auth = AuthConfig::PersonalAccessToken(token);
                        debug!("Configured Personal Access Token authentication from environment");
                    }
                }
                "basic" => {
                    let username = env::var("JIRA_USERNAME")
                        .context("JIRA_USERNAME required for basic authentication")?;
                    let password = env::var("JIRA_PASSWORD")
                        .or_else(|_| env::var("JIRA_TOKEN"))
                        .context("JIRA_PASSWORD or JIRA_TOKEN required for basic authentication")?;
                    self.auth = AuthConfig::Basic { username, password };
                    debug!("Configured basic authentication from environment");
                }
                "bearer" => {
                    if let Ok(token) = env::var("JIRA_TOKEN") {
                        self.auth = AuthConfig::Bearer(token);
                        debug!("Configured bearer token authentication from environment");
                    }
                }
                "anonymous" => {
                    self.auth = AuthConfig::Anonymous;
                    debug!("Configured anonymous authentication from environment");
                }
                _ => {
                    warn!("Unknown JIRA_AUTH_TYPE: {}, using default", auth_type);
                }
            }
        }

        // Optional configuration overrides
        if let Ok(timeout) = env::var("JIRA_REQUEST_TIMEOUT") {
            if let Ok(timeout_seconds) = timeout.parse::<u64>() {
                self.request_timeout_seconds = timeout_seconds;
                debug!(
                    "Set request timeout to {} seconds from environment",
                    timeout_seconds
                );
            }
        }

        // Default column mapping, as a JSON object
        if let Ok(raw) = env::var("JIRA_CUSTOM_FIELDS") {
            self.custom_fields = serde_json::from_str(&raw)
                .context("JIRA_CUSTOM_FIELDS must be a JSON object of column -> field names")?;
            debug!(
                "Loaded {} custom field column(s) from environment",
                self.custom_fields.len()
            );
        }

        Ok(())
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        // Validate JIRA URL
        if self.jira_url.is_empty() {
            return Err(anyhow::anyhow!(
                "JIRA URL is required. Set JIRA_URL environment variable or configure in TOML file."
            ));
        }

        // Validate URL format
        if !self.jira_url.starts_with("http://") && !self.jira_url.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "JIRA URL must start with http:// or https://. Got: {}",
                self.jira_url
            ));
        }

        // Validate authentication
        match &self.auth {
            AuthConfig::PersonalAccessToken(token) => {
                if token.is_empty() {
                    return Err(anyhow::anyhow!("Personal access token cannot be empty"));
                }
            }
            AuthConfig::Basic { username, password } => {
                if username.is_empty() || password.is_empty() {
                    return Err(anyhow::anyhow!(
                        "Username and password cannot be empty for basic auth"
                    ));
                }
            }
            AuthConfig::Bearer(token) => {
                if token.is_empty() {
                    return Err(anyhow::anyhow!("Bearer token cannot be empty"));
                }
            }
            AuthConfig::Anonymous => {
                info!("Using anonymous authentication - the field catalog may be incomplete");
            }
        }

        // Validate numeric ranges
        if self.request_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("request_timeout_seconds must be greater than 0"));
        }

        // Column names are output keys
        if self.custom_fields.keys().any(|column| column.trim().is_empty()) {
            return Err(anyhow::anyhow!("custom_fields column names cannot be empty"));
        }

        info!("Configuration validation successful");
        Ok(())
    }

    /// Get the gouqi Credentials from AuthConfig
    pub fn to_gouqi_credentials(&self) -> gouqi::Credentials {
        match &self.auth {
            AuthConfig::PersonalAccessToken(token) => gouqi::Credentials::Bearer(token.clone()),
            AuthConfig::Basic { username, password } => {
                gouqi::Credentials::Basic(username.clone(), password.clone())
            }
            AuthConfig::Bearer(token) => gouqi::Credentials::Bearer(token.clone()),
            AuthConfig::Anonymous => gouqi::Credentials::Anonymous,
        }
    }

    /// Attach the same credentials to a plain HTTP request
    pub fn authorize_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            AuthConfig::PersonalAccessToken(token) | AuthConfig::Bearer(token) => {
                request.bearer_auth(token)
            }
            AuthConfig::Basic { username, password } => request.basic_auth(username, Some(password)),
            AuthConfig::Anonymous => request,
        }
    }
}

//! Error types and handling for the JIRA Fields MCP Server
//!
//! Provides structured error types that map to MCP JSON-RPC error codes and to
//! the HTTP statuses the data-extractor toolkit reports to its users.

use serde_json::Value;
use thiserror::Error;

/// Where users can look up the fields configured on their JIRA instance
pub const FIELD_ADMIN_HINT: &str =
    "You can find available fields in JIRA Administration > Issues > Custom fields.";

/// Custom error types for the JIRA Fields MCP Server
#[derive(Debug, Error)]
pub enum JiraFieldsError {
    /// Configuration errors (-32001)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Authentication failures (-32002)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Network errors (-32003)
    #[error("Network error: {message}")]
    Network { message: String },

    /// Permission denied errors (-32004)
    #[error("Permission denied: {message}")]
    Permission { message: String },

    /// Requested field names that the JIRA instance does not know (-32006)
    #[error(
        "The following JIRA fields are not valid or do not exist in your JIRA instance: {}. \
         Please check the field names on your JIRA site and verify they are spelled correctly. \
         {}",
        .missing_fields.join(", "),
        FIELD_ADMIN_HINT
    )]
    FieldValidation { missing_fields: Vec<String> },

    /// Invalid parameter errors (-32006)
    #[error("Invalid parameter: {parameter} - {message}")]
    InvalidParameter { parameter: String, message: String },

    /// Internal server errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl JiraFieldsError {
    /// Get the MCP JSON-RPC error code for this error
    pub fn error_code(&self) -> i32 {
        match self {
            JiraFieldsError::Configuration { .. } => -32001,
            JiraFieldsError::Authentication { .. } => -32002,
            JiraFieldsError::Network { .. } => -32003,
            JiraFieldsError::Permission { .. } => -32004,
            JiraFieldsError::FieldValidation { .. } => -32006,
            JiraFieldsError::InvalidParameter { .. } => -32006,
            JiraFieldsError::Internal { .. } => -32603,
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            JiraFieldsError::Configuration { .. } => "configuration",
            JiraFieldsError::Authentication { .. } => "authentication",
            JiraFieldsError::Network { .. } => "network",
            JiraFieldsError::Permission { .. } => "permission",
            JiraFieldsError::FieldValidation { .. } => "field_validation",
            JiraFieldsError::InvalidParameter { .. } => "invalid_parameter",
            JiraFieldsError::Internal { .. } => "internal",
        }
    }

    /// HTTP status a toolkit route should answer with for this error
    pub fn http_status(&self) -> u16 {
        match self {
            JiraFieldsError::FieldValidation { .. } | JiraFieldsError::InvalidParameter { .. } => {
                400
            }
            JiraFieldsError::Authentication { .. } => 401,
            JiraFieldsError::Permission { .. } => 403,
            _ => 500,
        }
    }

    /// Whether the caller should ask the user to reconnect instead of fixing data
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, JiraFieldsError::Authentication { .. })
    }

    /// Get additional error data for MCP error responses
    pub fn error_data(&self) -> Option<Value> {
        let mut data = serde_json::Map::new();
        data.insert(
            "category".to_string(),
            Value::String(self.category().to_string()),
        );
        data.insert(
            "http_status".to_string(),
            Value::Number(self.http_status().into()),
        );

        match self {
            JiraFieldsError::FieldValidation { missing_fields } => {
                data.insert(
                    "missing_fields".to_string(),
                    Value::Array(
                        missing_fields
                            .iter()
                            .map(|name| Value::String(name.clone()))
                            .collect(),
                    ),
                );
                data.insert(
                    "details".to_string(),
                    serde_json::json!([
                        "Please verify the field names in your JIRA configuration.",
                        FIELD_ADMIN_HINT,
                    ]),
                );
            }
            JiraFieldsError::Authentication { .. } => {
                data.insert(
                    "details".to_string(),
                    serde_json::json!([
                        "Please check your credentials (username/token) and try reconnecting to JIRA.",
                        "Your JIRA session may have expired or the credentials may be invalid.",
                    ]),
                );
            }
            JiraFieldsError::InvalidParameter { parameter, .. } => {
                data.insert("parameter".to_string(), Value::String(parameter.clone()));
            }
            _ => {}
        }

        Some(Value::Object(data))
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        JiraFieldsError::Configuration {
            message: message.into(),
        }
    }

    /// Create an authentication error
    pub fn auth(message: impl Into<String>) -> Self {
        JiraFieldsError::Authentication {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        JiraFieldsError::Network {
            message: message.into(),
        }
    }

    /// Create a permission error
    pub fn permission(message: impl Into<String>) -> Self {
        JiraFieldsError::Permission {
            message: message.into(),
        }
    }

    /// Create a field validation error; names are sorted and de-duplicated
    pub fn missing_fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut missing_fields: Vec<String> = names.into_iter().map(Into::into).collect();
        missing_fields.sort();
        missing_fields.dedup();
        JiraFieldsError::FieldValidation { missing_fields }
    }

    /// Create an invalid parameter error
    pub fn invalid_param(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        JiraFieldsError::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        JiraFieldsError::Internal {
            message: message.into(),
        }
    }
}

/// Convert from gouqi errors to JiraFieldsError
///
/// Used for gouqi calls such as the session lookup. The field catalog is
/// classified by HTTP status in `jira_client::classify_field_catalog_response`.
impl From<gouqi::Error> for JiraFieldsError {
    fn from(err: gouqi::Error) -> Self {
        match err {
            gouqi::Error::Http(_) => JiraFieldsError::network(format!("HTTP error: {}", err)),
            gouqi::Error::IO(_) => JiraFieldsError::network(format!("IO error: {}", err)),
            gouqi::Error::Serde(_) => {
                JiraFieldsError::internal(format!("Serialization error: {}", err))
            }
            gouqi::Error::Unauthorized => JiraFieldsError::auth("JIRA authentication failed"),
            gouqi::Error::NotFound => JiraFieldsError::config(
                "JIRA REST endpoint not found. Check that JIRA_URL points at your JIRA site.",
            ),
            gouqi::Error::Fault { .. } => {
                JiraFieldsError::internal(format!("JIRA API error: {}", err))
            }
            _ => JiraFieldsError::internal(format!("JIRA client error: {}", err)),
        }
    }
}

/// Convert from serde_json errors
impl From<serde_json::Error> for JiraFieldsError {
    fn from(err: serde_json::Error) -> Self {
        JiraFieldsError::internal(format!("JSON error: {}", err))
    }
}

/// Convert from TOML parsing errors
impl From<toml::de::Error> for JiraFieldsError {
    fn from(err: toml::de::Error) -> Self {
        JiraFieldsError::config(format!("TOML parsing error: {}", err))
    }
}

/// Result type alias for JIRA Fields operations
pub type JiraFieldsResult<T> = Result<T, JiraFieldsError>;

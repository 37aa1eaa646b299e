//! Tools module for the JIRA Fields MCP Server
//!
//! Contains the MCP tools that expose field discovery and resolution.

pub mod list_fields;
pub mod resolve_custom_fields;

pub use list_fields::*;
pub use resolve_custom_fields::*;

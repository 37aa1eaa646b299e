//! JIRA Fields MCP Server - resolve JIRA field names to field ids via MCP

use jira_fields_mcp_server::JiraFieldsMcpServer;
use pulseengine_mcp_server::McpServerBuilder;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configure logging for STDIO transport
    JiraFieldsMcpServer::configure_stdio_logging();

    info!("Starting JIRA Fields MCP Server...");

    let server = match JiraFieldsMcpServer::new().await {
        Ok(server) => {
            info!("JIRA Fields MCP Server created successfully");
            server
        }
        Err(e) => {
            error!("Failed to create JIRA Fields MCP Server: {}", e);
            eprintln!("❌ Failed to start JIRA Fields MCP Server: {}", e);
            eprintln!("\nPlease check:");
            eprintln!("  - JIRA_URL environment variable is set");
            eprintln!("  - JIRA authentication is configured (JIRA_AUTH_TYPE, JIRA_TOKEN, etc.)");
            eprintln!("  - JIRA_CUSTOM_FIELDS, if set, is a JSON object");
            eprintln!("  - JIRA instance is accessible");
            std::process::exit(1);
        }
    };

    info!("Starting MCP server with STDIO transport...");

    let mut server = server.serve_stdio().await?;

    info!("JIRA Fields MCP Server is running and ready to serve requests");

    server.run().await?;

    Ok(())
}

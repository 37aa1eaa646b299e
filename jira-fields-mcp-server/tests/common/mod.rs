/// Common utilities for JIRA Fields MCP Server integration tests
pub mod fake_jira;

use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};

static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

const BINARY_CANDIDATES: [&str; 4] = [
    "target/debug/jira-fields-mcp-server",
    "target/release/jira-fields-mcp-server",
    "../target/debug/jira-fields-mcp-server",
    "../target/release/jira-fields-mcp-server",
];

/// MCP Test Client for sending JSON-RPC requests to the server
#[allow(dead_code)]
pub struct McpTestClient {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

#[allow(dead_code)]
impl McpTestClient {
    /// Create a new test client by spawning the server
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        // Load environment variables from .env file
        // Tests run from workspace root, so .env is in current directory
        dotenv::from_filename(".env").ok();

        // Get environment variables
        let jira_url = std::env::var("JIRA_URL")?;
        let jira_auth_type = std::env::var("JIRA_AUTH_TYPE")?;
        let jira_username = std::env::var("JIRA_USERNAME")?;
        let jira_password = std::env::var("JIRA_PASSWORD")?;

        // Spawn the server process
        // Try multiple possible locations for the binary
        let binary_path = BINARY_CANDIDATES
            .iter()
            .find(|path| std::path::Path::new(path).exists())
            .ok_or_else(|| {
                let cwd = std::env::current_dir().unwrap_or_default();
                format!(
                    "Server binary not found. Current dir: {:?}. Looked in target/debug and target/release",
                    cwd
                )
            })?;

        let mut child = Command::new(binary_path)
            .env("JIRA_URL", jira_url)
            .env("JIRA_AUTH_TYPE", jira_auth_type)
            .env("JIRA_USERNAME", jira_username)
            .env("JIRA_PASSWORD", jira_password)
            .env("RUST_LOG", "error")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let stdin = child.stdin.take().ok_or("Failed to open stdin")?;
        let stdout = child.stdout.take().ok_or("Failed to open stdout")?;

        let mut client = Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
        };

        // Initialize the session
        client.initialize()?;

        Ok(client)
    }

    /// Initialize the MCP session
    fn initialize(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 0,
            "method": "initialize",
            "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {
                    "name": "rust-test-client",
                    "version": "1.0.0"
                }
            }
        });

        self.send_request(&request)?;
        let response = self.read_response()?;

        // Verify initialization was successful
        if response.get("error").is_some() {
            return Err(format!("Initialization failed: {:?}", response["error"]).into());
        }

        Ok(())
    }

    /// Call an MCP tool
    pub fn call_tool(
        &mut self,
        tool_name: &str,
        arguments: Value,
    ) -> Result<Value, Box<dyn std::error::Error>> {
        let request_id = REQUEST_ID.fetch_add(1, Ordering::SeqCst);

        let request = json!({
            "jsonrpc": "2.0",
            "id": request_id,
            "method": "tools/call",
            "params": {
                "name": tool_name,
                "arguments": arguments
            }
        });

        self.send_request(&request)?;
        self.read_response()
    }

    fn send_request(&mut self, request: &Value) -> Result<(), Box<dyn std::error::Error>> {
        let request_str = serde_json::to_string(request)?;
        writeln!(self.stdin, "{}", request_str)?;
        self.stdin.flush()?;
        Ok(())
    }

    fn read_response(&mut self) -> Result<Value, Box<dyn std::error::Error>> {
        let mut line = String::new();
        self.stdout.read_line(&mut line)?;

        // EOF means the server exited
        if line.is_empty() {
            return Err("Server closed connection".into());
        }

        Ok(serde_json::from_str(&line)?)
    }

    /// Extract the tool result from the response
    pub fn extract_tool_result(response: &Value) -> Result<Value, String> {
        if let Some(error) = response.get("error") {
            return Err(format!("Tool call failed: {:?}", error));
        }

        let result = response.get("result").ok_or("No result in response")?;

        let text = result
            .get("content")
            .and_then(Value::as_array)
            .ok_or("No content array in result")?
            .iter()
            .find(|item| item.get("type") == Some(&Value::String("text".to_string())))
            .and_then(|item| item.get("text"))
            .and_then(Value::as_str)
            .ok_or("No text content found")?;

        // Tool failures come back as text with isError set
        if result.get("isError") == Some(&Value::Bool(true)) {
            return Err(text.to_string());
        }

        serde_json::from_str(text)
            .map_err(|e| format!("Failed to parse tool result JSON: {}. Text was: {}", e, text))
    }
}

impl Drop for McpTestClient {
    fn drop(&mut self) {
        // Kill the server process when the client is dropped
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Field name expected to exist on the test instance
#[allow(dead_code)]
pub fn test_field_name() -> String {
    std::env::var("TEST_FIELD_NAME").unwrap_or_else(|_| "Summary".to_string())
}

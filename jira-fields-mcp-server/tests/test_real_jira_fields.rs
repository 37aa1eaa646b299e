/// Live JIRA tests for the field tools
///
/// These spawn the server binary and talk to the instance configured in `.env`
/// (JIRA_URL, JIRA_AUTH_TYPE, JIRA_USERNAME, JIRA_PASSWORD). Run them with
/// `cargo test -- --ignored`.
mod common;

use common::{test_field_name, McpTestClient};
use serde_json::json;

#[test]
#[ignore = "requires a live JIRA instance"]
#[serial_test::serial]
fn test_list_fields_with_real_jira() {
    let mut client = McpTestClient::new().expect("Failed to create test client");

    let response = client
        .call_tool("list_fields", json!({}))
        .expect("Failed to list fields");
    let result = McpTestClient::extract_tool_result(&response).expect("Failed to extract result");

    println!("Found {} fields", result["total_count"]);
    assert!(result["total_count"].as_u64().unwrap() > 0);
    assert!(result["fields"][0]["id"].is_string());
    assert!(result["fields"][0]["name"].is_string());
}

#[test]
#[ignore = "requires a live JIRA instance"]
#[serial_test::serial]
fn test_resolve_known_field() {
    let mut client = McpTestClient::new().expect("Failed to create test client");
    let field_name = test_field_name();

    let response = client
        .call_tool(
            "resolve_custom_fields",
            json!({
                "custom_fields": {
                    "column": field_name.to_uppercase(),
                    "skipped": ""
                }
            }),
        )
        .expect("Failed to resolve fields");
    let result = McpTestClient::extract_tool_result(&response).expect("Failed to extract result");

    println!(
        "Resolution:\n{}",
        serde_json::to_string_pretty(&result).unwrap()
    );
    assert!(!result["field_ids"].as_array().unwrap().is_empty());
    assert!(result["columns"]["skipped"]["field_ids"]
        .as_array()
        .unwrap()
        .is_empty());
}

#[test]
#[ignore = "requires a live JIRA instance"]
#[serial_test::serial]
fn test_resolve_unknown_field_is_rejected() {
    let mut client = McpTestClient::new().expect("Failed to create test client");

    let response = client
        .call_tool(
            "resolve_custom_fields",
            json!({
                "custom_fields": {"column": "No Such Field 9f3c1"}
            }),
        )
        .expect("Tool call transport failed");

    let error = McpTestClient::extract_tool_result(&response)
        .expect_err("Unknown field should be rejected");
    assert!(error.contains("No Such Field 9f3c1"), "{}", error);
}

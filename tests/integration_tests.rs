//! Integration tests for the Code Operation MCP Server
//!
//! These tests drive the server through its JSON-RPC message handler and
//! exercise the file tools against real files in temporary directories.

use std::sync::Arc;

use serde_json::{json, Value};

use code_ops_mcp_server::config::Config;
use code_ops_mcp_server::fsops::ops::FileOps;
use code_ops_mcp_server::mcp::server::McpServer;

/// Helper to create a JSON-RPC request string
fn make_request(id: i64, method: &str, params: Option<Value>) -> String {
    let mut request = json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
    });
    if let Some(p) = params {
        request["params"] = p;
    }
    request.to_string()
}

fn server() -> McpServer {
    McpServer::new(Arc::new(FileOps::new(Config::new())))
}

/// Send one message and return the response JSON
async fn roundtrip(srv: &mut McpServer, message: &str) -> Value {
    let response = srv
        .handle_message(message)
        .await
        .expect("handler must not fail")
        .expect("expected a response");
    serde_json::to_value(response).unwrap()
}

/// Call a tool and return (is_error, text)
async fn call_tool(srv: &mut McpServer, name: &str, arguments: Value) -> (bool, String) {
    let message = make_request(
        99,
        "tools/call",
        Some(json!({"name": name, "arguments": arguments})),
    );
    let response = roundtrip(srv, &message).await;
    assert!(
        response["error"].is_null(),
        "tool failures must be in-band, got {}",
        response
    );
    let result = &response["result"];
    let is_error = result["isError"].as_bool().unwrap_or(false);
    let text = result["content"][0]["text"].as_str().unwrap().to_string();
    (is_error, text)
}

mod mcp_protocol_tests {
    use super::*;

    #[tokio::test]
    async fn test_initialize() {
        let mut srv = server();
        let response = roundtrip(&mut srv, &make_request(1, "initialize", None)).await;

        assert_eq!(response["jsonrpc"], "2.0");
        assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(response["result"]["serverInfo"]["name"], "code-ops");
        assert!(response["result"]["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_ping() {
        let mut srv = server();
        let response = roundtrip(&mut srv, &make_request(2, "ping", None)).await;
        assert!(response["result"].is_object());
        assert!(response["error"].is_null());
    }

    #[tokio::test]
    async fn test_list_tools() {
        let mut srv = server();
        let response = roundtrip(&mut srv, &make_request(3, "tools/list", None)).await;

        let tools = response["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 4);

        for tool in tools {
            // Every tool is documented and every parameter carries a type
            // and a description
            assert!(tool["description"].is_string());
            let props = tool["inputSchema"]["properties"].as_object().unwrap();
            assert!(!props.is_empty());
            for (_, param) in props {
                assert!(param["type"].is_string());
                assert!(param["description"].is_string());
            }
        }
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let mut srv = server();
        let response = roundtrip(&mut srv, &make_request(4, "prompts/list", None)).await;
        assert_eq!(response["error"]["code"], -32601);
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let mut srv = server();
        let response = roundtrip(&mut srv, "this is not json").await;
        assert_eq!(response["error"]["code"], -32700);
    }

    #[tokio::test]
    async fn test_call_tool_without_params() {
        let mut srv = server();
        let response = roundtrip(&mut srv, &make_request(5, "tools/call", None)).await;
        assert!(response["error"].is_null());
        assert_eq!(response["result"]["isError"], true);
    }
}

mod file_tool_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes/todo.txt").display().to_string();
        let mut srv = server();

        let (is_error, text) = call_tool(
            &mut srv,
            "create_file",
            json!({"file_path": path, "content": "first\nsecond\nthird\n"}),
        )
        .await;
        assert!(!is_error, "{}", text);
        assert!(text.contains("Created new file"));
        assert!(text.contains("Created directories"));

        let (is_error, text) = call_tool(
            &mut srv,
            "read_text_file",
            json!({"file_path": path, "start_line": 2, "count": 2}),
        )
        .await;
        assert!(!is_error, "{}", text);
        assert!(text.contains("Total lines: 3"));
        assert!(text.contains("2: second"));
        assert!(text.contains("3: third"));
        assert!(!text.contains("1: first"));
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let mut srv = server();
        let (is_error, text) = call_tool(
            &mut srv,
            "read_text_file",
            json!({"file_path": "/no/such/file.txt"}),
        )
        .await;
        assert!(is_error);
        assert!(text.contains("/no/such/file.txt"));
    }

    #[tokio::test]
    async fn test_read_rejects_large_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "x\n").unwrap();
        let mut srv = server();

        let (is_error, text) = call_tool(
            &mut srv,
            "read_text_file",
            json!({"file_path": path.display().to_string(), "count": 500}),
        )
        .await;
        assert!(is_error);
        assert!(text.contains("100"));
    }

    #[tokio::test]
    async fn test_replace_lines_and_extend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "one\ntwo\n").unwrap();
        let mut srv = server();

        let (is_error, text) = call_tool(
            &mut srv,
            "replace_code_by_line",
            json!({
                "file_path": path.display().to_string(),
                "replacements": [
                    {"line": 2, "code": "TWO"},
                    {"line": 4, "code": "FOUR"}
                ]
            }),
        )
        .await;
        assert!(!is_error, "{}", text);
        assert!(text.contains("Original line count: 2"));
        assert!(text.contains("Lines added: 2"));
        assert!(text.contains("Lines replaced: 2"));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "one\nTWO\n\nFOUR\n"
        );
    }

    #[tokio::test]
    async fn test_replace_rejects_duplicate_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "one\n").unwrap();
        let mut srv = server();

        let (is_error, text) = call_tool(
            &mut srv,
            "replace_code_by_line",
            json!({
                "file_path": path.display().to_string(),
                "replacements": [
                    {"line": 1, "code": "a"},
                    {"line": 1, "code": "b"}
                ]
            }),
        )
        .await;
        assert!(is_error);
        assert!(text.contains("more than once"));
        // Nothing was written
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\n");
    }

    #[tokio::test]
    async fn test_search_exact_and_regex() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("code.rs");
        std::fs::write(&path, "fn alpha() {}\nfn beta() {}\nconst N: u8 = 3;\n").unwrap();
        let mut srv = server();
        let path = path.display().to_string();

        let (is_error, text) = call_tool(
            &mut srv,
            "search_in_file",
            json!({"file_path": path, "search_text": "fn "}),
        )
        .await;
        assert!(!is_error, "{}", text);
        assert!(text.contains("Total matches: 2"));
        assert!(text.contains("line 1: fn alpha() {}"));

        let (is_error, text) = call_tool(
            &mut srv,
            "search_in_file",
            json!({
                "file_path": path,
                "search_text": r"fn \w+\(\)",
                "match_type": "regex"
            }),
        )
        .await;
        assert!(!is_error, "{}", text);
        assert!(text.contains("Match type: regex"));
        assert!(text.contains("Total matches: 2"));
    }

    #[tokio::test]
    async fn test_search_no_matches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "nothing here\n").unwrap();
        let mut srv = server();

        let (is_error, text) = call_tool(
            &mut srv,
            "search_in_file",
            json!({"file_path": path.display().to_string(), "search_text": "unicorn"}),
        )
        .await;
        assert!(!is_error, "{}", text);
        assert!(text.contains("Total matches: 0"));
        assert!(text.contains("No matches found"));
    }

    #[tokio::test]
    async fn test_search_bad_regex() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "x\n").unwrap();
        let mut srv = server();

        let (is_error, text) = call_tool(
            &mut srv,
            "search_in_file",
            json!({
                "file_path": path.display().to_string(),
                "search_text": "(unclosed",
                "match_type": "regex"
            }),
        )
        .await;
        assert!(is_error);
        assert!(text.contains("Regex"));
    }
}

mod lua_check_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_valid_lua_reports_ok() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("good.lua").display().to_string();
        let mut srv = server();

        let (is_error, text) = call_tool(
            &mut srv,
            "create_file",
            json!({"file_path": path, "content": "local function hi()\n  print('hi')\nend\nhi()\n"}),
        )
        .await;
        assert!(!is_error, "{}", text);
        assert!(text.contains("Lua syntax check:"));
        assert!(text.contains("Syntax OK"));
    }

    #[tokio::test]
    async fn test_create_broken_lua_reports_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.lua").display().to_string();
        let mut srv = server();

        let (is_error, text) = call_tool(
            &mut srv,
            "create_file",
            json!({"file_path": path, "content": "local function broken(\nprint('x'\n"}),
        )
        .await;
        // The file is still created; the check result rides along
        assert!(!is_error, "{}", text);
        assert!(text.contains("Syntax errors found:"));
    }

    #[tokio::test]
    async fn test_create_blank_lua_skips_check() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.lua").display().to_string();
        let mut srv = server();

        let (is_error, text) =
            call_tool(&mut srv, "create_file", json!({"file_path": path})).await;
        assert!(!is_error, "{}", text);
        assert!(text.contains("syntax check skipped"));
    }

    #[tokio::test]
    async fn test_replace_in_lua_rechecks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edit.lua");
        std::fs::write(&path, "local x = 1\nprint(x)\n").unwrap();
        let mut srv = server();

        let (is_error, text) = call_tool(
            &mut srv,
            "replace_code_by_line",
            json!({
                "file_path": path.display().to_string(),
                "replacements": [{"line": 1, "code": "local x = "}]
            }),
        )
        .await;
        assert!(!is_error, "{}", text);
        assert!(text.contains("Lua syntax check:"));
        assert!(text.contains("Syntax errors found:"));
    }
}

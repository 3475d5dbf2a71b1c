use std::sync::Arc;
use crate::categories::{CategoriesResource, CATEGORIES_MIME, CATEGORIES_URI};
use crate::expense::{DateRange, NewExpense};
use crate::service::{ExpenseService, Payload, SummarizeRequest};
use mcp_sdk_rs::server::{Server, ServerHandler};
use mcp_sdk_rs::types::{
    Tool, ToolResult, ListToolsResult,
    Implementation, ClientCapabilities, ServerCapabilities
};
use mcp_sdk_rs::error::ErrorCode;
use mcp_sdk_rs::transport::stdio::StdioTransport;
use mcp_sdk_rs::error::Error;
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use serde::Deserialize;

#[derive(Deserialize)]
struct CallToolRequest {
    name: String,
    arguments: Option<Value>,
}

#[derive(Deserialize)]
struct ReadResourceRequest {
    uri: String,
}

/// MCP handler exposing the expense tools and the categories resource
#[derive(Clone)]
pub struct McpService {
    service: ExpenseService,
    categories: CategoriesResource,
}

impl McpService {
    pub fn new(service: ExpenseService, categories: CategoriesResource) -> Self {
        Self { service, categories }
    }

    pub async fn run_stdio(&self) -> anyhow::Result<()> {
        let (read_tx, read_rx) = mpsc::channel::<String>(32);
        let (write_tx, mut write_rx) = mpsc::channel::<String>(32);

        // Stdin reader
        tokio::spawn(async move {
            let stdin = tokio::io::stdin();
            let mut reader = BufReader::new(stdin).lines();
            while let Ok(Some(line)) = reader.next_line().await {
                if read_tx.send(line).await.is_err() {
                    break;
                }
            }
        });

        // Stdout writer
        tokio::spawn(async move {
            let mut stdout = tokio::io::stdout();
            while let Some(msg) = write_rx.recv().await {
                let _ = stdout.write_all(msg.as_bytes()).await;
                let _ = stdout.write_all(b"\n").await;
                let _ = stdout.flush().await;
            }
        });

        tracing::info!("MCP server listening on stdio");
        let transport = StdioTransport::new(read_rx, write_tx);
        let server = Server::new(Arc::new(transport), Arc::new(self.clone()));
        server.start().await?;
        Ok(())
    }

    /// Run one tool and return its payload.
    ///
    /// Bad arguments and operation failures both come back as an error
    /// payload. `Err` is reserved for an unknown tool name.
    pub fn call_tool(&self, name: &str, arguments: Value) -> Result<Value, Error> {
        let payload = match name {
            "add_expense" => Payload::from(
                parse_args::<NewExpense>(arguments).and_then(|expense| self.service.add_expense(&expense)),
            )
            .into_value(),
            "list_expenses" => Payload::from(
                parse_args::<DateRange>(arguments).and_then(|range| self.service.list_expenses(&range)),
            )
            .into_value(),
            "summarize" => Payload::from(parse_args::<SummarizeRequest>(arguments).and_then(|req| {
                self.service.summarize(&req.range(), req.category.as_deref())
            }))
            .into_value(),
            other => return Err(Error::protocol(ErrorCode::MethodNotFound, other.to_string())),
        };
        Ok(payload)
    }

    fn tools() -> Result<Vec<Tool>, Error> {
        let range_properties = json!({
            "start_date": { "type": "string", "description": "Inclusive start, YYYY-MM-DD" },
            "end_date": { "type": "string", "description": "Inclusive end, YYYY-MM-DD" }
        });

        Ok(vec![
            Tool {
                name: "add_expense".to_string(),
                description: "Add a new expense entry to the database".to_string(),
                input_schema: schema(json!({
                    "type": "object",
                    "properties": {
                        "date": { "type": "string" },
                        "amount": { "type": "number" },
                        "category": { "type": "string" },
                        "subcategory": { "type": "string" },
                        "note": { "type": "string" }
                    },
                    "required": ["date", "amount", "category"]
                }))?,
                annotations: None,
            },
            Tool {
                name: "list_expenses".to_string(),
                description: "List expense entries within an inclusive date range".to_string(),
                input_schema: schema(json!({
                    "type": "object",
                    "properties": range_properties.clone(),
                    "required": ["start_date", "end_date"]
                }))?,
                annotations: None,
            },
            Tool {
                name: "summarize".to_string(),
                description: "Summarize expenses by category within an inclusive date range".to_string(),
                input_schema: schema(json!({
                    "type": "object",
                    "properties": {
                        "start_date": range_properties["start_date"].clone(),
                        "end_date": range_properties["end_date"].clone(),
                        "category": { "type": "string" }
                    },
                    "required": ["start_date", "end_date"]
                }))?,
                annotations: None,
            },
        ])
    }

    fn read_resource(&self, uri: &str) -> Result<Value, Error> {
        if uri != CATEGORIES_URI {
            return Err(Error::protocol(ErrorCode::InvalidParams, format!("Unknown resource: {}", uri)));
        }
        Ok(json!({
            "contents": [{
                "uri": CATEGORIES_URI,
                "mimeType": CATEGORIES_MIME,
                "text": self.categories.read(),
            }]
        }))
    }
}

fn schema<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, Error> {
    serde_json::from_value(value).map_err(|e| Error::protocol(ErrorCode::ParseError, e.to_string()))
}

fn parse_args<T: serde::de::DeserializeOwned>(arguments: Value) -> crate::Result<T> {
    serde_json::from_value(arguments).map_err(|e| crate::Error::InvalidInput(e.to_string()))
}

#[async_trait]
impl ServerHandler for McpService {
    async fn initialize(
        &self,
        _implementation: Implementation,
        _capabilities: ClientCapabilities
    ) -> Result<ServerCapabilities, Error> {
        Ok(ServerCapabilities::default())
    }

    async fn shutdown(&self) -> Result<(), Error> {
        Ok(())
    }

    async fn handle_method(&self, method: &str, params: Option<Value>) -> Result<Value, Error> {
        match method {
            "tools/list" => {
                let result = ListToolsResult { tools: Self::tools()?, next_cursor: None };
                serde_json::to_value(result).map_err(|e| Error::protocol(ErrorCode::InternalError, e.to_string()))
            },
            "tools/call" => {
                let req: CallToolRequest = params.and_then(|v| serde_json::from_value(v).ok())
                    .ok_or(Error::protocol(ErrorCode::InvalidParams, "Missing params"))?;

                tracing::debug!(tool = %req.name, "tool call");
                let payload = self.call_tool(&req.name, req.arguments.unwrap_or_else(|| json!({})))?;

                let result = ToolResult {
                    content: Vec::new(),
                    structured_content: Some(payload),
                };
                serde_json::to_value(result).map_err(|e| Error::protocol(ErrorCode::InternalError, e.to_string()))
            },
            "resources/list" => Ok(json!({
                "resources": [{
                    "uri": CATEGORIES_URI,
                    "name": "categories",
                    "mimeType": CATEGORIES_MIME,
                }]
            })),
            "resources/read" => {
                let req: ReadResourceRequest = params.and_then(|v| serde_json::from_value(v).ok())
                    .ok_or(Error::protocol(ErrorCode::InvalidParams, "Missing params"))?;
                self.read_resource(&req.uri)
            },
            _ => Err(Error::protocol(ErrorCode::MethodNotFound, method.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::ExpenseStore;
    use tempfile::TempDir;

    fn temp_mcp() -> (TempDir, McpService) {
        let dir = tempfile::tempdir().unwrap();
        let store = ExpenseStore::new(dir.path().join("expenses.db"));
        store.initialize().unwrap();
        let categories = CategoriesResource::new(dir.path().join("categories.json"));
        (dir, McpService::new(ExpenseService::new(store), categories))
    }

    #[tokio::test]
    async fn test_tools_list() {
        let (_dir, mcp) = temp_mcp();
        let result = mcp.handle_method("tools/list", None).await.unwrap();
        let names: Vec<&str> = result["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["add_expense", "list_expenses", "summarize"]);
    }

    #[test]
    fn test_tool_round_trip() {
        let (_dir, mcp) = temp_mcp();
        let added = mcp
            .call_tool("add_expense", json!({ "date": "2024-01-05", "amount": 12.5, "category": "food" }))
            .unwrap();
        assert_eq!(added["status"], "success");

        let listed = mcp
            .call_tool("list_expenses", json!({ "start_date": "2024-01-01", "end_date": "2024-01-31" }))
            .unwrap();
        assert_eq!(listed[0]["id"], added["id"]);
        assert_eq!(listed[0]["note"], "");

        let summary = mcp
            .call_tool("summarize", json!({ "start_date": "2024-01-01", "end_date": "2024-01-31" }))
            .unwrap();
        assert_eq!(summary[0]["category"], "food");
        assert_eq!(summary[0]["count"], 1);
    }

    #[test]
    fn test_unknown_tool_is_protocol_error() {
        let (_dir, mcp) = temp_mcp();
        assert!(mcp.call_tool("delete_expense", json!({})).is_err());
    }

    #[test]
    fn test_amount_as_numeric_string() {
        let (_dir, mcp) = temp_mcp();
        let added = mcp
            .call_tool("add_expense", json!({ "date": "2024-01-05", "amount": "12.5", "category": "food" }))
            .unwrap();
        assert_eq!(added["status"], "success");

        let listed = mcp
            .call_tool("list_expenses", json!({ "start_date": "2024-01-05", "end_date": "2024-01-05" }))
            .unwrap();
        assert_eq!(listed[0]["amount"], 12.5);
    }

    #[test]
    fn test_bad_arguments_become_error_payload() {
        let (_dir, mcp) = temp_mcp();
        let cases = vec![
            ("add_expense", json!({ "date": "2024-01-05", "amount": "abc", "category": "food" })),
            ("add_expense", json!({ "date": "2024-01-05", "category": "food" })),
            ("list_expenses", json!({ "start_date": "2024-01-01" })),
            ("summarize", json!({ "start_date": 20240101, "end_date": "2024-01-31" })),
        ];

        for (tool, arguments) in cases {
            let payload = mcp.call_tool(tool, arguments).unwrap();
            assert_eq!(payload["status"], "error", "{} should fail", tool);
            assert!(!payload["message"].as_str().unwrap().is_empty());
        }

        // Nothing was written by the rejected insert
        let listed = mcp
            .call_tool("list_expenses", json!({ "start_date": "0000", "end_date": "9999" }))
            .unwrap();
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn test_tools_call_dispatch() {
        let (_dir, mcp) = temp_mcp();
        let params = json!({
            "name": "add_expense",
            "arguments": { "date": "2024-01-05", "amount": 3, "category": "misc" }
        });
        assert!(mcp.handle_method("tools/call", Some(params)).await.is_ok());
        assert!(mcp.handle_method("tools/call", None).await.is_err());
    }

    #[tokio::test]
    async fn test_read_categories_resource() {
        let (_dir, mcp) = temp_mcp();
        let result = mcp
            .handle_method("resources/read", Some(json!({ "uri": CATEGORIES_URI })))
            .await
            .unwrap();
        let content = &result["contents"][0];
        assert_eq!(content["mimeType"], CATEGORIES_MIME);

        let body: Value = serde_json::from_str(content["text"].as_str().unwrap()).unwrap();
        assert_eq!(body["categories"].as_array().unwrap().len(), 11);

        assert!(mcp
            .handle_method("resources/read", Some(json!({ "uri": "expense:///other" })))
            .await
            .is_err());
    }
}

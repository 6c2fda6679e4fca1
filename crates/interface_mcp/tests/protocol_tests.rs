//! JSON-RPC dispatch and stdio transport tests

mod common;

use serde_json::{json, Value};

use interface_mcp::protocol::{error_codes, latest_protocol_version, methods, JsonRpcResponse};
use interface_mcp::stdio;

use common::Harness;

mod dispatch {
    use super::*;

    #[tokio::test]
    async fn test_initialize_echoes_supported_version() {
        let harness = Harness::new().await;
        let response = harness
            .request(
                methods::INITIALIZE,
                json!({
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": {"name": "test-client", "version": "0.1.0"}
                }),
            )
            .await;

        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], json!("2024-11-05"));
        assert_eq!(result["capabilities"]["tools"]["listChanged"], json!(false));
        assert_eq!(result["serverInfo"]["name"], json!("reintegros-mcp"));
    }

    #[tokio::test]
    async fn test_initialize_offers_latest_for_unknown_version() {
        let harness = Harness::new().await;
        let response = harness
            .request(methods::INITIALIZE, json!({"protocolVersion": "2000-01-01"}))
            .await;
        assert_eq!(
            response.result.unwrap()["protocolVersion"],
            json!(latest_protocol_version())
        );
    }

    #[tokio::test]
    async fn test_tools_list_advertises_standard_tools() {
        let harness = Harness::new().await;
        let response = harness.request(methods::LIST_TOOLS, Value::Null).await;
        let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();

        let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
        for expected in [
            "afiliado_por_dni",
            "get_id_practica_por_nombre",
            "practicas_cubiertas",
            "iniciar_reintegro",
            "agregar_item_a_reintegro",
            "adjuntar_documentos_a_reintegro",
            "listar_reintegros_afiliado",
            "detalle_reintegro",
            "generar_nota_reintegro",
        ] {
            assert!(names.contains(&expected), "missing tool {}", expected);
        }
        assert!(!names.contains(&"enviar_reintegro_a_revision"));

        for tool in &tools {
            assert_eq!(tool["inputSchema"]["type"], json!("object"));
            assert!(!tool["description"].as_str().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let harness = Harness::new().await;
        let response = harness.request("resources/list", Value::Null).await;
        assert_eq!(response.error.unwrap().code, error_codes::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_invalid_params() {
        let harness = Harness::new().await;
        let response = harness
            .request(methods::CALL_TOOL, json!({"name": "borrar_reintegro", "arguments": {}}))
            .await;
        assert_eq!(response.error.unwrap().code, error_codes::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_missing_tool_name_is_invalid_params() {
        let harness = Harness::new().await;
        let response = harness
            .request(methods::CALL_TOOL, json!({"arguments": {}}))
            .await;
        assert_eq!(response.error.unwrap().code, error_codes::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_unparseable_message_has_null_id() {
        let harness = Harness::new().await;
        let response = harness.server.handle_message("{not json").await.unwrap();
        assert_eq!(response.id, Value::Null);
        assert_eq!(response.error.unwrap().code, error_codes::PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_request_without_method_is_invalid() {
        let harness = Harness::new().await;
        let response = harness
            .server
            .handle_message(r#"{"jsonrpc":"2.0","id":5}"#)
            .await
            .unwrap();
        assert_eq!(response.id, json!(5));
        assert_eq!(response.error.unwrap().code, error_codes::INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_tool_failure_is_a_result_not_an_error() {
        let harness = Harness::new().await;
        let response = harness
            .request(
                methods::CALL_TOOL,
                json!({"name": "adjuntar_documentos_a_reintegro", "arguments": {"reintegro_id": 404}}),
            )
            .await;
        assert!(response.error.is_none());
        assert_eq!(response.result.unwrap()["isError"], json!(true));
    }
}

mod stdio_transport {
    use super::*;

    fn decode(output: &[u8]) -> Vec<JsonRpcResponse> {
        std::str::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_one_response_per_request_line() {
        let harness = Harness::new().await;
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-03-26"}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"iniciar_reintegro","arguments":{"afiliado_id":42}}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":3,"method":"ping"}"#,
            "\n",
        );
        let mut output = Vec::new();

        stdio::serve(&harness.server, input.as_bytes(), &mut output)
            .await
            .unwrap();

        let responses = decode(&output);
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0].id, json!(1));
        assert_eq!(
            responses[0].result.as_ref().unwrap()["protocolVersion"],
            json!("2025-03-26")
        );
        assert_eq!(responses[1].id, json!(2));
        assert_eq!(
            responses[1].result.as_ref().unwrap()["content"][0]["text"],
            json!("1")
        );
        assert_eq!(responses[2].result, Some(json!({})));
    }

    #[tokio::test]
    async fn test_bad_line_does_not_stop_the_loop() {
        let harness = Harness::new().await;
        let input = "garbage\n{\"jsonrpc\":\"2.0\",\"id\":9,\"method\":\"ping\"}\n";
        let mut output = Vec::new();

        stdio::serve(&harness.server, input.as_bytes(), &mut output)
            .await
            .unwrap();

        let responses = decode(&output);
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].error.as_ref().unwrap().code, error_codes::PARSE_ERROR);
        assert_eq!(responses[1].id, json!(9));
    }

    #[tokio::test]
    async fn test_latin1_line_gets_parse_error_and_loop_continues() {
        let harness = Harness::new().await;
        let mut input: Vec<u8> = Vec::new();
        input.extend_from_slice(
            br#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"get_id_practica_por_nombre","arguments":{"nombre":"radiograf"#,
        );
        input.push(0xED);
        input.extend_from_slice(b"a\"}}}\n");
        input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":9,\"method\":\"ping\"}\n");
        let mut output = Vec::new();

        stdio::serve(&harness.server, input.as_slice(), &mut output)
            .await
            .unwrap();

        let responses = decode(&output);
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].id, Value::Null);
        assert_eq!(responses[0].error.as_ref().unwrap().code, error_codes::PARSE_ERROR);
        assert_eq!(responses[1].id, json!(9));
        assert_eq!(responses[1].result, Some(json!({})));
    }
}

//! HTTP transport and note service client tests

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceExt;

use core_kernel::{HealthCheckResult, HealthCheckable};
use interface_mcp::config::ServerConfig;
use interface_mcp::handlers::mcp::SESSION_HEADER;
use interface_mcp::notes::NotesClient;
use interface_mcp::{create_router, AppState, ToolError};

use common::Harness;

struct DownAdapter;

#[async_trait::async_trait]
impl HealthCheckable for DownAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::unhealthy("postgres-reintegros-adapter", 5000, "pool timed out")
    }
}

async fn router() -> Router {
    let harness = Harness::new().await;
    create_router(AppState {
        server: Arc::new(harness.server),
        health: harness.store,
    })
}

fn post_mcp(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/mcp")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

mod mcp_endpoint {
    use super::*;

    #[tokio::test]
    async fn test_initialize_issues_session_id() {
        let response = router()
            .await
            .oneshot(post_mcp(
                r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-06-18"}}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let session = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap();
        assert!(uuid::Uuid::parse_str(&session).is_ok());

        let body = json_body(response).await;
        assert_eq!(body["result"]["protocolVersion"], json!("2025-06-18"));
    }

    #[tokio::test]
    async fn test_failed_initialize_gets_no_session_id() {
        let response = router()
            .await
            .oneshot(post_mcp(
                r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":5}}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(SESSION_HEADER).is_none());
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], json!(-32602));
    }

    #[tokio::test]
    async fn test_other_methods_get_no_session_id() {
        for body in [
            r#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#,
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/list"}"#,
        ] {
            let response = router().await.oneshot(post_mcp(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert!(response.headers().get(SESSION_HEADER).is_none());
        }
    }

    #[tokio::test]
    async fn test_tool_call_over_http() {
        let response = router()
            .await
            .oneshot(post_mcp(
                r#"{"jsonrpc":"2.0","id":"a","method":"tools/call","params":{"name":"afiliado_por_dni","arguments":{"tipo_doc":"DNI","nro_doc":"30123456"}}}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(SESSION_HEADER).is_none());
        let body = json_body(response).await;
        assert_eq!(body["id"], json!("a"));
        let text = body["result"]["content"][0]["text"].as_str().unwrap();
        let afiliado: Value = serde_json::from_str(text).unwrap();
        assert_eq!(afiliado["afiliado_id"], json!(42));
    }

    #[tokio::test]
    async fn test_notification_is_accepted_without_body() {
        let response = router()
            .await
            .oneshot(post_mcp(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_parse_error_is_a_json_rpc_error() {
        let response = router().await.oneshot(post_mcp("{oops")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], json!(-32700));
        assert_eq!(body["id"], Value::Null);
    }
}

mod health {
    use super::*;

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_liveness() {
        let response = router().await.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], json!("healthy"));
    }

    #[tokio::test]
    async fn test_ready_when_adapter_healthy() {
        let response = router().await.oneshot(get("/health/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], json!("ready"));
        assert_eq!(body["adapter"]["adapter_id"], json!("in-memory-store"));
    }

    #[tokio::test]
    async fn test_unavailable_when_adapter_down() {
        let harness = Harness::new().await;
        let app = create_router(AppState {
            server: Arc::new(harness.server),
            health: Arc::new(DownAdapter),
        });

        let response = app.oneshot(get("/health/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response).await;
        assert_eq!(body["adapter"]["message"], json!("pool timed out"));
    }
}

mod notes_service {
    use super::*;

    /// Starts a stand-in note service and returns its base URL
    async fn spawn_notes_service(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn echo_service() -> Router {
        Router::new().route(
            "/reintegros/generar-nota",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "nota": format!("Solicito: {}", body["motivo"].as_str().unwrap_or_default()),
                    "afiliado_numero": body["afiliado_numero"],
                }))
            }),
        )
    }

    #[tokio::test]
    async fn test_client_posts_motivo_and_afiliado() {
        let base_url = spawn_notes_service(echo_service()).await;
        let client = NotesClient::new(&base_url, Duration::from_secs(5)).unwrap();

        let nota = client.generar_nota("Cobertura de lentes", "42").await.unwrap();
        assert_eq!(nota["nota"], json!("Solicito: Cobertura de lentes"));
        assert_eq!(nota["afiliado_numero"], json!("42"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_downstream_error() {
        let failing = Router::new().route(
            "/reintegros/generar-nota",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base_url = spawn_notes_service(failing).await;
        let client = NotesClient::new(&base_url, Duration::from_secs(5)).unwrap();

        let err = client.generar_nota("x", "42").await.unwrap_err();
        assert!(matches!(err, ToolError::Downstream(_)));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_tool_returns_service_json_untouched() {
        let base_url = spawn_notes_service(echo_service()).await;
        let harness = Harness::build(ServerConfig::default(), &base_url).await;

        let nota = harness
            .call_ok(
                "generar_nota_reintegro",
                json!({"motivo": "Reintegro fuera de término", "numero_afiliado": "42"}),
            )
            .await;
        assert_eq!(nota["nota"], json!("Solicito: Reintegro fuera de término"));
    }
}

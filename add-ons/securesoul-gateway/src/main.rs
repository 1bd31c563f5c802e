//! SecureSoul Gateway: chat UI and assistant API on a single port.
//!
//! `securesoul-gateway` serves HTTP. `securesoul-gateway --chat` runs the same assistant in the terminal.

mod actions;
mod handlers;
mod terminal;

use actions::Pipeline;
use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, Request},
    middleware::{self, Next},
    response::{Html, Response},
    routing::{get, post},
    Router,
};
use securesoul_core::{build_model, SoulConfig};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: Arc<SoulConfig>,
    pub(crate) pipeline: Arc<Pipeline>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let chat_mode = std::env::args().any(|a| a == "--chat");

    let config = SoulConfig::load()?;
    // Terminal chat keeps stdout for the conversation.
    let default_level = if chat_mode { "warn" } else { "info" };
    let _log_guard = init_tracing(default_level, config.log_dir.as_deref());

    let model = build_model(&config)?;
    let pipeline = Arc::new(Pipeline::from_config(model, &config));

    if chat_mode {
        terminal::run(pipeline).await?;
        return Ok(());
    }

    let addr = config.bind_addr();
    let state = AppState {
        config: Arc::new(config),
        pipeline,
    };
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        target: "securesoul::gateway",
        version = securesoul_core::version(),
        "SecureSoul gateway listening on http://{}",
        addr
    );
    axum::serve(listener, app).await?;
    Ok(())
}

/// Console logging, plus a daily rolling file under `log_dir` when set.
fn init_tracing(default_level: &str, log_dir: Option<&str>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "securesoul-gateway.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();
    guard
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o.trim()) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(target: "securesoul::gateway", origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

fn build_app(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health))
        .route("/", get(serve_chat_ui))
        .route("/api/domains", get(handlers::domains::list_domains))
        .route("/api/message", post(handlers::chat::post_message))
        .route("/api/audio", post(handlers::chat::post_audio))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(middleware::from_fn(log_requests))
}

async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();
    let response = next.run(request).await;
    tracing::info!(
        target: "securesoul::gateway",
        %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}

async fn health() -> &'static str {
    "OK"
}

/// Chat UI: persona tabs, voice recording, emergency banner.
async fn serve_chat_ui() -> Html<&'static str> {
    const INDEX: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/static/index.html"));
    Html(INDEX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use securesoul_core::{DataUri, MockModel};
    use tower::ServiceExt;

    fn test_config() -> SoulConfig {
        SoulConfig {
            app_name: "Test Soul".to_string(),
            max_body_bytes: 64 * 1024,
            cors_origins: vec!["http://localhost:3000".to_string()],
            ..SoulConfig::default()
        }
    }

    fn test_app() -> Router {
        let config = test_config();
        let pipeline = Pipeline::from_config(Arc::new(MockModel), &config);
        build_app(AppState {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
        })
    }

    async fn post_json(app: Router, uri: &str, body: String) -> (StatusCode, serde_json::Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let res = test_app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn index_serves_chat_ui() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let res = test_app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("/api/domains"));
        assert!(html.contains("MediaRecorder"));
        assert!(html.contains("src=\"${escapeHtml(m.audio)}\""));
    }

    #[tokio::test]
    async fn domains_lists_personas_with_seeded_threads() {
        let req = Request::builder().uri("/api/domains").body(Body::empty()).unwrap();
        let res = test_app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["appName"], "Test Soul");
        assert_eq!(json["emergencyContacts"][0]["number"], "100");
        let domains = json["domains"].as_array().unwrap();
        assert_eq!(domains.len(), 4);
        assert_eq!(domains[0]["persona"], "Sheny");
        assert_eq!(domains[1]["domain"], "Legal");
        assert_eq!(domains[3]["theme"], "theme-safety");
        assert_eq!(domains[2]["initialState"]["messages"][0]["role"], "assistant");
        assert_eq!(domains[2]["initialState"]["isEmergency"], false);
    }

    #[tokio::test]
    async fn message_is_answered() {
        let body = serde_json::json!({ "query": "How do I apply for a scholarship?", "domain": "Government Schemes" });
        let (status, json) = post_json(test_app(), "/api/message", body.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["isEmergency"], false);
        assert_eq!(json["domain"], "Government Schemes");
        assert!(json["response"].as_str().unwrap().contains("scholarship"));
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn panic_message_is_routed_to_safety() {
        let body = serde_json::json!({ "query": "Emergency! someone broke in", "domain": "Legal" });
        let (status, json) = post_json(test_app(), "/api/message", body.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["isEmergency"], true);
        assert_eq!(json["intent"], "Panic");
        assert_eq!(json["domain"], "Safety");
    }

    #[tokio::test]
    async fn blank_message_is_a_data_format_error() {
        let body = serde_json::json!({ "query": "  ", "domain": "Legal" });
        let (status, json) = post_json(test_app(), "/api/message", body.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["error"], actions::DATA_FORMAT_ERROR);
        assert_eq!(json["response"], actions::FALLBACK_RESPONSE);
        assert_eq!(json["isEmergency"], false);
    }

    #[tokio::test]
    async fn malformed_body_keeps_response_shape() {
        let (status, json) = post_json(test_app(), "/api/message", "{\"query\":".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], actions::DATA_FORMAT_ERROR);
        assert_eq!(json["response"], actions::FALLBACK_RESPONSE);
    }

    #[tokio::test]
    async fn audio_is_transcribed_and_spoken() {
        let audio = DataUri::new("audio/webm", vec![7u8; 32]).to_uri();
        let body = serde_json::json!({ "audio": audio, "domain": "Mental Health" });
        let (status, json) = post_json(test_app(), "/api/audio", body.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["userQuery"].as_str().unwrap().contains("32 bytes"));
        assert!(json["responseAudio"].as_str().unwrap().starts_with("data:audio/wav;base64,"));
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn oversized_audio_is_rejected() {
        let audio = DataUri::new("audio/webm", vec![1u8; 128 * 1024]).to_uri();
        let body = serde_json::json!({ "audio": audio, "domain": "Safety" });
        let (status, json) = post_json(test_app(), "/api/audio", body.to_string()).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(json["userQuery"], actions::UNTRANSCRIBED_QUERY);
    }

    #[tokio::test]
    async fn cors_allows_configured_origin() {
        let req = Request::builder()
            .method("OPTIONS")
            .uri("/api/message")
            .header("origin", "http://localhost:3000")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();
        let res = test_app().oneshot(req).await.unwrap();
        assert_eq!(
            res.headers().get("access-control-allow-origin").unwrap(),
            "http://localhost:3000"
        );
    }
}

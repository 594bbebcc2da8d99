//! Axum-based API gateway for the pre-admission assistant. Config-driven via CoreConfig.

mod handlers;

use axum::{
    extract::State,
    http::Method,
    response::Html,
    routing::{get, post},
    Router,
};
use preadmit_core::{CoreConfig, DialogueEngine, KnowledgeBase, KnowledgeError};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SERVICE_NAME: &str = "Pre-Admission Chatbot";

const FEATURES: [&str; 9] = [
    "Application Form guidance",
    "Health Form instructions",
    "Registration & Document View",
    "Interview Scheduling (Oral & Written)",
    "Marks Entry information",
    "Status Tracking (Application & Admission)",
    "Transfer Student process",
    "Reports Module (5 types)",
    "Fees information",
];

/// Knowledge base named in config, or the builtin one.
fn load_knowledge(config: &CoreConfig) -> Result<KnowledgeBase, KnowledgeError> {
    match config.knowledge_path.as_deref().filter(|p| !p.trim().is_empty()) {
        Some(path) => KnowledgeBase::load_json_path(path),
        None => KnowledgeBase::builtin(),
    }
}

/// Pre-flight check: config loads, knowledge base validates, port is free.
fn run_verify() -> Result<(), String> {
    let config = CoreConfig::load().map_err(|e| format!("Config load failed: {}", e))?;

    print!("Checking knowledge base... ");
    let knowledge = load_knowledge(&config).map_err(|e| format!("Knowledge base invalid: {}", e))?;
    println!("OK ({} topics)", knowledge.len());

    let addr = format!("{}:{}", config.bind_address, config.port);
    print!("Checking {}... ", addr);
    match std::net::TcpListener::bind(&addr) {
        Ok(listener) => {
            drop(listener);
            println!("OK (available)");
        }
        Err(e) => {
            return Err(format!("{} BLOCKED: {}", addr, e));
        }
    }

    println!("\nSUCCESS: Ready to start gateway.");
    Ok(())
}

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env::var calls)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[preadmit-gateway] .env not loaded: {} (using system environment)", e);
    }

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--verify") {
        match run_verify() {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("PRE-FLIGHT FAILED: {}", e);
                std::process::exit(1);
            }
        }
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match CoreConfig::load() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            tracing::error!("Config load failed: {}", e);
            std::process::exit(1);
        }
    };
    let knowledge = match load_knowledge(&config) {
        Ok(knowledge) => Arc::new(knowledge),
        Err(e) => {
            tracing::error!("Knowledge base load failed: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Knowledge base ready: {} topics", knowledge.len());

    let engine = DialogueEngine::new(knowledge);
    tracing::debug!("Resolution stages: {}", engine.stage_names().join(" → "));

    let app = build_app(AppState {
        config: Arc::clone(&config),
        engine,
    });

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    tracing::info!("{} listening on {}", config.app_name, addr);
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
    }
}

fn build_app(state: AppState) -> Router {
    let cors = if state.config.cors_allow_any {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    Router::new()
        .route("/", get(root_page))
        .route("/api/health", get(health))
        .route("/api/chatbot/greeting", get(handlers::topics::greeting))
        .route("/api/chatbot/message", post(handlers::chat::message))
        .route("/api/chat", post(handlers::chat::chat))
        .route("/api/chatbot/topics", get(handlers::topics::list))
        .route("/api/chatbot/help/:topic", get(handlers::topics::help))
        .route("/api/chatbot/process-flow", get(handlers::topics::process_flow))
        .with_state(state)
        .layer(cors)
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: Arc<CoreConfig>,
    pub(crate) engine: DialogueEngine,
}

/// GET / – pointer page for humans hitting the API root.
async fn root_page() -> Html<&'static str> {
    Html(
        "<h3>Pre-Admission Chatbot API</h3>\
         <p>Use <code>/api/chatbot/message</code> POST to talk to the bot. \
         See <code>/api/health</code> and <code>/api/chatbot/greeting</code>.</p>",
    )
}

/// GET /api/health – liveness check for UI and scripts.
async fn health(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "active",
        "service": SERVICE_NAME,
        "app_name": state.config.app_name,
        "version": env!("CARGO_PKG_VERSION"),
        "features": FEATURES,
        "topics": state.engine.knowledge().len(),
        "timestamp": handlers::timestamp(),
    }))
}

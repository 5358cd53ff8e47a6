//! REST API for ReceiptChain
//!
//! `GET /` dumps the chain, `POST /` records a receipt and `POST /new` mints
//! a renter ID. Error bodies are plain text.

use axum::{
    body::Bytes,
    extract::{Path, Request, State},
    http::{self, header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use crate::blockchain::{AppendOutcome, LedgerStore, Rejection};
use crate::error::ChainError;
use crate::node::NodeState;
use crate::receipt::Receipt;
use crate::renter::Renter;

/// Shared handler state.
#[derive(Clone)]
pub struct Node {
    pub ledger: Arc<LedgerStore>,
    // Optional orchestrator state for health checks and request logs
    pub state: Option<Arc<RwLock<NodeState>>>,
}

impl Node {
    pub fn new(ledger: LedgerStore) -> Self {
        Self {
            ledger: Arc::new(ledger),
            state: None,
        }
    }

    /// Share a ledger (and orchestrator state) owned elsewhere.
    pub fn new_shared(ledger: Arc<LedgerStore>, state: Option<Arc<RwLock<NodeState>>>) -> Self {
        Self { ledger, state }
    }
}

// ============================================================================
// API Error Handling
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    /// Request body could not be decoded; carries the client-facing message.
    Decode(&'static str),
    Serialization(String),
    Rejected(Rejection),
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Decode(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.to_string()),
            ApiError::Serialization(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::Rejected(rejection) => {
                (StatusCode::CONFLICT, format!("Block rejected: {}", rejection))
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        (status, message).into_response()
    }
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct ValidationResponse {
    pub valid: bool,
    pub length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Indented JSON body with a JSON content type.
fn pretty_json<T: Serialize>(value: &T, failure: &'static str) -> Result<Response, ApiError> {
    let body = serde_json::to_string_pretty(value).map_err(|e| {
        warn!("Could not marshal payload: {}", e);
        ApiError::Serialization(failure.to_string())
    })?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}

// ============================================================================
// Middleware
// ============================================================================

/// Logs method, path, status, duration and the current `NodeState`.
async fn logging_middleware(State(node): State<Arc<Node>>, req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    let node_state = match &node.state {
        Some(s) => format!("{:?}", *s.read().await),
        None => "unknown".to_string(),
    };

    info!(
        method = %method,
        path = %path,
        status = %response.status().as_u16(),
        duration_ms = %start.elapsed().as_millis(),
        node_state = %node_state,
        "api.request"
    );

    response
}

// ============================================================================
// API Server
// ============================================================================

pub fn build_api_router(node: Arc<Node>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(vec![
            http::Method::GET,
            http::Method::POST,
            http::Method::OPTIONS,
        ])
        .allow_headers(vec![http::header::CONTENT_TYPE]);

    Router::new()
        // Ledger endpoints
        .route("/", get(get_blockchain).post(write_block))
        .route("/block/:position", get(get_block))
        .route("/validate", get(validate_chain))
        // Renter endpoints
        .route("/new", post(new_renter))
        // System endpoints
        .route("/health", get(health_check))
        .layer(middleware::from_fn_with_state(node.clone(), logging_middleware))
        .with_state(node)
        .layer(cors)
}

/// Serve until ctrl-c.
pub async fn run_api_server(node: Arc<Node>, addr: SocketAddr) -> Result<(), ChainError> {
    let app = build_api_router(node);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_err() {
                warn!("Could not install ctrl-c handler; serving until killed");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    info!("API server stopped");
    Ok(())
}

// ============================================================================
// Route Handlers
// ============================================================================

async fn get_blockchain(State(node): State<Arc<Node>>) -> Result<Response, ApiError> {
    let blocks = node.ledger.snapshot();
    pretty_json(&blocks, "Could not encode blockchain")
}

async fn write_block(State(node): State<Arc<Node>>, body: Bytes) -> Result<Response, ApiError> {
    let mut receipt: Receipt = serde_json::from_slice(&body).map_err(|e| {
        warn!("Could not write Block: {}", e);
        ApiError::Decode("Could not write block")
    })?;

    receipt.mint_id();

    match node.ledger.append(receipt.clone()) {
        AppendOutcome::Committed(block) => {
            info!(
                position = block.position,
                receipt_id = %receipt.receipt_id,
                "Recorded receipt"
            );
        }
        AppendOutcome::Rejected(rejection) => return Err(ApiError::Rejected(rejection)),
    }

    // The block stays committed even if the response cannot be encoded.
    pretty_json(&receipt, "Could not write block")
}

async fn new_renter(body: Bytes) -> Result<Response, ApiError> {
    let mut renter: Renter = serde_json::from_slice(&body).map_err(|e| {
        warn!("Could not create: {}", e);
        ApiError::Decode("Could not create new Renter")
    })?;

    renter.assign_id();

    pretty_json(&renter, "Could not save renter data")
}

async fn get_block(
    State(node): State<Arc<Node>>,
    Path(position): Path<i64>,
) -> Result<Json<crate::blockchain::Block>, ApiError> {
    node.ledger
        .get(position)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Block at position {} not found", position)))
}

async fn validate_chain(State(node): State<Arc<Node>>) -> Json<ValidationResponse> {
    let length = node.ledger.len();
    let error = node.ledger.verify().err().map(|e| e.to_string());
    Json(ValidationResponse {
        valid: error.is_none(),
        length,
        error,
    })
}

async fn health_check(State(node): State<Arc<Node>>) -> impl IntoResponse {
    let blocks = node.ledger.len();
    let timestamp = chrono::Utc::now().to_rfc3339();

    let Some(s) = &node.state else {
        return (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "healthy",
                "blocks": blocks,
                "timestamp": timestamp
            })),
        );
    };

    let state = s.read().await.clone();
    let (status, label) = match state {
        NodeState::Ready => (StatusCode::OK, "healthy"),
        _ => (StatusCode::SERVICE_UNAVAILABLE, "unhealthy"),
    };
    (
        status,
        Json(serde_json::json!({
            "status": label,
            "node_state": format!("{:?}", state),
            "blocks": blocks,
            "timestamp": timestamp
        })),
    )
}

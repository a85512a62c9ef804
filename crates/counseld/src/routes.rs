//! API routes for counseld
//!
//! Everything lives under `/api`. Any other path is handed to the single
//! page app fallback.

use crate::auth;
use crate::errors::ApiError;
use crate::server::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, Uri},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use counsel_shared::rpc::{
    AiResponseRequest, AuthResponse, ChatReply, ConversationResponse, CreateCaseRequest,
    HealthResponse, InitiateChatRequest, LoadConversationRequest, LoginRequest, PingResponse,
    SignUpRequest, UserDetailsResponse,
};
use counsel_shared::{Case, CaseError, CaseId, VERSION};
use std::sync::Arc;
use tracing::{debug, info};

type AppStateArc = Arc<AppState>;

/// Body parsed as JSON, rejection mapped to a 400
type JsonBody<T> = Result<Json<T>, JsonRejection>;

pub fn api_routes() -> Router<AppStateArc> {
    Router::new()
        .merge(chat_routes())
        .merge(case_routes())
        .merge(user_routes())
        .merge(health_routes())
}

// ============================================================================
// Chat Routes
// ============================================================================

pub fn chat_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/initiate-chat", post(initiate_chat))
        .route("/ai-resp", post(ai_response))
}

async fn initiate_chat(
    State(state): State<AppStateArc>,
    payload: JsonBody<InitiateChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    let Json(req) = payload?;
    info!("  Initiate chat: case={:?}", req.case_id);

    let reply = state
        .conversations
        .initiate_chat(
            present(req.case_id.as_ref()),
            req.case_name.as_deref().unwrap_or_default(),
            req.case_type.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(Json(reply))
}

async fn ai_response(
    State(state): State<AppStateArc>,
    payload: JsonBody<AiResponseRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    let Json(req) = payload?;
    let message = req.message().unwrap_or_default();
    debug!("  AI response: case={:?} len={}", req.case_id, message.len());

    let reply = state
        .conversations
        .continue_chat(present(req.case_id.as_ref()), message)
        .await?;

    Ok(Json(reply))
}

/// A blank caseId is treated as absent
fn present(case_id: Option<&CaseId>) -> Option<&CaseId> {
    case_id.filter(|id| !id.as_str().trim().is_empty())
}

// ============================================================================
// Case Routes
// ============================================================================

pub fn case_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/create-case", post(create_case))
        .route("/cases", get(list_cases))
        .route("/load-case-conversation", post(load_case_conversation))
}

async fn create_case(
    State(state): State<AppStateArc>,
    payload: JsonBody<CreateCaseRequest>,
) -> Result<Json<Case>, ApiError> {
    let Json(req) = payload?;
    let case = state
        .conversations
        .create_case(
            req.name.as_deref().unwrap_or_default(),
            req.case_type.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok(Json(case))
}

async fn list_cases(State(state): State<AppStateArc>) -> Json<Vec<Case>> {
    Json(state.store.list_cases().await)
}

async fn load_case_conversation(
    State(state): State<AppStateArc>,
    payload: JsonBody<LoadConversationRequest>,
) -> Result<Json<ConversationResponse>, ApiError> {
    let Json(req) = payload?;
    let case_id = present(req.case_id.as_ref())
        .cloned()
        .ok_or_else(|| CaseError::validation("caseId is required"))?;

    Ok(Json(state.conversations.load_conversation(&case_id).await))
}

// ============================================================================
// User Routes
// ============================================================================

pub fn user_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/user-details", get(user_details))
        .route("/login", post(login))
        .route("/sign-up-user", post(sign_up_user))
}

/// Caller identified by bearer token, or the fixture user
async fn user_details(
    State(state): State<AppStateArc>,
    headers: HeaderMap,
) -> Json<UserDetailsResponse> {
    let user = match bearer_token(&headers) {
        Some(token) => state.users.user_for_token(token).await,
        None => None,
    }
    .unwrap_or_else(auth::fixture_profile);

    Json(UserDetailsResponse {
        user,
        cases: state.store.list_cases().await,
    })
}

async fn login(
    State(state): State<AppStateArc>,
    payload: JsonBody<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(req) = payload?;
    let resp = state
        .users
        .login(
            req.email.as_deref().unwrap_or_default(),
            req.password.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok(Json(resp))
}

async fn sign_up_user(
    State(state): State<AppStateArc>,
    payload: JsonBody<SignUpRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(req) = payload?;
    let resp = state
        .users
        .sign_up(
            req.name.as_deref().unwrap_or_default(),
            req.email.as_deref().unwrap_or_default(),
            req.password.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok(Json(resp))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/ping", get(ping))
        .route("/health", get(health_check))
}

async fn ping(State(state): State<AppStateArc>) -> Json<PingResponse> {
    Json(PingResponse {
        message: state.server.ping_message.clone(),
    })
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: VERSION.to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        cases: state.store.count().await,
    })
}

// ============================================================================
// SPA Fallback
// ============================================================================

/// Served when the built front end is missing (dev mode, Vite serves the app)
const DEV_SHELL: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>Loading...</title>
  </head>
  <body>
    <div id="root"></div>
    <script type="module" src="/client/main.tsx"></script>
  </body>
</html>
"#;

fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

/// Unknown API paths get a JSON 404; everything else gets index.html so
/// client-side routing survives a hard refresh.
pub async fn spa_fallback(State(state): State<AppStateArc>, uri: Uri) -> Response {
    let path = uri.path();
    if is_api_path(path) {
        return ApiError::NotFound(format!("No API route for {}", path)).into_response();
    }

    let index = state.server.static_dir.join("index.html");
    match tokio::fs::read_to_string(&index).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            debug!("  {} unavailable ({}), serving dev shell", index.display(), e);
            Html(DEV_SHELL).into_response()
        }
    }
}

//! JSON request/response bodies for the counseld HTTP API.
//!
//! Request fields are optional on the wire so a missing field surfaces as a
//! validation error from the daemon instead of a deserializer failure.

use crate::case::{Case, CaseId};
use crate::message::{ContentType, Message};
use serde::{Deserialize, Serialize};

// ============================================================================
// Chat
// ============================================================================

/// Body of `POST /api/initiate-chat`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateChatRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_id: Option<CaseId>,
    #[serde(default)]
    pub case_name: Option<String>,
    #[serde(default)]
    pub case_type: Option<String>,
}

/// `{ "message": ... }` as sent by the chat widget
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestContent {
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /api/ai-resp`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiResponseRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_id: Option<CaseId>,
    #[serde(default)]
    pub content: Option<RequestContent>,
}

impl AiResponseRequest {
    pub fn message(&self) -> Option<&str> {
        self.content.as_ref().and_then(|c| c.message.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent {
    pub message: String,
}

/// Assistant reply payload: `{ content: { message }, type: "text" }`
///
/// `caseId` is only present when the reply belongs to a stored case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub content: MessageContent,
    #[serde(rename = "type")]
    pub kind: ContentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_id: Option<CaseId>,
}

impl ChatReply {
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            content: MessageContent {
                message: message.into(),
            },
            kind: ContentType::Text,
            case_id: None,
        }
    }

    pub fn with_case(mut self, case_id: CaseId) -> Self {
        self.case_id = Some(case_id);
        self
    }

    pub fn message(&self) -> &str {
        &self.content.message
    }
}

// ============================================================================
// Cases
// ============================================================================

/// Body of `POST /api/create-case`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCaseRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub case_type: Option<String>,
}

/// Body of `POST /api/load-case-conversation`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadConversationRequest {
    #[serde(default)]
    pub case_id: Option<CaseId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub case_id: CaseId,
    pub chat: Vec<Message>,
}

// ============================================================================
// Users
// ============================================================================

/// Public view of a user account (never carries the password digest)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Body of `POST /api/login`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Body of `POST /api/sign-up-user`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignUpRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDetailsResponse {
    pub user: UserProfile,
    pub cases: Vec<Case>,
}

// ============================================================================
// Misc
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub cases: usize,
}

/// Error body returned with every non-2xx API response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

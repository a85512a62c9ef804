//! Conversation service: starts and continues case chats.
//!
//! Reads and writes the injected [`CaseStore`] and asks [`crate::replies`]
//! for the assistant text. A case is `NotStarted` until its transcript holds
//! a message, `Active` afterwards.

use crate::replies;
use crate::store::CaseStore;
use counsel_shared::rpc::{ChatReply, ConversationResponse};
use counsel_shared::{Case, CaseError, CaseId, CaseType, Message};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    NotStarted,
    Active,
}

pub struct ConversationService {
    store: Arc<CaseStore>,
}

impl ConversationService {
    pub fn new(store: Arc<CaseStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<CaseStore> {
        &self.store
    }

    pub async fn create_case(&self, name: &str, case_type: &str) -> Result<Case, CaseError> {
        let name = required("name", name)?;
        let case_type = required("type", case_type)?;
        let case = self.store.create_case(name, CaseType::parse(case_type)).await;
        info!("Case created: {} \"{}\" ({})", case.case_id, case.name, case.case_type);
        Ok(case)
    }

    pub async fn chat_state(&self, case_id: &CaseId) -> Result<ChatState, CaseError> {
        if !self.store.contains(case_id).await {
            return Err(CaseError::NotFound(case_id.clone()));
        }
        if self.store.get_conversation(case_id).await.is_empty() {
            Ok(ChatState::NotStarted)
        } else {
            Ok(ChatState::Active)
        }
    }

    /// Start a chat and return the opening message.
    ///
    /// Without `case_id` a new case is created first. With one, the opening is
    /// built from the stored case, not from the request fields. The opening
    /// message is stored as the first assistant message; re-initiating an
    /// active case returns it again without a second append.
    pub async fn initiate_chat(
        &self,
        case_id: Option<&CaseId>,
        case_name: &str,
        case_type: &str,
    ) -> Result<ChatReply, CaseError> {
        let case_name = required("caseName", case_name)?;
        let case_type = CaseType::parse(required("caseType", case_type)?);

        let case_id = match case_id {
            Some(id) => id.clone(),
            None => self.store.create_case(case_name, case_type).await.case_id,
        };

        let (opening, stored) = self
            .store
            .open_conversation(&case_id, |case| {
                replies::opening_message(&case.name, &case.case_type)
            })
            .await?;

        if stored {
            info!("Chat initiated for {}", case_id);
        } else {
            info!("Chat for {} already active, opening message not re-stored", case_id);
        }

        Ok(ChatReply::text(opening).with_case(case_id))
    }

    /// Record a user message and the assistant reply.
    ///
    /// Without `case_id` the reply is computed and nothing is stored.
    pub async fn continue_chat(
        &self,
        case_id: Option<&CaseId>,
        user_message: &str,
    ) -> Result<ChatReply, CaseError> {
        let user_message = required("content.message", user_message)?;
        let reply = replies::continuation_reply(user_message);

        let Some(case_id) = case_id else {
            return Ok(reply);
        };

        self.store
            .append_messages(
                case_id,
                vec![Message::user(user_message), Message::assistant(reply.message())],
            )
            .await?;

        Ok(reply.with_case(case_id.clone()))
    }

    /// Transcript for a case; unknown ids yield an empty chat
    pub async fn load_conversation(&self, case_id: &CaseId) -> ConversationResponse {
        ConversationResponse {
            case_id: case_id.clone(),
            chat: self.store.get_conversation(case_id).await,
        }
    }
}

/// Rejects blank values; the value itself is passed through untouched
fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, CaseError> {
    if value.trim().is_empty() {
        return Err(CaseError::validation(format!("{} is required", field)));
    }
    Ok(value)
}

//! In-memory case store.
//!
//! Holds every case and its transcript for the lifetime of the process.
//! One `RwLock` guards the whole map, so writes to a case are applied in
//! arrival order and a multi-message append is all-or-nothing.

use counsel_shared::{Case, CaseError, CaseId, CaseType, Conversation, Message, Role};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// A case together with its transcript
#[derive(Debug, Clone)]
struct CaseEntry {
    case: Case,
    conversation: Conversation,
}

#[derive(Debug, Default)]
struct StoreInner {
    cases: HashMap<CaseId, CaseEntry>,
    /// Last sequence number handed out
    next_seq: u64,
}

impl StoreInner {
    /// Next free identifier. Skips any id already present, which can only
    /// happen if entries were inserted under a foreign id.
    fn allocate_id(&mut self) -> CaseId {
        loop {
            self.next_seq += 1;
            let id = CaseId::from_sequence(self.next_seq);
            if !self.cases.contains_key(&id) {
                return id;
            }
        }
    }
}

/// Process-wide case store
#[derive(Debug, Default)]
pub struct CaseStore {
    inner: RwLock<StoreInner>,
}

impl CaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a case with an empty conversation
    pub async fn create_case(&self, name: &str, case_type: CaseType) -> Case {
        let mut inner = self.inner.write().await;
        let id = inner.allocate_id();
        let case = Case::new(id.clone(), name, case_type);

        inner.cases.insert(
            id.clone(),
            CaseEntry {
                case: case.clone(),
                conversation: Conversation::new(),
            },
        );
        debug!("Created case {} ({})", id, case.case_type);
        case
    }

    pub async fn get_case(&self, case_id: &CaseId) -> Option<Case> {
        let inner = self.inner.read().await;
        inner.cases.get(case_id).map(|e| e.case.clone())
    }

    pub async fn contains(&self, case_id: &CaseId) -> bool {
        self.inner.read().await.cases.contains_key(case_id)
    }

    /// All cases, oldest first
    pub async fn list_cases(&self) -> Vec<Case> {
        let inner = self.inner.read().await;
        let mut cases: Vec<Case> = inner.cases.values().map(|e| e.case.clone()).collect();
        cases.sort_by(|a, b| {
            a.created_on
                .cmp(&b.created_on)
                .then_with(|| a.case_id.cmp(&b.case_id))
        });
        cases
    }

    pub async fn count(&self) -> usize {
        self.inner.read().await.cases.len()
    }

    /// Stored transcript, or an empty one for an unknown case
    pub async fn get_conversation(&self, case_id: &CaseId) -> Vec<Message> {
        let inner = self.inner.read().await;
        inner
            .cases
            .get(case_id)
            .map(|e| e.conversation.to_vec())
            .unwrap_or_default()
    }

    /// Append one message. Unknown cases are rejected, never auto-created.
    pub async fn append_message(&self, case_id: &CaseId, message: Message) -> Result<(), CaseError> {
        self.append_messages(case_id, vec![message]).await
    }

    /// Append several messages under one lock acquisition
    pub async fn append_messages(
        &self,
        case_id: &CaseId,
        messages: Vec<Message>,
    ) -> Result<(), CaseError> {
        let mut inner = self.inner.write().await;
        let entry = inner
            .cases
            .get_mut(case_id)
            .ok_or_else(|| CaseError::NotFound(case_id.clone()))?;

        if messages.is_empty() {
            return Ok(());
        }

        let count = messages.len();
        entry.conversation.extend(messages);
        entry.case.touch();
        debug!(
            "Appended {} message(s) to {} (now {})",
            count,
            case_id,
            entry.conversation.len()
        );
        Ok(())
    }

    /// Opening message of a case chat, stored if the transcript is empty.
    ///
    /// `opening` builds the text from the stored case. Returns the opening and
    /// whether this call wrote it. An opening already in the transcript is
    /// returned as stored. Check and write happen under the same lock so two
    /// concurrent openers cannot both succeed.
    pub async fn open_conversation<F>(
        &self,
        case_id: &CaseId,
        opening: F,
    ) -> Result<(String, bool), CaseError>
    where
        F: FnOnce(&Case) -> String,
    {
        let mut inner = self.inner.write().await;
        let entry = inner
            .cases
            .get_mut(case_id)
            .ok_or_else(|| CaseError::NotFound(case_id.clone()))?;

        if let Some(first) = entry.conversation.first() {
            if first.role == Role::Assistant {
                return Ok((first.content.clone(), false));
            }
            // Chat was continued before it was initiated: no opening stored
            return Ok((opening(&entry.case), false));
        }

        let text = opening(&entry.case);
        entry.conversation.push(Message::assistant(text.clone()));
        entry.case.touch();
        Ok((text, true))
    }
}

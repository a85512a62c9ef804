//! Conversation service tests.
//!
//! Drive initiate/continue chat against a real in-memory store and check
//! transcript ordering, the opening-message policy and NotFound handling.

use counsel_shared::{CaseError, CaseId, CaseType, Role};
use counseld::conversation::{ChatState, ConversationService};
use counseld::replies::{self, ReplyTopic};
use counseld::store::CaseStore;
use std::sync::Arc;

fn service() -> ConversationService {
    ConversationService::new(Arc::new(CaseStore::new()))
}

#[tokio::test]
async fn test_smith_vs_co_scenario() {
    let svc = service();
    let case = svc.create_case("Smith vs Co", "Consumer complaint").await.unwrap();
    assert_eq!(case.case_type, CaseType::ConsumerComplaint);
    assert_eq!(case.name, "Smith vs Co");

    let reply = svc
        .initiate_chat(Some(&case.case_id), "Smith vs Co", "Consumer complaint")
        .await
        .unwrap();

    assert_eq!(
        reply.message(),
        replies::opening_message("Smith vs Co", &CaseType::ConsumerComplaint)
    );
    assert!(reply.message().contains("\"Smith vs Co\""));
    assert!(reply.message().contains("consumer complaint"));
    assert_eq!(reply.case_id.as_ref(), Some(&case.case_id));
}

#[tokio::test]
async fn test_opening_message_for_every_type() {
    let svc = service();
    let cases = [
        ("Consumer complaint", "consumer complaint case"),
        ("Contract dispute", "contract dispute case"),
        ("Property dispute", "property dispute case"),
        ("Employment", "Welcome to your case"),
    ];

    for (case_type, wording) in cases {
        let reply = svc.initiate_chat(None, "Doe v Roe", case_type).await.unwrap();
        assert!(reply.message().contains("Doe v Roe"), "{}", case_type);
        assert!(reply.message().contains(wording), "{}", case_type);
    }
}

#[tokio::test]
async fn test_opening_message_is_persisted_once() {
    let svc = service();
    let case = svc.create_case("Lease", "Contract dispute").await.unwrap();
    assert_eq!(svc.chat_state(&case.case_id).await.unwrap(), ChatState::NotStarted);

    let first = svc
        .initiate_chat(Some(&case.case_id), "Lease", "Contract dispute")
        .await
        .unwrap();
    assert_eq!(svc.chat_state(&case.case_id).await.unwrap(), ChatState::Active);

    let again = svc
        .initiate_chat(Some(&case.case_id), "Lease", "Contract dispute")
        .await
        .unwrap();
    assert_eq!(first, again);

    let renamed = svc
        .initiate_chat(Some(&case.case_id), "Other", "Property dispute")
        .await
        .unwrap();
    assert_eq!(renamed, first);

    let chat = svc.load_conversation(&case.case_id).await.chat;
    assert_eq!(chat.len(), 1);
    assert_eq!(chat[0].role, Role::Assistant);
    assert_eq!(chat[0].content, first.message());
}

#[tokio::test]
async fn test_initiate_uses_stored_case_fields() {
    let svc = service();
    let case = svc.create_case("Lease", "Contract dispute").await.unwrap();

    let reply = svc
        .initiate_chat(Some(&case.case_id), "Other", "Property dispute")
        .await
        .unwrap();
    assert_eq!(
        reply.message(),
        replies::opening_message("Lease", &CaseType::ContractDispute)
    );
}

#[tokio::test]
async fn test_initiate_after_continue_stores_no_opening() {
    let svc = service();
    let case = svc.create_case("Lease", "Contract dispute").await.unwrap();
    svc.continue_chat(Some(&case.case_id), "hello").await.unwrap();

    let reply = svc
        .initiate_chat(Some(&case.case_id), "Lease", "Contract dispute")
        .await
        .unwrap();
    assert_eq!(
        reply.message(),
        replies::opening_message("Lease", &CaseType::ContractDispute)
    );
    assert_eq!(svc.load_conversation(&case.case_id).await.chat.len(), 2);
}

#[tokio::test]
async fn test_case_name_kept_verbatim() {
    let svc = service();
    let reply = svc
        .initiate_chat(None, "  Smith vs Co ", "Consumer complaint")
        .await
        .unwrap();
    assert!(reply.message().contains("\"  Smith vs Co \""));

    let case = svc.store().get_case(reply.case_id.as_ref().unwrap()).await.unwrap();
    assert_eq!(case.name, "  Smith vs Co ");
}

#[tokio::test]
async fn test_initiate_without_case_creates_one() {
    let svc = service();
    let reply = svc.initiate_chat(None, "Fence line", "Property dispute").await.unwrap();
    let case_id = reply.case_id.clone().unwrap();

    let case = svc.store().get_case(&case_id).await.unwrap();
    assert_eq!(case.name, "Fence line");
    assert_eq!(case.case_type, CaseType::PropertyDispute);
    assert_eq!(svc.load_conversation(&case_id).await.chat.len(), 1);
}

#[tokio::test]
async fn test_initiate_unknown_case_is_not_found() {
    let svc = service();
    let id = CaseId::new("CASE-424242");
    let err = svc
        .initiate_chat(Some(&id), "Ghost", "Contract dispute")
        .await
        .unwrap_err();
    assert_eq!(err, CaseError::NotFound(id));
    assert_eq!(svc.store().count().await, 0);
}

#[tokio::test]
async fn test_initiate_requires_name_and_type() {
    let svc = service();
    assert!(matches!(
        svc.initiate_chat(None, "  ", "Contract dispute").await,
        Err(CaseError::Validation(_))
    ));
    assert!(matches!(
        svc.initiate_chat(None, "Name", "").await,
        Err(CaseError::Validation(_))
    ));
    assert_eq!(svc.store().count().await, 0);
}

#[tokio::test]
async fn test_append_ordering() {
    let svc = service();
    let case = svc.create_case("Smith vs Co", "Consumer complaint").await.unwrap();
    let id = Some(&case.case_id);

    let evidence = svc.continue_chat(id, "What about evidence?").await.unwrap();
    let cost = svc.continue_chat(id, "What about cost?").await.unwrap();

    let chat = svc.load_conversation(&case.case_id).await.chat;
    let got: Vec<(Role, &str)> = chat.iter().map(|m| (m.role, m.content.as_str())).collect();
    assert_eq!(
        got,
        vec![
            (Role::User, "What about evidence?"),
            (Role::Assistant, ReplyTopic::Evidence.reply()),
            (Role::User, "What about cost?"),
            (Role::Assistant, ReplyTopic::Costs.reply()),
        ]
    );
    assert_eq!(evidence.message(), ReplyTopic::Evidence.reply());
    assert_eq!(cost.message(), ReplyTopic::Costs.reply());
}

#[tokio::test]
async fn test_continue_after_initiate_keeps_opening_first() {
    let svc = service();
    let reply = svc.initiate_chat(None, "Tenancy", "Other").await.unwrap();
    let id = reply.case_id.clone().unwrap();

    svc.continue_chat(Some(&id), "next step?").await.unwrap();

    let chat = svc.load_conversation(&id).await.chat;
    assert_eq!(chat.len(), 3);
    assert_eq!(chat[0].content, reply.message());
    assert_eq!(chat[2].content, ReplyTopic::NextSteps.reply());
}

#[tokio::test]
async fn test_continue_updates_last_modified() {
    let svc = service();
    let case = svc.create_case("A", "Contract dispute").await.unwrap();
    svc.continue_chat(Some(&case.case_id), "settlement").await.unwrap();

    let stored = svc.store().get_case(&case.case_id).await.unwrap();
    assert!(stored.last_modified_on >= case.last_modified_on);
}

#[tokio::test]
async fn test_continue_unknown_case_is_not_found() {
    let svc = service();
    let id = CaseId::new("CASE-000404");
    let err = svc.continue_chat(Some(&id), "deadline").await.unwrap_err();
    assert_eq!(err, CaseError::NotFound(id.clone()));
    assert!(svc.load_conversation(&id).await.chat.is_empty());
}

#[tokio::test]
async fn test_continue_without_case_is_stateless() {
    let svc = service();
    let reply = svc.continue_chat(None, "What is the cost and deadline?").await.unwrap();
    assert_eq!(reply.message(), ReplyTopic::Deadlines.reply());
    assert!(reply.case_id.is_none());
    assert_eq!(svc.store().count().await, 0);
}

#[tokio::test]
async fn test_user_message_stored_verbatim() {
    let svc = service();
    let case = svc.create_case("A", "Contract dispute").await.unwrap();

    let reply = svc
        .continue_chat(Some(&case.case_id), "  What about cost?\n")
        .await
        .unwrap();
    assert_eq!(reply.message(), ReplyTopic::Costs.reply());

    let chat = svc.load_conversation(&case.case_id).await.chat;
    assert_eq!(chat[0].role, Role::User);
    assert_eq!(chat[0].content, "  What about cost?\n");
}

#[tokio::test]
async fn test_continue_rejects_blank_message() {
    let svc = service();
    let case = svc.create_case("A", "Contract dispute").await.unwrap();
    assert!(matches!(
        svc.continue_chat(Some(&case.case_id), "   ").await,
        Err(CaseError::Validation(_))
    ));
    assert!(svc.load_conversation(&case.case_id).await.chat.is_empty());
}

#[tokio::test]
async fn test_read_is_idempotent() {
    let svc = service();
    let case = svc.create_case("A", "Contract dispute").await.unwrap();
    svc.continue_chat(Some(&case.case_id), "hello").await.unwrap();

    let first = svc.load_conversation(&case.case_id).await;
    let second = svc.load_conversation(&case.case_id).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_concurrent_exchanges_stay_paired() {
    let store = Arc::new(CaseStore::new());
    let svc = Arc::new(ConversationService::new(store.clone()));
    let case = svc.create_case("Busy", "Contract dispute").await.unwrap();

    let mut handles = Vec::new();
    for i in 0..16 {
        let svc = svc.clone();
        let id = case.case_id.clone();
        handles.push(tokio::spawn(async move {
            let text = if i % 2 == 0 { "fee?" } else { "evidence?" };
            svc.continue_chat(Some(&id), text).await.unwrap();
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    let chat = store.get_conversation(&case.case_id).await;
    assert_eq!(chat.len(), 32);
    for pair in chat.chunks(2) {
        assert_eq!(pair[0].role, Role::User);
        assert_eq!(pair[1].role, Role::Assistant);
        let expected = replies::continuation_reply(&pair[0].content);
        assert_eq!(pair[1].content, expected.message());
    }
}

//! End-to-end behaviour of the router, registry, memory and chat service

use ajax_common::{AjaxConfig, AjaxError, Role};
use ajax_core::{
    Ajax, AgentRegistry, ChatService, ConversationMemory, ConversationMessage,
    InMemoryConversationStore, JsonFileConversationStore, PersonalityStore,
    agents::InvestorAgent, build_default_registry,
};
use std::sync::Arc;

async fn router(present: bool) -> Ajax {
    let registry = Arc::new(build_default_registry().await.unwrap());
    Ajax::new(PersonalityStore::with_defaults("Logan"), registry, present).unwrap()
}

async fn service() -> ChatService {
    ChatService::builder(AjaxConfig::default())
        .in_memory()
        .build()
        .await
        .unwrap()
}

#[tokio::test]
async fn reply_contains_prompt_and_starts_with_lead_in() {
    let ajax = router(true).await;
    for prompt in ["Schedule my meeting", "", "ünïcödé ✓", "/not-a-command", "multi\nline"] {
        for present in [true, false] {
            ajax.set_principal_present(present);
            let reply = ajax.generate_response(prompt);
            let lead_in = ajax.active_personality().example_phrases()[0].as_str();
            assert!(reply.contains(prompt), "{:?} missing from {:?}", prompt, reply);
            assert!(reply.starts_with(lead_in));
        }
    }
}

#[tokio::test]
async fn toggling_presence_changes_the_reply() {
    let ajax = router(true).await;
    let first = ajax.generate_response("Same prompt");
    ajax.set_principal_present(false);
    let second = ajax.generate_response("Same prompt");
    assert_ne!(first, second);
}

#[tokio::test]
async fn investor_delegation_echoes_the_task() {
    let ajax = router(true).await;
    let reply = ajax.delegate("investor", "Analyze TSLA earnings").await.unwrap();
    assert!(reply.contains("[InvestorAgent]"));
    assert!(reply.contains("Analyze TSLA earnings"));
}

#[tokio::test]
async fn unknown_agent_fails_directly_and_softly_in_chat() {
    let ajax = router(true).await;
    let err = ajax.delegate("doesNotExist", "x").await.unwrap_err();
    assert!(matches!(err, AjaxError::UnknownAgent(ref name) if name == "doesNotExist"));

    let service = service().await;
    let reply = service.chat(None, "/delegate doesNotExist x").await.unwrap();
    assert!(reply.reply.starts_with("Delegation error:"));
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let registry = AgentRegistry::new();
    registry.register("investor", InvestorAgent).await.unwrap();
    let err = registry.register("investor", InvestorAgent).await.unwrap_err();
    assert!(matches!(err, AjaxError::DuplicateName(ref name) if name == "investor"));
    assert_eq!(registry.len().await, 1);
}

#[tokio::test]
async fn memory_keeps_the_newest_cap_messages_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileConversationStore::open(dir.path()).await.unwrap());
    let memory = ConversationMemory::new(store, 20, "default");

    for i in 0..21 {
        memory
            .append("general", ConversationMessage::new(Role::User, format!("message {}", i)))
            .await
            .unwrap();
    }

    let messages = memory.record("general").await.unwrap().messages;
    assert_eq!(messages.len(), 20);
    assert_eq!(messages.first().unwrap().content, "message 1");
    assert_eq!(messages.last().unwrap().content, "message 20");
    assert!(
        messages
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp)
    );
}

#[tokio::test]
async fn chat_turns_evict_at_the_configured_cap() {
    let mut config = AjaxConfig::default();
    config.memory.cap = 4;
    let service = ChatService::builder(config)
        .in_memory()
        .with_store(Arc::new(InMemoryConversationStore::new()))
        .build()
        .await
        .unwrap();

    for i in 0..3 {
        service.chat(Some("ops"), &format!("turn {}", i)).await.unwrap();
    }
    let messages = service.memory().record("ops").await.unwrap().messages;
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0].content, "turn 1");
    assert_eq!(messages[2].content, "turn 2");
}

#[tokio::test]
async fn two_token_delegate_returns_usage() {
    let service = service().await;
    let reply = service.chat(None, "/delegate investor").await.unwrap();
    assert_eq!(reply.reply, "Usage: /delegate <agent> <task>");
}

#[tokio::test]
async fn schedule_my_meeting_in_both_modes() {
    let service = service().await;
    let assistant_lead = PersonalityStore::with_defaults("Logan")
        .get("ajax")
        .unwrap()
        .lead_in()
        .to_string();
    let principal_lead = PersonalityStore::with_defaults("Logan")
        .get("principal")
        .unwrap()
        .lead_in()
        .to_string();

    service.set_principal_present(true).await;
    let reply = service.chat(None, "Schedule my meeting").await.unwrap();
    assert_eq!(reply.reply, format!("{} — Schedule my meeting", assistant_lead));

    service.set_principal_present(false).await;
    let reply = service.chat(None, "Schedule my meeting").await.unwrap();
    assert_eq!(reply.reply, format!("{} Schedule my meeting", principal_lead));
}

#[tokio::test]
async fn presence_commands_drive_the_reply_style() {
    let service = service().await;
    let ack = service.chat(None, "/LOGANOUT").await.unwrap();
    assert_eq!(ack.reply, "Logan is away. Speaking on their behalf.");
    let away = service.chat(None, "Schedule my meeting").await.unwrap();
    assert!(away.reply.starts_with("DM me now"));

    service.chat(None, "/loganin").await.unwrap();
    let back = service.chat(None, "Schedule my meeting").await.unwrap();
    assert!(back.reply.starts_with("On it, boss!"));
}

#[tokio::test]
async fn concurrent_chats_on_one_conversation_keep_every_turn() {
    let mut config = AjaxConfig::default();
    config.memory.cap = 200;
    let service = Arc::new(
        ChatService::builder(config)
            .in_memory()
            .build()
            .await
            .unwrap(),
    );

    let mut handles = Vec::new();
    for i in 0..20 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service.chat(Some("shared"), &format!("note {}", i)).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let messages = service.memory().record("shared").await.unwrap().messages;
    assert_eq!(messages.len(), 40);
    // Each turn stays together: user message directly followed by its reply
    for pair in messages.chunks(2) {
        assert_eq!(pair[0].role, Role::User);
        assert_eq!(pair[1].role, Role::Assistant);
        assert!(pair[1].content.ends_with(&pair[0].content));
    }
}

#[tokio::test]
async fn status_is_fresh_for_every_service() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AjaxConfig::default();
    config.data_dir = dir.path().to_path_buf();

    {
        let service = ChatService::builder(config.clone()).build().await.unwrap();
        service.chat(None, "remember me").await.unwrap();
        assert_eq!(service.status().await.history.len(), 1);
    }

    let service = ChatService::builder(config).build().await.unwrap();
    let status = service.status().await;
    assert!(status.history.is_empty());
    assert!(status.last_command.is_none());
    // Conversations and the task log survive the restart
    assert_eq!(service.memory().record("general").await.unwrap().messages.len(), 2);
    assert_eq!(service.task_log().await.unwrap().len(), 1);
}

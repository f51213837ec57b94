//! End-to-end routing with a scripted model, an in-memory store and the
//! repository analyzer.

use std::sync::Arc;
use std::time::Duration;

use scout_core::{Message, ModelError, Role};
use scout_model::MockChatModel;
use scout_rag::{
    HashingEmbeddingProvider, InMemoryVectorStore, NO_GROUNDED_ANSWER, RagConfig, RagResponder,
    RetrievalStore,
};
use scout_router::{
    ANALYSIS_SYSTEM_PROMPT, CHAT_SYSTEM_PROMPT, DialogueRouter, INDEX_UPDATED_REPLY, RESET_REPLY,
    RouterError,
};
use scout_tool::RepoAnalyzer;
use serde_json::{Value, json};

struct Fixture {
    repo: tempfile::TempDir,
    workdir: tempfile::TempDir,
    model: Arc<MockChatModel>,
    router: DialogueRouter,
}

impl Fixture {
    fn new(model: MockChatModel) -> Self {
        Self::scripted(|_| model)
    }

    /// Build the model script once the repository path is known.
    fn scripted(script: impl FnOnce(&str) -> MockChatModel) -> Self {
        let repo = tempfile::tempdir().unwrap();
        std::fs::write(repo.path().join("main.rs"), "fn main() { println!(\"scout\"); }\n")
            .unwrap();

        let workdir = tempfile::tempdir().unwrap();
        let config = RagConfig::builder()
            .persist_directory(workdir.path().join("vectorstore"))
            .retry_delay(Duration::ZERO)
            .build()
            .unwrap();
        let store = Arc::new(
            RetrievalStore::builder()
                .config(config)
                .embedding_provider(Arc::new(HashingEmbeddingProvider::default()))
                .vector_store(Arc::new(InMemoryVectorStore::new()))
                .build()
                .unwrap(),
        );

        let model = Arc::new(script(&repo.path().display().to_string()));
        let cache_dir = workdir.path().join("knowledge_base");
        let analyzer = RepoAnalyzer::new(model.clone()).with_cache_dir(&cache_dir);
        let router = DialogueRouter::new(model.clone(), store)
            .with_tool(Arc::new(analyzer))
            .with_cache_dir(&cache_dir);

        Self { repo, workdir, model, router }
    }

    fn repo_path(&self) -> String {
        self.repo.path().display().to_string()
    }

    fn cache_dir(&self) -> std::path::PathBuf {
        self.workdir.path().join("knowledge_base")
    }
}

fn roles(messages: &[Message]) -> Vec<Role> {
    messages.iter().map(|m| m.role).collect()
}

#[tokio::test]
async fn test_reset_takes_precedence_over_index_update() {
    let fx = Fixture::new(MockChatModel::new());
    assert!(fx.router.initialize().await);
    std::fs::create_dir_all(fx.cache_dir()).unwrap();
    std::fs::write(fx.cache_dir().join("old.txt"), "cached").unwrap();

    let mut history = vec![Message::user("hi"), Message::assistant("hello")];
    let message = format!("clear history and use rag {}", fx.repo_path());
    let reply = fx.router.handle_turn(&message, &mut history).await.unwrap();

    assert_eq!(reply, RESET_REPLY);
    assert!(history.is_empty());
    assert!(!fx.cache_dir().exists());
    let texts: Vec<String> = fx.router.store().list().await.into_iter().map(|c| c.text).collect();
    assert_eq!(texts.len(), 2);
    assert!(texts.iter().all(|t| !t.contains("scout")));
    assert_eq!(fx.model.request_count(), 0);
}

#[tokio::test]
async fn test_reset_without_cache_dir_or_store_still_confirms() {
    let fx = Fixture::new(MockChatModel::new());
    let mut history = vec![Message::user("hi")];

    let reply = fx.router.handle_turn("Clear Context please", &mut history).await.unwrap();
    assert_eq!(reply, RESET_REPLY);
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_index_update_adds_repository_chunks() {
    let fx = Fixture::new(MockChatModel::new());
    assert!(fx.router.initialize().await);

    let mut history = Vec::new();
    let message = format!("Use RAG on {}", fx.repo_path());
    let reply = fx.router.handle_turn(&message, &mut history).await.unwrap();

    assert_eq!(reply, INDEX_UPDATED_REPLY);
    let chunks = fx.router.store().list().await;
    assert!(chunks.iter().any(|c| c.text.contains("println!(\"scout\")")));
    assert_eq!(fx.model.request_count(), 0);
}

#[tokio::test]
async fn test_first_index_update_only_bootstraps_store() {
    let fx = Fixture::new(MockChatModel::new());

    let message = format!("using rag {}", fx.repo_path());
    let reply = fx.router.handle_turn(&message, &mut Vec::new()).await.unwrap();

    assert_eq!(reply, INDEX_UPDATED_REPLY);
    assert!(fx.router.store().is_available().await);
    assert_eq!(fx.router.store().list().await.len(), 1);
}

#[tokio::test]
async fn test_grounded_answer_short_circuits() {
    let fx = Fixture::new(MockChatModel::new().with_reply("It prints scout."));
    assert!(fx.router.initialize().await);

    let reply = fx.router.handle_turn("what does main print?", &mut Vec::new()).await.unwrap();

    assert_eq!(reply, "It prints scout.");
    assert_eq!(fx.model.request_count(), 1);
}

#[tokio::test]
async fn test_replacement_responder_answers_with_its_own_prompt() {
    let fx = Fixture::new(MockChatModel::new());
    assert!(fx.router.initialize().await);

    let store = fx.router.store().clone();
    let model = Arc::new(MockChatModel::new().with_reply("Cited from context."));
    let prompt = "Quote the context or reply no grounded answer.";
    let responder = RagResponder::new(store.clone(), model.clone()).with_system_prompt(prompt);
    let router = DialogueRouter::new(model.clone(), store).with_responder(responder);

    let reply = router.handle_turn("what does main print?", &mut Vec::new()).await.unwrap();

    assert_eq!(reply, "Cited from context.");
    assert_eq!(model.request_count(), 1);
    assert_eq!(model.requests()[0].messages[0].content, prompt);
    assert_eq!(fx.model.request_count(), 0);
}

#[tokio::test]
async fn test_declined_answer_falls_back_to_direct_chat_with_history() {
    let fx = Fixture::new(MockChatModel::new().with_reply(NO_GROUNDED_ANSWER).with_reply("Paris."));
    assert!(fx.router.initialize().await);

    let mut history = vec![Message::user("hi"), Message::assistant("hello")];
    let reply = fx.router.handle_turn("capital of France?", &mut history).await.unwrap();

    assert_eq!(reply, "Paris.");
    assert_eq!(history.len(), 2);

    let requests = fx.model.requests();
    assert_eq!(requests.len(), 2);
    let chat = &requests[1];
    assert!(chat.tools.is_empty());
    assert_eq!(roles(&chat.messages), vec![Role::System, Role::User, Role::Assistant, Role::User]);
    assert_eq!(chat.messages[0].content, CHAT_SYSTEM_PROMPT);
    assert_eq!(chat.messages[3].content, "capital of France?");
}

#[tokio::test]
async fn test_message_without_valid_directory_never_offers_tools() {
    let fx = Fixture::new(MockChatModel::new().with_fallback("ok"));

    let messages =
        ["hello", "look at /tmp/does-not-exist-scout", "use rag /tmp/does-not-exist-scout"];
    for message in messages {
        let reply = fx.router.handle_turn(message, &mut Vec::new()).await.unwrap();
        assert_eq!(reply, "ok");
    }

    let requests = fx.model.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests.iter().all(|r| r.tools.is_empty()));
    assert!(!fx.router.store().is_available().await);
}

#[tokio::test]
async fn test_tool_error_payload_is_sent_back_for_follow_up() {
    let fx = Fixture::new(
        MockChatModel::new()
            .with_tool_call(
                "analyze_repository",
                json!({ "repository_path": "/tmp/does-not-exist" }),
            )
            .with_reply("That path does not exist."),
    );

    let message = format!("analyze {}", fx.repo_path());
    let reply = fx.router.handle_turn(&message, &mut Vec::new()).await.unwrap();
    assert_eq!(reply, "That path does not exist.");

    let requests = fx.model.requests();
    assert_eq!(requests.len(), 2);

    let offered: Vec<&str> = requests[0].tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(offered, vec!["analyze_repository"]);
    assert_eq!(requests[0].messages[0].content, ANALYSIS_SYSTEM_PROMPT);

    let follow_up = &requests[1];
    assert!(follow_up.tools.is_empty());
    assert_eq!(
        roles(&follow_up.messages),
        vec![Role::System, Role::User, Role::Assistant, Role::Tool]
    );
    assert_eq!(follow_up.messages[2].content, "");
    assert_eq!(follow_up.messages[2].tool_calls[0].name(), "analyze_repository");

    let payload: Value = serde_json::from_str(&follow_up.messages[3].content).unwrap();
    assert_eq!(payload, json!({ "error": "Invalid or non-existent repository path provided." }));
}

#[tokio::test]
async fn test_tool_call_analyzes_repository() {
    let fx = Fixture::scripted(|repo| {
        MockChatModel::new()
            .with_tool_call("analyze_repository", json!({ "repository_path": repo }))
            .with_reply("summary of main.rs")
            .with_reply("main.rs prints scout.")
    });
    let repo = fx.repo_path();

    let reply = fx.router.handle_turn(&format!("analyze {repo}"), &mut Vec::new()).await.unwrap();
    assert_eq!(reply, "main.rs prints scout.");

    let requests = fx.model.requests();
    assert_eq!(requests.len(), 3);
    let payload: Value = serde_json::from_str(&requests[2].messages[3].content).unwrap();
    assert_eq!(payload, json!({ "repository_path": repo, "summary": "summary of main.rs" }));

    let base = fx.repo.path().file_name().unwrap().to_string_lossy().to_string();
    assert!(fx.cache_dir().join(format!("{base}.txt")).exists());
}

#[tokio::test]
async fn test_unknown_tool_yields_error_payload() {
    let fx = Fixture::new(
        MockChatModel::new().with_tool_call("delete_everything", json!({})).with_reply("Sorry."),
    );

    let message = format!("look at {}", fx.repo_path());
    let reply = fx.router.handle_turn(&message, &mut Vec::new()).await.unwrap();
    assert_eq!(reply, "Sorry.");

    let requests = fx.model.requests();
    let payload: Value = serde_json::from_str(&requests[1].messages[3].content).unwrap();
    assert_eq!(payload, json!({ "error": "Unknown tool: delete_everything" }));
}

#[tokio::test]
async fn test_reply_without_tool_call_is_returned_directly() {
    let fx = Fixture::new(MockChatModel::new().with_reply("No tool needed."));

    let message = format!("is {} big?", fx.repo_path());
    let reply = fx.router.handle_turn(&message, &mut Vec::new()).await.unwrap();
    assert_eq!(reply, "No tool needed.");
    assert_eq!(fx.model.request_count(), 1);
}

#[tokio::test]
async fn test_endpoint_error_surfaces() {
    let fx = Fixture::new(MockChatModel::new().with_status_error(500, "model not loaded"));

    let err = fx.router.handle_turn("hello", &mut Vec::new()).await.unwrap_err();
    assert!(matches!(err, RouterError::Model(ModelError::Status { status: 500, .. })));
    assert_eq!(err.to_string(), "model call failed: Error: 500, model not loaded");
}

#[tokio::test]
async fn test_shutdown_disables_retrieval() {
    let fx = Fixture::new(MockChatModel::new().with_fallback("plain"));
    assert!(fx.router.initialize().await);
    fx.router.shutdown().await;

    let reply = fx.router.handle_turn("hello", &mut Vec::new()).await.unwrap();
    assert_eq!(reply, "plain");
    assert_eq!(fx.model.request_count(), 1);
}

//! Grounded answering with a scripted chat model.

use std::sync::Arc;
use std::time::Duration;

use scout_core::{ModelError, Role};
use scout_model::MockChatModel;
use scout_rag::document::Chunk;
use scout_rag::responder::RAG_SYSTEM_PROMPT;
use scout_rag::{
    HashingEmbeddingProvider, InMemoryVectorStore, NO_GROUNDED_ANSWER, RagConfig, RagError,
    RagResponder, RetrievalStore,
};

async fn ready_store(persist: &std::path::Path) -> Arc<RetrievalStore> {
    let config = RagConfig::builder()
        .persist_directory(persist.join("vectorstore"))
        .top_k(2)
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
    assert!(store.initialize().await);
    store
        .add(vec![Chunk {
            id: String::new(),
            text: "the scheduler retries failed jobs three times".into(),
            embedding: Vec::new(),
            metadata: Default::default(),
            document_id: "jobs.md".into(),
        }])
        .await
        .unwrap();
    store
}

#[tokio::test]
async fn test_grounded_reply_is_returned_verbatim() {
    let persist = tempfile::tempdir().unwrap();
    let store = ready_store(persist.path()).await;
    let model = Arc::new(MockChatModel::new().with_reply("  Three times.  "));
    let responder = RagResponder::new(store, model.clone());

    let answer = responder.answer("how often are failed jobs retried").await.unwrap();
    assert_eq!(answer.as_deref(), Some("  Three times.  "));

    let requests = model.requests();
    assert_eq!(requests.len(), 1);
    let messages = &requests[0].messages;
    assert!(requests[0].tools.is_empty());
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::System);
    assert_eq!(messages[0].content, RAG_SYSTEM_PROMPT);
    assert_eq!(messages[1].role, Role::User);
    assert!(
        messages[1].content.starts_with("Context: the scheduler retries failed jobs three times")
    );
    assert!(
        messages[1].content.ends_with("\n\nQuestion: how often are failed jobs retried\n\nAnswer:")
    );
}

#[tokio::test]
async fn test_sentinel_reply_declines() {
    let persist = tempfile::tempdir().unwrap();
    let store = ready_store(persist.path()).await;
    let model = Arc::new(MockChatModel::new().with_reply(format!("{NO_GROUNDED_ANSWER}\n")));
    let responder = RagResponder::new(store, model);

    assert_eq!(responder.answer("what is the capital of France").await.unwrap(), None);
}

#[tokio::test]
async fn test_empty_reply_counts_as_an_answer() {
    let persist = tempfile::tempdir().unwrap();
    let store = ready_store(persist.path()).await;
    let responder = RagResponder::new(store, Arc::new(MockChatModel::new().with_reply("")));

    assert_eq!(responder.answer("anything").await.unwrap(), Some(String::new()));
}

#[tokio::test]
async fn test_unavailable_store_skips_the_model() {
    let persist = tempfile::tempdir().unwrap();
    let store = ready_store(persist.path()).await;
    store.close().await;
    let model = Arc::new(MockChatModel::new());
    let responder = RagResponder::new(store, model.clone());

    assert_eq!(responder.answer("anything").await.unwrap(), None);
    assert_eq!(model.request_count(), 0);
}

#[tokio::test]
async fn test_model_failure_propagates() {
    let persist = tempfile::tempdir().unwrap();
    let store = ready_store(persist.path()).await;
    let model = Arc::new(MockChatModel::new().with_status_error(503, "overloaded"));
    let responder = RagResponder::new(store, model);

    let err = responder.answer("anything").await.unwrap_err();
    assert!(matches!(err, RagError::Model(ModelError::Status { status: 503, .. })));
}

#[tokio::test]
async fn test_custom_system_prompt_is_sent() {
    let persist = tempfile::tempdir().unwrap();
    let store = ready_store(persist.path()).await;
    let model = Arc::new(MockChatModel::new().with_reply("ok"));
    let prompt = "Answer tersely or say no grounded answer.";
    let responder = RagResponder::new(store, model.clone()).with_system_prompt(prompt);

    responder.answer("anything").await.unwrap();
    assert_eq!(model.requests()[0].messages[0].content, prompt);
}

//! HTTP boundary tests: the router is bound to an ephemeral port and driven
//! with reqwest, with a stub generator standing in for the completion API.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use docqa::engine::Engine;
use docqa::error::GenerationError;
use docqa::generate::Generator;
use docqa::index::CorpusIndex;
use docqa::server::{router, ChatReply, NO_QUESTION_REPLY};

struct StubGenerator {
    fail: bool,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Generator for StubGenerator {
    fn model_name(&self) -> &str {
        "stub-model"
    }

    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(GenerationError::Api {
                status: 429,
                body: "rate limited".to_string(),
            });
        }
        // Echo the first context line so tests can see what was retrieved.
        let first_context = prompt
            .lines()
            .skip_while(|l| *l != "Text:")
            .nth(1)
            .unwrap_or_default();
        Ok(format!("  context starts with: {}  \n", first_context))
    }
}

async fn spawn_server(fail: bool) -> (String, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let corpus = CorpusIndex::build("A B C D E F", 2).unwrap();
    let generator = StubGenerator {
        fail,
        calls: calls.clone(),
    };
    let engine = Arc::new(Engine::new(corpus, Box::new(generator), 3));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(engine)).await.unwrap();
    });

    (format!("http://{}", addr), calls)
}

async fn chat(base: &str, body: serde_json::Value) -> ChatReply {
    let resp = reqwest::Client::new()
        .post(format!("{}/api/chat", base))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success(), "status = {}", resp.status());
    resp.json().await.unwrap()
}

#[tokio::test]
async fn test_chat_returns_trimmed_answer() {
    let (base, calls) = spawn_server(false).await;

    let reply = chat(&base, serde_json::json!({ "message": "What about C and D?" })).await;
    assert_eq!(reply.reply, "context starts with: C D");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_empty_message_short_circuits() {
    let (base, calls) = spawn_server(false).await;

    let reply = chat(&base, serde_json::json!({ "message": "" })).await;
    assert_eq!(reply.reply, NO_QUESTION_REPLY);

    let reply = chat(&base, serde_json::json!({ "message": "  \n " })).await;
    assert_eq!(reply.reply, NO_QUESTION_REPLY);

    let reply = chat(&base, serde_json::json!({})).await;
    assert_eq!(reply.reply, NO_QUESTION_REPLY);

    let reply = chat(&base, serde_json::json!({ "message": null })).await;
    assert_eq!(reply.reply, NO_QUESTION_REPLY);

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_generator_failure_is_visible_reply() {
    let (base, calls) = spawn_server(true).await;

    let reply = chat(&base, serde_json::json!({ "message": "What is E?" })).await;
    assert!(reply.reply.starts_with("Error: "), "reply = {}", reply.reply);
    assert!(reply.reply.contains("429"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_questions_share_engine() {
    let (base, calls) = spawn_server(false).await;

    let questions = ["A", "C", "E", "B", "D", "F"];
    let handles: Vec<_> = questions
        .iter()
        .map(|q| {
            let base = base.clone();
            let q = q.to_string();
            tokio::spawn(async move { chat(&base, serde_json::json!({ "message": q })).await })
        })
        .collect();

    for handle in handles {
        let reply = handle.await.unwrap();
        assert!(reply.reply.starts_with("context starts with: "));
    }
    assert_eq!(calls.load(Ordering::SeqCst), questions.len());
}

#[tokio::test]
async fn test_health_reports_corpus() {
    let (base, _) = spawn_server(false).await;

    let body: serde_json::Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model"], "stub-model");
    assert_eq!(body["chunks"], 3);
}

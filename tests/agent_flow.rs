//! MainAgent 端到端测试：临时 JSON 存储 + Mock LLM

use std::sync::Arc;

use concierge::config::{AppConfig, PlannerMode};
use concierge::create_main_agent_with_llm;
use concierge::llm::MockLlmClient;
use concierge::memory::{DocumentStore, JsonFileStore};
use tempfile::TempDir;

fn config_in(dir: &TempDir, mode: PlannerMode) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.app.store_path = dir.path().join("data").join("memory_store.json");
    cfg.planner.mode = mode;
    cfg
}

#[tokio::test]
async fn test_add_and_list_notes_persist_to_disk() {
    let dir = TempDir::new().unwrap();
    let cfg = config_in(&dir, PlannerMode::Rules);
    let mut agent =
        create_main_agent_with_llm(&cfg, Arc::new(MockLlmClient::new())).unwrap();

    assert_eq!(
        agent.handle("Add a note: Buy apples").await,
        "Note 1 saved: Buy apples"
    );
    agent.handle("note: Call the dentist").await;
    assert_eq!(
        agent.handle("list notes").await,
        "1. Buy apples\n2. Call the dentist"
    );

    let doc = JsonFileStore::new(&cfg.app.store_path).load();
    assert_eq!(doc.notes.len(), 2);
    assert_eq!(doc.notes[0].text, "Buy apples");
    assert!(doc.tasks.is_empty());
}

#[tokio::test]
async fn test_tasks_survive_new_agent_instance() {
    let dir = TempDir::new().unwrap();
    let cfg = config_in(&dir, PlannerMode::Rules);

    let mut first = create_main_agent_with_llm(&cfg, Arc::new(MockLlmClient::new())).unwrap();
    assert_eq!(
        first.handle("add task: Finish slides").await,
        "Task 1 added: Finish slides"
    );

    let mut second = create_main_agent_with_llm(&cfg, Arc::new(MockLlmClient::new())).unwrap();
    assert_eq!(second.handle("show my tasks").await, "1. [ ] Finish slides");
    assert_eq!(
        second.handle("done 1").await,
        "Task 1 completed: Finish slides"
    );
    assert_eq!(second.handle("complete task 7").await, "Task 7 not found.");
}

#[tokio::test]
async fn test_note_current_before_any_answer() {
    let dir = TempDir::new().unwrap();
    let cfg = config_in(&dir, PlannerMode::Rules);
    let mut agent =
        create_main_agent_with_llm(&cfg, Arc::new(MockLlmClient::new())).unwrap();

    assert_eq!(
        agent.handle("note current").await,
        "You must ask a question first to note the current Q+A."
    );
    assert!(JsonFileStore::new(&cfg.app.store_path).load().notes.is_empty());
}

#[tokio::test]
async fn test_empty_input_and_clarify() {
    let dir = TempDir::new().unwrap();
    let cfg = config_in(&dir, PlannerMode::Rules);
    let mut agent =
        create_main_agent_with_llm(&cfg, Arc::new(MockLlmClient::new())).unwrap();

    assert_eq!(agent.handle("").await, "Please type something.");
    assert_eq!(
        agent.handle("banana").await,
        "Could you clarify: banana?"
    );
}

#[tokio::test]
async fn test_llm_planner_then_answer_then_note_previous() {
    let dir = TempDir::new().unwrap();
    let cfg = config_in(&dir, PlannerMode::Llm);
    let llm = Arc::new(MockLlmClient::scripted([
        r#"{"action": "answer_directly", "input": "What is Rust?", "reasoning": "question"}"#,
        "Rust is a systems programming language focused on safety.",
    ]));
    let mut agent = create_main_agent_with_llm(&cfg, llm.clone()).unwrap();

    let answer = agent.handle("What is Rust?").await;
    assert_eq!(answer, "Rust is a systems programming language focused on safety.");

    let prompts = llm.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].contains("User: What is Rust?"));
    assert!(prompts[1].contains("Question:\nWhat is Rust?"));
    assert!(prompts[1].contains("user: What is Rust?"));

    assert_eq!(
        agent.handle("save the above").await,
        "Previous noted:\nRust is a systems programming language focused on safety."
    );
    let doc = JsonFileStore::new(&cfg.app.store_path).load();
    assert_eq!(doc.notes.len(), 1);
    assert_eq!(
        doc.notes[0].text,
        "Rust is a systems programming language focused on safety."
    );
}

#[tokio::test]
async fn test_llm_planner_failure_falls_back_to_rules() {
    let dir = TempDir::new().unwrap();
    let cfg = config_in(&dir, PlannerMode::Llm);
    let mut agent =
        create_main_agent_with_llm(&cfg, Arc::new(MockLlmClient::failing("offline"))).unwrap();

    assert_eq!(
        agent.handle("Add a note: Buy apples").await,
        "Note 1 saved: Buy apples"
    );
}

//! Agent 组装
//!
//! 从 AppConfig 构建完整的 MainAgent：JSON 文档存储 → NotesEngine / Worker
//! → LLM 后端 → Planner。CLI 与集成测试共用同一入口。

use std::sync::Arc;

use crate::config::AppConfig;
use crate::core::orchestrator::create_llm_from_config;
use crate::core::{AgentError, MainAgent};
use crate::llm::LlmClient;
use crate::memory::{DocumentStore, JsonFileStore};
use crate::notes::NotesEngine;
use crate::planner::create_planner;
use crate::worker::Worker;

/// 按配置创建 Agent：LLM 后端由 provider 与环境变量决定，缺 Key 时返回 Config 错误
pub fn create_main_agent(cfg: &AppConfig) -> Result<MainAgent, AgentError> {
    let llm = create_llm_from_config(cfg)?;
    create_main_agent_with_llm(cfg, llm)
}

/// 使用给定 LLM 创建 Agent（测试注入 Mock 时使用）
pub fn create_main_agent_with_llm(
    cfg: &AppConfig,
    llm: Arc<dyn LlmClient>,
) -> Result<MainAgent, AgentError> {
    let file_store = JsonFileStore::new(&cfg.app.store_path);
    file_store.ensure()?;
    tracing::info!("Using store {}", file_store.path().display());
    let store: Arc<dyn DocumentStore> = Arc::new(file_store);

    let notes = Arc::new(NotesEngine::new(store.clone()));
    let worker = Worker::new(notes.clone(), store, llm.clone());
    let planner = create_planner(&cfg.planner, llm);

    Ok(MainAgent::new(planner, worker, notes, cfg.app.context_window))
}

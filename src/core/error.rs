//! Agent 错误类型
//!
//! Planner / Worker 边界上的所有失败都收敛为 AgentError，再由 Worker 转成统一的
//! `{status: error, error: message}` 结果信封；不会以 panic 或 Err 形式逃逸到编排器。

use thiserror::Error;

use crate::llm::LlmError;
use crate::memory::StoreError;

/// Agent 运行过程中可能出现的错误（空输入、非法计划、未知动作、LLM、解析、存储等）
#[derive(Error, Debug)]
pub enum AgentError {
    /// 必填文本为空（去空白后）
    #[error("{0}")]
    EmptyInput(String),

    #[error("Invalid plan: {0}")]
    InvalidPlan(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("LLM error: {0}")]
    Generation(#[from] LlmError),

    #[error("JSON parse error: {0}")]
    JsonParseError(String),

    #[error("Task {0} not found.")]
    TaskNotFound(u64),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// 启动期配置错误（缺少 API Key、未知 provider），属于致命错误
    #[error("Config error: {0}")]
    Config(String),
}

impl AgentError {
    pub fn empty_input(what: &str) -> Self {
        AgentError::EmptyInput(format!("Empty {what} text."))
    }
}

//! Concierge - 命令行个人助理 Agent
//!
//! 模块划分：
//! - **agent**: 按配置组装 MainAgent
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误类型、会话状态、主控编排
//! - **llm**: LLM 客户端抽象与实现（Gemini / OpenRouter / 双后端 / Mock）
//! - **memory**: 对话窗口、笔记与任务的 JSON 文档存储、TF-IDF 检索
//! - **notes**: 笔记命令识别与确定性摘要
//! - **observability**: 日志初始化
//! - **planner**: 规则规划器与 LLM 规划器
//! - **tasks**: 任务存储
//! - **worker**: 动作分发与结果信封

pub mod agent;
pub mod config;
pub mod core;
pub mod llm;
pub mod memory;
pub mod notes;
pub mod observability;
pub mod planner;
pub mod tasks;
pub mod worker;

pub use crate::agent::{create_main_agent, create_main_agent_with_llm};
pub use crate::core::{AgentError, MainAgent};

//! 核心编排层：错误类型、会话状态、主控 Agent

pub mod error;
pub mod orchestrator;
pub mod state;

pub use error::AgentError;
pub use orchestrator::{create_llm_from_config, MainAgent};
pub use state::{extract_topic, ConversationState};

//! LLM 客户端抽象
//!
//! 所有后端（Gemini / OpenRouter / 双后端回退 / Mock）实现 LlmClient：complete（非流式）。
//! 上层只依赖 `generate(prompt) -> text` 这一能力，失败时返回 LlmError，由调用方自行降级。

use async_trait::async_trait;
use thiserror::Error;

use crate::memory::Message;

/// 生成失败原因（网络、鉴权、配额、超时、空响应）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    #[error("{0} missing in environment")]
    MissingApiKey(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("empty response")]
    EmptyResponse,
}

/// LLM 客户端 trait：非流式完成；generate 为单条 user 消息的便捷封装
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// 非流式完成
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError>;

    /// 后端名（用于日志）
    fn name(&self) -> &str {
        "llm"
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.complete(&[Message::user(prompt)]).await
    }
}

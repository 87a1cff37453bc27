//! OpenRouter 客户端（OpenAI 兼容格式）
//!
//! - Base URL: https://openrouter.ai/api/v1
//! - API Key: 环境变量 `OPENROUTER_API_KEY`
//! - 模型名按 OpenRouter 的 `vendor/model` 或简写（如 gpt-4o-mini）

use crate::llm::{LlmError, OpenAiClient};

pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const OPENROUTER_DEFAULT_MODEL: &str = "gpt-4o-mini";

/// 创建 OpenRouter 客户端；缺少 Key 时返回 MissingApiKey
pub fn create_openrouter_client(
    base_url: Option<&str>,
    model: &str,
    timeout_secs: u64,
) -> Result<OpenAiClient, LlmError> {
    let api_key = std::env::var("OPENROUTER_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| LlmError::MissingApiKey("OPENROUTER_API_KEY".to_string()))?;

    Ok(OpenAiClient::new(
        Some(base_url.unwrap_or(OPENROUTER_BASE_URL)),
        model,
        &api_key,
        timeout_secs,
    )
    .with_label("openrouter"))
}

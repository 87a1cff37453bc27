//! LLM 层：客户端抽象与实现（Gemini / OpenRouter / 双后端回退 / Mock）

pub mod fallback;
pub mod gemini;
pub mod mock;
pub mod openai;
pub mod openrouter;
pub mod traits;

pub use fallback::FallbackLlmClient;
pub use gemini::{GeminiClient, GEMINI_BASE_URL, GEMINI_DEFAULT_MODEL};
pub use mock::MockLlmClient;
pub use openai::OpenAiClient;
pub use openrouter::{create_openrouter_client, OPENROUTER_BASE_URL, OPENROUTER_DEFAULT_MODEL};
pub use traits::{LlmClient, LlmError};

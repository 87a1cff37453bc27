//! 双后端回退：先调 primary，失败后改调 secondary（provider = dual）

use std::sync::Arc;

use async_trait::async_trait;

use crate::llm::{LlmClient, LlmError};
use crate::memory::Message;

pub struct FallbackLlmClient {
    primary: Arc<dyn LlmClient>,
    secondary: Arc<dyn LlmClient>,
}

impl FallbackLlmClient {
    pub fn new(primary: Arc<dyn LlmClient>, secondary: Arc<dyn LlmClient>) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl LlmClient for FallbackLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        match self.primary.complete(messages).await {
            Ok(text) => Ok(text),
            Err(e) => {
                tracing::warn!(
                    "{} generate failed ({}), falling back to {}",
                    self.primary.name(),
                    e,
                    self.secondary.name()
                );
                self.secondary.complete(messages).await
            }
        }
    }

    fn name(&self) -> &str {
        "dual"
    }
}

//! Mock LLM 客户端（用于测试与离线模式，无需 API）
//!
//! - scripted：按顺序返回预设回复，用完后回显 prompt 最后一行
//! - failing：每次都返回 LlmError
//! 所有收到的 prompt 都会被记录，便于断言。

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::{LlmClient, LlmError};
use crate::memory::{Message, Role};

#[derive(Debug, Default)]
pub struct MockLlmClient {
    script: Mutex<VecDeque<String>>,
    failure: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scripted<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Mutex::new(replies.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::default()
        }
    }

    /// 收到过的 prompt（按调用顺序）
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        let last_user = messages
            .iter()
            .rev()
            .find(|m| matches!(m.role, Role::User))
            .map(|m| m.content.clone())
            .unwrap_or_default();
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(last_user.clone());
        }

        if let Some(reason) = &self.failure {
            return Err(LlmError::Request(reason.clone()));
        }

        let scripted = self.script.lock().ok().and_then(|mut s| s.pop_front());
        Ok(scripted.unwrap_or_else(|| {
            let last_line = last_user
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .unwrap_or("(no input)");
            format!("Echo from Mock: {}", last_line.trim())
        }))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_then_echo() {
        let mock = MockLlmClient::scripted(["first"]);
        assert_eq!(mock.generate("a").await.unwrap(), "first");
        assert_eq!(
            mock.generate("line one\nline two\n").await.unwrap(),
            "Echo from Mock: line two"
        );
        assert_eq!(mock.prompts().len(), 2);
    }

    #[tokio::test]
    async fn test_failing() {
        let mock = MockLlmClient::failing("down");
        assert_eq!(
            mock.generate("x").await,
            Err(LlmError::Request("down".to_string()))
        );
    }
}

//! 会话状态：滚动对话窗口 + 最近一次回答 / 问题 / 话题
//!
//! 由 MainAgent 独占持有，进程存活期间有效，重启即清空。

use crate::memory::{ConversationWindow, Role};

/// Planner / Worker 使用的紧凑上下文条数
pub const COMPACT_CONTEXT_ENTRIES: usize = 4;

const TOPIC_PREFIXES: [&str; 5] = ["what is", "what's", "define", "explain", "tell me about"];

#[derive(Debug, Clone)]
pub struct ConversationState {
    pub window: ConversationWindow,
    /// 最近一次回答（含笔记命令的回复，不含 clarify）
    pub last_answer: String,
    /// 最近一次经 Planner / Worker 产生的问答对，笔记命令不会改写
    pub last_qa: Option<(String, String)>,
    pub last_topic: String,
}

impl ConversationState {
    pub fn new(window_size: usize) -> Self {
        Self {
            window: ConversationWindow::new(window_size),
            last_answer: String::new(),
            last_qa: None,
            last_topic: String::new(),
        }
    }

    pub fn push_user(&mut self, text: &str) {
        self.window.push(Role::User, text);
    }

    pub fn push_assistant(&mut self, text: &str) {
        self.window.push(Role::Assistant, text);
    }

    /// 最近 4 条，以 " | " 拼接
    pub fn compact_context(&self) -> String {
        self.window.compact(COMPACT_CONTEXT_ENTRIES)
    }

    pub fn has_answer(&self) -> bool {
        !self.last_answer.is_empty()
    }

    /// 记录一轮真实问答
    pub fn record_answer(&mut self, question: &str, answer: &str) {
        self.last_answer = answer.to_string();
        self.last_qa = Some((question.to_string(), answer.to_string()));
    }
}

/// 去掉常见提问前缀得到话题；结果为空时返回原文
pub fn extract_topic(text: &str) -> String {
    let mut topic = text.to_lowercase();
    for prefix in TOPIC_PREFIXES {
        if let Some(rest) = topic.strip_prefix(prefix) {
            topic = rest.trim().to_string();
        }
    }
    let topic = topic.trim_matches(|c: char| matches!(c, ' ' | '?' | '.' | '!'));
    if topic.is_empty() {
        text.to_string()
    } else {
        topic.to_string()
    }
}

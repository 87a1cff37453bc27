//! 短期记忆：对话窗口
//!
//! Message / Role 供 LLM 请求使用；ConversationWindow 保留最近 N 条 `"role: text"` 记录，
//! 超出时从最旧的一条开始丢弃（FIFO），供 Planner 压缩上下文与「记下全部」使用。

use serde::{Deserialize, Serialize};

/// 消息角色（与 LLM API 一致）
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

/// 单条消息
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// 滚动对话窗口：最多保留 max_entries 条 `"role: text"`
#[derive(Clone, Debug)]
pub struct ConversationWindow {
    entries: Vec<String>,
    max_entries: usize,
}

impl ConversationWindow {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// 追加一条记录；空文本忽略
    pub fn push(&mut self, role: Role, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.entries.push(format!("{}: {}", role.as_str(), text));
        self.prune();
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// 最近 n 条以 " | " 拼接，作为 Planner / Worker 的紧凑上下文
    pub fn compact(&self, n: usize) -> String {
        let start = self.entries.len().saturating_sub(n);
        self.entries[start..].join(" | ")
    }

    fn prune(&mut self) {
        if self.entries.len() > self.max_entries {
            let excess = self.entries.len() - self.max_entries;
            self.entries.drain(..excess);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_drops_oldest() {
        let mut w = ConversationWindow::new(3);
        for i in 0..5 {
            w.push(Role::User, &format!("m{i}"));
        }
        assert_eq!(w.entries(), &["user: m2", "user: m3", "user: m4"]);
    }

    #[test]
    fn test_window_ignores_blank() {
        let mut w = ConversationWindow::new(3);
        w.push(Role::Assistant, "   ");
        assert!(w.is_empty());
    }

    #[test]
    fn test_compact_last_four() {
        let mut w = ConversationWindow::new(20);
        for i in 0..6 {
            w.push(Role::User, &format!("q{i}"));
        }
        assert_eq!(w.compact(4), "user: q2 | user: q3 | user: q4 | user: q5");
        assert_eq!(ConversationWindow::new(5).compact(4), "");
    }
}

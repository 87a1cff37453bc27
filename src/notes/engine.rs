//! NotesEngine：笔记集合的读写与确定性摘要
//!
//! 摘要从不调用模型：按空白切词，取前 N 个词，截断时追加 "..."。
//! 词数预算固定：上一条回答 30、当前问答 35、整段对话 60。
//! 元文本（澄清、客套、报错、短问句）不会被存为笔记。

use std::sync::Arc;

use crate::core::AgentError;
use crate::memory::{DocumentStore, Note};

pub const PREVIOUS_WORD_BUDGET: usize = 30;
pub const CURRENT_WORD_BUDGET: usize = 35;
pub const ALL_WORD_BUDGET: usize = 60;

/// note_all 优先取最近的 assistant 条数；没有 assistant 时退回最近的原始条数
const ALL_ASSISTANT_ENTRIES: usize = 8;
const ALL_RAW_ENTRIES: usize = 30;

const META_PREFIXES: &[&str] = &[
    "can you",
    "could you",
    "please clarify",
    "please specify",
    "i'm not sure",
    "i'm not fully sure",
    "error",
    "note added",
    "no fact",
    "no_fact",
    "please",
];

/// 确定性摘要：前 max_words 个词，截断时追加 "..."
pub fn summarize(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        return words.join(" ");
    }
    format!("{}...", words[..max_words].join(" "))
}

/// 是否为不应保存的元文本；短问句（以 ? 结尾且 ≤ 8 词）一律视为澄清
pub fn is_meta_text(text: &str) -> bool {
    let t = text.trim();
    if t.is_empty() {
        return true;
    }
    let lower = t.to_lowercase();
    if META_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        return true;
    }
    t.ends_with('?') && t.split_whitespace().count() <= 8
}

/// 笔记引擎：持有注入的文档存储，所有读操作前都重新加载
pub struct NotesEngine {
    store: Arc<dyn DocumentStore>,
}

impl NotesEngine {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// 重新加载后按插入顺序返回全部笔记
    pub fn list_notes(&self) -> Vec<Note> {
        self.store.load().notes
    }

    /// 直接添加（不做摘要）；空文本返回 EmptyInput
    pub fn add_note_raw(&self, text: &str) -> Result<Note, AgentError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AgentError::empty_input("note"));
        }
        let mut doc = self.store.load();
        let note = Note {
            id: doc.next_note_id(),
            text: text.to_string(),
        };
        doc.notes.push(note.clone());
        self.store.save(&doc)?;
        tracing::debug!(id = note.id, "note saved");
        Ok(note)
    }

    /// 保存上一条回答的摘要；空或元文本时返回空串（未保存）
    pub fn note_previous(&self, previous_answer: &str) -> Result<String, AgentError> {
        self.save_summary(previous_answer, PREVIOUS_WORD_BUDGET)
    }

    /// 保存当前问答（Q + A 拼接）的摘要
    pub fn note_current(&self, qa_text: &str) -> Result<String, AgentError> {
        self.save_summary(qa_text, CURRENT_WORD_BUDGET)
    }

    /// 摘要整段对话：优先最近 8 条 assistant 文本，否则最近 30 条原始记录
    pub fn note_all(&self, context: &[String]) -> Result<String, AgentError> {
        if context.is_empty() {
            return Ok(String::new());
        }
        let assistant: Vec<&str> = context
            .iter()
            .filter_map(|line| assistant_text(line))
            .collect();
        let text = if assistant.is_empty() {
            let start = context.len().saturating_sub(ALL_RAW_ENTRIES);
            context[start..].join("\n")
        } else {
            let start = assistant.len().saturating_sub(ALL_ASSISTANT_ENTRIES);
            assistant[start..].join("\n")
        };
        let summary = summarize(&text, ALL_WORD_BUDGET);
        if summary.is_empty() {
            return Ok(summary);
        }
        self.add_note_raw(&summary)?;
        Ok(summary)
    }

    fn save_summary(&self, text: &str, budget: usize) -> Result<String, AgentError> {
        if is_meta_text(text) {
            return Ok(String::new());
        }
        let summary = summarize(text, budget);
        self.add_note_raw(&summary)?;
        Ok(summary)
    }
}

/// `"assistant: xxx"`（前缀忽略大小写）→ `"xxx"`
fn assistant_text(line: &str) -> Option<&str> {
    const PREFIX: &str = "assistant:";
    let head = line.get(..PREFIX.len())?;
    head.eq_ignore_ascii_case(PREFIX)
        .then(|| line[PREFIX.len()..].trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;

    fn engine() -> NotesEngine {
        NotesEngine::new(Arc::new(InMemoryStore::new()))
    }

    fn words(n: usize) -> String {
        (1..=n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_summarize_truncates_with_ellipsis() {
        assert_eq!(summarize("a  b\nc", 5), "a b c");
        assert_eq!(summarize("a b c d", 2), "a b...");
        assert_eq!(summarize("   ", 3), "");
    }

    #[test]
    fn test_meta_text_filter() {
        assert!(is_meta_text(""));
        assert!(is_meta_text("Can you clarify?"));
        assert!(is_meta_text("Please specify the date"));
        assert!(is_meta_text("ERROR: quota exceeded"));
        assert!(is_meta_text("Is it raining today?"));
        assert!(!is_meta_text("Paris is the capital of France."));
        assert!(!is_meta_text(
            "Would you say that the long and winding road leads to your door?"
        ));
    }

    #[test]
    fn test_add_note_raw_assigns_sequential_ids() {
        let e = engine();
        assert_eq!(e.add_note_raw("first").unwrap().id, 1);
        assert_eq!(e.add_note_raw("second").unwrap().id, 2);
        let third = e.add_note_raw("  third  ").unwrap();
        assert_eq!(third.id, 3);
        assert_eq!(third.text, "third");

        let notes = e.list_notes();
        assert_eq!(notes.len(), 3);
        assert_eq!(notes[2], third);
    }

    #[test]
    fn test_add_note_raw_rejects_blank() {
        let e = engine();
        assert!(matches!(
            e.add_note_raw("   "),
            Err(AgentError::EmptyInput(_))
        ));
        assert!(e.list_notes().is_empty());
    }

    #[test]
    fn test_note_previous_skips_empty_and_meta() {
        let e = engine();
        assert_eq!(e.note_previous("").unwrap(), "");
        assert_eq!(e.note_previous("Can you clarify?").unwrap(), "");
        assert!(e.list_notes().is_empty());
    }

    #[test]
    fn test_note_previous_keeps_thirty_words() {
        let e = engine();
        let summary = e.note_previous(&words(40)).unwrap();
        assert_eq!(summary, format!("{}...", words(30)));
        assert_eq!(e.list_notes()[0].text, summary);
    }

    #[test]
    fn test_note_current_uses_larger_budget() {
        let e = engine();
        let summary = e.note_current(&words(50)).unwrap();
        assert_eq!(summary, format!("{}...", words(35)));
    }

    #[test]
    fn test_note_all_prefers_assistant_lines() {
        let e = engine();
        let context = vec![
            "user: what is rust".to_string(),
            "assistant: Rust is a systems language.".to_string(),
            "user: and cargo?".to_string(),
            "Assistant: Cargo is its build tool.".to_string(),
        ];
        let summary = e.note_all(&context).unwrap();
        assert_eq!(
            summary,
            "Rust is a systems language. Cargo is its build tool."
        );
        assert_eq!(e.list_notes().len(), 1);
    }

    #[test]
    fn test_note_all_falls_back_to_raw_context() {
        let e = engine();
        let context = vec!["user: hello".to_string(), "user: note all".to_string()];
        assert_eq!(e.note_all(&context).unwrap(), "user: hello user: note all");
    }

    #[test]
    fn test_note_all_keeps_last_eight_assistant_lines() {
        let e = engine();
        let context: Vec<String> = (1..=10).map(|i| format!("assistant: a{i}")).collect();
        assert_eq!(e.note_all(&context).unwrap(), "a3 a4 a5 a6 a7 a8 a9 a10");
    }

    #[test]
    fn test_note_all_empty_context() {
        let e = engine();
        assert_eq!(e.note_all(&[]).unwrap(), "");
        assert!(e.list_notes().is_empty());
    }
}

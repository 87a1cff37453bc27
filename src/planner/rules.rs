//! 规则规划器（离线、确定性）
//!
//! 固定顺序的前缀/子串规则（忽略大小写），第一个命中者生效；全部未命中时返回 clarify。
//! 同时作为 LLM 规划器的兜底。

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{Action, Plan, Planner};

static ADD_NOTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(add\s+(a\s+)?note\b|note\b)").expect("valid add-note regex"));
static ADD_NOTE_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(add\s+(a\s+)?note:?\s*|note:?\s*)").expect("valid add-note prefix regex")
});
static ADD_TASK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(add\s+(a\s+)?task\b|task\b)").expect("valid add-task regex"));
static ADD_TASK_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(add\s+(a\s+)?task:?\s*|task:?\s*)").expect("valid add-task prefix regex")
});
static COMPLETE_TASK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(complete|finish|done)\s+(task\s*)?#?(\d+)\b").expect("valid complete regex")
});
static LIST_TASKS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(show my tasks|list tasks|list my tasks|show tasks)\b")
        .expect("valid list-tasks regex")
});
static LIST_NOTES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(show my notes|list my notes)\b").expect("valid list-notes regex")
});
static SEARCH_MEMORY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(search|find in)\s+(my\s+)?notes\b(\s+for\b)?:?\s*")
        .expect("valid search-memory regex")
});
static WEB_SEARCH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(search|find|look up)").expect("valid web-search regex"));
static WEB_SEARCH_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(search\s+for|search|find|look up)\s*").expect("valid web-search prefix regex")
});
static QUESTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(what|what's|who|whom|whose|why|how|when|where|which|explain|define|describe|tell me about)\b",
    )
    .expect("valid question regex")
});

/// 规则规划器
#[derive(Debug, Default, Clone)]
pub struct RuleBasedPlanner;

impl RuleBasedPlanner {
    pub fn new() -> Self {
        Self
    }

    /// 对原文逐条匹配规则
    pub fn plan(&self, text: &str) -> Plan {
        let q = text.trim();
        let low = q.to_lowercase();

        if ADD_NOTE_RE.is_match(q) {
            let content = ADD_NOTE_PREFIX_RE.replace(q, "").trim().to_string();
            return Plan::new(
                Action::AddNote,
                non_empty_or(content, "Untitled note"),
                "Add note detected.",
            );
        }

        if ADD_TASK_RE.is_match(q) {
            let content = ADD_TASK_PREFIX_RE.replace(q, "").trim().to_string();
            return Plan::new(
                Action::AddTask,
                non_empty_or(content, "Untitled task"),
                "Add task detected.",
            );
        }

        if let Some(caps) = COMPLETE_TASK_RE.captures(q) {
            return Plan::new(Action::CompleteTask, &caps[3], "Task completion requested.");
        }

        if LIST_TASKS_RE.is_match(q) {
            return Plan::new(Action::ListTasks, "", "User asked to see tasks.");
        }

        if LIST_NOTES_RE.is_match(q) {
            return Plan::new(Action::ListNotes, "", "User asked to see notes.");
        }

        if SEARCH_MEMORY_RE.is_match(q) {
            let content = SEARCH_MEMORY_RE.replace(q, "").trim().to_string();
            return Plan::new(
                Action::SearchMemory,
                non_empty_or(content, q),
                "Search of saved notes and tasks requested.",
            );
        }

        if WEB_SEARCH_RE.is_match(q) || low.contains("search for") {
            let content = WEB_SEARCH_PREFIX_RE.replace(q, "").trim().to_string();
            return Plan::new(
                Action::WebSearch,
                non_empty_or(content, q),
                "Search requested.",
            );
        }

        if QUESTION_RE.is_match(q) || q.ends_with('?') {
            return Plan::new(Action::AnswerDirectly, q, "Question detected.");
        }

        Plan::clarify(q, "Ambiguous - ask for clarification.")
    }
}

fn non_empty_or(content: String, default: &str) -> String {
    if content.is_empty() {
        default.to_string()
    } else {
        content
    }
}

#[async_trait]
impl Planner for RuleBasedPlanner {
    async fn decide(&self, text: &str, _context: &str) -> Plan {
        self.plan(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(text: &str) -> Plan {
        RuleBasedPlanner::new().plan(text)
    }

    #[test]
    fn test_add_note_strips_prefix() {
        let p = plan("Add a note: Buy apples");
        assert_eq!(p.action, Action::AddNote);
        assert_eq!(p.input, "Buy apples");

        assert_eq!(plan("note: call the bank").input, "call the bank");
        assert_eq!(plan("add note   pick up keys ").input, "pick up keys");
        assert_eq!(plan("Add note:").input, "Untitled note");
    }

    #[test]
    fn test_add_task_strips_prefix() {
        let p = plan("Add task: Finish slides");
        assert_eq!(p.action, Action::AddTask);
        assert_eq!(p.input, "Finish slides");
        assert_eq!(plan("task prepare slides").input, "prepare slides");
    }

    #[test]
    fn test_complete_task_extracts_id() {
        let p = plan("complete task #3");
        assert_eq!(p.action, Action::CompleteTask);
        assert_eq!(p.input, "3");
        assert_eq!(plan("done 12").input, "12");
    }

    #[test]
    fn test_list_rules() {
        assert_eq!(plan("Show my tasks").action, Action::ListTasks);
        assert_eq!(plan("could you list tasks please").action, Action::ListTasks);
        assert_eq!(plan("please show my notes").action, Action::ListNotes);
    }

    #[test]
    fn test_search_rules() {
        let p = plan("Search for cheapest milk near me");
        assert_eq!(p.action, Action::WebSearch);
        assert_eq!(p.input, "cheapest milk near me");
        assert_eq!(plan("look up rust traits").input, "rust traits");

        let m = plan("search my notes for milk");
        assert_eq!(m.action, Action::SearchMemory);
        assert_eq!(m.input, "milk");
    }

    #[test]
    fn test_questions_answer_directly() {
        assert_eq!(plan("What is Rust?").action, Action::AnswerDirectly);
        assert_eq!(plan("explain borrowing").action, Action::AnswerDirectly);
        assert_eq!(plan("is it going to rain?").action, Action::AnswerDirectly);
    }

    #[test]
    fn test_unmatched_is_clarify() {
        for text in ["Remind me to call Mom tomorrow at 6pm", "banana", "notes app idea"] {
            // "notes" 不命中 `note\b`
            let p = plan(text);
            assert_eq!(p.action, Action::Clarify, "{text}");
            assert_eq!(p.input, text);
            assert!(p.reasoning.to_lowercase().contains("ambiguous"));
        }
    }
}

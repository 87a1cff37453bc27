//! 统一结果信封与动作输出
//!
//! 成功：`{"status": "ok", "action": ..., "output": ...}`；失败：`{"status": "error", "error": ...}`。
//! render_text 把输出转为给用户看的纯文本。

use serde::Serialize;

use crate::memory::{HitKind, Note, SearchHit, Task};
use crate::planner::Action;

/// web_search 的占位结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebResult {
    pub title: String,
    pub snippet: String,
    pub link: String,
}

/// 各动作的输出
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ActionOutput {
    Note(Note),
    Task(Task),
    Notes(Vec<Note>),
    Tasks(Vec<Task>),
    Hits(Vec<SearchHit>),
    WebResults(Vec<WebResult>),
    Text(String),
}

impl ActionOutput {
    pub fn render_text(&self) -> String {
        match self {
            ActionOutput::Note(n) => format!("Note {} saved: {}", n.id, n.text),
            ActionOutput::Task(t) if t.done => format!("Task {} completed: {}", t.id, t.text),
            ActionOutput::Task(t) => format!("Task {} added: {}", t.id, t.text),
            ActionOutput::Notes(notes) if notes.is_empty() => "You have no notes.".to_string(),
            ActionOutput::Notes(notes) => notes
                .iter()
                .map(|n| format!("{}. {}", n.id, n.text))
                .collect::<Vec<_>>()
                .join("\n"),
            ActionOutput::Tasks(tasks) if tasks.is_empty() => "You have no tasks.".to_string(),
            ActionOutput::Tasks(tasks) => tasks
                .iter()
                .map(|t| format!("{}. [{}] {}", t.id, if t.done { "x" } else { " " }, t.text))
                .collect::<Vec<_>>()
                .join("\n"),
            ActionOutput::Hits(hits) if hits.is_empty() => {
                "Nothing in your notes or tasks matches.".to_string()
            }
            ActionOutput::Hits(hits) => hits
                .iter()
                .map(|h| {
                    let kind = match h.kind {
                        HitKind::Note => "note",
                        HitKind::Task => "task",
                    };
                    format!("[{} {}] {} ({:.2})", kind, h.id, h.text, h.score)
                })
                .collect::<Vec<_>>()
                .join("\n"),
            ActionOutput::WebResults(results) => results
                .iter()
                .map(|r| format!("{} - {} ({})", r.title, r.snippet, r.link))
                .collect::<Vec<_>>()
                .join("\n"),
            ActionOutput::Text(text) => text.trim().to_string(),
        }
    }
}

/// 结果信封
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ActionResult {
    Ok { action: Action, output: ActionOutput },
    Error { error: String },
}

impl ActionResult {
    pub fn ok(action: Action, output: ActionOutput) -> Self {
        ActionResult::Ok { action, output }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ActionResult::Error {
            error: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ActionResult::Ok { .. })
    }

    /// 给用户的回答文本：成功取输出，失败取错误信息；都为空时给出兜底文案
    pub fn answer_text(&self) -> String {
        let text = match self {
            ActionResult::Ok { output, .. } => output.render_text(),
            ActionResult::Error { error } => error.trim().to_string(),
        };
        if !text.is_empty() {
            return text;
        }
        match self {
            ActionResult::Ok { .. } => "(No response.)".to_string(),
            ActionResult::Error { .. } => "An error occurred.".to_string(),
        }
    }
}

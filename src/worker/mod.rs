//! Worker：动作分发表
//!
//! 每个 [`Action`] 对应一个处理函数；按名字分发时未知动作走 UnknownAction 分支。
//! 处理函数内部的错误统一转成 `{status: error}` 信封，Worker 从不向调用方返回 Err。
//! 每次分发输出一条结构化审计日志（JSON）。

pub mod output;

use std::sync::Arc;
use std::time::Instant;

pub use output::{ActionOutput, ActionResult, WebResult};

use crate::core::AgentError;
use crate::llm::LlmClient;
use crate::memory::{search, DocumentStore};
use crate::notes::NotesEngine;
use crate::planner::{Action, Plan};
use crate::tasks::TasksStore;

const ANSWER_INSTRUCTIONS: &str = "You are a helpful, concise assistant. Answer directly and briefly.";

/// Worker：持有笔记引擎、任务存储、文档存储（检索用）与 LLM
pub struct Worker {
    notes: Arc<NotesEngine>,
    tasks: TasksStore,
    store: Arc<dyn DocumentStore>,
    llm: Arc<dyn LlmClient>,
}

impl Worker {
    pub fn new(
        notes: Arc<NotesEngine>,
        store: Arc<dyn DocumentStore>,
        llm: Arc<dyn LlmClient>,
    ) -> Self {
        Self {
            notes,
            tasks: TasksStore::new(store.clone()),
            store,
            llm,
        }
    }

    /// 按动作名分发（名字来自外部时使用）；未注册的名字返回 UnknownAction 错误信封
    pub async fn dispatch(&self, action: &str, input: &str, context: &str) -> ActionResult {
        match action.parse::<Action>() {
            Ok(action) => self.run(action, input, context).await,
            Err(e) => {
                tracing::warn!(action, "rejected unknown action");
                ActionResult::error(e.to_string())
            }
        }
    }

    /// 执行已校验的计划
    pub async fn execute(&self, plan: &Plan) -> ActionResult {
        self.run(
            plan.action,
            &plan.input,
            plan.context.as_deref().unwrap_or_default(),
        )
        .await
    }

    async fn run(&self, action: Action, input: &str, context: &str) -> ActionResult {
        let start = Instant::now();
        let result = match self.handle(action, input, context).await {
            Ok(output) => ActionResult::ok(action, output),
            Err(e) => ActionResult::error(e.to_string()),
        };

        let audit = serde_json::json!({
            "event": "action_audit",
            "action": action.as_str(),
            "ok": result.is_ok(),
            "duration_ms": start.elapsed().as_millis() as u64,
            "input_preview": input_preview(input),
        });
        if let ActionResult::Error { error } = &result {
            tracing::warn!(audit = %audit, "action failed: {}", error);
        } else {
            tracing::info!(audit = %audit, "action");
        }
        result
    }

    async fn handle(
        &self,
        action: Action,
        input: &str,
        context: &str,
    ) -> Result<ActionOutput, AgentError> {
        match action {
            Action::AddNote => self.notes.add_note_raw(input).map(ActionOutput::Note),
            Action::AddTask => self.tasks.add_task(input).map(ActionOutput::Task),
            Action::ListTasks => Ok(ActionOutput::Tasks(self.tasks.list_tasks())),
            Action::ListNotes => Ok(ActionOutput::Notes(self.notes.list_notes())),
            Action::CompleteTask => self.complete_task(input),
            Action::SearchMemory => Ok(ActionOutput::Hits(search(&self.store.load(), input))),
            Action::WebSearch => Ok(web_search(input)),
            Action::AnswerDirectly => self.answer_directly(input, context).await,
            Action::Clarify => Ok(ActionOutput::Text(format!(
                "Could you clarify: {}?",
                input.trim()
            ))),
        }
    }

    fn complete_task(&self, input: &str) -> Result<ActionOutput, AgentError> {
        let raw = input.trim().trim_start_matches('#');
        let id: u64 = raw
            .parse()
            .map_err(|_| AgentError::InvalidPlan(format!("'{}' is not a task id", input.trim())))?;
        self.tasks
            .complete_task(id)?
            .map(ActionOutput::Task)
            .ok_or(AgentError::TaskNotFound(id))
    }

    async fn answer_directly(&self, input: &str, context: &str) -> Result<ActionOutput, AgentError> {
        let question = input.trim();
        if question.is_empty() {
            return Ok(ActionOutput::Text(
                "I didn't receive a clear question. Please repeat.".to_string(),
            ));
        }
        let prompt = format!(
            "{ANSWER_INSTRUCTIONS}\n\nContext:\n{context}\n\nQuestion:\n{question}\n\n\
             Return ONLY the answer text (no JSON, no tags)."
        );
        let answer = self.llm.generate(&prompt).await?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Ok(ActionOutput::Text(
                "(No response generated - check LLM settings.)".to_string(),
            ));
        }
        Ok(ActionOutput::Text(answer.to_string()))
    }
}

/// 占位搜索：返回一条合成结果
fn web_search(query: &str) -> ActionOutput {
    ActionOutput::WebResults(vec![WebResult {
        title: format!("Dummy search result for '{}'", query.trim()),
        snippet: "This is a placeholder search result.".to_string(),
        link: "https://example.com".to_string(),
    }])
}

fn input_preview(input: &str) -> String {
    if input.chars().count() > 200 {
        format!("{}...", input.chars().take(200).collect::<String>())
    } else {
        input.to_string()
    }
}

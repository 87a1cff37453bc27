//! MainAgent：单轮对话编排
//!
//! 每一轮：空输入短路 → 记录 user 条目 → 笔记命令拦截（不经过 Planner）
//! → Planner 决策 → Worker 执行 → 提取回答、更新 last_answer / last_topic / 对话窗口。
//! handle 永不返回错误，所有失败都降级为给用户的文本。

use std::sync::Arc;

use crate::config::{AppConfig, Provider};
use crate::core::state::{extract_topic, ConversationState};
use crate::core::AgentError;
use crate::llm::{
    create_openrouter_client, FallbackLlmClient, GeminiClient, LlmClient, LlmError, MockLlmClient,
};
use crate::notes::{NoteCommand, NotesEngine};
use crate::planner::{Action, Planner};
use crate::worker::{ActionResult, Worker};

const EMPTY_INPUT_REPLY: &str = "Please type something.";
const NOTE_CURRENT_WITHOUT_ANSWER: &str =
    "You must ask a question first to note the current Q+A.";

/// 主控 Agent：持有 Planner、Worker、NotesEngine 与会话状态
pub struct MainAgent {
    planner: Arc<dyn Planner>,
    worker: Worker,
    notes: Arc<NotesEngine>,
    state: ConversationState,
}

impl MainAgent {
    pub fn new(
        planner: Arc<dyn Planner>,
        worker: Worker,
        notes: Arc<NotesEngine>,
        window_size: usize,
    ) -> Self {
        Self {
            planner,
            worker,
            notes,
            state: ConversationState::new(window_size),
        }
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    /// 处理一轮用户输入，返回回答文本
    pub async fn handle(&mut self, text: &str) -> String {
        let query = text.trim();
        if query.is_empty() {
            return EMPTY_INPUT_REPLY.to_string();
        }

        self.state.push_user(query);

        if let Some(cmd) = NoteCommand::detect(query) {
            tracing::debug!(?cmd, "note command intercepted");
            return self.handle_note_command(cmd);
        }

        let context = self.state.compact_context();
        let mut plan = self.planner.decide(query, &context).await;
        if plan.context.is_none() {
            plan.context = Some(context);
        }
        tracing::info!(action = %plan.action, reasoning = %plan.reasoning, "plan decided");

        let result = self.worker.execute(&plan).await;
        let answer = result.answer_text();

        let is_clarify = matches!(
            result,
            ActionResult::Ok {
                action: Action::Clarify,
                ..
            }
        );
        if !is_clarify {
            self.state.record_answer(query, &answer);
        }
        self.state.last_topic = extract_topic(query);
        self.state.push_assistant(&answer);
        answer
    }

    fn handle_note_command(&mut self, cmd: NoteCommand) -> String {
        let reply = match cmd {
            NoteCommand::ListNotes => {
                let notes = self.notes.list_notes();
                if notes.is_empty() {
                    Ok("You have no notes.".to_string())
                } else {
                    Ok(notes
                        .iter()
                        .map(|n| format!("{}. {}", n.id, n.text))
                        .collect::<Vec<_>>()
                        .join("\n"))
                }
            }
            NoteCommand::NoteAll => self
                .notes
                .note_all(self.state.window.entries())
                .map(note_all_reply),
            NoteCommand::NotePrevious => {
                if !self.state.has_answer() {
                    return self.reply_only("Nothing above to note.");
                }
                self.notes
                    .note_previous(&self.state.last_answer)
                    .map(|summary| saved_or_skipped(summary, "Previous noted:\n"))
            }
            NoteCommand::Confirmation => {
                if !self.state.has_answer() {
                    return self.reply_only("Nothing to confirm.");
                }
                self.notes
                    .note_previous(&self.state.last_answer)
                    .map(|summary| saved_or_skipped(summary, "Note added:\n"))
            }
            NoteCommand::NoteCurrent => {
                let qa = self
                    .state
                    .last_qa
                    .as_ref()
                    .map(|(question, answer)| format!("Q: {question}\nA: {answer}"));
                let Some(qa) = qa else {
                    return self.reply_only(NOTE_CURRENT_WITHOUT_ANSWER);
                };
                self.notes
                    .note_current(&qa)
                    .map(|summary| saved_or_skipped(summary, "Note added:\n"))
            }
        };

        let msg = reply.unwrap_or_else(|e| {
            tracing::warn!("note command failed: {}", e);
            format!("Could not save note: {e}")
        });
        self.state.last_answer = msg.clone();
        self.state.push_assistant(&msg);
        msg
    }

    /// 只回复、不改 last_answer（前置条件不满足的分支）
    fn reply_only(&mut self, msg: &str) -> String {
        self.state.push_assistant(msg);
        msg.to_string()
    }
}

/// note all 只在对话窗口为空时得到空摘要
fn note_all_reply(summary: String) -> String {
    if summary.is_empty() {
        "Nothing to summarise.".to_string()
    } else {
        format!("All previous noted.\n\n{summary}")
    }
}

fn saved_or_skipped(summary: String, header: &str) -> String {
    if summary.is_empty() {
        "Nothing appropriate to save.".to_string()
    } else {
        format!("{header}{summary}")
    }
}

/// 根据配置与环境变量创建 LLM 后端；所需 Key 缺失时返回 Config 错误（启动期致命）
pub fn create_llm_from_config(cfg: &AppConfig) -> Result<Arc<dyn LlmClient>, AgentError> {
    let timeout = cfg.llm.timeouts.request;
    let gemini = || {
        GeminiClient::from_env(&cfg.llm.gemini.model, timeout).map(|client| {
            match &cfg.llm.gemini.base_url {
                Some(url) => client.with_base_url(url.clone()),
                None => client,
            }
        })
    };
    let openrouter = || {
        create_openrouter_client(
            cfg.llm.openrouter.base_url.as_deref(),
            &cfg.llm.openrouter.model,
            timeout,
        )
    };

    match cfg.llm.provider {
        Provider::Mock => {
            tracing::info!("Using Mock LLM (offline)");
            Ok(Arc::new(MockLlmClient::new()))
        }
        Provider::Gemini => {
            let client = gemini().map_err(config_error)?;
            tracing::info!("Using Gemini LLM ({})", cfg.llm.gemini.model);
            Ok(Arc::new(client))
        }
        Provider::OpenRouter => {
            let client = openrouter().map_err(config_error)?;
            tracing::info!("Using OpenRouter LLM ({})", cfg.llm.openrouter.model);
            Ok(Arc::new(client))
        }
        Provider::Dual => match (gemini(), openrouter()) {
            (Ok(g), Ok(o)) => {
                tracing::info!(
                    "Using Gemini ({}) with OpenRouter ({}) fallback",
                    cfg.llm.gemini.model,
                    cfg.llm.openrouter.model
                );
                Ok(Arc::new(FallbackLlmClient::new(Arc::new(g), Arc::new(o))))
            }
            (Ok(g), Err(e)) => {
                tracing::warn!("OpenRouter unavailable ({}), using Gemini only", e);
                Ok(Arc::new(g))
            }
            (Err(e), Ok(o)) => {
                tracing::warn!("Gemini unavailable ({}), using OpenRouter only", e);
                Ok(Arc::new(o))
            }
            (Err(_), Err(_)) => Err(AgentError::Config(
                "provider 'dual' needs GEMINI_API_KEY or OPENROUTER_API_KEY".to_string(),
            )),
        },
    }
}

fn config_error(e: LlmError) -> AgentError {
    AgentError::Config(e.to_string())
}

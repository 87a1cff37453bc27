//! LLM 规划器
//!
//! 固定指令模板 + 上下文 + 用户原文发给 LLM，解析返回的 JSON 计划。
//! 生成失败、解析失败、字段缺失或非法时一律退回规则规划器对同一输入的结果，不向外抛错。

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use schemars::schema_for;

use super::{parse_plan, Action, Plan, Planner, RuleBasedPlanner};
use crate::core::AgentError;
use crate::llm::LlmClient;

/// 计划格式的 JSON Schema，拼入 prompt 以减少格式错误
pub fn plan_schema_json() -> String {
    let schema = schema_for!(Plan);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

fn default_template() -> String {
    let actions = Action::ALL
        .iter()
        .map(Action::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "You are a planner for a personal concierge. Classify the user's intent.\n\
         Output ONLY a JSON object with keys: action, input, reasoning.\n\
         Allowed actions: {actions}\n\
         Use answer_directly for questions you can answer, clarify when the intent is unclear.\n\
         JSON Schema:\n{}",
        plan_schema_json()
    )
}

/// 读取自定义模板（config/prompts/planner.txt），不存在时使用内置模板
pub fn load_planner_template(path: Option<&PathBuf>) -> String {
    let candidates: Vec<PathBuf> = match path {
        Some(p) => vec![p.clone()],
        None => vec![
            PathBuf::from("config/prompts/planner.txt"),
            PathBuf::from("../config/prompts/planner.txt"),
        ],
    };
    candidates
        .into_iter()
        .find_map(|p| std::fs::read_to_string(p).ok())
        .unwrap_or_else(default_template)
}

/// LLM 规划器：持有 LLM、模板与规则兜底
pub struct LlmPlanner {
    llm: Arc<dyn LlmClient>,
    template: String,
    fallback: RuleBasedPlanner,
}

impl LlmPlanner {
    pub fn new(llm: Arc<dyn LlmClient>, template: impl Into<String>) -> Self {
        Self {
            llm,
            template: template.into(),
            fallback: RuleBasedPlanner::new(),
        }
    }

    pub fn with_default_template(llm: Arc<dyn LlmClient>) -> Self {
        Self::new(llm, default_template())
    }

    fn build_prompt(&self, text: &str, context: &str) -> String {
        let context = if context.trim().is_empty() { "None" } else { context };
        format!(
            "{}\n\nContext: {}\nUser: {}\nReturn ONLY VALID JSON.\n",
            self.template, context, text
        )
    }

    async fn try_decide(&self, text: &str, context: &str) -> Result<Plan, AgentError> {
        let raw = self.llm.generate(&self.build_prompt(text, context)).await?;
        parse_plan(&raw)
    }
}

#[async_trait]
impl Planner for LlmPlanner {
    async fn decide(&self, text: &str, context: &str) -> Plan {
        match self.try_decide(text, context).await {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!("LLM planner failed, falling back to rules: {}", e);
                self.fallback.plan(text)
            }
        }
    }
}

//! 规划层：文本 + 紧凑上下文 → 经过校验的 Plan
//!
//! 两种实现同属 Planner trait，构造时选定：
//! - RuleBasedPlanner：规则匹配，始终可用
//! - LlmPlanner：委托 LLM，任何失败都退回规则结果

pub mod delegate;
pub mod plan;
pub mod rules;

use std::sync::Arc;

use async_trait::async_trait;

pub use delegate::{load_planner_template, plan_schema_json, LlmPlanner};
pub use plan::{parse_plan, parse_plan_json, validate_plan, Action, Plan};
pub use rules::RuleBasedPlanner;

use crate::config::{PlannerMode, PlannerSection};
use crate::llm::LlmClient;

/// 规划器 trait：decide 总能返回一个合法 Plan
#[async_trait]
pub trait Planner: Send + Sync {
    async fn decide(&self, text: &str, context: &str) -> Plan;
}

/// 按配置选择规划策略
pub fn create_planner(cfg: &PlannerSection, llm: Arc<dyn LlmClient>) -> Arc<dyn Planner> {
    match cfg.mode {
        PlannerMode::Rules => {
            tracing::info!("Using rule-based planner");
            Arc::new(RuleBasedPlanner::new())
        }
        PlannerMode::Llm => {
            tracing::info!("Using LLM planner ({})", llm.name());
            let template = load_planner_template(cfg.prompt_path.as_ref());
            Arc::new(LlmPlanner::new(llm, template))
        }
    }
}

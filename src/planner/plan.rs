//! Plan：每轮生成、不持久化的结构化动作 `{action, input, reasoning, context?}`
//!
//! validate_plan 是唯一的校验入口：action / input / reasoning 必须是字符串，且 action 属于 [`Action`]。
//! parse_plan 负责从模型输出中剥离 Markdown 代码块并提取 JSON 对象。

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::AgentError;

/// 允许的动作集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    AddNote,
    AddTask,
    ListTasks,
    ListNotes,
    CompleteTask,
    SearchMemory,
    WebSearch,
    AnswerDirectly,
    Clarify,
}

impl Action {
    pub const ALL: [Action; 9] = [
        Action::AddNote,
        Action::AddTask,
        Action::ListTasks,
        Action::ListNotes,
        Action::CompleteTask,
        Action::SearchMemory,
        Action::WebSearch,
        Action::AnswerDirectly,
        Action::Clarify,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::AddNote => "add_note",
            Action::AddTask => "add_task",
            Action::ListTasks => "list_tasks",
            Action::ListNotes => "list_notes",
            Action::CompleteTask => "complete_task",
            Action::SearchMemory => "search_memory",
            Action::WebSearch => "web_search",
            Action::AnswerDirectly => "answer_directly",
            Action::Clarify => "clarify",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| AgentError::UnknownAction(s.to_string()))
    }
}

/// 经过校验的计划
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Plan {
    /// 要执行的动作
    pub action: Action,
    /// 动作输入（笔记/任务文本、搜索词、问题原文等）
    pub input: String,
    /// 选择该动作的简短理由
    pub reasoning: String,
    /// 压缩后的最近对话（可选）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Plan {
    pub fn new(action: Action, input: impl Into<String>, reasoning: impl Into<String>) -> Self {
        Self {
            action,
            input: input.into(),
            reasoning: reasoning.into(),
            context: None,
        }
    }

    pub fn clarify(input: impl Into<String>, reasoning: impl Into<String>) -> Self {
        Self::new(Action::Clarify, input, reasoning)
    }
}

fn required_str<'a>(obj: &'a serde_json::Map<String, Value>, key: &str) -> Result<&'a str, AgentError> {
    match obj.get(key) {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(AgentError::InvalidPlan(format!("'{key}' must be a string"))),
        None => Err(AgentError::InvalidPlan(format!("missing '{key}'"))),
    }
}

/// 校验一个 JSON 值是否为合法计划
pub fn validate_plan(value: &Value) -> Result<Plan, AgentError> {
    let obj = value
        .as_object()
        .ok_or_else(|| AgentError::InvalidPlan("plan must be a JSON object".to_string()))?;
    let action_name = required_str(obj, "action")?;
    let action = action_name
        .parse::<Action>()
        .map_err(|_| AgentError::InvalidPlan(format!("action '{action_name}' is not allowed")))?;
    let input = required_str(obj, "input")?;
    let reasoning = required_str(obj, "reasoning")?;
    let context = obj.get("context").and_then(Value::as_str).map(String::from);

    Ok(Plan {
        action,
        input: input.to_string(),
        reasoning: reasoning.to_string(),
        context,
    })
}

/// 去掉 ```json ... ``` 包裹
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let body = trimmed.trim_start_matches("```json").trim_start_matches("```");
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// 从模型输出解析 JSON：先整体解析，失败再取首个 '{' 到最后一个 '}'
pub fn parse_plan_json(raw: &str) -> Result<Value, AgentError> {
    let clean = strip_code_fences(raw);
    match serde_json::from_str::<Value>(clean) {
        Ok(v) => Ok(v),
        Err(first) => {
            let (Some(start), Some(end)) = (clean.find('{'), clean.rfind('}')) else {
                return Err(AgentError::JsonParseError(first.to_string()));
            };
            if end <= start {
                return Err(AgentError::JsonParseError(first.to_string()));
            }
            serde_json::from_str(&clean[start..=end])
                .map_err(|e| AgentError::JsonParseError(format!("{}: {}", e, preview(clean))))
        }
    }
}

/// 解析 + 校验
pub fn parse_plan(raw: &str) -> Result<Plan, AgentError> {
    validate_plan(&parse_plan_json(raw)?)
}

fn preview(s: &str) -> String {
    if s.chars().count() > 200 {
        format!("{}...", s.chars().take(200).collect::<String>())
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_round_trips_through_names() {
        for a in Action::ALL {
            assert_eq!(a.as_str().parse::<Action>().unwrap(), a);
        }
        assert!(matches!(
            "fly_to_moon".parse::<Action>(),
            Err(AgentError::UnknownAction(name)) if name == "fly_to_moon"
        ));
    }

    #[test]
    fn test_validate_accepts_well_formed_plan() {
        let plan = validate_plan(&json!({
            "action": "add_task",
            "input": "Finish slides",
            "reasoning": "task",
            "context": "user: hi"
        }))
        .unwrap();
        assert_eq!(plan.action, Action::AddTask);
        assert_eq!(plan.context.as_deref(), Some("user: hi"));
    }

    #[test]
    fn test_validate_rejects_bad_plans() {
        let cases = [
            json!(["add_note"]),
            json!({"action": "add_note", "input": "x"}),
            json!({"action": "teleport", "input": "x", "reasoning": "r"}),
            json!({"action": "add_note", "input": 5, "reasoning": "r"}),
            json!({"action": 1, "input": "x", "reasoning": "r"}),
        ];
        for case in cases {
            assert!(
                matches!(validate_plan(&case), Err(AgentError::InvalidPlan(_))),
                "{case} should be invalid"
            );
        }
    }

    #[test]
    fn test_parse_strips_code_fences() {
        let raw = "```json\n{\"action\": \"list_tasks\", \"input\": \"\", \"reasoning\": \"r\"}\n```";
        assert_eq!(parse_plan(raw).unwrap().action, Action::ListTasks);
    }

    #[test]
    fn test_parse_extracts_embedded_object() {
        let raw = "Sure! {\"action\": \"web_search\", \"input\": \"milk\", \"reasoning\": \"r\"} hope that helps";
        assert_eq!(parse_plan(raw).unwrap().input, "milk");
    }

    #[test]
    fn test_parse_garbage_is_parse_error() {
        assert!(matches!(
            parse_plan("no json here"),
            Err(AgentError::JsonParseError(_))
        ));
    }
}

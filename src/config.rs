//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `CONCIERGE__*` 覆盖（双下划线表示嵌套，如 `CONCIERGE__LLM__PROVIDER=gemini`）。
//! API Key 不进配置文件，只从 `GEMINI_API_KEY` / `OPENROUTER_API_KEY` 读取。

use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSection,
    pub llm: LlmSection,
    pub planner: PlannerSection,
}

/// [app] 段：存储文件、对话窗口、日志
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppSection {
    pub name: Option<String>,
    /// 笔记与任务的 JSON 文档路径
    pub store_path: PathBuf,
    /// 滚动对话窗口保留的条数
    pub context_window: usize,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: None,
            store_path: PathBuf::from("data/memory_store.json"),
            context_window: 20,
            log_dir: PathBuf::from("logs"),
            log_level: "info".to_string(),
        }
    }
}

/// LLM 后端选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gemini,
    OpenRouter,
    /// 先 Gemini，失败回退 OpenRouter
    #[default]
    Dual,
    /// 离线 Mock（无需 Key）
    Mock,
}

/// [llm] 段：后端选择、模型与超时
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LlmSection {
    pub provider: Provider,
    pub gemini: LlmGeminiSection,
    pub openrouter: LlmOpenRouterSection,
    pub timeouts: LlmTimeoutsSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmGeminiSection {
    pub model: String,
    /// 未设置时使用官方 v1beta 端点
    pub base_url: Option<String>,
}

impl Default for LlmGeminiSection {
    fn default() -> Self {
        Self {
            model: crate::llm::GEMINI_DEFAULT_MODEL.to_string(),
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmOpenRouterSection {
    pub model: String,
    pub base_url: Option<String>,
}

impl Default for LlmOpenRouterSection {
    fn default() -> Self {
        Self {
            model: crate::llm::OPENROUTER_DEFAULT_MODEL.to_string(),
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmTimeoutsSection {
    /// 单次生成请求超时（秒）
    pub request: u64,
}

impl Default for LlmTimeoutsSection {
    fn default() -> Self {
        Self { request: 30 }
    }
}

/// 规划策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlannerMode {
    #[default]
    Llm,
    Rules,
}

/// [planner] 段
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PlannerSection {
    pub mode: PlannerMode,
    /// 自定义 planner prompt 模板路径，未设置时查找 config/prompts/planner.txt
    pub prompt_path: Option<PathBuf>,
}

/// 从 config 目录加载配置，环境变量 CONCIERGE__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 CONCIERGE__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("CONCIERGE")
            .separator("__")
            .try_parsing(true),
    );

    builder.build()?.try_deserialize()
}

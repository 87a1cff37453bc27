//! Concierge 命令行入口
//!
//! 加载配置、初始化日志、组装 Agent，然后进入 `You: ` / `Agent: ` 交互循环。
//! 可选的第一个参数为配置文件路径。

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use concierge::{config::load_config, create_main_agent, observability};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let cfg = load_config(config_path).context("Failed to load config")?;

    observability::init(&cfg.app.log_dir, &cfg.app.log_level)?;

    let mut agent = create_main_agent(&cfg).context("Failed to create agent")?;

    println!(
        "{}",
        cfg.app.name.as_deref().unwrap_or("AI Concierge Agent")
    );
    println!("Type 'exit' to quit.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("You: ");
        std::io::stdout().flush().ok();

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        let input = line.trim();
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            break;
        }

        let answer = agent.handle(input).await;
        println!("Agent: {answer}\n");
    }

    println!("Goodbye!");
    Ok(())
}

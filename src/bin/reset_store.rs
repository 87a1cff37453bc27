//! 清空笔记与任务存储：把配置的 store_path 重写为空文档

use std::path::PathBuf;

use anyhow::Context;
use concierge::{config::load_config, memory::JsonFileStore};

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let cfg = load_config(config_path).context("Failed to load config")?;

    let store = JsonFileStore::new(&cfg.app.store_path);
    store.reset().context("Failed to reset store")?;

    println!("Store has been reset.");
    println!("Path: {}", store.path().display());
    Ok(())
}

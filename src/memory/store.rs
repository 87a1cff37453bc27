//! 记录持久化：单文件 JSON 文档 `{ notes: [...], tasks: [...] }`
//!
//! 每次逻辑操作都整体读入、修改、整体写回（无增量追加、无 schema 版本）。
//! 读失败时降级为空文档并记 warn 日志；写失败返回 StoreError。
//! 不做文件锁：两个进程同时写时后写者覆盖先写者。

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 笔记：创建后不可变，仅随整体重置删除
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub text: String,
}

/// 任务：可被标记完成（done + completed_at），不会被删除
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub text: String,
    #[serde(default)]
    pub done: bool,
    /// 旧记录可能没有该字段
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// 存储文档根
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl StoreDocument {
    /// 下一个笔记 id：现有最大 id + 1（空集合时为 1，到 u64::MAX 封顶）
    pub fn next_note_id(&self) -> u64 {
        self.notes
            .iter()
            .map(|n| n.id)
            .max()
            .unwrap_or(0)
            .saturating_add(1)
    }

    pub fn next_task_id(&self) -> u64 {
        self.tasks
            .iter()
            .map(|t| t.id)
            .max()
            .unwrap_or(0)
            .saturating_add(1)
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// 文档存储 trait：load 总是成功（失败降级为空文档），save 整体覆盖
pub trait DocumentStore: Send + Sync {
    fn load(&self) -> StoreDocument;

    fn save(&self, doc: &StoreDocument) -> Result<(), StoreError>;
}

/// JSON 文件存储：缩进格式、UTF-8；文件不存在时创建空文档
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 确保父目录与文件存在；新建时写入空文档
    pub fn ensure(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            return Ok(());
        }
        self.save(&StoreDocument::default())
    }

    /// 重置为空文档（notes 与 tasks 全部清空）
    pub fn reset(&self) -> Result<(), StoreError> {
        self.save(&StoreDocument::default())
    }

    fn read(&self) -> Result<StoreDocument, StoreError> {
        let data = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> StoreDocument {
        if let Err(e) = self.ensure() {
            tracing::warn!(path = %self.path.display(), "Failed to create store: {}", e);
            return StoreDocument::default();
        }
        match self.read() {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Failed to load store, using empty document: {}", e);
                StoreDocument::default()
            }
        }
    }

    fn save(&self, doc: &StoreDocument) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(doc)?)?;
        Ok(())
    }
}

/// 内存存储（测试用）
#[derive(Debug, Default)]
pub struct InMemoryStore {
    doc: RwLock<StoreDocument>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for InMemoryStore {
    fn load(&self) -> StoreDocument {
        match self.doc.read() {
            Ok(doc) => doc.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn save(&self, doc: &StoreDocument) -> Result<(), StoreError> {
        match self.doc.write() {
            Ok(mut guard) => *guard = doc.clone(),
            Err(poisoned) => *poisoned.into_inner() = doc.clone(),
        }
        Ok(())
    }
}

/// 写入总是失败的存储（测试写失败路径用）
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ReadOnlyStore;

#[cfg(test)]
impl DocumentStore for ReadOnlyStore {
    fn load(&self) -> StoreDocument {
        StoreDocument::default()
    }

    fn save(&self, _doc: &StoreDocument) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk full",
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_created_with_empty_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("memory").join("memory_store.json");
        let store = JsonFileStore::new(&path);

        let doc = store.load();
        assert_eq!(doc, StoreDocument::default());
        assert!(path.exists());

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({"notes": [], "tasks": []}));
    }

    #[test]
    fn test_corrupt_file_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert_eq!(store.load(), StoreDocument::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("store.json"));
        let mut doc = StoreDocument::default();
        doc.notes.push(Note {
            id: 1,
            text: "Buy apples".to_string(),
        });
        store.save(&doc).unwrap();

        assert_eq!(store.load().notes, doc.notes);
    }

    #[test]
    fn test_legacy_task_without_timestamps_loads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(
            &path,
            r#"{"notes": [], "tasks": [{"id": 3, "text": "Old task", "done": false}]}"#,
        )
        .unwrap();

        let doc = JsonFileStore::new(&path).load();
        assert_eq!(doc.tasks.len(), 1);
        assert!(doc.tasks[0].created_at.is_none());
        assert_eq!(doc.next_task_id(), 4);
    }

    #[test]
    fn test_reset_clears_everything() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("store.json"));
        let mut doc = StoreDocument::default();
        doc.notes.push(Note {
            id: 7,
            text: "x".to_string(),
        });
        store.save(&doc).unwrap();

        store.reset().unwrap();
        assert_eq!(store.load(), StoreDocument::default());
    }

    #[test]
    fn test_next_ids_start_at_one() {
        let doc = StoreDocument::default();
        assert_eq!(doc.next_note_id(), 1);
        assert_eq!(doc.next_task_id(), 1);
    }

    #[test]
    fn test_next_ids_do_not_overflow() {
        let doc = StoreDocument {
            notes: vec![Note {
                id: u64::MAX,
                text: "edited by hand".to_string(),
            }],
            tasks: vec![Task {
                id: u64::MAX,
                text: "edited by hand".to_string(),
                done: false,
                created_at: None,
                completed_at: None,
            }],
        };
        assert_eq!(doc.next_note_id(), u64::MAX);
        assert_eq!(doc.next_task_id(), u64::MAX);
    }
}

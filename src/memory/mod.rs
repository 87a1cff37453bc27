//! 记忆层：对话窗口（短期）、笔记/任务文档存储（持久化）、本地 TF-IDF 检索

pub mod conversation;
pub mod search;
pub mod store;

pub use conversation::{ConversationWindow, Message, Role};
pub use search::{search, HitKind, SearchHit};
pub use store::{
    DocumentStore, InMemoryStore, JsonFileStore, Note, StoreDocument, StoreError, Task,
};

//! 笔记：命令识别（纯函数）与 NotesEngine（摘要 + 持久化）

pub mod classifier;
pub mod engine;

pub use classifier::{
    is_list_notes_cmd, is_note_all, is_note_confirmation, is_note_current, is_note_previous,
    NoteCommand,
};
pub use engine::{is_meta_text, summarize, NotesEngine};

//! 笔记命令识别
//!
//! 五个互相独立的纯函数判定（不修改任何状态）。它们的匹配集合会重叠，
//! 调用方必须按 [`NoteCommand::detect`] 的固定优先级取第一个命中项。

/// 精确匹配（去空白、忽略大小写）
const LIST_NOTES_PHRASES: &[&str] = &[
    "list notes",
    "show notes",
    "show my notes",
    "notes",
    "list my notes",
    "list note",
];

const NOTE_ALL_MARKERS: &[&str] = &[
    "note all",
    "note everything",
    "note all previous",
    "save all previous",
    "summarise all",
    "save entire conversation",
    "note entire",
    "note entire conversation",
];

const NOTE_PREVIOUS_MARKERS: &[&str] = &[
    "note the above",
    "note above",
    "save the above",
    "save above",
    "remember the above",
    "note previous",
    "save previous",
    "note previous answer",
    "add previous to notes",
];

const NOTE_CURRENT_MARKERS: &[&str] = &[
    "note this",
    "note current",
    "note this response",
    "note q and a",
    "note q+a",
    "save current",
    "save this",
    "add this to notes",
    "save this response",
    "save current response",
    "note this answer",
];

const NOTE_CONFIRMATION_MARKERS: &[&str] = &[
    "did you note",
    "did u note",
    "have you saved",
    "did you save",
    "have you noted",
];

fn contains_any(text: &str, markers: &[&str]) -> bool {
    let t = text.to_lowercase();
    markers.iter().any(|m| t.contains(m))
}

pub fn is_list_notes_cmd(text: &str) -> bool {
    let t = text.trim().to_lowercase();
    LIST_NOTES_PHRASES.contains(&t.as_str())
}

pub fn is_note_all(text: &str) -> bool {
    contains_any(text, NOTE_ALL_MARKERS)
}

pub fn is_note_previous(text: &str) -> bool {
    contains_any(text, NOTE_PREVIOUS_MARKERS)
}

pub fn is_note_current(text: &str) -> bool {
    contains_any(text, NOTE_CURRENT_MARKERS)
}

pub fn is_note_confirmation(text: &str) -> bool {
    contains_any(text, NOTE_CONFIRMATION_MARKERS)
}

/// 识别出的笔记命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteCommand {
    ListNotes,
    NoteAll,
    NotePrevious,
    NoteCurrent,
    Confirmation,
}

impl NoteCommand {
    /// 按固定优先级返回第一个命中的命令；均未命中时返回 None（走正常规划）
    pub fn detect(text: &str) -> Option<NoteCommand> {
        let detectors: [(fn(&str) -> bool, NoteCommand); 5] = [
            (is_list_notes_cmd, NoteCommand::ListNotes),
            (is_note_all, NoteCommand::NoteAll),
            (is_note_previous, NoteCommand::NotePrevious),
            (is_note_current, NoteCommand::NoteCurrent),
            (is_note_confirmation, NoteCommand::Confirmation),
        ];
        detectors
            .into_iter()
            .find(|(matches, _)| matches(text))
            .map(|(_, cmd)| cmd)
    }
}

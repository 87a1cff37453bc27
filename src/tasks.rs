//! TasksStore：任务集合的增、查、完成

use std::sync::Arc;

use chrono::Utc;

use crate::core::AgentError;
use crate::memory::{DocumentStore, Task};

pub struct TasksStore {
    store: Arc<dyn DocumentStore>,
}

impl TasksStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// 新建任务（done = false，记录创建时间）；空文本返回 EmptyInput
    pub fn add_task(&self, text: &str) -> Result<Task, AgentError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AgentError::empty_input("task"));
        }
        let mut doc = self.store.load();
        let task = Task {
            id: doc.next_task_id(),
            text: text.to_string(),
            done: false,
            created_at: Some(Utc::now()),
            completed_at: None,
        };
        doc.tasks.push(task.clone());
        self.store.save(&doc)?;
        Ok(task)
    }

    pub fn list_tasks(&self) -> Vec<Task> {
        self.store.load().tasks
    }

    /// 标记完成；id 不存在时返回 Ok(None)
    pub fn complete_task(&self, id: u64) -> Result<Option<Task>, AgentError> {
        let mut doc = self.store.load();
        let Some(task) = doc.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        task.done = true;
        task.completed_at = Some(Utc::now());
        let updated = task.clone();
        self.store.save(&doc)?;
        Ok(Some(updated))
    }
}

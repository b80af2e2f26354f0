use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    Academic,
    Athletic,
    Eligibility,
    Recruiting,
    #[default]
    Other,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub user_id: String,
    pub title: String, // ! & (len = 255)
    pub category: TaskCategory,
    pub critical: bool,
    pub due_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_complete() && self.due_at.is_some_and(|due| due < now)
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct NewTask {
    pub user_id: String,
    pub title: String,
    pub category: TaskCategory,
    pub critical: bool,
    pub due_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

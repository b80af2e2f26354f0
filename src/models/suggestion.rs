use chrono::{DateTime, Utc};
use serde::Serialize;

/// A proposed recruiting action. Rows are written by the recommendation
/// pipeline; this service only stamps `surfaced_at`.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub body: Option<String>,
    pub surfaced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Suggestion {
    pub fn is_pending(&self) -> bool {
        self.surfaced_at.is_none()
    }
}

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub body: Option<String>,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_unread(&self) -> bool {
        self.read_at.is_none()
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BadgeColor {
    None,
    Info,
    Warning,
    Critical,
}

impl BadgeColor {
    pub fn for_count(unread: usize) -> Self {
        match unread {
            0 => BadgeColor::None,
            1..=3 => BadgeColor::Info,
            4..=9 => BadgeColor::Warning,
            _ => BadgeColor::Critical,
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SchoolFit {
    Reach,
    Target,
    Safety,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SchoolStatus {
    #[default]
    Researching,
    Contacted,
    Interested,
    Committed,
    Dropped,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub id: String,
    pub user_id: String,
    pub name: String,             // ! & (len = 255)
    pub division: Option<String>, // ! e.g `D1`, `NAIA`
    pub fit: SchoolFit,
    pub status: SchoolStatus,
    pub created_at: DateTime<Utc>,
}

impl School {
    /// Dropped schools no longer count toward the athlete's list.
    pub fn is_tracked(&self) -> bool {
        self.status != SchoolStatus::Dropped
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct NewSchool {
    pub user_id: String,
    pub name: String,
    pub division: Option<String>,
    pub fit: SchoolFit,
    pub status: SchoolStatus,
    pub created_at: DateTime<Utc>,
}

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Coach {
    pub id: String,
    pub user_id: String,
    pub school_id: String,
    pub name: String,
    pub email: Option<String>,
    pub position: Option<String>, // ! e.g `head coach`, `recruiting coordinator`
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Debug, Clone)]
pub struct NewCoach {
    pub user_id: String,
    pub school_id: String,
    pub name: String,
    pub email: Option<String>,
    pub position: Option<String>,
    pub created_at: DateTime<Utc>,
}

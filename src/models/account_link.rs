use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountLinkStatus {
    #[default]
    Pending,
}

/// A parent <-> athlete link request.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountLink {
    pub id: String,
    pub requester_id: String,
    pub invitee_email: String,
    pub invitee_id: Option<String>,
    pub status: AccountLinkStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Debug, Clone)]
pub struct NewAccountLink {
    pub requester_id: String,
    pub invitee_email: String,
    pub invitee_id: Option<String>,
    pub status: AccountLinkStatus,
    pub created_at: DateTime<Utc>,
}

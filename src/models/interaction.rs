use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Email,
    Call,
    Text,
    Visit,
    Camp,
    Message,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InteractionDirection {
    /// Athlete reached out to the program.
    Outbound,
    /// The program reached out to the athlete.
    Inbound,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub id: String,
    pub user_id: String,
    pub school_id: String,
    pub coach_id: Option<String>,
    pub kind: InteractionKind,
    pub direction: InteractionDirection,
    pub occurred_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Debug, Clone)]
pub struct NewInteraction {
    pub user_id: String,
    pub school_id: String,
    pub coach_id: Option<String>,
    pub kind: InteractionKind,
    pub direction: InteractionDirection,
    pub occurred_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Declaration order is evaluation priority.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryTrigger {
    CriticalTaskMissed,
    NoCoachInterest,
    EligibilityIncomplete,
    FitGap,
}

impl RecoveryTrigger {
    pub const ALL: [RecoveryTrigger; 4] = [
        RecoveryTrigger::CriticalTaskMissed,
        RecoveryTrigger::NoCoachInterest,
        RecoveryTrigger::EligibilityIncomplete,
        RecoveryTrigger::FitGap,
    ];
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryStep {
    pub order: usize,
    pub title: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryPlan {
    pub trigger: RecoveryTrigger,
    pub title: String,
    pub steps: Vec<RecoveryStep>,
    pub duration_days: i64,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryStatus {
    pub in_recovery: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<RecoveryPlan>,
}

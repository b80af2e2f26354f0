//! Recovery plan builder: a fixed, ordered rule table over a read-only
//! snapshot of the athlete's recruiting state.

use chrono::{DateTime, Utc};

use crate::{
    consts::rules_const::{
        COACH_SILENCE_DAYS, ELIGIBILITY_HORIZON_DAYS, MIN_TRACKED_SCHOOLS, RECOVERY_DURATION_DAYS,
    },
    models::{
        interaction::{Interaction, InteractionDirection},
        offer::Offer,
        recovery::{RecoveryPlan, RecoveryStatus, RecoveryStep, RecoveryTrigger},
        school::{School, SchoolFit},
        task::{Task, TaskCategory},
    },
    utils::time::{days_after, days_between},
};

#[derive(Debug, Clone, PartialEq)]
pub struct RecoverySnapshot {
    pub taken_at: DateTime<Utc>,
    pub missed_critical_tasks: Vec<String>,
    /// `None` when no coach has ever reached out.
    pub days_since_coach_contact: Option<i64>,
    pub active_offers: usize,
    pub eligibility_due: Vec<String>,
    pub tracked_schools: usize,
    pub has_target_or_safety: bool,
}

impl RecoverySnapshot {
    pub fn from_records(
        tasks: &[Task],
        interactions: &[Interaction],
        offers: &[Offer],
        schools: &[School],
        now: DateTime<Utc>,
    ) -> Self {
        let missed_critical_tasks = tasks
            .iter()
            .filter(|t| t.critical && t.is_overdue(now))
            .map(|t| t.title.clone())
            .collect();

        let eligibility_horizon = days_after(now, ELIGIBILITY_HORIZON_DAYS);
        let eligibility_due = tasks
            .iter()
            .filter(|t| t.category == TaskCategory::Eligibility && !t.is_complete())
            .filter(|t| t.due_at.is_some_and(|due| due <= eligibility_horizon))
            .map(|t| t.title.clone())
            .collect();

        let days_since_coach_contact = interactions
            .iter()
            .filter(|i| i.direction == InteractionDirection::Inbound)
            .map(|i| i.occurred_at)
            .max()
            .map(|last| days_between(last, now));

        let tracked: Vec<&School> = schools.iter().filter(|s| s.is_tracked()).collect();

        Self {
            taken_at: now,
            missed_critical_tasks,
            days_since_coach_contact,
            active_offers: offers.iter().filter(|o| o.status.is_active()).count(),
            eligibility_due,
            tracked_schools: tracked.len(),
            has_target_or_safety: tracked
                .iter()
                .any(|s| matches!(s.fit, SchoolFit::Target | SchoolFit::Safety)),
        }
    }

    pub fn matches(&self, trigger: RecoveryTrigger) -> bool {
        match trigger {
            RecoveryTrigger::CriticalTaskMissed => !self.missed_critical_tasks.is_empty(),
            RecoveryTrigger::NoCoachInterest => {
                self.active_offers == 0
                    && self
                        .days_since_coach_contact
                        .is_none_or(|days| days > COACH_SILENCE_DAYS)
            }
            RecoveryTrigger::EligibilityIncomplete => !self.eligibility_due.is_empty(),
            RecoveryTrigger::FitGap => {
                self.tracked_schools < MIN_TRACKED_SCHOOLS || !self.has_target_or_safety
            }
        }
    }
}

/// First matching trigger in declaration order.
pub fn evaluate(snapshot: &RecoverySnapshot) -> Option<RecoveryTrigger> {
    RecoveryTrigger::ALL
        .into_iter()
        .find(|trigger| snapshot.matches(*trigger))
}

pub fn build_plan(snapshot: &RecoverySnapshot) -> RecoveryStatus {
    let Some(trigger) = evaluate(snapshot) else {
        return RecoveryStatus {
            in_recovery: false,
            plan: None,
        };
    };

    let (title, steps) = template(trigger, snapshot);
    RecoveryStatus {
        in_recovery: true,
        plan: Some(RecoveryPlan {
            trigger,
            title: title.to_string(),
            steps: steps
                .into_iter()
                .enumerate()
                .map(|(i, title)| RecoveryStep { order: i + 1, title })
                .collect(),
            duration_days: RECOVERY_DURATION_DAYS,
            starts_at: snapshot.taken_at,
            ends_at: days_after(snapshot.taken_at, RECOVERY_DURATION_DAYS),
        }),
    }
}

fn template(trigger: RecoveryTrigger, snapshot: &RecoverySnapshot) -> (&'static str, Vec<String>) {
    match trigger {
        RecoveryTrigger::CriticalTaskMissed => {
            let mut steps: Vec<String> = snapshot
                .missed_critical_tasks
                .iter()
                .map(|title| format!("Finish overdue task: {title}"))
                .collect();
            steps.push("Set a new due date for anything that slipped this week".to_string());
            steps.push("Tell your coach or counselor what changed and the new timeline".to_string());
            ("Get back on track with critical tasks", steps)
        }
        RecoveryTrigger::NoCoachInterest => (
            "Restart coach conversations",
            vec![
                "Refresh your highlight video and athletic profile".to_string(),
                "Email five coaches at target schools with your latest stats".to_string(),
                "Register for one camp or showcase this month".to_string(),
                "Follow up with every coach who has not replied after 7 days".to_string(),
            ],
        ),
        RecoveryTrigger::EligibilityIncomplete => {
            let mut steps: Vec<String> = snapshot
                .eligibility_due
                .iter()
                .map(|title| format!("Complete eligibility step: {title}"))
                .collect();
            steps.push("Send official transcripts and test scores to the eligibility center".to_string());
            steps.push("Confirm your amateurism questionnaire is submitted".to_string());
            ("Close out eligibility requirements", steps)
        }
        RecoveryTrigger::FitGap => (
            "Balance your school list",
            vec![
                format!(
                    "Track at least {MIN_TRACKED_SCHOOLS} schools (currently {})",
                    snapshot.tracked_schools
                ),
                "Add target and safety schools where you match the roster level".to_string(),
                "Compare each program's academics, cost and playing time".to_string(),
            ],
        ),
    }
}

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::consts::table_const::{
    ACCOUNT_LINK_TABLE, COACH_TABLE, INTERACTION_TABLE, NOTIFICATION_TABLE, OFFER_TABLE,
    SCHOOL_TABLE, SUGGESTION_TABLE, TASK_TABLE, USER_TABLE,
};
use crate::errors::{Error, Result};
use crate::models::{
    account_link::{AccountLink, NewAccountLink},
    coach::{Coach, NewCoach},
    interaction::{Interaction, NewInteraction},
    notification::Notification,
    offer::{NewOffer, Offer},
    school::{NewSchool, School},
    suggestion::Suggestion,
    task::{NewTask, Task},
    user::User,
};
use crate::store::{AdminStats, RecruitingStore};
use crate::utils::get_record_id::same_record_id;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    suggestions: Vec<Suggestion>,
    schools: Vec<School>,
    coaches: Vec<Coach>,
    interactions: Vec<Interaction>,
    offers: Vec<Offer>,
    tasks: Vec<Task>,
    notifications: Vec<Notification>,
    account_links: Vec<AccountLink>,
}

/// In-process store for tests and local runs without a provider.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_writes: AtomicBool,
    failing_pings: AtomicUsize,
}

pub fn new_record_id(table: &str) -> String {
    format!("{table}:{}", Uuid::new_v4().simple())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every write fail with a store error until switched back.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// The next `count` pings report the store as unreachable.
    pub fn fail_next_pings(&self, count: usize) {
        self.failing_pings.store(count, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Store("memory store is rejecting writes".to_string()));
        }
        Ok(())
    }

    pub async fn insert_user(&self, user: User) {
        self.tables.lock().await.users.push(user);
    }

    pub async fn insert_suggestion(&self, suggestion: Suggestion) {
        self.tables.lock().await.suggestions.push(suggestion);
    }

    pub async fn insert_notification(&self, notification: Notification) {
        self.tables.lock().await.notifications.push(notification);
    }

    pub async fn suggestions(&self) -> Vec<Suggestion> {
        self.tables.lock().await.suggestions.clone()
    }
}

fn owned<T: Clone>(rows: &[T], belongs: impl Fn(&T) -> bool) -> Vec<T> {
    rows.iter().filter(|row| belongs(row)).cloned().collect()
}

#[async_trait]
impl RecruitingStore for MemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<()> {
        let failing = self
            .failing_pings
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        match failing {
            Ok(_) => Err(Error::Store("memory store is unreachable".to_string())),
            Err(_) => Ok(()),
        }
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.tables.lock().await.users.clone())
    }

    async fn set_admin(&self, user_id: &str, is_admin: bool) -> Result<Option<User>> {
        self.check_writable()?;
        let mut tables = self.tables.lock().await;
        Ok(tables
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .map(|user| {
                user.is_admin = is_admin;
                user.clone()
            }))
    }

    async fn admin_stats(&self) -> Result<AdminStats> {
        let tables = self.tables.lock().await;
        Ok(AdminStats {
            users: tables.users.len(),
            admins: tables.users.iter().filter(|u| u.is_admin).count(),
            pending_suggestions: tables.suggestions.iter().filter(|s| s.is_pending()).count(),
        })
    }

    async fn pending_suggestions(&self, user_id: &str) -> Result<Vec<Suggestion>> {
        let tables = self.tables.lock().await;
        Ok(owned(&tables.suggestions, |s| {
            s.user_id == user_id && s.is_pending()
        }))
    }

    async fn mark_surfaced(&self, ids: &[String], at: DateTime<Utc>) -> Result<usize> {
        self.check_writable()?;
        let mut tables = self.tables.lock().await;
        let mut updated = 0;
        for suggestion in tables
            .suggestions
            .iter_mut()
            .filter(|s| s.is_pending() && ids.contains(&s.id))
        {
            suggestion.surfaced_at = Some(at);
            updated += 1;
        }
        Ok(updated)
    }

    async fn surfaced_suggestions(&self, user_id: &str) -> Result<Vec<Suggestion>> {
        let tables = self.tables.lock().await;
        let mut rows = owned(&tables.suggestions, |s| {
            s.user_id == user_id && !s.is_pending()
        });
        rows.sort_by(|a, b| b.surfaced_at.cmp(&a.surfaced_at));
        Ok(rows)
    }

    async fn users_with_pending_suggestions(&self) -> Result<Vec<String>> {
        let tables = self.tables.lock().await;
        let mut users: Vec<String> = tables
            .suggestions
            .iter()
            .filter(|s| s.is_pending())
            .map(|s| s.user_id.clone())
            .collect();
        users.sort();
        users.dedup();
        Ok(users)
    }

    async fn create_school(&self, school: NewSchool) -> Result<School> {
        self.check_writable()?;
        let row = School {
            id: new_record_id(SCHOOL_TABLE),
            user_id: school.user_id,
            name: school.name,
            division: school.division,
            fit: school.fit,
            status: school.status,
            created_at: school.created_at,
        };
        self.tables.lock().await.schools.push(row.clone());
        Ok(row)
    }

    async fn get_school(&self, user_id: &str, school_id: &str) -> Result<Option<School>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .schools
            .iter()
            .find(|s| s.id == school_id && s.user_id == user_id)
            .cloned())
    }

    async fn list_schools(&self, user_id: &str) -> Result<Vec<School>> {
        let tables = self.tables.lock().await;
        Ok(owned(&tables.schools, |s| s.user_id == user_id))
    }

    async fn create_coach(&self, coach: NewCoach) -> Result<Coach> {
        self.check_writable()?;
        let row = Coach {
            id: new_record_id(COACH_TABLE),
            user_id: coach.user_id,
            school_id: coach.school_id,
            name: coach.name,
            email: coach.email,
            position: coach.position,
            created_at: coach.created_at,
        };
        self.tables.lock().await.coaches.push(row.clone());
        Ok(row)
    }

    async fn list_coaches(&self, user_id: &str) -> Result<Vec<Coach>> {
        let tables = self.tables.lock().await;
        Ok(owned(&tables.coaches, |c| c.user_id == user_id))
    }

    async fn create_interaction(&self, interaction: NewInteraction) -> Result<Interaction> {
        self.check_writable()?;
        let row = Interaction {
            id: new_record_id(INTERACTION_TABLE),
            user_id: interaction.user_id,
            school_id: interaction.school_id,
            coach_id: interaction.coach_id,
            kind: interaction.kind,
            direction: interaction.direction,
            occurred_at: interaction.occurred_at,
            notes: interaction.notes,
            created_at: interaction.created_at,
        };
        self.tables.lock().await.interactions.push(row.clone());
        Ok(row)
    }

    async fn list_interactions(&self, user_id: &str) -> Result<Vec<Interaction>> {
        let tables = self.tables.lock().await;
        Ok(owned(&tables.interactions, |i| i.user_id == user_id))
    }

    async fn create_offer(&self, offer: NewOffer) -> Result<Offer> {
        self.check_writable()?;
        let row = Offer {
            id: new_record_id(OFFER_TABLE),
            user_id: offer.user_id,
            school_id: offer.school_id,
            status: offer.status,
            scholarship_percent: offer.scholarship_percent,
            created_at: offer.created_at,
        };
        self.tables.lock().await.offers.push(row.clone());
        Ok(row)
    }

    async fn list_offers(&self, user_id: &str) -> Result<Vec<Offer>> {
        let tables = self.tables.lock().await;
        Ok(owned(&tables.offers, |o| o.user_id == user_id))
    }

    async fn create_task(&self, task: NewTask) -> Result<Task> {
        self.check_writable()?;
        let row = Task {
            id: new_record_id(TASK_TABLE),
            user_id: task.user_id,
            title: task.title,
            category: task.category,
            critical: task.critical,
            due_at: task.due_at,
            completed_at: None,
            created_at: task.created_at,
        };
        self.tables.lock().await.tasks.push(row.clone());
        Ok(row)
    }

    async fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>> {
        let tables = self.tables.lock().await;
        Ok(owned(&tables.tasks, |t| t.user_id == user_id))
    }

    async fn complete_task(
        &self,
        user_id: &str,
        task_id: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Task>> {
        self.check_writable()?;
        let mut tables = self.tables.lock().await;
        Ok(tables
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id && t.user_id == user_id)
            .map(|task| {
                // completing twice keeps the first timestamp
                if task.completed_at.is_none() {
                    task.completed_at = Some(at);
                }
                task.clone()
            }))
    }

    async fn unread_notifications(&self, user_id: &str) -> Result<Vec<Notification>> {
        let tables = self.tables.lock().await;
        Ok(owned(&tables.notifications, |n| {
            n.user_id == user_id && n.is_unread()
        }))
    }

    async fn mark_notification_read(
        &self,
        user_id: &str,
        notification_id: &str,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        self.check_writable()?;
        let mut tables = self.tables.lock().await;
        match tables
            .notifications
            .iter_mut()
            .find(|n| {
                same_record_id(&n.id, notification_id) && n.user_id == user_id && n.is_unread()
            })
        {
            Some(notification) => {
                notification.read_at = Some(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn create_account_link(&self, link: NewAccountLink) -> Result<AccountLink> {
        self.check_writable()?;
        let row = AccountLink {
            id: new_record_id(ACCOUNT_LINK_TABLE),
            requester_id: link.requester_id,
            invitee_email: link.invitee_email,
            invitee_id: link.invitee_id,
            status: link.status,
            created_at: link.created_at,
        };
        self.tables.lock().await.account_links.push(row.clone());
        Ok(row)
    }

    async fn list_account_links(&self, requester_id: &str) -> Result<Vec<AccountLink>> {
        let tables = self.tables.lock().await;
        Ok(owned(&tables.account_links, |l| l.requester_id == requester_id))
    }
}

/// Row builders shared by unit and integration tests.
pub mod fixtures {
    use chrono::{DateTime, Utc};

    use super::*;
    use crate::models::user::UserRole;

    pub fn user(email: &str, is_admin: bool, created_at: DateTime<Utc>) -> User {
        User {
            id: new_record_id(USER_TABLE),
            email: email.to_string(),
            full_name: None,
            role: UserRole::Athlete,
            is_admin,
            created_at,
        }
    }

    pub fn suggestion(user_id: &str, title: &str, created_at: DateTime<Utc>) -> Suggestion {
        Suggestion {
            id: new_record_id(SUGGESTION_TABLE),
            user_id: user_id.to_string(),
            title: title.to_string(),
            body: None,
            surfaced_at: None,
            created_at,
        }
    }

    pub fn notification(user_id: &str, title: &str, created_at: DateTime<Utc>) -> Notification {
        Notification {
            id: new_record_id(NOTIFICATION_TABLE),
            user_id: user_id.to_string(),
            title: title.to_string(),
            body: None,
            read_at: None,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::fixtures::{suggestion, user};
    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn mark_surfaced_skips_rows_already_surfaced() {
        let store = MemoryStore::new();
        let first = suggestion("users:a", "Email coach", t0());
        let ids = vec![first.id.clone()];
        store.insert_suggestion(first).await;

        assert_eq!(store.mark_surfaced(&ids, t0()).await.unwrap(), 1);
        assert_eq!(
            store
                .mark_surfaced(&ids, t0() + Duration::minutes(1))
                .await
                .unwrap(),
            0
        );
        let rows = store.suggestions().await;
        assert_eq!(rows[0].surfaced_at, Some(t0()));
    }

    #[tokio::test]
    async fn email_lookup_ignores_case() {
        let store = MemoryStore::new();
        store.insert_user(user("Parent@Example.com", false, t0())).await;
        let found = store.find_user_by_email("parent@example.com").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn failing_writes_surface_as_store_errors() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        let err = store.mark_surfaced(&[], t0()).await.unwrap_err();
        assert!(matches!(err, Error::Store(_)));
    }
}

//! Provider client seam. Every durable read and write in the service goes
//! through [`RecruitingStore`]; handlers never talk to a backend directly.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::Result;
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

pub mod memory;
pub mod surreal;

pub use memory::MemoryStore;
pub use surreal::SurrealStore;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub users: usize,
    pub admins: usize,
    pub pending_suggestions: usize,
}

#[async_trait]
pub trait RecruitingStore: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    /// Cheap round trip used by the readiness probe at boot.
    async fn ping(&self) -> Result<()>;

    // ! users
    async fn get_user(&self, user_id: &str) -> Result<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn list_users(&self) -> Result<Vec<User>>;
    async fn set_admin(&self, user_id: &str, is_admin: bool) -> Result<Option<User>>;
    async fn admin_stats(&self) -> Result<AdminStats>;

    // ! suggestions
    async fn pending_suggestions(&self, user_id: &str) -> Result<Vec<Suggestion>>;
    /// Stamps `surfaced_at` on those of `ids` that are still pending and
    /// returns how many rows changed.
    async fn mark_surfaced(&self, ids: &[String], at: DateTime<Utc>) -> Result<usize>;
    async fn surfaced_suggestions(&self, user_id: &str) -> Result<Vec<Suggestion>>;
    async fn users_with_pending_suggestions(&self) -> Result<Vec<String>>;

    // ! recruiting records
    async fn create_school(&self, school: NewSchool) -> Result<School>;
    async fn get_school(&self, user_id: &str, school_id: &str) -> Result<Option<School>>;
    async fn list_schools(&self, user_id: &str) -> Result<Vec<School>>;

    async fn create_coach(&self, coach: NewCoach) -> Result<Coach>;
    async fn list_coaches(&self, user_id: &str) -> Result<Vec<Coach>>;

    async fn create_interaction(&self, interaction: NewInteraction) -> Result<Interaction>;
    async fn list_interactions(&self, user_id: &str) -> Result<Vec<Interaction>>;

    async fn create_offer(&self, offer: NewOffer) -> Result<Offer>;
    async fn list_offers(&self, user_id: &str) -> Result<Vec<Offer>>;

    async fn create_task(&self, task: NewTask) -> Result<Task>;
    async fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>>;
    async fn complete_task(
        &self,
        user_id: &str,
        task_id: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Task>>;

    // ! notifications
    async fn unread_notifications(&self, user_id: &str) -> Result<Vec<Notification>>;
    /// Returns false when the notification does not exist, is not owned by
    /// `user_id`, or was already read.
    async fn mark_notification_read(
        &self,
        user_id: &str,
        notification_id: &str,
        at: DateTime<Utc>,
    ) -> Result<bool>;

    // ! account links
    async fn create_account_link(&self, link: NewAccountLink) -> Result<AccountLink>;
    async fn list_account_links(&self, requester_id: &str) -> Result<Vec<AccountLink>>;
}

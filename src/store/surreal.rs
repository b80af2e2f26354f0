use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use surrealdb::{
    RecordId, Surreal,
    engine::any::{Any, connect},
    opt::auth::Root,
};
use tracing::info;

use crate::config::Config;
use crate::consts::table_const::{
    ACCOUNT_LINK_TABLE, COACH_TABLE, INTERACTION_TABLE, NOTIFICATION_TABLE, OFFER_TABLE,
    SCHOOL_TABLE, SUGGESTION_TABLE, TASK_TABLE, USER_TABLE,
};
use crate::errors::{Error, Result};
use crate::models::{
    account_link::{AccountLink, AccountLinkStatus, NewAccountLink},
    coach::{Coach, NewCoach},
    interaction::{Interaction, InteractionDirection, InteractionKind, NewInteraction},
    notification::Notification,
    offer::{NewOffer, Offer, OfferStatus},
    school::{NewSchool, School, SchoolFit, SchoolStatus},
    suggestion::Suggestion,
    task::{NewTask, Task, TaskCategory},
    user::{User, UserRole},
};
use crate::store::{AdminStats, RecruitingStore};
use crate::utils::get_record_id::get_record_id_in_table;

#[derive(Debug, Clone)]
pub struct SurrealStore {
    pub sdb: Surreal<Any>,
}

impl SurrealStore {
    pub async fn connect(config: &Config) -> Result<Self> {
        info!("Connecting to provider at {}", config.provider_url);
        let sdb = connect(config.provider_url.as_str()).await?;
        sdb.signin(Root {
            username: &config.provider_user,
            password: &config.service_role_key,
        })
        .await?;
        sdb.use_ns(config.provider_namespace.as_str())
            .use_db(config.provider_database.as_str())
            .await?;

        Ok(Self { sdb })
    }

    async fn select_where<T>(
        &self,
        sql: &'static str,
        table: &'static str,
        user_id: &str,
    ) -> Result<Vec<T>>
    where
        T: for<'de> Deserialize<'de> + Send,
    {
        let rows: Vec<T> = self
            .sdb
            .query(sql)
            .bind(("table", table))
            .bind(("user_id", user_id.to_string()))
            .await?
            .take(0)?;
        Ok(rows)
    }
}

const OWNED_ROWS: &str = "SELECT * FROM type::table($table) WHERE user_id = $user_id;";

// ! unset timestamps may be stored as NONE (field absent) or NULL (written by
// ! a JSON client); both mean "not yet", so every filter checks for both

// ! rows as stored by the provider; ids come back as record ids

#[derive(Deserialize)]
struct UserRow {
    id: RecordId,
    email: String,
    full_name: Option<String>,
    #[serde(default)]
    role: UserRole,
    #[serde(default)]
    is_admin: bool,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id.to_string(),
            email: row.email,
            full_name: row.full_name,
            role: row.role,
            is_admin: row.is_admin,
            created_at: row.created_at,
        }
    }
}

#[derive(Deserialize)]
struct SuggestionRow {
    id: RecordId,
    user_id: String,
    title: String,
    body: Option<String>,
    surfaced_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<SuggestionRow> for Suggestion {
    fn from(row: SuggestionRow) -> Self {
        Self {
            id: row.id.to_string(),
            user_id: row.user_id,
            title: row.title,
            body: row.body,
            surfaced_at: row.surfaced_at,
            created_at: row.created_at,
        }
    }
}

#[derive(Deserialize)]
struct SchoolRow {
    id: RecordId,
    user_id: String,
    name: String,
    division: Option<String>,
    fit: SchoolFit,
    status: SchoolStatus,
    created_at: DateTime<Utc>,
}

impl From<SchoolRow> for School {
    fn from(row: SchoolRow) -> Self {
        Self {
            id: row.id.to_string(),
            user_id: row.user_id,
            name: row.name,
            division: row.division,
            fit: row.fit,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

#[derive(Deserialize)]
struct CoachRow {
    id: RecordId,
    user_id: String,
    school_id: String,
    name: String,
    email: Option<String>,
    position: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<CoachRow> for Coach {
    fn from(row: CoachRow) -> Self {
        Self {
            id: row.id.to_string(),
            user_id: row.user_id,
            school_id: row.school_id,
            name: row.name,
            email: row.email,
            position: row.position,
            created_at: row.created_at,
        }
    }
}

#[derive(Deserialize)]
struct InteractionRow {
    id: RecordId,
    user_id: String,
    school_id: String,
    coach_id: Option<String>,
    kind: InteractionKind,
    direction: InteractionDirection,
    occurred_at: DateTime<Utc>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<InteractionRow> for Interaction {
    fn from(row: InteractionRow) -> Self {
        Self {
            id: row.id.to_string(),
            user_id: row.user_id,
            school_id: row.school_id,
            coach_id: row.coach_id,
            kind: row.kind,
            direction: row.direction,
            occurred_at: row.occurred_at,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

#[derive(Deserialize)]
struct OfferRow {
    id: RecordId,
    user_id: String,
    school_id: String,
    status: OfferStatus,
    scholarship_percent: Option<u8>,
    created_at: DateTime<Utc>,
}

impl From<OfferRow> for Offer {
    fn from(row: OfferRow) -> Self {
        Self {
            id: row.id.to_string(),
            user_id: row.user_id,
            school_id: row.school_id,
            status: row.status,
            scholarship_percent: row.scholarship_percent,
            created_at: row.created_at,
        }
    }
}

#[derive(Deserialize)]
struct TaskRow {
    id: RecordId,
    user_id: String,
    title: String,
    category: TaskCategory,
    #[serde(default)]
    critical: bool,
    due_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Self {
            id: row.id.to_string(),
            user_id: row.user_id,
            title: row.title,
            category: row.category,
            critical: row.critical,
            due_at: row.due_at,
            completed_at: row.completed_at,
            created_at: row.created_at,
        }
    }
}

#[derive(Deserialize)]
struct NotificationRow {
    id: RecordId,
    user_id: String,
    title: String,
    body: Option<String>,
    read_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Self {
            id: row.id.to_string(),
            user_id: row.user_id,
            title: row.title,
            body: row.body,
            read_at: row.read_at,
            created_at: row.created_at,
        }
    }
}

#[derive(Deserialize)]
struct AccountLinkRow {
    id: RecordId,
    requester_id: String,
    invitee_email: String,
    invitee_id: Option<String>,
    status: AccountLinkStatus,
    created_at: DateTime<Utc>,
}

impl From<AccountLinkRow> for AccountLink {
    fn from(row: AccountLinkRow) -> Self {
        Self {
            id: row.id.to_string(),
            requester_id: row.requester_id,
            invitee_email: row.invitee_email,
            invitee_id: row.invitee_id,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

fn into_models<R, M: From<R>>(rows: Vec<R>) -> Vec<M> {
    rows.into_iter().map(M::from).collect()
}

#[async_trait]
impl RecruitingStore for SurrealStore {
    fn backend_tag(&self) -> &'static str {
        "surrealdb"
    }

    async fn ping(&self) -> Result<()> {
        self.sdb.health().await?;
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let id = get_record_id_in_table(user_id, USER_TABLE)?;
        let row: Option<UserRow> = self.sdb.select(id).await?;
        Ok(row.map(User::from))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let rows: Vec<UserRow> = self
            .sdb
            .query("SELECT * FROM type::table($table) WHERE string::lowercase(email) = $email LIMIT 1;")
            .bind(("table", USER_TABLE))
            .bind(("email", email.to_lowercase()))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next().map(User::from))
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let rows: Vec<UserRow> = self.sdb.select(USER_TABLE).await?;
        Ok(into_models(rows))
    }

    async fn set_admin(&self, user_id: &str, is_admin: bool) -> Result<Option<User>> {
        let id = get_record_id_in_table(user_id, USER_TABLE)?;
        let rows: Vec<UserRow> = self
            .sdb
            .query("UPDATE $id SET is_admin = $is_admin RETURN AFTER;")
            .bind(("id", id))
            .bind(("is_admin", is_admin))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next().map(User::from))
    }

    async fn admin_stats(&self) -> Result<AdminStats> {
        #[derive(Deserialize)]
        struct Count {
            count: usize,
        }
        let mut response = self
            .sdb
            .query("SELECT count() FROM type::table($users) GROUP ALL;")
            .query("SELECT count() FROM type::table($users) WHERE is_admin = true GROUP ALL;")
            .query("SELECT count() FROM type::table($suggestions) WHERE surfaced_at IS NONE OR surfaced_at IS NULL GROUP ALL;")
            .bind(("users", USER_TABLE))
            .bind(("suggestions", SUGGESTION_TABLE))
            .await?;
        let mut count = |index: usize| -> Result<usize> {
            let rows: Vec<Count> = response.take(index)?;
            Ok(rows.first().map(|c| c.count).unwrap_or(0))
        };
        Ok(AdminStats {
            users: count(0)?,
            admins: count(1)?,
            pending_suggestions: count(2)?,
        })
    }

    async fn pending_suggestions(&self, user_id: &str) -> Result<Vec<Suggestion>> {
        let rows: Vec<SuggestionRow> = self
            .select_where(
                "SELECT * FROM type::table($table) WHERE user_id = $user_id AND (surfaced_at IS NONE OR surfaced_at IS NULL);",
                SUGGESTION_TABLE,
                user_id,
            )
            .await?;
        Ok(into_models(rows))
    }

    async fn mark_surfaced(&self, ids: &[String], at: DateTime<Utc>) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let ids = ids
            .iter()
            .map(|id| get_record_id_in_table(id, SUGGESTION_TABLE))
            .collect::<Result<Vec<RecordId>>>()?;
        let rows: Vec<SuggestionRow> = self
            .sdb
            .query("UPDATE $ids SET surfaced_at = $at WHERE surfaced_at IS NONE OR surfaced_at IS NULL RETURN AFTER;")
            .bind(("ids", ids))
            .bind(("at", at))
            .await?
            .take(0)?;
        Ok(rows.len())
    }

    async fn surfaced_suggestions(&self, user_id: &str) -> Result<Vec<Suggestion>> {
        let rows: Vec<SuggestionRow> = self
            .select_where(
                "SELECT * FROM type::table($table) WHERE user_id = $user_id AND surfaced_at IS NOT NONE AND surfaced_at IS NOT NULL;",
                SUGGESTION_TABLE,
                user_id,
            )
            .await?;
        let mut suggestions: Vec<Suggestion> = into_models(rows);
        suggestions.sort_by(|a, b| b.surfaced_at.cmp(&a.surfaced_at));
        Ok(suggestions)
    }

    async fn users_with_pending_suggestions(&self) -> Result<Vec<String>> {
        #[derive(Deserialize)]
        struct Owner {
            user_id: String,
        }
        let rows: Vec<Owner> = self
            .sdb
            .query("SELECT user_id FROM type::table($table) WHERE surfaced_at IS NONE OR surfaced_at IS NULL GROUP BY user_id;")
            .bind(("table", SUGGESTION_TABLE))
            .await?
            .take(0)?;
        Ok(rows.into_iter().map(|o| o.user_id).collect())
    }

    async fn create_school(&self, school: NewSchool) -> Result<School> {
        let row: Option<SchoolRow> = self.sdb.create(SCHOOL_TABLE).content(school).await?;
        row.map(School::from).ok_or(Error::InternalServerError)
    }

    async fn get_school(&self, user_id: &str, school_id: &str) -> Result<Option<School>> {
        let id = get_record_id_in_table(school_id, SCHOOL_TABLE)?;
        let row: Option<SchoolRow> = self.sdb.select(id).await?;
        Ok(row
            .map(School::from)
            .filter(|school| school.user_id == user_id))
    }

    async fn list_schools(&self, user_id: &str) -> Result<Vec<School>> {
        let rows: Vec<SchoolRow> = self.select_where(OWNED_ROWS, SCHOOL_TABLE, user_id).await?;
        Ok(into_models(rows))
    }

    async fn create_coach(&self, coach: NewCoach) -> Result<Coach> {
        let row: Option<CoachRow> = self.sdb.create(COACH_TABLE).content(coach).await?;
        row.map(Coach::from).ok_or(Error::InternalServerError)
    }

    async fn list_coaches(&self, user_id: &str) -> Result<Vec<Coach>> {
        let rows: Vec<CoachRow> = self.select_where(OWNED_ROWS, COACH_TABLE, user_id).await?;
        Ok(into_models(rows))
    }

    async fn create_interaction(&self, interaction: NewInteraction) -> Result<Interaction> {
        let row: Option<InteractionRow> = self
            .sdb
            .create(INTERACTION_TABLE)
            .content(interaction)
            .await?;
        row.map(Interaction::from).ok_or(Error::InternalServerError)
    }

    async fn list_interactions(&self, user_id: &str) -> Result<Vec<Interaction>> {
        let rows: Vec<InteractionRow> = self
            .select_where(OWNED_ROWS, INTERACTION_TABLE, user_id)
            .await?;
        Ok(into_models(rows))
    }

    async fn create_offer(&self, offer: NewOffer) -> Result<Offer> {
        let row: Option<OfferRow> = self.sdb.create(OFFER_TABLE).content(offer).await?;
        row.map(Offer::from).ok_or(Error::InternalServerError)
    }

    async fn list_offers(&self, user_id: &str) -> Result<Vec<Offer>> {
        let rows: Vec<OfferRow> = self.select_where(OWNED_ROWS, OFFER_TABLE, user_id).await?;
        Ok(into_models(rows))
    }

    async fn create_task(&self, task: NewTask) -> Result<Task> {
        let row: Option<TaskRow> = self.sdb.create(TASK_TABLE).content(task).await?;
        row.map(Task::from).ok_or(Error::InternalServerError)
    }

    async fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>> {
        let rows: Vec<TaskRow> = self.select_where(OWNED_ROWS, TASK_TABLE, user_id).await?;
        Ok(into_models(rows))
    }

    async fn complete_task(
        &self,
        user_id: &str,
        task_id: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Task>> {
        let id = get_record_id_in_table(task_id, TASK_TABLE)?;
        let rows: Vec<TaskRow> = self
            .sdb
            .query("UPDATE $id SET completed_at = completed_at ?? $at WHERE user_id = $user_id RETURN AFTER;")
            .bind(("id", id))
            .bind(("user_id", user_id.to_string()))
            .bind(("at", at))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next().map(Task::from))
    }

    async fn unread_notifications(&self, user_id: &str) -> Result<Vec<Notification>> {
        let rows: Vec<NotificationRow> = self
            .select_where(
                "SELECT * FROM type::table($table) WHERE user_id = $user_id AND (read_at IS NONE OR read_at IS NULL);",
                NOTIFICATION_TABLE,
                user_id,
            )
            .await?;
        Ok(into_models(rows))
    }

    async fn mark_notification_read(
        &self,
        user_id: &str,
        notification_id: &str,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let id = get_record_id_in_table(notification_id, NOTIFICATION_TABLE)?;
        let rows: Vec<NotificationRow> = self
            .sdb
            .query("UPDATE $id SET read_at = $at WHERE user_id = $user_id AND (read_at IS NONE OR read_at IS NULL) RETURN AFTER;")
            .bind(("id", id))
            .bind(("user_id", user_id.to_string()))
            .bind(("at", at))
            .await?
            .take(0)?;
        Ok(!rows.is_empty())
    }

    async fn create_account_link(&self, link: NewAccountLink) -> Result<AccountLink> {
        let row: Option<AccountLinkRow> = self
            .sdb
            .create(ACCOUNT_LINK_TABLE)
            .content(link)
            .await?;
        row.map(AccountLink::from).ok_or(Error::InternalServerError)
    }

    async fn list_account_links(&self, requester_id: &str) -> Result<Vec<AccountLink>> {
        let rows: Vec<AccountLinkRow> = self
            .sdb
            .query("SELECT * FROM type::table($table) WHERE requester_id = $requester_id;")
            .bind(("table", ACCOUNT_LINK_TABLE))
            .bind(("requester_id", requester_id.to_string()))
            .await?
            .take(0)?;
        Ok(into_models(rows))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::models::task::TaskCategory;
    use crate::services::suggestions::{BatchSize, surface_pending};

    const USER: &str = "users:athlete";

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    async fn memory_store() -> SurrealStore {
        let sdb = connect("mem://").await.unwrap();
        sdb.use_ns("test").use_db("test").await.unwrap();
        SurrealStore { sdb }
    }

    /// `explicit_null` writes `surfaced_at: NULL` instead of leaving it unset.
    async fn seed_suggestion(
        store: &SurrealStore,
        key: &str,
        user_id: &str,
        created_at: DateTime<Utc>,
        explicit_null: bool,
    ) -> String {
        let sql = if explicit_null {
            "CREATE type::thing($table, $key) SET user_id = $user_id, title = $key, created_at = $created_at, surfaced_at = NULL;"
        } else {
            "CREATE type::thing($table, $key) SET user_id = $user_id, title = $key, created_at = $created_at;"
        };
        store
            .sdb
            .query(sql)
            .bind(("table", SUGGESTION_TABLE))
            .bind(("key", key.to_string()))
            .bind(("user_id", user_id.to_string()))
            .bind(("created_at", created_at))
            .await
            .unwrap()
            .check()
            .unwrap();
        format!("{SUGGESTION_TABLE}:{key}")
    }

    async fn seed_five(store: &SurrealStore) {
        for i in 0..4 {
            seed_suggestion(store, &format!("s{i}"), USER, t0() + Duration::hours(i), false).await;
        }
        seed_suggestion(store, "s4", USER, t0() + Duration::hours(4), true).await;
    }

    fn titles(rows: &[Suggestion]) -> Vec<String> {
        let mut titles: Vec<String> = rows.iter().map(|s| s.title.clone()).collect();
        titles.sort();
        titles
    }

    #[tokio::test]
    async fn null_and_absent_timestamps_are_both_pending() {
        let store = memory_store().await;
        seed_five(&store).await;

        let pending = store.pending_suggestions(USER).await.unwrap();
        assert_eq!(titles(&pending), vec!["s0", "s1", "s2", "s3", "s4"]);
        assert!(store.surfaced_suggestions(USER).await.unwrap().is_empty());
        assert_eq!(
            store.users_with_pending_suggestions().await.unwrap(),
            vec![USER.to_string()]
        );
        assert_eq!(store.admin_stats().await.unwrap().pending_suggestions, 5);
    }

    #[tokio::test]
    async fn surfacing_drains_oldest_first_then_returns_zero() {
        let store = memory_store().await;
        seed_five(&store).await;
        let size = BatchSize::standard();

        assert_eq!(surface_pending(&store, USER, size, t0()).await.unwrap(), 3);
        let surfaced = store.surfaced_suggestions(USER).await.unwrap();
        assert_eq!(titles(&surfaced), vec!["s0", "s1", "s2"]);

        assert_eq!(surface_pending(&store, USER, size, t0()).await.unwrap(), 2);
        assert_eq!(surface_pending(&store, USER, size, t0()).await.unwrap(), 0);
        assert_eq!(store.surfaced_suggestions(USER).await.unwrap().len(), 5);
        assert!(store.pending_suggestions(USER).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn mark_surfaced_only_counts_rows_still_pending() {
        let store = memory_store().await;
        let a = seed_suggestion(&store, "a", USER, t0(), true).await;
        let b = seed_suggestion(&store, "b", USER, t0(), false).await;

        assert_eq!(store.mark_surfaced(&[a.clone()], t0()).await.unwrap(), 1);
        assert_eq!(store.mark_surfaced(&[a, b], t0()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn other_users_suggestions_are_not_selected() {
        let store = memory_store().await;
        seed_suggestion(&store, "mine", USER, t0(), false).await;
        seed_suggestion(&store, "theirs", "users:other", t0(), true).await;

        let pending = store.pending_suggestions(USER).await.unwrap();
        assert_eq!(titles(&pending), vec!["mine"]);
    }

    #[tokio::test]
    async fn completing_a_task_keeps_the_first_timestamp() {
        let store = memory_store().await;
        let task = store
            .create_task(NewTask {
                user_id: USER.to_string(),
                title: "Send transcript".to_string(),
                category: TaskCategory::Academic,
                critical: true,
                due_at: Some(t0()),
                created_at: t0(),
            })
            .await
            .unwrap();
        assert!(task.completed_at.is_none());

        let first = store
            .complete_task(USER, &task.id, t0() + Duration::hours(1))
            .await
            .unwrap()
            .expect("owned task");
        assert_eq!(first.completed_at, Some(t0() + Duration::hours(1)));

        let again = store
            .complete_task(USER, &task.id, t0() + Duration::hours(5))
            .await
            .unwrap()
            .expect("owned task");
        assert_eq!(again.completed_at, first.completed_at);

        assert!(
            store
                .complete_task("users:other", &task.id, t0())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn notifications_with_null_read_at_are_unread() {
        let store = memory_store().await;
        store
            .sdb
            .query("CREATE notifications:n1 SET user_id = $user_id, title = 'Coach replied', created_at = $at, read_at = NULL;")
            .bind(("user_id", USER.to_string()))
            .bind(("at", t0()))
            .await
            .unwrap()
            .check()
            .unwrap();

        let unread = store.unread_notifications(USER).await.unwrap();
        assert_eq!(unread.len(), 1);

        assert!(store.mark_notification_read(USER, "notifications:n1", t0()).await.unwrap());
        assert!(!store.mark_notification_read(USER, "notifications:n1", t0()).await.unwrap());
        assert!(store.unread_notifications(USER).await.unwrap().is_empty());
    }
}

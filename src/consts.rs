pub mod table_const {
    pub const USER_TABLE: &str = "users";
    pub const SUGGESTION_TABLE: &str = "suggestions";
    pub const SCHOOL_TABLE: &str = "schools";
    pub const COACH_TABLE: &str = "coaches";
    pub const INTERACTION_TABLE: &str = "interactions";
    pub const OFFER_TABLE: &str = "offers";
    pub const TASK_TABLE: &str = "tasks";
    pub const NOTIFICATION_TABLE: &str = "notifications";
    pub const ACCOUNT_LINK_TABLE: &str = "account_links";
}

pub mod http_const {
    pub const REQUEST_ID_HEADER: &str = "x-request-id";
    pub const CSRF_HEADER: &str = "x-csrf-token";
    pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";
    pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
    pub const CSRF_COOKIE: &str = "csrf_token";
    pub const MAX_REQUEST_ID_LEN: usize = 128;

    /// Paths under these prefixes are called by schedulers, not browsers.
    pub const CSRF_EXEMPT_PREFIXES: &[&str] = &["/api/cron/"];

    pub const LOGIN_PATH: &str = "/login";
    pub const HOME_PATH: &str = "/";
}

pub mod rules_const {
    use std::time::Duration;

    pub const SURFACE_BATCH_SIZE: usize = 3;
    pub const ADMIN_GATE_READY_TIMEOUT: Duration = Duration::from_secs(5);
    pub const READINESS_PROBE_FIRST_DELAY: Duration = Duration::from_millis(250);
    pub const READINESS_PROBE_MAX_DELAY: Duration = Duration::from_secs(10);

    pub const RECOVERY_DURATION_DAYS: i64 = 14;
    pub const COACH_SILENCE_DAYS: i64 = 60;
    pub const ELIGIBILITY_HORIZON_DAYS: i64 = 30;
    pub const MIN_TRACKED_SCHOOLS: usize = 3;
}

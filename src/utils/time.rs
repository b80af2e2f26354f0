use chrono::{DateTime, Duration, Utc};

pub fn time_now() -> DateTime<Utc> {
    Utc::now()
}

pub fn days_after(at: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    at + Duration::days(days)
}

/// Whole days elapsed from `earlier` to `later`, never negative.
pub fn days_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    (later - earlier).num_days().max(0)
}

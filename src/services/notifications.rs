use std::collections::VecDeque;

use crate::{
    models::notification::{BadgeColor, Notification},
    utils::get_record_id::same_record_id,
};

/// Unread notifications, most recent first.
#[derive(Debug, Clone, Default)]
pub struct NotificationInbox {
    unread: VecDeque<Notification>,
}

impl NotificationInbox {
    pub fn from_rows(rows: Vec<Notification>) -> Self {
        let mut unread: Vec<Notification> = rows.into_iter().filter(|n| n.is_unread()).collect();
        unread.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Self {
            unread: unread.into(),
        }
    }

    /// Removes the notification; false when it was not in the inbox. `id`
    /// may use either the escaped or the plain key form.
    pub fn acknowledge(&mut self, id: &str) -> bool {
        match self.unread.iter().position(|n| same_record_id(&n.id, id)) {
            Some(index) => {
                self.unread.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn unread_count(&self) -> usize {
        self.unread.len()
    }

    pub fn badge(&self) -> BadgeColor {
        BadgeColor::for_count(self.unread_count())
    }

    pub fn into_vec(self) -> Vec<Notification> {
        self.unread.into()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use super::*;
    use crate::store::memory::fixtures::notification;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap()
    }

    fn titles(inbox: &NotificationInbox) -> Vec<String> {
        inbox.clone().into_vec().into_iter().map(|n| n.title).collect()
    }

    #[test]
    fn orders_most_recent_first_and_drops_read() {
        let mut read = notification("users:a", "read", t0() + Duration::hours(5));
        read.read_at = Some(t0() + Duration::hours(6));
        let inbox = NotificationInbox::from_rows(vec![
            notification("users:a", "first", t0()),
            read,
            notification("users:a", "third", t0() + Duration::hours(2)),
            notification("users:a", "second", t0() + Duration::hours(1)),
        ]);
        assert_eq!(titles(&inbox), vec!["third", "second", "first"]);
        assert_eq!(inbox.unread_count(), 3);
    }

    #[test]
    fn acknowledge_removes_once() {
        let first = notification("users:a", "offer update", t0());
        let id = first.id.clone();
        let mut inbox = NotificationInbox::from_rows(vec![first]);

        assert!(inbox.acknowledge(&id));
        assert!(!inbox.acknowledge(&id));
        assert_eq!(inbox.unread_count(), 0);
        assert_eq!(inbox.badge(), BadgeColor::None);
    }

    #[test]
    fn acknowledge_accepts_plain_form_of_escaped_key() {
        let mut escaped = notification("users:a", "visit confirmed", t0());
        escaped.id = "notifications:⟨visit-1⟩".to_string();
        let mut inbox = NotificationInbox::from_rows(vec![
            escaped,
            notification("users:a", "camp", t0() + Duration::hours(1)),
        ]);

        assert!(inbox.acknowledge("notifications:visit-1"));
        assert_eq!(titles(&inbox), vec!["camp"]);
    }

    #[test]
    fn badge_tracks_unread_volume() {
        assert_eq!(BadgeColor::for_count(0), BadgeColor::None);
        assert_eq!(BadgeColor::for_count(2), BadgeColor::Info);
        assert_eq!(BadgeColor::for_count(4), BadgeColor::Warning);
        assert_eq!(BadgeColor::for_count(10), BadgeColor::Critical);
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use store::models::null_as_default;
use store::Id;

use super::lenient_timestamp;

/// An inbox entry. `is_read` only ever flips to `true`, via the mark-as-read call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Id,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_read: bool,
}

/// Count of entries still unread.
pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.is_read).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        let raw = r#"[
            {"id":1,"title":"Deploy","message":"Report at 0600","createdAt":"2024-05-01T06:00:00Z","isRead":false},
            {"id":2,"title":"Kit","message":"Collect kit","createdAt":"2024-05-02T06:00:00Z","isRead":true}
        ]"#;
        let list: Vec<Notification> = serde_json::from_str(raw).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(unread_count(&list), 1);

        let back = serde_json::to_value(&list[0]).unwrap();
        assert_eq!(back["isRead"], false);
        assert!(back.get("createdAt").is_some());
    }

    #[test]
    fn test_sparse_entry_keeps_the_list() {
        let raw = r#"[
            {"id":1,"title":"Deploy","message":"Report at 0600","createdAt":"2024-05-01T06:00:00Z","isRead":false},
            {"id":2,"title":null,"message":null,"createdAt":"2024-05-02 06:00:00","isRead":null},
            {"id":3,"title":"Kit","createdAt":"soon"}
        ]"#;
        let list: Vec<Notification> = serde_json::from_str(raw).unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[1].title, "");
        assert!(!list[1].is_read);
        assert_eq!(
            list[1].created_at,
            Some("2024-05-02T06:00:00Z".parse().unwrap())
        );
        assert!(list[2].created_at.is_none());
        assert_eq!(unread_count(&list), 3);
    }
}

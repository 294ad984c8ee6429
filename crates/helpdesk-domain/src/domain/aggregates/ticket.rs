//! Ticket Aggregate
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Id, Priority, SlaDuration, TicketStatus};
use crate::wire;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: Id,
    #[serde(default, with = "wire::text")]
    pub title: String,
    #[serde(default, with = "wire::text")]
    pub description: String,
    pub status: TicketStatus,
    pub priority: Priority,
    #[serde(default)]
    pub category_id: Option<Id>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub subcategory_id: Option<Id>,
    #[serde(default)]
    pub subcategory_name: Option<String>,
    /// Creator, by user id or e-mail
    #[serde(default)]
    pub user_id: Option<Id>,
    /// Assignee e-mail
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default, with = "wire::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "wire::timestamp")]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub solution_resolved: Option<String>,
    #[serde(default)]
    pub reason_canceled: Option<String>,
    #[serde(default, with = "wire::sla")]
    pub sla_response_time: Option<SlaDuration>,
    #[serde(default, with = "wire::sla")]
    pub sla_resolution_time: Option<SlaDuration>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(default)]
    pub user_id: Option<Id>,
    #[serde(default, with = "wire::text")]
    pub content: String,
    #[serde(default, with = "wire::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Ticket {
    pub fn is_assigned_to(&self, email: &str) -> bool {
        self.assigned_to
            .as_deref()
            .is_some_and(|assignee| assignee.eq_ignore_ascii_case(email))
    }

    /// Text the history search runs against.
    pub fn search_text(&self) -> String {
        format!("{} {} {}", self.id, self.title, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_api_ticket() {
        let json = r#"{
            "id": 17,
            "title": "Printer offline",
            "description": null,
            "status": 2,
            "priority": 3,
            "categoryId": 4,
            "categoryName": "Hardware",
            "subcategoryId": "9",
            "userId": "maria@example.com",
            "assignedTo": "joao@example.com",
            "createdAt": "2024-10-01T23:50:00",
            "slaResponseTime": "00:20:00",
            "slaResolutionTime": "not-a-duration",
            "comments": [{"userId": "joao@example.com", "content": "On it", "createdAt": "2024-10-02T08:00:00Z"}]
        }"#;
        let ticket: Ticket = serde_json::from_str(json).unwrap();
        assert_eq!(ticket.id, Id::Number(17));
        assert_eq!(ticket.description, "");
        assert_eq!(ticket.status, TicketStatus::InProgress);
        assert_eq!(ticket.priority, Priority::High);
        assert_eq!(ticket.subcategory_id, Some(Id::Text("9".into())));
        assert!(ticket.created_at.is_some());
        assert!(ticket.sla_response_time.is_some());
        assert!(ticket.sla_resolution_time.is_none());
        assert_eq!(ticket.comments.len(), 1);
        assert!(ticket.is_assigned_to("JOAO@example.com"));
    }

    #[test]
    fn test_numeric_creator_id() {
        use crate::domain::aggregates::User;
        use crate::permissions::can_edit;

        let ticket: Ticket = serde_json::from_value(serde_json::json!({
            "id": 1, "title": "t", "status": 1, "priority": 1, "userId": 42,
            "comments": [{"userId": 42, "content": "oi"}]
        }))
        .unwrap();
        assert_eq!(ticket.user_id, Some(Id::Number(42)));
        assert_eq!(ticket.comments[0].user_id, Some(Id::Number(42)));

        let mut creator: User = serde_json::from_value(serde_json::json!({"id": "42", "email": "c@x.io"})).unwrap();
        assert!(can_edit(&creator, &ticket));
        creator.id = Some(Id::Number(43));
        assert!(!can_edit(&creator, &ticket));
    }

    #[test]
    fn test_search_text() {
        let ticket: Ticket =
            serde_json::from_str(r#"{"id": 5, "title": "VPN", "description": "drops", "status": 1, "priority": 1}"#)
                .unwrap();
        assert_eq!(ticket.search_text(), "5 VPN drops");
    }
}

//! Ticket history query

use crate::domain::aggregates::Ticket;
use crate::domain::value_objects::{Priority, TicketStatus};

/// Search and filters over closed tickets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    /// Case-insensitive, matched against "id title description"
    pub search: Option<String>,
    pub status: Option<TicketStatus>,
    pub priority: Option<Priority>,
}

impl HistoryQuery {
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if !ticket.status.is_closed() {
            return false;
        }
        if let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            if !ticket.search_text().to_lowercase().contains(&term.to_lowercase()) {
                return false;
            }
        }
        self.status.map_or(true, |s| ticket.status == s)
            && self.priority.map_or(true, |p| ticket.priority == p)
    }

    /// Matching tickets, newest first. Tickets without a creation time sort last.
    pub fn apply<'a>(&self, tickets: &'a [Ticket]) -> Vec<&'a Ticket> {
        let mut hits: Vec<&Ticket> = tickets.iter().filter(|t| self.matches(t)).collect();
        hits.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Id;
    use crate::visibility::tests::ticket;
    use chrono::{Duration, Utc};

    fn closed_tickets() -> Vec<Ticket> {
        let now = Utc::now();
        let mut a = ticket(1, TicketStatus::Resolved);
        a.title = "Impressora travada".into();
        a.priority = Priority::Low;
        a.created_at = Some(now - Duration::days(3));
        let mut b = ticket(2, TicketStatus::Canceled);
        b.description = "VPN sem acesso".into();
        b.created_at = Some(now - Duration::days(1));
        let mut c = ticket(3, TicketStatus::Resolved);
        c.created_at = None;
        let open = ticket(4, TicketStatus::Open);
        vec![a, b, c, open]
    }

    fn ids(hits: Vec<&Ticket>) -> Vec<Id> {
        hits.into_iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_newest_first_closed_only() {
        let all = closed_tickets();
        assert_eq!(
            ids(HistoryQuery::default().apply(&all)),
            vec![Id::Number(2), Id::Number(1), Id::Number(3)]
        );
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let all = closed_tickets();
        let q = HistoryQuery {
            search: Some("vpn".into()),
            ..Default::default()
        };
        assert_eq!(ids(q.apply(&all)), vec![Id::Number(2)]);

        let by_id = HistoryQuery {
            search: Some("3".into()),
            ..Default::default()
        };
        assert_eq!(ids(by_id.apply(&all)), vec![Id::Number(3)]);
    }

    #[test]
    fn test_status_and_priority_filters() {
        let all = closed_tickets();
        let q = HistoryQuery {
            status: Some(TicketStatus::Resolved),
            priority: Some(Priority::Low),
            ..Default::default()
        };
        assert_eq!(ids(q.apply(&all)), vec![Id::Number(1)]);

        let open_filter = HistoryQuery {
            status: Some(TicketStatus::Open),
            ..Default::default()
        };
        assert!(open_filter.apply(&all).is_empty());
    }
}

//! Dashboard summary over the visible tickets

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::aggregates::Ticket;
use crate::domain::value_objects::{Priority, TicketStatus};
use crate::sla;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub by_status: BTreeMap<TicketStatus, usize>,
    pub by_priority: BTreeMap<Priority, usize>,
    /// Active tickets past their response deadline
    pub response_overdue: usize,
    /// Active tickets past their resolution deadline
    pub resolution_overdue: usize,
}

impl Summary {
    pub fn compute(tickets: &[&Ticket], now: DateTime<Utc>) -> Self {
        let mut summary = Summary {
            total: tickets.len(),
            ..Default::default()
        };
        for ticket in tickets {
            *summary.by_status.entry(ticket.status).or_default() += 1;
            *summary.by_priority.entry(ticket.priority).or_default() += 1;

            let due = sla::deadlines(ticket);
            if sla::is_overdue(ticket, due.response, now) {
                summary.response_overdue += 1;
            }
            if sla::is_overdue(ticket, due.resolution, now) {
                summary.resolution_overdue += 1;
            }
        }
        summary
    }

    pub fn count(&self, status: TicketStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

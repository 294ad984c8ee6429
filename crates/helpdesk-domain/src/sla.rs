//! SLA deadlines
//!
//! A deadline is the ticket's creation time advanced field by field: hours
//! first, then minutes, then seconds.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Serialize;

use crate::domain::aggregates::Ticket;
use crate::domain::value_objects::SlaDuration;

/// `created_at` advanced by `sla`. `None` only on calendar overflow.
pub fn deadline<Tz: TimeZone>(created_at: &DateTime<Tz>, sla: &SlaDuration) -> Option<DateTime<Tz>> {
    created_at
        .clone()
        .checked_add_signed(Duration::hours(sla.total_hours()))?
        .checked_add_signed(Duration::minutes(sla.minutes()))?
        .checked_add_signed(Duration::seconds(sla.seconds()) + Duration::nanoseconds(sla.subsec_nanos()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Deadlines {
    pub response: Option<DateTime<Utc>>,
    pub resolution: Option<DateTime<Utc>>,
}

/// Response and resolution deadlines; missing inputs give no deadline.
pub fn deadlines(ticket: &Ticket) -> Deadlines {
    let Some(created_at) = ticket.created_at else {
        return Deadlines::default();
    };
    Deadlines {
        response: ticket.sla_response_time.and_then(|sla| deadline(&created_at, &sla)),
        resolution: ticket.sla_resolution_time.and_then(|sla| deadline(&created_at, &sla)),
    }
}

/// Past `deadline` while still open or in progress.
pub fn is_overdue(ticket: &Ticket, deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    ticket.status.is_active() && deadline.is_some_and(|due| due < now)
}

//! Role-based ticket visibility
//!
//! Which endpoint family a viewer reads from and which of the fetched tickets
//! each view shows.
//!
//! | Role      | Listing        | Active view      | History view     |
//! |-----------|----------------|------------------|------------------|
//! | Admin     | `/admin`       | every ticket     | resolved/canceled|
//! | Atendente | `/assignment`  | open/in progress | resolved/canceled|
//! | Usuario   | `/tickets`     | open/in progress | resolved/canceled|

use crate::domain::aggregates::{Ticket, User};
use crate::domain::value_objects::{Id, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketView {
    /// Dashboard list
    Active,
    /// Resolved and canceled tickets
    History,
}

/// Ticket endpoint families exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Admin,
    Assignment,
    Tickets,
}

impl Endpoint {
    /// Listing and detail reads.
    pub fn listing(viewer: &User) -> Self {
        match viewer.primary_role() {
            Role::Admin => Endpoint::Admin,
            Role::Atendente => Endpoint::Assignment,
            _ => Endpoint::Tickets,
        }
    }

    /// Title/description/category edits.
    pub fn edit(viewer: &User) -> Self {
        if viewer.is_admin() {
            Endpoint::Admin
        } else {
            Endpoint::Tickets
        }
    }

    /// Status updates and transfers.
    pub fn workflow(viewer: &User) -> Self {
        if viewer.is_admin() {
            Endpoint::Admin
        } else {
            Endpoint::Assignment
        }
    }

    pub fn base(self) -> &'static str {
        match self {
            Endpoint::Admin => "/admin",
            Endpoint::Assignment => "/assignment",
            Endpoint::Tickets => "/tickets",
        }
    }

    pub fn item(self, id: &Id) -> String {
        format!("{}/{}", self.base(), id)
    }

    /// Only the admin and assignment families expose transfers.
    pub fn transfer(self, id: &Id) -> Option<String> {
        match self {
            Endpoint::Admin | Endpoint::Assignment => Some(format!("{}/transfer/{}", self.base(), id)),
            Endpoint::Tickets => None,
        }
    }
}

pub fn is_visible(viewer: &User, view: TicketView, ticket: &Ticket) -> bool {
    match view {
        TicketView::Active => viewer.is_admin() || ticket.status.is_active(),
        TicketView::History => ticket.status.is_closed(),
    }
}

/// Filter an already-fetched listing down to what `view` shows `viewer`.
pub fn visible_tickets<'a>(viewer: &User, view: TicketView, tickets: &'a [Ticket]) -> Vec<&'a Ticket> {
    let visible: Vec<&Ticket> = tickets
        .iter()
        .filter(|ticket| is_visible(viewer, view, ticket))
        .collect();
    tracing::debug!(
        role = %viewer.primary_role(),
        ?view,
        fetched = tickets.len(),
        visible = visible.len(),
        "filtered ticket listing"
    );
    visible
}

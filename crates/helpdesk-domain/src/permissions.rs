//! Per-ticket action permissions

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::aggregates::{Ticket, User};
use crate::domain::value_objects::TicketStatus;

/// Actions a viewer can take on a loaded ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    View,
    Comment,
    /// Title, description, category, priority
    Edit,
    ChangeStatus,
    Resolve,
    Cancel,
    Transfer,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::View,
        Action::Comment,
        Action::Edit,
        Action::ChangeStatus,
        Action::Resolve,
        Action::Cancel,
        Action::Transfer,
    ];
}

/// Screens of the front end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    Dashboard,
    NewTicket,
    History,
    Categories,
    Users,
}

/// Admin, or the ticket's creator.
pub fn can_edit(viewer: &User, ticket: &Ticket) -> bool {
    viewer.is_admin() || ticket.user_id.as_ref().is_some_and(|creator| viewer.is(creator))
}

/// Admin, or the attendant currently working the ticket.
pub fn can_transition(viewer: &User, ticket: &Ticket) -> bool {
    viewer.is_admin()
        || (viewer.is_attendant()
            && ticket.is_assigned_to(&viewer.email)
            && ticket.status == TicketStatus::InProgress)
}

/// Everything `viewer` may do with `ticket`.
pub fn permitted_actions(viewer: &User, ticket: &Ticket) -> HashSet<Action> {
    use Action::*;
    let mut actions: HashSet<Action> = [View, Comment].into_iter().collect();
    if can_edit(viewer, ticket) {
        actions.insert(Edit);
    }
    if can_transition(viewer, ticket) {
        actions.extend([ChangeStatus, Resolve, Cancel, Transfer]);
    }
    actions
}

pub fn can(viewer: &User, ticket: &Ticket, action: Action) -> bool {
    permitted_actions(viewer, ticket).contains(&action)
}

/// Category and user management are admin-only.
pub fn can_open(viewer: &User, screen: Screen) -> bool {
    match screen {
        Screen::Categories | Screen::Users => viewer.is_admin(),
        Screen::Dashboard | Screen::NewTicket | Screen::History => true,
    }
}

//! Helpdesk Domain
//!
//! Client-side rules of the helpdesk front end. Everything here is advisory:
//! the REST backend enforces the same rules, these exist so the front end can
//! hide what a viewer cannot do and reject bad forms before a request is sent.
//!
//! ## Features
//! - Ticket, user and category entities as served by the API
//! - Role-based ticket visibility and endpoint routing
//! - Per-ticket action permissions
//! - SLA deadline derivation
//! - Form validation producing ready-to-send payloads
//! - Role board, history query and dashboard summary

use thiserror::Error;

pub mod dashboard;
pub mod domain;
pub mod history;
pub mod labels;
pub mod permissions;
pub mod sla;
pub mod users;
pub mod validation;
pub mod visibility;

mod wire;

pub use dashboard::Summary;
pub use domain::aggregates::{Category, Comment, Subcategory, Ticket, User};
pub use domain::value_objects::{Id, Priority, Role, SlaDuration, TicketStatus};
pub use history::HistoryQuery;
pub use labels::{Failure, Locale};
pub use permissions::{Action, Screen};
pub use users::{BlockRequest, RoleAction, RoleBoard, RoleChange};
pub use validation::{
    CategoryForm, NewComment, Registration, StatusUpdate, SubcategoryForm, TicketDraft,
    TicketForm, Transfer, ValidationError,
};
pub use visibility::{Endpoint, TicketView};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid SLA duration '{0}': expected HH:MM:SS")]
    InvalidSla(String),

    #[error("unknown ticket status: {0}")]
    UnknownStatus(String),

    #[error("unknown priority: {0}")]
    UnknownPriority(String),

    #[error("unknown locale: {0}")]
    UnknownLocale(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;

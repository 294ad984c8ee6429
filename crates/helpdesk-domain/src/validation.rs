//! Form validation
//!
//! Each form type can only be built through its validating constructor, and
//! the SDK only accepts the validated types. A rejected form therefore never
//! reaches the network.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::domain::aggregates::{Category, Subcategory, Ticket};
use crate::domain::value_objects::{Id, Priority, SlaDuration, TicketStatus};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("a solution is required to resolve the ticket")]
    SolutionRequired,

    #[error("a cancellation reason is required")]
    ReasonRequired,

    #[error("required field missing: {0}")]
    MissingField(&'static str),

    #[error("select a category first")]
    CategoryRequired,

    #[error("unknown category {0}")]
    UnknownCategory(Id),

    #[error("subcategory {subcategory} does not belong to category {category}")]
    SubcategoryNotInCategory { category: Id, subcategory: Id },

    #[error("a transfer e-mail is required")]
    TransferTargetRequired,

    #[error("comment is empty")]
    EmptyComment,

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("name is required")]
    NameRequired,

    #[error("invalid SLA duration: {0}")]
    InvalidSla(String),

    #[error("status {0} cannot be set")]
    UnsupportedStatus(i32),
}

type Result<T> = std::result::Result<T, ValidationError>;

/// Trimmed, non-empty text.
fn filled(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Status transitions
// =============================================================================

/// Body of a status update. Carries only the text field matching the target
/// status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    status: TicketStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    solution_resolved: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason_canceled: Option<String>,
}

impl StatusUpdate {
    pub fn new(status: TicketStatus, solution: Option<&str>, reason: Option<&str>) -> Result<Self> {
        let (solution_resolved, reason_canceled) = match status {
            TicketStatus::Resolved => (
                Some(filled(solution).ok_or(ValidationError::SolutionRequired)?),
                None,
            ),
            TicketStatus::Canceled => (
                None,
                Some(filled(reason).ok_or(ValidationError::ReasonRequired)?),
            ),
            TicketStatus::Open | TicketStatus::InProgress => (None, None),
            TicketStatus::Unknown(code) => return Err(ValidationError::UnsupportedStatus(code)),
        };
        Ok(Self {
            status,
            solution_resolved,
            reason_canceled,
        })
    }

    pub fn status(&self) -> TicketStatus {
        self.status
    }
}

// =============================================================================
// Ticket create / edit
// =============================================================================

/// Ticket form as typed by the user, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Id>,
    pub subcategory_id: Option<Id>,
    pub priority: Option<Priority>,
}

impl TicketDraft {
    /// Prefill from an existing ticket for editing.
    pub fn from_ticket(ticket: &Ticket) -> Self {
        Self {
            title: Some(ticket.title.clone()),
            description: Some(ticket.description.clone()),
            category_id: ticket.category_id.clone(),
            subcategory_id: ticket.subcategory_id.clone(),
            priority: Some(ticket.priority),
        }
    }

    /// Apply user changes. Switching category clears the subcategory unless a
    /// new one is given.
    pub fn apply(mut self, changes: TicketDraft) -> Self {
        if changes.category_id.is_some() && changes.category_id != self.category_id {
            self.category_id = changes.category_id;
            self.subcategory_id = None;
        }
        if changes.title.is_some() {
            self.title = changes.title;
        }
        if changes.description.is_some() {
            self.description = changes.description;
        }
        if changes.subcategory_id.is_some() {
            self.subcategory_id = changes.subcategory_id;
        }
        if changes.priority.is_some() {
            self.priority = changes.priority;
        }
        self
    }
}

/// Subcategories offered once `category` is chosen; none before that.
pub fn selectable_subcategories<'a>(catalog: &'a [Category], category: Option<&Id>) -> &'a [Subcategory] {
    category
        .and_then(|id| catalog.iter().find(|cat| &cat.id == id))
        .map(|cat| cat.subcategories.as_slice())
        .unwrap_or(&[])
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketForm {
    title: String,
    description: String,
    category_id: Id,
    subcategory_id: Id,
    priority: Priority,
}

impl TicketForm {
    pub fn validate(draft: &TicketDraft, catalog: &[Category]) -> Result<Self> {
        let title = filled(draft.title.as_deref()).ok_or(ValidationError::MissingField("title"))?;
        let description =
            filled(draft.description.as_deref()).ok_or(ValidationError::MissingField("description"))?;
        let category_id = draft.category_id.clone().ok_or(ValidationError::CategoryRequired)?;
        let subcategory_id = draft
            .subcategory_id
            .clone()
            .ok_or(ValidationError::MissingField("subcategory"))?;
        let priority = match draft.priority {
            Some(Priority::Unknown(_)) | None => return Err(ValidationError::MissingField("priority")),
            Some(priority) => priority,
        };

        let category = catalog
            .iter()
            .find(|cat| cat.id == category_id)
            .ok_or_else(|| ValidationError::UnknownCategory(category_id.clone()))?;
        let subcategory = category.subcategory(&subcategory_id).ok_or(ValidationError::SubcategoryNotInCategory {
            category: category_id,
            subcategory: subcategory_id,
        })?;

        // Ids go out in the catalog's form, whatever form the draft used.
        Ok(Self {
            title,
            description,
            category_id: category.id.clone(),
            subcategory_id: subcategory.id.clone(),
            priority,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

// =============================================================================
// Small forms
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    assignment_email: String,
}

impl Transfer {
    pub fn new(email: Option<&str>) -> Result<Self> {
        Ok(Self {
            assignment_email: filled(email).ok_or(ValidationError::TransferTargetRequired)?,
        })
    }

    pub fn target(&self) -> &str {
        &self.assignment_email
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewComment {
    content: String,
}

impl NewComment {
    pub fn new(content: &str) -> Result<Self> {
        Ok(Self {
            content: filled(Some(content)).ok_or(ValidationError::EmptyComment)?,
        })
    }
}

/// Self-service sign-up. Field names follow the identity service.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    nome: String,
    email: String,
    celular: String,
    password: String,
}

impl Registration {
    pub fn new(name: &str, email: &str, phone: &str, password: &str, confirmation: &str) -> Result<Self> {
        if password != confirmation {
            return Err(ValidationError::PasswordMismatch);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LEN));
        }
        Ok(Self {
            nome: filled(Some(name)).ok_or(ValidationError::NameRequired)?,
            email: filled(Some(email)).ok_or(ValidationError::MissingField("email"))?,
            celular: phone.trim().to_string(),
            password: password.to_string(),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("nome", &self.nome)
            .field("email", &self.email)
            .field("celular", &self.celular)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Category create/rename, also used to rename subcategories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryForm {
    name: String,
}

impl CategoryForm {
    pub fn new(name: &str) -> Result<Self> {
        Ok(Self {
            name: filled(Some(name)).ok_or(ValidationError::NameRequired)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryForm {
    name: String,
    category_id: Id,
    sla_response_time: SlaDuration,
    sla_resolution_time: SlaDuration,
}

impl SubcategoryForm {
    /// Missing SLA durations default to `00:00:00`.
    pub fn new(name: &str, category: Option<Id>, response: Option<&str>, resolution: Option<&str>) -> Result<Self> {
        let name = filled(Some(name)).ok_or(ValidationError::NameRequired)?;
        let category_id = category.ok_or(ValidationError::CategoryRequired)?;
        let parse = |raw: Option<&str>| -> Result<SlaDuration> {
            match filled(raw) {
                Some(raw) => raw.parse().map_err(|_| ValidationError::InvalidSla(raw)),
                None => Ok(SlaDuration::zero()),
            }
        };
        Ok(Self {
            name,
            category_id,
            sla_response_time: parse(response)?,
            sla_resolution_time: parse(resolution)?,
        })
    }
}

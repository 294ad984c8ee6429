//! User entity
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Id, Role};
use crate::wire;

/// A user as returned by `/identity/me` and `/identity/users`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: Option<Id>,
    pub email: String,
    #[serde(default, alias = "nome", with = "wire::text")]
    pub name: String,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default, with = "wire::timestamp")]
    pub lockout_end: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(email: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            id: None,
            email: email.into(),
            name: String::new(),
            roles,
            lockout_end: None,
        }
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(&Role::Admin)
    }

    pub fn is_attendant(&self) -> bool {
        self.has_role(&Role::Atendente)
    }

    /// Effective role: Admin, then Atendente, then Usuario.
    pub fn primary_role(&self) -> Role {
        if self.is_admin() {
            Role::Admin
        } else if self.is_attendant() {
            Role::Atendente
        } else {
            Role::Usuario
        }
    }

    /// Whether `who` (a user id or e-mail, as tickets record it) names this user.
    pub fn is(&self, who: &Id) -> bool {
        self.id.as_ref() == Some(who) || self.email.eq_ignore_ascii_case(&who.as_text())
    }

    pub fn is_blocked_at(&self, now: DateTime<Utc>) -> bool {
        self.lockout_end.is_some_and(|end| end > now)
    }

    pub fn is_blocked(&self) -> bool {
        self.is_blocked_at(Utc::now())
    }

    /// The identifier block/unblock calls expect, falling back to e-mail.
    pub fn key(&self) -> String {
        self.id.as_ref().map_or_else(|| self.email.clone(), Id::to_string)
    }
}

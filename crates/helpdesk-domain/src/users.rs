//! User management: role board, filtering, paging, lockouts

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::aggregates::User;
use crate::domain::value_objects::Role;

pub const DEFAULT_LOCKOUT_MINUTES: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleAction {
    Add,
    Remove,
}

impl RoleAction {
    pub fn inverse(self) -> Self {
        match self {
            RoleAction::Add => RoleAction::Remove,
            RoleAction::Remove => RoleAction::Add,
        }
    }
}

/// Body of `POST /identity/roles/assign`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleChange {
    pub user_email: String,
    pub role_name: Role,
    pub action: RoleAction,
}

/// Local view of who holds which role, keyed by e-mail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleBoard {
    assignments: BTreeMap<String, BTreeSet<Role>>,
}

impl RoleBoard {
    pub fn from_users(users: &[User]) -> Self {
        Self {
            assignments: users
                .iter()
                .map(|u| (u.email.clone(), u.roles.iter().cloned().collect()))
                .collect(),
        }
    }

    pub fn has(&self, email: &str, role: &Role) -> bool {
        self.assignments
            .get(email)
            .is_some_and(|roles| roles.contains(role))
    }

    pub fn roles_of(&self, email: &str) -> impl Iterator<Item = &Role> {
        self.assignments.get(email).into_iter().flatten()
    }

    /// Flip `role` for `email` and return the change to send.
    pub fn toggle(&mut self, email: &str, role: Role) -> RoleChange {
        let roles = self.assignments.entry(email.to_string()).or_default();
        let action = if roles.remove(&role) {
            RoleAction::Remove
        } else {
            roles.insert(role.clone());
            RoleAction::Add
        };
        RoleChange {
            user_email: email.to_string(),
            role_name: role,
            action,
        }
    }

    /// Undo a toggle whose request failed.
    pub fn revert(&mut self, change: &RoleChange) {
        let roles = self.assignments.entry(change.user_email.clone()).or_default();
        match change.action {
            RoleAction::Add => {
                roles.remove(&change.role_name);
            }
            RoleAction::Remove => {
                roles.insert(change.role_name.clone());
            }
        }
    }
}

/// Users holding `role`, or everyone.
pub fn filter_by_role<'a>(users: &'a [User], role: Option<&Role>) -> Vec<&'a User> {
    users
        .iter()
        .filter(|u| role.map_or(true, |r| u.has_role(r)))
        .collect()
}

/// Zero-based page of `items`; out-of-range pages are empty.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> &[T] {
    if per_page == 0 {
        return &[];
    }
    let start = page.saturating_mul(per_page).min(items.len());
    let end = start.saturating_add(per_page).min(items.len());
    &items[start..end]
}

/// Body of `POST /identity/block-user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRequest {
    pub user_id: String,
    pub is_permanent: bool,
    pub lockout_duration_minutes: u32,
}

impl BlockRequest {
    pub fn permanent(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            is_permanent: true,
            lockout_duration_minutes: 0,
        }
    }

    pub fn for_minutes(user_id: impl Into<String>, minutes: u32) -> Self {
        Self {
            user_id: user_id.into(),
            is_permanent: false,
            lockout_duration_minutes: minutes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn users() -> Vec<User> {
        vec![
            User::new("ana@x.io", vec![Role::Admin]),
            User::new("bia@x.io", vec![Role::Atendente, Role::Usuario]),
            User::new("caio@x.io", vec![Role::Usuario]),
        ]
    }

    #[test]
    fn test_toggle_yields_action() {
        let mut board = RoleBoard::from_users(&users());
        let change = board.toggle("caio@x.io", Role::Atendente);
        assert_eq!(change.action, RoleAction::Add);
        assert!(board.has("caio@x.io", &Role::Atendente));

        let change = board.toggle("bia@x.io", Role::Usuario);
        assert_eq!(change.action, RoleAction::Remove);
        assert!(!board.has("bia@x.io", &Role::Usuario));
        assert_eq!(
            serde_json::to_value(&change).unwrap(),
            serde_json::json!({"userEmail": "bia@x.io", "roleName": "Usuario", "action": "remove"})
        );
    }

    #[test]
    fn test_revert_restores_state() {
        let original = RoleBoard::from_users(&users());
        let mut board = original.clone();
        let change = board.toggle("ana@x.io", Role::Admin);
        board.revert(&change);
        assert_eq!(board, original);
    }

    #[test]
    fn test_filter_and_paginate() {
        let all = users();
        assert_eq!(filter_by_role(&all, Some(&Role::Usuario)).len(), 2);
        assert_eq!(filter_by_role(&all, None).len(), 3);

        assert_eq!(paginate(&all, 0, 2).len(), 2);
        assert_eq!(paginate(&all, 1, 2)[0].email, "caio@x.io");
        assert!(paginate(&all, 5, 2).is_empty());
        assert!(paginate(&all, 0, 0).is_empty());
    }

    #[test]
    fn test_block_payload() {
        assert_eq!(
            serde_json::to_value(BlockRequest::for_minutes("u-1", DEFAULT_LOCKOUT_MINUTES)).unwrap(),
            serde_json::json!({"userId": "u-1", "isPermanent": false, "lockoutDurationMinutes": 60})
        );
        assert!(BlockRequest::permanent("u-1").is_permanent);
    }

    fn role_strategy() -> impl Strategy<Value = Role> {
        prop_oneof![Just(Role::Admin), Just(Role::Atendente), Just(Role::Usuario)]
    }

    proptest! {
        #[test]
        fn prop_double_toggle_is_identity(
            held in proptest::collection::btree_set(role_strategy(), 0..3),
            role in role_strategy(),
        ) {
            let user = User::new("x@x.io", held.into_iter().collect());
            let original = RoleBoard::from_users(std::slice::from_ref(&user));
            let mut board = original.clone();
            let first = board.toggle("x@x.io", role.clone());
            let second = board.toggle("x@x.io", role);
            prop_assert_eq!(second.action, first.action.inverse());
            prop_assert_eq!(board, original);
        }
    }
}

use helpdesk_domain::{BlockRequest, Role, RoleBoard, RoleChange, User};
use reqwest::Method;

use crate::types::UnblockRequest;
use crate::{Client, Result};

/// User administration under `/identity`.
pub struct UsersService {
    client: Client,
}

impl UsersService {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// All users, or those holding `role`.
    pub async fn list(&self, role: Option<&Role>) -> Result<Vec<User>> {
        let params: Vec<(&str, String)> = role.map(|r| ("role", r.to_string())).into_iter().collect();
        self.client.get("/identity/users", &params).await
    }

    /// Transfer targets.
    pub async fn attendants(&self) -> Result<Vec<User>> {
        self.list(Some(&Role::Atendente)).await
    }

    pub async fn assign_role(&self, change: &RoleChange) -> Result<()> {
        tracing::info!(user = %change.user_email, role = %change.role_name, action = ?change.action, "changing role");
        self.client
            .execute(Method::POST, "/identity/roles/assign", Some(change), &[])
            .await
    }

    /// Toggle `role` on `board` and send the change. A failed request
    /// reverts the board before the error is returned.
    pub async fn toggle_role(&self, board: &mut RoleBoard, email: &str, role: Role) -> Result<RoleChange> {
        let change = board.toggle(email, role);
        match self.assign_role(&change).await {
            Ok(()) => Ok(change),
            Err(err) => {
                board.revert(&change);
                Err(err)
            }
        }
    }

    pub async fn block(&self, request: &BlockRequest) -> Result<()> {
        tracing::info!(user = %request.user_id, permanent = request.is_permanent, minutes = request.lockout_duration_minutes, "blocking user");
        self.client
            .execute(Method::POST, "/identity/block-user", Some(request), &[])
            .await
    }

    pub async fn unblock(&self, user_id: &str) -> Result<()> {
        tracing::info!(user = user_id, "unblocking user");
        self.client
            .execute(Method::POST, "/identity/unblock-user", Some(&UnblockRequest { user_id }), &[])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn service(server: &MockServer) -> UsersService {
        Client::new(format!("{}/v1", server.uri())).unwrap().users()
    }

    #[tokio::test]
    async fn test_attendants_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/identity/users"))
            .and(query_param("role", "Atendente"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"email": "bia@x.io", "roles": ["Atendente"]}
            ])))
            .mount(&server)
            .await;

        let attendants = service(&server).await.attendants().await.unwrap();
        assert_eq!(attendants.len(), 1);
        assert_eq!(attendants[0].email, "bia@x.io");
    }

    #[tokio::test]
    async fn test_failed_toggle_reverts_board() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/identity/roles/assign"))
            .and(body_json(json!({"userEmail": "bia@x.io", "roleName": "Atendente", "action": "remove"})))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": "ROLE_REMOVAL_FORBIDDEN",
                "message": "O usuário possui tickets atribuídos"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let users = vec![User::new("bia@x.io", vec![Role::Atendente])];
        let mut board = RoleBoard::from_users(&users);
        let original = board.clone();

        let err = service(&server)
            .await
            .toggle_role(&mut board, "bia@x.io", Role::Atendente)
            .await
            .unwrap_err();
        assert!(err.is_role_removal_forbidden());
        assert_eq!(board, original);
    }

    #[tokio::test]
    async fn test_toggle_keeps_board_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/identity/roles/assign"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let mut board = RoleBoard::from_users(&[User::new("caio@x.io", vec![])]);
        let change = service(&server)
            .await
            .toggle_role(&mut board, "caio@x.io", Role::Admin)
            .await
            .unwrap();
        assert_eq!(change.action, helpdesk_domain::RoleAction::Add);
        assert!(board.has("caio@x.io", &Role::Admin));
    }

    #[tokio::test]
    async fn test_block_and_unblock_payloads() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/identity/block-user"))
            .and(body_json(json!({"userId": "u-7", "isPermanent": true, "lockoutDurationMinutes": 0})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/identity/unblock-user"))
            .and(body_json(json!({"userId": "u-7"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let users = service(&server).await;
        users.block(&BlockRequest::permanent("u-7")).await.unwrap();
        users.unblock("u-7").await.unwrap();
    }
}

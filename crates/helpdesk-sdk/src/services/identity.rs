use helpdesk_domain::{Registration, User};
use reqwest::Method;
use serde_json::json;

use crate::{Client, ForgotPassword, LoginRequest, ResetPassword, Result};

/// Authentication and account endpoints under `/identity`.
pub struct IdentityService {
    client: Client,
}

impl IdentityService {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Cookie login. The session cookie lands in the client's jar.
    pub async fn login(&self, request: &LoginRequest) -> Result<()> {
        self.client
            .execute(
                Method::POST,
                "/identity/login",
                Some(request),
                &[("useCookies", "true".to_string())],
            )
            .await
    }

    pub async fn logout(&self) -> Result<()> {
        self.client
            .execute(Method::POST, "/identity/logout", Some(&json!({})), &[])
            .await
    }

    /// The user behind the current session cookie.
    pub async fn me(&self) -> Result<User> {
        self.client.get("/identity/me", &[]).await
    }

    pub async fn register(&self, registration: &Registration) -> Result<()> {
        self.client
            .execute(Method::POST, "/identity/register", Some(registration), &[])
            .await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        let body = ForgotPassword {
            email: email.trim().to_string(),
        };
        self.client
            .execute(Method::POST, "/identity/forgot-password", Some(&body), &[])
            .await
    }

    pub async fn reset_password(&self, request: &ResetPassword) -> Result<()> {
        self.client
            .execute(Method::POST, "/identity/reset-password", Some(request), &[])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client(server: &MockServer) -> Client {
        Client::new(format!("{}/v1", server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_login_uses_cookie_mode() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/identity/login"))
            .and(query_param("useCookies", "true"))
            .and(body_json(json!({"email": "ana@x.io", "password": "secret1"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let request = LoginRequest {
            email: "ana@x.io".into(),
            password: "secret1".into(),
        };
        client(&server).await.identity().login(&request).await.unwrap();
    }

    #[tokio::test]
    async fn test_register_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/identity/register"))
            .and(body_json(json!({"nome": "Ana", "email": "ana@x.io", "celular": "", "password": "secret1"})))
            .respond_with(ResponseTemplate::new(200).set_body_string("User registered"))
            .expect(1)
            .mount(&server)
            .await;

        let reg = Registration::new("Ana", "ana@x.io", "", "secret1", "secret1").unwrap();
        client(&server).await.identity().register(&reg).await.unwrap();
    }

    #[tokio::test]
    async fn test_me_unwraps_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/identity/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"email": "ana@x.io", "roles": ["Atendente"]}
            })))
            .mount(&server)
            .await;

        let me = client(&server).await.identity().me().await.unwrap();
        assert!(me.is_attendant());
    }

    #[tokio::test]
    async fn test_forgot_password_trims_email() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/identity/forgot-password"))
            .and(body_json(json!({"email": "ana@x.io"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client(&server).await.identity().forgot_password(" ana@x.io ").await.unwrap();
    }
}

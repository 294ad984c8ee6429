//! Helpdesk Rust SDK
//!
//! Async client for the helpdesk REST API.
//!
//! # Example
//!
//! ```rust,no_run
//! use helpdesk_sdk::{Client, Session, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let session = Session::new(Client::new("http://localhost:5228/v1")?);
//!     let me = session.login("ana@example.com", "secret1").await?;
//!
//!     let tickets = session.client().tickets().list(&me, Default::default()).await?;
//!     println!("{} tickets", tickets.data.len());
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::{header, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use url::Url;

pub use error::{Error, ErrorCode};
pub use scope::{Canceller, ViewScope};
pub use session::{Session, SessionStore};
pub use types::*;

pub mod error;
pub mod scope;
pub mod services;
pub mod session;
pub mod types;

/// SDK version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:5228/v1";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Result type alias for helpdesk SDK operations
pub type Result<T> = std::result::Result<T, Error>;

// =============================================================================
// HTTP Client
// =============================================================================

/// Configuration for the helpdesk client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Helpdesk API client. Cheap to clone; clones share the cookie jar.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    base_url: Url,
    http: reqwest::Client,
    jar: Arc<Jar>,
}

impl Client {
    /// Create a new client for the API at `base_url`
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig {
            base_url: base_url.into(),
            ..Default::default()
        })
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!("not a base URL: {}", config.base_url)));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let jar = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(format!("helpdesk-rust/{}", VERSION))
            .cookie_provider(Arc::clone(&jar))
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner { base_url, http, jar }),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Get the identity service
    pub fn identity(&self) -> services::IdentityService {
        services::IdentityService::new(self.clone())
    }

    /// Get the user management service
    pub fn users(&self) -> services::UsersService {
        services::UsersService::new(self.clone())
    }

    /// Get the category service
    pub fn categories(&self) -> services::CategoriesService {
        services::CategoriesService::new(self.clone())
    }

    /// Get the subcategory service
    pub fn subcategories(&self) -> services::SubcategoriesService {
        services::SubcategoriesService::new(self.clone())
    }

    /// Get the ticket service
    pub fn tickets(&self) -> services::TicketsService {
        services::TicketsService::new(self.clone())
    }

    /// Cookies the jar would send to the API, as a `Cookie` header value.
    pub fn session_cookies(&self) -> Option<String> {
        self.inner
            .jar
            .cookies(&self.inner.base_url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
            .filter(|value| !value.is_empty())
    }

    /// Load cookies previously returned by [`Client::session_cookies`].
    pub fn restore_cookies(&self, cookies: &str) {
        for pair in cookies.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            self.inner.jar.add_cookie_str(pair, &self.inner.base_url);
        }
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.inner.base_url.as_str().trim_end_matches('/'), path))?;
        if !params.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Make a GET request
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T> {
        let body = self.send(Method::GET, path, None::<&()>, params).await?;
        decode(&body)
    }

    /// GET without envelope handling, for paged listings.
    pub(crate) async fn get_raw(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        let body = self.send(Method::GET, path, None::<&()>, params).await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&body)?)
    }

    /// Make a POST request
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let body = self.send(Method::POST, path, Some(body), &[]).await?;
        decode(&body)
    }

    /// POST whose success body may be empty or not worth failing over.
    pub(crate) async fn post_optional<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>> {
        let body = self.send(Method::POST, path, Some(body), &[]).await?;
        Ok(decode::<Option<T>>(&body).ok().flatten())
    }

    /// Make a PUT request, discarding the response body
    pub(crate) async fn put<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        self.execute(Method::PUT, path, Some(body), &[]).await
    }

    /// Make a DELETE request
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.execute(Method::DELETE, path, None::<&()>, &[]).await
    }

    /// Send a request whose success body is ignored.
    pub(crate) async fn execute<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        params: &[(&str, String)],
    ) -> Result<()> {
        self.send(method, path, body, params).await.map(|_| ())
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        params: &[(&str, String)],
    ) -> Result<Vec<u8>> {
        let url = self.url(path, params)?;
        tracing::debug!(%method, %url, "sending request");

        let mut request = self.inner.http.request(method.clone(), url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        if status.is_success() {
            tracing::debug!(%method, path, status = status.as_u16(), "request succeeded");
            if status == StatusCode::NO_CONTENT {
                return Ok(Vec::new());
            }
            return Ok(body);
        }

        let error = Error::from_response(status, &body);
        tracing::warn!(%method, path, status = status.as_u16(), error = %error, "request failed");
        Err(error)
    }
}

/// Read a success body, unwrapping a `{data: ...}` envelope when present.
/// Empty bodies read as JSON `null`.
fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_str("null")?);
    }

    #[derive(Deserialize)]
    struct ApiResponse<T> {
        data: Option<T>,
    }

    // Try to parse with data wrapper first
    if let Ok(resp) = serde_json::from_slice::<ApiResponse<T>>(body) {
        if let Some(data) = resp.data {
            return Ok(data);
        }
    }

    // Fall back to parsing directly
    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdesk_domain::User;
    use wiremock::matchers::{header as header_is, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_create_client() {
        let client = Client::new("http://localhost:5228/v1/").unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:5228/v1");
        assert_eq!(
            client.url("/tickets", &[("pageNumber", "2".into())]).unwrap().as_str(),
            "http://localhost:5228/v1/tickets?pageNumber=2"
        );
        assert!(Client::new("not a url").is_err());
    }

    #[test]
    fn test_decode_envelope_and_raw() {
        let wrapped: Vec<i32> = decode(br#"{"data":[1,2]}"#).unwrap();
        let raw: Vec<i32> = decode(b"[1,2]").unwrap();
        assert_eq!(wrapped, raw);

        let user: User = decode(br#"{"email":"a@x.io","roles":["Admin"]}"#).unwrap();
        assert!(user.is_admin());

        let nothing: Option<User> = decode(b"").unwrap();
        assert!(nothing.is_none());
        assert!(decode::<User>(b"").is_err());
    }

    #[tokio::test]
    async fn test_get_sends_query_and_reads_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/tickets"))
            .and(query_param("pageNumber", "1"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({"message": "Acesso negado"})))
            .mount(&server)
            .await;

        let client = Client::new(format!("{}/v1", server.uri())).unwrap();
        let err = client
            .get::<Value>("/tickets", &[("pageNumber", "1".into())])
            .await
            .unwrap_err();
        assert!(err.is_authorization_error());
        assert!(err.to_string().contains("Acesso negado"));
    }

    #[tokio::test]
    async fn test_cookies_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/identity/login"))
            .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "session=abc123; Path=/; HttpOnly"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/identity/me"))
            .and(header_is("cookie", "session=abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"email": "a@x.io"})))
            .mount(&server)
            .await;

        let base = format!("{}/v1", server.uri());
        let first = Client::new(&base).unwrap();
        first
            .execute(Method::POST, "/identity/login", Some(&serde_json::json!({})), &[])
            .await
            .unwrap();
        let cookies = first.session_cookies().unwrap();
        assert_eq!(cookies, "session=abc123");

        let second = Client::new(&base).unwrap();
        assert!(second.session_cookies().is_none());
        second.restore_cookies(&cookies);
        let me: User = second.get("/identity/me", &[]).await.unwrap();
        assert_eq!(me.email, "a@x.io");
    }
}

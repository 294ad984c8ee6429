//! Authenticated session
//!
//! Holds the client and the process-wide "current user" slot. The slot is
//! filled on login or when a stored cookie still resolves at `/identity/me`,
//! and cleared on logout.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use helpdesk_domain::User;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::{Client, Error, LoginRequest, Result};

#[derive(Clone)]
pub struct Session {
    client: Client,
    current: Arc<RwLock<Option<User>>>,
    store: Option<SessionStore>,
}

impl Session {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            current: Arc::new(RwLock::new(None)),
            store: None,
        }
    }

    /// Persist the session cookie in `store` between runs.
    pub fn with_store(client: Client, store: SessionStore) -> Self {
        Self {
            store: Some(store),
            ..Self::new(client)
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn current_user(&self) -> Option<User> {
        self.current.read().clone()
    }

    pub fn require_user(&self) -> Result<User> {
        self.current_user().ok_or(Error::NotAuthenticated)
    }

    /// Restore a stored cookie and ask the API who it belongs to.
    /// Returns `None` when there is no stored session or it has expired.
    pub async fn resume(&self) -> Result<Option<User>> {
        if let Some(store) = &self.store {
            match store.load(self.client.base_url().as_str())? {
                Some(cookies) => self.client.restore_cookies(&cookies),
                None => return Ok(None),
            }
        }

        match self.client.identity().me().await {
            Ok(user) => {
                tracing::debug!(email = %user.email, "session resumed");
                *self.current.write() = Some(user.clone());
                Ok(Some(user))
            }
            Err(err) if err.is_authentication_error() => {
                tracing::debug!("stored session is no longer valid");
                *self.current.write() = None;
                if let Some(store) = &self.store {
                    store.clear()?;
                }
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        self.client.identity().login(&request).await?;
        let user = self.client.identity().me().await?;
        tracing::info!(email = %user.email, role = %user.primary_role(), "logged in");

        *self.current.write() = Some(user.clone());
        if let (Some(store), Some(cookies)) = (&self.store, self.client.session_cookies()) {
            store.save(self.client.base_url().as_str(), &cookies)?;
        }
        Ok(user)
    }

    /// Clears the local session even when the server call fails; the server
    /// error is still returned.
    pub async fn logout(&self) -> Result<()> {
        let result = self.client.identity().logout().await;
        *self.current.write() = None;
        if let Some(store) = &self.store {
            store.clear()?;
        }
        result
    }
}

// =============================================================================
// Cookie persistence
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    api_url: String,
    cookies: String,
}

/// Session cookie file. Only read back for the API it was issued by.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self, api_url: &str) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let stored: StoredSession = match serde_json::from_str(&content) {
            Ok(stored) => stored,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "ignoring unreadable session file");
                return Ok(None);
            }
        };
        Ok((stored.api_url == api_url).then_some(stored.cookies))
    }

    pub fn save(&self, api_url: &str, cookies: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&StoredSession {
            api_url: api_url.to_string(),
            cookies: cookies.to_string(),
        })?;
        write_private(&self.path, content.as_bytes())?;
        tracing::debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(unix)]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(content)
}

#[cfg(not(unix))]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    fs::write(path, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_login(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/v1/identity/login"))
            .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "auth=tok1; Path=/"))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/identity/me"))
            .and(header("cookie", "auth=tok1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "email": "ana@x.io", "roles": ["Admin"]
            })))
            .with_priority(1)
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/identity/me"))
            .respond_with(ResponseTemplate::new(401))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/identity/logout"))
            .respond_with(ResponseTemplate::new(200))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_login_persists_and_resumes() {
        let server = MockServer::start().await;
        mock_login(&server).await;
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let base = format!("{}/v1", server.uri());

        let session = Session::with_store(Client::new(&base).unwrap(), store.clone());
        assert!(session.require_user().is_err());
        let user = session.login("ana@x.io", "secret1").await.unwrap();
        assert!(user.is_admin());
        assert_eq!(session.current_user(), Some(user.clone()));

        let later = Session::with_store(Client::new(&base).unwrap(), store.clone());
        assert_eq!(later.resume().await.unwrap(), Some(user));

        later.logout().await.unwrap();
        assert!(later.current_user().is_none());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_expired_cookie_resumes_as_anonymous() {
        let server = MockServer::start().await;
        mock_login(&server).await;
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let base = format!("{}/v1", server.uri());
        store.save(client_url(&base).as_str(), "auth=stale").unwrap();

        let session = Session::with_store(Client::new(&base).unwrap(), store.clone());
        assert_eq!(session.resume().await.unwrap(), None);
        assert!(!store.path().exists());
    }

    fn client_url(base: &str) -> url::Url {
        Client::new(base).unwrap().base_url().clone()
    }

    #[test]
    fn test_store_ignores_other_api() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested/session.json"));
        store.save("http://a/v1", "x=1").unwrap();
        assert_eq!(store.load("http://a/v1").unwrap().as_deref(), Some("x=1"));
        assert_eq!(store.load("http://b/v1").unwrap(), None);
        store.clear().unwrap();
        store.clear().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_store_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store.save("http://a/v1", "x=1").unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

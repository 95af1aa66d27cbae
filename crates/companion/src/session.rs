use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::{RequestError, RequestResult};

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Unix timestamp in seconds.
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// The stored session has not been read yet.
    Restoring,
    SignedOut,
    SignedIn(AuthSession),
}

impl SessionState {
    pub fn session(&self) -> Option<&AuthSession> {
        match self {
            Self::SignedIn(session) => Some(session),
            _ => None,
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.session().map(|session| session.access_token.as_str())
    }
}

/// Password authentication against the backend.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> RequestResult<AuthSession>;
    /// `None` when the account still has to be confirmed.
    async fn sign_up(&self, email: &str, password: &str) -> RequestResult<Option<AuthSession>>;
    async fn sign_out(&self, session: &AuthSession) -> RequestResult<()>;
}

/// Where the session survives restarts of the client.
#[async_trait]
pub trait TokenStorage: Send + Sync {
    async fn load(&self) -> RequestResult<Option<AuthSession>>;
    async fn store(&self, session: &AuthSession) -> RequestResult<()>;
    async fn clear(&self) -> RequestResult<()>;
}

/// Keeps the session as JSON in a file.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl TokenStorage for FileTokenStorage {
    async fn load(&self) -> RequestResult<Option<AuthSession>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(why) if why.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(why) => Err(why.into()),
        }
    }

    async fn store(&self, session: &AuthSession) -> RequestResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_vec(session)?).await?;
        Ok(())
    }

    async fn clear(&self) -> RequestResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Err(why) if why.kind() != std::io::ErrorKind::NotFound => Err(why.into()),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    session: Mutex<Option<AuthSession>>,
}

impl MemoryTokenStorage {
    fn slot(&self) -> RequestResult<std::sync::MutexGuard<'_, Option<AuthSession>>> {
        self.session
            .lock()
            .map_err(|why| RequestError::Other(why.to_string().into()))
    }
}

#[async_trait]
impl TokenStorage for MemoryTokenStorage {
    async fn load(&self) -> RequestResult<Option<AuthSession>> {
        Ok(self.slot()?.clone())
    }

    async fn store(&self, session: &AuthSession) -> RequestResult<()> {
        *self.slot()? = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> RequestResult<()> {
        *self.slot()? = None;
        Ok(())
    }
}

/// The process-wide authentication context. The state is immutable and
/// replaced as a whole on every change; consumers either read the current
/// value or subscribe to changes.
#[derive(Clone)]
pub struct SessionStore {
    auth: Arc<dyn AuthProvider>,
    storage: Arc<dyn TokenStorage>,
    state: Arc<watch::Sender<Arc<SessionState>>>,
}

impl SessionStore {
    pub fn new(auth: Arc<dyn AuthProvider>, storage: Arc<dyn TokenStorage>) -> Self {
        Self {
            auth,
            storage,
            state: Arc::new(watch::channel(Arc::new(SessionState::Restoring)).0),
        }
    }

    pub fn current(&self) -> Arc<SessionState> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<SessionState>> {
        self.state.subscribe()
    }

    fn publish(&self, state: SessionState) -> Arc<SessionState> {
        let state = Arc::new(state);
        self.state.send_replace(state.clone());
        state
    }

    /// Reads the stored session. Expired or unreadable sessions count as
    /// signed out.
    pub async fn restore(&self, now: i64) -> Arc<SessionState> {
        let state = match self.storage.load().await {
            Ok(Some(session)) if session.expires_at.map_or(true, |at| at > now) => {
                log::info!("restored session of user {}", session.user.id);
                SessionState::SignedIn(session)
            }
            Ok(Some(session)) => {
                log::info!("stored session of user {} expired", session.user.id);
                if let Err(why) = self.storage.clear().await {
                    log::warn!("could not clear expired session: {why}");
                }
                SessionState::SignedOut
            }
            Ok(None) => SessionState::SignedOut,
            Err(why) => {
                log::warn!("could not read stored session: {why}");
                SessionState::SignedOut
            }
        };
        self.publish(state)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> RequestResult<Arc<SessionState>> {
        let session = self.auth.sign_in(email, password).await?;
        self.storage.store(&session).await?;
        log::info!("signed in user {}", session.user.id);
        Ok(self.publish(SessionState::SignedIn(session)))
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> RequestResult<Arc<SessionState>> {
        match self.auth.sign_up(email, password).await? {
            Some(session) => {
                self.storage.store(&session).await?;
                log::info!("signed up user {}", session.user.id);
                Ok(self.publish(SessionState::SignedIn(session)))
            }
            None => {
                log::info!("sign up of {email} awaits confirmation");
                Ok(self.current())
            }
        }
    }

    /// Signs out locally even if the backend call fails.
    pub async fn sign_out(&self) -> RequestResult<Arc<SessionState>> {
        let current = self.current();
        if let Some(session) = current.session() {
            if let Err(why) = self.auth.sign_out(session).await {
                log::warn!("backend sign out failed: {why}");
            }
        }
        self.storage.clear().await?;
        Ok(self.publish(SessionState::SignedOut))
    }

    pub fn require_user(&self) -> RequestResult<String> {
        self.current()
            .session()
            .map(|session| session.user.id.clone())
            .ok_or(RequestError::Unauthenticated)
    }
}

use async_trait::async_trait;
use companion::{
    session::{AuthProvider, AuthSession},
    RequestError, RequestResult,
};
use serde::Deserialize;

use crate::{
    client::{BackendClient, SignUpResponse, TokenResponse},
    ApiError,
};

/// Password auth against the backend's auth endpoints.
pub struct RestAuth {
    client: BackendClient,
}

impl RestAuth {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

impl From<TokenResponse> for AuthSession {
    fn from(token: TokenResponse) -> Self {
        let expires_at = token.expires_at.or_else(|| {
            token
                .expires_in
                .map(|secs| chrono::Utc::now().timestamp() + secs)
        });
        Self {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at,
            user: token.user,
        }
    }
}

#[derive(Deserialize)]
struct AuthErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
}

/// Rejected credentials carry a message meant for the user.
fn auth_error(error: ApiError) -> RequestError {
    match &error {
        ApiError::InvalidResponse {
            status_code,
            response: Some(text),
            ..
        } if status_code.is_client_error() => {
            let message = serde_json::from_str::<AuthErrorBody>(text)
                .ok()
                .and_then(|body| body.error_description.or(body.msg).or(body.message));
            match message {
                Some(message) => RequestError::Invalid(message),
                None => error.into(),
            }
        }
        _ => error.into(),
    }
}

#[async_trait]
impl AuthProvider for RestAuth {
    async fn sign_in(&self, email: &str, password: &str) -> RequestResult<AuthSession> {
        let token = self
            .client
            .sign_in(email, password)
            .await
            .map_err(auth_error)?;
        Ok(token.into())
    }

    async fn sign_up(&self, email: &str, password: &str) -> RequestResult<Option<AuthSession>> {
        match self.client.sign_up(email, password).await.map_err(auth_error)? {
            SignUpResponse::Session(token) => Ok(Some(token.into())),
            SignUpResponse::Pending(user) => {
                log::info!("user {} has to confirm their address", user.id);
                Ok(None)
            }
        }
    }

    async fn sign_out(&self, session: &AuthSession) -> RequestResult<()> {
        Ok(self.client.sign_out(&session.access_token).await?)
    }
}

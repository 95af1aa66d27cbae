use std::{env, sync::Arc, time::Duration};

use companion::session::{AuthUser, SessionState};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::sync::watch;

use crate::{query::Query, ApiError};

pub const URL_VAR: &str = "KARTING_BACKEND_URL";
pub const KEY_VAR: &str = "KARTING_BACKEND_KEY";
pub const TIMEOUT_VAR: &str = "KARTING_BACKEND_TIMEOUT_SECS";

/// Accept header asking for one object instead of an array.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendCredentials {
    pub url: String,
    /// The public (anon) key of the project.
    pub api_key: String,
    pub timeout_secs: Option<u64>,
}

impl BackendCredentials {
    pub fn from_env() -> Option<Self> {
        let url = env::var(URL_VAR).ok()?;
        let api_key = env::var(KEY_VAR).ok()?;
        let timeout_secs = env::var(TIMEOUT_VAR)
            .ok()
            .and_then(|value| value.trim().parse().ok());

        Some(Self {
            url: url.trim_end_matches('/').to_owned(),
            api_key,
            timeout_secs,
        })
    }
}

/// Session returned by the password and sign up endpoints.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<i64>,
    pub expires_in: Option<i64>,
    pub user: AuthUser,
}

/// Sign up answers with a session, or only with the user while the address
/// awaits confirmation.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum SignUpResponse {
    Session(TokenResponse),
    Pending(AuthUser),
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    credentials: BackendCredentials,
    session: Option<watch::Receiver<Arc<SessionState>>>,
}

impl BackendClient {
    pub fn new(credentials: &BackendCredentials) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = credentials.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            http: builder.build()?,
            credentials: credentials.clone(),
            session: None,
        })
    }

    /// Authorizes row reads with the signed in user's token.
    pub fn with_session(mut self, session: watch::Receiver<Arc<SessionState>>) -> Self {
        self.session = Some(session);
        self
    }

    fn bearer(&self) -> String {
        self.session
            .as_ref()
            .and_then(|session| session.borrow().access_token().map(str::to_owned))
            .unwrap_or_else(|| self.credentials.api_key.clone())
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.credentials.url, table)
    }

    fn auth_url(&self, endpoint: &str) -> String {
        format!("{}/auth/v1/{}", self.credentials.url, endpoint)
    }

    fn request(&self, method: reqwest::Method, url: &str, token: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.credentials.api_key)
            .bearer_auth(token)
    }

    /// Runs a read. Single-row queries answer with a one element list.
    pub async fn select<T: DeserializeOwned>(&self, query: &Query) -> Result<Vec<T>, ApiError> {
        log::debug!("select {query}");
        let url = self.rest_url(query.table_name());
        let mut request = self
            .request(reqwest::Method::GET, &url, &self.bearer())
            .query(&query.params());
        if query.is_single() {
            request = request.header("accept", SINGLE_OBJECT);
            let row = parse(request.send().await?, url).await?;
            Ok(vec![row])
        } else {
            parse(request.send().await?, url).await
        }
    }

    pub async fn select_one<T: DeserializeOwned>(&self, query: &Query) -> Result<T, ApiError> {
        let query = query.clone().single();
        self.select(&query)
            .await?
            .pop()
            .ok_or_else(|| ApiError::Other(format!("no row for {query}")))
    }

    /// Inserts a row and returns it as stored.
    pub async fn insert<B, T>(&self, table: &str, row: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        log::debug!("insert into {table}");
        let url = self.rest_url(table);
        let response = self
            .request(reqwest::Method::POST, &url, &self.bearer())
            .header("prefer", "return=representation")
            .header("accept", SINGLE_OBJECT)
            .json(row)
            .send()
            .await?;
        parse(response, url).await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let url = self.auth_url("token?grant_type=password");
        let response = self
            .request(reqwest::Method::POST, &url, &self.credentials.api_key)
            .json(&Credentials { email, password })
            .send()
            .await?;
        parse(response, url).await
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpResponse, ApiError> {
        let url = self.auth_url("signup");
        let response = self
            .request(reqwest::Method::POST, &url, &self.credentials.api_key)
            .json(&Credentials { email, password })
            .send()
            .await?;
        parse(response, url).await
    }

    pub async fn sign_out(&self, access_token: &str) -> Result<(), ApiError> {
        let url = self.auth_url("logout");
        let response = self
            .request(reqwest::Method::POST, &url, access_token)
            .send()
            .await?;
        match response.status() {
            status if status.is_success() => Ok(()),
            other => Err(invalid(other, url, response).await),
        }
    }
}

async fn invalid(status_code: reqwest::StatusCode, url: String, response: reqwest::Response) -> ApiError {
    ApiError::InvalidResponse {
        status_code,
        url,
        response: response.text().await.ok(),
    }
}

async fn parse<T: DeserializeOwned>(response: reqwest::Response, url: String) -> Result<T, ApiError> {
    match response.status() {
        status if status.is_success() => Ok(serde_json::from_str(&response.text().await?)?),
        other => Err(invalid(other, url, response).await),
    }
}

use std::{error, fmt, sync::Arc};

use companion::{repo::RepoError, RequestError};

pub mod auth;
pub mod client;
pub mod query;
pub mod repo;

/// PostgREST code for a single-row read that did not match exactly one row.
const SINGLE_ROW_CODE: &str = "PGRST116";
/// Detail distinguishing a miss from a read that matched several rows.
const NO_ROWS_DETAIL: &str = "contains 0 rows";

#[derive(Debug, Clone)]
pub enum ApiError {
    RequestError(Arc<reqwest::Error>),
    JsonError(Arc<serde_json::Error>),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
        response: Option<String>,
    },
    MissingSession,
    Other(String),
}

impl ApiError {
    fn is_no_rows(&self) -> bool {
        matches!(
            self,
            ApiError::InvalidResponse {
                status_code,
                response: Some(text),
                ..
            } if *status_code == reqwest::StatusCode::NOT_ACCEPTABLE
                && text.contains(SINGLE_ROW_CODE)
                && text.contains(NO_ROWS_DETAIL)
        )
    }

    fn is_unauthorized(&self) -> bool {
        match self {
            ApiError::MissingSession => true,
            ApiError::InvalidResponse { status_code, .. } => {
                *status_code == reqwest::StatusCode::UNAUTHORIZED
                    || *status_code == reqwest::StatusCode::FORBIDDEN
            }
            _ => false,
        }
    }
}

impl error::Error for ApiError {}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            ApiError::JsonError(e) => write!(f, "JSON parse error: {}", e),
            ApiError::InvalidResponse {
                status_code,
                url,
                response,
            } => match response {
                Some(text) => {
                    write!(f, "Invalid Response ({}) {}: {}", status_code, text, url)
                }
                None => write!(f, "Invalid Response ({}) {}", status_code, url),
            },
            ApiError::MissingSession => write!(f, "No signed in session."),
            ApiError::Other(e) => write!(f, "{e}"),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::RequestError(Arc::new(e))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::JsonError(Arc::new(e))
    }
}

impl From<ApiError> for RepoError {
    fn from(e: ApiError) -> Self {
        if e.is_no_rows() {
            RepoError::NotFound
        } else if e.is_unauthorized() {
            RepoError::Unauthorized
        } else {
            RepoError::Other(Box::new(e))
        }
    }
}

impl From<ApiError> for RequestError {
    fn from(e: ApiError) -> Self {
        RepoError::from(e).into()
    }
}

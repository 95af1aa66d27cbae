use std::{error::Error, fmt};

use repo::RepoError;

pub mod circuits;
pub mod config;
pub mod home;
pub mod lap_times;
pub mod leaderboard;
pub mod profile;
pub mod races;
pub mod repo;
pub mod scope;
pub mod screen;
pub mod session;

#[derive(Debug)]
pub enum RequestError {
    NotFound,
    Unauthenticated,
    Invalid(String),
    Other(Box<dyn Error + Send + Sync>),
}

impl RequestError {
    pub fn other<T: Error + Send + Sync + 'static>(why: T) -> Self {
        Self::Other(Box::new(why))
    }

    /// Text shown on a screen whose loading failed.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound => "Nothing was found for this pilot yet.".to_owned(),
            Self::Unauthenticated => "Your session has expired. Please sign in again.".to_owned(),
            Self::Invalid(why) => why.clone(),
            Self::Other(_) => {
                "Could not load data from the league server. Pull to refresh.".to_owned()
            }
        }
    }
}

impl Error for RequestError {}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::Unauthenticated => write!(f, "not authenticated"),
            Self::Invalid(why) => write!(f, "invalid request: {why}"),
            Self::Other(why) => write!(f, "{why}"),
        }
    }
}

impl From<RepoError> for RequestError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound => Self::NotFound,
            RepoError::Unauthorized => Self::Unauthenticated,
            RepoError::Other(why) => Self::Other(why),
        }
    }
}

impl From<std::io::Error> for RequestError {
    fn from(value: std::io::Error) -> Self {
        Self::other(value)
    }
}

impl From<serde_json::Error> for RequestError {
    fn from(value: serde_json::Error) -> Self {
        Self::other(value)
    }
}

pub type RequestResult<O> = Result<O, RequestError>;

pub fn not_found_to_none<O>(result: RequestResult<O>) -> RequestResult<Option<O>> {
    if let Err(RequestError::NotFound) = result {
        Ok(None)
    } else {
        result.map(Some)
    }
}

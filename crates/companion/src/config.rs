use std::env;

use model::session::Session;
use utility::id::Id;

use crate::{RequestError, RequestResult};

pub const SCORED_SESSIONS_VAR: &str = "KARTING_SCORED_SESSIONS";
pub const RECENT_RESULTS_VAR: &str = "KARTING_RECENT_RESULTS";

#[derive(Debug, Clone, PartialEq)]
pub struct CompanionConfig {
    /// The league's scored race sessions, plotted in the position chart.
    pub scored_sessions: Vec<Id<Session>>,
    /// How many results the home screen lists.
    pub recent_results: usize,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            scored_sessions: vec![Id::new(1), Id::new(2)],
            recent_results: 5,
        }
    }
}

impl CompanionConfig {
    pub fn from_env() -> RequestResult<Self> {
        Self::from_vars(
            env::var(SCORED_SESSIONS_VAR).ok().as_deref(),
            env::var(RECENT_RESULTS_VAR).ok().as_deref(),
        )
    }

    fn from_vars(scored_sessions: Option<&str>, recent_results: Option<&str>) -> RequestResult<Self> {
        let mut config = Self::default();
        if let Some(value) = scored_sessions {
            config.scored_sessions = value
                .split(',')
                .filter(|part| !part.trim().is_empty())
                .map(|part| {
                    part.parse::<Id<Session>>().map_err(|_| {
                        RequestError::Invalid(format!(
                            "{SCORED_SESSIONS_VAR}: '{part}' is not a session id"
                        ))
                    })
                })
                .collect::<RequestResult<Vec<_>>>()?;
        }
        if let Some(value) = recent_results {
            config.recent_results = value.trim().parse().map_err(|_| {
                RequestError::Invalid(format!("{RECENT_RESULTS_VAR}: '{value}' is not a count"))
            })?;
        }
        Ok(config)
    }
}

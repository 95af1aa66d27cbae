use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::{
    pilot::Pilot,
    race::Race,
    session::{Session, SessionKind},
    RowId, WithId,
};

/// One pilot's outcome in one session of one race.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
    pub race_id: Id<Race>,
    pub pilot_id: Id<Pilot>,
    pub session_id: Option<Id<Session>>,
    pub race_position: Option<i32>,
    pub points: Option<f64>,
    pub best_lap: Option<String>,
}

impl HasId for RaceResult {
    type IdType = RowId;
}

impl RaceResult {
    /// Absent points count as zero.
    pub fn points_or_zero(&self) -> f64 {
        self.points.unwrap_or(0.0)
    }
}

/// The columns of a race that are pulled in by nested expansion.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceSummary {
    pub id: Id<Race>,
    pub name: Option<String>,
    #[serde(with = "utility::date::lenient")]
    pub date: NaiveDate,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: Option<Id<Session>>,
    pub name: Option<String>,
    pub session_type: Option<String>,
}

impl SessionSummary {
    pub fn kind(&self) -> Option<SessionKind> {
        SessionKind::classify(self.session_type.as_deref(), self.name.as_deref())
    }
}

/// A result row with its race and session expanded. Either side is `None`
/// when the reference could not be resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultWithRace {
    #[serde(flatten)]
    pub result: WithId<RaceResult>,
    #[serde(rename = "races", default)]
    pub race: Option<RaceSummary>,
    #[serde(rename = "sessions", default)]
    pub session: Option<SessionSummary>,
}

impl ResultWithRace {
    pub fn session_kind(&self) -> Option<SessionKind> {
        self.session.as_ref().and_then(SessionSummary::kind)
    }

    pub fn session_name(&self) -> Option<&str> {
        self.session.as_ref().and_then(|session| session.name.as_deref())
    }
}

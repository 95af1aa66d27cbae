use std::{error, fmt, result};

use async_trait::async_trait;
use chrono::NaiveDate;
use model::{
    circuit::Circuit,
    lap_time::LapTime,
    pilot::Pilot,
    race::Race,
    result::ResultWithRace,
    season::{League, PilotTeamSeason, Season},
    session::Session,
    team::Team,
    WithId,
};
use utility::id::Id;

#[cfg(test)]
pub(crate) mod memory;

#[derive(Debug)]
pub enum RepoError {
    NotFound,
    Unauthorized,
    Other(Box<dyn error::Error + Send + Sync>),
}

impl error::Error for RepoError {}

impl fmt::Display for RepoError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "row not found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Other(why) => write!(f, "{why}"),
        }
    }
}

pub type Result<T> = result::Result<T, RepoError>;

/// Read access to the league backend, plus the single write the client
/// performs. Every screen talks to the backend through this trait only.
///
/// Methods taking a league set return an empty list for an empty set.
#[async_trait]
pub trait LeagueRepo: Send + Sync {
    /// The pilot owned by an auth user. Exactly one row is expected.
    async fn pilot_by_user(&self, user_id: &str) -> Result<WithId<Pilot>>;
    async fn pilots(&self) -> Result<Vec<WithId<Pilot>>>;
    async fn teams(&self) -> Result<Vec<WithId<Team>>>;

    async fn seasons(&self) -> Result<Vec<WithId<Season>>>;
    async fn leagues(&self, ids: &[Id<League>]) -> Result<Vec<WithId<League>>>;
    async fn memberships_of_pilot(
        &self,
        pilot: Id<Pilot>,
    ) -> Result<Vec<WithId<PilotTeamSeason>>>;
    async fn memberships_of_season(
        &self,
        season: Id<Season>,
    ) -> Result<Vec<WithId<PilotTeamSeason>>>;

    async fn circuits(&self) -> Result<Vec<WithId<Circuit>>>;
    async fn circuit(&self, id: Id<Circuit>) -> Result<WithId<Circuit>>;

    /// Races of the league set, oldest first.
    async fn races(&self, leagues: &[Id<League>]) -> Result<Vec<WithId<Race>>>;
    async fn race(&self, id: Id<Race>) -> Result<WithId<Race>>;
    /// The first race of the league set on or after `from`.
    async fn next_race(
        &self,
        leagues: &[Id<League>],
        from: NaiveDate,
    ) -> Result<Option<WithId<Race>>>;

    /// Results of a pilot within the league set, with race and session
    /// expanded, ordered by race date. `sessions` narrows to those sessions.
    async fn pilot_results(
        &self,
        pilot: Id<Pilot>,
        leagues: &[Id<League>],
        sessions: Option<&[Id<Session>]>,
    ) -> Result<Vec<ResultWithRace>>;
    /// All results within the league set with the race expanded, ordered by
    /// race date.
    async fn league_results(&self, leagues: &[Id<League>]) -> Result<Vec<ResultWithRace>>;
    /// All results of one race with race and session expanded.
    async fn race_results(&self, race: Id<Race>) -> Result<Vec<ResultWithRace>>;

    async fn lap_times(
        &self,
        pilot: Id<Pilot>,
        race: Id<Race>,
    ) -> Result<Vec<WithId<LapTime>>>;
    async fn insert_lap_time(&self, lap: &LapTime) -> Result<WithId<LapTime>>;
}

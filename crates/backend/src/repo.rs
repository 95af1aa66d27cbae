use async_trait::async_trait;
use chrono::NaiveDate;
use companion::repo::{LeagueRepo, Result};
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

use crate::{
    client::BackendClient,
    query::{Order, Query},
};

const PILOTS: &str = "pilots";
const TEAMS: &str = "teams";
const SEASONS: &str = "seasons";
const LEAGUES: &str = "leagues";
const MEMBERSHIPS: &str = "pilot_team_season";
const CIRCUITS: &str = "circuits";
const RACES: &str = "races";
const RESULTS: &str = "race_results";
const LAP_TIMES: &str = "lap_times";

/// Results with race and session expanded. The race join is inner so
/// filters on its league apply to the result rows.
const RESULTS_WITH_RACE: &str =
    "*,races!inner(id,name,date,league_id),sessions(*)";

/// `LeagueRepo` over the REST row store.
pub struct RestRepo {
    client: BackendClient,
}

impl RestRepo {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    async fn all<T>(&self, query: Query) -> Result<Vec<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        Ok(self.client.select(&query).await?)
    }

    async fn one<T>(&self, query: Query) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        Ok(self.client.select_one(&query).await?)
    }

    fn results_query(leagues: &[Id<League>]) -> Query {
        Query::table(RESULTS)
            .select(RESULTS_WITH_RACE)
            .is_in("races.league_id", leagues)
            .order_embedded(RACES, "date", Order::Asc)
            .order("race_id", Order::Asc)
            .order("id", Order::Asc)
    }
}

#[async_trait]
impl LeagueRepo for RestRepo {
    async fn pilot_by_user(&self, user_id: &str) -> Result<WithId<Pilot>> {
        self.one(Query::table(PILOTS).eq("user_id", user_id)).await
    }

    async fn pilots(&self) -> Result<Vec<WithId<Pilot>>> {
        self.all(Query::table(PILOTS).order("id", Order::Asc)).await
    }

    async fn teams(&self) -> Result<Vec<WithId<Team>>> {
        self.all(Query::table(TEAMS).order("id", Order::Asc)).await
    }

    async fn seasons(&self) -> Result<Vec<WithId<Season>>> {
        self.all(Query::table(SEASONS).order("start_date", Order::Asc))
            .await
    }

    async fn leagues(&self, ids: &[Id<League>]) -> Result<Vec<WithId<League>>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.all(Query::table(LEAGUES).is_in("id", ids)).await
    }

    async fn memberships_of_pilot(
        &self,
        pilot: Id<Pilot>,
    ) -> Result<Vec<WithId<PilotTeamSeason>>> {
        self.all(Query::table(MEMBERSHIPS).eq("pilot_id", pilot))
            .await
    }

    async fn memberships_of_season(
        &self,
        season: Id<Season>,
    ) -> Result<Vec<WithId<PilotTeamSeason>>> {
        self.all(Query::table(MEMBERSHIPS).eq("season_id", season))
            .await
    }

    async fn circuits(&self) -> Result<Vec<WithId<Circuit>>> {
        self.all(Query::table(CIRCUITS).order("name", Order::Asc))
            .await
    }

    async fn circuit(&self, id: Id<Circuit>) -> Result<WithId<Circuit>> {
        self.one(Query::table(CIRCUITS).eq("id", id)).await
    }

    async fn races(&self, leagues: &[Id<League>]) -> Result<Vec<WithId<Race>>> {
        if leagues.is_empty() {
            return Ok(Vec::new());
        }
        self.all(
            Query::table(RACES)
                .is_in("league_id", leagues)
                .order("date", Order::Asc)
                .order("id", Order::Asc),
        )
        .await
    }

    async fn race(&self, id: Id<Race>) -> Result<WithId<Race>> {
        self.one(Query::table(RACES).eq("id", id)).await
    }

    async fn next_race(
        &self,
        leagues: &[Id<League>],
        from: NaiveDate,
    ) -> Result<Option<WithId<Race>>> {
        if leagues.is_empty() {
            return Ok(None);
        }
        let races: Vec<WithId<Race>> = self
            .all(
                Query::table(RACES)
                    .is_in("league_id", leagues)
                    .gte("date", from.format("%Y-%m-%d"))
                    .order("date", Order::Asc)
                    .order("id", Order::Asc)
                    .limit(1),
            )
            .await?;
        Ok(races.into_iter().next())
    }

    async fn pilot_results(
        &self,
        pilot: Id<Pilot>,
        leagues: &[Id<League>],
        sessions: Option<&[Id<Session>]>,
    ) -> Result<Vec<ResultWithRace>> {
        if leagues.is_empty() || sessions.is_some_and(<[_]>::is_empty) {
            return Ok(Vec::new());
        }
        let mut query = Self::results_query(leagues).eq("pilot_id", pilot);
        if let Some(sessions) = sessions {
            query = query.is_in("session_id", sessions);
        }
        self.all(query).await
    }

    async fn league_results(&self, leagues: &[Id<League>]) -> Result<Vec<ResultWithRace>> {
        if leagues.is_empty() {
            return Ok(Vec::new());
        }
        self.all(Self::results_query(leagues)).await
    }

    async fn race_results(&self, race: Id<Race>) -> Result<Vec<ResultWithRace>> {
        self.all(
            Query::table(RESULTS)
                .select(RESULTS_WITH_RACE)
                .eq("race_id", race)
                .order("session_id", Order::Asc)
                .order("race_position", Order::Asc),
        )
        .await
    }

    async fn lap_times(
        &self,
        pilot: Id<Pilot>,
        race: Id<Race>,
    ) -> Result<Vec<WithId<LapTime>>> {
        self.all(
            Query::table(LAP_TIMES)
                .eq("pilot_id", pilot)
                .eq("race_id", race)
                .order("lap_number", Order::Asc),
        )
        .await
    }

    async fn insert_lap_time(&self, lap: &LapTime) -> Result<WithId<LapTime>> {
        Ok(self.client.insert(LAP_TIMES, lap).await?)
    }
}

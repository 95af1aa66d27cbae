use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use model::{
    circuit::Circuit,
    lap_time::LapTime,
    pilot::Pilot,
    race::Race,
    result::{RaceResult, RaceSummary, ResultWithRace, SessionSummary},
    season::{League, PilotTeamSeason, Season},
    session::Session,
    team::Team,
    ExampleData, RowId, WithId,
};
use utility::id::Id;

use super::{LeagueRepo, RepoError, Result};

/// In-memory stand-in for the backend, joining rows the way nested
/// expansion does.
#[derive(Debug, Default)]
pub(crate) struct MemoryRepo {
    pub pilots: Vec<WithId<Pilot>>,
    pub teams: Vec<WithId<Team>>,
    pub seasons: Vec<WithId<Season>>,
    pub leagues: Vec<WithId<League>>,
    pub memberships: Vec<WithId<PilotTeamSeason>>,
    pub circuits: Vec<WithId<Circuit>>,
    pub races: Vec<WithId<Race>>,
    pub sessions: Vec<WithId<Session>>,
    pub results: Vec<WithId<RaceResult>>,
    pub lap_times: Mutex<Vec<WithId<LapTime>>>,
    pub unavailable: bool,
}

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

impl MemoryRepo {
    /// Two seasons. The active one (id 1, league 1) has two raced events and
    /// one upcoming; sessions 2 and 3 are the scored races.
    pub fn league_fixture() -> Self {
        let mut repo = Self::default();

        repo.teams = vec![
            WithId::new(Id::new(1), Team::example_data()),
            WithId::new(
                Id::new(2),
                Team {
                    name: "Kart Sur Racing".to_owned(),
                    logo_url: None,
                },
            ),
        ];
        repo.pilots = vec![
            pilot(1, "Lucía Ortega", 27, 2, "user-1"),
            pilot(2, "Marc Vidal", 4, 1, "user-2"),
            pilot(3, "Iker Ramos", 11, 2, "user-3"),
        ];
        repo.seasons = vec![
            WithId::new(
                Id::new(0),
                Season {
                    name: "Temporada 2023".to_owned(),
                    is_active: false,
                    start_date: Some(date(2023, 3, 1)),
                    end_date: Some(date(2023, 11, 30)),
                },
            ),
            WithId::new(
                Id::new(1),
                Season {
                    name: "Temporada 2024".to_owned(),
                    is_active: true,
                    start_date: Some(date(2024, 3, 1)),
                    end_date: Some(date(2024, 11, 30)),
                },
            ),
        ];
        repo.leagues = vec![
            WithId::new(Id::new(1), League { name: "Liga 2024".to_owned() }),
            WithId::new(Id::new(2), League { name: "Liga 2023".to_owned() }),
        ];
        repo.memberships = vec![
            membership(1, 1, 1, 1, 1),
            membership(2, 2, 1, 1, 1),
            membership(3, 3, 2, 1, 1),
            membership(4, 1, 2, 0, 2),
        ];
        repo.circuits = vec![WithId::new(Id::new(1), Circuit::example_data())];
        repo.sessions = vec![
            session(1, "Clasificación"),
            session(2, "Carrera 1"),
            session(3, "Carrera 2"),
        ];
        repo.races = vec![
            race(0, "GP Apertura 2023", date(2023, 6, 1), 2),
            race(1, "GP Chiva", date(2024, 4, 13), 1),
            race(2, "GP Cheste", date(2024, 5, 4), 1),
            race(3, "GP Otoño", date(2024, 9, 21), 1),
        ];

        let rows: &[(RowId, RowId, RowId, Option<i32>, Option<f64>)] = &[
            // race 1
            (1, 1, 1, Some(1), None),
            (1, 1, 2, Some(2), Some(18.0)),
            (1, 1, 3, Some(1), Some(25.0)),
            (1, 2, 1, Some(2), None),
            (1, 2, 2, Some(1), Some(25.0)),
            (1, 2, 3, Some(3), Some(15.0)),
            (1, 3, 2, Some(3), Some(15.0)),
            (1, 3, 3, Some(2), Some(18.0)),
            // race 2
            (2, 1, 2, Some(3), Some(15.0)),
            (2, 1, 3, Some(4), Some(12.0)),
            (2, 2, 2, Some(1), Some(25.0)),
            (2, 2, 3, Some(1), Some(25.0)),
            (2, 3, 2, Some(2), Some(18.0)),
            (2, 3, 3, Some(2), Some(18.0)),
            // last season
            (0, 1, 2, Some(1), Some(25.0)),
        ];
        repo.results = rows
            .iter()
            .enumerate()
            .map(|(index, (race, pilot, session, position, points))| {
                WithId::new(
                    Id::new(index as RowId + 1),
                    RaceResult {
                        race_id: Id::new(*race),
                        pilot_id: Id::new(*pilot),
                        session_id: Some(Id::new(*session)),
                        race_position: *position,
                        points: *points,
                        best_lap: None,
                    },
                )
            })
            .collect();

        repo.lap_times = Mutex::new(
            [(1, "0:54.210"), (2, "0:53.871"), (3, "0:54.002")]
                .iter()
                .map(|(lap, time)| {
                    WithId::new(
                        Id::new(*lap as RowId),
                        LapTime {
                            race_id: Id::new(1),
                            pilot_id: Id::new(1),
                            session_id: Some(Id::new(2)),
                            lap_number: *lap,
                            time: (*time).to_owned(),
                        },
                    )
                })
                .collect(),
        );

        repo
    }

    fn check(&self) -> Result<()> {
        if self.unavailable {
            Err(RepoError::Other("backend unavailable".into()))
        } else {
            Ok(())
        }
    }

    fn join(&self, result: &WithId<RaceResult>) -> ResultWithRace {
        let race = self
            .races
            .iter()
            .find(|race| race.id == result.content.race_id)
            .map(|race| RaceSummary {
                id: race.id,
                name: Some(race.content.name.clone()),
                date: race.content.date,
            });
        let session = result.content.session_id.and_then(|session_id| {
            self.sessions
                .iter()
                .find(|session| session.id == session_id)
                .map(|session| SessionSummary {
                    id: Some(session.id),
                    name: Some(session.content.name.clone()),
                    session_type: session.content.session_type.clone(),
                })
        });
        ResultWithRace {
            result: result.clone(),
            race,
            session,
        }
    }

    fn in_leagues(&self, race: Id<Race>, leagues: &[Id<League>]) -> bool {
        self.races
            .iter()
            .any(|row| row.id == race && leagues.contains(&row.content.league_id))
    }

    fn by_race_date(mut rows: Vec<ResultWithRace>) -> Vec<ResultWithRace> {
        rows.sort_by_key(|row| row.race.as_ref().map(|race| (race.date, race.id)));
        rows
    }
}

fn pilot(id: RowId, name: &str, number: i32, team: RowId, user: &str) -> WithId<Pilot> {
    WithId::new(
        Id::new(id),
        Pilot {
            name: name.to_owned(),
            number: Some(number),
            team_id: Some(Id::new(team)),
            user_id: Some(user.to_owned()),
            avatar_url: None,
        },
    )
}

fn membership(
    id: RowId,
    pilot: RowId,
    team: RowId,
    season: RowId,
    league: RowId,
) -> WithId<PilotTeamSeason> {
    WithId::new(
        Id::new(id),
        PilotTeamSeason {
            pilot_id: Id::new(pilot),
            team_id: Some(Id::new(team)),
            season_id: Id::new(season),
            league_id: Id::new(league),
            license_points: Some(12 - id as i32),
            is_wildcard: false,
        },
    )
}

fn session(id: RowId, name: &str) -> WithId<Session> {
    WithId::new(
        Id::new(id),
        Session {
            name: name.to_owned(),
            session_type: None,
        },
    )
}

fn race(id: RowId, name: &str, date: NaiveDate, league: RowId) -> WithId<Race> {
    WithId::new(
        Id::new(id),
        Race {
            name: name.to_owned(),
            date,
            circuit_id: Some(Id::new(1)),
            league_id: Id::new(league),
        },
    )
}

fn single<T: Clone>(rows: &[T], matches: impl Fn(&T) -> bool) -> Result<T> {
    rows.iter().find(|row| matches(row)).cloned().ok_or(RepoError::NotFound)
}

#[async_trait]
impl LeagueRepo for MemoryRepo {
    async fn pilot_by_user(&self, user_id: &str) -> Result<WithId<Pilot>> {
        self.check()?;
        single(&self.pilots, |pilot| pilot.content.user_id.as_deref() == Some(user_id))
    }

    async fn pilots(&self) -> Result<Vec<WithId<Pilot>>> {
        self.check()?;
        Ok(self.pilots.clone())
    }

    async fn teams(&self) -> Result<Vec<WithId<Team>>> {
        self.check()?;
        Ok(self.teams.clone())
    }

    async fn seasons(&self) -> Result<Vec<WithId<Season>>> {
        self.check()?;
        Ok(self.seasons.clone())
    }

    async fn leagues(&self, ids: &[Id<League>]) -> Result<Vec<WithId<League>>> {
        self.check()?;
        Ok(self
            .leagues
            .iter()
            .filter(|league| ids.contains(&league.id))
            .cloned()
            .collect())
    }

    async fn memberships_of_pilot(
        &self,
        pilot: Id<Pilot>,
    ) -> Result<Vec<WithId<PilotTeamSeason>>> {
        self.check()?;
        Ok(self
            .memberships
            .iter()
            .filter(|membership| membership.content.pilot_id == pilot)
            .cloned()
            .collect())
    }

    async fn memberships_of_season(
        &self,
        season: Id<Season>,
    ) -> Result<Vec<WithId<PilotTeamSeason>>> {
        self.check()?;
        Ok(self
            .memberships
            .iter()
            .filter(|membership| membership.content.season_id == season)
            .cloned()
            .collect())
    }

    async fn circuits(&self) -> Result<Vec<WithId<Circuit>>> {
        self.check()?;
        Ok(self.circuits.clone())
    }

    async fn circuit(&self, id: Id<Circuit>) -> Result<WithId<Circuit>> {
        self.check()?;
        single(&self.circuits, |circuit| circuit.id == id)
    }

    async fn races(&self, leagues: &[Id<League>]) -> Result<Vec<WithId<Race>>> {
        self.check()?;
        let mut races = self
            .races
            .iter()
            .filter(|race| leagues.contains(&race.content.league_id))
            .cloned()
            .collect::<Vec<_>>();
        races.sort_by_key(|race| (race.content.date, race.id));
        Ok(races)
    }

    async fn race(&self, id: Id<Race>) -> Result<WithId<Race>> {
        self.check()?;
        single(&self.races, |race| race.id == id)
    }

    async fn next_race(
        &self,
        leagues: &[Id<League>],
        from: NaiveDate,
    ) -> Result<Option<WithId<Race>>> {
        Ok(self
            .races(leagues)
            .await?
            .into_iter()
            .find(|race| race.content.date >= from))
    }

    async fn pilot_results(
        &self,
        pilot: Id<Pilot>,
        leagues: &[Id<League>],
        sessions: Option<&[Id<Session>]>,
    ) -> Result<Vec<ResultWithRace>> {
        self.check()?;
        let rows = self
            .results
            .iter()
            .filter(|result| result.content.pilot_id == pilot)
            .filter(|result| self.in_leagues(result.content.race_id, leagues))
            .filter(|result| match (sessions, result.content.session_id) {
                (None, _) => true,
                (Some(sessions), Some(session)) => sessions.contains(&session),
                (Some(_), None) => false,
            })
            .map(|result| self.join(result))
            .collect();
        Ok(Self::by_race_date(rows))
    }

    async fn league_results(&self, leagues: &[Id<League>]) -> Result<Vec<ResultWithRace>> {
        self.check()?;
        let rows = self
            .results
            .iter()
            .filter(|result| self.in_leagues(result.content.race_id, leagues))
            .map(|result| self.join(result))
            .collect();
        Ok(Self::by_race_date(rows))
    }

    async fn race_results(&self, race: Id<Race>) -> Result<Vec<ResultWithRace>> {
        self.check()?;
        Ok(self
            .results
            .iter()
            .filter(|result| result.content.race_id == race)
            .map(|result| self.join(result))
            .collect())
    }

    async fn lap_times(
        &self,
        pilot: Id<Pilot>,
        race: Id<Race>,
    ) -> Result<Vec<WithId<LapTime>>> {
        self.check()?;
        let lap_times = self
            .lap_times
            .lock()
            .map_err(|why| RepoError::Other(why.to_string().into()))?;
        let mut laps = lap_times
            .iter()
            .filter(|lap| lap.content.pilot_id == pilot && lap.content.race_id == race)
            .cloned()
            .collect::<Vec<_>>();
        laps.sort_by_key(|lap| lap.content.lap_number);
        Ok(laps)
    }

    async fn insert_lap_time(&self, lap: &LapTime) -> Result<WithId<LapTime>> {
        self.check()?;
        let mut lap_times = self
            .lap_times
            .lock()
            .map_err(|why| RepoError::Other(why.to_string().into()))?;
        let id = lap_times.iter().map(|lap| lap.id.raw()).max().unwrap_or(0) + 1;
        let row = WithId::new(Id::new(id), lap.clone());
        lap_times.push(row.clone());
        Ok(row)
    }
}

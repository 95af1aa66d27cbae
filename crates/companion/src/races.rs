use std::{cmp::Ordering, collections::HashMap};

use chrono::NaiveDate;
use futures::TryFutureExt;
use indexmap::IndexMap;
use model::{
    circuit::Circuit,
    pilot::Pilot,
    race::Race,
    season::Season,
    session::{Session, SessionKind},
    WithId,
};
use serde::Serialize;
use utility::id::Id;

use crate::{
    not_found_to_none, repo::LeagueRepo, scope::SeasonScope, RequestError, RequestResult,
};

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntry {
    pub race: WithId<Race>,
    pub circuit_name: Option<String>,
    /// Days until the race; zero on race day, negative once it is over.
    pub days_left: i64,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceCalendar {
    pub season: Option<WithId<Season>>,
    /// Soonest first.
    pub upcoming: Vec<CalendarEntry>,
    /// Most recent first.
    pub past: Vec<CalendarEntry>,
}

/// The races of `season` (or the current season), split at `today`. A race
/// taking place today is upcoming.
pub async fn load_calendar<R>(
    repo: &R,
    season: Option<Id<Season>>,
    today: NaiveDate,
) -> RequestResult<RaceCalendar>
where
    R: LeagueRepo + ?Sized,
{
    let seasons = repo.seasons().await?;
    let Some(scope) = SeasonScope::for_season(repo, &seasons, season).await? else {
        return Ok(RaceCalendar {
            season: None,
            upcoming: Vec::new(),
            past: Vec::new(),
        });
    };

    let (races, circuits) = futures::try_join!(
        repo.races(&scope.leagues).map_err(RequestError::from),
        repo.circuits().map_err(RequestError::from),
    )?;
    let circuit_names: HashMap<Id<Circuit>, &str> = circuits
        .iter()
        .map(|circuit| (circuit.id, circuit.content.name.as_str()))
        .collect();

    let (mut upcoming, mut past): (Vec<_>, Vec<_>) = races
        .into_iter()
        .map(|race| CalendarEntry {
            circuit_name: race
                .content
                .circuit_id
                .and_then(|circuit| circuit_names.get(&circuit))
                .map(|name| (*name).to_owned()),
            days_left: (race.content.date - today).num_days(),
            race,
        })
        .partition(|entry| entry.days_left >= 0);

    upcoming.sort_by_key(|entry| (entry.race.content.date, entry.race.id));
    past.sort_by(|a, b| {
        (b.race.content.date, b.race.id).cmp(&(a.race.content.date, a.race.id))
    });

    Ok(RaceCalendar {
        season: Some(scope.season),
        upcoming,
        past,
    })
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedPilot {
    pub position: Option<i32>,
    pub pilot_id: Id<Pilot>,
    pub pilot_name: Option<String>,
    pub points: f64,
    pub best_lap: Option<String>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClassification {
    pub session_id: Id<Session>,
    pub name: Option<String>,
    pub kind: Option<SessionKind>,
    pub results: Vec<ClassifiedPilot>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceDetail {
    pub race: WithId<Race>,
    pub circuit: Option<WithId<Circuit>>,
    /// Ordered by session id.
    pub sessions: Vec<SessionClassification>,
}

fn by_position(a: &ClassifiedPilot, b: &ClassifiedPilot) -> Ordering {
    match (a.position, b.position) {
        (Some(a_position), Some(b_position)) => a_position.cmp(&b_position),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.pilot_id.cmp(&b.pilot_id))
}

/// One race with its circuit and the classification of every session.
/// Pilots without a position are listed last.
pub async fn load_race_detail<R>(repo: &R, race: Id<Race>) -> RequestResult<RaceDetail>
where
    R: LeagueRepo + ?Sized,
{
    let (race, results, pilots) = futures::try_join!(
        repo.race(race).map_err(RequestError::from),
        repo.race_results(race).map_err(RequestError::from),
        repo.pilots().map_err(RequestError::from),
    )?;
    let circuit = match race.content.circuit_id {
        Some(circuit) => not_found_to_none(repo.circuit(circuit).await.map_err(Into::into))?,
        None => None,
    };

    let names: HashMap<Id<Pilot>, &str> = pilots
        .iter()
        .map(|pilot| (pilot.id, pilot.content.name.as_str()))
        .collect();

    let mut sessions: IndexMap<Id<Session>, SessionClassification> = IndexMap::new();
    for row in &results {
        let Some(session_id) = row.result.content.session_id else {
            log::debug!("result {} has no session, skipped", row.result.id);
            continue;
        };
        let classification =
            sessions
                .entry(session_id)
                .or_insert_with(|| SessionClassification {
                    session_id,
                    name: row.session_name().map(str::to_owned),
                    kind: row.session_kind(),
                    results: Vec::new(),
                });
        let result = &row.result.content;
        classification.results.push(ClassifiedPilot {
            position: result.race_position.filter(|position| *position > 0),
            pilot_id: result.pilot_id,
            pilot_name: names.get(&result.pilot_id).map(|name| (*name).to_owned()),
            points: result.points_or_zero(),
            best_lap: result.best_lap.clone(),
        });
    }
    sessions.sort_keys();

    let sessions = sessions
        .into_values()
        .map(|mut classification| {
            classification.results.sort_by(by_position);
            classification
        })
        .collect();

    Ok(RaceDetail {
        race,
        circuit,
        sessions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::memory::{date, MemoryRepo};

    #[tokio::test]
    async fn calendar_splits_at_today() {
        let repo = MemoryRepo::league_fixture();
        let calendar = load_calendar(&repo, None, date(2024, 5, 4)).await.unwrap();

        let upcoming = calendar
            .upcoming
            .iter()
            .map(|entry| (entry.race.id.raw(), entry.days_left))
            .collect::<Vec<_>>();
        assert_eq!(upcoming, vec![(2, 0), (3, 140)]);
        let past = calendar
            .past
            .iter()
            .map(|entry| entry.race.id.raw())
            .collect::<Vec<_>>();
        assert_eq!(past, vec![1]);
        assert_eq!(
            calendar.upcoming[0].circuit_name.as_deref(),
            Some("Kartódromo de Lucas Guerrero")
        );
    }

    #[tokio::test]
    async fn calendar_of_a_past_season() {
        let repo = MemoryRepo::league_fixture();
        let calendar = load_calendar(&repo, Some(Id::new(0)), date(2024, 5, 4))
            .await
            .unwrap();
        assert!(calendar.upcoming.is_empty());
        assert_eq!(calendar.past.len(), 1);
        assert_eq!(calendar.past[0].race.id, Id::new(0));
    }

    #[tokio::test]
    async fn race_detail_groups_by_session() {
        let repo = MemoryRepo::league_fixture();
        let detail = load_race_detail(&repo, Id::new(1)).await.unwrap();
        assert_eq!(detail.circuit.map(|circuit| circuit.id), Some(Id::new(1)));

        let sessions = detail
            .sessions
            .iter()
            .map(|session| (session.session_id.raw(), session.kind))
            .collect::<Vec<_>>();
        assert_eq!(
            sessions,
            vec![
                (1, Some(SessionKind::Qualifying)),
                (2, Some(SessionKind::Race)),
                (3, Some(SessionKind::Race)),
            ]
        );

        let second_race = detail.sessions[2]
            .results
            .iter()
            .map(|row| (row.position, row.pilot_name.as_deref()))
            .collect::<Vec<_>>();
        assert_eq!(
            second_race,
            vec![
                (Some(1), Some("Lucía Ortega")),
                (Some(2), Some("Iker Ramos")),
                (Some(3), Some("Marc Vidal")),
            ]
        );
    }

    #[tokio::test]
    async fn unplaced_pilots_come_last() {
        let mut repo = MemoryRepo::league_fixture();
        repo.results
            .iter_mut()
            .filter(|row| row.content.race_id == Id::new(2))
            .for_each(|row| {
                if row.content.pilot_id == Id::new(2) {
                    row.content.race_position = None;
                }
            });
        let detail = load_race_detail(&repo, Id::new(2)).await.unwrap();
        let order = detail.sessions[0]
            .results
            .iter()
            .map(|row| row.pilot_id.raw())
            .collect::<Vec<_>>();
        assert_eq!(order, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn missing_circuit_is_tolerated() {
        let mut repo = MemoryRepo::league_fixture();
        repo.circuits.clear();
        let detail = load_race_detail(&repo, Id::new(3)).await.unwrap();
        assert_eq!(detail.circuit, None);
        assert!(detail.sessions.is_empty());
    }

    #[tokio::test]
    async fn unknown_race() {
        let repo = MemoryRepo::league_fixture();
        assert!(matches!(
            load_race_detail(&repo, Id::new(99)).await,
            Err(RequestError::NotFound)
        ));
    }
}

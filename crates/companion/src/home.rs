use chrono::NaiveDate;
use model::{
    circuit::Circuit,
    pilot::Pilot,
    race::Race,
    result::ResultWithRace,
    season::Season,
    session::SessionKind,
    WithId,
};
use futures::TryFutureExt;
use serde::Serialize;
use standings::{
    series::{championship_series, position_series},
    stats::PilotStats,
    Series,
};

use crate::{
    config::CompanionConfig, not_found_to_none, repo::LeagueRepo, scope::SeasonScope,
    RequestError, RequestResult,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextRace {
    pub race: WithId<Race>,
    pub circuit: Option<WithId<Circuit>>,
    pub days_left: i64,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentResult {
    pub race_name: Option<String>,
    #[serde(with = "utility::date::lenient")]
    pub date: NaiveDate,
    pub session_name: Option<String>,
    pub position: Option<i32>,
    pub points: f64,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeDashboard {
    pub pilot: WithId<Pilot>,
    pub season: Option<WithId<Season>>,
    pub next_race: Option<NextRace>,
    pub stats: PilotStats,
    /// Absent when there is nothing to plot.
    pub position_series: Option<Series>,
    pub championship_series: Option<Series>,
    pub recent_results: Vec<RecentResult>,
}

/// Loads the dashboard of the pilot owned by `user_id`. The season scope is
/// resolved first; the remaining fetches are independent and run
/// concurrently.
pub async fn load_home<R>(
    repo: &R,
    config: &CompanionConfig,
    user_id: &str,
    today: NaiveDate,
) -> RequestResult<HomeDashboard>
where
    R: LeagueRepo + ?Sized,
{
    let pilot = repo.pilot_by_user(user_id).await?;
    let Some(scope) = SeasonScope::for_pilot(repo, pilot.id).await? else {
        log::info!("pilot {} is not a member of any season", pilot.id);
        return Ok(HomeDashboard {
            pilot,
            season: None,
            next_race: None,
            stats: PilotStats::default(),
            position_series: None,
            championship_series: None,
            recent_results: Vec::new(),
        });
    };
    let leagues = &scope.leagues;

    let (next_race, results, scored_results, league_results) = futures::try_join!(
        next_race(repo, &scope, today),
        repo.pilot_results(pilot.id, leagues, None)
            .map_err(RequestError::from),
        repo.pilot_results(pilot.id, leagues, Some(config.scored_sessions.as_slice()))
            .map_err(RequestError::from),
        repo.league_results(leagues).map_err(RequestError::from),
    )?;

    Ok(HomeDashboard {
        stats: PilotStats::from_results(&results),
        position_series: position_series(&scored_results, &config.scored_sessions),
        championship_series: championship_series(&league_results, pilot.id),
        recent_results: recent_results(&results, config.recent_results),
        next_race,
        season: Some(scope.season),
        pilot,
    })
}

async fn next_race<R>(
    repo: &R,
    scope: &SeasonScope,
    today: NaiveDate,
) -> RequestResult<Option<NextRace>>
where
    R: LeagueRepo + ?Sized,
{
    let Some(race) = repo.next_race(&scope.leagues, today).await? else {
        return Ok(None);
    };
    let circuit = match race.content.circuit_id {
        Some(id) => not_found_to_none(repo.circuit(id).await.map_err(Into::into))?,
        None => None,
    };
    Ok(Some(NextRace {
        days_left: (race.content.date - today).num_days(),
        race,
        circuit,
    }))
}

/// The newest race-session results, newest first.
fn recent_results(results: &[ResultWithRace], limit: usize) -> Vec<RecentResult> {
    let mut rows = results
        .iter()
        .filter(|row| row.session_kind() == Some(SessionKind::Race))
        .filter_map(|row| row.race.as_ref().map(|race| (race, row)))
        .collect::<Vec<_>>();
    rows.sort_by(|(a, a_row), (b, b_row)| {
        (b.date, b.id, b_row.result.content.session_id)
            .cmp(&(a.date, a.id, a_row.result.content.session_id))
    });
    rows.into_iter()
        .take(limit)
        .map(|(race, row)| RecentResult {
            race_name: race.name.clone(),
            date: race.date,
            session_name: row.session_name().map(str::to_owned),
            position: row.result.content.race_position,
            points: row.result.content.points_or_zero(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::memory::{date, MemoryRepo};
    use utility::id::Id;

    fn config() -> CompanionConfig {
        CompanionConfig {
            scored_sessions: vec![Id::new(2), Id::new(3)],
            recent_results: 3,
        }
    }

    #[tokio::test]
    async fn builds_the_dashboard_for_the_active_season() {
        let repo = MemoryRepo::league_fixture();
        let home = load_home(&repo, &config(), "user-1", date(2024, 6, 1))
            .await
            .unwrap();

        assert_eq!(home.pilot.id, Id::new(1));
        assert_eq!(home.season.as_ref().unwrap().id, Id::new(1));

        let next = home.next_race.unwrap();
        assert_eq!(next.race.id, Id::new(3));
        assert_eq!(next.days_left, 112);
        assert!(next.circuit.is_some());

        assert_eq!(
            home.stats,
            PilotStats {
                total_races: 4,
                podiums: 3,
                wins: 1,
                total_points: 70.0,
                best_position: Some(1),
                pole_positions: 1,
            }
        );

        let positions = home.position_series.unwrap();
        assert_eq!(positions.values(), vec![2, 1, 3, 4]);
        assert_eq!(positions.labels(), vec!["13/04", "13/04", "04/05", "04/05"]);

        let championship = home.championship_series.unwrap();
        assert_eq!(championship.values(), vec![1, 2]);

        let recent = home
            .recent_results
            .iter()
            .map(|row| (row.session_name.as_deref(), row.position))
            .collect::<Vec<_>>();
        assert_eq!(
            recent,
            vec![
                (Some("Carrera 2"), Some(4)),
                (Some("Carrera 1"), Some(3)),
                (Some("Carrera 2"), Some(1)),
            ]
        );
    }

    #[tokio::test]
    async fn pilot_without_season_gets_a_neutral_dashboard() {
        let mut repo = MemoryRepo::league_fixture();
        repo.memberships.retain(|membership| membership.content.pilot_id != Id::new(3));
        let home = load_home(&repo, &config(), "user-3", date(2024, 6, 1))
            .await
            .unwrap();
        assert_eq!(home.season, None);
        assert_eq!(home.stats, PilotStats::default());
        assert_eq!(home.position_series, None);
        assert_eq!(home.championship_series, None);
        assert!(home.recent_results.is_empty());
    }

    #[tokio::test]
    async fn no_upcoming_race_after_the_season() {
        let repo = MemoryRepo::league_fixture();
        let home = load_home(&repo, &config(), "user-2", date(2024, 12, 1))
            .await
            .unwrap();
        assert_eq!(home.next_race, None);
        assert_eq!(home.championship_series.unwrap().values(), vec![2, 1]);
    }

    #[tokio::test]
    async fn unknown_user_and_backend_failures_surface() {
        let repo = MemoryRepo::league_fixture();
        assert!(matches!(
            load_home(&repo, &config(), "nobody", date(2024, 6, 1)).await,
            Err(RequestError::NotFound)
        ));

        let mut repo = MemoryRepo::league_fixture();
        repo.unavailable = true;
        let error = load_home(&repo, &config(), "user-1", date(2024, 6, 1))
            .await
            .unwrap_err();
        assert!(matches!(error, RequestError::Other(_)));
        assert!(error.user_message().contains("refresh"));
    }
}

use futures::TryFutureExt;
use model::{pilot::Pilot, season::Season, team::Team, WithId};
use serde::Serialize;
use standings::stats::PilotStats;

use crate::{repo::LeagueRepo, scope::SeasonScope, RequestError, RequestResult};

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub pilot: WithId<Pilot>,
    pub season: Option<WithId<Season>>,
    /// The team driven for in `season`, otherwise the current team.
    pub team: Option<WithId<Team>>,
    pub license_points: Option<i32>,
    pub is_wildcard: bool,
    /// Statistics over the season, zeroed without one.
    pub stats: PilotStats,
}

pub async fn load_profile<R>(repo: &R, user_id: &str) -> RequestResult<Profile>
where
    R: LeagueRepo + ?Sized,
{
    let pilot = repo.pilot_by_user(user_id).await?;
    let scope = SeasonScope::for_pilot(repo, pilot.id).await?;
    let leagues = scope
        .as_ref()
        .map(|scope| scope.leagues.clone())
        .unwrap_or_default();

    let (teams, results) = futures::try_join!(
        repo.teams().map_err(RequestError::from),
        repo.pilot_results(pilot.id, &leagues, None)
            .map_err(RequestError::from),
    )?;

    let membership = scope
        .as_ref()
        .and_then(|scope| scope.membership_of(pilot.id));
    let team_id = membership
        .and_then(|membership| membership.team_id)
        .or(pilot.content.team_id);
    let team = team_id.and_then(|id| teams.into_iter().find(|team| team.id == id));
    if team_id.is_some() && team.is_none() {
        log::warn!("pilot {} refers to an unknown team", pilot.id);
    }

    Ok(Profile {
        license_points: membership.and_then(|membership| membership.license_points),
        is_wildcard: membership.is_some_and(|membership| membership.is_wildcard),
        stats: PilotStats::from_results(&results),
        season: scope.map(|scope| scope.season),
        team,
        pilot,
    })
}

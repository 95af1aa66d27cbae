use std::{collections::HashSet, sync::Mutex};

use futures::TryFutureExt;
use model::{
    season::{League, Season},
    WithId,
};
use serde::Serialize;
use standings::{
    roster::Roster,
    table::{pilot_table, team_table, PilotStanding, TeamStanding},
};
use utility::id::Id;

use crate::{
    repo::LeagueRepo,
    scope::SeasonScope,
    screen::Screen,
    RequestError, RequestResult,
};

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboard {
    /// All seasons, for the season picker.
    pub seasons: Vec<WithId<Season>>,
    pub season: Option<WithId<Season>>,
    /// The leagues raced in `season`.
    pub leagues: Vec<WithId<League>>,
    pub pilots: Vec<PilotStanding>,
    pub teams: Vec<TeamStanding>,
}

/// Pilot and team standings of `season`, or of the current season.
///
/// Pilots are those with a membership in the season or a result in it; a
/// season without any memberships lists every pilot. Teams are rolled up
/// from season memberships, falling back to a pilot's current team.
pub async fn load_leaderboard<R>(
    repo: &R,
    season: Option<Id<Season>>,
) -> RequestResult<Leaderboard>
where
    R: LeagueRepo + ?Sized,
{
    let seasons = repo.seasons().await?;
    let Some(scope) = SeasonScope::for_season(repo, &seasons, season).await? else {
        return Ok(Leaderboard {
            seasons,
            season: None,
            leagues: Vec::new(),
            pilots: Vec::new(),
            teams: Vec::new(),
        });
    };

    let (leagues, pilots, teams, results) = futures::try_join!(
        repo.leagues(&scope.leagues).map_err(RequestError::from),
        repo.pilots().map_err(RequestError::from),
        repo.teams().map_err(RequestError::from),
        repo.league_results(&scope.leagues).map_err(RequestError::from),
    )?;

    let listed = if scope.memberships.is_empty() {
        pilots.clone()
    } else {
        let involved = scope
            .memberships
            .iter()
            .map(|membership| membership.content.pilot_id)
            .chain(results.iter().map(|row| row.result.content.pilot_id))
            .collect::<HashSet<_>>();
        pilots
            .iter()
            .filter(|pilot| involved.contains(&pilot.id))
            .cloned()
            .collect()
    };

    let roster = Roster::for_season(scope.season.id, &scope.memberships, &pilots);
    let pilot_rows = pilot_table(&listed, &teams, &roster, results.iter().map(|row| &row.result));
    let team_rows = team_table(&teams, &roster, &pilot_rows);

    Ok(Leaderboard {
        seasons,
        season: Some(scope.season),
        leagues,
        pilots: pilot_rows,
        teams: team_rows,
    })
}

/// The standings screen: switching seasons quickly only ever shows the
/// standings of the season selected last.
pub struct LeaderboardScreen {
    screen: Screen<Leaderboard>,
    selected: Mutex<Option<Id<Season>>>,
}

impl Default for LeaderboardScreen {
    fn default() -> Self {
        Self {
            screen: Screen::new("standings"),
            selected: Mutex::new(None),
        }
    }
}

impl LeaderboardScreen {
    pub fn screen(&self) -> &Screen<Leaderboard> {
        &self.screen
    }

    fn selected(&self) -> Option<Id<Season>> {
        self.selected.lock().map(|selected| *selected).unwrap_or_default()
    }

    pub async fn select_season<R>(&self, repo: &R, season: Option<Id<Season>>) -> bool
    where
        R: LeagueRepo + ?Sized,
    {
        if let Ok(mut selected) = self.selected.lock() {
            *selected = season;
        }
        self.screen.load(load_leaderboard(repo, season)).await
    }

    pub async fn refresh<R>(&self, repo: &R) -> bool
    where
        R: LeagueRepo + ?Sized,
    {
        let season = self.selected();
        self.screen.refresh(load_leaderboard(repo, season)).await
    }
}

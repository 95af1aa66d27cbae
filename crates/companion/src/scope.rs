use itertools::Itertools;
use model::{
    pilot::Pilot,
    season::{current_season, League, PilotTeamSeason, Season},
    WithId,
};
use utility::id::Id;

use crate::{repo::LeagueRepo, RequestError, RequestResult};

/// A season together with the leagues that make up its scope. Every
/// season-bound query filters on `leagues`.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonScope {
    pub season: WithId<Season>,
    pub leagues: Vec<Id<League>>,
    pub memberships: Vec<WithId<PilotTeamSeason>>,
}

impl SeasonScope {
    fn new(season: WithId<Season>, memberships: Vec<WithId<PilotTeamSeason>>) -> Self {
        let leagues = memberships
            .iter()
            .filter(|membership| membership.content.season_id == season.id)
            .map(|membership| membership.content.league_id)
            .unique()
            .sorted()
            .collect();
        Self {
            season,
            leagues,
            memberships,
        }
    }

    /// The scope of `season`, or of the current one among `seasons` if none
    /// is given. `Ok(None)` when there are no seasons at all.
    pub async fn for_season<R>(
        repo: &R,
        seasons: &[WithId<Season>],
        season: Option<Id<Season>>,
    ) -> RequestResult<Option<Self>>
    where
        R: LeagueRepo + ?Sized,
    {
        let season = match season {
            Some(id) => seasons
                .iter()
                .find(|season| season.id == id)
                .cloned()
                .ok_or(RequestError::NotFound)?,
            None => match current_season(seasons) {
                Some(season) => season.clone(),
                None => return Ok(None),
            },
        };
        let memberships = repo.memberships_of_season(season.id).await?;
        Ok(Some(Self::new(season, memberships)))
    }

    /// The current season among the seasons the pilot is a member of.
    /// `Ok(None)` for a pilot without memberships.
    pub async fn for_pilot<R>(repo: &R, pilot: Id<Pilot>) -> RequestResult<Option<Self>>
    where
        R: LeagueRepo + ?Sized,
    {
        let (seasons, memberships) =
            futures::try_join!(repo.seasons(), repo.memberships_of_pilot(pilot))?;
        let member_of = seasons
            .iter()
            .filter(|season| {
                memberships
                    .iter()
                    .any(|membership| membership.content.season_id == season.id)
            })
            .collect::<Vec<_>>();
        Ok(current_season(member_of)
            .cloned()
            .map(|season| Self::new(season, memberships)))
    }

    /// The membership of `pilot` in this season, if any.
    pub fn membership_of(&self, pilot: Id<Pilot>) -> Option<&PilotTeamSeason> {
        self.memberships
            .iter()
            .map(|membership| &membership.content)
            .find(|membership| {
                membership.pilot_id == pilot && membership.season_id == self.season.id
            })
    }
}

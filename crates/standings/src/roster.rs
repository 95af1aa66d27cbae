use std::collections::HashMap;

use model::{
    pilot::Pilot,
    season::{PilotTeamSeason, Season},
    team::Team,
    WithId,
};
use utility::id::Id;

/// Which team each pilot drives for, as used to roll pilot points up into
/// team standings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    teams: HashMap<Id<Pilot>, Id<Team>>,
}

impl Roster {
    /// Uses each pilot's current team reference.
    pub fn from_current_teams(pilots: &[WithId<Pilot>]) -> Self {
        Self {
            teams: pilots
                .iter()
                .filter_map(|pilot| pilot.content.team_id.map(|team| (pilot.id, team)))
                .collect(),
        }
    }

    /// Uses the season-scoped memberships of `season`. Pilots without a
    /// membership carrying a team in that season fall back to their current
    /// team.
    pub fn for_season(
        season: Id<Season>,
        memberships: &[WithId<PilotTeamSeason>],
        pilots: &[WithId<Pilot>],
    ) -> Self {
        let mut roster = Self::from_current_teams(pilots);
        for membership in memberships
            .iter()
            .map(|membership| &membership.content)
            .filter(|membership| membership.season_id == season)
        {
            if let Some(team) = membership.team_id {
                roster.teams.insert(membership.pilot_id, team);
            }
        }
        roster
    }

    pub fn team_of(&self, pilot: Id<Pilot>) -> Option<Id<Team>> {
        self.teams.get(&pilot).copied()
    }

    /// Pilots of `team`, ordered by id.
    pub fn pilots_of(&self, team: Id<Team>) -> Vec<Id<Pilot>> {
        let mut pilots = self
            .teams
            .iter()
            .filter(|(_, pilot_team)| **pilot_team == team)
            .map(|(pilot, _)| *pilot)
            .collect::<Vec<_>>();
        pilots.sort();
        pilots
    }
}

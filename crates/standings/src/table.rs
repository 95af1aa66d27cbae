use std::collections::HashMap;

use itertools::Itertools;
use model::{
    pilot::Pilot,
    result::RaceResult,
    team::Team,
    WithId,
};
use serde::Serialize;
use utility::id::Id;

use crate::roster::Roster;

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PilotStanding {
    pub rank: usize,
    pub pilot_id: Id<Pilot>,
    pub name: String,
    pub number: Option<i32>,
    pub team_id: Option<Id<Team>>,
    pub team_name: Option<String>,
    pub points: f64,
    /// Number of result rows that went into `points`.
    pub results: usize,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStanding {
    pub rank: usize,
    pub team_id: Id<Team>,
    pub name: String,
    pub logo_url: Option<String>,
    pub points: f64,
    pub pilots: Vec<Id<Pilot>>,
}

/// Current pilot standings of a season. `results` must already be scoped to
/// the season. Every pilot is listed, with zero points if they have no
/// results. Ordered by points descending, then pilot id ascending.
pub fn pilot_table<'a, I>(
    pilots: &[WithId<Pilot>],
    teams: &[WithId<Team>],
    roster: &Roster,
    results: I,
) -> Vec<PilotStanding>
where
    I: IntoIterator<Item = &'a WithId<RaceResult>>,
{
    let mut totals: HashMap<Id<Pilot>, (f64, usize)> = pilots
        .iter()
        .map(|pilot| (pilot.id, (0.0, 0)))
        .collect();
    for result in results {
        match totals.get_mut(&result.content.pilot_id) {
            Some((points, count)) => {
                *points += result.content.points_or_zero();
                *count += 1;
            }
            None => log::warn!(
                "result {} belongs to unknown pilot {}",
                result.id,
                result.content.pilot_id
            ),
        }
    }

    let team_names: HashMap<Id<Team>, &str> = teams
        .iter()
        .map(|team| (team.id, team.content.name.as_str()))
        .collect();

    pilots
        .iter()
        .map(|pilot| {
            let (points, count) = totals.get(&pilot.id).copied().unwrap_or((0.0, 0));
            (pilot, points, count)
        })
        .sorted_by(|(a, a_points, _), (b, b_points, _)| {
            b_points.total_cmp(a_points).then_with(|| a.id.cmp(&b.id))
        })
        .enumerate()
        .map(|(index, (pilot, points, results))| {
            let team_id = roster.team_of(pilot.id);
            PilotStanding {
                rank: index + 1,
                pilot_id: pilot.id,
                name: pilot.content.name.clone(),
                number: pilot.content.number,
                team_id,
                team_name: team_id
                    .and_then(|team| team_names.get(&team))
                    .map(|name| (*name).to_owned()),
                points,
                results,
            }
        })
        .collect()
}

/// Team standings rolled up from a pilot table through `roster`. Every team
/// is listed. Ordered by points descending, then team id ascending.
pub fn team_table(
    teams: &[WithId<Team>],
    roster: &Roster,
    pilot_table: &[PilotStanding],
) -> Vec<TeamStanding> {
    let points: HashMap<Id<Pilot>, f64> = pilot_table
        .iter()
        .map(|standing| (standing.pilot_id, standing.points))
        .collect();

    teams
        .iter()
        .map(|team| {
            let pilots = roster
                .pilots_of(team.id)
                .into_iter()
                .filter(|pilot| points.contains_key(pilot))
                .collect::<Vec<_>>();
            let total = pilots.iter().filter_map(|pilot| points.get(pilot)).sum::<f64>();
            (team, total, pilots)
        })
        .sorted_by(|(a, a_points, _), (b, b_points, _)| {
            b_points.total_cmp(a_points).then_with(|| a.id.cmp(&b.id))
        })
        .enumerate()
        .map(|(index, (team, points, pilots))| TeamStanding {
            rank: index + 1,
            team_id: team.id,
            name: team.content.name.clone(),
            logo_url: team.content.logo_url.clone(),
            points,
            pilots,
        })
        .collect()
}

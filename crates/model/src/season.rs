use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::{pilot::Pilot, team::Team, RowId};

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub name: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(
        default,
        serialize_with = "utility::date::lenient::serialize_option",
        deserialize_with = "utility::date::lenient::deserialize_option"
    )]
    pub start_date: Option<NaiveDate>,
    #[serde(
        default,
        serialize_with = "utility::date::lenient::serialize_option",
        deserialize_with = "utility::date::lenient::deserialize_option"
    )]
    pub end_date: Option<NaiveDate>,
}

impl HasId for Season {
    type IdType = RowId;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub name: String,
}

impl HasId for League {
    type IdType = RowId;
}

/// Season-scoped membership of a pilot in a team and league.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PilotTeamSeason {
    pub pilot_id: Id<Pilot>,
    pub team_id: Option<Id<Team>>,
    pub season_id: Id<Season>,
    pub league_id: Id<League>,
    pub license_points: Option<i32>,
    #[serde(default, alias = "wildcard")]
    pub is_wildcard: bool,
}

impl HasId for PilotTeamSeason {
    type IdType = RowId;
}

/// Picks the season a pilot's screens default to: the active one, otherwise
/// the one that started last.
pub fn current_season<'a, I>(seasons: I) -> Option<&'a crate::WithId<Season>>
where
    I: IntoIterator<Item = &'a crate::WithId<Season>>,
{
    let seasons = seasons.into_iter().collect::<Vec<_>>();
    seasons
        .iter()
        .copied()
        .filter(|season| season.content.is_active)
        .max_by_key(|season| (season.content.start_date, season.id))
        .or_else(|| {
            seasons
                .iter()
                .copied()
                .max_by_key(|season| (season.content.start_date, season.id))
        })
}

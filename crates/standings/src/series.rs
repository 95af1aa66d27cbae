use std::collections::HashMap;

use indexmap::IndexMap;
use model::{
    pilot::Pilot,
    race::Race,
    result::{RaceSummary, ResultWithRace},
    session::Session,
};
use serde::Serialize;
use utility::{date::chart_label, id::Id};

use crate::{Series, SeriesPoint};

/// Finishing position per scored race session, oldest race first.
///
/// Rows outside `scored_sessions`, without a resolved race or without a
/// position are skipped. Returns `None` when nothing is left.
pub fn position_series(
    results: &[ResultWithRace],
    scored_sessions: &[Id<Session>],
) -> Option<Series> {
    let mut rows = results
        .iter()
        .filter(|row| {
            row.result
                .content
                .session_id
                .is_some_and(|session| scored_sessions.contains(&session))
        })
        .filter_map(|row| {
            let race = row.race.as_ref()?;
            let position = row.result.content.race_position?;
            Some((race, row.result.content.session_id, position))
        })
        .collect::<Vec<_>>();
    rows.sort_by_key(|(race, session, _)| (race.date, race.id, *session));

    Series::from_points(
        rows.into_iter()
            .map(|(race, _, position)| SeriesPoint {
                label: chart_label(race.date),
                value: position,
            })
            .collect(),
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingEntry {
    pub pilot_id: Id<Pilot>,
    pub points: f64,
}

/// Championship standings right after one race.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceSnapshot {
    pub race: RaceSummary,
    /// Sorted by points descending, then pilot id ascending.
    pub standings: Vec<StandingEntry>,
}

impl RaceSnapshot {
    /// 1-based rank of the pilot, `None` if the pilot has not scored a
    /// result yet.
    pub fn rank_of(&self, pilot: Id<Pilot>) -> Option<usize> {
        self.standings
            .iter()
            .position(|entry| entry.pilot_id == pilot)
            .map(|index| index + 1)
    }
}

/// The championship standings reconstructed race by race.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChampionshipTimeline {
    pub snapshots: Vec<RaceSnapshot>,
}

impl ChampionshipTimeline {
    /// Rebuilds the standings after every race from all results of the
    /// league set. Rows without a resolved race are dropped.
    pub fn build(results: &[ResultWithRace]) -> Self {
        let mut by_race: IndexMap<Id<Race>, (RaceSummary, Vec<&ResultWithRace>)> =
            IndexMap::new();
        for row in results {
            let Some(race) = &row.race else {
                log::debug!(
                    "dropping result {} without a resolved race",
                    row.result.id
                );
                continue;
            };
            by_race
                .entry(race.id)
                .or_insert_with(|| (race.clone(), Vec::new()))
                .1
                .push(row);
        }
        by_race.sort_by(|_, (a, _), _, (b, _)| (a.date, a.id).cmp(&(b.date, b.id)));

        let mut totals: HashMap<Id<Pilot>, f64> = HashMap::new();
        let snapshots = by_race
            .into_values()
            .map(|(race, rows)| {
                for row in rows {
                    *totals.entry(row.result.content.pilot_id).or_insert(0.0) +=
                        row.result.content.points_or_zero();
                }
                RaceSnapshot {
                    race,
                    standings: snapshot(&totals),
                }
            })
            .collect();

        Self { snapshots }
    }

    /// The pilot's rank after each race. Races before the pilot's first
    /// result contribute no point.
    pub fn series_for(&self, pilot: Id<Pilot>) -> Option<Series> {
        Series::from_points(
            self.snapshots
                .iter()
                .filter_map(|snapshot| {
                    snapshot.rank_of(pilot).map(|rank| SeriesPoint {
                        label: chart_label(snapshot.race.date),
                        value: rank as i32,
                    })
                })
                .collect(),
        )
    }
}

fn snapshot(totals: &HashMap<Id<Pilot>, f64>) -> Vec<StandingEntry> {
    let mut standings = totals
        .iter()
        .map(|(pilot_id, points)| StandingEntry {
            pilot_id: *pilot_id,
            points: *points,
        })
        .collect::<Vec<_>>();
    standings.sort_by(|a, b| {
        b.points
            .total_cmp(&a.points)
            .then_with(|| a.pilot_id.cmp(&b.pilot_id))
    });
    standings
}

/// Rank of `pilot` after every race of the league set, oldest race first.
pub fn championship_series(
    results: &[ResultWithRace],
    pilot: Id<Pilot>,
) -> Option<Series> {
    ChampionshipTimeline::build(results).series_for(pilot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{date, row};

    #[test]
    fn position_series_is_sorted_by_race_date() {
        let results = vec![
            row(1, 5, Some((2, date(2024, 5, 4))), Some((1, "Carrera 1")), Some(3), None),
            row(2, 5, Some((1, date(2024, 4, 13))), Some((2, "Carrera 2")), Some(6), None),
            row(3, 5, Some((1, date(2024, 4, 13))), Some((1, "Carrera 1")), Some(4), None),
        ];
        let series = position_series(&results, &[Id::new(1), Id::new(2)]).unwrap();
        assert_eq!(series.labels(), vec!["13/04", "13/04", "04/05"]);
        assert_eq!(series.values(), vec![4, 6, 3]);
    }

    #[test]
    fn position_series_skips_other_sessions_and_broken_rows() {
        let results = vec![
            row(1, 5, Some((1, date(2024, 4, 13))), Some((9, "Clasificación")), Some(1), None),
            row(2, 5, None, Some((1, "Carrera 1")), Some(2), None),
            row(3, 5, Some((2, date(2024, 5, 4))), Some((1, "Carrera 1")), None, None),
            row(4, 5, Some((3, date(2024, 6, 1))), None, Some(2), None),
        ];
        assert_eq!(position_series(&results, &[Id::new(1), Id::new(2)]), None);
    }

    #[test]
    fn absent_series_is_distinct_from_any_series() {
        let results = vec![row(
            1,
            5,
            Some((1, date(2024, 4, 13))),
            Some((1, "Carrera 1")),
            Some(2),
            None,
        )];
        assert!(position_series(&results, &[]).is_none());
        assert_eq!(position_series(&results, &[Id::new(1)]).map(|s| s.len()), Some(1));
    }

    #[test]
    fn championship_follows_accumulated_points() {
        let first = Some((1, date(2024, 4, 13)));
        let second = Some((2, date(2024, 5, 4)));
        let session = Some((1, "Carrera 1"));
        let results = vec![
            row(1, 1, first, session, Some(2), Some(10.0)),
            row(2, 2, first, session, Some(1), Some(15.0)),
            row(3, 1, second, session, Some(1), Some(20.0)),
            row(4, 2, second, session, Some(3), Some(5.0)),
        ];
        let timeline = ChampionshipTimeline::build(&results);
        assert_eq!(timeline.snapshots.len(), 2);
        assert_eq!(
            timeline.snapshots[0].standings,
            vec![
                StandingEntry { pilot_id: Id::new(2), points: 15.0 },
                StandingEntry { pilot_id: Id::new(1), points: 10.0 },
            ]
        );
        assert_eq!(
            timeline.snapshots[1].standings,
            vec![
                StandingEntry { pilot_id: Id::new(1), points: 30.0 },
                StandingEntry { pilot_id: Id::new(2), points: 20.0 },
            ]
        );
        let series = championship_series(&results, Id::new(1)).unwrap();
        assert_eq!(series.values(), vec![2, 1]);
        assert_eq!(series.labels(), vec!["13/04", "04/05"]);
    }

    #[test]
    fn races_are_processed_in_date_order_regardless_of_input_order() {
        let first = Some((7, date(2024, 4, 13)));
        let second = Some((3, date(2024, 5, 4)));
        let session = Some((1, "Carrera 1"));
        let results = vec![
            row(3, 1, second, session, Some(1), Some(20.0)),
            row(4, 2, second, session, Some(3), Some(5.0)),
            row(1, 1, first, session, Some(2), Some(10.0)),
            row(2, 2, first, session, Some(1), Some(15.0)),
        ];
        assert_eq!(
            championship_series(&results, Id::new(1)).unwrap().values(),
            vec![2, 1]
        );
    }

    #[test]
    fn same_day_races_are_ordered_by_race_id() {
        let day = date(2024, 4, 13);
        let session = Some((1, "Carrera 1"));
        let results = vec![
            row(1, 1, Some((9, day)), session, Some(1), Some(20.0)),
            row(2, 2, Some((4, day)), session, Some(1), Some(20.0)),
        ];
        let timeline = ChampionshipTimeline::build(&results);
        let order = timeline
            .snapshots
            .iter()
            .map(|snapshot| snapshot.race.id)
            .collect::<Vec<_>>();
        assert_eq!(order, vec![Id::new(4), Id::new(9)]);
    }

    #[test]
    fn ties_are_broken_by_pilot_id() {
        let race = Some((1, date(2024, 4, 13)));
        let session = Some((1, "Carrera 1"));
        let results = vec![
            row(1, 8, race, session, Some(1), Some(12.0)),
            row(2, 3, race, session, Some(2), Some(12.0)),
            row(3, 5, race, session, Some(3), Some(20.0)),
        ];
        let timeline = ChampionshipTimeline::build(&results);
        let snapshot = &timeline.snapshots[0];
        assert_eq!(snapshot.rank_of(Id::new(5)), Some(1));
        assert_eq!(snapshot.rank_of(Id::new(3)), Some(2));
        assert_eq!(snapshot.rank_of(Id::new(8)), Some(3));
    }

    #[test]
    fn rank_counts_strictly_better_pilots_plus_tie_break() {
        let first = Some((1, date(2024, 1, 1)));
        let second = Some((2, date(2024, 2, 1)));
        let session = Some((1, "Carrera 1"));
        let results = vec![
            row(1, 1, first, session, None, Some(5.0)),
            row(2, 2, first, session, None, Some(9.0)),
            row(3, 3, first, session, None, Some(5.0)),
            row(4, 4, first, session, None, None),
            row(5, 1, second, session, None, Some(4.0)),
            row(6, 4, second, session, None, Some(9.0)),
        ];
        let timeline = ChampionshipTimeline::build(&results);
        for snapshot in &timeline.snapshots {
            for entry in &snapshot.standings {
                let ahead = snapshot
                    .standings
                    .iter()
                    .filter(|other| {
                        other.points > entry.points
                            || (other.points == entry.points
                                && other.pilot_id < entry.pilot_id)
                    })
                    .count();
                assert_eq!(snapshot.rank_of(entry.pilot_id), Some(ahead + 1));
            }
        }
    }

    #[test]
    fn pilot_without_results_yet_has_no_point() {
        let first = Some((1, date(2024, 4, 13)));
        let second = Some((2, date(2024, 5, 4)));
        let session = Some((1, "Carrera 1"));
        let results = vec![
            row(1, 1, first, session, Some(1), Some(25.0)),
            row(2, 1, second, session, Some(2), Some(18.0)),
            row(3, 2, second, session, Some(1), Some(25.0)),
        ];
        let series = championship_series(&results, Id::new(2)).unwrap();
        assert_eq!(series.labels(), vec!["04/05"]);
        assert_eq!(series.values(), vec![2]);
        assert_eq!(championship_series(&results, Id::new(99)), None);
    }

    #[test]
    fn results_without_race_are_ignored() {
        let results = vec![row(1, 1, None, Some((1, "Carrera 1")), Some(1), Some(25.0))];
        assert!(ChampionshipTimeline::build(&results).snapshots.is_empty());
        assert_eq!(championship_series(&results, Id::new(1)), None);
    }
}

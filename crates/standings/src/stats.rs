use model::{result::ResultWithRace, session::SessionKind};
use serde::Serialize;

/// Summary counters of one pilot over a season's results.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PilotStats {
    pub total_races: u32,
    pub podiums: u32,
    pub wins: u32,
    pub total_points: f64,
    /// `None` until the pilot has a classified race result.
    pub best_position: Option<i32>,
    #[serde(rename = "polePosition")]
    pub pole_positions: u32,
}

impl PilotStats {
    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a ResultWithRace>,
    {
        results.into_iter().fold(Self::default(), |mut stats, row| {
            stats.add(row);
            stats
        })
    }

    /// Folds one result into the counters. Points always count; positions
    /// only for results whose session is classified.
    pub fn add(&mut self, row: &ResultWithRace) {
        let result = &row.result.content;
        self.total_points += result.points_or_zero();

        let position = result.race_position.filter(|position| *position > 0);
        match (row.session_kind(), position) {
            (Some(SessionKind::Race), Some(position)) => {
                self.total_races += 1;
                if position <= 3 {
                    self.podiums += 1;
                }
                if position == 1 {
                    self.wins += 1;
                }
                self.best_position = Some(
                    self.best_position
                        .map_or(position, |best| best.min(position)),
                );
            }
            (Some(SessionKind::Qualifying), Some(1)) => {
                self.pole_positions += 1;
            }
            _ => {}
        }
    }
}

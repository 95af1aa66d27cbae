use chrono::NaiveDate;
use model::{
    result::{RaceResult, RaceSummary, ResultWithRace, SessionSummary},
    RowId, WithId,
};
use utility::id::Id;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Builds a joined result row. `race` is `(race id, date)`, `session` is
/// `(session id, session name)`.
pub fn row(
    id: RowId,
    pilot: RowId,
    race: Option<(RowId, NaiveDate)>,
    session: Option<(RowId, &str)>,
    position: Option<i32>,
    points: Option<f64>,
) -> ResultWithRace {
    ResultWithRace {
        result: WithId::new(
            Id::new(id),
            RaceResult {
                race_id: Id::new(race.map(|(race_id, _)| race_id).unwrap_or(0)),
                pilot_id: Id::new(pilot),
                session_id: session.map(|(session_id, _)| Id::new(session_id)),
                race_position: position,
                points,
                best_lap: None,
            },
        ),
        race: race.map(|(race_id, date)| RaceSummary {
            id: Id::new(race_id),
            name: Some(format!("Carrera {race_id}")),
            date,
        }),
        session: session.map(|(session_id, name)| SessionSummary {
            id: Some(Id::new(session_id)),
            name: Some(name.to_owned()),
            session_type: None,
        }),
    }
}

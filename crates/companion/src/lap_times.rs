use model::{
    lap_time::LapTime,
    pilot::Pilot,
    race::Race,
    session::Session,
    WithId,
};
use serde::{Deserialize, Serialize};
use utility::{
    id::Id,
    lap_time::{format_lap_time, parse_lap_time},
};

use crate::{repo::LeagueRepo, RequestError, RequestResult};

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lap {
    pub id: Id<LapTime>,
    pub lap_number: i32,
    pub time: String,
    /// `None` when the stored time can not be parsed.
    pub millis: Option<u32>,
    /// Gap to the best lap of the sheet.
    pub delta_millis: Option<u32>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LapSheet {
    pub pilot_id: Id<Pilot>,
    pub race_id: Id<Race>,
    /// By lap number.
    pub laps: Vec<Lap>,
    pub best_lap: Option<Id<LapTime>>,
}

/// The laps a pilot recorded in one race.
pub async fn load_lap_times<R>(
    repo: &R,
    pilot: Id<Pilot>,
    race: Id<Race>,
) -> RequestResult<LapSheet>
where
    R: LeagueRepo + ?Sized,
{
    let mut rows = repo.lap_times(pilot, race).await?;
    rows.sort_by_key(|row| (row.content.lap_number, row.id));

    let timed = rows
        .iter()
        .filter_map(|row| row.content.millis().map(|millis| (row.id, millis)))
        .collect::<Vec<_>>();
    let best = timed
        .iter()
        .min_by_key(|(id, millis)| (*millis, *id))
        .copied();
    for row in &rows {
        if row.content.millis().is_none() {
            log::warn!("lap time {} has an unreadable time {:?}", row.id, row.content.time);
        }
    }

    let laps = rows
        .into_iter()
        .map(|row| {
            let millis = row.content.millis();
            Lap {
                id: row.id,
                lap_number: row.content.lap_number,
                delta_millis: millis
                    .zip(best)
                    .map(|(millis, (_, best))| millis - best),
                millis,
                time: row.content.time,
            }
        })
        .collect();

    Ok(LapSheet {
        pilot_id: pilot,
        race_id: race,
        laps,
        best_lap: best.map(|(id, _)| id),
    })
}

/// A lap time as typed in by a pilot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LapTimeEntry {
    pub pilot_id: Id<Pilot>,
    pub race_id: Id<Race>,
    pub session_id: Option<Id<Session>>,
    pub lap_number: i32,
    pub time: String,
}

impl LapTimeEntry {
    /// Checks the entry and brings the time into `m:ss.fff` form.
    pub fn validate(&self) -> RequestResult<LapTime> {
        if self.lap_number <= 0 {
            return Err(RequestError::Invalid(format!(
                "Lap number must be positive, got {}.",
                self.lap_number
            )));
        }
        let millis = parse_lap_time(&self.time).ok_or_else(|| {
            RequestError::Invalid(format!(
                "\"{}\" is not a lap time. Use the form 0:53.412.",
                self.time.trim()
            ))
        })?;
        Ok(LapTime {
            race_id: self.race_id,
            pilot_id: self.pilot_id,
            session_id: self.session_id,
            lap_number: self.lap_number,
            time: format_lap_time(millis),
        })
    }
}

/// Validates and stores a lap time. Nothing is sent when validation fails.
pub async fn submit_lap_time<R>(repo: &R, entry: &LapTimeEntry) -> RequestResult<WithId<LapTime>>
where
    R: LeagueRepo + ?Sized,
{
    let lap = entry.validate()?;
    let row = repo.insert_lap_time(&lap).await?;
    log::info!(
        "stored lap {} of pilot {} in race {} as {}",
        row.content.lap_number,
        row.content.pilot_id,
        row.content.race_id,
        row.id
    );
    Ok(row)
}

use serde::{Deserialize, Serialize};
use utility::{
    id::{HasId, Id},
    lap_time::parse_lap_time,
};

use crate::{pilot::Pilot, race::Race, session::Session, RowId};

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapTime {
    pub race_id: Id<Race>,
    pub pilot_id: Id<Pilot>,
    pub session_id: Option<Id<Session>>,
    pub lap_number: i32,
    /// As entered, e.g. `0:53.412`.
    pub time: String,
}

impl HasId for LapTime {
    type IdType = RowId;
}

impl LapTime {
    pub fn millis(&self) -> Option<u32> {
        parse_lap_time(&self.time)
    }
}

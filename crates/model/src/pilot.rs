use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::{team::Team, ExampleData, RowId};

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pilot {
    pub name: String,
    pub number: Option<i32>,
    /// The team the pilot currently drives for. Season-bound membership is
    /// kept in `PilotTeamSeason`.
    pub team_id: Option<Id<Team>>,
    /// Owning auth user.
    pub user_id: Option<String>,
    pub avatar_url: Option<String>,
}

impl HasId for Pilot {
    type IdType = RowId;
}

impl ExampleData for Pilot {
    fn example_data() -> Self {
        Self {
            name: "Lucía Ortega".to_owned(),
            number: Some(27),
            team_id: Some(Id::new(1)),
            user_id: Some("6b1f0d7e-user".to_owned()),
            avatar_url: None,
        }
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::{circuit::Circuit, season::League, ExampleData, RowId};

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Race {
    pub name: String,
    #[serde(with = "utility::date::lenient")]
    pub date: NaiveDate,
    pub circuit_id: Option<Id<Circuit>>,
    pub league_id: Id<League>,
}

impl HasId for Race {
    type IdType = RowId;
}

impl ExampleData for Race {
    fn example_data() -> Self {
        Self {
            name: "Gran Premio de Chiva".to_owned(),
            date: NaiveDate::from_ymd_opt(2024, 4, 13).unwrap_or_default(),
            circuit_id: Some(Id::new(1)),
            league_id: Id::new(1),
        }
    }
}

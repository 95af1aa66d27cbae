use serde::{Deserialize, Serialize};
use utility::id::HasId;

use crate::{ExampleData, RowId};

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    #[serde(alias = "logo")]
    pub logo_url: Option<String>,
}

impl HasId for Team {
    type IdType = RowId;
}

impl ExampleData for Team {
    fn example_data() -> Self {
        Self {
            name: "Escudería Norte".to_owned(),
            logo_url: Some("https://cdn.example.org/teams/norte.png".to_owned()),
        }
    }
}

use serde::{Deserialize, Serialize};
use utility::id::HasId;

use crate::{ExampleData, RowId};

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    pub name: String,
    pub location: Option<String>,
    /// Track length in meters.
    pub length: Option<f64>,
    pub turns: Option<i32>,
    pub lap_record_holder: Option<String>,
    pub lap_record_time: Option<String>,
    pub image_url: Option<String>,
}

impl HasId for Circuit {
    type IdType = RowId;
}

impl ExampleData for Circuit {
    fn example_data() -> Self {
        Self {
            name: "Kartódromo de Lucas Guerrero".to_owned(),
            location: Some("Chiva, Valencia".to_owned()),
            length: Some(1428.0),
            turns: Some(14),
            lap_record_holder: Some("Pablo Sanz".to_owned()),
            lap_record_time: Some("0:52.871".to_owned()),
            image_url: None,
        }
    }
}

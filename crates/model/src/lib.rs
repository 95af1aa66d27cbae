use std::fmt::Debug;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
pub use serde_with;
use utility::id::{HasId, Id};

pub mod circuit;
pub mod lap_time;
pub mod pilot;
pub mod race;
pub mod result;
pub mod season;
pub mod session;
pub mod team;

/// Raw id type of every table in the league backend.
pub type RowId = i64;

pub trait ExampleData {
    fn example_data() -> Self;
}

/// A row as returned by the backend: the id column next to the content
/// columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithId<V>
where
    V: HasId,
    V::IdType: Serialize + DeserializeOwned + Debug + Clone + PartialEq,
{
    pub id: Id<V>,
    #[serde(flatten)]
    pub content: V,
}

impl<V> WithId<V>
where
    V: HasId,
    V::IdType: Serialize + DeserializeOwned + Debug + Clone + PartialEq,
{
    pub fn new(id: Id<V>, content: V) -> Self {
        Self { id, content }
    }
}

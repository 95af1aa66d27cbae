use std::fmt;

use serde::{Deserialize, Serialize};
use utility::id::HasId;

use crate::RowId;

/// A sub-event of a race, e.g. "Clasificación" or "Carrera 1".
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub name: String,
    /// Explicit session type, when the row carries one.
    pub session_type: Option<String>,
}

impl HasId for Session {
    type IdType = RowId;
}

impl Session {
    pub fn kind(&self) -> Option<SessionKind> {
        SessionKind::classify(self.session_type.as_deref(), Some(&self.name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Practice,
    Qualifying,
    Race,
    Sprint,
}

impl SessionKind {
    /// Parses the explicit `session_type` column.
    pub fn from_type(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "practice" => Some(Self::Practice),
            "qualifying" => Some(Self::Qualifying),
            "race" => Some(Self::Race),
            "sprint" => Some(Self::Sprint),
            _ => None,
        }
    }

    /// Classifies a free-text session name by case-insensitive substring.
    /// Qualifying is checked before race, and race before sprint, so that
    /// "Carrera Sprint" still counts as a race.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        if name.contains("clasificación") {
            Some(Self::Qualifying)
        } else if name.contains("carrera") {
            Some(Self::Race)
        } else if name.contains("sprint") {
            Some(Self::Sprint)
        } else if ["libre", "práctica", "practica", "entrenamiento"]
            .iter()
            .any(|pattern| name.contains(pattern))
        {
            Some(Self::Practice)
        } else {
            None
        }
    }

    /// The explicit type wins when it is recognised; the name is the fallback.
    pub fn classify(session_type: Option<&str>, name: Option<&str>) -> Option<Self> {
        session_type
            .and_then(Self::from_type)
            .or_else(|| name.and_then(Self::from_name))
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Practice => write!(f, "practice"),
            Self::Qualifying => write!(f, "qualifying"),
            Self::Race => write!(f, "race"),
            Self::Sprint => write!(f, "sprint"),
        }
    }
}

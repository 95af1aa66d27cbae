//! Standings and statistics computed client-side from fetched result rows.
//!
//! Everything in this crate is a pure function over rows that were already
//! retrieved; nothing here talks to the backend.

use serde::Serialize;

pub mod roster;
pub mod series;
pub mod stats;
pub mod table;

#[cfg(test)]
pub(crate) mod fixtures;

/// One point of a chart series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub label: String,
    pub value: i32,
}

/// A chart series in race order. An absent series is represented by
/// `Option::None` at the call site, never by an empty `Series`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    points: Vec<SeriesPoint>,
}

impl Series {
    /// Returns `None` for an empty list of points.
    pub fn from_points(points: Vec<SeriesPoint>) -> Option<Self> {
        if points.is_empty() {
            None
        } else {
            Some(Self { points })
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|point| point.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<i32> {
        self.points.iter().map(|point| point.value).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

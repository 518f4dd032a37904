//! Data models for places and the sort orders applied to them.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A point of interest with a name and a numeric rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Place {
    /// Create a place with only the fields needed for sorting
    #[allow(dead_code)] // Used in tests
    pub fn new(name: impl Into<String>, rating: f64) -> Self {
        Place {
            id: None,
            name: name.into(),
            rating,
            address: None,
            category: None,
            updated_at: None,
        }
    }

    /// Rating formatted for display (one decimal place)
    pub fn rating_label(&self) -> String {
        if self.rating.is_finite() {
            format!("{:.1}", self.rating)
        } else {
            "-".to_string()
        }
    }
}

/// The two supported orderings of the place list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    ByName,
    /// Rating descending, name ascending among equal ratings
    #[default]
    ByRating,
}

impl SortMode {
    /// Integer code stored in the preference table
    pub fn code(self) -> i64 {
        match self {
            SortMode::ByName => 0,
            SortMode::ByRating => 1,
        }
    }

    /// Map a stored code back to a mode. Unknown codes yield `None`.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(SortMode::ByName),
            1 => Some(SortMode::ByRating),
            _ => None,
        }
    }

    /// Title of the menu action that selects this mode
    pub fn action_title(self) -> &'static str {
        match self {
            SortMode::ByName => "Sort by name",
            SortMode::ByRating => "Sort by rating",
        }
    }

    pub const ALL: [SortMode; 2] = [SortMode::ByName, SortMode::ByRating];
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortMode::ByName => write!(f, "Name"),
            SortMode::ByRating => write!(f, "Rating"),
        }
    }
}

fn by_name(a: &Place, b: &Place) -> Ordering {
    a.name.cmp(&b.name)
}

fn by_rating_desc(a: &Place, b: &Place) -> Ordering {
    b.rating.total_cmp(&a.rating)
}

/// Sort a place slice in place. Both passes are stable, so `ByRating`
/// leaves name order intact among equal ratings.
fn sort_places(places: &mut [Place], mode: SortMode) {
    places.sort_by(by_name);
    if mode == SortMode::ByRating {
        places.sort_by(by_rating_desc);
    }
}

/// Return a new sequence ordered by `mode`, leaving the input untouched
pub fn sorted_sequence(places: &[Place], mode: SortMode) -> Vec<Place> {
    let mut sorted = places.to_vec();
    sort_places(&mut sorted, mode);
    sorted
}

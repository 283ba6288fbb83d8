//! Availability classification of course runs relative to "now".

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Runs starting within this many days are "starting soon" rather than "upcoming".
pub const STARTING_SOON_DAYS: i64 = 60;

/// Availability bucket of a course run. Every run falls in exactly one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Archived,
    Current,
    StartingSoon,
    Upcoming,
}

impl Availability {
    pub const ALL: [Availability; 4] = [
        Availability::Archived,
        Availability::Current,
        Availability::StartingSoon,
        Availability::Upcoming,
    ];

    /// Classify a run by its start and end dates.
    pub fn classify(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        if end.is_some_and(|end| end <= now) {
            return Availability::Archived;
        }

        match start {
            Some(start) if start <= now => Availability::Current,
            Some(start) if start < now + Duration::days(STARTING_SOON_DAYS) => {
                Availability::StartingSoon
            }
            _ => Availability::Upcoming,
        }
    }

    /// Display label, as rendered in search results.
    pub fn label(self) -> &'static str {
        match self {
            Availability::Archived => "Archived",
            Availability::Current => "Current",
            Availability::StartingSoon => "Starting Soon",
            Availability::Upcoming => "Upcoming",
        }
    }

    /// Name of the query facet selecting this bucket.
    pub fn facet_name(self) -> &'static str {
        match self {
            Availability::Archived => "availability_archived",
            Availability::Current => "availability_current",
            Availability::StartingSoon => "availability_starting_soon",
            Availability::Upcoming => "availability_upcoming",
        }
    }

    pub fn from_facet_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.facet_name() == name)
    }
}

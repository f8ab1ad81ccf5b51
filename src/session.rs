//! Session Catalogue - Closed Set of Addressable Sessions
//!
//! Metadata here only feeds the encoded payload. It never affects eligibility.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    ExhibitionDay1,
    ExhibitionDay2,
    ExhibitionBothDays,
    InteractiveSessions,
    Plenary,
}

/// Immutable per-session details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionDetails {
    pub name: &'static str,
    pub date: &'static str,
    pub time_start: &'static str,
    pub time_end: &'static str,
    pub venue: &'static str,
}

const EXHIBITION_HALL: &str = "Exhibition Hall, Manekshaw Centre";
const ZORAWAR_HALL: &str = "Zorawar Hall, Manekshaw Centre";

impl SessionKind {
    pub const ALL: [SessionKind; 5] = [
        SessionKind::ExhibitionDay1,
        SessionKind::ExhibitionDay2,
        SessionKind::ExhibitionBothDays,
        SessionKind::InteractiveSessions,
        SessionKind::Plenary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::ExhibitionDay1 => "exhibition_day1",
            SessionKind::ExhibitionDay2 => "exhibition_day2",
            SessionKind::ExhibitionBothDays => "exhibition_both_days",
            SessionKind::InteractiveSessions => "interactive_sessions",
            SessionKind::Plenary => "plenary",
        }
    }

    pub fn details(&self) -> &'static SessionDetails {
        match self {
            SessionKind::ExhibitionDay1 => &SessionDetails {
                name: "Exhibition - 25 Nov",
                date: "2025-11-25",
                time_start: "1000",
                time_end: "1730",
                venue: EXHIBITION_HALL,
            },
            SessionKind::ExhibitionDay2 => &SessionDetails {
                name: "Exhibition - 26 Nov",
                date: "2025-11-26",
                time_start: "1000",
                time_end: "1730",
                venue: EXHIBITION_HALL,
            },
            SessionKind::ExhibitionBothDays => &SessionDetails {
                name: "Exhibition - 25 & 26 Nov",
                date: "2025-11-25 to 2025-11-26",
                time_start: "1000",
                time_end: "1730",
                venue: EXHIBITION_HALL,
            },
            SessionKind::InteractiveSessions => &SessionDetails {
                name: "Interactive Sessions I & II - 26 Nov",
                date: "2025-11-26",
                time_start: "1030",
                time_end: "1330",
                venue: ZORAWAR_HALL,
            },
            SessionKind::Plenary => &SessionDetails {
                name: "Plenary Session - 25 Nov",
                date: "2025-11-25",
                time_start: "1500",
                time_end: "1700",
                venue: ZORAWAR_HALL,
            },
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str_matches_serde() {
        for kind in SessionKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_every_kind_has_venue() {
        for kind in SessionKind::ALL {
            let d = kind.details();
            assert!(!d.name.is_empty());
            assert!(d.venue.ends_with("Manekshaw Centre"));
        }
    }
}

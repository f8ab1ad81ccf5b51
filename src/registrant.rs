//! Registrant Snapshot - Externally Owned Input
//!
//! The storage layer owns registrants. The engine only ever sees a snapshot.

use serde::{Deserialize, Serialize};

pub type RegistrantId = u64;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Exhibitor,
    #[default]
    Visitor,
}

/// The four independent entitlement flags as stored upstream.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entitlements {
    #[serde(default)]
    pub exhibition_day1: bool,
    #[serde(default)]
    pub exhibition_day2: bool,
    #[serde(default)]
    pub interactive_sessions: bool,
    #[serde(default)]
    pub plenary: bool,
}

impl Entitlements {
    pub fn count(&self) -> usize {
        [
            self.exhibition_day1,
            self.exhibition_day2,
            self.interactive_sessions,
            self.plenary,
        ]
        .iter()
        .filter(|f| **f)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registrant {
    pub id: RegistrantId,
    pub name: String,
    pub id_type: String,
    pub id_number: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub category: Category,
    #[serde(flatten)]
    pub entitlements: Entitlements,
}

impl Registrant {
    pub fn is_exhibitor(&self) -> bool {
        self.category == Category::Exhibitor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_flat_flags() {
        let json = r#"{
            "id": 7,
            "name": "Asha Rao",
            "id_type": "Aadhaar",
            "id_number": "111122223333",
            "category": "visitor",
            "exhibition_day1": true,
            "plenary": true
        }"#;
        let r: Registrant = serde_json::from_str(json).unwrap();
        assert_eq!(r.id, 7);
        assert!(r.entitlements.exhibition_day1);
        assert!(r.entitlements.plenary);
        assert!(!r.entitlements.exhibition_day2);
        assert_eq!(r.entitlements.count(), 2);
        assert!(!r.is_exhibitor());
    }

    #[test]
    fn test_unknown_category_rejected() {
        let json = r#"{"id": 1, "name": "X", "id_type": "PAN", "id_number": "ABCDE1234F", "category": "vip"}"#;
        assert!(serde_json::from_str::<Registrant>(json).is_err());
    }

    #[test]
    fn test_category_defaults_to_visitor() {
        let json = r#"{"id": 1, "name": "X", "id_type": "PAN", "id_number": "ABCDE1234F"}"#;
        let r: Registrant = serde_json::from_str(json).unwrap();
        assert_eq!(r.category, Category::Visitor);
        assert!(r.entitlements.is_empty());
    }
}

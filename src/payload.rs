//! Payload Encoder - Advisory Plaintext Carried by a Pass
//!
//! The text is human readable and deterministic. It is not a security token.

use crate::registrant::Registrant;
use crate::session::SessionKind;

pub const DEFAULT_EVENT_LABEL: &str = "SWAVLAMBAN 2025 ENTRY PASS";
pub const DISCLAIMER: &str = "Valid for entry on specified date and session only.";

const ID_CHUNK: usize = 4;
const ID_SEPARATOR: char = '-';

/// Group an id number into fixed-width chunks joined by `-`.
///
/// Scanner apps tend to turn long digit runs into phone-number links;
/// a non-space separator breaks that up while staying readable.
pub fn format_id_number(raw: &str) -> String {
    let chars: Vec<char> = normalize_id_number(raw).chars().collect();
    if chars.len() <= ID_CHUNK {
        return chars.into_iter().collect();
    }
    chars
        .chunks(ID_CHUNK)
        .map(|c| c.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(&ID_SEPARATOR.to_string())
}

/// Strip whitespace and existing separators typed by data-entry staff.
pub fn normalize_id_number(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != ID_SEPARATOR)
        .collect()
}

pub fn encode(registrant: &Registrant, kind: SessionKind, event_label: &str) -> String {
    let session = kind.details();
    let lines = [
        event_label.to_string(),
        String::new(),
        format!("Name: {}", registrant.name.trim()),
        format!("ID Type: {}", registrant.id_type.trim()),
        format!("ID Number: {}", format_id_number(&registrant.id_number)),
        String::new(),
        format!("Session: {}", session.name),
        format!("Venue: {}", session.venue),
        String::new(),
        DISCLAIMER.to_string(),
    ];
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registrant::{Category, Entitlements};

    fn registrant() -> Registrant {
        Registrant {
            id: 42,
            name: "Asha Rao".to_string(),
            id_type: "Aadhaar".to_string(),
            id_number: "111122223333".to_string(),
            phone: None,
            email: None,
            category: Category::Visitor,
            entitlements: Entitlements::default(),
        }
    }

    #[test]
    fn test_format_id_number_groups() {
        assert_eq!(format_id_number("111122223333"), "1111-2222-3333");
        assert_eq!(format_id_number("ABCDE1234F"), "ABCD-E123-4F");
        assert_eq!(format_id_number("1234"), "1234");
        assert_eq!(format_id_number("12345"), "1234-5");
    }

    #[test]
    fn test_format_id_number_is_idempotent() {
        let once = format_id_number("1111 2222 3333");
        assert_eq!(once, "1111-2222-3333");
        assert_eq!(format_id_number(&once), once);
    }

    #[test]
    fn test_encode_layout() {
        let text = encode(&registrant(), SessionKind::Plenary, DEFAULT_EVENT_LABEL);
        let expected = "SWAVLAMBAN 2025 ENTRY PASS\n\
                        \n\
                        Name: Asha Rao\n\
                        ID Type: Aadhaar\n\
                        ID Number: 1111-2222-3333\n\
                        \n\
                        Session: Plenary Session - 25 Nov\n\
                        Venue: Zorawar Hall, Manekshaw Centre\n\
                        \n\
                        Valid for entry on specified date and session only.";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_encode_deterministic() {
        let r = registrant();
        let a = encode(&r, SessionKind::ExhibitionDay1, DEFAULT_EVENT_LABEL);
        let b = encode(&r, SessionKind::ExhibitionDay1, DEFAULT_EVENT_LABEL);
        assert_eq!(a, b);
        assert!(!a.contains("111122223333"));
    }
}

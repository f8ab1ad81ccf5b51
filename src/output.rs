//! Output Store - Deterministic Names in a Shared Directory
//!
//! Names are a pure function of registrant identity and session kind, so a
//! retry overwrites instead of duplicating and concurrent registrants never
//! collide.

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

use crate::registrant::Registrant;
use crate::session::SessionKind;

/// Byte budget for the name part of a file name. The id and kind suffix keeps
/// truncated names unique, and the whole name well under the 255-byte limit.
pub const MAX_NAME_BYTES: usize = 100;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("Generated file not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Make a display name safe to embed in a file name.
pub fn sanitize_name(name: &str) -> String {
    let safe: String = name
        .trim()
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            c if c.is_whitespace() => '_',
            '/' | '\\' => '-',
            c => c,
        })
        .collect();
    let safe = truncate_on_char_boundary(safe, MAX_NAME_BYTES);
    if safe.is_empty() || safe.chars().all(|c| c == '.') {
        "registrant".to_string()
    } else {
        safe
    }
}

fn truncate_on_char_boundary(mut s: String, max_bytes: usize) -> String {
    if s.len() > max_bytes {
        let mut end = max_bytes;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        s.truncate(end);
    }
    s
}

pub fn output_filename(registrant: &Registrant, kind: SessionKind) -> String {
    format!("{}_{}_{}.png", sanitize_name(&registrant.name), registrant.id, kind.as_str())
}

#[derive(Debug, Clone)]
pub struct OutputStore {
    dir: PathBuf,
}

impl OutputStore {
    /// Open the store, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, OutputError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn pass_path(&self, registrant: &Registrant, kind: SessionKind) -> PathBuf {
        self.dir.join(output_filename(registrant, kind))
    }

    /// Look up a previously generated file by bare name, for download.
    pub fn resolve(&self, filename: &str) -> Result<PathBuf, OutputError> {
        let mut components = Path::new(filename).components();
        let is_plain = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !is_plain || filename.contains('\\') {
            return Err(OutputError::InvalidName(filename.to_string()));
        }

        let path = self.dir.join(filename);
        if path.is_file() {
            Ok(path)
        } else {
            Err(OutputError::NotFound(filename.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registrant::{Category, Entitlements};

    fn registrant(name: &str) -> Registrant {
        Registrant {
            id: 17,
            name: name.to_string(),
            id_type: "PAN".to_string(),
            id_number: "ABCDE1234F".to_string(),
            phone: None,
            email: None,
            category: Category::Visitor,
            entitlements: Entitlements::default(),
        }
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("Asha Rao"), "Asha_Rao");
        assert_eq!(sanitize_name("M/s Tata\\Steel"), "M-s_Tata-Steel");
        assert_eq!(sanitize_name("  "), "registrant");
        assert_eq!(sanitize_name(".."), "registrant");
        assert_eq!(sanitize_name("a\u{7}b"), "ab");
    }

    #[test]
    fn test_sanitize_name_caps_length_on_char_boundary() {
        let long = "\u{905}".repeat(85);
        let safe = sanitize_name(&long);
        assert!(safe.len() <= MAX_NAME_BYTES);
        // Three-byte chars: 33 fit in the budget.
        assert_eq!(safe, "\u{905}".repeat(33));
        assert_eq!(sanitize_name(&"a".repeat(300)), "a".repeat(MAX_NAME_BYTES));

        let r = registrant(&long);
        let name = output_filename(&r, SessionKind::ExhibitionBothDays);
        assert!(name.len() < 255);
        assert!(name.ends_with("_17_exhibition_both_days.png"));
        assert_eq!(name, output_filename(&r, SessionKind::ExhibitionBothDays));
    }

    #[test]
    fn test_filename_is_pure() {
        let r = registrant("Asha Rao");
        let a = output_filename(&r, SessionKind::Plenary);
        let b = output_filename(&r, SessionKind::Plenary);
        assert_eq!(a, "Asha_Rao_17_plenary.png");
        assert_eq!(a, b);
        assert_ne!(a, output_filename(&r, SessionKind::ExhibitionDay1));
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = OutputStore::open(dir.path().join("out")).unwrap();
        for bad in ["../secret.png", "a/b.png", "/etc/passwd", "..", "a\\b.png", ""] {
            assert!(matches!(store.resolve(bad), Err(OutputError::InvalidName(_))), "{bad}");
        }
    }

    #[test]
    fn test_resolve_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = OutputStore::open(dir.path()).unwrap();
        assert!(matches!(store.resolve("x.png"), Err(OutputError::NotFound(_))));
        std::fs::write(dir.path().join("x.png"), b"png").unwrap();
        assert_eq!(store.resolve("x.png").unwrap(), dir.path().join("x.png"));
    }
}

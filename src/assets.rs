//! Asset Library - Filename Conventions Over a Read-Only Tree
//!
//! The directory layout is external configuration; this module only maps
//! artifact kinds to paths and answers existence questions.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::eligibility::{ArtifactKind, InvitationKind, ScheduleKind};
use crate::session::SessionKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassTemplates {
    pub exhibition_day1: String,
    pub exhibition_day2: String,
    pub exhibition_both_days: String,
    pub interactive_sessions: String,
    pub plenary: String,
}

impl Default for PassTemplates {
    fn default() -> Self {
        Self {
            exhibition_day1: "EP-25.png".to_string(),
            exhibition_day2: "EP-26.png".to_string(),
            exhibition_both_days: "EP-25n26.png".to_string(),
            interactive_sessions: "EP-INTERACTIVE.png".to_string(),
            plenary: "EP-PLENARY.png".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvitationFiles {
    pub exhibitor: String,
    pub day1_morning: String,
    pub plenary_afternoon: String,
    pub interactive: String,
    pub day2_exhibition: String,
}

impl Default for InvitationFiles {
    fn default() -> Self {
        Self {
            exhibitor: "Inv-Exhibitors.png".to_string(),
            day1_morning: "Inv-25.png".to_string(),
            plenary_afternoon: "Inv-Plenary.png".to_string(),
            interactive: "Inv-Interactive.png".to_string(),
            day2_exhibition: "Inv-26-Exhibition.png".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleFiles {
    pub day1_full: String,
    pub day1_plenary: String,
    pub day2: String,
}

impl Default for ScheduleFiles {
    fn default() -> Self {
        Self {
            day1_full: "EF-25.png".to_string(),
            day1_plenary: "EF-PM25.png".to_string(),
            day2: "EF26.png".to_string(),
        }
    }
}

/// Directory names and per-kind filenames inside the asset root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetLayout {
    pub passes_dir: String,
    pub invitation_dir: String,
    pub schedule_dir: String,
    pub passes: PassTemplates,
    pub invitations: InvitationFiles,
    pub schedules: ScheduleFiles,
}

impl Default for AssetLayout {
    fn default() -> Self {
        Self {
            passes_dir: "Passes".to_string(),
            invitation_dir: "Invitation".to_string(),
            schedule_dir: "EF".to_string(),
            passes: PassTemplates::default(),
            invitations: InvitationFiles::default(),
            schedules: ScheduleFiles::default(),
        }
    }
}

impl AssetLayout {
    pub fn pass_template(&self, kind: SessionKind) -> &str {
        let p = &self.passes;
        match kind {
            SessionKind::ExhibitionDay1 => &p.exhibition_day1,
            SessionKind::ExhibitionDay2 => &p.exhibition_day2,
            SessionKind::ExhibitionBothDays => &p.exhibition_both_days,
            SessionKind::InteractiveSessions => &p.interactive_sessions,
            SessionKind::Plenary => &p.plenary,
        }
    }

    pub fn invitation_file(&self, kind: InvitationKind) -> &str {
        let i = &self.invitations;
        match kind {
            InvitationKind::Exhibitor => &i.exhibitor,
            InvitationKind::Day1Morning => &i.day1_morning,
            InvitationKind::PlenaryAfternoon => &i.plenary_afternoon,
            InvitationKind::Interactive => &i.interactive,
            InvitationKind::Day2Exhibition => &i.day2_exhibition,
        }
    }

    pub fn schedule_file(&self, kind: ScheduleKind) -> &str {
        let s = &self.schedules;
        match kind {
            ScheduleKind::Day1Full => &s.day1_full,
            ScheduleKind::Day1Plenary => &s.day1_plenary,
            ScheduleKind::Day2 => &s.day2,
        }
    }
}

/// One row of an asset inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetEntry {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub present: bool,
}

/// Asset library - resolves references against the asset root
#[derive(Debug, Clone)]
pub struct AssetLibrary {
    root: PathBuf,
    layout: AssetLayout,
}

impl AssetLibrary {
    pub fn new(root: impl Into<PathBuf>, layout: AssetLayout) -> Self {
        Self {
            root: root.into(),
            layout,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn layout(&self) -> &AssetLayout {
        &self.layout
    }

    pub fn pass_template_path(&self, template_ref: &str) -> PathBuf {
        self.root.join(&self.layout.passes_dir).join(template_ref)
    }

    pub fn invitation_path(&self, file_ref: &str) -> PathBuf {
        self.root.join(&self.layout.invitation_dir).join(file_ref)
    }

    pub fn schedule_path(&self, file_ref: &str) -> PathBuf {
        self.root.join(&self.layout.schedule_dir).join(file_ref)
    }

    /// Path for any artifact kind under the configured layout
    pub fn path_for(&self, kind: ArtifactKind) -> PathBuf {
        match kind {
            ArtifactKind::Pass(k) => self.pass_template_path(self.layout.pass_template(k)),
            ArtifactKind::Invitation(k) => self.invitation_path(self.layout.invitation_file(k)),
            ArtifactKind::Schedule(k) => self.schedule_path(self.layout.schedule_file(k)),
        }
    }

    /// Return the path only if it names an existing file.
    pub fn locate(path: PathBuf) -> Option<PathBuf> {
        if path.is_file() {
            Some(path)
        } else {
            None
        }
    }

    pub fn inventory(&self) -> Vec<AssetEntry> {
        let kinds = SessionKind::ALL
            .into_iter()
            .map(ArtifactKind::Pass)
            .chain(InvitationKind::ALL.into_iter().map(ArtifactKind::Invitation))
            .chain(ScheduleKind::ALL.into_iter().map(ArtifactKind::Schedule));

        kinds
            .map(|kind| {
                let path = self.path_for(kind);
                let present = path.is_file();
                AssetEntry { kind, path, present }
            })
            .collect()
    }

    pub fn missing(&self) -> Vec<AssetEntry> {
        self.inventory().into_iter().filter(|e| !e.present).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_layout_partial_override() {
        let layout: AssetLayout = toml::from_str(
            r#"
            passes_dir = "templates"

            [passes]
            plenary = "PLENARY-2026.png"
            "#,
        )
        .unwrap();
        assert_eq!(layout.passes_dir, "templates");
        assert_eq!(layout.pass_template(SessionKind::Plenary), "PLENARY-2026.png");
        assert_eq!(layout.pass_template(SessionKind::ExhibitionDay1), "EP-25.png");
        assert_eq!(layout.schedule_dir, "EF");
    }

    #[test]
    fn test_inventory_reports_presence() {
        let dir = tempfile::tempdir().unwrap();
        let lib = AssetLibrary::new(dir.path(), AssetLayout::default());
        fs::create_dir_all(dir.path().join("EF")).unwrap();
        fs::write(dir.path().join("EF").join("EF26.png"), b"x").unwrap();

        let inventory = lib.inventory();
        assert_eq!(inventory.len(), 13);

        let day2 = inventory
            .iter()
            .find(|e| e.kind == ArtifactKind::Schedule(ScheduleKind::Day2))
            .unwrap();
        assert!(day2.present);
        assert_eq!(lib.missing().len(), 12);
    }

    #[test]
    fn test_locate_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AssetLibrary::locate(dir.path().to_path_buf()).is_none());
        assert!(AssetLibrary::locate(dir.path().join("nope.png")).is_none());
    }
}

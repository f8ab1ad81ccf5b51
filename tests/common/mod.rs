//! Shared fixtures: a scratch asset tree with synthesized templates.

#![allow(dead_code)]

use image::{Rgb, RgbImage};
use std::fs;
use std::io::BufWriter;
use std::path::Path;
use tempfile::TempDir;

use passforge_core::{
    AssetLayout, Category, Entitlements, GeneratorConfig, InvitationKind, PassGenerator,
    Registrant, ScheduleKind, SessionKind,
};

pub const NAVY: Rgb<u8> = Rgb([10, 20, 90]);
pub const CREAM: Rgb<u8> = Rgb([240, 230, 200]);

pub struct Fixture {
    pub dir: TempDir,
    pub config: GeneratorConfig,
}

impl Fixture {
    /// Every template and attachment present.
    pub fn full() -> Self {
        let fixture = Self::empty();
        for kind in SessionKind::ALL {
            fixture.write_template(kind, 1500, 900);
        }
        for kind in InvitationKind::ALL {
            fixture.write_invitation(kind);
        }
        for kind in ScheduleKind::ALL {
            fixture.write_schedule(kind);
        }
        fixture
    }

    pub fn empty() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig {
            assets_dir: dir.path().join("images"),
            output_dir: dir.path().join("generated_passes"),
            ..GeneratorConfig::default()
        };
        let layout = &config.layout;
        for sub in [&layout.passes_dir, &layout.invitation_dir, &layout.schedule_dir] {
            fs::create_dir_all(config.assets_dir.join(sub)).unwrap();
        }
        Self { dir, config }
    }

    pub fn layout(&self) -> &AssetLayout {
        &self.config.layout
    }

    pub fn template_path(&self, kind: SessionKind) -> std::path::PathBuf {
        self.config
            .assets_dir
            .join(&self.layout().passes_dir)
            .join(self.layout().pass_template(kind))
    }

    pub fn write_template(&self, kind: SessionKind, width: u32, height: u32) {
        let colour = match kind {
            SessionKind::InteractiveSessions | SessionKind::Plenary => CREAM,
            _ => NAVY,
        };
        RgbImage::from_pixel(width, height, colour)
            .save(self.template_path(kind))
            .unwrap();
    }

    /// Palette-based template: navy and cream stripes.
    pub fn write_indexed_template(&self, kind: SessionKind, width: u32, height: u32) {
        let file = fs::File::create(self.template_path(kind)).unwrap();
        let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_palette(vec![NAVY[0], NAVY[1], NAVY[2], CREAM[0], CREAM[1], CREAM[2]]);

        let indices: Vec<u8> = (0..height)
            .flat_map(|y| (0..width).map(move |_| (y / 10 % 2) as u8))
            .collect();
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&indices).unwrap();
        writer.finish().unwrap();
    }

    pub fn remove_template(&self, kind: SessionKind) {
        fs::remove_file(self.template_path(kind)).unwrap();
    }

    pub fn write_invitation(&self, kind: InvitationKind) {
        let path = self
            .config
            .assets_dir
            .join(&self.layout().invitation_dir)
            .join(self.layout().invitation_file(kind));
        write_small_png(&path);
    }

    pub fn write_schedule(&self, kind: ScheduleKind) {
        let path = self
            .config
            .assets_dir
            .join(&self.layout().schedule_dir)
            .join(self.layout().schedule_file(kind));
        write_small_png(&path);
    }

    pub fn generator(&self) -> PassGenerator {
        PassGenerator::new(&self.config).unwrap()
    }

    pub fn output_files(&self) -> usize {
        match fs::read_dir(&self.config.output_dir) {
            Ok(entries) => entries.count(),
            Err(_) => 0,
        }
    }
}

fn write_small_png(path: &Path) {
    RgbImage::from_pixel(8, 8, CREAM).save(path).unwrap();
}

pub fn visitor(id: u64, d1: bool, d2: bool, interactive: bool, plenary: bool) -> Registrant {
    Registrant {
        id,
        name: "Asha Rao".to_string(),
        id_type: "Aadhaar".to_string(),
        id_number: "111122223333".to_string(),
        phone: Some("9876543210".to_string()),
        email: Some("asha@example.org".to_string()),
        category: Category::Visitor,
        entitlements: Entitlements {
            exhibition_day1: d1,
            exhibition_day2: d2,
            interactive_sessions: interactive,
            plenary,
        },
    }
}

pub fn exhibitor(id: u64, d1: bool, d2: bool, interactive: bool, plenary: bool) -> Registrant {
    Registrant {
        name: "Vikram Steelworks".to_string(),
        id_type: "PAN".to_string(),
        id_number: "ABCDE1234F".to_string(),
        category: Category::Exhibitor,
        ..visitor(id, d1, d2, interactive, plenary)
    }
}

/// All sixteen flag combinations as (d1, d2, interactive, plenary).
pub fn flag_combinations() -> Vec<(bool, bool, bool, bool)> {
    (0u8..16)
        .map(|m| (m & 1 != 0, m & 2 != 0, m & 4 != 0, m & 8 != 0))
        .collect()
}

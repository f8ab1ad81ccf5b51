//! Code Style and Placement Geometry
//!
//! Fixes how a code is drawn and where it lands on a template, so the
//! compositor never carries ad-hoc numbers.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EcLevel {
    L,
    #[default]
    M,
    Q,
    H,
}

impl From<EcLevel> for qrcode::EcLevel {
    fn from(level: EcLevel) -> Self {
        match level {
            EcLevel::L => qrcode::EcLevel::L,
            EcLevel::M => qrcode::EcLevel::M,
            EcLevel::Q => qrcode::EcLevel::Q,
            EcLevel::H => qrcode::EcLevel::H,
        }
    }
}

/// How the scannable code is drawn before it is scaled onto a template.
///
/// Dark brown on wheat reads well on both the dark exhibition templates
/// and the cream session templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeStyle {
    pub ec_level: EcLevel,
    pub module_px: u32,
    pub border_modules: u32,
    pub dark: String,
    pub light: String,
}

impl Default for CodeStyle {
    fn default() -> Self {
        Self {
            ec_level: EcLevel::M,
            module_px: 10,
            border_modules: 5,
            dark: "#8B4513".to_string(),
            light: "#F5DEB3".to_string(),
        }
    }
}

impl CodeStyle {
    pub fn dark_rgb(&self) -> Result<[u8; 3], &'static str> {
        parse_hex_color(&self.dark)
    }

    pub fn light_rgb(&self) -> Result<[u8; 3], &'static str> {
        parse_hex_color(&self.light)
    }
}

pub fn parse_hex_color(s: &str) -> Result<[u8; 3], &'static str> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err("Colour must be #RRGGBB");
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| "Invalid hex digit");
    Ok([channel(0)?, channel(2)?, channel(4)?])
}

/// Left-frame placement rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placement {
    /// The frame is `template_width / frame_divisor` wide.
    pub frame_divisor: u32,
    /// Subtracted from the smaller frame side to get the code size.
    pub margin: u32,
    pub left_margin: u32,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            frame_divisor: 3,
            margin: 250,
            left_margin: 60,
        }
    }
}

/// Where and how large the code is drawn on one template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CodeBox {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

impl Placement {
    /// Returns `None` when the template is too small to hold a code.
    pub fn code_box(&self, template_width: u32, template_height: u32) -> Option<CodeBox> {
        let frame_width = template_width / self.frame_divisor.max(1);
        let frame_height = template_height;
        let size = frame_width.min(frame_height).checked_sub(self.margin)?;
        if size == 0 || self.left_margin + size > template_width {
            return None;
        }
        Some(CodeBox {
            x: self.left_margin,
            y: (frame_height - size) / 2,
            size,
        })
    }
}

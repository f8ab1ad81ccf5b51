//! Image Compositor - Scannable Code Over a Template
//!
//! Renders a payload to a two-tone QR code and pastes it into the left frame
//! of a pass template. Output is always lossless PNG.

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use qrcode::types::QrError;
use qrcode::QrCode;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::layout::{CodeStyle, Placement};

/// Failure of a single artifact. Never aborts the rest of a batch.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Template not found: {}", .0.display())]
    TemplateMissing(PathBuf),

    #[error("Payload does not fit the code capacity: {0}")]
    Encoding(#[from] QrError),

    #[error("Template {width}x{height} is too small to hold a code")]
    TemplateTooSmall { width: u32, height: u32 },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid code style: {0}")]
    Style(String),
}

impl ArtifactError {
    /// Configuration problems are skipped, everything else is a failure.
    pub fn is_skip(&self) -> bool {
        matches!(self, ArtifactError::TemplateMissing(_))
    }
}

#[derive(Debug, Clone)]
pub struct Compositor {
    style: CodeStyle,
    placement: Placement,
    dark: Rgba<u8>,
    light: Rgba<u8>,
}

impl Compositor {
    pub fn new(style: CodeStyle, placement: Placement) -> Result<Self, ArtifactError> {
        if style.module_px == 0 {
            return Err(ArtifactError::Style("module_px must be positive".into()));
        }
        let [dr, dg, db] = style.dark_rgb().map_err(|e| ArtifactError::Style(e.into()))?;
        let [lr, lg, lb] = style.light_rgb().map_err(|e| ArtifactError::Style(e.into()))?;
        Ok(Self {
            style,
            placement,
            dark: Rgba([dr, dg, db, 255]),
            light: Rgba([lr, lg, lb, 255]),
        })
    }

    pub fn style(&self) -> &CodeStyle {
        &self.style
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    /// Encode the payload at the configured EC level, smallest fitting version.
    pub fn render_code(&self, payload: &str) -> Result<RgbaImage, ArtifactError> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), self.style.ec_level.into())?;

        let modules = code
            .render::<Rgba<u8>>()
            .quiet_zone(false)
            .module_dimensions(self.style.module_px, self.style.module_px)
            .dark_color(self.dark)
            .light_color(self.light)
            .build();

        let border = self.style.border_modules * self.style.module_px;
        let mut canvas = RgbaImage::from_pixel(
            modules.width() + 2 * border,
            modules.height() + 2 * border,
            self.light,
        );
        imageops::replace(&mut canvas, &modules, i64::from(border), i64::from(border));
        Ok(canvas)
    }

    /// Paste a rendered code into the template's left frame.
    pub fn compose(&self, template: DynamicImage, code: &RgbaImage) -> Result<RgbaImage, ArtifactError> {
        // Indexed and grey templates would otherwise distort the code colours.
        let mut canvas = template.into_rgba8();
        let (width, height) = canvas.dimensions();

        let code_box = self
            .placement
            .code_box(width, height)
            .ok_or(ArtifactError::TemplateTooSmall { width, height })?;

        let scaled = imageops::resize(code, code_box.size, code_box.size, FilterType::Nearest);
        imageops::replace(&mut canvas, &scaled, i64::from(code_box.x), i64::from(code_box.y));
        Ok(canvas)
    }

    pub fn render(&self, template_path: &Path, payload: &str) -> Result<RgbaImage, ArtifactError> {
        if !template_path.is_file() {
            return Err(ArtifactError::TemplateMissing(template_path.to_path_buf()));
        }
        let code = self.render_code(payload)?;
        let template = image::open(template_path)?;
        self.compose(template, &code)
    }

    pub fn save(image: &RgbaImage, output_path: &Path) -> Result<(), ArtifactError> {
        image.save_with_format(output_path, ImageFormat::Png)?;
        Ok(())
    }
}

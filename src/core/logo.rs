//! Logo inspection: geometry and transparency of `logo.png`.

use crate::core::finding::{FindingKind, Findings};
use crate::core::validate::LOGO_FILE_NAME;
use image::{DynamicImage, GenericImageView, ImageReader};
use std::path::Path;

pub const MIN_LOGO: u32 = 1024;
pub const MAX_LOGO: u32 = 2048;

/// Derived facts about a decoded logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoInspection {
    pub width: u32,
    pub height: u32,
    pub has_alpha_channel: bool,
    /// `(min, max)` alpha on the 0-255 scale; `None` without an alpha
    /// channel or when it could not be read.
    pub alpha_extrema: Option<(u8, u8)>,
}

impl LogoInspection {
    pub fn from_image(img: &DynamicImage) -> Self {
        let (width, height) = img.dimensions();
        let has_alpha_channel = img.color().has_alpha();
        let alpha_extrema = if has_alpha_channel {
            alpha_extrema(img)
        } else {
            None
        };
        Self {
            width,
            height,
            has_alpha_channel,
            alpha_extrema,
        }
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    pub fn width_in_range(&self) -> bool {
        (MIN_LOGO..=MAX_LOGO).contains(&self.width)
    }

    pub fn alpha_is_fully_opaque(&self) -> bool {
        self.alpha_extrema == Some((u8::MAX, u8::MAX))
    }
}

/// Decode `path` and check it. The file is known to exist.
pub fn check_logo(path: &Path, entry_id: &str) -> Findings {
    match decode(path) {
        Ok(img) => check_decoded(&img, entry_id),
        Err(cause) => {
            let mut findings = Findings::new();
            findings.error(
                FindingKind::Structural,
                entry_id,
                format!("cannot open {} - {}", LOGO_FILE_NAME, cause),
            );
            findings
        }
    }
}

/// Content sniffing first, so a mislabelled file still decodes.
fn decode(path: &Path) -> Result<DynamicImage, String> {
    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| e.to_string())?
        .decode()
        .map_err(|e| e.to_string())
}

pub fn check_decoded(img: &DynamicImage, entry_id: &str) -> Findings {
    let inspection = LogoInspection::from_image(img);
    let mut findings = Findings::new();

    if !inspection.is_square() {
        findings.error(
            FindingKind::Structural,
            entry_id,
            format!(
                "{} is not square ({}x{})",
                LOGO_FILE_NAME, inspection.width, inspection.height
            ),
        );
    }
    if !inspection.width_in_range() {
        findings.error(
            FindingKind::Structural,
            entry_id,
            format!(
                "{} width {} outside allowed range {}-{}",
                LOGO_FILE_NAME, inspection.width, MIN_LOGO, MAX_LOGO
            ),
        );
    }

    if !inspection.has_alpha_channel {
        findings.error(
            FindingKind::Structural,
            entry_id,
            format!(
                "{} has no alpha channel; logos should use a transparent background",
                LOGO_FILE_NAME
            ),
        );
        return findings;
    }

    match inspection.alpha_extrema {
        Some(_) if inspection.alpha_is_fully_opaque() => findings.error(
            FindingKind::Structural,
            entry_id,
            format!("{} appears fully opaque (no transparency)", LOGO_FILE_NAME),
        ),
        Some(_) => {}
        None => findings.error(
            FindingKind::Structural,
            entry_id,
            "could not inspect alpha channel for transparency",
        ),
    }
    findings
}

/// `(min, max)` of the alpha channel scaled to 0-255.
/// `None` for images without alpha or without pixels.
pub fn alpha_extrema(img: &DynamicImage) -> Option<(u8, u8)> {
    match img {
        DynamicImage::ImageLumaA8(buf) => extrema(buf.pixels().map(|p| p.0[1])),
        DynamicImage::ImageRgba8(buf) => extrema(buf.pixels().map(|p| p.0[3])),
        DynamicImage::ImageLumaA16(buf) => extrema(buf.pixels().map(|p| scale_u16(p.0[1]))),
        DynamicImage::ImageRgba16(buf) => extrema(buf.pixels().map(|p| scale_u16(p.0[3]))),
        DynamicImage::ImageRgba32F(buf) => extrema(buf.pixels().map(|p| scale_f32(p.0[3]))),
        _ => None,
    }
}

fn scale_u16(v: u16) -> u8 {
    (v / 257) as u8
}

fn scale_f32(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn extrema(values: impl Iterator<Item = u8>) -> Option<(u8, u8)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

//! Overlays drawn on top of a styled raster: a circular logo in the middle of the symbol
//! and a "verified" badge strip beneath it. Every step returns a new raster.

use std::{fmt, sync::OnceLock};

use ab_glyph::FontArc;
use image::{
    imageops::{self, FilterType},
    Rgba, RgbaImage,
};
use imageproc::{
    drawing::{draw_filled_rect_mut, draw_text_mut, text_size},
    rect::Rect,
};
use num_traits::ToPrimitive;
use tracing::{debug, warn};

use crate::common::{error::QRResult, metadata::Color};

/// Default logo diameter in canvas units.
pub const LOGO_DIAMETER: u32 = 60;

/// Padding added on every side of the artifact by the badge.
pub const BADGE_PADDING: u32 = 40;

/// Height added below the padded artifact to fit the badge strip.
pub const BADGE_EXTRA_HEIGHT: u32 = 30;

const BADGE_STRIP_OFFSET: u32 = 10;
const BADGE_STRIP_HEIGHT: u32 = 20;

// DejaVu Sans Bold, see assets/fonts/LICENSE-DejaVu.txt
const BADGE_FONT: &[u8] = include_bytes!("../assets/fonts/DejaVuSans-Bold.ttf");

// Logo
//------------------------------------------------------------------------------

/// User supplied image shown in the middle of the symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Logo {
    image: RgbaImage,
}

impl Logo {
    /// Decodes an uploaded image of any format supported by `image`.
    pub fn from_bytes(bytes: &[u8]) -> QRResult<Self> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        debug!("Loaded logo of size {}x{}", image.width(), image.height());
        Ok(Self { image })
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    // Center square crop, resized to the diameter and masked to a circle
    fn to_disc(&self, diameter: u32) -> RgbaImage {
        let (w, h) = self.image.dimensions();
        let side = w.min(h);
        let square = imageops::crop_imm(&self.image, (w - side) / 2, (h - side) / 2, side, side);
        let mut disc = imageops::resize(&square.to_image(), diameter, diameter, FilterType::Lanczos3);

        let rad = diameter as f32 / 2.0;
        for (x, y, px) in disc.enumerate_pixels_mut() {
            let dx = x as f32 + 0.5 - rad;
            let dy = y as f32 + 0.5 - rad;
            let coverage = (rad - dx.hypot(dy) + 0.5).clamp(0.0, 1.0);
            px[3] = (px[3] as f32 * coverage).round().to_u8().unwrap_or(0);
        }
        disc
    }
}

/// Draws the logo as a disc of the given diameter centered over the raster.
pub fn add_logo(img: &RgbaImage, logo: &Logo, diameter: u32) -> RgbaImage {
    let mut res = img.clone();
    let (lw, lh) = logo.dimensions();
    if diameter == 0 || lw == 0 || lh == 0 {
        return res;
    }

    debug!("Compositing logo of diameter {diameter}...");
    let disc = logo.to_disc(diameter);
    let x = (img.width() as i64 - diameter as i64) / 2;
    let y = (img.height() as i64 - diameter as i64) / 2;
    imageops::overlay(&mut res, &disc, x, y);
    res
}

// Badge
//------------------------------------------------------------------------------

/// Bold sans font bundled with the crate, parsed once. Used for the badge label.
pub fn default_font() -> Option<FontArc> {
    static FONT: OnceLock<Option<FontArc>> = OnceLock::new();
    FONT.get_or_init(|| match FontArc::try_from_slice(BADGE_FONT) {
        Ok(font) => Some(font),
        Err(err) => {
            warn!("Bundled badge font is unreadable: {err}");
            None
        }
    })
    .clone()
}

/// Look of the "Safe Scan" strip. The label is drawn with the bundled bold font unless
/// `font` is replaced, and skipped when it is None.
#[derive(Clone)]
pub struct BadgeStyle {
    pub label: String,
    pub color: Color,
    pub text_color: Color,
    pub font: Option<FontArc>,
    pub font_size: f32,
}

impl Default for BadgeStyle {
    fn default() -> Self {
        Self {
            label: "Safe Scan Verified".to_string(),
            color: Color::BADGE_GREEN,
            text_color: Color::WHITE,
            font: default_font(),
            font_size: 14.0,
        }
    }
}

impl BadgeStyle {
    pub fn with_font(font: FontArc) -> Self {
        Self { font: Some(font), ..Default::default() }
    }
}

impl fmt::Debug for BadgeStyle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("BadgeStyle")
            .field("label", &self.label)
            .field("color", &self.color)
            .field("text_color", &self.text_color)
            .field("font", &self.font.as_ref().map(|_| "FontArc"))
            .field("font_size", &self.font_size)
            .finish()
    }
}

impl PartialEq for BadgeStyle {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
            && self.color == other.color
            && self.text_color == other.text_color
            && self.font.is_some() == other.font.is_some()
            && self.font_size == other.font_size
    }
}

/// Pads the raster on a white canvas and draws the badge strip beneath it.
///
/// The result is `BADGE_PADDING * 2` wider and `BADGE_PADDING * 2 + BADGE_EXTRA_HEIGHT`
/// taller than the input.
pub fn add_badge(img: &RgbaImage, badge: &BadgeStyle) -> RgbaImage {
    let (w, h) = img.dimensions();
    let pad = BADGE_PADDING;
    let cw = w + pad * 2;
    let ch = h + pad * 2 + BADGE_EXTRA_HEIGHT;

    debug!("Compositing badge {:?}...", badge.label);
    let mut canvas = RgbaImage::from_pixel(cw, ch, Color::WHITE.into());
    imageops::overlay(&mut canvas, img, pad as i64, pad as i64);

    let strip_top = h + pad + BADGE_STRIP_OFFSET;
    if w > 0 {
        let rect = Rect::at(pad as i32, strip_top as i32).of_size(w, BADGE_STRIP_HEIGHT);
        draw_filled_rect_mut(&mut canvas, rect, badge.color.into());
    }

    if badge.label.is_empty() {
        return canvas;
    }
    let Some(font) = &badge.font else {
        warn!("No font for badge label, drawing strip only");
        return canvas;
    };

    let (tw, th) = text_size(badge.font_size, font, &badge.label);
    let tx = cw as i32 / 2 - tw as i32 / 2;
    let ty = (strip_top + BADGE_STRIP_HEIGHT / 2) as i32 - th as i32 / 2;
    let color: Rgba<u8> = badge.text_color.into();
    draw_text_mut(&mut canvas, color, tx, ty, badge.font_size, font, &badge.label);
    canvas
}

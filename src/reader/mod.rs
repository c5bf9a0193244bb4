//! Reading QR codes back from pixels: one-shot decoding of still images and the camera
//! capture loop.

mod camera;
#[cfg(test)]
pub(crate) mod mock;
mod scan;

pub use camera::{CameraConstraints, CameraDevice, CaptureStream, FacingMode, StreamGuard};
pub use scan::{FrameClock, IntervalClock, ScanHandle, ScanSession, ScanState};

use encoding_rs::WINDOWS_1252;
use image::{GrayImage, Luma, RgbaImage};
use rqrr::PreparedImage;
use tracing::{debug, info};

use crate::common::error::QRResult;

// Decoder
//------------------------------------------------------------------------------

/// Pixel buffer in, text out. `None` means no symbol was found, which is not an error.
pub trait Decode {
    fn decode(&mut self, frame: &RgbaImage) -> Option<String>;
}

/// Which luminance polarities are tried, for light-on-dark codes.
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone)]
pub enum Inversion {
    #[default]
    DontInvert,
    OnlyInvert,
    AttemptBoth,
    InvertFirst,
}

impl Inversion {
    fn passes(self) -> &'static [bool] {
        match self {
            Self::DontInvert => &[false],
            Self::OnlyInvert => &[true],
            Self::AttemptBoth => &[false, true],
            Self::InvertFirst => &[true, false],
        }
    }
}

/// Decoder backed by `rqrr`. The first symbol found in the frame wins.
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone)]
pub struct QRReader {
    pub inversion: Inversion,
}

impl QRReader {
    pub fn new(inversion: Inversion) -> Self {
        Self { inversion }
    }

    fn decode_luma(img: &GrayImage) -> Option<String> {
        let (w, h) = (img.width() as usize, img.height() as usize);
        let mut prepared =
            PreparedImage::prepare_from_greyscale(w, h, |x, y| img.get_pixel(x as u32, y as u32).0[0]);
        let grids = prepared.detect_grids();
        debug!("Detected {} candidate grids", grids.len());

        grids.iter().find_map(|grid| {
            let mut bytes = Vec::new();
            match grid.decode_to(&mut bytes) {
                Ok(meta) => {
                    debug!("Decoded symbol version {} with ec level {}", meta.version.0, meta.ecc_level);
                    Some(decode_text(&bytes))
                }
                Err(err) => {
                    debug!("Grid failed to decode: {err}");
                    None
                }
            }
        })
    }
}

impl Decode for QRReader {
    fn decode(&mut self, frame: &RgbaImage) -> Option<String> {
        let luma = to_luma(frame);
        self.inversion.passes().iter().find_map(|&invert| {
            if invert {
                let mut inverted = luma.clone();
                image::imageops::invert(&mut inverted);
                Self::decode_luma(&inverted)
            } else {
                Self::decode_luma(&luma)
            }
        })
    }
}

impl<F: FnMut(&RgbaImage) -> Option<String>> Decode for F {
    fn decode(&mut self, frame: &RgbaImage) -> Option<String> {
        self(frame)
    }
}

// Luminance with transparent pixels composed over white
fn to_luma(img: &RgbaImage) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b, a] = img.get_pixel(x, y).0;
        let l = (77 * r as u32 + 150 * g as u32 + 29 * b as u32) >> 8;
        let a = a as u32;
        Luma([((l * a + 255 * (255 - a)) / 255) as u8])
    })
}

/// Payload bytes as text. Bytes that aren't valid utf-8 are read as Windows-1252, the
/// superset of ISO-8859-1 that QR byte mode defaults to.
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned(),
    }
}

// Gallery decode
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum DecodeOutcome {
    Found(String),
    NotFound,
}

impl From<Option<String>> for DecodeOutcome {
    fn from(res: Option<String>) -> Self {
        match res {
            Some(s) => Self::Found(s),
            None => Self::NotFound,
        }
    }
}

/// Decodes an uploaded image at its native resolution with a single attempt.
pub fn decode_image(bytes: &[u8]) -> QRResult<DecodeOutcome> {
    decode_image_with(&mut QRReader::default(), bytes)
}

pub fn decode_image_with<D: Decode>(decoder: &mut D, bytes: &[u8]) -> QRResult<DecodeOutcome> {
    let img = image::load_from_memory(bytes)?.to_rgba8();
    debug!("Decoding uploaded image of size {}x{}...", img.width(), img.height());

    let outcome = DecodeOutcome::from(decoder.decode(&img));
    if let DecodeOutcome::Found(text) = &outcome {
        info!("Found QR code in image: {text:?}");
    }
    Ok(outcome)
}

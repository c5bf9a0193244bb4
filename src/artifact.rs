use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{ImageFormat, RgbaImage};

use crate::common::error::{QRError, QRResult};

/// File stem used for downloads when the caller doesn't pick one.
pub const DEFAULT_FILE_STEM: &str = "qr-genius-code";

// Artifact
//------------------------------------------------------------------------------

/// Final output of a render: a raster for previews & PNG export, or svg markup.
#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    Raster(RgbaImage),
    Vector(String),
}

impl Artifact {
    pub fn format(&self) -> ExportFormat {
        match self {
            Self::Raster(_) => ExportFormat::Png,
            Self::Vector(_) => ExportFormat::Svg,
        }
    }

    /// Raster dimensions, None for svg markup.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self {
            Self::Raster(img) => Some(img.dimensions()),
            Self::Vector(_) => None,
        }
    }

    pub fn as_raster(&self) -> Option<&RgbaImage> {
        match self {
            Self::Raster(img) => Some(img),
            Self::Vector(_) => None,
        }
    }

    /// Encoded file contents: PNG bytes or utf-8 svg markup.
    pub fn to_bytes(&self) -> QRResult<Vec<u8>> {
        match self {
            Self::Raster(img) => {
                let mut bytes = Vec::new();
                img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
                    .map_err(QRError::ImageEncode)?;
                Ok(bytes)
            }
            Self::Vector(svg) => Ok(svg.clone().into_bytes()),
        }
    }

    /// `data:` url suitable for an `<img src>`.
    pub fn to_data_url(&self) -> QRResult<String> {
        let bytes = self.to_bytes()?;
        Ok(format!("data:{};base64,{}", self.format().mime(), STANDARD.encode(bytes)))
    }
}

// Download
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ExportFormat {
    Png,
    Svg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
        }
    }
}

/// A file ready to be handed over to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl Download {
    pub fn new(artifact: &Artifact, stem: &str) -> QRResult<Self> {
        let format = artifact.format();
        let stem = if stem.is_empty() { DEFAULT_FILE_STEM } else { stem };
        Ok(Self { file_name: format!("{stem}.{}", format.extension()), format, bytes: artifact.to_bytes()? })
    }
}

/// Destination of finished downloads, e.g. a browser anchor click or a directory.
pub trait DownloadSink {
    type Error;

    fn save(&mut self, download: Download) -> Result<(), Self::Error>;
}

impl DownloadSink for Vec<Download> {
    type Error = std::convert::Infallible;

    fn save(&mut self, download: Download) -> Result<(), Self::Error> {
        self.push(download);
        Ok(())
    }
}

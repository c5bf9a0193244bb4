use thiserror::Error;

// Error
//------------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum QRError {
    // QR builder
    #[error("Empty data")]
    EmptyData,
    #[error("Failed to encode data: {0}")]
    Encoding(#[from] qrcode::types::QrError),
    #[error("Invalid color: {0:?}")]
    InvalidColor(String),
    #[error("Invalid url: {0:?}")]
    InvalidUrl(String),

    #[error("Grid of width {width} can't hold {len} modules")]
    InvalidGrid { width: usize, len: usize },

    // Render & compose
    #[error("Failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),
    #[error("Failed to encode image: {0}")]
    ImageEncode(#[source] image::ImageError),
    #[error("Canvas of size {width}x{height} is unavailable")]
    CanvasUnavailable { width: u64, height: u64 },

    // QR reader
    #[error("Camera unavailable: {0}")]
    CameraUnavailable(String),
}

impl QRError {
    /// True when the payload/option combination could not be turned into a module grid,
    /// as opposed to a failure while drawing or compositing the artifact.
    pub fn is_encoding_failure(&self) -> bool {
        matches!(self, Self::EmptyData | Self::Encoding(_) | Self::InvalidUrl(_))
    }
}

pub type QRResult<T> = Result<T, QRError>;

//! # qrgenius
//!
//! A Rust library for generating styled QR codes and scanning them back. Encoding and
//! decoding of the symbol itself are delegated to [`qrcode`] and [`rqrr`]; this crate
//! draws the module grid in different styles, composites logos and badges on top, and
//! runs the camera capture loop.
//!
//! ## Features
//!
//! - **Styles**: standard, dots, rounded, classy and edge-cut modules, plus framed variants
//! - **Raster & Vector Output**: PNG through `image`, SVG markup from the same shape rules
//! - **Overlays**: circular logo in the middle of the code and a "Safe Scan Verified" badge
//! - **Content Types**: links, text, e-mail, calls, SMS, vCards, Wi-Fi, events and more
//! - **Scanning**: one-shot decoding of still images and a cancellable camera scan loop
//!
//! ## Quick Start
//!
//! ### Simple QR Code Generation
//!
//! ```rust
//! use qrgenius::QRBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Simplest usage - 300x300, black on white, standard modules, ec level M
//! let qr = QRBuilder::new(b"Hello, World!").build()?;
//!
//! let img = qr.render()?;
//! assert_eq!(img.dimensions(), (300, 300));
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use qrgenius::{Color, CornerRadius, ECLevel, QRBuilder, Style};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new(b"https://example.com")
//!     .ec_level(ECLevel::H)                    // Error correction level, defaults to M
//!     .style(Style::Dots)                      // Module style, defaults to standard
//!     .color("#1F2937".parse::<Color>()?)      // Module color, defaults to black
//!     .background_color(Color::WHITE)          // Background color, defaults to white
//!     .corner_radius(CornerRadius::Rounded)    // Extra rounding of data modules
//!     .width(512)                              // Canvas side, defaults to 300
//!     .margin(4)                               // Quiet zone in modules, defaults to 4
//!     .build()?;
//!
//! let svg = qr.to_svg()?;
//! assert!(svg.starts_with("<svg"));
//! # Ok(())
//! # }
//! ```
//!
//! ### Logo & Badge
//!
//! ```rust
//! use qrgenius::{generate, BadgeStyle, Decorations, Logo, QRBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new(b"https://example.com").build()?;
//! let logo = Logo::from_image(image::RgbaImage::from_pixel(64, 64, image::Rgba([255, 0, 0, 255])));
//! let decorations = Decorations { logo: Some(logo), badge: Some(BadgeStyle::default()), ..Default::default() };
//!
//! let artifact = generate(&qr, &decorations)?;
//! assert_eq!(artifact.dimensions(), Some((380, 410)));
//! # Ok(())
//! # }
//! ```
//!
//! ### Reading a QR Code
//!
//! ```rust,no_run
//! use qrgenius::reader::{decode_image, DecodeOutcome};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("qr_code.png")?;
//! if let DecodeOutcome::Found(text) = decode_image(&bytes)? {
//!     println!("Decoded: {}", text);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Styles
//!
//! Styling only changes how each module is drawn, never which modules are dark:
//! - **Standard**: square modules
//! - **Dots**: circular data modules; finder, timing & alignment patterns stay square
//! - **Rounded**: modules rounded by a quarter cell
//! - **Classy**: the two outermost rings rounded, fully in the corners
//! - **Edge Cut**: standard modules inside a rounded outline
//! - **Frames**: square, rounded, circle, phone and device frames drawn by the host
//!
//! ## Error Correction Levels
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction

pub mod artifact;
pub mod builder;
pub(crate) mod common;
pub mod compose;
pub mod pipeline;
pub mod preview;
pub mod reader;
pub mod render;

pub use artifact::{Artifact, Download, DownloadSink, ExportFormat, DEFAULT_FILE_STEM};
pub use builder::{is_valid_url, Content, ModuleGrid, QRBuilder, QROptions, QR};
pub use common::{
    error::{QRError, QRResult},
    metadata::{Color, CornerRadius, ECLevel},
};
pub use compose::{add_badge, add_logo, default_font, BadgeStyle, Logo};
pub use pipeline::{export, generate, Decorations};
pub use preview::{Preview, PreviewUpdate, RequestId};
pub use reader::{decode_image, DecodeOutcome, QRReader, ScanSession, ScanState};
pub use render::Style;

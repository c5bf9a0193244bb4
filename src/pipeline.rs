use tracing::{info, warn};

use crate::artifact::{Artifact, Download, ExportFormat};
use crate::builder::QR;
use crate::common::error::QRResult;
use crate::compose::{add_badge, add_logo, BadgeStyle, Logo, LOGO_DIAMETER};

// Decorations
//------------------------------------------------------------------------------

/// Overlays applied after styling, independent of the QR request itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Decorations {
    pub logo: Option<Logo>,
    pub logo_diameter: u32,
    pub badge: Option<BadgeStyle>,
}

impl Default for Decorations {
    fn default() -> Self {
        Self { logo: None, logo_diameter: LOGO_DIAMETER, badge: None }
    }
}

impl Decorations {
    pub fn is_empty(&self) -> bool {
        self.logo.is_none() && self.badge.is_none()
    }
}

// Pipeline
//------------------------------------------------------------------------------

/// Runs style render, then logo, then badge, producing a fresh raster.
pub fn generate(qr: &QR, decorations: &Decorations) -> QRResult<Artifact> {
    let mut img = qr.render()?;
    if let Some(logo) = &decorations.logo {
        img = add_logo(&img, logo, decorations.logo_diameter);
    }
    if let Some(badge) = &decorations.badge {
        img = add_badge(&img, badge);
    }
    info!("Generated {}x{} QR image", img.width(), img.height());
    Ok(Artifact::Raster(img))
}

/// Produces the file for the requested format. Svg is only available without
/// decorations; a decorated code is exported as PNG instead.
pub fn export(qr: &QR, decorations: &Decorations, format: ExportFormat, stem: &str) -> QRResult<Download> {
    let artifact = match format {
        ExportFormat::Svg if decorations.is_empty() => Artifact::Vector(qr.to_svg()?),
        ExportFormat::Svg => {
            warn!("Svg export unavailable with logo or badge, falling back to PNG");
            generate(qr, decorations)?
        }
        ExportFormat::Png => generate(qr, decorations)?,
    };
    let download = Download::new(&artifact, stem)?;
    info!("Exported {} ({} bytes)", download.file_name, download.bytes.len());
    Ok(download)
}

#[cfg(test)]
mod pipeline_tests {
    use image::{Rgba, RgbaImage};

    use super::{export, generate, Decorations};
    use crate::artifact::ExportFormat;
    use crate::builder::QRBuilder;
    use crate::compose::{BadgeStyle, Logo};

    #[test]
    fn test_generate_plain() {
        let qr = QRBuilder::new(b"Hello, world!").build().unwrap();
        let artifact = generate(&qr, &Decorations::default()).unwrap();
        assert_eq!(artifact.dimensions(), Some((300, 300)));
        assert_eq!(artifact.as_raster(), Some(&qr.render().unwrap()));
    }

    #[test]
    fn test_generate_decorated() {
        let qr = QRBuilder::new(b"Hello, world!").build().unwrap();
        let decorations = Decorations {
            logo: Some(Logo::from_image(RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255])))),
            badge: Some(BadgeStyle::default()),
            ..Default::default()
        };
        let artifact = generate(&qr, &decorations).unwrap();
        assert_eq!(artifact.dimensions(), Some((380, 410)));
    }

    #[test]
    fn test_export_svg() {
        let qr = QRBuilder::new(b"Hello, world!").build().unwrap();
        let download = export(&qr, &Decorations::default(), ExportFormat::Svg, "").unwrap();
        assert_eq!(download.file_name, "qr-genius-code.svg");
        assert!(download.bytes.starts_with(b"<svg"));
    }

    #[test]
    fn test_export_svg_falls_back_to_png() {
        let qr = QRBuilder::new(b"Hello, world!").build().unwrap();
        let decorations = Decorations { badge: Some(BadgeStyle::default()), ..Default::default() };
        let download = export(&qr, &decorations, ExportFormat::Svg, "badge").unwrap();
        assert_eq!(download.format, ExportFormat::Png);
        assert_eq!(download.file_name, "badge.png");
    }
}

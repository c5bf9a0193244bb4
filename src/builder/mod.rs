mod content;
mod grid;
mod options;

pub use content::{is_valid_url, Content, Event, VCard, Wifi, WifiAuth};
pub use grid::ModuleGrid;
pub use options::QROptions;

use image::RgbaImage;
use qrcode::QrCode;
use tracing::debug;

use crate::common::{
    error::{QRError, QRResult},
    metadata::{Color, CornerRadius, ECLevel},
};
use crate::render::{render_raster, render_svg, Layout, Paint, Style};

// Builder
//------------------------------------------------------------------------------

pub struct QRBuilder<'a> {
    data: &'a [u8],
    opts: QROptions,
}

impl<'a> QRBuilder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, opts: QROptions::default() }
    }

    pub fn with_options(data: &'a [u8], opts: QROptions) -> Self {
        Self { data, opts }
    }

    pub fn data(&mut self, data: &'a [u8]) -> &mut Self {
        self.data = data;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.opts.ec_level = ec_level;
        self
    }

    pub fn width(&mut self, width: u32) -> &mut Self {
        self.opts.width = width;
        self
    }

    pub fn margin(&mut self, margin: u32) -> &mut Self {
        self.opts.margin = margin;
        self
    }

    pub fn color(&mut self, color: Color) -> &mut Self {
        self.opts.color = color;
        self
    }

    pub fn background_color(&mut self, color: Color) -> &mut Self {
        self.opts.background_color = color;
        self
    }

    pub fn corner_radius(&mut self, corner_radius: CornerRadius) -> &mut Self {
        self.opts.corner_radius = corner_radius;
        self
    }

    pub fn style(&mut self, style: Style) -> &mut Self {
        self.opts.style = style;
        self
    }

    pub fn options(&self) -> &QROptions {
        &self.opts
    }

    pub fn metadata(&self) -> String {
        format!(
            "{{ Ec level: {:?}, Style: {}, Width: {}, Margin: {} }}",
            self.opts.ec_level,
            self.opts.style.label(),
            self.opts.width,
            self.opts.margin
        )
    }

    pub fn build(&self) -> QRResult<QR> {
        debug!("Generating QR {}...", self.metadata());
        if self.data.is_empty() {
            return Err(QRError::EmptyData);
        }

        debug!("Encoding {} bytes...", self.data.len());
        let code = QrCode::with_error_correction_level(self.data, self.opts.ec_level.into())?;

        debug!("Reading module grid...");
        let grid = ModuleGrid::from_code(&code)?;
        debug!("Module grid of width {} ready", grid.width());

        Ok(QR { grid, opts: self.opts })
    }
}

// QR
//------------------------------------------------------------------------------

/// An encoded symbol together with the options it is drawn with.
#[derive(Debug, Clone, PartialEq)]
pub struct QR {
    grid: ModuleGrid,
    opts: QROptions,
}

impl QR {
    pub fn grid(&self) -> &ModuleGrid {
        &self.grid
    }

    pub fn options(&self) -> &QROptions {
        &self.opts
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn layout(&self) -> QRResult<Layout> {
        Layout::new(self.grid.width(), self.opts.margin, self.opts.width)
    }

    pub fn paint(&self) -> Paint {
        Paint {
            color: self.opts.color,
            background: self.opts.background_color,
            style: self.opts.style,
            corner_radius: self.opts.corner_radius.units(),
        }
    }

    /// Styled raster of the symbol.
    pub fn render(&self) -> QRResult<RgbaImage> {
        let layout = self.layout()?;
        debug!("Rendering {} raster of size {}...", self.opts.style.label(), layout.size);
        Ok(render_raster(&self.grid, &layout, &self.paint()))
    }

    /// Styled svg markup of the symbol.
    pub fn to_svg(&self) -> QRResult<String> {
        let layout = self.layout()?;
        debug!("Rendering {} svg of size {}...", self.opts.style.label(), layout.size);
        Ok(render_svg(&self.grid, &layout, &self.paint()))
    }
}

#[cfg(test)]
mod builder_tests {
    use test_case::test_case;

    use super::QRBuilder;
    use crate::common::{
        error::QRError,
        metadata::{Color, CornerRadius, ECLevel},
    };
    use crate::render::Style;

    #[test]
    fn test_metadata() {
        let mut builder = QRBuilder::new(b"Hello, world!");
        builder.ec_level(ECLevel::L).style(Style::EdgeCut).width(512);
        assert_eq!(builder.metadata(), "{ Ec level: L, Style: Edge Cut, Width: 512, Margin: 4 }");
    }

    #[test]
    fn test_setters() {
        let mut builder = QRBuilder::new(b"Hello, world!");
        builder
            .color(Color::BADGE_GREEN)
            .background_color(Color::BLACK)
            .corner_radius(CornerRadius::Rounded)
            .margin(2);
        let qr = builder.build().unwrap();

        let paint = qr.paint();
        assert_eq!(paint.color, Color::BADGE_GREEN);
        assert_eq!(paint.background, Color::BLACK);
        assert_eq!(paint.corner_radius, 8);
        assert_eq!(qr.layout().unwrap().margin, 2);
    }

    #[test_case("Hello, world!", ECLevel::L, 21)]
    #[test_case("Hello, world!", ECLevel::H, 25)]
    #[test_case("https://example.com", ECLevel::M, 25)]
    fn test_build(data: &str, ecl: ECLevel, exp_width: usize) {
        let qr = QRBuilder::new(data.as_bytes()).ec_level(ecl).build().unwrap();
        assert_eq!(qr.width(), exp_width);
        assert_eq!(qr.options().ec_level, ecl);
    }

    #[test]
    fn test_empty_data() {
        let res = QRBuilder::new(b"").build();
        assert!(matches!(res, Err(QRError::EmptyData)));
    }

    #[test]
    fn test_data_overflow() {
        let data = "1234567890".repeat(306);
        let res = QRBuilder::new(data.as_bytes()).ec_level(ECLevel::H).build();
        assert!(matches!(res, Err(QRError::Encoding(_))));
    }

    #[test]
    fn test_render_size() {
        let qr = QRBuilder::new(b"Hello, world!").width(300).build().unwrap();
        assert_eq!(qr.render().unwrap().dimensions(), (300, 300));
        assert!(qr.to_svg().unwrap().contains(r#"width="300""#));
    }

    #[test]
    fn test_render_unavailable_canvas() {
        let qr = QRBuilder::new(b"Hello, world!").width(0).build().unwrap();
        assert!(matches!(qr.render(), Err(QRError::CanvasUnavailable { .. })));
        assert!(matches!(qr.to_svg(), Err(QRError::CanvasUnavailable { .. })));
    }
}

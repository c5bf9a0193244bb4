//! Style rendering of a [`ModuleGrid`] into raster or vector artifacts.
//!
//! Both pipelines walk the same grid and ask [`Style::shape_at`] how each dark module is
//! drawn, so a style looks the same whether exported as PNG or SVG. Styling never changes
//! which modules are dark.

mod raster;
mod svg;

pub use raster::render_raster;
pub use svg::render_svg;

use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::builder::ModuleGrid;
use crate::common::{
    error::{QRError, QRResult},
    metadata::Color,
};

/// Largest canvas side, in canvas units, that a renderer will allocate.
pub const MAX_CANVAS_SIZE: u32 = 16384;

/// Dot radius relative to half a cell.
pub const DOT_SCALE: f32 = 0.85;

/// Corner radius of the edge-cut outline, in canvas units.
pub const EDGE_CUT_RADIUS: f32 = 15.0;

/// Inset of the edge-cut outline in the svg pipeline, in canvas units.
pub const EDGE_CUT_SVG_INSET: f32 = 10.0;

// Style
//------------------------------------------------------------------------------

#[derive(Debug, Default, PartialEq, Eq, Copy, Clone, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Style {
    #[default]
    Standard,
    Dots,
    Rounded,
    Classy,
    EdgeCut,
    FrameSquare,
    FrameRounded,
    FrameCircle,
    PhoneFrame,
    DeviceFrame,
}

/// Chrome drawn around the preview by the host for the presentational styles.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Frame {
    Square,
    Rounded,
    Circle,
    Phone,
    Device,
}

impl Style {
    pub const ALL: [Self; 10] = [
        Self::Standard,
        Self::Dots,
        Self::Rounded,
        Self::Classy,
        Self::EdgeCut,
        Self::FrameSquare,
        Self::FrameRounded,
        Self::FrameCircle,
        Self::PhoneFrame,
        Self::DeviceFrame,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Dots => "Dots",
            Self::Rounded => "Rounded",
            Self::Classy => "Classy",
            Self::EdgeCut => "Edge Cut",
            Self::FrameSquare => "Square Frame",
            Self::FrameRounded => "Rounded Frame",
            Self::FrameCircle => "Circle Frame",
            Self::PhoneFrame => "Phone",
            Self::DeviceFrame => "Device",
        }
    }

    /// Surrounding chrome for presentational styles. Their modules render as standard.
    pub fn frame(self) -> Option<Frame> {
        match self {
            Self::FrameSquare => Some(Frame::Square),
            Self::FrameRounded => Some(Frame::Rounded),
            Self::FrameCircle => Some(Frame::Circle),
            Self::PhoneFrame => Some(Frame::Phone),
            Self::DeviceFrame => Some(Frame::Device),
            Self::Standard | Self::Dots | Self::Rounded | Self::Classy | Self::EdgeCut => None,
        }
    }

    /// Shape of the module at (r, c), in cell units, before the corner radius control.
    pub fn shape_at(self, grid: &ModuleGrid, r: usize, c: usize) -> ModuleShape {
        match self {
            Self::Standard | Self::EdgeCut => ModuleShape::Square,
            // Finder, timing & alignment patterns stay solid so decoders can locate them
            Self::Dots | Self::Rounded | Self::Classy if grid.is_function(r, c) => ModuleShape::Square,
            Self::Dots => ModuleShape::Circle(DOT_SCALE * 0.5),
            Self::Rounded => ModuleShape::Rounded(0.25),
            Self::Classy => {
                let rad = classy_radius(grid.width(), r, c);
                if rad > 0.0 {
                    ModuleShape::Rounded(rad)
                } else {
                    ModuleShape::Square
                }
            }
            Self::FrameSquare
            | Self::FrameRounded
            | Self::FrameCircle
            | Self::PhoneFrame
            | Self::DeviceFrame => ModuleShape::Square,
        }
    }
}

/// Classy corner radius, in cell units, of the module at (r, c) of a grid of side w.
///
/// Modules of the two outermost rings get 1/2 inside a grid corner and 1/4 elsewhere;
/// interior modules stay square.
pub fn classy_radius(w: usize, r: usize, c: usize) -> f32 {
    const RINGS: usize = 2;
    let near_edge = |i: usize| i < RINGS || i + RINGS >= w;
    match (near_edge(r), near_edge(c)) {
        (true, true) => 0.5,
        (true, false) | (false, true) => 0.25,
        (false, false) => 0.0,
    }
}

// Module shape
//------------------------------------------------------------------------------

/// Drawing of a single dark module. Radii are in cell units, so 0.5 spans half a cell.
#[derive(Debug, PartialEq, Copy, Clone)]
pub enum ModuleShape {
    Square,
    Rounded(f32),
    Circle(f32),
}

impl ModuleShape {
    /// Rounds the module box by at least `radius` cell units. Circles are unaffected.
    pub fn with_corner_radius(self, radius: f32) -> Self {
        let radius = radius.clamp(0.0, 0.5);
        match self {
            Self::Square if radius > 0.0 => Self::Rounded(radius),
            Self::Square => Self::Square,
            Self::Rounded(r) => Self::Rounded(r.max(radius).min(0.5)),
            Self::Circle(r) => Self::Circle(r),
        }
    }

    /// Hit test for a point (u, v) inside the unit cell, both in [0, 1).
    pub fn contains(self, u: f32, v: f32) -> bool {
        let (du, dv) = ((u - 0.5).abs(), (v - 0.5).abs());
        match self {
            Self::Square => true,
            Self::Circle(r) => du * du + dv * dv <= r * r,
            Self::Rounded(r) => {
                let x = (du - (0.5 - r)).max(0.0);
                let y = (dv - (0.5 - r)).max(0.0);
                x * x + y * y <= r * r
            }
        }
    }
}

// Layout
//------------------------------------------------------------------------------

/// Placement of the grid on the canvas, shared by both pipelines.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Layout {
    pub size: u32,   // Canvas side in canvas units
    pub cell: f32,   // Cell side in canvas units
    pub margin: u32, // Quiet zone in modules
    pub modules: usize,
}

impl Layout {
    pub fn new(modules: usize, margin: u32, width: u32) -> QRResult<Self> {
        let total = modules as u64 + 2 * margin as u64;
        let size = (width as u64).max(total);
        if width == 0 || size > MAX_CANVAS_SIZE as u64 {
            return Err(QRError::CanvasUnavailable { width: size, height: size });
        }

        let size = size.to_u32().ok_or(QRError::CanvasUnavailable { width: size, height: size })?;
        let cell = size as f32 / total as f32;
        Ok(Self { size, cell, margin, modules })
    }

    /// Maps a canvas coordinate to (module index, position inside the cell), or None if
    /// the coordinate falls into the quiet zone.
    pub fn locate(&self, p: f32) -> Option<(usize, f32)> {
        let m = p / self.cell - self.margin as f32;
        if m < 0.0 {
            return None;
        }
        let idx = m.floor().to_usize()?;
        (idx < self.modules).then_some((idx, m - idx as f32))
    }

    /// Canvas coordinate of the top left corner of module index i.
    pub fn origin(&self, i: usize) -> f32 {
        (i as f32 + self.margin as f32) * self.cell
    }

    /// Converts canvas units into cell units.
    pub fn to_cells(&self, units: f32) -> f32 {
        units / self.cell
    }

    /// Inset of the edge-cut outline, in canvas units, given the inset the style asks for.
    ///
    /// The outline stays at least one cell away from the symbol, so it is pulled toward the
    /// canvas edge on narrow quiet zones and dropped without one.
    pub fn edge_cut_inset(&self, preferred: f32) -> Option<f32> {
        if self.margin == 0 {
            warn!("Edge-cut outline skipped: no quiet zone around the symbol");
            return None;
        }
        let clearance = (self.margin - 1) as f32 * self.cell;
        if preferred > clearance {
            warn!("Edge-cut outline moved to {clearance} units in, quiet zone is {} modules", self.margin);
        }
        Some(preferred.min(clearance))
    }
}

/// Colors and shape controls applied by both pipelines.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Paint {
    pub color: Color,
    pub background: Color,
    pub style: Style,
    pub corner_radius: u32, // Canvas units
}

impl Paint {
    /// Style shape with the corner radius control applied. Function patterns are left as is.
    pub(crate) fn shape_at(&self, grid: &ModuleGrid, layout: &Layout, r: usize, c: usize) -> ModuleShape {
        let shape = self.style.shape_at(grid, r, c);
        if grid.is_function(r, c) {
            return shape;
        }
        shape.with_corner_radius(layout.to_cells(self.corner_radius as f32))
    }
}

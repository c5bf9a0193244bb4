use image::{Pixel, Rgba, RgbaImage};

use super::{Layout, ModuleShape, Paint, Style, EDGE_CUT_RADIUS};
use crate::builder::ModuleGrid;

// Raster pipeline
//------------------------------------------------------------------------------

/// Draws the grid pixel by pixel: every canvas pixel is mapped back to its module and
/// painted when its center falls inside that module's shape.
pub fn render_raster(grid: &ModuleGrid, layout: &Layout, paint: &Paint) -> RgbaImage {
    let sz = layout.size;
    let w = grid.width();
    let fg: Rgba<u8> = paint.color.into();

    // Shapes resolved once per module, None for light modules
    let mut shapes: Vec<Option<ModuleShape>> = vec![None; w * w];
    for (r, c) in grid.dark_modules() {
        shapes[r * w + c] = Some(paint.shape_at(grid, layout, r, c));
    }

    let mut canvas = RgbaImage::from_pixel(sz, sz, paint.background.into());
    for y in 0..sz {
        let Some((r, v)) = layout.locate(y as f32 + 0.5) else {
            continue;
        };
        for x in 0..sz {
            let Some((c, u)) = layout.locate(x as f32 + 0.5) else {
                continue;
            };
            match shapes[r * w + c] {
                Some(shape) if shape.contains(u, v) => canvas.get_pixel_mut(x, y).blend(&fg),
                _ => {}
            }
        }
    }

    if paint.style == Style::EdgeCut {
        draw_edge_cut(&mut canvas, layout, fg);
    }

    canvas
}

// Rounded outline inset 2 cells from the canvas edges, half a cell thick. Narrow quiet
// zones pull it closer to the edge
fn draw_edge_cut(canvas: &mut RgbaImage, layout: &Layout, color: Rgba<u8>) {
    let Some(inset) = layout.edge_cut_inset(2.0 * layout.cell) else {
        return;
    };
    let half_sz = layout.size as f32 / 2.0;
    let half_ext = half_sz - inset;
    let half_stroke = layout.cell / 4.0;
    if half_ext <= 0.0 {
        return;
    }
    let rad = EDGE_CUT_RADIUS.min(half_ext);

    for (x, y, px) in canvas.enumerate_pixels_mut() {
        let px_x = x as f32 + 0.5 - half_sz;
        let px_y = y as f32 + 0.5 - half_sz;
        let d = rounded_rect_distance(px_x, px_y, half_ext, rad);
        if d.abs() <= half_stroke {
            px.blend(&color);
        }
    }
}

/// Signed distance from (x, y) to the outline of a rounded square centered on the origin,
/// negative inside.
pub(crate) fn rounded_rect_distance(x: f32, y: f32, half_ext: f32, rad: f32) -> f32 {
    let qx = x.abs() - (half_ext - rad);
    let qy = y.abs() - (half_ext - rad);
    let outside = qx.max(0.0).hypot(qy.max(0.0));
    let inside = qx.max(qy).min(0.0);
    outside + inside - rad
}

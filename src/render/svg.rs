use std::fmt::Write;

use super::{Layout, ModuleShape, Paint, Style, EDGE_CUT_RADIUS, EDGE_CUT_SVG_INSET};
use crate::builder::ModuleGrid;
use crate::common::metadata::Color;

// Vector pipeline
//------------------------------------------------------------------------------

/// Emits svg markup for the grid. Square modules are merged into one path; rounded and
/// circular modules become one element each.
pub fn render_svg(grid: &ModuleGrid, layout: &Layout, paint: &Paint) -> String {
    let sz = layout.size;
    let cell = layout.cell;
    let fill = paint_attr("fill", paint.color);

    let mut svg = String::new();
    let mut path = String::new();
    let mut shapes = String::new();

    for (r, c) in grid.dark_modules() {
        let (x, y) = (layout.origin(c), layout.origin(r));
        match paint.shape_at(grid, layout, r, c) {
            ModuleShape::Square => {
                let _ = write!(path, "M{} {}h{w}v{w}h-{w}z", num(x), num(y), w = num(cell));
            }
            ModuleShape::Rounded(rad) => {
                let _ = writeln!(
                    shapes,
                    r#"<rect x="{}" y="{}" width="{w}" height="{w}" rx="{rad}" ry="{rad}"{fill}/>"#,
                    num(x),
                    num(y),
                    w = num(cell),
                    rad = num(rad * cell),
                );
            }
            ModuleShape::Circle(rad) => {
                let _ = writeln!(
                    shapes,
                    r#"<circle cx="{}" cy="{}" r="{}"{fill}/>"#,
                    num(x + cell / 2.0),
                    num(y + cell / 2.0),
                    num(rad * cell),
                );
            }
        }
    }

    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{sz}" height="{sz}" viewBox="0 0 {sz} {sz}">"#
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%"{}/>"#, paint_attr("fill", paint.background));
    if !path.is_empty() {
        let _ = writeln!(svg, r#"<path{fill} shape-rendering="crispEdges" d="{path}"/>"#);
    }
    svg.push_str(&shapes);

    if paint.style == Style::EdgeCut {
        if let Some(inset) = layout.edge_cut_inset(EDGE_CUT_SVG_INSET).filter(|&i| sz as f32 > 2.0 * i) {
            let side = sz as f32 - 2.0 * inset;
            let _ = writeln!(
                svg,
                r#"<rect x="{i}" y="{i}" width="{s}" height="{s}" rx="{r}" ry="{r}" fill="none"{stroke} stroke-width="{sw}"/>"#,
                i = num(inset),
                s = num(side),
                r = num(EDGE_CUT_RADIUS),
                stroke = paint_attr("stroke", paint.color),
                sw = num(cell / 2.0),
            );
        }
    }

    svg.push_str("</svg>\n");
    svg
}

// Color attribute with its opacity when translucent
fn paint_attr(name: &str, color: Color) -> String {
    match color.alpha() {
        255 => format!(r#" {name}="{}""#, color.to_hex_rgb()),
        _ => format!(r#" {name}="{}" {name}-opacity="{}""#, color.to_hex_rgb(), num(color.opacity())),
    }
}

// Shortest decimal form with at most 2 fraction digits
fn num(v: f32) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" => "0".to_string(),
        s => s.to_string(),
    }
}

#[cfg(test)]
mod svg_tests {
    use test_case::test_case;

    use super::{num, render_svg};
    use crate::builder::ModuleGrid;
    use crate::common::metadata::Color;
    use crate::render::{Layout, Paint, Style};

    fn paint(style: Style, corner_radius: u32) -> Paint {
        Paint { color: Color::BLACK, background: Color::WHITE, style, corner_radius }
    }

    fn checkered(w: usize) -> ModuleGrid {
        ModuleGrid::new(w, (0..w * w).map(|i| (i / w + i % w) % 2 == 0).collect()).unwrap()
    }

    #[test_case(10.0, "10")]
    #[test_case(9.090909, "9.09")]
    #[test_case(0.5, "0.5")]
    #[test_case(-0.001, "0")]
    fn test_num(v: f32, exp: &str) {
        assert_eq!(num(v), exp);
    }

    #[test]
    fn test_standard_svg() {
        let grid = checkered(21);
        let layout = Layout::new(21, 4, 290).unwrap();
        let svg = render_svg(&grid, &layout, &paint(Style::Standard, 0));

        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="290" height="290""#));
        assert!(svg.contains(r##"<rect width="100%" height="100%" fill="#ffffff"/>"##));
        assert!(svg.contains("M40 40h10v10h-10z"));
        assert_eq!(svg.matches('z').count(), grid.count_dark_modules());
        assert!(!svg.contains("<circle"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_dots_svg() {
        let grid = checkered(25);
        let layout = Layout::new(25, 4, 330).unwrap();
        let svg = render_svg(&grid, &layout, &paint(Style::Dots, 0));

        let circles = svg.matches("<circle").count();
        let squares = svg.matches('z').count();
        assert!(circles > 0);
        assert_eq!(circles + squares, grid.count_dark_modules());
        assert!(svg.contains(r#"r="4.25""#));
    }

    #[test]
    fn test_rounded_svg() {
        let grid = checkered(21);
        let layout = Layout::new(21, 4, 290).unwrap();
        let svg = render_svg(&grid, &layout, &paint(Style::Rounded, 0));

        // Finders & timing stay in the square path
        let rounded = svg.matches("<rect x=").count();
        let squares = svg.matches('z').count();
        assert!(rounded > 0 && squares > 0);
        assert_eq!(rounded + squares, grid.count_dark_modules());
        assert!(svg.contains(r#"rx="2.5" ry="2.5""#));
        assert!(svg.contains("M40 40h10v10h-10z"));
    }

    #[test]
    fn test_corner_radius_svg() {
        let grid = checkered(21);
        let layout = Layout::new(21, 4, 580).unwrap();
        let svg = render_svg(&grid, &layout, &paint(Style::Standard, 8));
        assert!(svg.contains(r#"rx="8" ry="8""#));

        // Clamped to half a cell
        let svg = render_svg(&grid, &layout, &paint(Style::Standard, 16));
        assert!(svg.contains(r#"rx="10" ry="10""#));
    }

    #[test]
    fn test_edge_cut_svg() {
        let grid = checkered(21);
        let layout = Layout::new(21, 4, 290).unwrap();
        let svg = render_svg(&grid, &layout, &paint(Style::EdgeCut, 0));
        assert!(svg.contains(
            r##"<rect x="10" y="10" width="270" height="270" rx="15" ry="15" fill="none" stroke="#000000" stroke-width="5"/>"##
        ));

        let svg = render_svg(&grid, &layout, &paint(Style::Standard, 0));
        assert!(!svg.contains("stroke"));
    }

    #[test]
    fn test_edge_cut_svg_narrow_margin() {
        let grid = checkered(21);

        // One module of quiet zone pulls the outline to the canvas edge
        let layout = Layout::new(21, 1, 230).unwrap();
        let svg = render_svg(&grid, &layout, &paint(Style::EdgeCut, 0));
        assert!(svg.contains(r#"<rect x="0" y="0" width="230" height="230""#));

        let layout = Layout::new(21, 0, 210).unwrap();
        let svg = render_svg(&grid, &layout, &paint(Style::EdgeCut, 0));
        assert!(!svg.contains("stroke"));
    }

    #[test]
    fn test_translucent_color() {
        let grid = checkered(21);
        let layout = Layout::new(21, 4, 290).unwrap();
        let p = Paint { background: Color([255, 255, 255, 0]), ..paint(Style::Standard, 0) };
        let svg = render_svg(&grid, &layout, &p);
        assert!(svg.contains(r##"fill="#ffffff" fill-opacity="0""##));
    }
}

//! SVG cut file for the cutting machine, measured in millimetres.

use goods_kit_common::{BoundingBox, Point, units};
use crate::io::export::DesignExport;

const CUT_STROKE: &str = "#ff0000";
const BOARD_STROKE: &str = "#0000ff";
/// Machines treat strokes this thin as cut lines
const HAIRLINE_MM: f64 = 0.01;
const MARGIN_MM: f64 = 1.0;

/// Render the cutline (red hairline), board (blue) and one circle per hole.
///
/// Outlines are converted from image pixels at the export's DPI; an export
/// without any path gives an empty page. Holes come from the last build,
/// or from `hole` when the export carries none.
pub fn cut_svg(export: &DesignExport) -> String {
    let dpi = export.size.dpi;
    let to_mm = |p: &Point| Point::new(units::px_to_mm(p.x, dpi), units::px_to_mm(p.y, dpi));

    let cut: Vec<Point> = export.paths.cutline_path.iter().flatten().map(to_mm).collect();
    let board: Vec<Point> = export.paths.board_path.iter().flatten().map(to_mm).collect();
    let holes: Vec<(Point, f64)> = if export.state.holes.is_empty() {
        vec![(to_mm(&Point::new(export.hole.x, export.hole.y)), export.hole.diameter_mm / 2.0)]
    } else {
        export
            .state
            .holes
            .iter()
            .map(|h| (to_mm(&h.center()), units::px_to_mm(h.r, dpi)))
            .collect()
    };

    let outline = if cut.is_empty() { &board } else { &cut };
    let bounds = BoundingBox::from_points(outline).unwrap_or(BoundingBox {
        min_x: 0.0,
        min_y: 0.0,
        max_x: 0.0,
        max_y: 0.0,
    });
    let (x0, y0) = (bounds.min_x - MARGIN_MM, bounds.min_y - MARGIN_MM);
    let (w, h) = (bounds.width() + 2.0 * MARGIN_MM, bounds.height() + 2.0 * MARGIN_MM);

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.3}mm" height="{h:.3}mm" viewBox="{x0:.3} {y0:.3} {w:.3} {h:.3}">"#
    );
    svg.push('\n');
    if !board.is_empty() {
        svg.push_str(&format!(
            r#"  <path id="board" d="{}" fill="none" stroke="{BOARD_STROKE}" stroke-width="0.1"/>"#,
            path_data(&board)
        ));
        svg.push('\n');
    }
    if !cut.is_empty() {
        svg.push_str(&format!(
            r#"  <path id="cutline" d="{}" fill="none" stroke="{CUT_STROKE}" stroke-width="{HAIRLINE_MM}"/>"#,
            path_data(&cut)
        ));
        svg.push('\n');
    }
    if !outline.is_empty() {
        let drilled = holes.iter().filter(|(_, r)| *r > 0.0);
        for (i, (center, r)) in drilled.enumerate() {
            svg.push_str(&format!(
                r#"  <circle id="hole-{}" cx="{:.3}" cy="{:.3}" r="{:.3}" fill="none" stroke="{CUT_STROKE}" stroke-width="{HAIRLINE_MM}"/>"#,
                i + 1,
                center.x,
                center.y,
                r
            ));
            svg.push('\n');
        }
    }
    svg.push_str("</svg>\n");
    svg
}

fn path_data(points: &[Point]) -> String {
    let mut d: String = points
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{}{:.3} {:.3} ", if i == 0 { 'M' } else { 'L' }, p.x, p.y))
        .collect();
    d.push('Z');
    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{editor::EditorStore, io::export::ExportPaths, params::HoleSpec};

    fn export_with(paths: ExportPaths) -> DesignExport {
        let mut export = EditorStore::default().export(false).unwrap();
        export.paths = paths;
        export.hole = HoleSpec { x: 118.11, y: 59.055, diameter_mm: 3.0 };
        export
    }

    #[test]
    fn test_paths_are_converted_to_millimetres() {
        // 236.22px is 20mm at 300 dpi
        let square = vec![
            Point::new(0.0, 0.0),
            Point::new(236.22, 0.0),
            Point::new(236.22, 236.22),
            Point::new(0.0, 236.22),
        ];
        let svg = cut_svg(&export_with(ExportPaths {
            board_path: None,
            cutline_path: Some(square),
        }));
        assert!(svg.contains(r#"width="22.000mm""#), "{svg}");
        assert!(svg.contains("M0.000 0.000 L20.000 0.000"));
        assert!(svg.contains(r#"<circle id="hole-1" cx="10.000" cy="5.000" r="1.500""#));
        assert!(!svg.contains(r#"id="board""#));
    }

    #[test]
    fn test_empty_export_is_an_empty_page() {
        let svg = cut_svg(&export_with(ExportPaths::default()));
        assert!(svg.starts_with("<svg"));
        assert!(!svg.contains("<path"));
        assert!(!svg.contains("<circle"));
    }
}

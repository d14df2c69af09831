//! Triangle scan conversion.
//!
//! Triangles are filled row by row between two edges walked with
//! inverse-slope stepping. A general triangle is split at the middle
//! vertex's height into a flat-bottom and a flat-top half; the split point
//! carries interpolated position, depth, and texture coordinates so the
//! caller's per-pixel shading sees a consistent surface.

use terrain_math::{Point3, Polygon};
use terrain_texture::sampling::interpolate;

/// Invoke `draw` for every pixel covered by `poly`, in projection-space
/// integer coordinates.
pub fn rasterize_triangle(poly: &Polygon, draw: &mut impl FnMut(i64, i64)) {
    let mut pts = [poly.a, poly.b, poly.c];
    pts.sort_by(|a, b| b.y.total_cmp(&a.y));
    let [top, mid, bot] = pts;

    let flat_bottom = mid.y == bot.y;
    let flat_top = top.y == mid.y;
    if flat_bottom {
        fill_flat_bottom(top, mid, bot, draw);
    }
    if flat_top {
        fill_flat_top(bot, mid, top, draw);
    }
    if flat_bottom || flat_top {
        return;
    }

    let alpha = (mid.y - bot.y) / (top.y - bot.y);
    let split = Point3::with_uv(
        interpolate(bot.x, top.x, alpha),
        mid.y,
        interpolate(bot.z, top.z, alpha),
        interpolate(bot.u, top.u, alpha),
        interpolate(bot.v, top.v, alpha),
    );
    fill_flat_bottom(top, mid, split, draw);
    fill_flat_top(bot, mid, split, draw);
}

/// Fill a triangle whose two lower vertices share a y value, scanning
/// upward from the flat edge to the apex.
fn fill_flat_bottom(top: Point3, p1: Point3, p2: Point3, draw: &mut impl FnMut(i64, i64)) {
    let (left, right) = if p1.x <= p2.x { (p1, p2) } else { (p2, p1) };

    let inv_slope1 = (left.x.round() - top.x.round()) / (left.y.round() - top.y.round());
    let inv_slope2 = (right.x.round() - top.x.round()) / (right.y.round() - top.y.round());

    let mut x1 = left.x;
    let mut x2 = right.x;
    for scan_y in (left.y.round() as i64)..=(top.y.round() as i64) {
        for i in (x1.round() as i64)..=(x2.round() as i64) {
            draw(i, scan_y);
        }
        x1 += inv_slope1;
        x2 += inv_slope2;
    }
}

/// Fill a triangle whose two upper vertices share a y value, scanning
/// downward from the flat edge to the apex.
fn fill_flat_top(bot: Point3, p1: Point3, p2: Point3, draw: &mut impl FnMut(i64, i64)) {
    let (left, right) = if p1.x <= p2.x { (p1, p2) } else { (p2, p1) };

    let inv_slope1 = (left.x.round() - bot.x.round()) / (left.y.round() - bot.y.round());
    let inv_slope2 = (right.x.round() - bot.x.round()) / (right.y.round() - bot.y.round());

    let mut x1 = left.x;
    let mut x2 = right.x;
    let mut scan_y = left.y.round() as i64;
    while scan_y >= bot.y.round() as i64 {
        for i in (x1.round() as i64)..=(x2.round() as i64) {
            draw(i, scan_y);
        }
        x1 -= inv_slope1;
        x2 -= inv_slope2;
        scan_y -= 1;
    }
}

use imageproc::drawing::{BresenhamLineIter, Canvas};

/// A geographic line (sequence of lon/lat coordinates)
pub type LineString = Vec<(f64, f64)>;

/// Axis-aligned lon/lat bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BBox {
    pub fn of_rings<'a>(rings: impl IntoIterator<Item = &'a LineString>) -> Option<Self> {
        let mut points = rings.into_iter().flatten();
        let &(lon, lat) = points.next()?;
        let mut bbox = BBox { min_lon: lon, min_lat: lat, max_lon: lon, max_lat: lat };
        for &(lon, lat) in points {
            bbox.min_lon = bbox.min_lon.min(lon);
            bbox.min_lat = bbox.min_lat.min(lat);
            bbox.max_lon = bbox.max_lon.max(lon);
            bbox.max_lat = bbox.max_lat.max(lat);
        }
        Some(bbox)
    }

    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.min_lon, self.min_lat, self.max_lon, self.max_lat)
    }
}

/// A polygon or multipolygon, flattened into rings.
///
/// Exterior and interior rings live side by side; filling uses the even-odd
/// rule, which carves holes and unions disjoint parts without needing to
/// know which ring is which.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub rings: Vec<LineString>,
    pub bbox: BBox,
}

impl Shape {
    /// Build a shape from rings, dropping degenerate ones. `None` if nothing is left.
    pub fn new(rings: Vec<LineString>) -> Option<Self> {
        let rings: Vec<LineString> = rings.into_iter().filter(|r| r.len() >= 3).collect();
        let bbox = BBox::of_rings(&rings)?;
        Some(Self { rings, bbox })
    }
}

/// Straight edge between two canvas points, oriented top to bottom
struct Edge {
    y_top: f64,
    y_bottom: f64,
    x_at_top: f64,
    dx_dy: f64,
}

/// Fill closed canvas-space rings with the even-odd rule.
///
/// Pixel centers are sampled, so each pixel is painted at most once per call
/// even where rings of the same layer touch.
pub fn fill_rings<C: Canvas>(canvas: &mut C, rings: &[Vec<(f64, f64)>], color: C::Pixel) {
    let (width, height) = canvas.dimensions();

    let mut edges: Vec<Edge> = Vec::new();
    for ring in rings {
        if ring.len() < 3 {
            continue;
        }
        let closing = (ring[ring.len() - 1], ring[0]);
        let pairs = ring.windows(2).map(|w| (w[0], w[1])).chain(std::iter::once(closing));
        for ((x0, y0), (x1, y1)) in pairs {
            if y0 == y1 {
                continue;
            }
            let (top, bottom) = if y0 < y1 { ((x0, y0), (x1, y1)) } else { ((x1, y1), (x0, y0)) };
            edges.push(Edge {
                y_top: top.1,
                y_bottom: bottom.1,
                x_at_top: top.0,
                dx_dy: (bottom.0 - top.0) / (bottom.1 - top.1),
            });
        }
    }
    if edges.is_empty() {
        return;
    }
    edges.sort_by(|a, b| a.y_top.total_cmp(&b.y_top));

    let mut next = 0;
    let mut active: Vec<usize> = Vec::new();
    let mut crossings: Vec<f64> = Vec::new();

    for row in 0..height {
        let y = row as f64 + 0.5;

        while next < edges.len() && edges[next].y_top <= y {
            active.push(next);
            next += 1;
        }
        active.retain(|&i| edges[i].y_bottom > y);
        if active.is_empty() {
            if next >= edges.len() {
                break;
            }
            continue;
        }

        crossings.clear();
        crossings.extend(
            active
                .iter()
                .map(|&i| edges[i].x_at_top + (y - edges[i].y_top) * edges[i].dx_dy),
        );
        crossings.sort_by(f64::total_cmp);

        for span in crossings.chunks_exact(2) {
            // Pixel x is inside when its center x + 0.5 lies in [start, end)
            let start = (span[0] - 0.5).ceil().max(0.0);
            let end = (span[1] - 0.5).ceil().min(width as f64);
            if start >= end {
                continue;
            }
            for x in start as u32..end as u32 {
                canvas.draw_pixel(x, row, color);
            }
        }
    }
}

/// Stroke a canvas-space polyline at roughly `width` pixels.
///
/// Thin widths draw a single line; wider ones offset copies the way a
/// thick border is built up from one-pixel lines. Covered pixels are
/// collected first and painted once, so translucent colors stay uniform
/// where segments meet.
pub fn stroke_polyline<C: Canvas>(canvas: &mut C, points: &[(f64, f64)], width: f64, color: C::Pixel) {
    let (w, h) = canvas.dimensions();
    let passes = width.round().max(1.0) as i32;

    let mut covered: Vec<(i32, i32)> = Vec::new();
    for (a, b) in points.iter().zip(points.iter().skip(1)) {
        for offset in 0..passes {
            let d = (offset - passes / 2) as f32;
            let (dx, dy) = if (b.0 - a.0).abs() > (b.1 - a.1).abs() { (0.0, d) } else { (d, 0.0) };
            covered.extend(BresenhamLineIter::new(
                (a.0 as f32 + dx, a.1 as f32 + dy),
                (b.0 as f32 + dx, b.1 as f32 + dy),
            ));
        }
    }
    covered.sort_unstable();
    covered.dedup();

    for (x, y) in covered {
        if x >= 0 && y >= 0 && (x as u32) < w && (y as u32) < h {
            canvas.draw_pixel(x as u32, y as u32, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use imageproc::drawing::Blend;
    use std::collections::HashSet;

    const INK: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn inked(image: &RgbaImage) -> usize {
        image.pixels().filter(|p| **p == INK).count()
    }

    fn square(x0: f64, y0: f64, size: f64) -> Vec<(f64, f64)> {
        vec![(x0, y0), (x0 + size, y0), (x0 + size, y0 + size), (x0, y0 + size)]
    }

    #[test]
    fn test_fill_square() {
        let mut image = RgbaImage::new(20, 20);
        fill_rings(&mut image, &[square(2.0, 2.0, 10.0)], INK);
        assert_eq!(inked(&image), 100);
        assert_eq!(*image.get_pixel(5, 5), INK);
        assert_ne!(*image.get_pixel(15, 15), INK);
    }

    #[test]
    fn test_fill_carves_holes() {
        let mut image = RgbaImage::new(20, 20);
        fill_rings(&mut image, &[square(0.0, 0.0, 12.0), square(4.0, 4.0, 4.0)], INK);
        assert_eq!(inked(&image), 144 - 16);
        assert_ne!(*image.get_pixel(5, 5), INK);
    }

    #[test]
    fn test_fill_clips_to_canvas() {
        let mut image = RgbaImage::new(10, 10);
        fill_rings(&mut image, &[square(-5.0, -5.0, 30.0)], INK);
        assert_eq!(inked(&image), 100);
    }

    #[test]
    fn test_fill_ignores_degenerate_rings() {
        let mut image = RgbaImage::new(10, 10);
        fill_rings(&mut image, &[vec![(1.0, 1.0), (8.0, 8.0)]], INK);
        assert_eq!(inked(&image), 0);
    }

    #[test]
    fn test_stroke_horizontal_line() {
        let mut image = RgbaImage::new(10, 5);
        stroke_polyline(&mut image, &[(0.0, 2.0), (9.0, 2.0)], 1.0, INK);
        assert_eq!(inked(&image), 10);
    }

    #[test]
    fn test_thick_stroke_covers_more_rows() {
        let mut image = RgbaImage::new(10, 9);
        stroke_polyline(&mut image, &[(0.0, 4.0), (9.0, 4.0)], 3.0, INK);
        assert_eq!(inked(&image), 30);
    }

    #[test]
    fn test_translucent_polyline_blends_each_pixel_once() {
        let mut canvas = Blend(RgbaImage::from_pixel(20, 10, Rgba([255, 255, 255, 255])));
        let zigzag = [(0.0, 5.0), (4.0, 5.0), (8.0, 2.0), (12.0, 2.0), (16.0, 7.0), (19.0, 7.0)];
        stroke_polyline(&mut canvas, &zigzag, 1.0, Rgba([255, 0, 0, 128]));

        let colors: HashSet<Rgba<u8>> = canvas
            .0
            .pixels()
            .filter(|p| **p != Rgba([255, 255, 255, 255]))
            .copied()
            .collect();
        assert_eq!(colors.len(), 1, "joints blended twice: {colors:?}");
    }

    #[test]
    fn test_shape_drops_degenerate_rings() {
        assert!(Shape::new(vec![vec![(0.0, 0.0), (1.0, 1.0)]]).is_none());
        let shape = Shape::new(vec![vec![(0.0, 0.0), (4.0, 0.0), (4.0, 3.0)]]).unwrap();
        assert_eq!(shape.bbox.as_tuple(), (0.0, 0.0, 4.0, 3.0));
    }
}

use tracing::debug;

use crate::map::figure::Figure;
use crate::map::geometry::{fill_rings, stroke_polyline, LineString, Shape};
use crate::map::globe::{walk_great_circle, GlobeViewport};
use crate::map::spatial::FeatureGrid;
use crate::resolver::BoundaryResolver;

/// Share of the figure side covered by the globe disc
const GLOBE_FILL: f64 = 0.77;

/// Spatial grid cell size for the land index, in degrees
const LAND_CELL_DEG: f64 = 10.0;

/// Segments used to approximate the limb circle
const LIMB_SEGMENTS: usize = 720;

/// Graticule spacing in degrees
const GRATICULE_STEP: i32 = 30;

mod style {
    use image::Rgba;

    pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
    /// aliceblue
    pub const LAND: Rgba<u8> = Rgba([240, 248, 255, 255]);
    /// lightsteelblue
    pub const OCEAN: Rgba<u8> = Rgba([176, 196, 222, 255]);
    pub const BORDER: Rgba<u8> = OCEAN;
    pub const LIMB: Rgba<u8> = OCEAN;
    pub const HIGHLIGHT: Rgba<u8> = Rgba([255, 0, 0, 128]);
    /// slategrey at 20%
    pub const GRATICULE: Rgba<u8> = Rgba([112, 128, 144, 51]);
    pub const POINTER: Rgba<u8> = Rgba([255, 0, 0, 128]);

    // Line widths in points
    pub const BORDER_PT: f64 = 0.2;
    pub const LIMB_PT: f64 = 0.8;
    pub const GRID_PT: f64 = 0.3;
}

/// Map layers, drawn bottom to top in [`Layer::ORDER`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Land,
    Ocean,
    Borders,
    Limb,
    Highlight,
    Graticule,
    Pointer,
}

impl Layer {
    pub const ORDER: [Layer; 7] = [
        Layer::Land,
        Layer::Ocean,
        Layer::Borders,
        Layer::Limb,
        Layer::Highlight,
        Layer::Graticule,
        Layer::Pointer,
    ];
}

/// Output size of a rendered figure
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderSettings {
    /// Square figure side in pixels
    pub size_px: u32,
    /// Dots per inch, used to convert line widths from points
    pub dpi: f64,
}

impl RenderSettings {
    pub fn new(figure_inches: f64, dpi: u32) -> Self {
        let size_px = (figure_inches * dpi as f64).round().max(1.0) as u32;
        Self { size_px, dpi: dpi as f64 }
    }

    fn line_px(&self, points: f64) -> f64 {
        GlobeViewport::points_to_pixels(points, self.dpi)
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::new(6.0, 300)
    }
}

/// Background geography shared by every map: land masses and land borders
pub struct Basemap {
    land: Vec<Shape>,
    land_index: FeatureGrid,
    borders: Vec<LineString>,
}

impl Basemap {
    pub fn new(land: Vec<Shape>, borders: Vec<LineString>) -> Self {
        let land_index = FeatureGrid::build(land.iter().map(|s| s.bbox.as_tuple()), LAND_CELL_DEG);
        Self { land, land_index, borders }
    }

    /// A basemap with no land; maps show ocean, grid and highlight only
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    /// Check if any data is loaded
    pub fn has_data(&self) -> bool {
        !self.land.is_empty()
    }

    /// Land shapes that may face the viewer
    fn visible_land(&self, globe: &GlobeViewport) -> impl Iterator<Item = &Shape> {
        let (min_lon, min_lat, max_lon, max_lat) = globe.visible_bounds();
        self.land_index
            .query(min_lon, min_lat, max_lon, max_lat)
            .into_iter()
            .filter_map(|idx| self.land.get(idx))
    }
}

/// Renders one orthographic globe per country, centered on its coordinates
pub struct MapRenderer<R> {
    basemap: Basemap,
    resolver: R,
    settings: RenderSettings,
}

impl<R: BoundaryResolver> MapRenderer<R> {
    pub fn new(basemap: Basemap, resolver: R, settings: RenderSettings) -> Self {
        Self { basemap, resolver, settings }
    }

    /// Resolve `code`'s boundary and render a globe centered on (lat, lon).
    ///
    /// An unknown code is not an error: the figure just has no highlight.
    pub fn render(&self, code: &str, lat: f64, lon: f64) -> Figure {
        let highlight = self.resolver.resolve(code);
        debug!(code, shapes = highlight.len(), "resolved boundary");
        self.draw(&highlight, lat, lon)
    }

    /// Render a globe centered on (lat, lon) with `highlight` filled on top of the basemap
    pub fn draw(&self, highlight: &[Shape], lat: f64, lon: f64) -> Figure {
        let size = self.settings.size_px;
        let radius = size as f64 * GLOBE_FILL / 2.0;
        let globe = GlobeViewport::new(lon, lat, radius, size as usize, size as usize);
        let mut figure = Figure::new(size, size, style::BACKGROUND);
        figure.set_highlighted(highlight.len());

        // Land rings are needed twice: as land and as holes in the ocean
        let land: Vec<Vec<(f64, f64)>> = self
            .basemap
            .visible_land(&globe)
            .flat_map(|shape| project_rings(&globe, shape))
            .collect();

        for layer in Layer::ORDER {
            let canvas = figure.canvas_mut();
            match layer {
                Layer::Land => fill_rings(canvas, &land, style::LAND),
                Layer::Ocean => {
                    let mut rings = Vec::with_capacity(land.len() + 1);
                    rings.push(globe.limb(LIMB_SEGMENTS));
                    rings.extend(land.iter().cloned());
                    fill_rings(canvas, &rings, style::OCEAN);
                }
                Layer::Borders => {
                    let width = self.settings.line_px(style::BORDER_PT);
                    for line in &self.basemap.borders {
                        for run in project_path(&globe, line) {
                            stroke_polyline(canvas, &run, width, style::BORDER);
                        }
                    }
                }
                Layer::Limb => {
                    let width = self.settings.line_px(style::LIMB_PT);
                    stroke_polyline(canvas, &globe.limb(LIMB_SEGMENTS), width, style::LIMB);
                }
                Layer::Highlight => {
                    let rings: Vec<Vec<(f64, f64)>> =
                        highlight.iter().flat_map(|shape| project_rings(&globe, shape)).collect();
                    fill_rings(canvas, &rings, style::HIGHLIGHT);
                }
                Layer::Graticule => {
                    let width = self.settings.line_px(style::GRID_PT);
                    for line in graticule() {
                        for run in project_path(&globe, &line) {
                            stroke_polyline(canvas, &run, width, style::GRATICULE);
                        }
                    }
                }
                Layer::Pointer => {
                    let width = self.settings.line_px(style::GRID_PT);
                    for line in pointer(lat, lon) {
                        for run in project_path(&globe, &line) {
                            stroke_polyline(canvas, &run, width, style::POINTER);
                        }
                    }
                }
            }
        }

        figure
    }
}

/// Project every ring of a shape, following great circles between vertices.
/// Rings entirely on the far side are dropped.
fn project_rings(globe: &GlobeViewport, shape: &Shape) -> Vec<Vec<(f64, f64)>> {
    let mut projected = Vec::with_capacity(shape.rings.len());
    for ring in &shape.rings {
        let Some(&(lon0, lat0)) = ring.first() else {
            continue;
        };
        let mut points = Vec::with_capacity(ring.len());
        let mut any_front = false;
        let mut push = |lon: f64, lat: f64| {
            let p = globe.project_clamped(lon, lat);
            any_front |= p.front;
            points.push((p.x, p.y));
        };

        push(lon0, lat0);
        let closing = (ring[ring.len() - 1], ring[0]);
        let edges = ring.windows(2).map(|w| (w[0], w[1])).chain(std::iter::once(closing));
        for ((lon_a, lat_a), (lon_b, lat_b)) in edges {
            walk_great_circle(lon_a, lat_a, lon_b, lat_b, &mut push);
        }

        if any_front {
            projected.push(points);
        }
    }
    projected
}

/// Split a geographic polyline into runs of front-facing canvas points.
///
/// A run cut by the horizon starts or ends on the limb, at the clamped
/// position of the first hidden sample.
fn project_path(globe: &GlobeViewport, line: &[(f64, f64)]) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let Some(&(lon0, lat0)) = line.first() else {
        return runs;
    };

    let mut current: Vec<(f64, f64)> = Vec::new();
    let mut edge: Option<(f64, f64)> = None;
    let mut visit = |lon: f64, lat: f64| {
        let p = globe.project_clamped(lon, lat);
        if p.front {
            if current.is_empty() {
                current.extend(edge.take());
            }
            current.push((p.x, p.y));
        } else {
            if !current.is_empty() {
                current.push((p.x, p.y));
                runs.push(std::mem::take(&mut current));
            }
            edge = Some((p.x, p.y));
        }
    };

    visit(lon0, lat0);
    for pair in line.windows(2) {
        let ((lon_a, lat_a), (lon_b, lat_b)) = (pair[0], pair[1]);
        walk_great_circle(lon_a, lat_a, lon_b, lat_b, &mut visit);
    }
    if current.len() >= 2 {
        runs.push(current);
    }
    runs
}

/// Meridians and parallels every [`GRATICULE_STEP`] degrees, poles excluded
fn graticule() -> Vec<LineString> {
    let meridians = (-180..180).step_by(GRATICULE_STEP as usize).map(|lon| meridian(lon as f64, 2));
    let parallels = (-90 + GRATICULE_STEP..90)
        .step_by(GRATICULE_STEP as usize)
        .map(|lat| parallel(lat as f64, 2));
    meridians.chain(parallels).collect()
}

/// One meridian and one parallel crossing exactly at (lat, lon)
fn pointer(lat: f64, lon: f64) -> [LineString; 2] {
    [meridian(lon, 1), parallel(lat, 1)]
}

fn meridian(lon: f64, step: usize) -> LineString {
    (-90..=90).step_by(step).map(|lat| (lon, lat as f64)).collect()
}

fn parallel(lat: f64, step: usize) -> LineString {
    (-180..=180).step_by(step).map(|lon| (lon as f64, lat)).collect()
}

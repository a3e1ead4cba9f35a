use glam::DVec3;
use std::f64::consts::PI;

/// A projected point in canvas pixels.
///
/// `front` is false for points on the far hemisphere; those are clamped
/// radially onto the limb so rings crossing the horizon close along it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
    pub front: bool,
}

/// Globe viewport using orthographic projection of a sphere seen from space.
/// Orientation stored as a rotation matrix (3 column vectors) for
/// efficient point transformation.
#[derive(Clone, Debug)]
pub struct GlobeViewport {
    /// Forward direction (what points at the camera)
    forward: DVec3,
    /// Right direction
    right: DVec3,
    /// Up direction
    up: DVec3,
    /// Sphere radius in pixels
    pub radius: f64,
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
}

impl GlobeViewport {
    /// Build a globe viewport centered on (lon, lat) with given radius.
    pub fn new(center_lon: f64, center_lat: f64, radius: f64, width: usize, height: usize) -> Self {
        let lon_rad = center_lon.to_radians();
        let lat_rad = center_lat.to_radians();

        // Forward = direction from origin to (lon, lat) on unit sphere
        let forward = DVec3::new(
            lat_rad.cos() * lon_rad.cos(),
            lat_rad.cos() * lon_rad.sin(),
            lat_rad.sin(),
        );

        // Up = derivative of forward w.r.t. latitude (points north on sphere).
        // Stays non-zero at the poles, where it points along -lon.
        let raw_up = DVec3::new(
            -lat_rad.sin() * lon_rad.cos(),
            -lat_rad.sin() * lon_rad.sin(),
            lat_rad.cos(),
        );

        // Right = up × forward (points east)
        let right = raw_up.cross(forward).normalize();
        let up = forward.cross(right).normalize();

        Self { forward, right, up, radius, width, height }
    }

    /// Canvas position of the disc center.
    pub fn center_px(&self) -> (f64, f64) {
        (self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// Extract the center lon/lat that the globe is looking at.
    pub fn center_lonlat(&self) -> (f64, f64) {
        let lat = self.forward.z.clamp(-1.0, 1.0).asin().to_degrees();
        let lon = self.forward.y.atan2(self.forward.x).to_degrees();
        (lon, lat)
    }

    /// Project a geographic point to screen pixels.
    /// Returns `None` for back-face points (behind the visible hemisphere).
    pub fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let p = self.project_clamped(lon, lat);
        p.front.then_some((p.x, p.y))
    }

    /// Project a geographic point, clamping back-face points onto the limb.
    pub fn project_clamped(&self, lon: f64, lat: f64) -> ScreenPoint {
        let p = lonlat_to_vec3(lon, lat);

        // Dot with forward: positive = front-facing
        let front = p.dot(self.forward) >= 0.0;

        // Orthographic: project onto right/up plane
        let mut sx = p.dot(self.right);
        let mut sy = p.dot(self.up);

        if !front {
            let len = (sx * sx + sy * sy).sqrt();
            if len > 1e-12 {
                sx /= len;
                sy /= len;
            } else {
                // Antipode: every limb direction is equally far
                sx = 1.0;
                sy = 0.0;
            }
        }

        let (cx, cy) = self.center_px();
        ScreenPoint {
            x: cx + sx * self.radius,
            y: cy - sy * self.radius,
            front,
        }
    }

    /// The visible limb as a closed ring of canvas points.
    pub fn limb(&self, segments: usize) -> Vec<(f64, f64)> {
        let (cx, cy) = self.center_px();
        (0..=segments)
            .map(|i| {
                let angle = (i as f64 / segments as f64) * 2.0 * PI;
                (cx + angle.cos() * self.radius, cy - angle.sin() * self.radius)
            })
            .collect()
    }

    /// Conservative lat/lon bounding box of the visible hemisphere.
    /// Used for spatial index queries. Samples points around the visible disk edge.
    pub fn visible_bounds(&self) -> (f64, f64, f64, f64) {
        let mut min_lon = f64::MAX;
        let mut max_lon = f64::MIN;
        let mut min_lat = f64::MAX;
        let mut max_lat = f64::MIN;

        // Sample the center
        let (clon, clat) = self.center_lonlat();
        min_lon = min_lon.min(clon);
        max_lon = max_lon.max(clon);
        min_lat = min_lat.min(clat);
        max_lat = max_lat.max(clat);

        // Sample 32 points around the visible disk edge
        for i in 0..32 {
            let angle = (i as f64 / 32.0) * 2.0 * PI;
            let p = self.right * angle.cos() + self.up * angle.sin();
            let lat = p.z.clamp(-1.0, 1.0).asin().to_degrees();
            let lon = p.y.atan2(p.x).to_degrees();

            min_lon = min_lon.min(lon);
            max_lon = max_lon.max(lon);
            min_lat = min_lat.min(lat);
            max_lat = max_lat.max(lat);
        }

        // If the visible hemisphere spans > 180° longitude, it likely wraps
        // around — return full range to avoid missing features
        if max_lon - min_lon > 180.0 {
            min_lon = -180.0;
            max_lon = 180.0;
        }

        // A pole is visible whenever the center sits in its hemisphere
        if self.forward.z >= 0.0 {
            max_lat = 90.0;
        }
        if self.forward.z <= 0.0 {
            min_lat = -90.0;
        }

        (min_lon.max(-180.0), min_lat.max(-90.0), max_lon.min(180.0), max_lat.min(90.0))
    }

    /// Convert a line width in points to canvas pixels at `dpi`.
    pub fn points_to_pixels(points: f64, dpi: f64) -> f64 {
        points * dpi / 72.0
    }
}

/// Convert lon/lat (degrees) to a unit sphere vector.
#[inline(always)]
fn lonlat_to_vec3(lon: f64, lat: f64) -> DVec3 {
    let lon_rad = lon.to_radians();
    let lat_rad = lat.to_radians();
    DVec3::new(
        lat_rad.cos() * lon_rad.cos(),
        lat_rad.cos() * lon_rad.sin(),
        lat_rad.sin(),
    )
}

/// Interpolate along a great circle arc and call a visitor for each subdivision point.
/// Subdivides into ~2° segments so long edges bend with the sphere.
/// The start point is not emitted; the end point always is.
#[inline]
pub fn walk_great_circle(
    lon0: f64, lat0: f64,
    lon1: f64, lat1: f64,
    mut visitor: impl FnMut(f64, f64),
) {
    let a = lonlat_to_vec3(lon0, lat0);
    let b = lonlat_to_vec3(lon1, lat1);

    let dot = a.dot(b).clamp(-1.0, 1.0);
    let angle = dot.acos(); // angular distance in radians

    // ~2° segments
    let steps = ((angle.to_degrees() / 2.0).ceil() as usize).max(1);

    if steps == 1 {
        // Short segment, just emit endpoint
        visitor(lon1, lat1);
        return;
    }

    let sin_angle = angle.sin();
    if sin_angle.abs() < 1e-10 {
        // Points are nearly identical or antipodal
        visitor(lon1, lat1);
        return;
    }

    for i in 1..=steps {
        let t = i as f64 / steps as f64;
        let sa = ((1.0 - t) * angle).sin() / sin_angle;
        let sb = (t * angle).sin() / sin_angle;
        let p = a * sa + b * sb;

        let lat = p.z.clamp(-1.0, 1.0).asin().to_degrees();
        let lon = p.y.atan2(p.x).to_degrees();
        visitor(lon, lat);
    }
}

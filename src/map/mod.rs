mod figure;
mod geometry;
mod globe;
mod renderer;
mod spatial;

pub use figure::Figure;
pub use geometry::{fill_rings, stroke_polyline, BBox, LineString, Shape};
pub use globe::{walk_great_circle, GlobeViewport, ScreenPoint};
pub use renderer::{Basemap, Layer, MapRenderer, RenderSettings};
pub use spatial::FeatureGrid;

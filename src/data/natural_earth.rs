use reqwest::blocking::Client;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use super::{load_keyed_shapes, load_lines, load_shapes};
use crate::error::DatasetError;
use crate::map::Basemap;
use crate::resolver::CountryBoundaries;

/// Admin-0 country polygons, 1:50m
pub const COUNTRIES_FILE: &str = "ne_50m_admin_0_countries.geojson";
/// Land polygons, 1:50m
pub const LAND_FILE: &str = "ne_50m_land.geojson";
/// Land boundary lines between countries, 1:110m
pub const BORDERS_FILE: &str = "ne_110m_admin_0_boundary_lines_land.geojson";
/// Alpha-3 code attribute of the countries dataset
pub const COUNTRY_CODE_PROPERTY: &str = "ADM0_A3";

/// Natural Earth GeoJSON files cached in a local directory.
///
/// Missing files are downloaded from `base_url` on first use and reused
/// afterwards.
pub struct NaturalEarth {
    data_dir: PathBuf,
    base_url: String,
    client: Client,
}

impl NaturalEarth {
    pub fn new(data_dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Result<Self, DatasetError> {
        let base_url = base_url.into();
        let client = Client::builder()
            .user_agent(concat!("globe-maps/", env!("CARGO_PKG_VERSION")))
            .timeout(None::<Duration>)
            .build()
            .map_err(|source| DatasetError::Download { url: base_url.clone(), source })?;
        Ok(Self {
            data_dir: data_dir.into(),
            base_url,
            client,
        })
    }

    /// Local path of `file_name`, downloading it first if absent
    pub fn ensure(&self, file_name: &str) -> Result<PathBuf, DatasetError> {
        let path = self.data_dir.join(file_name);
        if path.exists() {
            return Ok(path);
        }

        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), file_name);
        info!(%url, "downloading dataset");

        let bytes = self
            .client
            .get(&url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.bytes())
            .map_err(|source| DatasetError::Download { url: url.clone(), source })?;

        fs::create_dir_all(&self.data_dir).map_err(io_err(&self.data_dir))?;

        // Write aside then rename, so an interrupted download never looks complete
        let partial = path.with_extension("part");
        fs::write(&partial, &bytes).map_err(io_err(&partial))?;
        fs::rename(&partial, &path).map_err(io_err(&path))?;

        info!(path = %path.display(), bytes = bytes.len(), "dataset saved");
        Ok(path)
    }

    /// Country boundaries keyed by alpha-3 code
    pub fn load_boundaries(&self) -> Result<CountryBoundaries, DatasetError> {
        let path = self.ensure(COUNTRIES_FILE)?;
        let features = load_keyed_shapes(&path, COUNTRY_CODE_PROPERTY)?;
        let boundaries = CountryBoundaries::new(features);
        info!(features = boundaries.len(), "loaded country boundaries");
        Ok(boundaries)
    }

    /// Land masses and land borders
    pub fn load_basemap(&self) -> Result<Basemap, DatasetError> {
        let land = load_shapes(&self.ensure(LAND_FILE)?)?;
        let borders = load_lines(&self.ensure(BORDERS_FILE)?)?;
        info!(land = land.len(), borders = borders.len(), "loaded basemap");
        let basemap = Basemap::new(land, borders);
        if !basemap.has_data() {
            warn!(file = LAND_FILE, "no land polygons; maps will show ocean only");
        }
        Ok(basemap)
    }
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> DatasetError {
    let path = path.to_path_buf();
    move |source| DatasetError::Io { path, source }
}

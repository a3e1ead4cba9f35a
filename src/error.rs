use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to obtain the country list. Aborts the whole run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("response from {url} is not a JSON array of countries: {source}")]
    Parse {
        url: String,
        #[source]
        source: simd_json::Error,
    },
}

/// Failure to obtain or read a reference dataset. Fatal when loading at startup.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to download {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid GeoJSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: geojson::Error,
    },
    #[error("{} holds a bare geometry, expected features", .0.display())]
    NotFeatureCollection(PathBuf),
}

/// Failure to turn one country record into a saved map. The batch skips it.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("field `{0}` has the wrong type")]
    InvalidField(&'static str),
    #[error("`latlng` must start with two finite numbers")]
    MalformedCoordinates,
    #[error("country code {0:?} cannot name an output file")]
    InvalidCode(String),
    #[error("failed to write {}: {source}", .path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

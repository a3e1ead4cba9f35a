use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

use crate::error::{FetchError, RecordError};

/// Raw country object as served by the provider.
///
/// Kept untyped so one malformed entry fails on its own during the batch
/// instead of failing the whole response.
pub type CountryRecord = Value;

/// Fields a map needs, extracted from a [`CountryRecord`]
#[derive(Clone, Debug, PartialEq)]
pub struct Country {
    /// ISO 3166 alpha-3 code
    pub code: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Country {
    /// Extract `alpha3Code`, `name` and `latlng` from a record.
    pub fn from_record(record: &CountryRecord) -> Result<Self, RecordError> {
        let code = string_field(record, "alpha3Code")?;
        let name = string_field(record, "name")?;

        let latlng = record
            .get("latlng")
            .ok_or(RecordError::MissingField("latlng"))?
            .as_array()
            .ok_or(RecordError::InvalidField("latlng"))?;
        let (lat, lon) = match latlng.as_slice() {
            [lat, lon, ..] => (lat.as_f64(), lon.as_f64()),
            _ => return Err(RecordError::MalformedCoordinates),
        };
        let (Some(lat), Some(lon)) = (lat, lon) else {
            return Err(RecordError::MalformedCoordinates);
        };
        if !lat.is_finite() || !lon.is_finite() {
            return Err(RecordError::MalformedCoordinates);
        }

        // The code becomes a file name
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(RecordError::InvalidCode(code.to_string()));
        }

        Ok(Self {
            code: code.to_string(),
            name: name.to_string(),
            lat,
            lon,
        })
    }
}

fn string_field<'a>(record: &'a Value, key: &'static str) -> Result<&'a str, RecordError> {
    record
        .get(key)
        .ok_or(RecordError::MissingField(key))?
        .as_str()
        .ok_or(RecordError::InvalidField(key))
}

/// Best-effort alpha-3 code of a record, for reporting skips
pub fn record_code(record: &CountryRecord) -> Option<String> {
    record.get("alpha3Code").and_then(Value::as_str).map(str::to_string)
}

/// Where the country list comes from
pub trait CountrySource {
    fn fetch_all(&self) -> Result<Vec<CountryRecord>, FetchError>;
}

/// REST countries endpoint, fetched with a single blocking GET
pub struct RestCountries {
    endpoint: String,
    client: Client,
}

impl RestCountries {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, FetchError> {
        let endpoint = endpoint.into();
        let client = Client::builder()
            .user_agent(concat!("globe-maps/", env!("CARGO_PKG_VERSION")))
            .timeout(None::<Duration>)
            .build()
            .map_err(|source| FetchError::Http { url: endpoint.clone(), source })?;
        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl CountrySource for RestCountries {
    fn fetch_all(&self) -> Result<Vec<CountryRecord>, FetchError> {
        let url = &self.endpoint;
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| FetchError::Http { url: url.clone(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: url.clone(), status });
        }

        let mut body = response
            .bytes()
            .map_err(|source| FetchError::Http { url: url.clone(), source })?
            .to_vec();
        parse_records(&mut body).map_err(|source| FetchError::Parse { url: url.clone(), source })
    }
}

/// Parse a response body as a JSON array of records.
pub fn parse_records(body: &mut [u8]) -> Result<Vec<CountryRecord>, simd_json::Error> {
    simd_json::serde::from_slice(body)
}

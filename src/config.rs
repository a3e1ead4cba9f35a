use clap::Parser;
use std::path::PathBuf;

use crate::map::RenderSettings;

/// Countries endpoint; v2 keeps the `alpha3Code`/`name`/`latlng` field names
pub const DEFAULT_ENDPOINT: &str = "https://restcountries.com/v2/all?fields=alpha3Code,name,latlng";

/// Natural Earth GeoJSON mirror
pub const DEFAULT_DATASET_URL: &str =
    "https://raw.githubusercontent.com/nvkelso/natural-earth-vector/master/geojson";

/// Render an orthographic globe map for every country.
///
/// With no arguments, fetches all countries and writes `maps/<CODE>.png`.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "globe-maps", version, about)]
pub struct Config {
    /// Endpoint returning a JSON array of countries with alpha3Code, name and latlng
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Directory caching the Natural Earth datasets
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Base URL to download missing Natural Earth datasets from
    #[arg(long, default_value = DEFAULT_DATASET_URL)]
    pub dataset_url: String,

    /// Directory receiving one image per country
    #[arg(long, default_value = "maps")]
    pub output_dir: PathBuf,

    /// Output resolution in dots per inch
    #[arg(long, default_value_t = 300, value_parser = clap::value_parser!(u32).range(1..=2400))]
    pub dpi: u32,

    /// Figure side in inches
    #[arg(long, default_value_t = 6.0, value_parser = parse_inches)]
    pub figure_inches: f64,
}

impl Config {
    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings::new(self.figure_inches, self.dpi)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::parse_from(["globe-maps"])
    }
}

fn parse_inches(s: &str) -> Result<f64, String> {
    let inches: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if inches.is_finite() && inches > 0.0 && inches <= 50.0 {
        Ok(inches)
    } else {
        Err(format!("figure size must be in (0, 50] inches, got {inches}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixed_behavior() {
        let config = Config::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.output_dir, PathBuf::from("maps"));
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.dpi, 300);
        assert_eq!(config.render_settings().size_px, 1800);
    }

    #[test]
    fn test_overrides() {
        let config = Config::parse_from([
            "globe-maps",
            "--output-dir",
            "/tmp/out",
            "--dpi",
            "72",
            "--figure-inches",
            "2.5",
        ]);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.render_settings().size_px, 180);
    }

    #[test]
    fn test_rejects_bad_sizes() {
        assert!(Config::try_parse_from(["globe-maps", "--dpi", "0"]).is_err());
        assert!(Config::try_parse_from(["globe-maps", "--figure-inches", "-1"]).is_err());
        assert!(Config::try_parse_from(["globe-maps", "--figure-inches", "NaN"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Config::command().debug_assert();
    }
}

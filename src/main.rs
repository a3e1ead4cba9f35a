use anyhow::{Context, Result};
use clap::Parser;
use globe_maps::batch::BatchDriver;
use globe_maps::config::Config;
use globe_maps::country::{CountrySource, RestCountries};
use globe_maps::data::NaturalEarth;
use globe_maps::map::MapRenderer;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();
    run(&config)
}

fn run(config: &Config) -> Result<()> {
    // Fatal stage: any failure here aborts before a single map is drawn
    let source = RestCountries::new(&config.endpoint)?;
    let records = source
        .fetch_all()
        .with_context(|| format!("failed to fetch countries from {}", source.endpoint()))?;
    info!(count = records.len(), "fetched countries");

    let natural_earth = NaturalEarth::new(&config.data_dir, &config.dataset_url)?;
    let boundaries = natural_earth
        .load_boundaries()
        .context("failed to load country boundaries")?;
    let basemap = natural_earth.load_basemap().context("failed to load basemap")?;

    let renderer = MapRenderer::new(basemap, boundaries, config.render_settings());
    let driver = BatchDriver::new(renderer, &config.output_dir)
        .with_context(|| format!("failed to create {}", config.output_dir.display()))?;

    // Per-country failures are tallied, never fatal
    let summary = driver.run_all(&records);
    info!(
        written = summary.written,
        skipped = summary.skipped.len(),
        output = %driver.output_dir().display(),
        "done"
    );

    Ok(())
}

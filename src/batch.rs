use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::country::{record_code, Country, CountryRecord};
use crate::error::RecordError;
use crate::map::MapRenderer;
use crate::resolver::BoundaryResolver;

/// What happened to a record that produced a file
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Map saved with the country highlighted
    Written { path: PathBuf },
    /// No boundary matched the code; the map was saved without a highlight
    WrittenWithoutHighlight { path: PathBuf },
}

impl RecordOutcome {
    pub fn path(&self) -> &Path {
        match self {
            RecordOutcome::Written { path } | RecordOutcome::WrittenWithoutHighlight { path } => path,
        }
    }
}

/// A record that produced no file
#[derive(Debug)]
pub struct SkippedRecord {
    /// Position in the input list
    pub index: usize,
    pub code: Option<String>,
    pub reason: RecordError,
}

/// Tally of one batch run
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub attempted: usize,
    /// Files written, including those without highlight
    pub written: usize,
    pub without_highlight: usize,
    pub skipped: Vec<SkippedRecord>,
}

/// Renders and saves one map per country record, skipping bad records
pub struct BatchDriver<R> {
    renderer: MapRenderer<R>,
    output_dir: PathBuf,
}

impl<R: BoundaryResolver> BatchDriver<R> {
    /// Create the driver, making sure the output directory exists
    pub fn new(renderer: MapRenderer<R>, output_dir: impl Into<PathBuf>) -> io::Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { renderer, output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Output file for a country code
    pub fn output_path(&self, code: &str) -> PathBuf {
        self.output_dir.join(format!("{code}.png"))
    }

    /// Process every record in order. A failing record is logged and skipped;
    /// it never stops the batch.
    pub fn run_all(&self, records: &[CountryRecord]) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for (index, record) in records.iter().enumerate() {
            summary.attempted += 1;
            match self.process_record(record) {
                Ok(outcome) => {
                    summary.written += 1;
                    if let RecordOutcome::WrittenWithoutHighlight { path } = &outcome {
                        summary.without_highlight += 1;
                        warn!(path = %path.display(), "no boundary found, map saved without highlight");
                    }
                    debug!(path = %outcome.path().display(), "map written");
                }
                Err(reason) => {
                    let code = record_code(record);
                    warn!(index, code = ?code, error = %reason, "skipping country");
                    summary.skipped.push(SkippedRecord { index, code, reason });
                }
            }
        }

        info!(
            attempted = summary.attempted,
            written = summary.written,
            without_highlight = summary.without_highlight,
            skipped = summary.skipped.len(),
            "batch finished"
        );
        summary
    }

    /// Extract, render and save a single record.
    ///
    /// The figure lives only inside this call, so it is released on every
    /// exit path before the next record starts.
    pub fn process_record(&self, record: &CountryRecord) -> Result<RecordOutcome, RecordError> {
        let country = Country::from_record(record)?;
        debug!(code = %country.code, name = %country.name, "rendering");

        let figure = self.renderer.render(&country.code, country.lat, country.lon);

        let path = self.output_path(&country.code);
        figure
            .save_png(&path)
            .map_err(|source| RecordError::Save { path: path.clone(), source })?;

        if figure.highlighted() == 0 {
            Ok(RecordOutcome::WrittenWithoutHighlight { path })
        } else {
            Ok(RecordOutcome::Written { path })
        }
    }
}

//! Client for the year-based urban growth forecasting backend.

use std::error::Error as StdError;
use std::fmt;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use tracing::debug;

use crate::api::forecast::{ForecastGraphs, ForecastResponse};
use crate::core::constants::MAX_FORECAST_YEAR;
use crate::utils::url::construct_api_url;

pub const BACKEND_UNAVAILABLE: &str =
    "Failed to fetch data from the API. Check if the backend is running.";

const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

#[derive(Debug)]
pub enum ForecastError {
    Transport(reqwest::Error),
    Status(u16),
    Malformed(serde_json::Error),
    Decode {
        graph: &'static str,
        source: base64::DecodeError,
    },
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for ForecastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForecastError::Transport(err) => write!(f, "{BACKEND_UNAVAILABLE} ({err})"),
            ForecastError::Status(status) => write!(f, "{BACKEND_UNAVAILABLE} (status {status})"),
            ForecastError::Malformed(err) => write!(f, "unexpected forecast response: {err}"),
            ForecastError::Decode { graph, source } => {
                write!(f, "could not decode {graph} plot: {source}")
            }
            ForecastError::Write { path, source } => {
                write!(f, "failed to write {}: {source}", path.display())
            }
        }
    }
}

impl StdError for ForecastError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ForecastError::Transport(err) => Some(err),
            ForecastError::Status(_) => None,
            ForecastError::Malformed(err) => Some(err),
            ForecastError::Decode { source, .. } => Some(source),
            ForecastError::Write { source, .. } => Some(source),
        }
    }
}

/// A year accepted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastYear {
    pub year: i32,
    /// The requested year was past the last supported one.
    pub clamped: bool,
}

pub fn clamp_year(requested: i32) -> ForecastYear {
    if requested > MAX_FORECAST_YEAR {
        ForecastYear {
            year: MAX_FORECAST_YEAR,
            clamped: true,
        }
    } else {
        ForecastYear {
            year: requested,
            clamped: false,
        }
    }
}

#[derive(Clone)]
pub struct ForecastClient {
    client: reqwest::Client,
    base_url: String,
}

impl ForecastClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn predict_url(&self) -> String {
        construct_api_url(&self.base_url, "predict")
    }

    /// One `GET /predict?year=N`. Callers clamp the year first.
    pub async fn predict(&self, year: i32) -> Result<ForecastResponse, ForecastError> {
        let url = self.predict_url();
        debug!(%url, year, "requesting forecast");
        let response = self
            .client
            .get(&url)
            .query(&[("year", year)])
            .send()
            .await
            .map_err(ForecastError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(ForecastError::Transport)?;
        serde_json::from_str(&body).map_err(ForecastError::Malformed)
    }
}

/// PNG bytes of both plots.
pub struct DecodedGraphs {
    pub population: Vec<u8>,
    pub urban_density: Vec<u8>,
}

impl ForecastGraphs {
    pub fn decode(&self) -> Result<DecodedGraphs, ForecastError> {
        Ok(DecodedGraphs {
            population: decode_plot("population", &self.population_plot_base64)?,
            urban_density: decode_plot("urban density", &self.urban_density_plot_base64)?,
        })
    }

    pub fn population_data_uri(&self) -> String {
        format!("{PNG_DATA_URI_PREFIX}{}", self.population_plot_base64)
    }

    pub fn urban_density_data_uri(&self) -> String {
        format!("{PNG_DATA_URI_PREFIX}{}", self.urban_density_plot_base64)
    }
}

fn decode_plot(graph: &'static str, encoded: &str) -> Result<Vec<u8>, ForecastError> {
    base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|source| ForecastError::Decode { graph, source })
}

/// Write `population_{year}.png` and `urban_density_{year}.png` into `dir`.
pub fn write_graphs(
    graphs: &ForecastGraphs,
    year: i32,
    dir: &Path,
) -> Result<Vec<PathBuf>, ForecastError> {
    let decoded = graphs.decode()?;
    std::fs::create_dir_all(dir).map_err(|source| ForecastError::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(2);
    for (name, bytes) in [
        ("population", decoded.population),
        ("urban_density", decoded.urban_density),
    ] {
        let path = dir.join(format!("{name}_{year}.png"));
        std::fs::write(&path, bytes).map_err(|source| ForecastError::Write {
            path: path.clone(),
            source,
        })?;
        written.push(path);
    }
    Ok(written)
}

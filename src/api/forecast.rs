use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub predictions: Predictions,
    #[serde(default)]
    pub sustainability_measure: String,
    pub graphs: ForecastGraphs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predictions {
    pub population: f64,
    pub urban_density_persons_hectare: f64,
    pub urban_extent_hectares: f64,
    pub built_up_area_density_persons_hectare: f64,
    pub population_growth_rate_percent: f64,
}

/// Base64-encoded PNG plots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastGraphs {
    #[serde(default)]
    pub population_plot_base64: String,
    #[serde(default)]
    pub urban_density_plot_base64: String,
}

use std::error::Error;
use std::path::PathBuf;

use crate::api::forecast::ForecastResponse;
use crate::core::config::Config;
use crate::forecast::{clamp_year, write_graphs, ForecastClient};

pub async fn run_forecast(
    config: &Config,
    year: i32,
    out_dir: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let requested = clamp_year(year);
    if requested.clamped {
        eprintln!(
            "⚠️  Year cannot be greater than {0}, requesting {0} instead",
            requested.year
        );
    }

    let client = ForecastClient::new(reqwest::Client::new(), config.forecast_url());
    let forecast = match client.predict(requested.year).await {
        Ok(forecast) => forecast,
        Err(err) => {
            eprintln!("❌ {err}");
            std::process::exit(1);
        }
    };

    print!("{}", format_forecast(requested.year, &forecast));

    if let Some(dir) = out_dir {
        for path in write_graphs(&forecast.graphs, requested.year, &dir)? {
            println!("🖼  Saved {}", path.display());
        }
    }
    Ok(())
}

pub fn format_forecast(year: i32, forecast: &ForecastResponse) -> String {
    let predictions = &forecast.predictions;
    let mut out = format!("Predictions for {year}\n");
    out.push_str(&format!("  Population: {}\n", predictions.population));
    out.push_str(&format!(
        "  Urban density: {} persons/hectare\n",
        predictions.urban_density_persons_hectare
    ));
    out.push_str(&format!(
        "  Urban extent: {} hectares\n",
        predictions.urban_extent_hectares
    ));
    out.push_str(&format!(
        "  Built-up area density: {} persons/hectare\n",
        predictions.built_up_area_density_persons_hectare
    ));
    out.push_str(&format!(
        "  Population growth rate: {}%\n",
        predictions.population_growth_rate_percent
    ));
    if !forecast.sustainability_measure.trim().is_empty() {
        out.push_str(&format!(
            "\nSustainability measure:\n{}\n",
            forecast.sustainability_measure.trim()
        ));
    }
    out
}

use std::error::Error;
use std::fmt::Write as _;
use std::path::PathBuf;

use crate::analytics::{Metric, UrbanDataset};
use crate::core::config::Config;

pub fn run_analytics(
    config: &Config,
    path: Option<PathBuf>,
    metric: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let metric = match metric.as_deref().map(str::parse::<Metric>).transpose() {
        Ok(metric) => metric,
        Err(message) => {
            eprintln!("❌ {message}");
            let names: Vec<&str> = Metric::ALL.iter().map(|metric| metric.column()).collect();
            eprintln!("Available metrics: {}", names.join(", "));
            std::process::exit(1);
        }
    };

    let path = path.unwrap_or_else(|| config.analytics_csv());
    let dataset = match UrbanDataset::load(&path) {
        Ok(dataset) => dataset,
        Err(err) => {
            eprintln!("❌ {err}");
            std::process::exit(1);
        }
    };

    print!("{}", format_report(&dataset));
    if let Some(metric) = metric {
        print!("{}", format_series(&dataset, metric));
    }
    Ok(())
}

fn signed(value: Option<f64>, suffix: &str) -> String {
    match value {
        Some(value) if value > 0.0 => format!("+{value:.2}{suffix}"),
        Some(value) => format!("{value:.2}{suffix}"),
        None => "N/A".to_string(),
    }
}

pub fn format_report(dataset: &UrbanDataset) -> String {
    let mut out = String::new();
    if let Some(summary) = dataset.summary() {
        let _ = writeln!(
            out,
            "Loaded {} records spanning {} years ({}-{})",
            dataset.len(),
            summary.total_years,
            summary.earliest_year,
            summary.latest_year
        );
        let _ = writeln!(out, "  Latest population: {}", summary.latest_population);
        let _ = writeln!(
            out,
            "  Average growth rate: {:.2}%",
            summary.average_growth_rate_percent
        );
        let _ = writeln!(
            out,
            "  Total population growth: {:.2}%",
            summary.total_population_growth_percent
        );
        let _ = writeln!(
            out,
            "  Latest urban density: {:.2} persons/hectare",
            summary.latest_urban_density
        );
    }

    let _ = writeln!(out, "\nInsights:");
    for insight in dataset.insights() {
        let _ = writeln!(out, "  • {insight}");
    }

    let _ = writeln!(out, "\nYear-over-year performance:");
    let _ = writeln!(
        out,
        "  {:<6} {:>12} {:>12} {:>10} {:>10}",
        "Year", "Population", "Urban area", "Density", "Efficiency"
    );
    for row in dataset.year_over_year() {
        let efficiency = row
            .growth_efficiency
            .map_or_else(|| "N/A".to_string(), |value| format!("{value:.2}"));
        let _ = writeln!(
            out,
            "  {:<6} {:>12} {:>12} {:>10} {:>10}",
            row.year,
            signed(row.population_change_percent, "%"),
            signed(row.urban_extent_change_percent, "%"),
            signed(row.density_change, ""),
            efficiency
        );
    }

    let _ = writeln!(out, "\nBuilt-up area composition:");
    let compositions = dataset.composition_counts();
    if compositions.is_empty() {
        let _ = writeln!(out, "  No composition data");
    }
    for (name, count) in compositions {
        let _ = writeln!(out, "  {name}: {count}");
    }
    out
}

pub fn format_series(dataset: &UrbanDataset, metric: Metric) -> String {
    let mut out = format!("\n{metric}:\n");
    for (year, value) in dataset.series(metric) {
        let _ = writeln!(out, "  {year}: {value}");
    }
    out
}

use std::fmt;
use std::str::FromStr;

use super::{UrbanDataset, UrbanRecord};

const YEAR_OVER_YEAR_ROWS: usize = 5;

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub earliest_year: i32,
    pub latest_year: i32,
    /// Inclusive span, `latest - earliest + 1`.
    pub total_years: i32,
    pub latest_population: f64,
    pub average_growth_rate_percent: f64,
    /// Percentage change in population from the earliest to the latest year.
    pub total_population_growth_percent: f64,
    pub latest_urban_density: f64,
}

/// One row of the year-over-year table. Changes are `None` for the first
/// row shown, which has no predecessor in the window.
#[derive(Debug, Clone, PartialEq)]
pub struct YearOverYear {
    pub year: i32,
    pub population_change_percent: Option<f64>,
    pub urban_extent_change_percent: Option<f64>,
    pub density_change: Option<f64>,
    /// Population change divided by urban extent change.
    pub growth_efficiency: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Population,
    UrbanExtent,
    UrbanDensity,
    BuiltUpDensity,
    PopulationGrowthRate,
    UrbanExtentGrowthRate,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Population,
        Metric::UrbanExtent,
        Metric::UrbanDensity,
        Metric::BuiltUpDensity,
        Metric::PopulationGrowthRate,
        Metric::UrbanExtentGrowthRate,
    ];

    pub fn column(self) -> &'static str {
        match self {
            Metric::Population => "Population",
            Metric::UrbanExtent => "Urban_Extent_hectares",
            Metric::UrbanDensity => "Urban_Density_persons_hectare",
            Metric::BuiltUpDensity => "Built_up_Area_Density_persons_hectare",
            Metric::PopulationGrowthRate => "Population_Growth_Rate_percent",
            Metric::UrbanExtentGrowthRate => "Urban_Extent_Growth_Rate_percent",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Population => "Population",
            Metric::UrbanExtent => "Urban Extent (hectares)",
            Metric::UrbanDensity => "Urban Density",
            Metric::BuiltUpDensity => "Built-up Area Density",
            Metric::PopulationGrowthRate => "Population Growth Rate (%)",
            Metric::UrbanExtentGrowthRate => "Urban Extent Growth Rate (%)",
        }
    }

    pub fn value(self, record: &UrbanRecord) -> f64 {
        match self {
            Metric::Population => record.population,
            Metric::UrbanExtent => record.urban_extent_hectares,
            Metric::UrbanDensity => record.urban_density_persons_hectare,
            Metric::BuiltUpDensity => record.built_up_area_density_persons_hectare,
            Metric::PopulationGrowthRate => record.population_growth_rate_percent,
            Metric::UrbanExtentGrowthRate => record.urban_extent_growth_rate_percent,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Metric {
    type Err = String;

    /// Accepts the CSV column name or a short kebab-case alias.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        let alias = match wanted.to_ascii_lowercase().as_str() {
            "population" => Some(Metric::Population),
            "urban-extent" => Some(Metric::UrbanExtent),
            "urban-density" => Some(Metric::UrbanDensity),
            "built-up-density" => Some(Metric::BuiltUpDensity),
            "population-growth" => Some(Metric::PopulationGrowthRate),
            "urban-extent-growth" => Some(Metric::UrbanExtentGrowthRate),
            _ => None,
        };
        alias
            .or_else(|| Metric::ALL.into_iter().find(|metric| metric.column() == wanted))
            .ok_or_else(|| format!("unknown metric '{wanted}'"))
    }
}

impl UrbanDataset {
    pub fn summary(&self) -> Option<Summary> {
        // First row wins on ties for both ends.
        let earliest = self.records().iter().min_by_key(|record| record.year)?;
        let latest = self.records().iter().rev().max_by_key(|record| record.year)?;
        let count = self.len() as f64;

        Some(Summary {
            earliest_year: earliest.year,
            latest_year: latest.year,
            total_years: latest.year - earliest.year + 1,
            latest_population: latest.population,
            average_growth_rate_percent: self
                .records()
                .iter()
                .map(|record| record.population_growth_rate_percent)
                .sum::<f64>()
                / count,
            total_population_growth_percent: percent_change(earliest.population, latest.population)
                .unwrap_or(0.0),
            latest_urban_density: latest.urban_density_persons_hectare,
        })
    }

    /// Human-readable trend sentences comparing the first and last rows.
    pub fn insights(&self) -> Vec<String> {
        let records = self.records();
        let (Some(first), Some(last)) = (records.first(), records.last()) else {
            return Vec::new();
        };
        let several = records.len() > 1;

        let population = match percent_change(first.population, last.population) {
            Some(change) if several && last.population > first.population => {
                format!("Population increased by {change:.1}% over the period")
            }
            _ => "Population remained relatively stable".to_string(),
        };
        let expansion = match percent_change(first.urban_extent_hectares, last.urban_extent_hectares)
        {
            Some(change) if several && last.urban_extent_hectares > first.urban_extent_hectares => {
                format!("Urban area expanded by {change:.1}%")
            }
            _ => "Urban extent remained stable".to_string(),
        };
        let density = if several {
            let average = records
                .iter()
                .map(|record| record.urban_density_persons_hectare)
                .sum::<f64>()
                / records.len() as f64;
            format!("Average urban density: {average:.1} persons/hectare")
        } else {
            "Insufficient data for density analysis".to_string()
        };

        vec![population, expansion, density]
    }

    /// Changes between consecutive rows over the last five rows.
    pub fn year_over_year(&self) -> Vec<YearOverYear> {
        let records = self.records();
        let window = &records[records.len().saturating_sub(YEAR_OVER_YEAR_ROWS)..];

        window
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let previous = index.checked_sub(1).map(|prev| &window[prev]);
                let Some(previous) = previous else {
                    return YearOverYear {
                        year: row.year,
                        population_change_percent: None,
                        urban_extent_change_percent: None,
                        density_change: None,
                        growth_efficiency: None,
                    };
                };
                let population = percent_change(previous.population, row.population);
                let extent =
                    percent_change(previous.urban_extent_hectares, row.urban_extent_hectares);
                let efficiency = match (population, extent) {
                    (Some(pop), Some(area)) if area != 0.0 => Some(pop / area),
                    _ => None,
                };
                YearOverYear {
                    year: row.year,
                    population_change_percent: population,
                    urban_extent_change_percent: extent,
                    density_change: Some(
                        row.urban_density_persons_hectare - previous.urban_density_persons_hectare,
                    ),
                    growth_efficiency: efficiency,
                }
            })
            .collect()
    }

    /// Occurrences of each non-empty built-up composition label, in
    /// first-seen order.
    pub fn composition_counts(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for record in self.records().iter().filter(|record| !record.composition.is_empty()) {
            match counts
                .iter_mut()
                .find(|(name, _)| *name == record.composition)
            {
                Some((_, count)) => *count += 1,
                None => counts.push((record.composition.clone(), 1)),
            }
        }
        counts
    }

    pub fn series(&self, metric: Metric) -> Vec<(i32, f64)> {
        self.records()
            .iter()
            .map(|record| (record.year, metric.value(record)))
            .collect()
    }
}

/// `None` when the base is zero.
fn percent_change(from: f64, to: f64) -> Option<f64> {
    (from != 0.0).then(|| (to - from) / from * 100.0)
}

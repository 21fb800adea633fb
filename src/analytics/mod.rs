//! Urban growth dataset loaded from CSV, plus the dashboard statistics
//! derived from it.

use std::error::Error as StdError;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

pub mod csv;
pub mod stats;

pub use stats::{Metric, Summary, YearOverYear};

#[derive(Debug)]
pub enum AnalyticsError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    NoValidRows,
}

impl fmt::Display for AnalyticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyticsError::Read { path, source } => {
                write!(f, "Error reading CSV {}: {source}", path.display())
            }
            AnalyticsError::NoValidRows => write!(f, "No valid data found in CSV"),
        }
    }
}

impl StdError for AnalyticsError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            AnalyticsError::Read { source, .. } => Some(source),
            AnalyticsError::NoValidRows => None,
        }
    }
}

/// One year of the urban growth dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct UrbanRecord {
    pub year: i32,
    pub population: f64,
    pub urban_extent_hectares: f64,
    pub urban_density_persons_hectare: f64,
    pub built_up_area_density_persons_hectare: f64,
    pub population_growth_rate_percent: f64,
    pub urban_extent_growth_rate_percent: f64,
    pub composition: String,
}

pub const COMPOSITION_COLUMN: &str = "Added_Built_up_Area_Composition_Infill_Extension_Inclusion";

#[derive(Debug, Clone, PartialEq)]
pub struct UrbanDataset {
    records: Vec<UrbanRecord>,
}

impl UrbanDataset {
    pub fn from_csv_str(input: &str) -> Result<Self, AnalyticsError> {
        let Some(table) = csv::Table::parse(input) else {
            return Err(AnalyticsError::NoValidRows);
        };

        let column = |name: &str| table.column(name);
        let year = column("Year");
        let population = column("Population");
        let extent = column("Urban_Extent_hectares");
        let density = column("Urban_Density_persons_hectare");
        let built_up = column("Built_up_Area_Density_persons_hectare");
        let pop_growth = column("Population_Growth_Rate_percent");
        let extent_growth = column("Urban_Extent_Growth_Rate_percent");
        let composition = column(COMPOSITION_COLUMN);

        let records: Vec<UrbanRecord> = table
            .rows
            .iter()
            .map(|row| UrbanRecord {
                year: year_field(row, year),
                population: number_field(row, population),
                urban_extent_hectares: number_field(row, extent),
                urban_density_persons_hectare: number_field(row, density),
                built_up_area_density_persons_hectare: number_field(row, built_up),
                population_growth_rate_percent: number_field(row, pop_growth),
                urban_extent_growth_rate_percent: number_field(row, extent_growth),
                composition: composition
                    .and_then(|index| row.get(index))
                    .map(|value| value.trim().to_string())
                    .unwrap_or_default(),
            })
            .filter(|record| record.year > 0)
            .collect();

        debug!(
            rows = table.rows.len(),
            kept = records.len(),
            "parsed analytics CSV"
        );
        if records.is_empty() {
            return Err(AnalyticsError::NoValidRows);
        }
        Ok(Self { records })
    }

    pub fn load(path: &Path) -> Result<Self, AnalyticsError> {
        let input = std::fs::read_to_string(path).map_err(|source| AnalyticsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_csv_str(&input)
    }

    /// Rows in file order.
    pub fn records(&self) -> &[UrbanRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn number_field(row: &[String], index: Option<usize>) -> f64 {
    index
        .and_then(|index| row.get(index))
        .and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

fn year_field(row: &[String], index: Option<usize>) -> i32 {
    let year = number_field(row, index);
    if year.fract() == 0.0 && year >= 1.0 && year <= f64::from(i32::MAX) {
        year as i32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Year,Population,Urban_Extent_hectares,Urban_Density_persons_hectare,Built_up_Area_Density_persons_hectare,Population_Growth_Rate_percent,Urban_Extent_Growth_Rate_percent,Added_Built_up_Area_Composition_Infill_Extension_Inclusion";

    #[test]
    fn keeps_valid_years_and_drops_invalid_ones() {
        let input = format!("{HEADER}\n2020,100,50,2,3,1.5,0.5,Infill\nabc,1,1,1,1,1,1,x\n0,1,1,1,1,1,1,x\n-5,1,1,1,1,1,1,x\n");
        let dataset = UrbanDataset::from_csv_str(&input).expect("dataset");

        assert_eq!(dataset.len(), 1);
        let record = &dataset.records()[0];
        assert_eq!(record.year, 2020);
        assert_eq!(record.population, 100.0);
        assert_eq!(record.composition, "Infill");
    }

    #[test]
    fn missing_or_bad_numbers_default_to_zero() {
        let input = "Year;Population;Urban_Extent_hectares\n1990;n/a;\n2000;  42 ;7\n";
        let dataset = UrbanDataset::from_csv_str(input).expect("dataset");

        assert_eq!(dataset.records()[0].population, 0.0);
        assert_eq!(dataset.records()[0].urban_extent_hectares, 0.0);
        assert_eq!(dataset.records()[1].population, 42.0);
        assert_eq!(dataset.records()[1].urban_density_persons_hectare, 0.0);
        assert_eq!(dataset.records()[1].composition, "");
    }

    #[test]
    fn padded_headers_are_recognised() {
        let input = " Year \t Population \n2010\t5\n";
        let dataset = UrbanDataset::from_csv_str(input).expect("dataset");
        assert_eq!(dataset.records()[0].population, 5.0);
    }

    #[test]
    fn no_retained_rows_is_an_error() {
        let err = UrbanDataset::from_csv_str(&format!("{HEADER}\nabc,1,1,1,1,1,1,x\n"))
            .expect_err("no rows");
        assert_eq!(err.to_string(), "No valid data found in CSV");
        assert!(matches!(
            UrbanDataset::from_csv_str(""),
            Err(AnalyticsError::NoValidRows)
        ));
    }

    #[test]
    fn load_reports_the_missing_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.csv");
        match UrbanDataset::load(&path) {
            Err(AnalyticsError::Read { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected read error, got {other:?}"),
        }
    }
}

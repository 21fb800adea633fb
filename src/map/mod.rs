//! Built-up area map images, one PNG per survey year.

use std::error::Error as StdError;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

pub const FIRST_YEAR: i32 = 1975;
pub const LAST_YEAR: i32 = 2025;
pub const YEAR_STEP: i32 = 5;

/// Every year with a map, oldest first.
pub fn map_years() -> impl Iterator<Item = i32> {
    (FIRST_YEAR..=LAST_YEAR).step_by(YEAR_STEP as usize)
}

pub fn is_map_year(year: i32) -> bool {
    (FIRST_YEAR..=LAST_YEAR).contains(&year) && (year - FIRST_YEAR) % YEAR_STEP == 0
}

pub fn asset_file_name(year: i32) -> String {
    format!("built_{year}.png")
}

#[derive(Debug)]
pub enum MapError {
    UnknownYear(i32),
    NotFound { year: i32, path: PathBuf },
    Read { path: PathBuf, source: std::io::Error },
    Write { path: PathBuf, source: std::io::Error },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::UnknownYear(year) => write!(
                f,
                "No map for {year}; maps exist for {FIRST_YEAR}-{LAST_YEAR} every {YEAR_STEP} years"
            ),
            MapError::NotFound { year, path } => write!(
                f,
                "Image not found for {year}. Expected path: {}",
                path.display()
            ),
            MapError::Read { path, source } => {
                write!(f, "Failed to read {}: {source}", path.display())
            }
            MapError::Write { path, source } => {
                write!(f, "Failed to write {}: {source}", path.display())
            }
        }
    }
}

impl StdError for MapError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            MapError::Read { source, .. } | MapError::Write { source, .. } => Some(source),
            MapError::UnknownYear(_) | MapError::NotFound { .. } => None,
        }
    }
}

/// Year and whether its image is present on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapAvailability {
    pub year: i32,
    pub path: PathBuf,
    pub available: bool,
}

#[derive(Debug, Clone)]
pub struct MapCatalog {
    root: PathBuf,
}

impl MapCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn asset_path(&self, year: i32) -> Result<PathBuf, MapError> {
        if !is_map_year(year) {
            return Err(MapError::UnknownYear(year));
        }
        Ok(self.root.join(asset_file_name(year)))
    }

    pub fn load(&self, year: i32) -> Result<Vec<u8>, MapError> {
        let path = self.asset_path(year)?;
        debug!(year, path = %path.display(), "loading map image");
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(MapError::NotFound { year, path })
            }
            Err(source) => Err(MapError::Read { path, source }),
        }
    }

    pub fn availability(&self) -> Vec<MapAvailability> {
        map_years()
            .map(|year| {
                let path = self.root.join(asset_file_name(year));
                MapAvailability {
                    year,
                    available: path.is_file(),
                    path,
                }
            })
            .collect()
    }

    /// Copy the year's image to `destination`. A directory destination gets
    /// the asset's own file name.
    pub fn export(&self, year: i32, destination: &Path) -> Result<PathBuf, MapError> {
        let bytes = self.load(year)?;
        let target = if destination.is_dir() {
            destination.join(asset_file_name(year))
        } else {
            destination.to_path_buf()
        };
        std::fs::write(&target, bytes).map_err(|source| MapError::Write {
            path: target.clone(),
            source,
        })?;
        Ok(target)
    }
}

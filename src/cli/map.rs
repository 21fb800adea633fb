use std::error::Error;

use crate::cli::MapCommands;
use crate::core::config::Config;
use crate::map::{MapCatalog, MapError};

pub fn run_map(config: &Config, command: MapCommands) -> Result<(), Box<dyn Error>> {
    let catalog = MapCatalog::new(config.map_dir());
    match command {
        MapCommands::List => {
            println!("Maps in {}:", catalog.root().display());
            for entry in catalog.availability() {
                let marker = if entry.available { "✅" } else { "❌" };
                println!("  {marker} {}  {}", entry.year, entry.path.display());
            }
            Ok(())
        }
        MapCommands::Export { year, out } => match catalog.export(year, &out) {
            Ok(path) => {
                println!("✅ Saved map for {year} to {}", path.display());
                Ok(())
            }
            Err(err @ MapError::NotFound { .. }) => {
                eprintln!("❌ {err}");
                eprintln!("💡 Add the image and run the command again.");
                std::process::exit(1);
            }
            Err(err) => {
                eprintln!("❌ {err}");
                std::process::exit(1);
            }
        },
    }
}

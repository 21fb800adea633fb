use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    geoai::cli::main()
}

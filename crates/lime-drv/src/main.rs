use lime_drv::{Config, DriverError};

/// Parses argv and runs the pipeline, returning the driver-level error
/// types directly so `main` can special-case `--help`'s exit-0 path
/// before anything is wrapped in `anyhow`.
fn try_main() -> Result<Option<lime_drv::CompileReport>, DriverError> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = match Config::parse_args(&args) {
        Ok(config) => config,
        Err(DriverError::HelpRequested) => {
            println!("{}", DriverError::HelpRequested);
            return Ok(None);
        }
        Err(err) => return Err(err),
    };

    let report = lime_drv::run(&config)?;
    if config.verbose {
        eprintln!(
            "[lime] compiled {} statement(s) to {}",
            report.statement_count,
            report.output_path.display()
        );
    }
    Ok(Some(report))
}

fn main() -> anyhow::Result<()> {
    match try_main() {
        Ok(_) => Ok(()),
        Err(err) => {
            eprintln!("lime: {err}");
            std::process::exit(1);
        }
    }
}

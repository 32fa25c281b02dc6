use std::{env, process};

use epistrata::{
    config::Config,
    data::{CsvMultiplierFiles, CsvStateDirectory, MultiplierProvider},
    error::Result,
    export::{export_all, DirectorySink, ExportSummary},
    pipeline::Pipeline,
};
use log::*;
use simple_logger::SimpleLogger;

pub fn main() {
    let path = env::args().nth(1).unwrap_or_else(|| "conf.toml".to_string());
    let cfg = match Config::from_file(&path) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("could not read {}: {}", path, err);
            process::exit(2);
        }
    };

    let level = cfg.log_level.parse().unwrap_or(LevelFilter::Info);
    if let Err(err) = SimpleLogger::new().with_level(level).init() {
        eprintln!("logger: {}", err);
    }

    if cfg.verbose {
        println!("{:#?}", cfg);
    }

    match run(&cfg) {
        Ok(summary) if summary.is_success() => {
            println!("Wrote {} states to {:?}", summary.written.len(), cfg.paths.output());
        }
        Ok(summary) => {
            println!("Wrote {} states to {:?}", summary.written.len(), cfg.paths.output());
            eprint!("{} states failed:\n{}", summary.failures.len(), summary.failure_report());
            process::exit(1);
        }
        Err(err) => {
            error!("{}", err);
            process::exit(2);
        }
    }
}

pub fn run(cfg: &Config) -> Result<ExportSummary> {
    let paths = &cfg.paths;
    let multipliers = CsvMultiplierFiles {
        cases: paths.cases_multipliers().clone(),
        deaths: paths.deaths_multipliers().clone(),
        hospitalizations: paths.hospitalizations_multipliers().clone(),
    }
    .multipliers()?;

    let provider = CsvStateDirectory::open(paths.state_data(), paths.populations())?;
    let pipeline = Pipeline::new(cfg.pipeline.clone(), multipliers)?;
    let sink = DirectorySink::create(paths.output())?;

    info!("processing states from {:?}", paths.state_data());
    let report = pipeline.run_all(&provider);
    return Ok(export_all(report, &sink));
}

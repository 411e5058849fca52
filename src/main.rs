use clap::Parser;
use std::fs::{self, File};
use std::path::PathBuf;
use tabulate::ExportError;
use tabulate::backends::CsvOptions;
use tabulate::convert;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Exports a JSON array of records as CSV, one column per field of the first record.
#[derive(Parser, Debug)]
#[command(name = "tabulate", version)]
struct Args {
    /// JSON file holding an array of objects
    data: PathBuf,
    /// Destination CSV file
    output: PathBuf,
    /// Field separator
    #[arg(short, long, default_value_t = ',')]
    separator: char,
}

fn main() -> Result<(), ExportError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    log::info!("Loading records from {}", args.data.display());
    let records = convert::parse_records(&fs::read_to_string(&args.data)?)?;
    let count = records.len();

    let output = File::create(&args.output)?;
    let options = CsvOptions {
        separator: args.separator,
        ..CsvOptions::default()
    };
    convert::export_csv(records, Box::new(output), options)?;

    log::info!("Wrote {} record(s) to {}", count, args.output.display());
    Ok(())
}

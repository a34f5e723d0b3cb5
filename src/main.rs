mod args;
mod board;

use clap::Parser;
use log::{info, warn};
use snafu::{ErrorCompat, ResultExt};

use std::path::PathBuf;
use std::process;

use crate::args::{Args, Command};
use crate::board::config_reader::*;
use crate::board::io_csv::CsvFileStore;
use crate::board::*;

fn run(args: &Args) -> BoardResult<String> {
    let (config_data, settings) = match &args.config {
        Some(path) => read_config(path)?,
        None => (None, BoardSettings::default()),
    };
    let data = match &args.data {
        Some(data) => PathBuf::from(data),
        None => config_data.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE)),
    };
    let store = CsvFileStore::new(data);
    let board = Board::new(settings, store);
    info!("Using data file {:?}", board.store().path());

    let js = match &args.command {
        Command::Add {
            name,
            category,
            votes,
            image_url,
            image_file,
        } => board.add(&AddRequest {
            name: name.clone(),
            category: category.clone(),
            votes: *votes,
            image_url: image_url.clone(),
            image_file: image_file.as_ref().map(PathBuf::from),
        })?,
        Command::Update {
            name,
            category,
            votes,
        } => board.update_votes(name, category.as_deref(), *votes)?,
        Command::Reset => board.reset()?,
        Command::Summary { layout } => {
            board.summary(layout.unwrap_or(LayoutPolicy::Scatter))?
        }
        Command::Show { category, layout } => {
            board.show(category, layout.unwrap_or(LayoutPolicy::Radial))?
        }
        Command::List => board.list()?,
    };
    serde_json::to_string_pretty(&js).context(RenderingJsonSnafu {})
}

fn main() {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }
    info!("args: {:?}", args);

    match run(&args) {
        Ok(report) => println!("{}", report),
        Err(e) => {
            warn!("Error occured {:?}", e);
            eprintln!("An error occured {}", e);
            if let Some(bt) = ErrorCompat::backtrace(&e) {
                eprintln!("trace: {}", bt);
            }
            process::exit(1);
        }
    }
}

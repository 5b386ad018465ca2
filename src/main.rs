/*
cargo run --bin generate -- \
    --data-dir  ../data \
    --image-dir ../image \
    --out-dir   output
*/

use std::collections::BTreeMap;
use std::fs::{create_dir_all, File};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use log::info;
use simplelog::{Config as LogConfig, LevelFilter, WriteLogger};

use snakedex_generator::images::{default_resizes, parse_resize};
use snakedex_generator::pipeline::{self, Config};

// CLI parameters
#[derive(Parser, Debug)]
#[command(version, about = "Build the snakedex listing files and image variants")]
struct Cli {
    // Directory holding one <id>.json record per snake
    #[arg(long, default_value = "../data")]
    data_dir: PathBuf,
    // Directory holding optional <id>.png source images
    #[arg(long, default_value = "../image")]
    image_dir: PathBuf,
    #[arg(long, default_value = "output")]
    out_dir: PathBuf,
    // Replaces the default variant set (32x/64x/128x/256x), e.g. --resize thumb=16
    #[arg(long = "resize", value_name = "LABEL=WIDTH", value_parser = parse_resize)]
    resizes: Vec<(String, u32)>,
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // logging setup
    create_dir_all(&cli.log_dir)?;
    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let log_path = cli.log_dir.join(format!("generate_{ts}.log"));
    WriteLogger::init(
        LevelFilter::Info,
        LogConfig::default(),
        File::create(&log_path)?,
    )?;
    info!("Starting snakedex generation");

    let resizes: BTreeMap<String, u32> = if cli.resizes.is_empty() {
        default_resizes()
    } else {
        cli.resizes.into_iter().collect()
    };

    let config = Config {
        data_dir: cli.data_dir,
        image_dir: cli.image_dir,
        out_dir: cli.out_dir.clone(),
        resizes,
    };
    let summary = pipeline::generate(&config).context("generation failed")?;

    println!("\n=== Generate summary ===");
    println!("Snakes listed      : {}", summary.snakes);
    println!("With images        : {}", summary.with_images);
    println!("Skipped data files : {}", summary.skipped_files);
    println!("Output directory   : {:?}", cli.out_dir);
    println!("Log file           : {:?}", log_path);

    Ok(())
}

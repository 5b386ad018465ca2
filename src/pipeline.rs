use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use serde_json::Value;

use crate::{images, listing, ordering, record};

/// Where to read from, where to write to, and which variants to produce.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub image_dir: PathBuf,
    pub out_dir: PathBuf,
    pub resizes: BTreeMap<String, u32>,
}

/// What a finished run did, for the end-of-run summary.
#[derive(Debug, Default)]
pub struct Summary {
    pub snakes: usize,
    pub with_images: usize,
    pub skipped_files: usize,
}

/// Runs the whole build: load records, order and number them, materialize
/// image variants, normalize key order, then emit the three listings.
pub fn generate(config: &Config) -> Result<Summary> {
    let (snakes, skipped_files) = record::load_snakes(&config.data_dir)?;
    let snakes = ordering::sort_and_number(snakes)?;

    let bar = ProgressBar::new(snakes.len() as u64);
    bar.set_style(ProgressStyle::with_template(
        "{bar:40.cyan/blue} {pos}/{len} {msg}",
    )?);

    let mut with_images = 0usize;
    let mut finished: Vec<Value> = Vec::with_capacity(snakes.len());
    for mut snake in snakes {
        bar.set_message(snake.id.clone());
        if images::materialize(&mut snake, &config.image_dir, &config.out_dir, &config.resizes)? {
            with_images += 1;
        }
        let value = serde_json::to_value(&snake)
            .with_context(|| format!("serializing snake '{}'", snake.id))?;
        finished.push(listing::sort_keys_deep(value));
        bar.inc(1);
    }
    bar.finish_and_clear();

    let length = finished.len();
    info!("found {} snake{}", length, if length == 1 { "" } else { "s" });

    listing::write_listings(&config.out_dir, &finished)?;

    Ok(Summary {
        snakes: length,
        with_images,
        skipped_files,
    })
}

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use image::imageops::FilterType;
use log::warn;

use crate::record::Snake;

/// The variant set the snakedex site expects: label → target width in pixels.
pub fn default_resizes() -> BTreeMap<String, u32> {
    [("32x", 32), ("64x", 64), ("128x", 128), ("256x", 256)]
        .into_iter()
        .map(|(label, width)| (label.to_owned(), width))
        .collect()
}

/// Parses a `LABEL=WIDTH` command-line value into a resize entry.
pub fn parse_resize(raw: &str) -> Result<(String, u32)> {
    let (label, width) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected LABEL=WIDTH, got '{raw}'"))?;
    if label.is_empty() {
        bail!("empty label in '{raw}'");
    }
    let width: u32 = width
        .parse()
        .with_context(|| format!("bad width in '{raw}'"))?;
    if width == 0 {
        bail!("width must be positive in '{raw}'");
    }
    Ok((label.to_owned(), width))
}

/// Copies the snake's source image into the output tree and writes one resized
/// variant per configured width, recording every output path on the record.
/// A missing source image is normal: the snake simply has no pictures.
/// Returns whether an image was found.
pub fn materialize(
    snake: &mut Snake,
    image_dir: &Path,
    out_dir: &Path,
    resizes: &BTreeMap<String, u32>,
) -> Result<bool> {
    let source = image_dir.join(format!("{}.png", snake.id));
    let bytes = match fs::read(&source) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!("snake with id '{}' has no image", snake.id);
            return Ok(false);
        }
        Err(err) => {
            return Err(err).with_context(|| format!("reading {}", source.display()))
        }
    };

    let file_name = format!("{}.png", snake.id);
    let mut paths = BTreeMap::new();

    let full_dir = out_dir.join("image").join("full");
    fs::create_dir_all(&full_dir)
        .with_context(|| format!("creating {}", full_dir.display()))?;
    let full_path = full_dir.join(&file_name);
    fs::write(&full_path, &bytes)
        .with_context(|| format!("writing {}", full_path.display()))?;
    // recorded paths use forward slashes: they are site URLs, not file paths
    paths.insert("full".to_owned(), format!("image/full/{file_name}"));

    let decoded = image::load_from_memory(&bytes)
        .with_context(|| format!("decoding {}", source.display()))?;

    for (label, width) in resizes {
        let resized = decoded.resize(*width, u32::MAX, FilterType::Lanczos3);
        let variant_dir = out_dir.join("image").join(label);
        fs::create_dir_all(&variant_dir)
            .with_context(|| format!("creating {}", variant_dir.display()))?;
        let variant_path = variant_dir.join(&file_name);
        resized
            .save(&variant_path)
            .with_context(|| format!("writing {}", variant_path.display()))?;
        paths.insert(label.clone(), format!("image/{label}/{file_name}"));
    }

    snake.images = Some(paths);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_has_the_four_site_widths() {
        let resizes = default_resizes();
        assert_eq!(
            resizes.iter().map(|(l, w)| (l.as_str(), *w)).collect::<Vec<_>>(),
            [("128x", 128), ("256x", 256), ("32x", 32), ("64x", 64)],
        );
    }

    #[test]
    fn parse_resize_accepts_label_and_width() {
        assert_eq!(parse_resize("thumb=16").unwrap(), ("thumb".to_owned(), 16));
    }

    #[test]
    fn parse_resize_rejects_bad_values() {
        assert!(parse_resize("16").is_err());
        assert!(parse_resize("=16").is_err());
        assert!(parse_resize("thumb=zero").is_err());
        assert!(parse_resize("thumb=0").is_err());
    }
}

//! Sheet output: PNG and WebP files under format-specific subdirectories.

use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, RgbaImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Output file paths for one rendered sheet.
///
/// Sheets land under `{out}/{pass}/{lang}/png/{name}.png` and
/// `{out}/{pass}/{lang}/webp/{name}.webp`; the name is derived from the
/// pass parameters (`003_amber`, `missing_playsets_EE`, `all_cards`) so
/// reruns overwrite deterministically.
pub fn pass_paths(out_root: &Path, pass: &str, lang: &str, name: &str) -> (PathBuf, PathBuf) {
    let base = out_root.join(pass).join(lang);
    (
        base.join("png").join(format!("{name}.png")),
        base.join("webp").join(format!("{name}.webp")),
    )
}

/// Save a sheet as PNG, creating parent directories.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    ensure_parent(path)?;
    image.save(path)?;
    Ok(())
}

/// Save a sheet as lossless WebP, creating parent directories.
pub fn save_webp(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    ensure_parent(path)?;
    let file = BufWriter::new(File::create(path)?);
    let encoder = WebPEncoder::new_lossless(file);
    encoder.encode(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

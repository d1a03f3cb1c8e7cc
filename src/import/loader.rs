/// Picture loader
///
/// Decodes an image file into RGBA pixels and reduces it to the working size
/// so every filter recomputation stays interactive.

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use std::path::{Path, PathBuf};
use tokio::task;

/// Extensions offered by the file picker
pub const PICTURE_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "webp", "bmp", "gif", "tif", "tiff"];

#[derive(thiserror::Error, Debug)]
pub enum ImportError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to decode picture: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Picture has no pixels")]
    Empty,
    #[error("Task join error: {0}")]
    Join(#[from] task::JoinError),
}

/// Load a picture from disk
///
/// Decoding is CPU-intensive, so it runs on the blocking pool. The error is
/// flattened to a `String` because it travels inside a UI message.
///
/// # Arguments
/// * `path` - File chosen in the picker
/// * `working_size` - Longest side after downsizing (0 = keep original size)
pub async fn load_picture(path: PathBuf, working_size: u32) -> Result<RgbaImage, String> {
    load_picture_inner(path, working_size)
        .await
        .map_err(|e| e.to_string())
}

async fn load_picture_inner(path: PathBuf, working_size: u32) -> Result<RgbaImage, ImportError> {
    task::spawn_blocking(move || load_picture_blocking(&path, working_size)).await?
}

/// Blocking implementation of picture loading
fn load_picture_blocking(path: &Path, working_size: u32) -> Result<RgbaImage, ImportError> {
    if !path.exists() {
        return Err(ImportError::NotFound(path.to_path_buf()));
    }

    let img = image::open(path)?;
    if img.width() == 0 || img.height() == 0 {
        return Err(ImportError::Empty);
    }
    log::info!("Decoded {} ({}x{})", path.display(), img.width(), img.height());

    Ok(fit_working_size(img, working_size).to_rgba8())
}

/// Shrink so the longest side is at most `working_size`, keeping aspect ratio
fn fit_working_size(img: DynamicImage, working_size: u32) -> DynamicImage {
    if working_size == 0 || (img.width() <= working_size && img.height() <= working_size) {
        return img;
    }
    let resized = img.resize(working_size, working_size, FilterType::Lanczos3);
    log::debug!("Working size: {}x{}", resized.width(), resized.height());
    resized
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn write_png(dir: &Path, w: u32, h: u32) -> PathBuf {
        let path = dir.join("picture.png");
        RgbaImage::from_pixel(w, h, Rgba([1, 2, 3, 255])).save(&path).unwrap();
        path
    }

    #[tokio::test]
    async fn test_missing_file() {
        let result = load_picture(PathBuf::from("/nonexistent/picture.png"), 1280).await;
        assert!(result.unwrap_err().starts_with("File not found"));
    }

    #[tokio::test]
    async fn test_small_picture_keeps_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), 30, 20);

        let img = load_picture(path, 1280).await.unwrap();
        assert_eq!(img.dimensions(), (30, 20));
        assert_eq!(img.get_pixel(0, 0), &Rgba([1, 2, 3, 255]));
    }

    #[tokio::test]
    async fn test_large_picture_is_reduced() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), 400, 200);

        let img = load_picture(path, 100).await.unwrap();
        assert_eq!(img.dimensions(), (100, 50));
    }

    #[tokio::test]
    async fn test_garbage_file_fails_to_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let err = load_picture(path, 0).await.unwrap_err();
        assert!(err.starts_with("Failed to decode picture"));
    }
}

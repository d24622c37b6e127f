//! Optimized copies and thumbnails of uploaded photos

use std::fs;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ColorType, DynamicImage};

use super::{public_url, safe_unlink};
use crate::error::Result;

pub const OPTIMIZED_PREFIX: &str = "optimized-";
pub const THUMB_PREFIX: &str = "thumb-";

const OPTIMIZED_MAX_SIDE: u32 = 1200;
const OPTIMIZED_QUALITY: u8 = 85;
const THUMB_SIDE: u32 = 400;
const THUMB_QUALITY: u8 = 80;

/// Processes a stored upload and returns the URL to record for it.
///
/// On success the optimized JPEG and thumbnail are written next to the
/// upload, the upload itself is deleted and the optimized URL is returned.
/// When the file cannot be decoded (e.g. HEIC, which the decoder does not
/// support) the upload is kept and its own URL is returned instead.
///
/// # Arguments
/// * `dir` - Uploads directory
/// * `stored_name` - File name of the upload inside `dir`
pub fn process_upload(dir: &Path, stored_name: &str) -> String {
    let source = dir.join(stored_name);

    match optimize_photo(dir, stored_name) {
        Ok(optimized_name) => {
            safe_unlink(&source);
            public_url(&optimized_name)
        }
        Err(e) => {
            tracing::error!(file = stored_name, error = %e, "error processing image, keeping original");
            public_url(stored_name)
        }
    }
}

/// Writes `optimized-<stem>.jpg` and `thumb-<stem>.jpg` for an upload.
///
/// Returns the optimized file name.
pub fn optimize_photo(dir: &Path, stored_name: &str) -> Result<String> {
    let img = image::io::Reader::open(dir.join(stored_name))?
        .with_guessed_format()?
        .decode()?;

    let stem = Path::new(stored_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(stored_name);
    let optimized_name = format!("{OPTIMIZED_PREFIX}{stem}.jpg");
    let thumb_name = format!("{THUMB_PREFIX}{stem}.jpg");

    let (optimized, thumb) = rayon::join(
        || encode_jpeg(&fit_inside(&img, OPTIMIZED_MAX_SIDE), OPTIMIZED_QUALITY),
        || {
            let cover = img.resize_to_fill(THUMB_SIDE, THUMB_SIDE, FilterType::Lanczos3);
            encode_jpeg(&cover, THUMB_QUALITY)
        },
    );

    fs::write(dir.join(&optimized_name), optimized?)?;
    fs::write(dir.join(&thumb_name), thumb?)?;

    tracing::debug!(optimized = %optimized_name, thumb = %thumb_name, "photo optimized");
    Ok(optimized_name)
}

/// Downscales to fit inside a `max_side` square, never enlarging
fn fit_inside(img: &DynamicImage, max_side: u32) -> DynamicImage {
    if img.width() <= max_side && img.height() <= max_side {
        img.clone()
    } else {
        img.resize(max_side, max_side, FilterType::Lanczos3)
    }
}

/// Encodes an image as baseline RGB JPEG
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = img.to_rgb8();
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality).encode(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        ColorType::Rgb8,
    )?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageOutputFormat, RgbImage};
    use std::io::Cursor;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30])));
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, ImageOutputFormat::Png).unwrap();
        fs::write(dir.join(name), bytes.into_inner()).unwrap();
    }

    fn dimensions(path: &Path) -> (u32, u32) {
        image::image_dimensions(path).unwrap()
    }

    #[test]
    fn test_large_photo_is_downscaled_and_thumbnailed() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "1-2.png", 2400, 1200);

        let url = process_upload(dir.path(), "1-2.png");

        assert_eq!(url, "/uploads/optimized-1-2.jpg");
        assert_eq!(dimensions(&dir.path().join("optimized-1-2.jpg")), (1200, 600));
        assert_eq!(dimensions(&dir.path().join("thumb-1-2.jpg")), (400, 400));
        assert!(!dir.path().join("1-2.png").exists());
    }

    #[test]
    fn test_small_photo_is_not_enlarged() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "small.png", 300, 200);

        optimize_photo(dir.path(), "small.png").unwrap();

        assert_eq!(dimensions(&dir.path().join("optimized-small.jpg")), (300, 200));
        assert_eq!(dimensions(&dir.path().join("thumb-small.jpg")), (400, 400));
    }

    #[test]
    fn test_undecodable_upload_keeps_original() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("1-2.heic"), b"\x00\x00\x00\x18ftypheic").unwrap();

        let url = process_upload(dir.path(), "1-2.heic");

        assert_eq!(url, "/uploads/1-2.heic");
        assert!(dir.path().join("1-2.heic").exists());
        assert!(!dir.path().join("optimized-1-2.jpg").exists());
        assert!(!dir.path().join("thumb-1-2.jpg").exists());
    }

    #[test]
    fn test_encode_jpeg_magic() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(8, 8));
        let bytes = encode_jpeg(&img, 80).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }
}

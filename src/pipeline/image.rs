//! Lossless-ish image recompression.
//!
//! - JPEG: decoded and re-encoded at `images.quality`
//! - PNG: re-encoded with best compression and adaptive filtering
//! - anything else (GIF, ...): copied
//!
//! Whichever of original and re-encoded bytes is smaller gets written, so an
//! output is never larger than its source.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageError, ImageFormat};
use rayon::prelude::*;

use super::{IoContext, KilnError};
use crate::config::KilnConfig;
use crate::core::is_shutdown;
use crate::freshness::{is_newer_than, write_if_changed};
use crate::glob::Pattern;
use crate::log;
use crate::logger::ProgressLine;

/// Recompress every image matched by `{assets}/{patterns.images}` into
/// `{dist}/{images.dir}`, in parallel.
///
/// Every file is attempted. The first failure is returned once all workers
/// finish; any further failures are logged.
pub fn optimize_images(config: &KilnConfig) -> Result<Vec<PathBuf>, KilnError> {
    let root = config.get_root();
    let pattern = Pattern::new(&config.source_pattern(&config.patterns.images))?;
    let base = root.join(pattern.base());
    let out_dir = config.images_dir();
    let quality = config.images.quality;

    let files = pattern.expand(root)?;
    if files.is_empty() {
        return Ok(Vec::new());
    }

    optimize_all(&files, &base, &out_dir, quality, is_shutdown)
}

/// Process `files` in parallel. Files not yet started when `cancelled`
/// turns true are skipped and left out of the result.
fn optimize_all(
    files: &[PathBuf],
    base: &Path,
    out_dir: &Path,
    quality: u8,
    cancelled: impl Fn() -> bool + Sync,
) -> Result<Vec<PathBuf>, KilnError> {
    let progress = ProgressLine::new("images", files.len());
    let results: Vec<Result<Option<PathBuf>, KilnError>> = files
        .par_iter()
        .map(|source| {
            let result = if cancelled() {
                Ok(None)
            } else {
                let rel = source.strip_prefix(base).unwrap_or(source);
                let dest = out_dir.join(rel);
                optimize_file(source, &dest, quality).map(|()| Some(dest))
            };
            progress.inc();
            result
        })
        .collect();
    progress.finish();

    let mut outputs = Vec::with_capacity(results.len());
    let mut first_error = None;
    for result in results {
        match result {
            Ok(Some(dest)) => outputs.push(dest),
            Ok(None) => {}
            Err(e) if first_error.is_none() => first_error = Some(e),
            Err(e) => log!("error"; "{}", e.report()),
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(outputs),
    }
}

/// Recompress one file unless its output is already newer.
fn optimize_file(source: &Path, dest: &Path, quality: u8) -> Result<(), KilnError> {
    if dest.exists() && !is_newer_than(source, dest) {
        return Ok(());
    }

    let original = fs::read(source).at(source)?;
    let format = ImageFormat::from_path(source).ok();
    let recompressed = match format {
        Some(format) => recompress(&original, format, quality).map_err(|e| KilnError::Image {
            path: source.to_path_buf(),
            source: e,
        })?,
        None => None,
    };

    let bytes = match &recompressed {
        Some(smaller) if smaller.len() < original.len() => smaller.as_slice(),
        _ => original.as_slice(),
    };
    write_if_changed(dest, bytes).at(dest)?;
    Ok(())
}

/// Re-encode supported formats, `None` for formats that are copied.
fn recompress(bytes: &[u8], format: ImageFormat, quality: u8) -> Result<Option<Vec<u8>>, ImageError> {
    let mut out = Cursor::new(Vec::new());
    match format {
        ImageFormat::Jpeg => {
            let img = image::load_from_memory_with_format(bytes, format)?;
            img.write_with_encoder(JpegEncoder::new_with_quality(&mut out, quality))?;
        }
        ImageFormat::Png => {
            let img = image::load_from_memory_with_format(bytes, format)?;
            img.write_with_encoder(PngEncoder::new_with_quality(
                &mut out,
                CompressionType::Best,
                FilterType::Adaptive,
            ))?;
        }
        _ => return Ok(None),
    }
    Ok(Some(out.into_inner()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_project_config;
    use image::{GenericImageView, Rgb, RgbImage};
    use tempfile::TempDir;

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 5 % 256) as u8, ((x + y) % 256) as u8])
        })
    }

    fn encode(img: &RgbImage, format: ImageFormat) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        match format {
            ImageFormat::Png => img
                .write_with_encoder(PngEncoder::new_with_quality(
                    &mut out,
                    CompressionType::Fast,
                    FilterType::NoFilter,
                ))
                .unwrap(),
            ImageFormat::Jpeg => img
                .write_with_encoder(JpegEncoder::new_with_quality(&mut out, 100))
                .unwrap(),
            _ => unreachable!(),
        }
        out.into_inner()
    }

    fn write(root: &Path, rel: &str, bytes: &[u8]) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_outputs_decode_and_never_grow() {
        let dir = TempDir::new().unwrap();
        let img = gradient(64, 48);
        let png = write(dir.path(), "assets/img/logo.png", &encode(&img, ImageFormat::Png));
        let jpg = write(dir.path(), "assets/img/photos/hero.jpg", &encode(&img, ImageFormat::Jpeg));
        let config = test_project_config(dir.path(), "", true);

        let outputs = optimize_images(&config).unwrap();
        assert_eq!(outputs.len(), 2);

        for (source, rel) in [(&png, "dist/img/logo.png"), (&jpg, "dist/img/photos/hero.jpg")] {
            let out = dir.path().join(rel);
            let decoded = image::open(&out).unwrap();
            assert_eq!(decoded.dimensions(), (64, 48));
            assert!(fs::metadata(&out).unwrap().len() <= fs::metadata(source).unwrap().len());
        }
    }

    #[test]
    fn test_gif_is_copied() {
        let dir = TempDir::new().unwrap();
        let gif = b"GIF89a\x01\x00\x01\x00\x00\x00\x00;";
        write(dir.path(), "assets/img/spinner.gif", gif);
        let config = test_project_config(dir.path(), "", false);

        optimize_images(&config).unwrap();
        assert_eq!(fs::read(dir.path().join("dist/img/spinner.gif")).unwrap(), gif);
    }

    #[test]
    fn test_unmatched_files_ignored() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "assets/img/notes.txt", b"not an image");
        let config = test_project_config(dir.path(), "", false);

        assert!(optimize_images(&config).unwrap().is_empty());
        assert!(!dir.path().join("dist/img/notes.txt").exists());
    }

    #[test]
    fn test_corrupt_image_reports_error_but_processes_rest() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "assets/img/broken.png", b"\x89PNG\r\n\x1a\nnot really");
        let good = encode(&gradient(8, 8), ImageFormat::Png);
        write(dir.path(), "assets/img/good.png", &good);
        let config = test_project_config(dir.path(), "", false);

        let err = optimize_images(&config).unwrap_err();
        assert!(matches!(err, KilnError::Image { ref path, .. } if path.ends_with("broken.png")));
        assert!(dir.path().join("dist/img/good.png").is_file());
    }

    #[test]
    fn test_cancelled_files_not_reported() {
        let dir = TempDir::new().unwrap();
        let png = encode(&gradient(8, 8), ImageFormat::Png);
        let files = vec![
            write(dir.path(), "assets/img/a.png", &png),
            write(dir.path(), "assets/img/b.png", &png),
        ];
        let base = dir.path().join("assets/img");
        let out_dir = dir.path().join("dist/img");

        let outputs = optimize_all(&files, &base, &out_dir, 80, || true).unwrap();
        assert!(outputs.is_empty());
        assert!(!out_dir.join("a.png").exists());

        let outputs = optimize_all(&files, &base, &out_dir, 80, || false).unwrap();
        assert_eq!(outputs, vec![out_dir.join("a.png"), out_dir.join("b.png")]);
    }
}

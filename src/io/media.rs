// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media file loading and export.
//!
//! This module decodes the background and subject planes into RGBA and
//! writes the exported composite as PNG.

use anyhow::{Context, Result};
use image::RgbaImage;
use std::path::Path;

/// Decode an image file into 8-bit RGBA.
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).with_context(|| format!("decoding {}", path.display()))?;
    Ok(img.to_rgba8())
}

/// Write an RGBA image as PNG.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    image
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_png_roundtrip_through_disk() {
        let path = std::env::temp_dir().join(format!("text-behind-media-{}.png", std::process::id()));
        let img = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));

        save_png(&img, &path).unwrap();
        let loaded = load_image(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.dimensions(), (3, 2));
        assert_eq!(loaded.get_pixel(2, 1), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = load_image(Path::new("/nonexistent/plane.png")).unwrap_err();
        assert!(format!("{:#}", err).contains("plane.png"));
    }
}

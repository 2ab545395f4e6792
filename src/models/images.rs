// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The decoded background and subject planes.

use image::RgbaImage;

/// Which of the two planes an image is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Plane {
    Background,
    Subject,
}

/// Background plane plus subject cutout, with the original photo size.
///
/// Immutable once built; a new upload replaces the whole pair.
#[derive(Debug, Clone)]
pub struct ImagePair {
    background: RgbaImage,
    subject: RgbaImage,
}

impl ImagePair {
    /// The background plane defines the original dimensions.
    pub fn new(background: RgbaImage, subject: RgbaImage) -> Self {
        if background.dimensions() != subject.dimensions() {
            log::warn!(
                "Subject plane is {:?} but background is {:?}; subject will be stretched",
                subject.dimensions(),
                background.dimensions()
            );
        }
        Self { background, subject }
    }

    pub fn background(&self) -> &RgbaImage {
        &self.background
    }

    pub fn subject(&self) -> &RgbaImage {
        &self.subject
    }

    pub fn original_dimensions(&self) -> (u32, u32) {
        self.background.dimensions()
    }
}

/// Where the image pair is in its lifecycle; drives the placeholder message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageStatus {
    #[default]
    Empty,
    /// The external segmentation call is in flight.
    Processing,
    /// Planes are decoding.
    Loading,
    Ready,
    Failed(String),
}

impl ImageStatus {
    /// Placeholder text shown instead of the composite, if any.
    pub fn placeholder_message(&self) -> Option<&'static str> {
        match self {
            ImageStatus::Empty => Some("Upload an image to get started"),
            ImageStatus::Processing => Some("Processing image..."),
            ImageStatus::Loading => Some("Loading images..."),
            ImageStatus::Ready => None,
            ImageStatus::Failed(_) => Some("Failed to load images. Please try again."),
        }
    }
}

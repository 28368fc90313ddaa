//! The currently displayed image, as far as the transform core sees it.

use serde::{Deserialize, Serialize};

use crate::geometry::ImageGeometry;

/// Opaque reference to pixel data owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelHandle(u64);

impl PixelHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Either no image, or an image's geometry plus a handle to its pixels.
///
/// The host owns this value and decides when it moves between `Empty` and
/// `Loaded`. The dispatcher only ever replaces the geometry of a loaded
/// image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ImageState {
    #[default]
    Empty,
    Loaded {
        geometry: ImageGeometry,
        pixels: PixelHandle,
    },
}

impl ImageState {
    /// A state holding a freshly loaded image.
    pub fn loaded(geometry: ImageGeometry, pixels: PixelHandle) -> Self {
        ImageState::Loaded { geometry, pixels }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, ImageState::Loaded { .. })
    }

    pub fn geometry(&self) -> Option<ImageGeometry> {
        match self {
            ImageState::Empty => None,
            ImageState::Loaded { geometry, .. } => Some(*geometry),
        }
    }

    pub fn handle(&self) -> Option<PixelHandle> {
        match self {
            ImageState::Empty => None,
            ImageState::Loaded { pixels, .. } => Some(*pixels),
        }
    }

    /// Replace the current image, whatever the previous state was.
    pub fn load(&mut self, geometry: ImageGeometry, pixels: PixelHandle) {
        log::debug!("loading {} image as {:?}", geometry, pixels);
        *self = ImageState::Loaded { geometry, pixels };
    }

    /// Drop the current image.
    pub fn unload(&mut self) {
        *self = ImageState::Empty;
    }

    /// Replace the geometry of a loaded image; no effect on an empty state.
    pub(crate) fn set_geometry(&mut self, new_geometry: ImageGeometry) {
        if let ImageState::Loaded { geometry, .. } = self {
            *geometry = new_geometry;
        }
    }
}

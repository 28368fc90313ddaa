//! WASM-compatible wrapper types for images and command results.

use imcommand_core::{PixelBuffer, PixelError, TransformResult};
use wasm_bindgen::prelude::*;

/// An RGB image passed between JavaScript and the viewer.
///
/// The pixel data is stored in WASM memory. `pixels()` copies it out to a
/// JavaScript `Uint8Array`.
#[wasm_bindgen]
pub struct JsImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsImage {
    /// Create a new JsImage from dimensions and pixel data.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsImage {
        JsImage {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of bytes in the pixel buffer
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGB pixel data as Uint8Array (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {}
}

impl JsImage {
    /// Validate into a core pixel buffer.
    pub(crate) fn to_buffer(&self) -> Result<PixelBuffer, PixelError> {
        PixelBuffer::new(self.width, self.height, self.pixels.clone())
    }

    pub(crate) fn from_buffer(buffer: &PixelBuffer) -> Self {
        Self::new(buffer.width(), buffer.height(), buffer.pixels().to_vec())
    }
}

/// Outcome of one viewer command.
///
/// `status` is one of `"applied"`, `"noop"` or `"rejected"`. Width and height
/// are only set when the command was applied.
#[wasm_bindgen]
#[derive(Debug, Clone, PartialEq)]
pub struct JsTransformResult {
    status: &'static str,
    message: String,
    width: Option<u32>,
    height: Option<u32>,
}

#[wasm_bindgen]
impl JsTransformResult {
    #[wasm_bindgen(getter)]
    pub fn status(&self) -> String {
        self.status.to_string()
    }

    /// Status-bar text for the outcome.
    #[wasm_bindgen(getter)]
    pub fn message(&self) -> String {
        self.message.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> Option<u32> {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> Option<u32> {
        self.height
    }

    pub fn is_applied(&self) -> bool {
        self.status == "applied"
    }
}

impl From<&TransformResult> for JsTransformResult {
    fn from(result: &TransformResult) -> Self {
        let (status, geometry) = match result {
            TransformResult::Applied(geometry) => ("applied", Some(*geometry)),
            TransformResult::NoOp => ("noop", None),
            TransformResult::Rejected(_) => ("rejected", None),
        };
        Self {
            status,
            message: result.status_message(),
            width: geometry.map(|g| g.width()),
            height: geometry.map(|g| g.height()),
        }
    }
}

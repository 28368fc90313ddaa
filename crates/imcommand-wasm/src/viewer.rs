//! WASM bindings for the command-driven viewer.
//!
//! The browser has no worker threads available to this module, so pixel work
//! runs inline on every command.

use imcommand_core::{
    BufferSink, Dispatcher, ImageState, PixelBuffer, PixelError, PixelHandle,
};
use wasm_bindgen::prelude::*;

use crate::config::JsTransformConfig;
use crate::types::{JsImage, JsTransformResult};

/// An image viewer driven by command strings.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const viewer = new JsImageViewer();
/// viewer.load(new JsImage(300, 200, pixels));
///
/// const result = viewer.run("3rotate --counter-clockwise");
/// statusBar.textContent = result.message; // "200x300 (portrait)"
/// ```
#[wasm_bindgen]
#[derive(Debug, Default)]
pub struct JsImageViewer {
    dispatcher: Dispatcher,
    state: ImageState,
    buffer: Option<PixelBuffer>,
    next_handle: u64,
}

#[wasm_bindgen]
impl JsImageViewer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsImageViewer {
        Self::default()
    }

    /// Create a viewer with custom transform settings.
    pub fn with_config(config: &JsTransformConfig) -> Result<JsImageViewer, JsValue> {
        let dispatcher =
            Dispatcher::new(config.inner().clone()).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            dispatcher,
            ..Self::default()
        })
    }

    /// Show `image`, replacing whatever was loaded.
    pub fn load(&mut self, image: &JsImage) -> Result<(), JsValue> {
        self.load_image(image)
            .map(|_| ())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn unload(&mut self) {
        self.buffer = None;
        self.state.unload();
    }

    /// Run one command such as `"rotate"` or `"resize 150 200"`.
    pub fn run(&mut self, command: &str) -> JsTransformResult {
        let filter = self.dispatcher.config().filter;
        let result = match self.buffer.as_mut() {
            Some(buffer) => {
                let mut sink = BufferSink::new(buffer, filter);
                self.dispatcher.dispatch_with(command, &mut self.state, &mut sink)
            }
            None => self.dispatcher.dispatch(command, &mut self.state),
        };
        JsTransformResult::from(&result)
    }

    #[wasm_bindgen(getter)]
    pub fn is_loaded(&self) -> bool {
        self.state.is_loaded()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> Option<u32> {
        self.state.geometry().map(|g| g.width())
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> Option<u32> {
        self.state.geometry().map(|g| g.height())
    }

    /// `"landscape"` or `"portrait"`, if an image is loaded.
    #[wasm_bindgen(getter)]
    pub fn orientation(&self) -> Option<String> {
        self.state
            .geometry()
            .map(|g| g.orientation().as_str().to_string())
    }

    /// A copy of the current image.
    pub fn image(&self) -> Option<JsImage> {
        self.buffer.as_ref().map(JsImage::from_buffer)
    }

    /// The current state as a plain object.
    pub fn state_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.state).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl JsImageViewer {
    fn load_image(&mut self, image: &JsImage) -> Result<PixelHandle, PixelError> {
        let buffer = image.to_buffer()?;
        let geometry = buffer.geometry()?;

        self.next_handle += 1;
        let handle = PixelHandle::new(self.next_handle);
        self.buffer = Some(buffer);
        self.state.load(geometry, handle);
        Ok(handle)
    }
}


/// WASM-specific tests that require JsValue.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_load_rejects_bad_buffer() {
        let mut viewer = JsImageViewer::new();
        assert!(viewer.load(&JsImage::new(2, 2, vec![0; 3])).is_err());
        assert!(!viewer.is_loaded());
    }

    #[wasm_bindgen_test]
    fn test_state_json() {
        let mut viewer = JsImageViewer::new();
        viewer.load(&JsImage::new(1, 1, vec![0, 0, 0])).unwrap();
        assert!(viewer.state_json().unwrap().is_object());
    }
}

//! imcommand WASM - WebAssembly bindings for imcommand
//!
//! This crate exposes the imcommand-core viewer commands to JavaScript and
//! TypeScript applications.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrappers for images and command results
//! - `viewer` - The command-driven image viewer
//! - `command` - Parsing and validating command strings
//! - `config` - Transform settings
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsImage, JsImageViewer } from '@imcommand/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const viewer = new JsImageViewer();
//! viewer.load(new JsImage(width, height, rgbPixels));
//! console.log(viewer.run("rescale 2").message);
//! ```

use wasm_bindgen::prelude::*;

mod command;
mod config;
mod types;
mod viewer;

// Re-export public types
pub use command::{parse_command, validate_command};
pub use config::JsTransformConfig;
pub use types::{JsImage, JsTransformResult};
pub use viewer::JsImageViewer;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}

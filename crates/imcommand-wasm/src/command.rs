//! WASM bindings for the command parser.

use imcommand_core::parse_command as core_parse;
use wasm_bindgen::prelude::*;

/// Parse a command string into a plain object.
///
/// # Example (TypeScript)
///
/// ```typescript
/// parse_command("3rotate --counter-clockwise");
/// // { count: 3, name: "rotate", counter_clockwise: true }
/// ```
#[wasm_bindgen]
pub fn parse_command(input: &str) -> Result<JsValue, JsValue> {
    let command = core_parse(input).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&command).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Check a command string without running it.
///
/// Returns the error message, or `undefined` if the command is well formed.
#[wasm_bindgen]
pub fn validate_command(input: &str) -> Option<String> {
    core_parse(input).err().map(|e| e.to_string())
}

//! WASM bindings for transform configuration.

use imcommand_core::{FilterType, RoundingMode, TransformConfig};
use wasm_bindgen::prelude::*;

/// Transform settings for a [`JsImageViewer`](crate::JsImageViewer).
#[wasm_bindgen]
#[derive(Debug, Clone, Default)]
pub struct JsTransformConfig {
    inner: TransformConfig,
}

#[wasm_bindgen]
impl JsTransformConfig {
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsTransformConfig {
        Self::default()
    }

    /// Largest allowed width or height, or `undefined` for no limit.
    #[wasm_bindgen(getter)]
    pub fn max_dimension(&self) -> Option<u32> {
        self.inner.max_dimension
    }

    #[wasm_bindgen(setter)]
    pub fn set_max_dimension(&mut self, value: Option<u32>) {
        self.inner.max_dimension = value;
    }

    /// Resampling filter: `"nearest"`, `"bilinear"` or `"lanczos3"`.
    #[wasm_bindgen(getter)]
    pub fn filter(&self) -> String {
        filter_name(self.inner.filter).to_string()
    }

    pub fn set_filter(&mut self, name: &str) -> Result<(), JsValue> {
        self.inner.filter = filter_from_name(name)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown filter: {}", name)))?;
        Ok(())
    }

    /// Rounding of fractional sides: `"nearest"`, `"floor"` or `"ceil"`.
    #[wasm_bindgen(getter)]
    pub fn rounding(&self) -> String {
        rounding_name(self.inner.rounding).to_string()
    }

    pub fn set_rounding(&mut self, name: &str) -> Result<(), JsValue> {
        self.inner.rounding = rounding_from_name(name)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown rounding mode: {}", name)))?;
        Ok(())
    }

    /// Serialize to JSON for storage
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Deserialize from JSON; missing fields take their defaults.
    pub fn from_json(value: JsValue) -> Result<JsTransformConfig, JsValue> {
        let inner: TransformConfig =
            serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
        inner.validate().map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { inner })
    }
}

impl JsTransformConfig {
    pub(crate) fn inner(&self) -> &TransformConfig {
        &self.inner
    }
}

fn filter_name(filter: FilterType) -> &'static str {
    match filter {
        FilterType::Nearest => "nearest",
        FilterType::Bilinear => "bilinear",
        FilterType::Lanczos3 => "lanczos3",
    }
}

fn filter_from_name(name: &str) -> Option<FilterType> {
    match name {
        "nearest" => Some(FilterType::Nearest),
        "bilinear" => Some(FilterType::Bilinear),
        "lanczos3" => Some(FilterType::Lanczos3),
        _ => None,
    }
}

fn rounding_name(mode: RoundingMode) -> &'static str {
    match mode {
        RoundingMode::Nearest => "nearest",
        RoundingMode::Floor => "floor",
        RoundingMode::Ceil => "ceil",
    }
}

fn rounding_from_name(name: &str) -> Option<RoundingMode> {
    match name {
        "nearest" => Some(RoundingMode::Nearest),
        "floor" => Some(RoundingMode::Floor),
        "ceil" => Some(RoundingMode::Ceil),
        _ => None,
    }
}

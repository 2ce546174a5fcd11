//! WebAssembly bindings for howmuch-core
//!
//! This module provides wasm-bindgen bindings for use in web applications.
//! Enable the "wasm" feature to use these bindings.

#![cfg(feature = "wasm")]

use wasm_bindgen::prelude::*;

use crate::session::{decode_fragment, encode_fragment, APOLOGY_DELAY};
use crate::{Catalog, Engine};

/// Initialize panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WASM-compatible wrapper for the howmuch Engine
#[wasm_bindgen]
pub struct WasmEngine {
    engine: Engine,
}

#[wasm_bindgen]
impl WasmEngine {
    /// Build an engine from the text of the two tables.
    /// Throws with a description of the offending row if either is malformed.
    #[wasm_bindgen(constructor)]
    pub fn new(units_tsv: &str, comparisons_tsv: &str) -> Result<WasmEngine, JsError> {
        let catalog = Catalog::from_tsv(units_tsv, comparisons_tsv)?;
        Ok(Self {
            engine: Engine::new(catalog),
        })
    }

    /// Engine over the tables compiled into the crate
    #[wasm_bindgen]
    pub fn builtin() -> Result<WasmEngine, JsError> {
        Ok(Self {
            engine: Engine::builtin()?,
        })
    }

    /// Answer one input and return the result as a JSON string
    #[wasm_bindgen]
    pub fn query(&self, input: &str) -> String {
        let query = self.engine.query(input);
        serde_json::to_string(&query)
            .unwrap_or_else(|_| r#"{"type":"error","message":"serialization failed"}"#.to_string())
    }

    /// Milliseconds a page should wait before apologising for an unknown unit
    #[wasm_bindgen]
    pub fn apology_delay_ms() -> u32 {
        u32::try_from(APOLOGY_DELAY.as_millis()).unwrap_or(u32::MAX)
    }
}

/// Encode input text for the page's URL fragment
#[wasm_bindgen]
pub fn to_fragment(text: &str) -> String {
    encode_fragment(text)
}

/// Decode the page's URL fragment back into input text (empty if malformed)
#[wasm_bindgen]
pub fn from_fragment(fragment: &str) -> String {
    decode_fragment(fragment).unwrap_or_default()
}

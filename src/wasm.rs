//! WASM bindings for browser-based viewers.
//!
//! The viewer fetches the TEI document itself and hands the bytes over; the
//! page model comes back as JSON.

use wasm_bindgen::prelude::*;

use crate::{Book, ParseOptions, UnresolvedPolicy};

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// Parse TEI bytes and return the book model as JSON.
#[wasm_bindgen]
pub fn parse_tei_json(data: &[u8]) -> Result<String, JsValue> {
    to_json(data, &ParseOptions::default())
}

/// Like [`parse_tei_json`], choosing how unaligned text is handled:
/// `"drop"`, `"collect"` or `"follow-page-break"`.
#[wasm_bindgen]
pub fn parse_tei_json_with(data: &[u8], unresolved: &str) -> Result<String, JsValue> {
    let policy = match unresolved {
        "drop" => UnresolvedPolicy::Drop,
        "collect" => UnresolvedPolicy::Collect,
        "follow-page-break" => UnresolvedPolicy::FollowPageBreak,
        other => {
            return Err(JsValue::from_str(&format!(
                "unknown unresolved policy: {other}"
            )));
        }
    };
    to_json(data, &ParseOptions::new().with_unresolved(policy))
}

fn to_json(data: &[u8], options: &ParseOptions) -> Result<String, JsValue> {
    let book =
        Book::from_bytes_with(data, options).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::to_string(&book).map_err(|e| JsValue::from_str(&e.to_string()))
}

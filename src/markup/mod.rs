//! Markup decoding: raw bytes to a generic attributed tree.

mod reader;
mod tree;

pub use reader::parse_document;
pub use tree::{Element, Node};

use crate::error::Result;
use crate::util::decode_text;

/// Decode raw document bytes (any supported encoding) into the root element.
pub fn decode(bytes: &[u8]) -> Result<Element> {
    let text = decode_text(bytes);
    parse_document(&text)
}

//! The page-indexed book model.
//!
//! This module contains:
//! - Surfaces (page images) and their zones
//! - Text segments in reading order
//! - Pages joining one surface with its aligned segments
//! - The read-only [`Book`] aggregate and its lookups
//! - Diagnostics recorded while building it

mod book;
mod diagnostic;
mod segment;
mod surface;

pub use book::{Book, Metadata, Page, UNTITLED};
pub use diagnostic::Diagnostic;
pub use segment::{SegmentKind, TextSegment};
pub use surface::{BoundingBox, Surface, Zone, ZoneKind};

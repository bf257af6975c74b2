//! # folio
//!
//! Builds a page-indexed model of a digitized book from a TEI document that
//! carries both a facsimile (page images with line and block zones) and a
//! transcription (reading-order text with `facs` references into the zones).
//!
//! ## Features
//!
//! - One [`Page`] per facsimile surface, ordered by page number
//! - Text segments attached to the page that owns the line zone they reference
//! - Lookups for a page by number and a zone by id within a page
//! - Configurable handling of text that aligns to no line zone
//!
//! ## Quick Start
//!
//! ```no_run
//! use folio::Book;
//!
//! let book = Book::open("book.xml").unwrap();
//! println!("{}: {} pages", book.title(), book.total_pages());
//!
//! if let Some(page) = book.page(1) {
//!     for segment in &page.segments {
//!         print!("{}", segment.text);
//!     }
//! }
//! ```
//!
//! ## Unresolved text
//!
//! By default, segments whose reference resolves to no line zone are left out.
//! [`ParseOptions`] can keep them instead:
//!
//! ```
//! use folio::{Book, ParseOptions, UnresolvedPolicy};
//!
//! let xml = br##"<TEI>
//!   <teiHeader/>
//!   <facsimile><surface xml:id="facs_page_1"><graphic url="p1.jpg"/></surface></facsimile>
//!   <text><body><pb n="1"/><seg>Loose text</seg></body></text>
//! </TEI>"##;
//!
//! let options = ParseOptions::new().with_unresolved(UnresolvedPolicy::FollowPageBreak);
//! let book = Book::from_bytes_with(xml, &options).unwrap();
//! assert_eq!(book.page(1).unwrap().segments[0].text, "Loose text");
//! ```

pub mod error;
pub mod markup;
pub mod model;
pub mod options;
pub mod tei;
pub(crate) mod util;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Error, Result};
pub use model::{
    Book, BoundingBox, Diagnostic, Metadata, Page, SegmentKind, Surface, TextSegment, Zone,
    ZoneKind,
};
pub use options::{ParseOptions, UnresolvedPolicy};
pub use tei::parse_tei;

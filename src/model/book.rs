use std::path::Path;
use std::str::FromStr;

use super::diagnostic::Diagnostic;
use super::segment::TextSegment;
use super::surface::{Surface, Zone};
use crate::error::{Error, Result};
use crate::options::ParseOptions;

/// Title used when the header declares none.
pub const UNTITLED: &str = "Untitled Book";

/// Free-text bibliographic information from the document header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Metadata {
    /// Source description; empty when absent.
    pub source: String,
    /// Publication statement; empty when absent.
    pub publication_info: String,
}

impl Metadata {
    pub fn new(source: impl Into<String>, publication_info: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            publication_info: publication_info.into(),
        }
    }
}

/// One displayed page: an image surface plus the text aligned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Page {
    /// Positive, unique, defines display order.
    pub number: u32,
    pub surface: Surface,
    /// Segments in reading order.
    pub segments: Vec<TextSegment>,
}

impl Page {
    pub fn new(number: u32, surface: Surface) -> Self {
        Self {
            number,
            surface,
            segments: Vec::new(),
        }
    }

    /// Zone on this page's surface with the given id.
    pub fn zone(&self, zone_id: &str) -> Option<&Zone> {
        self.surface.zone(zone_id)
    }

    /// Segments aligned to a zone, in reading order.
    pub fn segments_for_zone<'a>(
        &'a self,
        zone_id: &'a str,
    ) -> impl Iterator<Item = &'a TextSegment> {
        self.segments
            .iter()
            .filter(move |seg| seg.zone_ref.as_deref() == Some(zone_id))
    }
}

/// A digitized book: page images with their synchronized transcription.
///
/// Built once from a single source document and read-only afterwards. All
/// access goes through shared references.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Book {
    title: String,
    total_pages: usize,
    metadata: Metadata,
    pages: Vec<Page>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    unattached: Vec<TextSegment>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    diagnostics: Vec<Diagnostic>,
}

impl Book {
    /// Assemble a book from pages already sorted by ascending number.
    pub(crate) fn new(
        title: String,
        metadata: Metadata,
        pages: Vec<Page>,
        unattached: Vec<TextSegment>,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        debug_assert!(pages.windows(2).all(|w| w[0].number < w[1].number));
        Self {
            title,
            total_pages: pages.len(),
            metadata,
            pages,
            unattached,
            diagnostics,
        }
    }

    /// Parse a TEI document from raw bytes with default options.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes_with(bytes, &ParseOptions::default())
    }

    /// Parse a TEI document from raw bytes.
    pub fn from_bytes_with(bytes: &[u8], options: &ParseOptions) -> Result<Self> {
        crate::tei::parse_tei(bytes, options)
    }

    /// Read and parse a TEI file with default options.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, &ParseOptions::default())
    }

    /// Read and parse a TEI file.
    pub fn open_with(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes_with(&bytes, options)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Pages in ascending number order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Page with the given number.
    pub fn page(&self, number: u32) -> Option<&Page> {
        self.pages
            .binary_search_by_key(&number, |page| page.number)
            .ok()
            .map(|idx| &self.pages[idx])
    }

    /// Zone with the given id on the surface of page `number`.
    pub fn zone(&self, number: u32, zone_id: &str) -> Option<&Zone> {
        self.page(number)?.zone(zone_id)
    }

    /// Segments that reached no page (empty under the default policy).
    pub fn unattached(&self) -> &[TextSegment] {
        &self.unattached
    }

    /// Recoverable anomalies met while building the book.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

impl FromStr for Book {
    type Err = Error;

    fn from_str(xml: &str) -> Result<Self> {
        Self::from_bytes(xml.as_bytes())
    }
}

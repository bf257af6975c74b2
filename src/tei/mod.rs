//! TEI document to [`Book`] transformation.
//!
//! The pipeline is:
//! 1. Decode the bytes into an element tree ([`crate::markup`])
//! 2. Read the header, the facsimile surfaces and the body text independently
//! 3. Number pages and cross-reference segments to line zones ([`assemble`])
//!
//! Only an undecodable document or a missing required section is fatal.

mod assemble;
mod facsimile;
mod header;
mod text;

pub use assemble::{Assembly, assemble, number_pages};
pub use facsimile::extract_surfaces;
pub use header::{HeaderInfo, read_header};
pub use text::{LINE_SEPARATOR, PageBreak, TextStream, extract_segments};

use tracing::debug;

use crate::error::{Error, Result};
use crate::markup::{self, Element};
use crate::model::Book;
use crate::options::ParseOptions;

/// Parse TEI bytes into a [`Book`].
pub fn parse_tei(bytes: &[u8], options: &ParseOptions) -> Result<Book> {
    let root = markup::decode(bytes)?;
    build_book(&root, options)
}

/// Build a [`Book`] from an already decoded `<TEI>` root.
pub fn build_book(root: &Element, options: &ParseOptions) -> Result<Book> {
    let sections = Sections::locate(root)?;
    let mut diagnostics = Vec::new();

    let header = read_header(sections.header);
    let surfaces = extract_surfaces(sections.facsimile, options, &mut diagnostics);
    let stream = extract_segments(sections.body);

    let Assembly { pages, unattached } =
        assemble(surfaces, stream, options.unresolved, &mut diagnostics);

    debug!(
        title = %header.title,
        pages = pages.len(),
        diagnostics = diagnostics.len(),
        "built book"
    );

    Ok(Book::new(
        header.title,
        header.metadata,
        pages,
        unattached,
        diagnostics,
    ))
}

/// The three sections every document must have.
struct Sections<'a> {
    header: &'a Element,
    facsimile: &'a Element,
    body: &'a Element,
}

impl<'a> Sections<'a> {
    fn locate(root: &'a Element) -> Result<Self> {
        if root.name != "TEI" {
            return Err(Error::UnexpectedRoot(root.name.clone()));
        }

        Ok(Self {
            header: root
                .child("teiHeader")
                .ok_or(Error::MissingSection("teiHeader"))?,
            facsimile: root
                .child("facsimile")
                .ok_or(Error::MissingSection("facsimile"))?,
            body: root
                .descend(&["text", "body"])
                .ok_or(Error::MissingSection("text/body"))?,
        })
    }
}

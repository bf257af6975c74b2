//! Error types for folio operations.

use thiserror::Error;

/// Fatal errors that prevent a [`Book`](crate::Book) from being built.
///
/// Anything recoverable (missing metadata, missing image dimensions, a
/// reference that resolves nowhere) is defaulted instead and, where worth
/// surfacing, recorded as a [`Diagnostic`](crate::Diagnostic).
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed document: {0}")]
    Malformed(String),

    #[error("Unexpected root element <{0}>, expected <TEI>")]
    UnexpectedRoot(String),

    #[error("Missing required section: {0}")]
    MissingSection(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;

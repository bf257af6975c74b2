//! Title and bibliographic metadata from `<teiHeader>`.

use crate::markup::Element;
use crate::model::{Metadata, UNTITLED};
use crate::util::normalize_space;

/// Header fields with their fallbacks applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
    pub metadata: Metadata,
}

/// Read the title, source description and publication statement.
///
/// Each field is optional: a missing title becomes [`UNTITLED`], missing
/// descriptions become empty strings.
pub fn read_header(header: &Element) -> HeaderInfo {
    let file_desc = header.child("fileDesc");

    let title = file_desc
        .and_then(|fd| fd.descend(&["titleStmt", "title"]))
        .map(|t| normalize_space(&t.text()))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());

    let statement = |name: &str| {
        file_desc
            .and_then(|fd| fd.child(name))
            .map(statement_text)
            .unwrap_or_default()
    };

    HeaderInfo {
        title,
        metadata: Metadata::new(statement("sourceDesc"), statement("publicationStmt")),
    }
}

/// Text of the first `<p>`, or of the whole statement when it has none.
fn statement_text(statement: &Element) -> String {
    match statement.child("p") {
        Some(p) => normalize_space(&p.text()),
        None => normalize_space(&statement.text()),
    }
}

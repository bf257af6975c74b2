use std::fmt;

/// A recoverable anomaly met while building a book.
///
/// Diagnostics never stop the build; they record where a documented fallback
/// was applied so callers can surface it.
///
/// Reference diagnostics describe the markup, not where the segment ended up:
/// [`BlockReference`](Diagnostic::BlockReference) and
/// [`UnresolvedReference`](Diagnostic::UnresolvedReference) are recorded even
/// when [`UnresolvedPolicy::FollowPageBreak`](crate::UnresolvedPolicy::FollowPageBreak)
/// then places the segment on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Diagnostic {
    /// A surface has no `graphic/@url`.
    MissingImage { surface_id: String },
    /// A surface id was already used; the later surface was skipped.
    DuplicateSurface { surface_id: String },
    /// A zone's lower-right corner lies above or left of its upper-left.
    InvertedZone { surface_id: String, zone_id: String },
    /// A line zone id appears on more than one page; the first page wins.
    DuplicateZone {
        zone_id: String,
        first_page: u32,
        page: u32,
    },
    /// A segment points at a zone that exists but is not a line zone.
    BlockReference { segment_id: String, zone_ref: String },
    /// A segment points at a zone id that does not exist.
    UnresolvedReference { segment_id: String, zone_ref: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingImage { surface_id } => {
                write!(f, "surface {surface_id} has no image reference")
            }
            Diagnostic::DuplicateSurface { surface_id } => {
                write!(f, "surface id {surface_id} is repeated; later surface skipped")
            }
            Diagnostic::InvertedZone {
                surface_id,
                zone_id,
            } => write!(f, "zone {zone_id} on {surface_id} has an inverted bounding box"),
            Diagnostic::DuplicateZone {
                zone_id,
                first_page,
                page,
            } => write!(
                f,
                "line zone {zone_id} on page {page} duplicates page {first_page}; keeping page {first_page}"
            ),
            Diagnostic::BlockReference {
                segment_id,
                zone_ref,
            } => write!(f, "segment {segment_id} references block zone {zone_ref}"),
            Diagnostic::UnresolvedReference {
                segment_id,
                zone_ref,
            } => write!(f, "segment {segment_id} references unknown zone {zone_ref}"),
        }
    }
}

//! Units of transcribed text.

/// Role of a segment in the text stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SegmentKind {
    /// Transcribed content from a `<seg>`.
    Segment,
    /// A `<lb>` line break; its text is a single newline.
    LineBreak,
    /// A `<pb>` page break. The extractor records breaks in
    /// [`TextStream::page_breaks`](crate::tei::TextStream) rather than as
    /// segments, so pages never carry this kind.
    PageBreak,
}

/// The smallest addressable unit of transcribed text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TextSegment {
    /// Declared id, or a synthesized `seg_<n>` / `lb_<n>`.
    pub id: String,
    pub text: String,
    /// Id of the zone this segment aligns to, without the leading `#`.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub zone_ref: Option<String>,
    pub kind: SegmentKind,
}

impl TextSegment {
    pub fn new(id: impl Into<String>, text: impl Into<String>, kind: SegmentKind) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            zone_ref: None,
            kind,
        }
    }

    pub fn with_zone_ref(mut self, zone_ref: impl Into<String>) -> Self {
        self.zone_ref = Some(zone_ref.into());
        self
    }
}

//! Segment extraction from the `<text><body>` section.
//!
//! The body is walked depth-first. Each element is classified into a
//! [`BodyNode`] and matched exhaustively: paragraphs and unknown wrappers are
//! descended, `<seg>` and `<lb>` become [`TextSegment`]s, and `<pb>` is
//! recorded as a [`PageBreak`] positioned in the segment stream.

use tracing::debug;

use crate::markup::Element;
use crate::model::{SegmentKind, TextSegment};
use crate::util::{normalize_space, strip_anchor};

/// Text carried by every line-break segment.
pub const LINE_SEPARATOR: &str = "\n";

/// A `<pb>` marker recorded during extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageBreak {
    /// Declared `n`, or the previous break's number plus one.
    pub number: u32,
    /// Surface id from `facs`, without the leading `#`.
    pub surface_ref: Option<String>,
    /// Index in [`TextStream::segments`] of the first segment after the break.
    pub position: usize,
}

/// Ordered output of segment extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextStream {
    pub segments: Vec<TextSegment>,
    pub page_breaks: Vec<PageBreak>,
}

impl TextStream {
    /// The last page break at or before segment `index`.
    pub fn page_break_before(&self, index: usize) -> Option<&PageBreak> {
        page_break_before(&self.page_breaks, index)
    }
}

/// The last break in `breaks` (ordered by position) at or before segment `index`.
pub fn page_break_before(breaks: &[PageBreak], index: usize) -> Option<&PageBreak> {
    let after = breaks.partition_point(|pb| pb.position <= index);
    after.checked_sub(1).map(|i| &breaks[i])
}

/// Element kinds recognized in the text body.
enum BodyNode<'a> {
    Paragraph(&'a Element),
    Segment(&'a Element),
    LineBreak(&'a Element),
    PageBreak(&'a Element),
    Wrapper(&'a Element),
}

impl<'a> BodyNode<'a> {
    fn classify(el: &'a Element) -> Self {
        match el.name.as_str() {
            "p" => BodyNode::Paragraph(el),
            "seg" => BodyNode::Segment(el),
            "lb" => BodyNode::LineBreak(el),
            "pb" => BodyNode::PageBreak(el),
            _ => BodyNode::Wrapper(el),
        }
    }
}

/// Extract segments and page breaks from `body` in document order.
pub fn extract_segments(body: &Element) -> TextStream {
    let mut walker = SegmentWalker::default();
    walker.walk(body);

    debug!(
        segments = walker.stream.segments.len(),
        page_breaks = walker.stream.page_breaks.len(),
        "extracted text stream"
    );
    walker.stream
}

/// Walk state owned by a single [`extract_segments`] call.
///
/// `next_id` is shared by synthesized `seg_<n>` and `lb_<n>` ids.
#[derive(Default)]
struct SegmentWalker {
    next_id: usize,
    last_page: u32,
    stream: TextStream,
}

impl SegmentWalker {
    fn walk(&mut self, parent: &Element) {
        for child in parent.elements() {
            self.visit(child);
        }
    }

    fn visit(&mut self, el: &Element) {
        match BodyNode::classify(el) {
            BodyNode::Paragraph(p) => self.walk(p),
            BodyNode::Segment(seg) => {
                let id = match seg.xml_id() {
                    Some(id) => id.to_string(),
                    None => self.synthesize_id("seg"),
                };
                self.push(id, normalize_space(&seg.text()), seg, SegmentKind::Segment);
            }
            BodyNode::LineBreak(lb) => {
                let id = self.synthesize_id("lb");
                self.push(id, LINE_SEPARATOR.to_string(), lb, SegmentKind::LineBreak);
            }
            BodyNode::PageBreak(pb) => {
                let number = pb
                    .attr("n")
                    .and_then(|n| n.trim().parse::<u32>().ok())
                    .filter(|&n| n > 0)
                    .unwrap_or_else(|| self.last_page.saturating_add(1));
                self.last_page = number;
                self.stream.page_breaks.push(PageBreak {
                    number,
                    surface_ref: pb.attr("facs").and_then(strip_anchor).map(str::to_string),
                    position: self.stream.segments.len(),
                });
            }
            BodyNode::Wrapper(w) => self.walk(w),
        }
    }

    fn synthesize_id(&mut self, prefix: &str) -> String {
        let id = format!("{prefix}_{}", self.next_id);
        self.next_id += 1;
        id
    }

    fn push(&mut self, id: String, text: String, el: &Element, kind: SegmentKind) {
        self.stream.segments.push(TextSegment {
            id,
            text,
            zone_ref: el.attr("facs").and_then(strip_anchor).map(str::to_string),
            kind,
        });
    }
}

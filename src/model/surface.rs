//! Page images and their rectangular regions.

/// Axis-aligned rectangle in image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BoundingBox {
    /// Upper-left x.
    pub ulx: i32,
    /// Upper-left y.
    pub uly: i32,
    /// Lower-right x.
    pub lrx: i32,
    /// Lower-right y.
    pub lry: i32,
}

impl BoundingBox {
    pub fn new(ulx: i32, uly: i32, lrx: i32, lry: i32) -> Self {
        Self { ulx, uly, lrx, lry }
    }

    /// Width in pixels; zero for an inverted box.
    pub fn width(&self) -> u32 {
        self.lrx.saturating_sub(self.ulx).max(0) as u32
    }

    /// Height in pixels; zero for an inverted box.
    pub fn height(&self) -> u32 {
        self.lry.saturating_sub(self.uly).max(0) as u32
    }

    /// True when the lower-right corner is not above or left of the upper-left.
    pub fn is_well_formed(&self) -> bool {
        self.lrx >= self.ulx && self.lry >= self.uly
    }

    /// Whether a pixel lies inside the box (edges inclusive).
    pub fn contains(&self, x: i32, y: i32) -> bool {
        (self.ulx..=self.lrx).contains(&x) && (self.uly..=self.lry).contains(&y)
    }
}

/// What a zone outlines on the page image.
///
/// Only [`ZoneKind::Line`] zones take part in text alignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ZoneKind {
    /// A single line of text.
    Line,
    /// A text block or region containing lines.
    Block,
    /// Any other declared type, kept verbatim.
    Other(String),
    /// No type declared and none inferable.
    Unknown,
}

impl ZoneKind {
    /// Classify a declared `type` attribute value.
    pub fn from_type(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "line" | "textline" => ZoneKind::Line,
            "block" | "textblock" | "textregion" => ZoneKind::Block,
            _ => ZoneKind::Other(value.to_string()),
        }
    }

    pub fn is_line(&self) -> bool {
        matches!(self, ZoneKind::Line)
    }
}

/// A rectangular region on one page image.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Zone {
    /// Unique within its surface.
    pub id: String,
    pub kind: ZoneKind,
    pub bbox: BoundingBox,
    /// Polygon outline, passed through untouched.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub points: Option<String>,
    /// Baseline polyline, passed through untouched.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub baseline: Option<String>,
}

/// One imaged page and the zones drawn on it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Surface {
    /// Unique across the document.
    pub id: String,
    /// Image file reference.
    pub image: String,
    pub width: u32,
    pub height: u32,
    pub zones: Vec<Zone>,
}

impl Surface {
    /// Zone on this surface with the given id.
    pub fn zone(&self, id: &str) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.id == id)
    }

    /// Zones that take part in text alignment.
    pub fn line_zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter().filter(|zone| zone.kind.is_line())
    }
}

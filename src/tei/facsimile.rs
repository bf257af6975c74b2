//! Surface extraction from the `<facsimile>` section.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::markup::Element;
use crate::model::{BoundingBox, Diagnostic, Surface, Zone, ZoneKind};
use crate::options::ParseOptions;
use crate::util::{parse_coordinate, parse_dimension};

/// Zone ids containing this marker are line zones when no `type` is declared.
const LINE_ID_MARKER: &str = "facs_line_";

/// Element kinds that matter inside `<facsimile>`.
enum FacsimileNode<'a> {
    Surface(&'a Element),
    Group(&'a Element),
    Other,
}

impl<'a> FacsimileNode<'a> {
    fn classify(el: &'a Element) -> Self {
        match el.name.as_str() {
            "surface" => FacsimileNode::Surface(el),
            "surfaceGrp" => FacsimileNode::Group(el),
            _ => FacsimileNode::Other,
        }
    }
}

/// Extract every surface in encounter order.
///
/// Surfaces without an id are named `facs_page_<n>`, where `n` starts at the
/// 1-based position and moves past any id another surface already uses.
/// A repeated declared id keeps the first surface.
pub fn extract_surfaces(
    facsimile: &Element,
    options: &ParseOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<Surface> {
    let mut elements = Vec::new();
    collect_surface_elements(facsimile, &mut elements);

    let declared: HashSet<&str> = elements.iter().copied().filter_map(Element::xml_id).collect();
    let mut seen: HashSet<String> = HashSet::new();
    let mut surfaces = Vec::with_capacity(elements.len());

    for (index, el) in elements.into_iter().enumerate() {
        let id = match el.xml_id() {
            Some(id) => id.to_string(),
            None => unused_id("facs_page_", index + 1, |id| {
                declared.contains(id) || seen.contains(id)
            }),
        };
        let surface = extract_surface(el, id, index, options, diagnostics);
        if !seen.insert(surface.id.clone()) {
            warn!(surface = %surface.id, "duplicate surface id, skipping");
            diagnostics.push(Diagnostic::DuplicateSurface {
                surface_id: surface.id,
            });
            continue;
        }
        surfaces.push(surface);
    }

    debug!(count = surfaces.len(), "extracted surfaces");
    surfaces
}

fn collect_surface_elements<'a>(parent: &'a Element, out: &mut Vec<&'a Element>) {
    for child in parent.elements() {
        match FacsimileNode::classify(child) {
            FacsimileNode::Surface(surface) => out.push(surface),
            FacsimileNode::Group(group) => collect_surface_elements(group, out),
            FacsimileNode::Other => {}
        }
    }
}

/// `<prefix><n>` for the first `n` from `start` that `taken` rejects.
fn unused_id(prefix: &str, start: usize, taken: impl Fn(&str) -> bool) -> String {
    (start..)
        .map(|n| format!("{prefix}{n}"))
        .find(|id| !taken(id))
        .unwrap_or_else(|| format!("{prefix}{start}"))
}

fn extract_surface(
    el: &Element,
    id: String,
    index: usize,
    options: &ParseOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> Surface {
    let graphic = el.child("graphic");
    let image = graphic
        .and_then(|g| g.attr("url"))
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    if image.is_empty() {
        warn!(surface = %id, "surface has no graphic url");
        diagnostics.push(Diagnostic::MissingImage {
            surface_id: id.clone(),
        });
    }

    let dimension = |name: &str| graphic.and_then(|g| g.attr(name)).and_then(parse_dimension);
    let width = dimension("width").unwrap_or(options.default_width);
    let height = dimension("height").unwrap_or(options.default_height);

    let mut zone_elements = Vec::new();
    collect_zone_elements(el, &mut zone_elements);

    // Unnamed zones take `zone_<surface>_<n>`, skipping ids declared on this surface.
    let declared: HashSet<&str> = zone_elements
        .iter()
        .copied()
        .filter_map(Element::xml_id)
        .collect();
    let mut synthesized: HashSet<String> = HashSet::new();
    let mut zones = Vec::with_capacity(zone_elements.len());

    for (zone_index, z) in zone_elements.into_iter().enumerate() {
        let zone_id = match z.xml_id() {
            Some(zone_id) => zone_id.to_string(),
            None => {
                let zone_id = unused_id(&format!("zone_{index}_"), zone_index, |candidate| {
                    declared.contains(candidate) || synthesized.contains(candidate)
                });
                synthesized.insert(zone_id.clone());
                zone_id
            }
        };
        zones.push(extract_zone(z, zone_id, &id, diagnostics));
    }

    Surface {
        id,
        image,
        width,
        height,
        zones,
    }
}

/// Zones in document order, flattening line zones nested in block zones.
fn collect_zone_elements<'a>(parent: &'a Element, out: &mut Vec<&'a Element>) {
    for zone in parent.children_named("zone") {
        out.push(zone);
        collect_zone_elements(zone, out);
    }
}

fn extract_zone(
    el: &Element,
    id: String,
    surface_id: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Zone {
    let kind = match el.attr("type").filter(|t| !t.trim().is_empty()) {
        Some(declared) => ZoneKind::from_type(declared),
        None if id.contains(LINE_ID_MARKER) => ZoneKind::Line,
        None => ZoneKind::Unknown,
    };

    let coordinate = |name: &str| el.attr(name).and_then(parse_coordinate).unwrap_or(0);
    let bbox = BoundingBox::new(
        coordinate("ulx"),
        coordinate("uly"),
        coordinate("lrx"),
        coordinate("lry"),
    );

    if !bbox.is_well_formed() {
        warn!(surface = %surface_id, zone = %id, "inverted zone bounding box");
        diagnostics.push(Diagnostic::InvertedZone {
            surface_id: surface_id.to_string(),
            zone_id: id.clone(),
        });
    }

    Zone {
        id,
        kind,
        bbox,
        points: el.attr("points").map(str::to_string),
        baseline: el.attr("baseline").map(str::to_string),
    }
}

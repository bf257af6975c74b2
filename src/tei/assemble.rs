//! Page assembly and zone cross-referencing.
//!
//! Surfaces become numbered pages, line zones are indexed by id, and every
//! segment whose `zone_ref` names an indexed line zone is appended to the page
//! that owns it. Segments are visited once, in extraction order, so each
//! page's list keeps reading order.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use super::text::{PageBreak, TextStream, page_break_before};
use crate::model::{Diagnostic, Page, Surface, TextSegment};
use crate::options::UnresolvedPolicy;

/// Surface ids of this form carry their page number.
const PAGE_ID_PREFIX: &str = "facs_page_";

/// Pages and leftovers produced by [`assemble`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembly {
    /// Ascending by number.
    pub pages: Vec<Page>,
    /// Segments kept off every page (only under [`UnresolvedPolicy::Collect`]
    /// or when [`UnresolvedPolicy::FollowPageBreak`] finds no page).
    pub unattached: Vec<TextSegment>,
}

/// Join surfaces and the text stream into pages.
pub fn assemble(
    surfaces: Vec<Surface>,
    stream: TextStream,
    policy: UnresolvedPolicy,
    diagnostics: &mut Vec<Diagnostic>,
) -> Assembly {
    let mut pages = number_pages(surfaces);
    let index = ZoneIndex::build(&pages, diagnostics);
    let fallback = PageBreakTargets::new(&pages);

    let TextStream {
        segments,
        page_breaks,
    } = stream;

    let mut unattached = Vec::new();
    let mut attached = 0usize;

    for (position, segment) in segments.into_iter().enumerate() {
        if let Some(target) = index.resolve(&segment, diagnostics) {
            pages[target].segments.push(segment);
            attached += 1;
            continue;
        }

        match policy {
            UnresolvedPolicy::Drop => {}
            UnresolvedPolicy::Collect => unattached.push(segment),
            UnresolvedPolicy::FollowPageBreak => {
                let target = page_break_before(&page_breaks, position)
                    .and_then(|pb| fallback.page_for(pb));
                match target {
                    Some(target) => {
                        pages[target].segments.push(segment);
                        attached += 1;
                    }
                    None => unattached.push(segment),
                }
            }
        }
    }

    debug!(
        pages = pages.len(),
        attached,
        unattached = unattached.len(),
        "assembled pages"
    );

    Assembly { pages, unattached }
}

/// Page number declared by a `facs_page_<digits>` surface id.
fn declared_page_number(surface_id: &str) -> Option<u32> {
    let digits = surface_id.strip_prefix(PAGE_ID_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u32>().ok().filter(|&n| n > 0)
}

/// One page per surface, sorted by ascending number.
///
/// Declared numbers are used as-is. Other surfaces take the next value of a
/// running counter that skips every declared or already assigned number, so
/// numbers stay unique whatever the encounter order.
pub fn number_pages(surfaces: Vec<Surface>) -> Vec<Page> {
    let declared: HashSet<u32> = surfaces
        .iter()
        .filter_map(|s| declared_page_number(&s.id))
        .collect();

    let mut assigned = HashSet::with_capacity(surfaces.len());
    let mut counter = 1u32;
    let mut pages = Vec::with_capacity(surfaces.len());

    for surface in surfaces {
        let number = match declared_page_number(&surface.id) {
            Some(n) if assigned.insert(n) => n,
            _ => {
                while declared.contains(&counter) || assigned.contains(&counter) {
                    counter += 1;
                }
                assigned.insert(counter);
                counter
            }
        };
        pages.push(Page::new(number, surface));
    }

    pages.sort_by_key(|page| page.number);
    pages
}

/// Zone id lookup over assembled pages.
struct ZoneIndex {
    /// Line zone id -> index into the page list.
    lines: HashMap<String, usize>,
    /// Ids of zones that exist but are not lines.
    others: HashSet<String>,
}

impl ZoneIndex {
    fn build(pages: &[Page], diagnostics: &mut Vec<Diagnostic>) -> Self {
        let mut lines: HashMap<String, usize> = HashMap::new();
        let mut others = HashSet::new();

        for (idx, page) in pages.iter().enumerate() {
            for zone in &page.surface.zones {
                if !zone.kind.is_line() {
                    others.insert(zone.id.clone());
                    continue;
                }

                if let Some(&first) = lines.get(&zone.id) {
                    let first_page = pages[first].number;
                    warn!(zone = %zone.id, first_page, page = page.number, "duplicate line zone id");
                    diagnostics.push(Diagnostic::DuplicateZone {
                        zone_id: zone.id.clone(),
                        first_page,
                        page: page.number,
                    });
                    continue;
                }

                lines.insert(zone.id.clone(), idx);
            }
        }

        debug!(line_zones = lines.len(), "indexed line zones");
        Self { lines, others }
    }

    /// Page index for a segment's reference, recording why a reference fails.
    fn resolve(&self, segment: &TextSegment, diagnostics: &mut Vec<Diagnostic>) -> Option<usize> {
        let zone_ref = segment.zone_ref.as_deref()?;

        if let Some(&idx) = self.lines.get(zone_ref) {
            return Some(idx);
        }

        let diagnostic = if self.others.contains(zone_ref) {
            warn!(segment = %segment.id, zone = zone_ref, "segment references a non-line zone");
            Diagnostic::BlockReference {
                segment_id: segment.id.clone(),
                zone_ref: zone_ref.to_string(),
            }
        } else {
            warn!(segment = %segment.id, zone = zone_ref, "segment references an unknown zone");
            Diagnostic::UnresolvedReference {
                segment_id: segment.id.clone(),
                zone_ref: zone_ref.to_string(),
            }
        };
        diagnostics.push(diagnostic);
        None
    }
}

/// Where a page break sends segments under [`UnresolvedPolicy::FollowPageBreak`].
struct PageBreakTargets {
    by_surface: HashMap<String, usize>,
    by_number: HashMap<u32, usize>,
}

impl PageBreakTargets {
    fn new(pages: &[Page]) -> Self {
        Self {
            by_surface: pages
                .iter()
                .enumerate()
                .map(|(idx, page)| (page.surface.id.clone(), idx))
                .collect(),
            by_number: pages
                .iter()
                .enumerate()
                .map(|(idx, page)| (page.number, idx))
                .collect(),
        }
    }

    /// The break's `facs` surface when known, else the page with its number.
    fn page_for(&self, pb: &PageBreak) -> Option<usize> {
        pb.surface_ref
            .as_deref()
            .and_then(|id| self.by_surface.get(id))
            .or_else(|| self.by_number.get(&pb.number))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, SegmentKind, Zone, ZoneKind};
    use proptest::prelude::*;

    fn zone(id: &str, kind: ZoneKind) -> Zone {
        Zone {
            id: id.to_string(),
            kind,
            bbox: BoundingBox::new(0, 0, 100, 20),
            points: None,
            baseline: None,
        }
    }

    fn surface(id: &str, zones: Vec<Zone>) -> Surface {
        Surface {
            id: id.to_string(),
            image: format!("{id}.jpg"),
            width: 1000,
            height: 1500,
            zones,
        }
    }

    fn seg(id: &str, zone_ref: Option<&str>) -> TextSegment {
        let segment = TextSegment::new(id, id.to_uppercase(), SegmentKind::Segment);
        match zone_ref {
            Some(r) => segment.with_zone_ref(r),
            None => segment,
        }
    }

    fn stream(segments: Vec<TextSegment>) -> TextStream {
        TextStream {
            segments,
            page_breaks: Vec::new(),
        }
    }

    fn numbers(pages: &[Page]) -> Vec<u32> {
        pages.iter().map(|p| p.number).collect()
    }

    fn segment_ids(page: &Page) -> Vec<&str> {
        page.segments.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_declared_page_number() {
        assert_eq!(declared_page_number("facs_page_12"), Some(12));
        assert_eq!(declared_page_number("facs_page_007"), Some(7));
        assert_eq!(declared_page_number("facs_page_0"), None);
        assert_eq!(declared_page_number("facs_page_"), None);
        assert_eq!(declared_page_number("facs_page_3a"), None);
        assert_eq!(declared_page_number("s1"), None);
    }

    #[test]
    fn test_pages_sorted_by_declared_number() {
        let pages = number_pages(vec![
            surface("facs_page_3", vec![]),
            surface("facs_page_1", vec![]),
        ]);
        assert_eq!(numbers(&pages), vec![1, 3]);
        assert_eq!(pages[0].surface.id, "facs_page_1");
    }

    #[test]
    fn test_undeclared_surfaces_use_counter_in_encounter_order() {
        let pages = number_pages(vec![
            surface("front", vec![]),
            surface("facs_page_1", vec![]),
            surface("back", vec![]),
            surface("facs_page_3", vec![]),
        ]);

        let by_id: Vec<_> = pages.iter().map(|p| (p.surface.id.as_str(), p.number)).collect();
        assert_eq!(
            by_id,
            vec![("facs_page_1", 1), ("front", 2), ("facs_page_3", 3), ("back", 4)]
        );
    }

    #[test]
    fn test_colliding_declared_numbers_stay_unique() {
        let pages = number_pages(vec![
            surface("facs_page_1", vec![]),
            surface("facs_page_01", vec![]),
        ]);
        assert_eq!(numbers(&pages), vec![1, 2]);
        assert_eq!(pages[1].surface.id, "facs_page_01");
    }

    #[test]
    fn test_segments_attach_to_owning_page_in_order() {
        let surfaces = vec![
            surface("facs_page_2", vec![zone("l3", ZoneKind::Line)]),
            surface(
                "facs_page_1",
                vec![zone("l1", ZoneKind::Line), zone("l2", ZoneKind::Line)],
            ),
        ];
        let segments = vec![
            seg("a", Some("l2")),
            seg("b", Some("l3")),
            seg("c", Some("l1")),
            seg("d", Some("l3")),
        ];

        let mut diagnostics = Vec::new();
        let assembly = assemble(
            surfaces,
            stream(segments),
            UnresolvedPolicy::Drop,
            &mut diagnostics,
        );

        assert!(diagnostics.is_empty());
        assert_eq!(segment_ids(&assembly.pages[0]), vec!["a", "c"]);
        assert_eq!(segment_ids(&assembly.pages[1]), vec!["b", "d"]);
    }

    #[test]
    fn test_block_and_missing_references_are_dropped() {
        let surfaces = vec![surface(
            "s1",
            vec![zone("b1", ZoneKind::Block), zone("l1", ZoneKind::Line)],
        )];
        let segments = vec![
            seg("to_block", Some("b1")),
            seg("no_ref", None),
            seg("ghost", Some("nope")),
            seg("ok", Some("l1")),
        ];

        let mut diagnostics = Vec::new();
        let assembly = assemble(
            surfaces,
            stream(segments),
            UnresolvedPolicy::Drop,
            &mut diagnostics,
        );

        assert_eq!(segment_ids(&assembly.pages[0]), vec!["ok"]);
        assert!(assembly.unattached.is_empty());
        assert_eq!(
            diagnostics,
            vec![
                Diagnostic::BlockReference {
                    segment_id: "to_block".to_string(),
                    zone_ref: "b1".to_string()
                },
                Diagnostic::UnresolvedReference {
                    segment_id: "ghost".to_string(),
                    zone_ref: "nope".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_collect_policy_keeps_unresolved_in_order() {
        let surfaces = vec![surface("s1", vec![zone("l1", ZoneKind::Line)])];
        let segments = vec![
            seg("x", None),
            seg("ok", Some("l1")),
            seg("y", Some("missing")),
        ];

        let assembly = assemble(
            surfaces,
            stream(segments),
            UnresolvedPolicy::Collect,
            &mut Vec::new(),
        );

        assert_eq!(segment_ids(&assembly.pages[0]), vec!["ok"]);
        let leftovers: Vec<_> = assembly.unattached.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(leftovers, vec!["x", "y"]);
    }

    #[test]
    fn test_follow_page_break_policy() {
        let surfaces = vec![
            surface("facs_page_1", vec![zone("l1", ZoneKind::Line)]),
            surface("facs_page_2", vec![zone("l2", ZoneKind::Line)]),
            surface("insert", vec![]),
        ];
        let text = TextStream {
            segments: vec![
                seg("before", None),
                seg("p1_anchored", Some("l1")),
                seg("p1_loose", None),
                seg("p2_loose", None),
                seg("p2_anchored", Some("l2")),
                seg("insert_loose", None),
            ],
            page_breaks: vec![
                PageBreak {
                    number: 1,
                    surface_ref: None,
                    position: 1,
                },
                PageBreak {
                    number: 2,
                    surface_ref: Some("facs_page_2".to_string()),
                    position: 3,
                },
                PageBreak {
                    number: 99,
                    surface_ref: Some("insert".to_string()),
                    position: 5,
                },
            ],
        };

        let assembly = assemble(
            surfaces,
            text,
            UnresolvedPolicy::FollowPageBreak,
            &mut Vec::new(),
        );

        assert_eq!(segment_ids(&assembly.pages[0]), vec!["p1_anchored", "p1_loose"]);
        assert_eq!(segment_ids(&assembly.pages[1]), vec!["p2_loose", "p2_anchored"]);
        assert_eq!(segment_ids(&assembly.pages[2]), vec!["insert_loose"]);
        assert_eq!(assembly.unattached.len(), 1);
        assert_eq!(assembly.unattached[0].id, "before");
    }

    #[test]
    fn test_duplicate_line_zone_is_flagged_not_merged() {
        let surfaces = vec![
            surface("facs_page_1", vec![zone("dup", ZoneKind::Line)]),
            surface("facs_page_2", vec![zone("dup", ZoneKind::Line)]),
        ];

        let mut diagnostics = Vec::new();
        let assembly = assemble(
            surfaces,
            stream(vec![seg("a", Some("dup"))]),
            UnresolvedPolicy::Drop,
            &mut diagnostics,
        );

        assert_eq!(segment_ids(&assembly.pages[0]), vec!["a"]);
        assert!(assembly.pages[1].segments.is_empty());
        assert_eq!(
            diagnostics,
            vec![Diagnostic::DuplicateZone {
                zone_id: "dup".to_string(),
                first_page: 1,
                page: 2
            }]
        );
    }

    #[test]
    fn test_surfaces_without_text_still_become_pages() {
        let assembly = assemble(
            vec![surface("s1", vec![]), surface("s2", vec![])],
            TextStream::default(),
            UnresolvedPolicy::Drop,
            &mut Vec::new(),
        );
        assert_eq!(numbers(&assembly.pages), vec![1, 2]);
        assert!(assembly.pages.iter().all(|p| p.segments.is_empty()));
    }

    fn surface_id() -> impl Strategy<Value = String> {
        prop_oneof![
            (0u32..40).prop_map(|n| format!("facs_page_{n}")),
            "[a-z]{1,6}",
        ]
    }

    proptest! {
        #[test]
        fn prop_one_unique_sorted_page_per_surface(
            ids in prop::collection::hash_set(surface_id(), 0..30)
        ) {
            let surfaces: Vec<_> = ids.iter().map(|id| surface(id, vec![])).collect();
            let count = surfaces.len();
            let pages = number_pages(surfaces);

            prop_assert_eq!(pages.len(), count);
            prop_assert!(pages.windows(2).all(|w| w[0].number < w[1].number));
            prop_assert!(pages.iter().all(|p| p.number > 0));

            for page in &pages {
                if let Some(n) = declared_page_number(&page.surface.id) {
                    prop_assert_eq!(page.number, n);
                }
            }
        }

        #[test]
        fn prop_line_references_land_on_owning_page_once(
            lines_per_page in prop::collection::vec(0usize..5, 1..6),
            picks in prop::collection::vec(any::<prop::sample::Index>(), 0..40)
        ) {
            let surfaces: Vec<_> = lines_per_page
                .iter()
                .enumerate()
                .map(|(p, &n)| {
                    let zones = (0..n).map(|l| zone(&format!("l{p}_{l}"), ZoneKind::Line)).collect();
                    surface(&format!("facs_page_{}", p + 1), zones)
                })
                .collect();
            let all_zones: Vec<(u32, String)> = surfaces
                .iter()
                .enumerate()
                .flat_map(|(p, s)| s.zones.iter().map(move |z| (p as u32 + 1, z.id.clone())))
                .collect();
            prop_assume!(!all_zones.is_empty());

            let segments: Vec<_> = picks
                .iter()
                .enumerate()
                .map(|(i, pick)| seg(&format!("s{i}"), Some(pick.get(&all_zones).1.as_str())))
                .collect();

            let assembly = assemble(
                surfaces,
                stream(segments.clone()),
                UnresolvedPolicy::Drop,
                &mut Vec::new(),
            );

            let total: usize = assembly.pages.iter().map(|p| p.segments.len()).sum();
            prop_assert_eq!(total, segments.len());

            for (i, pick) in picks.iter().enumerate() {
                let (page_number, _) = pick.get(&all_zones);
                let page = assembly.pages.iter().find(|p| p.number == *page_number).unwrap();
                let id = format!("s{i}");
                prop_assert_eq!(page.segments.iter().filter(|s| s.id == id).count(), 1);
            }

            for page in &assembly.pages {
                let order: Vec<usize> = page
                    .segments
                    .iter()
                    .map(|s| s.id[1..].parse().unwrap())
                    .collect();
                prop_assert!(order.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }
}

//! quick-xml event loop that builds an [`Element`] tree.

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

use super::tree::{Element, Node};
use crate::error::{Error, Result};
use crate::util::resolve_entity;

/// Parse a complete XML document into its root element.
///
/// Text is kept verbatim (no trimming) with entity references resolved;
/// comments, processing instructions and the doctype are skipped. Unbalanced
/// markup, stray content after the root, or an empty document is an error.
pub fn parse_document(xml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(start_element(&e)?),
            Event::Empty(e) => {
                let el = start_element(&e)?;
                close_element(el, &mut stack, &mut root)?;
            }
            Event::End(e) => {
                let el = stack.pop().ok_or_else(|| {
                    Error::Malformed(format!(
                        "closing tag </{}> without an open element",
                        String::from_utf8_lossy(e.local_name().as_ref())
                    ))
                })?;
                close_element(el, &mut stack, &mut root)?;
            }
            Event::Text(e) => push_text(&mut stack, &String::from_utf8_lossy(e.as_ref())),
            Event::CData(e) => push_text(&mut stack, &String::from_utf8_lossy(e.as_ref())),
            Event::GeneralRef(e) => {
                let entity = String::from_utf8_lossy(e.as_ref());
                match resolve_entity(&entity) {
                    Some(resolved) => push_text(&mut stack, &resolved),
                    // Undeclared entities stay visible rather than vanishing.
                    None => push_text(&mut stack, &format!("&{entity};")),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::Malformed(format!("unclosed element <{}>", open.name)));
    }

    root.ok_or_else(|| Error::Malformed("document has no root element".to_string()))
}

fn start_element(e: &BytesStart<'_>) -> Result<Element> {
    let mut el = Element::new(String::from_utf8_lossy(e.local_name().as_ref()));

    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attr.value);
        let value = unescape(&raw)
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| raw.to_string());
        el.attributes.push((key, value));
    }

    Ok(el)
}

fn close_element(el: Element, stack: &mut [Element], root: &mut Option<Element>) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(el));
        return Ok(());
    }

    if root.is_some() {
        return Err(Error::Malformed(format!(
            "second root element <{}>",
            el.name
        )));
    }

    *root = Some(el);
    Ok(())
}

/// Append text to the innermost open element, merging with a preceding text node.
fn push_text(stack: &mut [Element], text: &str) {
    let Some(parent) = stack.last_mut() else {
        return;
    };

    match parent.children.last_mut() {
        Some(Node::Text(existing)) => existing.push_str(text),
        _ => parent.children.push(Node::Text(text.to_string())),
    }
}

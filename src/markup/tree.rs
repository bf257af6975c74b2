//! Generic attributed element tree.

/// A node in the decoded tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with its local name, attributes as written, and ordered children.
///
/// Repeated sibling tags are simply consecutive entries in `children`, so a
/// single occurrence and a list of occurrences look the same to callers that
/// go through [`Element::children_named`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Local name (namespace prefix removed): `tei:zone` -> `zone`.
    pub name: String,
    /// Attributes in document order, keyed by their qualified name (`xml:id`).
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Value of the attribute with exactly this qualified name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Declared identifier: `xml:id`, falling back to a plain `id`.
    pub fn xml_id(&self) -> Option<&str> {
        self.attr("xml:id")
            .or_else(|| self.attr("id"))
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Child elements in document order, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// Child elements with the given local name, in document order.
    ///
    /// This is the one place "a single node" and "a list of nodes" are
    /// normalized: both yield an ordered sequence.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |el| el.name == name)
    }

    /// First child element with the given local name.
    pub fn child<'a>(&'a self, name: &str) -> Option<&'a Element> {
        self.elements().find(|el| el.name == name)
    }

    /// Follow a path of local names through first matching children.
    pub fn descend(&self, path: &[&str]) -> Option<&Element> {
        path.iter().try_fold(self, |el, name| el.child(name))
    }

    /// All descendant text concatenated in document order.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Element(el) => el.collect_text(out),
            }
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }
}

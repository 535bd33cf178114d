//! Element tree types

/// An XML element: name, ordered attributes, child elements and text.
///
/// Mixed content is not modeled. Text directly inside an element is kept in
/// [`Element::text`]; whitespace-only text around child elements is layout
/// and is dropped by the reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    /// Create an element with no attributes, children or text
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: String::new(),
        }
    }

    /// Element name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value of an attribute, if present
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// All attributes in document order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Set an attribute, replacing an existing value in place
    pub fn set_attribute<K: Into<String>, V: Into<String>>(&mut self, name: K, value: V) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Builder form of [`Element::set_attribute`]
    pub fn with_attribute<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Text content
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text content
    pub fn set_text<S: Into<String>>(&mut self, text: S) {
        self.text = text.into();
    }

    /// Builder form of [`Element::set_text`]
    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.set_text(text);
        self
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Append a child element
    pub fn add_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Builder form of [`Element::add_child`]
    pub fn with_child(mut self, child: Element) -> Self {
        self.add_child(child);
        self
    }

    /// All child elements in document order
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Child elements with the given name, in document order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// First child element with the given name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Check if the element has child elements
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// A document: exactly one root element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Create a document around a root element
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// The root element
    pub fn root(&self) -> &Element {
        &self.root
    }
}

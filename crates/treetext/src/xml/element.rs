//! A minimal owned XML element tree, read and written with quick-xml.

use std::str::FromStr;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{Result, TreeError};

/// An XML element: tag name, attributes in document order, optional text
/// content and child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing one of the same name in place.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Child elements named `name`, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Parse XML text into its root element.
    ///
    /// Text is kept as written. Whitespace-only text beside child elements
    /// is layout and dropped; declarations, comments and processing
    /// instructions are ignored.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);

        let mut stack: Vec<Open> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    stack.push(Open::new(element_from_start(&e)?));
                }
                Ok(Event::Empty(e)) => {
                    let node = element_from_start(&e)?;
                    attach(node, &mut stack, &mut root)?;
                }
                Ok(Event::End(_)) => {
                    if let Some(open) = stack.pop() {
                        attach(open.finish(), &mut stack, &mut root)?;
                    }
                }
                Ok(Event::Text(e)) => {
                    let text = e.unescape().map_err(|e| TreeError::XmlParse(e.to_string()))?;
                    push_text(&mut stack, text.into_owned());
                }
                Ok(Event::CData(e)) => {
                    push_text(&mut stack, String::from_utf8_lossy(&e).into_owned());
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(TreeError::XmlParse(format!(
                        "at byte {}: {e}",
                        reader.buffer_position()
                    )))
                }
            }
        }

        if let Some(open) = stack.last() {
            return Err(TreeError::XmlParse(format!(
                "unclosed element <{}>",
                open.element.name
            )));
        }
        root.ok_or_else(|| TreeError::XmlParse("no root element found".to_string()))
    }

    /// Markup for this element without an XML declaration.
    pub fn to_markup(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        self.write(&mut writer)?;
        into_string(writer)
    }

    /// Full document: `<?xml version="1.0" standalone="yes"?>` followed by
    /// this element.
    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", None, Some("yes"))))
            .map_err(|e| TreeError::Conversion(e.to_string()))?;
        self.write(&mut writer)?;
        into_string(writer)
    }

    fn write<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.text.is_none() && self.children.is_empty() {
            return writer
                .write_event(Event::Empty(start))
                .map_err(|e| TreeError::Conversion(e.to_string()));
        }

        writer
            .write_event(Event::Start(start))
            .map_err(|e| TreeError::Conversion(e.to_string()))?;
        if let Some(text) = &self.text {
            writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(|e| TreeError::Conversion(e.to_string()))?;
        }
        for child in &self.children {
            child.write(writer)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(|e| TreeError::Conversion(e.to_string()))
    }
}

impl FromStr for Element {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self> {
        Element::parse(s)
    }
}

fn element_from_start(e: &BytesStart<'_>) -> Result<Element> {
    let mut node = Element::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());
    for attr in e.attributes() {
        let attr = attr.map_err(|e| TreeError::XmlParse(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| TreeError::XmlParse(e.to_string()))?
            .into_owned();
        node.attributes.push((key, value));
    }
    Ok(node)
}

/// An element still being read, with its text segments as they arrived.
struct Open {
    element: Element,
    segments: Vec<String>,
}

impl Open {
    fn new(element: Element) -> Self {
        Self {
            element,
            segments: Vec::new(),
        }
    }

    /// Leaf text is kept whole, whitespace included. Once the element has
    /// children, whitespace-only segments between them are indentation.
    fn finish(mut self) -> Element {
        let leaf = self.element.children.is_empty();
        let text: String = self
            .segments
            .iter()
            .filter(|segment| leaf || !segment.trim().is_empty())
            .map(String::as_str)
            .collect();
        if !text.is_empty() {
            self.element.text = Some(text);
        }
        self.element
    }
}

/// Hand a finished element to its parent, or make it the root.
fn attach(node: Element, stack: &mut [Open], root: &mut Option<Element>) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.element.children.push(node),
        None if root.is_some() => {
            return Err(TreeError::XmlParse(format!(
                "multiple root elements (second is <{}>)",
                node.name
            )))
        }
        None => *root = Some(node),
    }
    Ok(())
}

/// Text outside the root element is ignored.
fn push_text(stack: &mut [Open], text: String) {
    if let Some(open) = stack.last_mut() {
        open.segments.push(text);
    }
}

fn into_string(writer: Writer<Vec<u8>>) -> Result<String> {
    String::from_utf8(writer.into_inner()).map_err(|e| TreeError::Conversion(e.to_string()))
}

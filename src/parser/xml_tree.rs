//! A small element tree built from the XML footer
//!
//! Footer element casing is not consistent between writers, so every
//! element and attribute name is lower-cased once while the tree is built
//! and all lookups compare against lower-case keys.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{Result, SpeError};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    /// Local name as written in the document.
    pub name: String,
    key: String,
    attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    fn from_start(event: &BytesStart) -> Result<Self> {
        let name = String::from_utf8_lossy(event.local_name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in event.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).to_ascii_lowercase();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            key: name.to_ascii_lowercase(),
            name,
            attributes,
            text: String::new(),
            children: Vec::new(),
        })
    }

    /// Whether this element's name matches the lower-case `key`.
    pub fn is(&self, key: &str) -> bool {
        debug_assert!(!key.bytes().any(|b| b.is_ascii_uppercase()));
        self.key == key
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn children_named<'s, 'k>(&'s self, key: &'k str) -> impl Iterator<Item = &'s XmlElement> {
        self.children.iter().filter(move |c| c.is(key))
    }

    pub fn child(&self, key: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.is(key))
    }

    /// First element, in document order, reached by following `path` from
    /// this element. Sibling elements sharing a name are all searched.
    pub fn find(&self, path: &[&str]) -> Option<&XmlElement> {
        let Some((first, rest)) = path.split_first() else {
            return Some(self);
        };
        self.children_named(first)
            .find_map(|child| child.find(rest))
    }
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(SpeError::format(format!(
                "XML footer has more than one root element (found <{}>)",
                element.name
            )));
        }
    }
    Ok(())
}

/// Parses a complete XML document into its root element.
pub fn parse_document(text: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(text);
    reader.trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root = None;
    loop {
        match reader.read_event()? {
            Event::Start(ref e) => stack.push(XmlElement::from_start(e)?),
            Event::Empty(ref e) => {
                let element = XmlElement::from_start(e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| SpeError::format("unbalanced end tag in XML footer"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(ref e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(SpeError::format(format!(
            "XML footer ends inside <{}>",
            open.name
        )));
    }
    root.ok_or_else(|| SpeError::format("XML footer contains no elements"))
}

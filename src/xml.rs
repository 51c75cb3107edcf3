//! Owned XML trees built from API response bodies
//!
//! Responses are parsed once and converted into [`XmlElement`] values so the
//! resource accessors can walk them without holding on to the response text.

use std::collections::BTreeMap;

use crate::errors::NewRelicError;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub text: Option<String>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Element text, with an empty element reading as `""`.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// All descendants named `tag`, in document order. The element itself is
    /// not considered.
    pub fn find_all(&self, tag: &str) -> Vec<&XmlElement> {
        let mut found = Vec::new();
        collect_descendants(self, tag, &mut found);
        found
    }

    pub fn find(&self, tag: &str) -> Option<&XmlElement> {
        self.find_all(tag).into_iter().next()
    }

    pub fn child(&self, tag: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.tag == tag)
    }

    pub fn child_text(&self, tag: &str) -> Option<&str> {
        self.child(tag).map(XmlElement::text)
    }

    /// Direct children keyed by tag. Later duplicates win.
    pub fn child_map(&self) -> BTreeMap<String, String> {
        self.children
            .iter()
            .map(|child| (child.tag.clone(), child.text().to_string()))
            .collect()
    }
}

fn collect_descendants<'a>(element: &'a XmlElement, tag: &str, found: &mut Vec<&'a XmlElement>) {
    for child in &element.children {
        if child.tag == tag {
            found.push(child);
        }
        collect_descendants(child, tag, found);
    }
}

/// Parses a response body, tolerating the blank lines the API emits ahead of
/// the XML declaration.
pub fn parse_response(body: &str) -> Result<XmlElement, NewRelicError> {
    let normalized = body.trim_start_matches(['\u{feff}', '\n', '\r', ' ', '\t']);
    let document = roxmltree::Document::parse(normalized)
        .map_err(|err| NewRelicError::MalformedResponse(err.to_string()))?;

    Ok(to_owned_element(document.root_element()))
}

fn to_owned_element(node: roxmltree::Node<'_, '_>) -> XmlElement {
    let attributes = node
        .attributes()
        .map(|attribute| (attribute.name().to_string(), attribute.value().to_string()))
        .collect();

    // Only the text ahead of the first child element belongs to this element;
    // it is kept verbatim unless it is pure indentation.
    let mut text = String::new();
    let mut children = Vec::new();
    for child in node.children() {
        if child.is_element() {
            children.push(to_owned_element(child));
        } else if child.is_text() && children.is_empty() {
            text.push_str(child.text().unwrap_or_default());
        }
    }

    XmlElement {
        tag: node.tag_name().name().to_string(),
        attributes,
        text: (!text.trim().is_empty()).then_some(text),
        children,
    }
}

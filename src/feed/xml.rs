use std::borrow::Cow;

use quick_xml::escape::{resolve_xml_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use thiserror::Error;

/// Namespace URIs used by the feed dialects we read.
pub mod ns {
    pub const DUBLIN_CORE: &str = "http://purl.org/dc/elements/1.1/";
    pub const MEDIA_RSS: &str = "http://search.yahoo.com/mrss/";
    pub const CONTENT: &str = "http://purl.org/rss/1.0/modules/content/";
}

#[derive(Debug, Error)]
#[error("{message} (byte {position})")]
pub struct XmlError {
    pub message: String,
    pub position: u64,
}

impl XmlError {
    fn new(message: impl Into<String>, position: u64) -> Self {
        Self { message: message.into(), position }
    }
}

/// A namespace-qualified element name. `ns: None` only matches elements
/// that are not in any namespace, mirroring how plain RSS tags are looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    pub ns: Option<&'static str>,
    pub local: &'static str,
}

impl Tag {
    pub const fn plain(local: &'static str) -> Self {
        Self { ns: None, local }
    }

    pub const fn qualified(ns: &'static str, local: &'static str) -> Self {
        Self { ns: Some(ns), local }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub ns: Option<String>,
    pub local: String,
    attrs: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    pub fn is(&self, tag: Tag) -> bool {
        self.local == tag.local && self.ns.as_deref() == tag.ns
    }

    /// Direct text content (text and CDATA nodes that are immediate children).
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    pub fn child(&self, tag: Tag) -> Option<&Element> {
        self.children.iter().find(|c| c.is(tag))
    }

    pub fn children<'a>(&'a self, tag: Tag) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.is(tag))
    }

    /// First matching element below `self` in document order (self excluded).
    pub fn descendant(&self, tag: Tag) -> Option<&Element> {
        for c in &self.children {
            if c.is(tag) { return Some(c); }
            if let Some(found) = c.descendant(tag) { return Some(found); }
        }
        None
    }

    /// All matching elements below `self`, in document order.
    pub fn descendants(&self, tag: Tag) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_descendants(tag, &mut out);
        out
    }

    fn collect_descendants<'a>(&'a self, tag: Tag, out: &mut Vec<&'a Element>) {
        for c in &self.children {
            if c.is(tag) { out.push(c); }
            c.collect_descendants(tag, out);
        }
    }

    /// Direct child first, then any deeper element.
    pub fn child_or_descendant(&self, tag: Tag) -> Option<&Element> {
        self.child(tag).or_else(|| self.descendant(tag))
    }

    /// Text of the first matching child, or `default` when the child is
    /// missing or its text is empty.
    pub fn child_text(&self, tag: Tag, default: &str) -> String {
        non_empty_text(self.child(tag), default)
    }
}

pub fn non_empty_text(el: Option<&Element>, default: &str) -> String {
    match el.map(Element::text) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => default.to_string(),
    }
}

/// Parse a complete document and return its root element.
pub fn parse_document(xml: &str) -> Result<Element, XmlError> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let position = reader.buffer_position();
        let (resolved, event) = reader
            .read_resolved_event()
            .map_err(|e| XmlError::new(e.to_string(), position))?;
        match event {
            Event::Start(e) => {
                let el = open_element(resolved, &e, position)?;
                if root.is_some() && stack.is_empty() {
                    return Err(XmlError::new("junk after document element", position));
                }
                stack.push(el);
            }
            Event::Empty(e) => {
                let el = open_element(resolved, &e, position)?;
                if root.is_some() && stack.is_empty() {
                    return Err(XmlError::new("junk after document element", position));
                }
                close_element(el, &mut stack, &mut root);
            }
            Event::End(_) => {
                let Some(el) = stack.pop() else {
                    return Err(XmlError::new("unexpected closing tag", position));
                };
                close_element(el, &mut stack, &mut root);
            }
            Event::Text(t) => {
                let raw = t.decode().map_err(|e| XmlError::new(e.to_string(), position))?;
                push_text(&mut stack, &unescape_or_raw(&raw), position)?;
            }
            Event::CData(c) => {
                let raw = c.into_inner();
                push_text(&mut stack, &String::from_utf8_lossy(&raw), position)?;
            }
            Event::GeneralRef(r) => {
                let resolved = if let Some(ch) = r.resolve_char_ref().map_err(|e| XmlError::new(e.to_string(), position))? {
                    ch.to_string()
                } else {
                    let name = r.decode().map_err(|e| XmlError::new(e.to_string(), position))?;
                    match resolve_xml_entity(&name) {
                        Some(s) => s.to_string(),
                        None => return Err(XmlError::new(format!("undefined entity &{name};"), position)),
                    }
                };
                push_text(&mut stack, &resolved, position)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::new(format!("unclosed element <{}>", open.local), reader.buffer_position()));
    }
    root.ok_or_else(|| XmlError::new("no element found", 0))
}

fn open_element(resolved: ResolveResult<'_>, e: &BytesStart<'_>, position: u64) -> Result<Element, XmlError> {
    let ns = match resolved {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
        ResolveResult::Unbound => None,
        ResolveResult::Unknown(prefix) => {
            return Err(XmlError::new(
                format!("unbound prefix {}", String::from_utf8_lossy(&prefix)),
                position,
            ));
        }
    };
    let local = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();

    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| XmlError::new(err.to_string(), position))?;
        let key = attr.key;
        if key.as_namespace_binding().is_some() { continue; }
        let name = String::from_utf8_lossy(key.local_name().as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attr.value);
        attrs.push((name, unescape_or_raw(&raw)));
    }

    Ok(Element { ns, local, attrs, text: String::new(), children: Vec::new() })
}

fn close_element(el: Element, stack: &mut [Element], root: &mut Option<Element>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(el),
        None => *root = Some(el),
    }
}

fn push_text(stack: &mut [Element], text: &str, position: u64) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(el) => {
            el.text.push_str(text);
            Ok(())
        }
        // whitespace around the document element is fine, anything else is not
        None if text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}').is_empty() => Ok(()),
        None => Err(XmlError::new("text outside of document element", position)),
    }
}

fn unescape_or_raw(raw: &str) -> String {
    match unescape(raw) {
        Ok(Cow::Borrowed(s)) => s.to_string(),
        Ok(Cow::Owned(s)) => s,
        Err(_) => raw.to_string(),
    }
}

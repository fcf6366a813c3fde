// File: crates/riso-core/src/container.rs
// Summary: Host-side container model: elements that charts mount their surfaces into, and a document to scan.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{ChartError, Result};

/// Identifier of a raster surface mounted in an element.
pub type SurfaceId = u64;

/// A host element a chart can be placed in.
#[derive(Debug, Clone)]
pub struct Element {
    pub id: String,
    /// Measured layout width in logical pixels; zero when unknown.
    pub client_width: f32,
    pub device_pixel_ratio: f32,
    attributes: HashMap<String, String>,
    mounted: Vec<SurfaceId>,
}

pub type ElementRef = Rc<RefCell<Element>>;

impl Element {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            client_width: 0.0,
            device_pixel_ratio: 1.0,
            attributes: HashMap::new(),
            mounted: Vec::new(),
        }
    }

    pub fn with_width(mut self, w: f32) -> Self {
        self.client_width = w;
        self
    }

    pub fn with_device_pixel_ratio(mut self, dpr: f32) -> Self {
        self.device_pixel_ratio = dpr;
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn into_ref(self) -> ElementRef {
        Rc::new(RefCell::new(self))
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Surfaces currently in this element's visual tree, in mount order.
    pub fn mounted(&self) -> &[SurfaceId] {
        &self.mounted
    }

    pub(crate) fn mount(&mut self, id: SurfaceId) {
        self.mounted.push(id);
    }

    pub(crate) fn unmount(&mut self, id: SurfaceId) {
        self.mounted.retain(|&m| m != id);
    }
}

/// Flat, ordered collection of elements; stands in for the host document.
#[derive(Debug, Default, Clone)]
pub struct Document {
    elements: Vec<ElementRef>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: Element) -> ElementRef {
        let el = element.into_ref();
        self.elements.push(Rc::clone(&el));
        el
    }

    /// Look up by `#id` or bare id.
    pub fn query(&self, selector: &str) -> Option<ElementRef> {
        let id = selector.strip_prefix('#').unwrap_or(selector);
        self.elements.iter().find(|e| e.borrow().id == id).cloned()
    }

    /// Container for `selector`, resolved when a chart is created.
    pub fn select<'a>(&'a self, selector: &'a str) -> Container<'a> {
        Container::Selector { document: self, selector }
    }

    /// Elements carrying `name`, in document order.
    pub fn with_attribute(&self, name: &str) -> Vec<ElementRef> {
        self.elements
            .iter()
            .filter(|e| e.borrow().attribute(name).is_some())
            .cloned()
            .collect()
    }
}

/// Where a chart should be placed: a direct element or a selector into a document.
#[derive(Clone, Copy)]
pub enum Container<'a> {
    Element(&'a ElementRef),
    Selector { document: &'a Document, selector: &'a str },
}

impl Container<'_> {
    pub fn resolve(&self) -> Result<ElementRef> {
        match *self {
            Container::Element(el) => Ok(Rc::clone(el)),
            Container::Selector { document, selector } => document
                .query(selector)
                .ok_or_else(|| ChartError::ContainerNotFound(selector.to_string())),
        }
    }
}

impl<'a> From<&'a ElementRef> for Container<'a> {
    fn from(el: &'a ElementRef) -> Self {
        Container::Element(el)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_accepts_hash_prefix() {
        let mut doc = Document::new();
        doc.push(Element::new("sales"));
        assert!(doc.query("#sales").is_some());
        assert!(doc.query("sales").is_some());
        assert!(doc.query("#missing").is_none());
    }

    #[test]
    fn missing_selector_is_container_not_found() {
        let doc = Document::new();
        let err = Container::Selector { document: &doc, selector: "#nope" }.resolve().unwrap_err();
        assert!(matches!(err, ChartError::ContainerNotFound(s) if s == "#nope"));
    }

    #[test]
    fn attribute_scan_keeps_document_order() {
        let mut doc = Document::new();
        doc.push(Element::new("a").with_attribute("data-chart", "{}"));
        doc.push(Element::new("b"));
        doc.push(Element::new("c").with_attribute("data-chart", "{}"));
        let ids: Vec<String> = doc.with_attribute("data-chart").iter().map(|e| e.borrow().id.clone()).collect();
        assert_eq!(ids, ["a", "c"]);
    }
}

//! Decoded PLY document

use super::Element;

/// All elements of a PLY file, in header order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    elements: Vec<Element>,
    /// `comment` lines from the header, without the keyword
    pub comments: Vec<String>,
    /// `obj_info` lines from the header, without the keyword
    pub obj_info: Vec<String>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element, replacing (in place) any element with the same name
    pub fn insert(&mut self, element: Element) -> Option<Element> {
        match self
            .elements
            .iter_mut()
            .find(|e| e.name() == element.name())
        {
            Some(slot) => Some(std::mem::replace(slot, element)),
            None => {
                self.elements.push(element);
                None
            }
        }
    }

    /// Builder form of [`Document::insert`]
    pub fn with(mut self, element: Element) -> Self {
        self.insert(element);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.name() == name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Element> {
        let i = self.elements.iter().position(|e| e.name() == name)?;
        Some(self.elements.remove(i))
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.elements.iter().map(|e| e.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl FromIterator<Element> for Document {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        let mut doc = Document::new();
        for element in iter {
            doc.insert(element);
        }
        doc
    }
}

//! Elements: named row groups of typed columns

use super::Buffer;
use crate::error::{PlyError, Result};

/// A named column of an element
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub data: Buffer,
    /// Declared as `property list` in the header
    pub list: bool,
}

impl Property {
    /// Whether the property is written as a list
    ///
    /// Any buffer wider than one value is a list, flagged or not.
    pub fn is_list(&self) -> bool {
        self.list || self.data.width > 1
    }
}

/// Named row group with columns in declaration order
///
/// Column order is what the writer emits, both in the header and in the
/// interleaved payload.
#[derive(Debug, Clone)]
pub struct Element {
    name: String,
    /// Row count declared independently of any column
    rows: Option<usize>,
    properties: Vec<Property>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: None,
            properties: Vec::new(),
        }
    }

    /// Element with a fixed row count, which every inserted column must match
    ///
    /// The count is kept even while the element has no columns.
    pub fn with_rows(name: impl Into<String>, rows: usize) -> Self {
        Self {
            name: name.into(),
            rows: Some(rows),
            properties: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Row count shared by every column
    ///
    /// An element without columns reports its declared count, or 0.
    pub fn rows(&self) -> usize {
        self.properties
            .first()
            .map(|p| p.data.rows)
            .or(self.rows)
            .unwrap_or(0)
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Add a scalar column (or a list column if `data.width > 1`)
    ///
    /// Replaces an existing column of the same name in place and returns it.
    pub fn insert(&mut self, name: impl Into<String>, data: Buffer) -> Result<Option<Property>> {
        self.insert_property(Property {
            name: name.into(),
            data,
            list: false,
        })
    }

    /// Add a column declared as a list regardless of its width
    pub fn insert_list(
        &mut self,
        name: impl Into<String>,
        data: Buffer,
    ) -> Result<Option<Property>> {
        self.insert_property(Property {
            name: name.into(),
            data,
            list: true,
        })
    }

    pub fn insert_property(&mut self, property: Property) -> Result<Option<Property>> {
        let existing = self
            .properties
            .iter()
            .position(|p| p.name == property.name);

        let expected = self
            .properties
            .iter()
            .enumerate()
            .find(|(i, _)| Some(*i) != existing)
            .map(|(_, p)| p.data.rows)
            .or(self.rows);

        match expected {
            Some(rows) if rows != property.data.rows => {
                return Err(PlyError::RowCountMismatch {
                    element: self.name.clone(),
                    property: property.name,
                    expected: rows,
                    actual: property.data.rows,
                });
            }
            _ => {}
        }

        match existing {
            Some(i) => Ok(Some(std::mem::replace(&mut self.properties[i], property))),
            None => {
                self.properties.push(property);
                Ok(None)
            }
        }
    }

    /// Builder form of [`Element::insert`]
    pub fn with(mut self, name: impl Into<String>, data: Buffer) -> Result<Self> {
        self.insert(name, data)?;
        Ok(self)
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Buffer of the named column
    pub fn get(&self, name: &str) -> Option<&Buffer> {
        self.property(name).map(|p| &p.data)
    }

    pub fn remove(&mut self, name: &str) -> Option<Property> {
        let i = self.properties.iter().position(|p| p.name == name)?;
        Some(self.properties.remove(i))
    }

    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter()
    }

    /// Column names in order
    pub fn names(&self) -> Vec<&str> {
        self.properties.iter().map(|p| p.name.as_str()).collect()
    }

    /// Gather columns into one `[rows, k]` buffer
    ///
    /// A single name returns that column unchanged, list or not. Several
    /// names must all be scalar columns of one dtype. Returns `Ok(None)` if
    /// any name is missing.
    pub fn stack(&self, names: &[&str]) -> Result<Option<Buffer>> {
        let mut parts = Vec::with_capacity(names.len());
        for name in names {
            match self.property(name) {
                Some(p) => parts.push(p),
                None => return Ok(None),
            }
        }

        if let [single] = parts.as_slice() {
            return Ok(Some(single.data.clone()));
        }

        if let Some(list) = parts.iter().find(|p| p.is_list()) {
            return Err(PlyError::StackMismatch {
                element: self.name.clone(),
                message: format!("'{}' is a list property", list.name),
            });
        }

        let buffers: Vec<&Buffer> = parts.iter().map(|p| &p.data).collect();
        Buffer::hstack(&buffers)
            .map(Some)
            .ok_or_else(|| PlyError::StackMismatch {
                element: self.name.clone(),
                message: format!(
                    "columns {:?} have dtypes {:?}",
                    names,
                    buffers.iter().map(|b| b.dtype).collect::<Vec<_>>()
                ),
            })
    }
}

/// Compares name, row count and columns
impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.rows() == other.rows()
            && self.properties == other.properties
    }
}

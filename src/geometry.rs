//! Typed geometry views over PLY documents
//!
//! A [`Field`] binds a named attribute (points, normals, faces, ...) to one
//! or more properties of an element. Loading stacks those columns into a
//! single `[N, k]` buffer; saving splits it back into `k` columns.

use crate::error::{PlyError, Result};
use crate::parser;
use crate::types::{Buffer, Document, Element};
use crate::writer;
use std::path::Path;

/// Mapping of a geometry attribute onto PLY properties
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub element: &'static str,
    pub properties: &'static [&'static str],
    /// Stored as a single list property
    pub list: bool,
}

pub const POINTS: Field = Field {
    name: "points",
    element: "vertex",
    properties: &["x", "y", "z"],
    list: false,
};

pub const NORMALS: Field = Field {
    name: "normals",
    element: "vertex",
    properties: &["nx", "ny", "nz"],
    list: false,
};

pub const COLORS: Field = Field {
    name: "colors",
    element: "vertex",
    properties: &["red", "green", "blue"],
    list: false,
};

pub const UV: Field = Field {
    name: "uv",
    element: "vertex",
    properties: &["s", "t"],
    list: false,
};

pub const FACES: Field = Field {
    name: "faces",
    element: "face",
    properties: &["vertex_index"],
    list: true,
};

impl Field {
    /// Stack this field's columns out of `doc`, `None` if any is absent
    pub fn gather(&self, doc: &Document) -> Result<Option<Buffer>> {
        match doc.get(self.element) {
            Some(element) => element.stack(self.properties),
            None => Ok(None),
        }
    }

    fn require(&self, doc: &Document) -> Result<Buffer> {
        self.gather(doc)?.ok_or(PlyError::MissingField {
            field: self.name,
            element: self.element,
            properties: self.properties,
        })
    }

    /// Split `data` into this field's columns of `element`
    pub fn scatter(&self, element: &mut Element, data: &Buffer) -> Result<()> {
        if self.list {
            element.insert_list(self.properties[0], data.clone())?;
            return Ok(());
        }
        if let [single] = self.properties {
            element.insert(*single, data.clone())?;
            return Ok(());
        }
        if data.width != self.properties.len() {
            return Err(PlyError::StackMismatch {
                element: element.name().to_string(),
                message: format!(
                    "field '{}' has {} columns, expected {}",
                    self.name,
                    data.width,
                    self.properties.len()
                ),
            });
        }
        for (j, name) in self.properties.iter().enumerate() {
            if let Some(column) = data.column(j) {
                element.insert(*name, column)?;
            }
        }
        Ok(())
    }
}

/// Vertices with optional per-vertex attributes
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    /// `[N, 3]` x, y, z
    pub points: Buffer,
    pub normals: Option<Buffer>,
    pub colors: Option<Buffer>,
    pub uv: Option<Buffer>,
}

impl PointCloud {
    pub fn new(points: Buffer) -> Self {
        Self {
            points,
            normals: None,
            colors: None,
            uv: None,
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.points.rows
    }

    pub fn from_document(doc: &Document) -> Result<Self> {
        Ok(Self {
            points: POINTS.require(doc)?,
            normals: NORMALS.gather(doc)?,
            colors: COLORS.gather(doc)?,
            uv: UV.gather(doc)?,
        })
    }

    fn vertex_element(&self) -> Result<Element> {
        let mut vertex = Element::new(POINTS.element);
        POINTS.scatter(&mut vertex, &self.points)?;
        for (field, data) in [
            (NORMALS, &self.normals),
            (COLORS, &self.colors),
            (UV, &self.uv),
        ] {
            if let Some(data) = data {
                field.scatter(&mut vertex, data)?;
            }
        }
        Ok(vertex)
    }

    pub fn to_document(&self) -> Result<Document> {
        Ok(Document::new().with(self.vertex_element()?))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_document(&parser::read(path)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        writer::write_file(path, &self.to_document()?)
    }
}

/// Point cloud plus fixed-size polygon faces
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub cloud: PointCloud,
    /// `[F, k]` vertex indices per face
    pub faces: Buffer,
}

impl Mesh {
    pub fn new(cloud: PointCloud, faces: Buffer) -> Self {
        Self { cloud, faces }
    }

    pub fn num_faces(&self) -> usize {
        self.faces.rows
    }

    pub fn from_document(doc: &Document) -> Result<Self> {
        Ok(Self {
            cloud: PointCloud::from_document(doc)?,
            faces: FACES.require(doc)?,
        })
    }

    pub fn to_document(&self) -> Result<Document> {
        let mut face = Element::new(FACES.element);
        FACES.scatter(&mut face, &self.faces)?;
        Ok(self.cloud.to_document()?.with(face))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_document(&parser::read(path)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        writer::write_file(path, &self.to_document()?)
    }
}

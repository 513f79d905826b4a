//! Integration tests for point cloud and mesh views

use plyarray::geometry::{Mesh, PointCloud};
use plyarray::{Buffer, DType, Document, Element, PlyError, writer};

fn square() -> PointCloud {
    let mut cloud = PointCloud::new(Buffer::from_values(
        4,
        3,
        &[
            0.0f32, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            1.0, 1.0, 0.0, //
            0.0, 1.0, 0.0,
        ],
    ));
    cloud.normals = Some(Buffer::from_values(4, 3, &[0.0f32, 0.0, 1.0].repeat(4)[..]));
    cloud.colors = Some(Buffer::from_values(
        4,
        3,
        &[255u8, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255],
    ));
    cloud
}

#[test]
fn point_cloud_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cloud.ply");
    let cloud = square();

    cloud.save(&path).unwrap();
    let back = PointCloud::load(&path).unwrap();

    assert_eq!(back, cloud);
    assert_eq!(back.num_vertices(), 4);
    assert!(back.uv.is_none());
}

#[test]
fn vertex_columns_use_conventional_names() {
    let doc = square().to_document().unwrap();
    let vertex = doc.get("vertex").unwrap();
    assert_eq!(
        vertex.names(),
        vec!["x", "y", "z", "nx", "ny", "nz", "red", "green", "blue"]
    );
    assert_eq!(vertex.get("red").unwrap().dtype, DType::U8);
}

#[test]
fn mesh_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mesh.ply");
    let mesh = Mesh::new(
        square(),
        Buffer::from_values(2, 3, &[0i32, 1, 2, 0, 2, 3]),
    );

    mesh.save(&path).unwrap();
    let back = Mesh::load(&path).unwrap();

    assert_eq!(back, mesh);
    assert_eq!(back.num_faces(), 2);
}

#[test]
fn mesh_requires_faces() {
    let doc = square().to_document().unwrap();
    assert!(matches!(
        Mesh::from_document(&doc),
        Err(PlyError::MissingField { field: "faces", .. })
    ));
}

#[test]
fn point_cloud_requires_all_coordinates() {
    let el = Element::new("vertex")
        .with("x", Buffer::column_of(&[0.0f32]))
        .unwrap()
        .with("y", Buffer::column_of(&[0.0f32]))
        .unwrap();
    let bytes = writer::to_bytes(&Document::new().with(el)).unwrap();
    let doc = plyarray::parse(&bytes).unwrap();

    match PointCloud::from_document(&doc) {
        Err(PlyError::MissingField {
            field,
            element,
            properties,
        }) => {
            assert_eq!(field, "points");
            assert_eq!(element, "vertex");
            assert_eq!(properties, &["x", "y", "z"]);
        }
        other => panic!("expected MissingField, got {other:?}"),
    }
}

#[test]
fn mixed_coordinate_types_rejected() {
    let el = Element::new("vertex")
        .with("x", Buffer::column_of(&[0.0f32]))
        .unwrap()
        .with("y", Buffer::column_of(&[0.0f64]))
        .unwrap()
        .with("z", Buffer::column_of(&[0.0f32]))
        .unwrap();
    assert!(matches!(
        PointCloud::from_document(&Document::new().with(el)),
        Err(PlyError::StackMismatch { .. })
    ));
}

#[test]
fn extra_properties_ignored() {
    let mut doc = square().to_document().unwrap();
    doc.get_mut("vertex")
        .unwrap()
        .insert("confidence", Buffer::column_of(&[0.9f32, 0.8, 0.7, 0.6]))
        .unwrap();

    let cloud = PointCloud::from_document(&doc).unwrap();
    assert_eq!(cloud, square());
}

//! Integration tests for ndarray support
//!
//! These tests move ndarray arrays through both the generic and the dense
//! codecs.

#![cfg(feature = "ndarray")]

use ndarray::{Array1, Array2, Array3, array};
use plyarray::{
    Buffer, DType, Document, Element, NdarrayError, PlyError, PreconditionError, dense, parse,
    writer,
};

// =============================================================================
// Generic codec
// =============================================================================

#[test]
fn columns_from_ndarray_roundtrip() {
    let xs = array![0.0f32, 1.0, 2.0];
    let ids = array![10u32, 20, 30];
    let faces = array![[0i32, 1, 2], [2, 1, 0]];

    let vertex = Element::new("vertex")
        .with("x", Buffer::from_array1(&xs))
        .unwrap()
        .with("id", Buffer::from_array1(&ids))
        .unwrap();
    let face = Element::new("face")
        .with("vertex_index", Buffer::from_ndarray(&faces))
        .unwrap();
    let doc = Document::new().with(vertex).with(face);

    let back = parse(&writer::to_bytes(&doc).unwrap()).unwrap();

    let vertex = back.get("vertex").unwrap();
    let x: Array1<f32> = vertex.get("x").unwrap().to_array1().unwrap();
    let id: Array1<u32> = vertex.get("id").unwrap().to_array1().unwrap();
    assert_eq!(x, xs);
    assert_eq!(id, ids);

    let idx: Array2<i32> = back
        .get("face")
        .unwrap()
        .get("vertex_index")
        .unwrap()
        .to_ndarray()
        .unwrap();
    assert_eq!(idx, faces);
}

#[test]
fn wrong_scalar_type_reported() {
    let buf = Buffer::from_array1(&array![1u8, 2]);
    assert_eq!(
        buf.to_array1::<i8>(),
        Err(NdarrayError::DTypeMismatch {
            expected: DType::I8,
            actual: DType::U8,
        })
    );
}

// =============================================================================
// Dense codec
// =============================================================================

#[test]
fn dense_write_array2() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("splats.ply");
    let arr = Array2::from_shape_fn((5, 4), |(i, j)| (i * 4 + j) as f32 * 0.5);

    dense::write(&path, &arr, &["x", "y", "z", "opacity"]).unwrap();

    let (data, names) = dense::read(&path).unwrap();
    assert_eq!(names, vec!["x", "y", "z", "opacity"]);
    let back: Array2<f32> = data.to_ndarray().unwrap();
    assert_eq!(back, arr);
}

#[test]
fn dense_write_transposed_view() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("transposed.ply");
    let arr = array![[1.0f32, 2.0, 3.0], [4.0, 5.0, 6.0]];

    dense::write(&path, &arr.t(), &["a", "b"]).unwrap();

    let (data, _) = dense::read_unchecked(&path).unwrap();
    assert_eq!((data.rows, data.width), (3, 2));
    assert_eq!(
        data.to_vec::<f32>().unwrap(),
        vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]
    );
}

#[test]
fn dense_rejects_three_dimensional() {
    let dir = tempfile::tempdir().unwrap();
    let arr = Array3::<f32>::zeros((2, 2, 2));
    assert!(matches!(
        dense::write(dir.path().join("cube.ply"), &arr, &["a", "b"]),
        Err(PlyError::Precondition(PreconditionError::NotTwoDimensional { ndim: 3 }))
    ));
}

#[test]
fn dense_rejects_double() {
    let dir = tempfile::tempdir().unwrap();
    let arr = Array2::<f64>::zeros((2, 1));
    assert!(matches!(
        dense::write(dir.path().join("double.ply"), &arr, &["a"]),
        Err(PlyError::Precondition(PreconditionError::NotFloat32 { dtype: DType::F64 }))
    ));
}

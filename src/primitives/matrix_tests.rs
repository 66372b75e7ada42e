use super::*;

fn two_by_three() -> Matrix<f32> {
    Matrix::from_vec(2, 3, vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements")
}

#[test]
fn test_from_vec() {
    let m = two_by_three();
    assert_eq!(m.shape(), (2, 3));
    assert!((m.get(0, 0) - 1.0).abs() < 1e-6);
    assert!((m.get(1, 2) - 6.0).abs() < 1e-6);
}

#[test]
fn test_from_vec_error_mentions_shape() {
    let err = Matrix::from_vec(2, 3, vec![1.0_f32, 2.0, 3.0]).unwrap_err();
    assert!(err.to_string().contains("2x3"));
}

#[test]
fn test_eye() {
    let m = Matrix::<f32>::eye(3);
    assert!((m.get(1, 1) - 1.0).abs() < 1e-6);
    assert!((m.get(0, 1) - 0.0).abs() < 1e-6);
}

#[test]
fn test_transpose() {
    let t = two_by_three().transpose();
    assert_eq!(t.shape(), (3, 2));
    assert!((t.get(0, 1) - 4.0).abs() < 1e-6);
    assert!((t.get(2, 1) - 6.0).abs() < 1e-6);
}

#[test]
fn test_row_and_column() {
    let m = two_by_three();
    assert_eq!(m.row(1).as_slice(), &[4.0, 5.0, 6.0]);
    assert_eq!(m.column(1).as_slice(), &[2.0, 5.0]);
}

#[test]
fn test_select_rows() {
    let m = two_by_three();
    let s = m.select_rows(&[1, 1, 0]);
    assert_eq!(s.shape(), (3, 3));
    assert_eq!(s.row_slice(0), &[4.0, 5.0, 6.0]);
    assert_eq!(s.row_slice(2), &[1.0, 2.0, 3.0]);
}

#[test]
fn test_matmul() {
    let a = two_by_three();
    let b = a.transpose();
    let c = a.matmul(&b).expect("2x3 * 3x2");
    assert_eq!(c.shape(), (2, 2));
    assert!((c.get(0, 0) - 14.0).abs() < 1e-6);
    assert!((c.get(0, 1) - 32.0).abs() < 1e-6);
    assert!((c.get(1, 1) - 77.0).abs() < 1e-6);
}

#[test]
fn test_matmul_dimension_error() {
    let a = two_by_three();
    assert!(a.matmul(&a).is_err());
}

#[test]
fn test_matvec() {
    let m = two_by_three();
    let v = Vector::from_slice(&[1.0_f32, 0.0, -1.0]);
    let r = m.matvec(&v).expect("3 columns, 3 values");
    assert_eq!(r.as_slice(), &[-2.0, -2.0]);
    assert!(m.matvec(&Vector::from_slice(&[1.0_f32])).is_err());
}

#[test]
fn test_cholesky_solve() {
    // [[4, 2], [2, 3]] x = [2, 1] -> x = [0.5, 0]
    let a = Matrix::from_vec(2, 2, vec![4.0_f32, 2.0, 2.0, 3.0]).expect("2x2");
    let b = Vector::from_slice(&[2.0_f32, 1.0]);
    let x = a.cholesky_solve(&b).expect("positive definite");
    assert!((x[0] - 0.5).abs() < 1e-5);
    assert!(x[1].abs() < 1e-5);
}

#[test]
fn test_cholesky_not_positive_definite() {
    let a = Matrix::from_vec(2, 2, vec![1.0_f32, 2.0, 2.0, 1.0]).expect("2x2");
    let b = Vector::from_slice(&[1.0_f32, 1.0]);
    let err = a.cholesky_solve(&b).unwrap_err();
    assert!(matches!(err, crate::error::ProgressionError::SingularMatrix { .. }));
}

#[test]
fn test_cholesky_non_square() {
    let b = Vector::from_slice(&[1.0_f32, 1.0]);
    assert!(two_by_three().cholesky_solve(&b).is_err());
}

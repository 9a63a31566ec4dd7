//! Frame-tagged spatial rotations, translations and rigid transforms.
//!
//! A transform represents the pose of one named coordinate frame expressed in
//! another, in the block form `[R t]` (no homogeneous bottom row, so chaining
//! stays at plain matrix-times-vector cost). Points are transformed with
//! `R·p + t`; a sequence of transforms along a kinematic chain is folded into
//! a single net transform with [compose]. The preferred pattern is to compose
//! the chain once and then transform many points, rather than building
//! successive full-matrix products per point.
//!
//! Rotations and translations carry their dimension (2 or 3) as data, checked
//! once at construction. The `new_2d`/`new_3d` constructors are thin wrappers
//! that pin the exact size and delegate to the general constructor.

use crate::kinematics_error::KinematicsError;
use nalgebra::{DMatrix, DVector};

/// Spatial dimensions supported by this crate (planar and full 3D arms).
pub const SUPPORTED_DIMS: [usize; 2] = [2, 3];

/// One of the three Cartesian axes. Used to describe joint motion axes and
/// to build axis-aligned rotation matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Coordinate index of this axis (X = 0, Y = 1, Z = 2).
    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl std::str::FromStr for Axis {
    type Err = KinematicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            other => Err(KinematicsError::InvalidEnum {
                kind: "axis",
                value: other.to_string(),
            }),
        }
    }
}

fn check_dims(n: usize) -> Result<(), KinematicsError> {
    if SUPPORTED_DIMS.contains(&n) {
        Ok(())
    } else {
        Err(KinematicsError::Shape {
            expected: "2 or 3 dimensions".to_string(),
            found: format!("{} dimensions", n),
        })
    }
}

/// An orthonormal rotation matrix mapping coordinates of `to_frame` into
/// `base_frame`. The matrix itself is private; it is replaced only through
/// [SpatialRotation::set_matrix], which re-validates the shape.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialRotation {
    base_frame: String,
    to_frame: String,
    matrix: DMatrix<f64>,
}

impl SpatialRotation {
    /// Identity rotation of the given dimension between two frames.
    pub fn identity(base_frame: &str, to_frame: &str, n: usize) -> Result<Self, KinematicsError> {
        check_dims(n)?;
        Ok(SpatialRotation {
            base_frame: base_frame.to_string(),
            to_frame: to_frame.to_string(),
            matrix: DMatrix::identity(n, n),
        })
    }

    /// Rotation from an explicit matrix. Fails if the matrix is not square
    /// or its size is not a supported dimension.
    pub fn new(
        base_frame: &str,
        to_frame: &str,
        matrix: DMatrix<f64>,
    ) -> Result<Self, KinematicsError> {
        if matrix.nrows() != matrix.ncols() {
            return Err(KinematicsError::Shape {
                expected: "a square matrix".to_string(),
                found: format!("{}x{}", matrix.nrows(), matrix.ncols()),
            });
        }
        check_dims(matrix.nrows())?;
        Ok(SpatialRotation {
            base_frame: base_frame.to_string(),
            to_frame: to_frame.to_string(),
            matrix,
        })
    }

    /// Planar rotation, pinned to 2x2.
    pub fn new_2d(
        base_frame: &str,
        to_frame: &str,
        matrix: DMatrix<f64>,
    ) -> Result<Self, KinematicsError> {
        require_shape(&matrix, 2, 2)?;
        Self::new(base_frame, to_frame, matrix)
    }

    /// Spatial rotation, pinned to 3x3.
    pub fn new_3d(
        base_frame: &str,
        to_frame: &str,
        matrix: DMatrix<f64>,
    ) -> Result<Self, KinematicsError> {
        require_shape(&matrix, 3, 3)?;
        Self::new(base_frame, to_frame, matrix)
    }

    /// Rotation by `angle` radians about the given axis. For `n == 2` the
    /// rotation is in the plane and the axis argument is ignored (a planar
    /// arm can only rotate about the plane normal).
    pub fn about_axis(
        base_frame: &str,
        to_frame: &str,
        axis: Axis,
        angle: f64,
        n: usize,
    ) -> Result<Self, KinematicsError> {
        check_dims(n)?;
        let (s, c) = angle.sin_cos();
        let matrix = if n == 2 {
            DMatrix::from_row_slice(2, 2, &[c, -s, s, c])
        } else {
            match axis {
                Axis::X => DMatrix::from_row_slice(3, 3, &[
                    1.0, 0.0, 0.0,
                    0.0, c, -s,
                    0.0, s, c,
                ]),
                Axis::Y => DMatrix::from_row_slice(3, 3, &[
                    c, 0.0, s,
                    0.0, 1.0, 0.0,
                    -s, 0.0, c,
                ]),
                Axis::Z => DMatrix::from_row_slice(3, 3, &[
                    c, -s, 0.0,
                    s, c, 0.0,
                    0.0, 0.0, 1.0,
                ]),
            }
        };
        Ok(SpatialRotation {
            base_frame: base_frame.to_string(),
            to_frame: to_frame.to_string(),
            matrix,
        })
    }

    pub fn base_frame(&self) -> &str {
        &self.base_frame
    }

    pub fn to_frame(&self) -> &str {
        &self.to_frame
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Number of rows (== columns) of the rotation.
    pub fn dims(&self) -> usize {
        self.matrix.nrows()
    }

    /// Replace the matrix, re-validating that the shape is unchanged.
    pub fn set_matrix(&mut self, matrix: DMatrix<f64>) -> Result<(), KinematicsError> {
        require_shape(&matrix, self.matrix.nrows(), self.matrix.ncols())?;
        self.matrix = matrix;
        Ok(())
    }

    /// The reverse rotation: frames swapped, matrix transposed. Exact for
    /// orthonormal matrices, O(n²) rather than a general inversion.
    pub fn invert(&self) -> SpatialRotation {
        SpatialRotation {
            base_frame: self.to_frame.clone(),
            to_frame: self.base_frame.clone(),
            matrix: self.matrix.transpose(),
        }
    }

    /// Raw matrix product with another rotation of the same dimension.
    /// Frame compatibility is the caller's responsibility here;
    /// [RigidTransform] composition checks it.
    pub fn multiply(&self, other: &SpatialRotation) -> Result<DMatrix<f64>, KinematicsError> {
        require_shape(other.matrix(), self.dims(), self.dims())?;
        Ok(&self.matrix * &other.matrix)
    }

    /// Rotate a bare column vector of matching length.
    pub fn apply(&self, v: &DVector<f64>) -> Result<DVector<f64>, KinematicsError> {
        require_len(v, self.dims())?;
        Ok(&self.matrix * v)
    }
}

/// An offset vector expressed in `base_frame`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialTranslation {
    base_frame: String,
    vector: DVector<f64>,
}

impl SpatialTranslation {
    /// Zero translation of the given dimension.
    pub fn zeros(base_frame: &str, n: usize) -> Result<Self, KinematicsError> {
        check_dims(n)?;
        Ok(SpatialTranslation {
            base_frame: base_frame.to_string(),
            vector: DVector::zeros(n),
        })
    }

    /// Translation from an explicit vector of length 2 or 3.
    pub fn new(base_frame: &str, vector: DVector<f64>) -> Result<Self, KinematicsError> {
        check_dims(vector.len())?;
        Ok(SpatialTranslation {
            base_frame: base_frame.to_string(),
            vector,
        })
    }

    /// Planar translation, pinned to length 2.
    pub fn new_2d(base_frame: &str, vector: DVector<f64>) -> Result<Self, KinematicsError> {
        require_len(&vector, 2)?;
        Self::new(base_frame, vector)
    }

    /// Spatial translation, pinned to length 3.
    pub fn new_3d(base_frame: &str, vector: DVector<f64>) -> Result<Self, KinematicsError> {
        require_len(&vector, 3)?;
        Self::new(base_frame, vector)
    }

    pub fn base_frame(&self) -> &str {
        &self.base_frame
    }

    pub fn vector(&self) -> &DVector<f64> {
        &self.vector
    }

    pub fn dims(&self) -> usize {
        self.vector.len()
    }

    /// Replace the vector, re-validating the length.
    pub fn set_vector(&mut self, vector: DVector<f64>) -> Result<(), KinematicsError> {
        require_len(&vector, self.vector.len())?;
        self.vector = vector;
        Ok(())
    }

    /// Elementwise sum with another translation of the same length.
    pub fn add(&self, other: &SpatialTranslation) -> Result<DVector<f64>, KinematicsError> {
        require_len(other.vector(), self.vector.len())?;
        Ok(&self.vector + &other.vector)
    }

    /// Elementwise sum with a bare vector of matching length.
    pub fn add_vector(&self, other: &DVector<f64>) -> Result<DVector<f64>, KinematicsError> {
        require_len(other, self.vector.len())?;
        Ok(&self.vector + other)
    }
}

/// Pose of `to_frame` expressed in `base_frame`: the rotation/translation
/// pair `[R t]`. Transforms points from to-frame coordinates into base-frame
/// coordinates with `R·p + t`.
#[derive(Debug, Clone, PartialEq)]
pub struct RigidTransform {
    rotation: SpatialRotation,
    translation: SpatialTranslation,
}

impl RigidTransform {
    /// Pair a rotation and a translation into a pose. Both must be expressed
    /// in the same base frame and have matching dimensions; on violation no
    /// partial transform is returned.
    pub fn new(
        rotation: SpatialRotation,
        translation: SpatialTranslation,
    ) -> Result<Self, KinematicsError> {
        if rotation.base_frame() != translation.base_frame() {
            return Err(KinematicsError::FrameMismatch {
                expected: rotation.base_frame().to_string(),
                found: translation.base_frame().to_string(),
            });
        }
        if rotation.dims() != translation.dims() {
            return Err(KinematicsError::Shape {
                expected: format!("a translation of length {}", rotation.dims()),
                found: format!("length {}", translation.dims()),
            });
        }
        Ok(RigidTransform {
            rotation,
            translation,
        })
    }

    /// Identity pose between two frames.
    pub fn identity(base_frame: &str, to_frame: &str, n: usize) -> Result<Self, KinematicsError> {
        Self::new(
            SpatialRotation::identity(base_frame, to_frame, n)?,
            SpatialTranslation::zeros(base_frame, n)?,
        )
    }

    pub fn base_frame(&self) -> &str {
        self.rotation.base_frame()
    }

    pub fn to_frame(&self) -> &str {
        self.rotation.to_frame()
    }

    pub fn rotation(&self) -> &SpatialRotation {
        &self.rotation
    }

    pub fn translation(&self) -> &SpatialTranslation {
        &self.translation
    }

    pub fn dims(&self) -> usize {
        self.rotation.dims()
    }

    /// Transform a point from to-frame coordinates into base-frame
    /// coordinates: `R·p + t`.
    pub fn apply(&self, point: &DVector<f64>) -> Result<DVector<f64>, KinematicsError> {
        require_len(point, self.dims())?;
        Ok(self.rotation.matrix() * point + self.translation.vector())
    }

    /// The reverse pose: maps base-frame coordinates back into to-frame
    /// coordinates (`R' = Rᵀ`, `t' = -Rᵀ·t`).
    pub fn invert(&self) -> RigidTransform {
        let r_inv = self.rotation.invert();
        let t_inv = -(r_inv.matrix() * self.translation.vector());
        RigidTransform {
            translation: SpatialTranslation {
                base_frame: r_inv.base_frame().to_string(),
                vector: t_inv,
            },
            rotation: r_inv,
        }
    }
}

fn require_shape(m: &DMatrix<f64>, rows: usize, cols: usize) -> Result<(), KinematicsError> {
    if m.nrows() == rows && m.ncols() == cols {
        Ok(())
    } else {
        Err(KinematicsError::Shape {
            expected: format!("{}x{}", rows, cols),
            found: format!("{}x{}", m.nrows(), m.ncols()),
        })
    }
}

fn require_len(v: &DVector<f64>, len: usize) -> Result<(), KinematicsError> {
    if v.len() == len {
        Ok(())
    } else {
        Err(KinematicsError::Shape {
            expected: format!("a vector of length {}", len),
            found: format!("length {}", v.len()),
        })
    }
}

/// Fold an ordered sequence of transforms `T0 (base→f1), T1 (f1→f2), …,
/// Tn (fn→end)` into the single net transform `base→end`.
///
/// The accumulation runs left to right over the block form: for each next
/// transform, `t ← t + R·tᵢ` and then `R ← R·Rᵢ`, which is the block-matrix
/// product without ever materializing homogeneous matrices. At every step
/// the left operand's `to_frame` must equal the right operand's `base_frame`
/// and the dimensions must agree.
pub fn compose(transforms: &[RigidTransform]) -> Result<RigidTransform, KinematicsError> {
    let (first, rest) = transforms
        .split_first()
        .ok_or(KinematicsError::EmptyComposition)?;

    let mut rotation = first.rotation.matrix().clone();
    let mut translation = first.translation.vector().clone();
    let mut to_frame = first.to_frame().to_string();

    for next in rest {
        if next.base_frame() != to_frame {
            return Err(KinematicsError::FrameMismatch {
                expected: to_frame,
                found: next.base_frame().to_string(),
            });
        }
        if next.dims() != rotation.nrows() {
            return Err(KinematicsError::Shape {
                expected: format!("a {}-dimensional transform", rotation.nrows()),
                found: format!("{} dimensions", next.dims()),
            });
        }
        // The still-accumulated rotation carries the next offset into the
        // base frame before the rotation itself is advanced.
        translation += &rotation * next.translation.vector();
        rotation = rotation * next.rotation.matrix();
        to_frame = next.to_frame().to_string();
    }

    let base_frame = first.base_frame().to_string();
    Ok(RigidTransform {
        rotation: SpatialRotation {
            base_frame: base_frame.clone(),
            to_frame,
            matrix: rotation,
        },
        translation: SpatialTranslation {
            base_frame,
            vector: translation,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const TOLERANCE: f64 = 1e-9;

    fn rot_z(base: &str, to: &str, angle: f64) -> SpatialRotation {
        SpatialRotation::about_axis(base, to, Axis::Z, angle, 3)
            .expect("3 is a supported dimension")
    }

    fn close(a: &DVector<f64>, b: &DVector<f64>) -> bool {
        (a - b).norm() < TOLERANCE
    }

    #[test]
    fn test_identity_default() {
        let r = SpatialRotation::identity("base", "tool", 3).unwrap();
        assert_eq!(r.matrix(), &DMatrix::identity(3, 3));
        let t = SpatialTranslation::zeros("base", 2).unwrap();
        assert_eq!(t.vector(), &DVector::zeros(2));
    }

    #[test]
    fn test_rejects_non_square() {
        let result = SpatialRotation::new("base", "tool", DMatrix::zeros(3, 2));
        assert!(matches!(result, Err(KinematicsError::Shape { .. })));
    }

    #[test]
    fn test_rejects_unsupported_dimension() {
        let result = SpatialRotation::new("base", "tool", DMatrix::identity(4, 4));
        assert!(matches!(result, Err(KinematicsError::Shape { .. })));
    }

    #[test]
    fn test_pinned_constructors() {
        let result = SpatialRotation::new_3d("base", "tool", DMatrix::identity(2, 2));
        assert!(matches!(result, Err(KinematicsError::Shape { .. })));
        assert!(SpatialRotation::new_2d("base", "tool", DMatrix::identity(2, 2)).is_ok());

        let result = SpatialTranslation::new_2d("base", DVector::zeros(3));
        assert!(matches!(result, Err(KinematicsError::Shape { .. })));
        assert!(SpatialTranslation::new_3d("base", DVector::zeros(3)).is_ok());
    }

    #[test]
    fn test_set_matrix_revalidates() {
        let mut r = SpatialRotation::identity("base", "tool", 3).unwrap();
        let result = r.set_matrix(DMatrix::identity(2, 2));
        assert!(matches!(result, Err(KinematicsError::Shape { .. })));
        assert!(r.set_matrix(DMatrix::identity(3, 3)).is_ok());
    }

    #[test]
    fn test_invert_is_transpose() {
        let r = rot_z("base", "tool", 0.7);
        let inv = r.invert();
        assert_eq!(inv.base_frame(), "tool");
        assert_eq!(inv.to_frame(), "base");
        assert_eq!(inv.matrix(), &r.matrix().transpose());

        let product = r.multiply(&inv).unwrap();
        assert!((product - DMatrix::identity(3, 3)).norm() < TOLERANCE);
    }

    #[test]
    fn test_translation_add() {
        let a = SpatialTranslation::new("base", DVector::from_vec(vec![1.0, 2.0])).unwrap();
        let b = SpatialTranslation::new("base", DVector::from_vec(vec![3.0, 4.0])).unwrap();
        assert_eq!(a.add(&b).unwrap(), DVector::from_vec(vec![4.0, 6.0]));
        assert_eq!(
            a.add_vector(&DVector::from_vec(vec![1.0, 1.0])).unwrap(),
            DVector::from_vec(vec![2.0, 3.0])
        );
    }

    #[test]
    fn test_mixed_dimension_operands_are_rejected() {
        let planar = SpatialRotation::identity("base", "tool", 2).unwrap();
        let spatial = SpatialRotation::identity("tool", "tip", 3).unwrap();
        assert!(matches!(
            planar.multiply(&spatial),
            Err(KinematicsError::Shape { .. })
        ));
        assert!(matches!(
            planar.apply(&DVector::zeros(3)),
            Err(KinematicsError::Shape { .. })
        ));

        let short = SpatialTranslation::zeros("base", 2).unwrap();
        let long = SpatialTranslation::zeros("base", 3).unwrap();
        assert!(matches!(short.add(&long), Err(KinematicsError::Shape { .. })));
        assert!(matches!(
            short.add_vector(&DVector::zeros(3)),
            Err(KinematicsError::Shape { .. })
        ));
    }

    #[test]
    fn test_transform_rejects_mismatched_base_frames() {
        let r = SpatialRotation::identity("base", "tool", 3).unwrap();
        let t = SpatialTranslation::zeros("other", 3).unwrap();
        let result = RigidTransform::new(r, t);
        assert!(matches!(result, Err(KinematicsError::FrameMismatch { .. })));
    }

    #[test]
    fn test_transform_rejects_mismatched_dimensions() {
        let r = SpatialRotation::identity("base", "tool", 3).unwrap();
        let t = SpatialTranslation::zeros("base", 2).unwrap();
        let result = RigidTransform::new(r, t);
        assert!(matches!(result, Err(KinematicsError::Shape { .. })));
    }

    #[test]
    fn test_apply_rotates_and_offsets() {
        // 90 degrees about Z plus a unit shift along X.
        let transform = RigidTransform::new(
            rot_z("base", "tool", FRAC_PI_2),
            SpatialTranslation::new("base", DVector::from_vec(vec![1.0, 0.0, 0.0])).unwrap(),
        )
        .unwrap();

        let p = DVector::from_vec(vec![1.0, 0.0, 0.0]);
        let transformed = transform.apply(&p).unwrap();
        assert!(close(&transformed, &DVector::from_vec(vec![1.0, 1.0, 0.0])));
    }

    #[test]
    fn test_apply_rejects_wrong_point_length() {
        let transform = RigidTransform::identity("base", "tool", 3).unwrap();
        let result = transform.apply(&DVector::zeros(2));
        assert!(matches!(result, Err(KinematicsError::Shape { .. })));
    }

    #[test]
    fn test_invert_round_trip() {
        let transform = RigidTransform::new(
            rot_z("base", "tool", 0.4),
            SpatialTranslation::new("base", DVector::from_vec(vec![0.1, -0.2, 0.3])).unwrap(),
        )
        .unwrap();
        let inverse = transform.invert();
        assert_eq!(inverse.base_frame(), "tool");
        assert_eq!(inverse.to_frame(), "base");

        let p = DVector::from_vec(vec![0.25, 1.5, -0.75]);
        let round_trip = transform.apply(&inverse.apply(&p).unwrap()).unwrap();
        assert!(close(&round_trip, &p));
    }

    fn planar_revolute(base: &str, to: &str, angle: f64, length: f64) -> RigidTransform {
        let rotation = SpatialRotation::about_axis(base, to, Axis::Z, angle, 2)
            .expect("2 is a supported dimension");
        let offset = rotation
            .apply(&DVector::from_vec(vec![length, 0.0]))
            .expect("length matches the rotation");
        RigidTransform::new(
            rotation,
            SpatialTranslation::new(base, offset).expect("length 2"),
        )
        .expect("frames and dimensions agree")
    }

    #[test]
    fn test_compose_straight_chain() {
        let chain = [
            planar_revolute("base", "elbow", 0.0, 250.0),
            planar_revolute("elbow", "tool", 0.0, 200.0),
        ];
        let net = compose(&chain).unwrap();
        assert_eq!(net.base_frame(), "base");
        assert_eq!(net.to_frame(), "tool");
        assert!(close(
            net.translation().vector(),
            &DVector::from_vec(vec![450.0, 0.0])
        ));
    }

    #[test]
    fn test_compose_is_associative() {
        let t0 = planar_revolute("base", "f1", 0.3, 100.0);
        let t1 = planar_revolute("f1", "f2", -0.8, 80.0);
        let t2 = planar_revolute("f2", "tool", 1.1, 60.0);

        let flat = compose(&[t0.clone(), t1.clone(), t2.clone()]).unwrap();
        let nested = compose(&[compose(&[t0, t1]).unwrap(), t2]).unwrap();

        assert!(
            (flat.rotation().matrix() - nested.rotation().matrix()).norm() < TOLERANCE
        );
        assert!(close(
            flat.translation().vector(),
            nested.translation().vector()
        ));
    }

    #[test]
    fn test_compose_rejects_frame_gap() {
        let chain = [
            planar_revolute("base", "elbow", 0.0, 250.0),
            planar_revolute("wrist", "tool", 0.0, 200.0),
        ];
        let result = compose(&chain);
        assert!(matches!(result, Err(KinematicsError::FrameMismatch { .. })));
    }

    #[test]
    fn test_compose_rejects_empty_sequence() {
        let result = compose(&[]);
        assert!(matches!(result, Err(KinematicsError::EmptyComposition)));
    }

    #[test]
    fn test_axis_parsing() {
        assert_eq!("z".parse::<Axis>().unwrap(), Axis::Z);
        assert_eq!("X".parse::<Axis>().unwrap(), Axis::X);
        assert_eq!(Axis::Y.index(), 1);
        let result = "w".parse::<Axis>();
        assert!(matches!(result, Err(KinematicsError::InvalidEnum { .. })));
    }
}

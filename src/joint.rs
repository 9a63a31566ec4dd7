//! A single degree of freedom of a serial arm: joint and actuator
//! categories, the per-robot geometric convention, and the local transform
//! a joint contributes to its chain.

use crate::kinematics_error::KinematicsError;
use crate::transforms::{Axis, RigidTransform, SpatialRotation, SpatialTranslation};
use nalgebra::DVector;

/// Revolute joint values wrap modulo one full turn, in degrees.
pub const FULL_TURN_DEG: f64 = 360.0;

/// Kind of motion a joint allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointType {
    /// Linear sliding along the motion axis. Values are clamped to the
    /// joint bounds.
    Prismatic,
    /// Rotation about the motion axis. Values are degrees, wrapped modulo
    /// a full turn.
    Revolute,
    /// Multi-axis rotation. Values are stored unbounded; only the rotation
    /// about the configured axis contributes to the local transform
    /// (full 3-DOF orientation is outside this model).
    Spherical,
}

impl std::str::FromStr for JointType {
    type Err = KinematicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "prismatic" => Ok(JointType::Prismatic),
            "revolute" => Ok(JointType::Revolute),
            "spherical" => Ok(JointType::Spherical),
            other => Err(KinematicsError::InvalidEnum {
                kind: "joint type",
                value: other.to_string(),
            }),
        }
    }
}

/// Kind of hardware driving a joint. Not interpreted by the kinematics;
/// carried for the benefit of hardware-facing consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorType {
    Servo,
    Stepper,
    Dc,
}

impl std::str::FromStr for ActuatorType {
    type Err = KinematicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "servo" => Ok(ActuatorType::Servo),
            "stepper" => Ok(ActuatorType::Stepper),
            "dc" => Ok(ActuatorType::Dc),
            other => Err(KinematicsError::InvalidEnum {
                kind: "actuator type",
                value: other.to_string(),
            }),
        }
    }
}

/// Per-robot geometric convention for one joint: the motion axis and the
/// fixed offset from this joint's frame to the next joint's frame, expressed
/// in this joint's rotated frame. The core does not guess a convention;
/// this is configuration supplied per robot.
#[derive(Debug, Clone, PartialEq)]
pub struct JointGeometry {
    pub axis: Axis,
    pub link: DVector<f64>,
}

impl JointGeometry {
    pub fn new(axis: Axis, link: DVector<f64>) -> Result<Self, KinematicsError> {
        // Piggyback on the translation validation for the 2-or-3 length rule.
        SpatialTranslation::new("", link.clone())?;
        Ok(JointGeometry { axis, link })
    }

    /// Planar link of the given length along the local X axis, rotating
    /// about the plane normal.
    pub fn planar(length: f64) -> Self {
        JointGeometry {
            axis: Axis::Z,
            link: DVector::from_vec(vec![length, 0.0]),
        }
    }
}

/// One degree of freedom with bounds, a current value and the local
/// transform it contributes to the chain. The type and actuator are fixed
/// at construction; only the value changes, through [Joint::set_value],
/// which keeps the cached transform current.
#[derive(Debug, Clone)]
pub struct Joint {
    name: String,
    joint_type: JointType,
    actuator: ActuatorType,
    min_value: f64,
    max_value: f64,
    value: f64,
    geometry: JointGeometry,
    base_frame: String,
    to_frame: String,
    transform: RigidTransform,
}

impl Joint {
    /// Create a joint at value zero (bounded by the joint's own policy).
    /// Bounds must satisfy `min_value <= max_value`. The local transform
    /// maps `to_frame` (the next joint's frame) into `base_frame` (this
    /// joint's parent frame).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &str,
        joint_type: JointType,
        actuator: ActuatorType,
        min_value: f64,
        max_value: f64,
        geometry: JointGeometry,
        base_frame: &str,
        to_frame: &str,
    ) -> Result<Self, KinematicsError> {
        if min_value > max_value {
            return Err(KinematicsError::InvalidParameter(format!(
                "joint bounds are inverted: [{}, {}]",
                min_value, max_value
            )));
        }
        if joint_type == JointType::Prismatic && geometry.axis.index() >= geometry.link.len() {
            return Err(KinematicsError::Shape {
                expected: format!("a motion axis within {} dimensions", geometry.link.len()),
                found: format!("axis {:?}", geometry.axis),
            });
        }
        let value = bounded(joint_type, min_value, max_value, 0.0);
        let transform = local_transform(joint_type, value, &geometry, base_frame, to_frame)?;
        Ok(Joint {
            name: name.to_string(),
            joint_type,
            actuator,
            min_value,
            max_value,
            value,
            geometry,
            base_frame: base_frame.to_string(),
            to_frame: to_frame.to_string(),
            transform,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn joint_type(&self) -> JointType {
        self.joint_type
    }

    pub fn actuator(&self) -> ActuatorType {
        self.actuator
    }

    pub fn min_value(&self) -> f64 {
        self.min_value
    }

    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    /// Current position (prismatic, same unit as the link offsets) or angle
    /// in degrees (revolute/spherical).
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn geometry(&self) -> &JointGeometry {
        &self.geometry
    }

    pub fn base_frame(&self) -> &str {
        &self.base_frame
    }

    pub fn to_frame(&self) -> &str {
        &self.to_frame
    }

    /// The local transform at the current value.
    pub fn transform(&self) -> &RigidTransform {
        &self.transform
    }

    /// Set the joint value, applying the bounding policy of the joint type:
    /// prismatic values clamp to `[min, max]`, revolute values wrap modulo
    /// 360 degrees, spherical values are stored unmodified. The cached local
    /// transform is recomputed before the value is committed.
    pub fn set_value(&mut self, value: f64) -> Result<(), KinematicsError> {
        let bounded = bounded(self.joint_type, self.min_value, self.max_value, value);
        let transform = local_transform(
            self.joint_type,
            bounded,
            &self.geometry,
            &self.base_frame,
            &self.to_frame,
        )?;
        self.value = bounded;
        self.transform = transform;
        Ok(())
    }

    /// Recompute the local transform as a pure function of the joint type,
    /// current value and fixed geometry.
    pub fn compute_transform(&self) -> Result<RigidTransform, KinematicsError> {
        local_transform(
            self.joint_type,
            self.value,
            &self.geometry,
            &self.base_frame,
            &self.to_frame,
        )
    }
}

fn bounded(joint_type: JointType, min_value: f64, max_value: f64, value: f64) -> f64 {
    match joint_type {
        JointType::Prismatic => value.clamp(min_value, max_value),
        JointType::Revolute => value.rem_euclid(FULL_TURN_DEG),
        JointType::Spherical => value,
    }
}

fn local_transform(
    joint_type: JointType,
    value: f64,
    geometry: &JointGeometry,
    base_frame: &str,
    to_frame: &str,
) -> Result<RigidTransform, KinematicsError> {
    let n = geometry.link.len();
    match joint_type {
        JointType::Revolute | JointType::Spherical => {
            let rotation = SpatialRotation::about_axis(
                base_frame,
                to_frame,
                geometry.axis,
                value.to_radians(),
                n,
            )?;
            // The link offset rides on the rotated frame.
            let offset = rotation.apply(&geometry.link)?;
            RigidTransform::new(rotation, SpatialTranslation::new(base_frame, offset)?)
        }
        JointType::Prismatic => {
            let rotation = SpatialRotation::identity(base_frame, to_frame, n)?;
            let mut offset = geometry.link.clone();
            offset[geometry.axis.index()] += value;
            RigidTransform::new(rotation, SpatialTranslation::new(base_frame, offset)?)
        }
    }
}

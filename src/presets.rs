//! Hard-coded chain builders for a few common arm layouts, and the
//! hardware board enumeration used to describe where a robot's controller
//! runs. Lengths are in millimeters; chains come back with every joint at
//! its zero value.

use crate::chain::KinematicChain;
use crate::joint::{ActuatorType, Joint, JointGeometry, JointType};
use crate::kinematics_error::KinematicsError;
use crate::transforms::Axis;
use nalgebra::DVector;

/// Board a robot's controller runs on. Master/slave means a PC paired with
/// a microcontroller doing the low-level hardware interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerBoard {
    MasterSlave,
    Beagleboard,
    RaspberryPi,
}

impl std::str::FromStr for ControllerBoard {
    type Err = KinematicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "master slave" => Ok(ControllerBoard::MasterSlave),
            "beagleboard" => Ok(ControllerBoard::Beagleboard),
            "raspberry pi" => Ok(ControllerBoard::RaspberryPi),
            other => Err(KinematicsError::InvalidEnum {
                kind: "controller board",
                value: other.to_string(),
            }),
        }
    }
}

/// Planar arm with two revolute joints: link lengths `l1` (shoulder to
/// elbow) and `l2` (elbow to tool). At zero the arm points straight along
/// the base X axis.
pub fn planar_two_link(l1: f64, l2: f64) -> Result<KinematicChain, KinematicsError> {
    let mut arm = KinematicChain::new("planar two link", "base", 2)?;
    arm.add_joint(Joint::new(
        "shoulder",
        JointType::Revolute,
        ActuatorType::Servo,
        0.0,
        360.0,
        JointGeometry::planar(l1),
        "base",
        "elbow",
    )?)?;
    arm.add_joint(Joint::new(
        "elbow",
        JointType::Revolute,
        ActuatorType::Servo,
        0.0,
        360.0,
        JointGeometry::planar(l2),
        "elbow",
        "tool",
    )?)?;
    Ok(arm)
}

/// 3-DOF articulated arm: base rotation about Z lifting a column of height
/// `c1`, then shoulder and elbow rotating about Y with links `l1` and `l2`
/// along X. At zero the arm is stretched horizontally along the base X axis.
pub fn articulated_arm(c1: f64, l1: f64, l2: f64) -> Result<KinematicChain, KinematicsError> {
    let mut arm = KinematicChain::new("articulated arm", "base", 3)?;
    arm.add_joint(Joint::new(
        "waist",
        JointType::Revolute,
        ActuatorType::Stepper,
        0.0,
        360.0,
        JointGeometry::new(Axis::Z, DVector::from_vec(vec![0.0, 0.0, c1]))?,
        "base",
        "shoulder",
    )?)?;
    arm.add_joint(Joint::new(
        "shoulder",
        JointType::Revolute,
        ActuatorType::Servo,
        0.0,
        360.0,
        JointGeometry::new(Axis::Y, DVector::from_vec(vec![l1, 0.0, 0.0]))?,
        "shoulder",
        "elbow",
    )?)?;
    arm.add_joint(Joint::new(
        "elbow",
        JointType::Revolute,
        ActuatorType::Servo,
        0.0,
        360.0,
        JointGeometry::new(Axis::Y, DVector::from_vec(vec![l2, 0.0, 0.0]))?,
        "elbow",
        "tool",
    )?)?;
    Ok(arm)
}

/// SCARA layout: two revolute joints about Z moving in the horizontal
/// plane, then a prismatic lift along Z with the given downward stroke.
pub fn scara(l1: f64, l2: f64, stroke: f64) -> Result<KinematicChain, KinematicsError> {
    let mut arm = KinematicChain::new("scara", "base", 3)?;
    arm.add_joint(Joint::new(
        "shoulder",
        JointType::Revolute,
        ActuatorType::Servo,
        0.0,
        360.0,
        JointGeometry::new(Axis::Z, DVector::from_vec(vec![l1, 0.0, 0.0]))?,
        "base",
        "elbow",
    )?)?;
    arm.add_joint(Joint::new(
        "elbow",
        JointType::Revolute,
        ActuatorType::Servo,
        0.0,
        360.0,
        JointGeometry::new(Axis::Z, DVector::from_vec(vec![l2, 0.0, 0.0]))?,
        "elbow",
        "quill",
    )?)?;
    arm.add_joint(Joint::new(
        "quill",
        JointType::Prismatic,
        ActuatorType::Stepper,
        -stroke,
        0.0,
        JointGeometry::new(Axis::Z, DVector::zeros(3))?,
        "quill",
        "tool",
    )?)?;
    Ok(arm)
}

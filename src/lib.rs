//! Frame-tagged rigid transforms and serial kinematic chains for robotic
//! arms.
//!
//! The crate models the spatial substrate a serial-link manipulator is
//! built on: rotations and translations tagged with the named coordinate
//! frames they map between, rigid transforms in the block form `[R t]`,
//! and kinematic chains of joints whose local transforms fold, left to
//! right, into the end-effector pose in the base frame.
//!
//! # Features
//!
//! - Rotations and translations carry their dimension (planar or 3D) as
//!   data, validated once at construction; frame and shape consistency are
//!   checked before anything is composed.
//! - Joints are prismatic, revolute or spherical, with per-type bounding
//!   (clamp, wrap modulo a full turn, unbounded) and a local transform
//!   kept current as the value changes.
//! - Chains keep their joint map and ordered joint list as one atomic
//!   structure, so removal never leaves dangling entries.
//! - Forward kinematics composes the chain without ever building
//!   homogeneous matrices; inverse kinematics is an explicit extension
//!   point with no solver supplied here.
//! - A vector PID controller for driving per-axis errors towards zero.
//! - With the `allow_filesystem` feature (default), chains load from YAML
//!   robot descriptions.
//!
//! # Example
//!
//! ```
//! use rs_chain_kinematics::presets::planar_two_link;
//!
//! let mut arm = planar_two_link(250.0, 200.0)?;
//! let pose = arm.compute_pose(&[("shoulder", 90.0), ("elbow", 0.0)])?;
//! // Both links point straight up: the end effector is at [0, 450].
//! assert!((pose.translation().vector()[1] - 450.0).abs() < 1e-9);
//! # Ok::<(), rs_chain_kinematics::kinematics_error::KinematicsError>(())
//! ```

pub mod kinematics_error;

pub mod transforms;

pub mod joint;

pub mod chain;

pub mod controllers;

pub mod presets;

#[cfg(feature = "allow_filesystem")]
pub mod chain_from_file;

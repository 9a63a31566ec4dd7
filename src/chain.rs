//! Serial kinematic chain: an ordered sequence of joints and attached links
//! from a base frame to the end effector.
//!
//! The joint map and the ordered chain list are one atomic structure; every
//! mutation validates first and then updates both together, so no dangling
//! chain entry can survive a failed or partial operation.
//!
//! All operations here are synchronous, single-threaded value computation.
//! If one chain is driven from several threads (a control loop reading the
//! pose while another thread updates joint values), wrap the chain in a
//! single `Mutex`; transforms returned by it are immutable values and safe
//! to share once published.

use crate::joint::Joint;
use crate::kinematics_error::KinematicsError;
use crate::transforms::{RigidTransform, compose};
use nalgebra::{DMatrix, DVector};
use std::collections::HashMap;
use tracing::{debug, trace};

/// A rigid body attached to the chain. Declares the joints it connects
/// (the first one is where it attaches) and its mass properties, for
/// dynamics-facing consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub name: String,
    pub joints: Vec<String>,
    pub mass: f64,
    pub center_mass: DVector<f64>,
    pub inertia: DMatrix<f64>,
}

impl Link {
    /// A massless link connecting the named joints.
    pub fn new(name: &str, joints: Vec<String>) -> Self {
        Link {
            name: name.to_string(),
            joints,
            mass: 0.0,
            center_mass: DVector::zeros(3),
            inertia: DMatrix::zeros(3, 3),
        }
    }

    pub fn with_mass_properties(
        mut self,
        mass: f64,
        center_mass: DVector<f64>,
        inertia: DMatrix<f64>,
    ) -> Self {
        self.mass = mass;
        self.center_mass = center_mass;
        self.inertia = inertia;
        self
    }
}

#[derive(Debug, Clone)]
struct ChainEntry {
    joint: String,
    links: Vec<Link>,
}

/// An industrial arm: named joints in a fixed serial order, links attached
/// to them, and the machinery to fold per-joint transforms into the
/// end-effector pose. The chain owns its joints; they are not shared.
#[derive(Debug, Clone)]
pub struct KinematicChain {
    name: String,
    uid: u64,
    base_frame: String,
    dims: usize,
    joints: HashMap<String, Joint>,
    chain: Vec<ChainEntry>,
    direct_kinematics: Option<RigidTransform>,
}

impl KinematicChain {
    /// An empty chain rooted at `base_frame`, working in `dims` (2 or 3)
    /// spatial dimensions.
    pub fn new(name: &str, base_frame: &str, dims: usize) -> Result<Self, KinematicsError> {
        // Reuse the transform-level dimension rule.
        RigidTransform::identity(base_frame, base_frame, dims)?;
        Ok(KinematicChain {
            name: name.to_string(),
            uid: rand::random(),
            base_frame: base_frame.to_string(),
            dims,
            joints: HashMap::new(),
            chain: Vec::new(),
            direct_kinematics: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Random identifier distinguishing chain instances.
    pub fn uid(&self) -> u64 {
        self.uid
    }

    pub fn base_frame(&self) -> &str {
        &self.base_frame
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Joint names in chain order (base to end effector).
    pub fn joint_names(&self) -> Vec<&str> {
        self.chain.iter().map(|entry| entry.joint.as_str()).collect()
    }

    pub fn joint(&self, name: &str) -> Result<&Joint, KinematicsError> {
        self.joints
            .get(name)
            .ok_or_else(|| KinematicsError::NotFound(name.to_string()))
    }

    /// Append a joint to the end of the chain. The joint enters both the
    /// map and the ordered list, or neither.
    pub fn add_joint(&mut self, joint: Joint) -> Result<(), KinematicsError> {
        if self.joints.contains_key(joint.name()) {
            return Err(KinematicsError::DuplicateName(joint.name().to_string()));
        }
        if joint.transform().dims() != self.dims {
            return Err(KinematicsError::Shape {
                expected: format!("a {}-dimensional joint", self.dims),
                found: format!("{} dimensions", joint.transform().dims()),
            });
        }
        debug!(chain = %self.name, joint = %joint.name(), "adding joint");
        self.chain.push(ChainEntry {
            joint: joint.name().to_string(),
            links: Vec::new(),
        });
        self.joints.insert(joint.name().to_string(), joint);
        self.direct_kinematics = None;
        Ok(())
    }

    /// Remove a joint from both the map and the ordered list. Links attached
    /// via the removed entry are detached with it; nothing dangles.
    pub fn remove_joint(&mut self, name: &str) -> Result<Joint, KinematicsError> {
        let position = self
            .chain
            .iter()
            .position(|entry| entry.joint == name)
            .ok_or_else(|| KinematicsError::NotFound(name.to_string()))?;
        debug!(chain = %self.name, joint = name, "removing joint");
        let entry = self.chain.remove(position);
        let joint = self
            .joints
            .remove(&entry.joint)
            .ok_or_else(|| KinematicsError::NotFound(name.to_string()))?;
        self.direct_kinematics = None;
        Ok(joint)
    }

    /// Attach a link to the chain entry of its first declared joint.
    pub fn add_link(&mut self, link: Link) -> Result<(), KinematicsError> {
        let attach_to = link
            .joints
            .first()
            .ok_or_else(|| KinematicsError::NotFound(format!("{} (link declares no joints)", link.name)))?
            .clone();
        let entry = self
            .chain
            .iter_mut()
            .find(|entry| entry.joint == attach_to)
            .ok_or(KinematicsError::NotFound(attach_to))?;
        debug!(chain = %self.name, link = %link.name, joint = %entry.joint, "attaching link");
        entry.links.push(link);
        Ok(())
    }

    /// Detach a named link from whichever joint holds it.
    pub fn remove_link(&mut self, name: &str) -> Result<Link, KinematicsError> {
        for entry in self.chain.iter_mut() {
            if let Some(position) = entry.links.iter().position(|link| link.name == name) {
                debug!(chain = %self.name, link = name, joint = %entry.joint, "detaching link");
                return Ok(entry.links.remove(position));
            }
        }
        Err(KinematicsError::NotFound(name.to_string()))
    }

    /// Links attached to the named joint.
    pub fn links(&self, joint_name: &str) -> Result<&[Link], KinematicsError> {
        self.chain
            .iter()
            .find(|entry| entry.joint == joint_name)
            .map(|entry| entry.links.as_slice())
            .ok_or_else(|| KinematicsError::NotFound(joint_name.to_string()))
    }

    /// Set one joint's value, recomputing its local transform.
    pub fn set_joint_value(&mut self, name: &str, value: f64) -> Result<(), KinematicsError> {
        let joint = self
            .joints
            .get_mut(name)
            .ok_or_else(|| KinematicsError::NotFound(name.to_string()))?;
        joint.set_value(value)?;
        self.direct_kinematics = None;
        Ok(())
    }

    /// Forward kinematics: set each named joint's value and fold the chain's
    /// local transforms, left to right, into the end-effector pose in the
    /// base frame. An empty chain yields the identity at the base frame.
    /// The cached direct kinematics result is not populated here; use
    /// [KinematicChain::direct_kinematics] for that.
    pub fn compute_pose(
        &mut self,
        joint_values: &[(&str, f64)],
    ) -> Result<RigidTransform, KinematicsError> {
        // Every name must resolve before any joint moves; a bad name
        // mid-list may not leave the chain half-updated.
        for (name, _) in joint_values {
            if !self.joints.contains_key(*name) {
                return Err(KinematicsError::NotFound((*name).to_string()));
            }
        }
        for (name, value) in joint_values {
            self.set_joint_value(name, *value)?;
        }
        self.fold_transforms()
    }

    /// Forward kinematics at the current joint values, memoized until the
    /// next mutation of the chain or of any joint value.
    pub fn direct_kinematics(&mut self) -> Result<RigidTransform, KinematicsError> {
        if let Some(ref pose) = self.direct_kinematics {
            trace!(chain = %self.name, "direct kinematics cache hit");
            return Ok(pose.clone());
        }
        let pose = self.fold_transforms()?;
        self.direct_kinematics = Some(pose.clone());
        Ok(pose)
    }

    /// Inverse kinematics is an extension point; no solver is part of this
    /// crate.
    pub fn compute_joint_values(
        &self,
        _pose: &RigidTransform,
    ) -> Result<Vec<f64>, KinematicsError> {
        Err(KinematicsError::NotImplemented("inverse kinematics"))
    }

    fn fold_transforms(&self) -> Result<RigidTransform, KinematicsError> {
        if self.chain.is_empty() {
            return RigidTransform::identity(&self.base_frame, &self.base_frame, self.dims);
        }
        let mut transforms = Vec::with_capacity(self.chain.len());
        for entry in &self.chain {
            let joint = self.joint(&entry.joint)?;
            transforms.push(joint.transform().clone());
        }
        let pose = compose(&transforms)?;
        trace!(
            chain = %self.name,
            base = %pose.base_frame(),
            end = %pose.to_frame(),
            "composed end-effector pose"
        );
        Ok(pose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint::{ActuatorType, JointGeometry, JointType};
    use nalgebra::DVector;

    const TOLERANCE: f64 = 1e-9;

    fn revolute(name: &str, length: f64, base: &str, to: &str) -> Joint {
        Joint::new(
            name,
            JointType::Revolute,
            ActuatorType::Servo,
            0.0,
            360.0,
            JointGeometry::planar(length),
            base,
            to,
        )
        .unwrap()
    }

    fn planar_arm() -> KinematicChain {
        let mut arm = KinematicChain::new("arm", "base", 2).unwrap();
        arm.add_joint(revolute("shoulder", 250.0, "base", "elbow")).unwrap();
        arm.add_joint(revolute("elbow", 200.0, "elbow", "tool")).unwrap();
        arm
    }

    #[test]
    fn test_add_joint_rejects_duplicates() {
        let mut arm = planar_arm();
        let result = arm.add_joint(revolute("shoulder", 100.0, "base", "elbow"));
        assert!(matches!(result, Err(KinematicsError::DuplicateName(_))));
        assert_eq!(arm.len(), 2);
    }

    #[test]
    fn test_add_joint_rejects_wrong_dimension() {
        let mut arm = planar_arm();
        let spatial = Joint::new(
            "wrist",
            JointType::Revolute,
            ActuatorType::Servo,
            0.0,
            360.0,
            JointGeometry::new(crate::transforms::Axis::Z, DVector::zeros(3)).unwrap(),
            "tool",
            "tip",
        )
        .unwrap();
        let result = arm.add_joint(spatial);
        assert!(matches!(result, Err(KinematicsError::Shape { .. })));
    }

    #[test]
    fn test_joint_lookup() {
        let arm = planar_arm();
        assert_eq!(arm.joint("elbow").unwrap().name(), "elbow");
        let result = arm.joint("wrist");
        assert!(matches!(result, Err(KinematicsError::NotFound(_))));
    }

    #[test]
    fn test_remove_joint_clears_both_structures() {
        let mut arm = planar_arm();
        let removed = arm.remove_joint("shoulder").unwrap();
        assert_eq!(removed.name(), "shoulder");
        assert_eq!(arm.joint_names(), vec!["elbow"]);
        assert!(matches!(
            arm.joint("shoulder"),
            Err(KinematicsError::NotFound(_))
        ));

        // No dangling chain entry: attaching to the removed joint fails.
        let result = arm.add_link(Link::new("upper_arm", vec!["shoulder".to_string()]));
        assert!(matches!(result, Err(KinematicsError::NotFound(_))));
    }

    #[test]
    fn test_remove_joint_missing() {
        let mut arm = planar_arm();
        let result = arm.remove_joint("wrist");
        assert!(matches!(result, Err(KinematicsError::NotFound(_))));
    }

    #[test]
    fn test_link_attach_and_detach() {
        let mut arm = planar_arm();
        let link = Link::new("upper_arm", vec!["shoulder".to_string(), "elbow".to_string()])
            .with_mass_properties(
                1.2,
                DVector::from_vec(vec![125.0, 0.0, 0.0]),
                DMatrix::identity(3, 3),
            );
        arm.add_link(link).unwrap();
        assert_eq!(arm.links("shoulder").unwrap().len(), 1);
        assert!(arm.links("elbow").unwrap().is_empty());

        let detached = arm.remove_link("upper_arm").unwrap();
        assert_eq!(detached.mass, 1.2);
        assert!(arm.links("shoulder").unwrap().is_empty());

        let result = arm.remove_link("upper_arm");
        assert!(matches!(result, Err(KinematicsError::NotFound(_))));
    }

    #[test]
    fn test_add_link_requires_declared_joint() {
        let mut arm = planar_arm();
        let result = arm.add_link(Link::new("floating", vec![]));
        assert!(matches!(result, Err(KinematicsError::NotFound(_))));
    }

    #[test]
    fn test_straight_extension() {
        let mut arm = planar_arm();
        let pose = arm
            .compute_pose(&[("shoulder", 0.0), ("elbow", 0.0)])
            .unwrap();
        assert_eq!(pose.base_frame(), "base");
        assert_eq!(pose.to_frame(), "tool");
        let expected = DVector::from_vec(vec![450.0, 0.0]);
        assert!((pose.translation().vector() - expected).norm() < TOLERANCE);
    }

    #[test]
    fn test_first_joint_rotation_moves_whole_arm() {
        let mut arm = planar_arm();
        let pose = arm
            .compute_pose(&[("shoulder", 90.0), ("elbow", 0.0)])
            .unwrap();
        // Both links point along Y; not the naive sum along X.
        let expected = DVector::from_vec(vec![0.0, 450.0]);
        assert!((pose.translation().vector() - expected).norm() < TOLERANCE);
    }

    #[test]
    fn test_elbow_bend_composes() {
        let mut arm = planar_arm();
        let pose = arm
            .compute_pose(&[("shoulder", 0.0), ("elbow", 90.0)])
            .unwrap();
        // First link along X, second rotated onto Y.
        let expected = DVector::from_vec(vec![250.0, 200.0]);
        assert!((pose.translation().vector() - expected).norm() < TOLERANCE);
    }

    #[test]
    fn test_compute_pose_unknown_joint() {
        let mut arm = planar_arm();
        let result = arm.compute_pose(&[("wrist", 10.0)]);
        assert!(matches!(result, Err(KinematicsError::NotFound(_))));
    }

    #[test]
    fn test_failed_compute_pose_moves_nothing() {
        let mut arm = planar_arm();
        let result = arm.compute_pose(&[("shoulder", 90.0), ("ghost", 1.0)]);
        assert!(matches!(result, Err(KinematicsError::NotFound(_))));
        // The valid entry before the unknown name must not have been applied.
        assert_eq!(arm.joint("shoulder").unwrap().value(), 0.0);
        assert_eq!(arm.joint("elbow").unwrap().value(), 0.0);
    }

    #[test]
    fn test_empty_chain_pose_is_identity() {
        let mut arm = KinematicChain::new("empty", "base", 2).unwrap();
        let pose = arm.compute_pose(&[]).unwrap();
        assert_eq!(pose.base_frame(), "base");
        assert_eq!(pose.to_frame(), "base");
        assert!(pose.translation().vector().norm() < TOLERANCE);
    }

    #[test]
    fn test_direct_kinematics_cache_invalidation() {
        let mut arm = planar_arm();
        let straight = arm.direct_kinematics().unwrap();
        // Cached value is returned as-is.
        assert_eq!(arm.direct_kinematics().unwrap(), straight);

        arm.set_joint_value("shoulder", 90.0).unwrap();
        let raised = arm.direct_kinematics().unwrap();
        assert!(
            (raised.translation().vector() - straight.translation().vector()).norm() > 1.0
        );
    }

    #[test]
    fn test_inverse_kinematics_not_implemented() {
        let arm = planar_arm();
        let target = RigidTransform::identity("base", "tool", 2).unwrap();
        let result = arm.compute_joint_values(&target);
        assert!(matches!(result, Err(KinematicsError::NotImplemented(_))));
    }

    #[test]
    fn test_uid_distinguishes_instances() {
        let a = KinematicChain::new("a", "base", 2).unwrap();
        let b = KinematicChain::new("b", "base", 2).unwrap();
        assert_ne!(a.uid(), b.uid());
    }
}

//! Builds a kinematic chain from a YAML robot description (optional).
//!
//! The loader is the "external" side of the chain API: it parses joint and
//! link definitions into value objects and feeds them through `add_joint` /
//! `add_link`. Frames are derived from the serial structure: each joint's
//! base frame is the previous joint's target frame, starting at the chain's
//! base frame.

use std::path::Path;
use yaml_rust2::{Yaml, YamlLoader};

use crate::chain::{KinematicChain, Link};
use crate::joint::{ActuatorType, Joint, JointGeometry, JointType};
use crate::kinematics_error::KinematicsError;
use crate::transforms::Axis;
use nalgebra::DVector;
use tracing::debug;

/// Read a chain description from a YAML file. A file like this is supported:
/// ```yaml
/// chain:
///   name: yaniro s
///   base_frame: base
///   dims: 2
/// joints:
///   - name: shoulder
///     type: revolute
///     actuator: servo
///     min: 0.0
///     max: 360.0
///     axis: z
///     link: [250.0, 0.0]
///     to_frame: elbow
///   - name: elbow
///     type: revolute
///     actuator: servo
///     min: 0.0
///     max: 360.0
///     axis: z
///     link: [200.0, 0.0]
///     to_frame: tool
/// links:
///   - name: upper arm
///     joints: [shoulder, elbow]
///     mass: 1.2
/// ```
/// The `dims` and `links` entries are optional (3 dimensions, no links).
pub fn chain_from_yaml_file<P: AsRef<Path>>(path: P) -> Result<KinematicChain, KinematicsError> {
    let contents = std::fs::read_to_string(path)?;
    chain_from_yaml(&contents)
}

/// Parse a chain description from a YAML string. See [chain_from_yaml_file].
pub fn chain_from_yaml(contents: &str) -> Result<KinematicChain, KinematicsError> {
    let docs = YamlLoader::load_from_str(contents)
        .map_err(|e| KinematicsError::ParseError(format!("{}", e)))?;
    let doc = docs
        .first()
        .ok_or_else(|| KinematicsError::ParseError("empty YAML document".to_string()))?;

    let header = &doc["chain"];
    let name = str_field(header, "name")?;
    let base_frame = str_field(header, "base_frame")?;
    let dims = match &header["dims"] {
        Yaml::BadValue => 3,
        other => number(other).ok_or_else(|| KinematicsError::ParseError(
            "chain dims must be a number".to_string(),
        ))? as usize,
    };

    let mut chain = KinematicChain::new(name, base_frame, dims)?;

    let joints = doc["joints"]
        .as_vec()
        .ok_or_else(|| KinematicsError::MissingField("joints".to_string()))?;
    let mut parent = base_frame.to_string();
    for entry in joints {
        let joint_name = str_field(entry, "name")?;
        let joint_type: JointType = str_field(entry, "type")?.parse()?;
        let actuator: ActuatorType = str_field(entry, "actuator")?.parse()?;
        let axis: Axis = str_field(entry, "axis")?.parse()?;
        let min_value = num_field(entry, "min")?;
        let max_value = num_field(entry, "max")?;
        let link = vector_field(entry, "link")?;
        let to_frame = str_field(entry, "to_frame")?;

        let geometry = JointGeometry::new(axis, DVector::from_vec(link))?;
        chain.add_joint(Joint::new(
            joint_name, joint_type, actuator, min_value, max_value, geometry, &parent, to_frame,
        )?)?;
        parent = to_frame.to_string();
    }

    if let Some(links) = doc["links"].as_vec() {
        for entry in links {
            chain.add_link(parse_link(entry)?)?;
        }
    }

    debug!(chain = %chain.name(), joints = chain.len(), "loaded chain description");
    Ok(chain)
}

fn parse_link(entry: &Yaml) -> Result<Link, KinematicsError> {
    let name = str_field(entry, "name")?;
    let joints = entry["joints"]
        .as_vec()
        .ok_or_else(|| KinematicsError::MissingField(format!("joints (link '{}')", name)))?
        .iter()
        .map(|j| {
            j.as_str().map(str::to_string).ok_or_else(|| {
                KinematicsError::ParseError(format!("link '{}': joint names must be strings", name))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut link = Link::new(name, joints);
    if let Some(mass) = number(&entry["mass"]) {
        link.mass = mass;
    }
    if !entry["center_mass"].is_badvalue() {
        link.center_mass = DVector::from_vec(vector_field(entry, "center_mass")?);
    }
    Ok(link)
}

// YAML distinguishes integers from reals; accept both wherever a number
// is expected.
fn number(value: &Yaml) -> Option<f64> {
    match value {
        Yaml::Integer(i) => Some(*i as f64),
        other => other.as_f64(),
    }
}

fn str_field<'a>(entry: &'a Yaml, field: &str) -> Result<&'a str, KinematicsError> {
    entry[field]
        .as_str()
        .ok_or_else(|| KinematicsError::MissingField(field.to_string()))
}

fn num_field(entry: &Yaml, field: &str) -> Result<f64, KinematicsError> {
    number(&entry[field]).ok_or_else(|| KinematicsError::MissingField(field.to_string()))
}

fn vector_field(entry: &Yaml, field: &str) -> Result<Vec<f64>, KinematicsError> {
    entry[field]
        .as_vec()
        .ok_or_else(|| KinematicsError::MissingField(field.to_string()))?
        .iter()
        .map(|v| {
            number(v).ok_or_else(|| {
                KinematicsError::ParseError(format!("'{}' must contain only numbers", field))
            })
        })
        .collect()
}

//! Error handling for transforms, chains and the robot description loader

use std::io;

/// Unified error reported by transform construction, chain mutation and,
/// when the `allow_filesystem` feature is on, YAML robot description parsing.
#[derive(Debug)]
pub enum KinematicsError {
    /// Matrix or vector dimensions do not match the declared specialization.
    Shape { expected: String, found: String },
    /// Two operands that must share a frame do not.
    FrameMismatch { expected: String, found: String },
    /// A categorical value (joint type, actuator, axis, board) outside its set.
    InvalidEnum { kind: &'static str, value: String },
    /// Chain mutation naming a joint that already exists.
    DuplicateName(String),
    /// Chain mutation or lookup naming a joint or link that does not exist.
    NotFound(String),
    /// An extension point (inverse kinematics) invoked without an implementation.
    NotImplemented(&'static str),
    /// Composition of an empty transform sequence.
    EmptyComposition,
    /// A scalar parameter outside its valid range (sample period, clamp band).
    InvalidParameter(String),
    IoError(io::Error),
    ParseError(String),
    MissingField(String),
}

impl std::fmt::Display for KinematicsError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            KinematicsError::Shape { ref expected, ref found } =>
                write!(f, "Shape mismatch: expected {}, found {}", expected, found),
            KinematicsError::FrameMismatch { ref expected, ref found } =>
                write!(f, "Frame mismatch: expected '{}', found '{}'", expected, found),
            KinematicsError::InvalidEnum { kind, ref value } =>
                write!(f, "'{}' is not a valid {}", value, kind),
            KinematicsError::DuplicateName(ref name) =>
                write!(f, "Joint '{}' already exists in the chain", name),
            KinematicsError::NotFound(ref name) =>
                write!(f, "'{}' is not part of the chain", name),
            KinematicsError::NotImplemented(what) =>
                write!(f, "{} is not implemented (no solver supplied)", what),
            KinematicsError::EmptyComposition =>
                write!(f, "Cannot compose an empty sequence of transforms"),
            KinematicsError::InvalidParameter(ref msg) =>
                write!(f, "Invalid parameter: {}", msg),
            KinematicsError::IoError(ref err) =>
                write!(f, "IO Error: {}", err),
            KinematicsError::ParseError(ref msg) =>
                write!(f, "Parse Error: {}", msg),
            KinematicsError::MissingField(ref field) =>
                write!(f, "Missing Field: {}", field),
        }
    }
}

impl std::error::Error for KinematicsError {}

impl From<io::Error> for KinematicsError {
    fn from(err: io::Error) -> Self {
        KinematicsError::IoError(err)
    }
}

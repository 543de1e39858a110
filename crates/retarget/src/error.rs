//! Result and Error types for the crate.
use miette::Diagnostic;
use thiserror::Error;

use crate::skeleton::{Axis, SkeletonJoint};

/// Result containing an error variant from this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error variants of the retargeting crate.
///
/// None of these are fatal: a teleoperation loop logs them and carries on with the next frame.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// The frame was decoded, but cannot be retargeted.
    #[error(transparent)]
    #[diagnostic(transparent)]
    InvalidFrame(#[from] RetargetError),

    /// The inbound payload could not be decoded into a skeleton frame.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Decode(#[from] DecodeError),

    /// The actuation session is not connected, the command was dropped.
    #[error("Actuation session is not usable, command dropped")]
    #[diagnostic(
        code(retarget::actuation_unavailable),
        help("The command sink will be retried with the next frame once the session is back.")
    )]
    ActuationUnavailable,

    /// A speed fraction outside of `0.0..=1.0`.
    #[error("Invalid speed fraction {0}, expected a value within 0.0..=1.0")]
    #[diagnostic(code(retarget::invalid_speed))]
    InvalidSpeed(f64),

    /// IO error, this wraps a [`std::io::Error`]
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Reasons a [`SkeletonFrame`](crate::SkeletonFrame) is rejected before any angle is computed.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum RetargetError {
    /// One of the six required joints is absent from the frame.
    #[error("Skeleton frame is missing joint `{0}`")]
    #[diagnostic(
        code(retarget::missing_joint),
        help("Is the person fully visible to the sensor?")
    )]
    MissingJoint(SkeletonJoint),

    /// A coordinate of a required joint is NaN or infinite.
    #[error("Joint `{joint}` has a non-finite {axis} coordinate ({value})")]
    #[diagnostic(code(retarget::invalid_coordinate))]
    InvalidCoordinate {
        joint: SkeletonJoint,
        axis: Axis,
        value: f64,
    },
}

/// Decoding failures of an inbound skeleton payload.
#[derive(Error, Diagnostic, Debug)]
pub enum DecodeError {
    /// The payload is not valid JSON.
    #[error("Skeleton payload is not valid JSON")]
    #[diagnostic(code(retarget::decode::json))]
    Json(#[source] serde_json::Error),

    /// The payload is valid JSON, but not an object keyed by joint name.
    #[error("Skeleton payload must be a JSON object keyed by joint name")]
    #[diagnostic(code(retarget::decode::not_an_object))]
    NotAnObject,

    /// A required joint is present, but its value is malformed.
    #[error("Joint `{joint}` is not an object with numeric X, Y and Z fields")]
    #[diagnostic(code(retarget::decode::joint))]
    Joint {
        joint: SkeletonJoint,
        #[source]
        source: serde_json::Error,
    },
}

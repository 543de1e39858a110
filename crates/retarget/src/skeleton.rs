//! Skeleton frames as published by the depth sensor.
//!
//! A frame maps joint names to positions in sensor space, in meters. The sensor publishes every
//! joint it tracks, but only the six arm joints in [`SkeletonJoint`] are used for retargeting.
use std::collections::BTreeMap;

use nalgebra::Point3;
use serde::Deserialize;
use serde::de::{Error as _, Unexpected};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::error::{DecodeError, RetargetError};

/// The skeleton joints required to retarget both arms.
///
/// The string representation matches the key used by the sensor, e.g. `ShoulderRight`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, EnumString,
)]
pub enum SkeletonJoint {
    ShoulderRight,
    ElbowRight,
    WristRight,
    ShoulderLeft,
    ElbowLeft,
    WristLeft,
}

impl SkeletonJoint {
    /// The same joint on the other side of the body.
    #[must_use]
    pub fn counterpart(self) -> Self {
        match self {
            Self::ShoulderRight => Self::ShoulderLeft,
            Self::ElbowRight => Self::ElbowLeft,
            Self::WristRight => Self::WristLeft,
            Self::ShoulderLeft => Self::ShoulderRight,
            Self::ElbowLeft => Self::ElbowRight,
            Self::WristLeft => Self::WristRight,
        }
    }
}

/// A coordinate axis of the sensor frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Position of a single joint in sensor space.
///
/// The y-axis points up and the z-axis points away from the sensor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Joint3D {
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
    #[serde(rename = "Z")]
    pub z: f64,
}

impl Joint3D {
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The position as a [`Point3`].
    #[must_use]
    pub fn point(&self) -> Point3<f64> {
        Point3::new(self.x, self.y, self.z)
    }

    /// The first axis holding a NaN or infinite coordinate, if any.
    #[must_use]
    pub fn non_finite_axis(&self) -> Option<(Axis, f64)> {
        [(Axis::X, self.x), (Axis::Y, self.y), (Axis::Z, self.z)]
            .into_iter()
            .find(|(_, value)| !value.is_finite())
    }

    /// Reflects the position through the sensor's sagittal (y-z) plane.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        Self::new(-self.x, self.y, self.z)
    }
}

/// The shoulder, elbow and wrist of a single arm.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArmPose {
    pub shoulder: Joint3D,
    pub elbow: Joint3D,
    pub wrist: Joint3D,
}

/// Both arms of a validated skeleton frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpperBodyPose {
    pub right_arm: ArmPose,
    pub left_arm: ArmPose,
}

/// A single snapshot of tracked joint positions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SkeletonFrame {
    joints: BTreeMap<SkeletonJoint, Joint3D>,
}

impl SkeletonFrame {
    /// Creates an empty frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the position of `joint`, replacing any previous position.
    pub fn insert(&mut self, joint: SkeletonJoint, position: Joint3D) -> &mut Self {
        self.joints.insert(joint, position);
        self
    }

    /// Removes `joint` from the frame.
    pub fn remove(&mut self, joint: SkeletonJoint) -> Option<Joint3D> {
        self.joints.remove(&joint)
    }

    #[must_use]
    pub fn get(&self, joint: SkeletonJoint) -> Option<&Joint3D> {
        self.joints.get(&joint)
    }

    /// Decodes a frame from the sensor's JSON payload.
    ///
    /// The payload is an object keyed by joint name, each value an object with numeric `X`, `Y`
    /// and `Z` fields. Keys that are not a [`SkeletonJoint`] are ignored. Missing joints are not
    /// an error here, they are reported by [`SkeletonFrame::pose`].
    pub fn from_json(payload: &[u8]) -> Result<Self, DecodeError> {
        let value = serde_json::from_slice(payload).map_err(DecodeError::Json)?;

        Self::from_value(value)
    }

    /// Decodes a frame from an already parsed JSON value, see [`SkeletonFrame::from_json`].
    pub fn from_value(value: serde_json::Value) -> Result<Self, DecodeError> {
        let serde_json::Value::Object(entries) = value else {
            return Err(DecodeError::NotAnObject);
        };

        let mut frame = Self::new();
        for (key, value) in entries {
            let Ok(joint) = key.parse::<SkeletonJoint>() else {
                continue;
            };

            let position =
                decode_joint(value).map_err(|source| DecodeError::Joint { joint, source })?;
            frame.insert(joint, position);
        }

        Ok(frame)
    }

    /// Validates the frame and extracts both arms.
    ///
    /// Joints are checked in [`SkeletonJoint`] order, the first missing joint or non-finite
    /// coordinate is reported.
    pub fn pose(&self) -> Result<UpperBodyPose, RetargetError> {
        for joint in SkeletonJoint::iter() {
            let position = self
                .get(joint)
                .ok_or(RetargetError::MissingJoint(joint))?;

            if let Some((axis, value)) = position.non_finite_axis() {
                return Err(RetargetError::InvalidCoordinate { joint, axis, value });
            }
        }

        let joint = |joint: SkeletonJoint| self.joints[&joint];
        Ok(UpperBodyPose {
            right_arm: ArmPose {
                shoulder: joint(SkeletonJoint::ShoulderRight),
                elbow: joint(SkeletonJoint::ElbowRight),
                wrist: joint(SkeletonJoint::WristRight),
            },
            left_arm: ArmPose {
                shoulder: joint(SkeletonJoint::ShoulderLeft),
                elbow: joint(SkeletonJoint::ElbowLeft),
                wrist: joint(SkeletonJoint::WristLeft),
            },
        })
    }

    /// Mirrors the frame left to right: the arms swap sides and every x coordinate is negated.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        let joints = self
            .joints
            .iter()
            .map(|(joint, position)| (joint.counterpart(), position.mirrored()))
            .collect();

        Self { joints }
    }
}

/// Decodes a single joint, which must be an object. Serde would also accept a sequence of three
/// numbers for a struct.
fn decode_joint(value: serde_json::Value) -> serde_json::Result<Joint3D> {
    if value.is_object() {
        return serde_json::from_value(value);
    }

    let unexpected = match &value {
        serde_json::Value::Object(_) => Unexpected::Map,
        serde_json::Value::Null => Unexpected::Unit,
        serde_json::Value::Bool(value) => Unexpected::Bool(*value),
        serde_json::Value::Number(_) => Unexpected::Other("number"),
        serde_json::Value::String(value) => Unexpected::Str(value),
        serde_json::Value::Array(_) => Unexpected::Seq,
    };

    Err(serde_json::Error::invalid_type(
        unexpected,
        &"an object with numeric X, Y and Z fields",
    ))
}

impl FromIterator<(SkeletonJoint, Joint3D)> for SkeletonFrame {
    fn from_iter<I: IntoIterator<Item = (SkeletonJoint, Joint3D)>>(iter: I) -> Self {
        Self {
            joints: iter.into_iter().collect(),
        }
    }
}

//! Conversion of raw sensor angles into clamped robot joint commands.
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::joints::{ArmJoints, UpperBodyJoints};

/// Mechanical range and sign convention of a single robot joint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointLimit {
    /// Lower bound, in radians.
    pub min: f64,
    /// Upper bound, in radians.
    pub max: f64,
    /// Whether the sensor convention is the inverse of the robot convention for this joint.
    pub flip_sign: bool,
}

impl JointLimit {
    #[must_use]
    pub const fn new(min: f64, max: f64, flip_sign: bool) -> Self {
        Self {
            min,
            max,
            flip_sign,
        }
    }

    /// Converts a raw angle in degrees into a robot angle in radians.
    ///
    /// The angle is converted, then sign flipped, then clamped to the joint's range.
    #[must_use]
    pub fn apply(&self, degrees: f64) -> f64 {
        let radians = degrees.to_radians();
        let radians = if self.flip_sign { -radians } else { radians };

        radians.clamp(self.min, self.max)
    }

    /// Whether `radians` lies within the joint's range.
    #[must_use]
    pub fn contains(&self, radians: f64) -> bool {
        (self.min..=self.max).contains(&radians)
    }
}

const SHOULDER_PITCH_RANGE: f64 = 2.0857;
const ELBOW_YAW_RANGE: f64 = 2.0857;

/// Joint limits of the NAO's arms.
///
/// The sign flips are asymmetric between the arms, following the mounting of the actuators.
pub const NAO_ARM_LIMITS: UpperBodyJoints<JointLimit> = UpperBodyJoints {
    right_arm: ArmJoints {
        shoulder_pitch: JointLimit::new(-SHOULDER_PITCH_RANGE, SHOULDER_PITCH_RANGE, true),
        shoulder_roll: JointLimit::new(-1.3265, 0.3142, true),
        elbow_roll: JointLimit::new(0.0349, 1.5446, false),
        elbow_yaw: JointLimit::new(-ELBOW_YAW_RANGE, ELBOW_YAW_RANGE, false),
    },
    left_arm: ArmJoints {
        shoulder_pitch: JointLimit::new(-SHOULDER_PITCH_RANGE, SHOULDER_PITCH_RANGE, true),
        shoulder_roll: JointLimit::new(-0.3142, 1.3265, false),
        elbow_roll: JointLimit::new(-1.5446, -0.0349, true),
        elbow_yaw: JointLimit::new(-ELBOW_YAW_RANGE, ELBOW_YAW_RANGE, false),
    },
};

/// Joint angles in degrees, in the sensor's sign convention and unclamped.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RawAngles(pub UpperBodyJoints<f64>);

/// Joint positions in radians, in the robot's sign convention and within [`NAO_ARM_LIMITS`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CommandVector(UpperBodyJoints<f64>);

impl CommandVector {
    #[must_use]
    pub fn joints(&self) -> &UpperBodyJoints<f64> {
        &self.0
    }

    /// The positions in slot order, see [`JOINT_NAMES`](crate::JOINT_NAMES).
    #[must_use]
    pub fn to_array(&self) -> [f64; 8] {
        self.0.into_array()
    }
}

/// Maps raw angles onto the robot using [`NAO_ARM_LIMITS`].
///
/// This never fails, out of range angles are clamped.
#[must_use]
pub fn to_command(raw: &RawAngles) -> CommandVector {
    to_command_with(raw, &NAO_ARM_LIMITS)
}

fn to_command_with(raw: &RawAngles, limits: &UpperBodyJoints<JointLimit>) -> CommandVector {
    CommandVector(raw.0.zip(*limits).map(|(degrees, limit)| limit.apply(degrees)))
}

/// Fraction of the maximum joint speed used when moving to a command, within `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Speed(f64);

impl Speed {
    /// 20% of the maximum speed, smooth enough for live teleoperation.
    pub const DEFAULT: Speed = Speed(0.2);

    pub fn new(fraction: f64) -> Result<Self> {
        if (0.0..=1.0).contains(&fraction) {
            Ok(Self(fraction))
        } else {
            Err(Error::InvalidSpeed(fraction))
        }
    }

    #[must_use]
    pub fn fraction(self) -> f64 {
        self.0
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for Speed {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Speed> for f64 {
    fn from(value: Speed) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_flip_then_clamp() {
        let limits = NAO_ARM_LIMITS;

        // 90 degrees is flipped to -pi/2, well within the shoulder pitch range
        let pitch = limits.right_arm.shoulder_pitch.apply(90.0);
        assert!((pitch + std::f64::consts::FRAC_PI_2).abs() < 1e-12);

        // flipped to -0.5 rad, inside the right shoulder roll range
        let roll = limits.right_arm.shoulder_roll.apply(0.5_f64.to_degrees());
        assert!((roll + 0.5).abs() < 1e-12);

        // the left shoulder roll is not flipped, a negative angle is clamped at its minimum
        assert_eq!(limits.left_arm.shoulder_roll.apply(-45.0), -0.3142);

        // an elbow roll of zero is clamped to the smallest bend the robot can make
        assert_eq!(limits.right_arm.elbow_roll.apply(0.0), 0.0349);
        assert_eq!(limits.left_arm.elbow_roll.apply(0.0), -0.0349);
        assert_eq!(limits.left_arm.elbow_roll.apply(170.0), -1.5446);
    }

    #[test]
    fn sign_flips() {
        let flips = NAO_ARM_LIMITS.map(|limit| limit.flip_sign).into_array();
        assert_eq!(
            flips,
            [true, true, false, false, true, false, true, false]
        );
    }

    #[test]
    fn command_within_limits() {
        for degrees in [-720.0, -180.0, -117.0, -45.0, 0.0, 12.5, 90.0, 180.0, 1e6] {
            let command = to_command(&RawAngles(UpperBodyJoints::fill(degrees)));

            for (radians, limit) in command.joints().zip(NAO_ARM_LIMITS).iter() {
                assert!(
                    limit.contains(*radians),
                    "{radians} outside of [{}, {}]",
                    limit.min,
                    limit.max
                );
            }
        }
    }

    #[test]
    fn custom_limits() {
        let limits = UpperBodyJoints::fill(JointLimit::new(-1.0, 1.0, false));
        let command = to_command_with(&RawAngles(UpperBodyJoints::fill(90.0)), &limits);

        assert_eq!(command.to_array(), [1.0; 8]);
    }

    #[test]
    fn speed_bounds() {
        assert_eq!(Speed::default().fraction(), 0.2);
        assert_eq!(Speed::new(1.0).unwrap().fraction(), 1.0);
        assert_eq!(Speed::new(0.0).unwrap().fraction(), 0.0);
        assert!(matches!(Speed::new(1.5), Err(Error::InvalidSpeed(v)) if v == 1.5));
        assert!(Speed::new(-0.1).is_err());
        assert!(Speed::new(f64::NAN).is_err());
    }
}

//! Joint angle heuristics for the arms.
//!
//! Every function takes raw sensor coordinates and returns an angle in degrees, in the sensor
//! sign convention. The thresholds are tuned for the noise of a depth sensor skeleton rather
//! than derived from the robot's kinematics, and must keep their exact values.
//!
//! None of these functions fail: a degenerate configuration yields `0.0` for the affected joint.
use crate::geometry::{DENOMINATOR_EPSILON, angle2, distance, finite_or_zero};
use crate::joints::ArmJoints;
use crate::skeleton::{ArmPose, Joint3D};

/// Raw shoulder pitches below this value are replaced by [`SHOULDER_PITCH_FLOOR`].
pub const SHOULDER_PITCH_FLOOR_TRIGGER: f64 = -118.0;
/// Replacement for raw shoulder pitches below [`SHOULDER_PITCH_FLOOR_TRIGGER`].
pub const SHOULDER_PITCH_FLOOR: f64 = -117.0;
/// Minimum magnitude of the shoulder to elbow depth offset used for the shoulder roll.
pub const MIN_ROLL_DEPTH: f64 = 0.1;
/// Maximum vertical and depth offset of a forearm that points sideways.
pub const FOREARM_EXTENDED_TOLERANCE: f64 = 0.2;
/// Maximum lateral and depth offset of a forearm that hangs straight down.
pub const FOREARM_HANGING_TOLERANCE: f64 = 0.1;

/// Marker for the robot's left arm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Left;

/// Marker for the robot's right arm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Right;

/// Joint angle functions of a single arm.
///
/// The shoulder and elbow roll are identical for both arms, the elbow yaw differs per side.
pub trait ArmKinematics {
    /// Elbow yaw of a forearm hanging straight down.
    const HANGING_ELBOW_YAW: f64;

    /// Whether the wrist lies outward of the elbow, along the sensor's x-axis.
    fn wrist_is_outward(elbow: &Joint3D, wrist: &Joint3D) -> bool;

    /// Combines the forearm inclination and the shoulder pitch into the elbow yaw.
    fn elbow_yaw_from_forearm(forearm: f64, shoulder_pitch: f64) -> f64;

    /// Shoulder pitch, from the shoulder and elbow positions.
    ///
    /// With the elbow below the shoulder, the pitch is the inclination of the upper arm from the
    /// horizontal. Otherwise it is measured from the vertical, so that an arm pointing straight
    /// up yields 90 degrees.
    fn shoulder_pitch(shoulder: &Joint3D, elbow: &Joint3D) -> f64 {
        let dy = elbow.y - shoulder.y;
        let dz = elbow.z - shoulder.z;

        let degrees = if elbow.y < shoulder.y {
            floor_shoulder_pitch(-angle2(dy.abs(), (dz + DENOMINATOR_EPSILON).abs()))
        } else {
            90.0 - angle2(dz, dy + DENOMINATOR_EPSILON)
        };

        finite_or_zero(degrees)
    }

    /// Shoulder roll, from the lateral and depth offset of the elbow.
    fn shoulder_roll(shoulder: &Joint3D, elbow: &Joint3D) -> f64 {
        let mut dz = elbow.z - shoulder.z;
        // an elbow level with the shoulder makes the angle flip around
        if dz.abs() < MIN_ROLL_DEPTH {
            dz = MIN_ROLL_DEPTH;
        }

        finite_or_zero(angle2(elbow.x - shoulder.x, dz))
    }

    /// Elbow roll, the bend between upper arm and forearm.
    ///
    /// A straight arm yields 0 degrees, a fully folded arm 180 degrees.
    fn elbow_roll(shoulder: &Joint3D, elbow: &Joint3D, wrist: &Joint3D) -> f64 {
        let forearm = distance(elbow, wrist);
        let upper_arm = distance(shoulder, elbow);
        let shoulder_to_wrist = distance(shoulder, wrist);

        if forearm * upper_arm == 0.0 {
            return 0.0;
        }

        // law of cosines, for the interior angle at the elbow
        let cos_elbow = (forearm.powi(2) + upper_arm.powi(2) - shoulder_to_wrist.powi(2))
            / (2.0 * forearm * upper_arm);

        finite_or_zero(180.0 - cos_elbow.clamp(-1.0, 1.0).acos().to_degrees())
    }

    /// Elbow yaw, from the forearm direction and the already computed shoulder pitch of this
    /// arm.
    fn elbow_yaw(elbow: &Joint3D, wrist: &Joint3D, shoulder_pitch: f64) -> f64 {
        let dx = wrist.x - elbow.x;
        let dy = wrist.y - elbow.y;
        let dz = wrist.z - elbow.z;

        if dy.abs() < FOREARM_EXTENDED_TOLERANCE
            && dz.abs() < FOREARM_EXTENDED_TOLERANCE
            && Self::wrist_is_outward(elbow, wrist)
        {
            return 0.0;
        }

        if dx.abs() < FOREARM_HANGING_TOLERANCE
            && dz.abs() < FOREARM_HANGING_TOLERANCE
            && elbow.y > wrist.y
        {
            return Self::HANGING_ELBOW_YAW;
        }

        let forearm = angle2(dz, dy + DENOMINATOR_EPSILON);
        finite_or_zero(Self::elbow_yaw_from_forearm(forearm, shoulder_pitch))
    }

    /// Computes all four joint angles of the arm.
    ///
    /// The shoulder pitch is computed first, as the elbow yaw depends on it.
    fn arm_angles(pose: &ArmPose) -> ArmJoints<f64> {
        let ArmPose {
            shoulder,
            elbow,
            wrist,
        } = pose;

        let shoulder_pitch = Self::shoulder_pitch(shoulder, elbow);

        ArmJoints {
            shoulder_pitch,
            shoulder_roll: Self::shoulder_roll(shoulder, elbow),
            elbow_roll: Self::elbow_roll(shoulder, elbow, wrist),
            elbow_yaw: Self::elbow_yaw(elbow, wrist, shoulder_pitch),
        }
    }
}

impl ArmKinematics for Right {
    const HANGING_ELBOW_YAW: f64 = 90.0;

    fn wrist_is_outward(elbow: &Joint3D, wrist: &Joint3D) -> bool {
        elbow.x < wrist.x
    }

    fn elbow_yaw_from_forearm(forearm: f64, shoulder_pitch: f64) -> f64 {
        -(forearm - shoulder_pitch)
    }
}

impl ArmKinematics for Left {
    const HANGING_ELBOW_YAW: f64 = -90.0;

    fn wrist_is_outward(elbow: &Joint3D, wrist: &Joint3D) -> bool {
        elbow.x > wrist.x
    }

    fn elbow_yaw_from_forearm(forearm: f64, shoulder_pitch: f64) -> f64 {
        -(forearm + shoulder_pitch)
    }
}

/// Replaces raw shoulder pitches below [`SHOULDER_PITCH_FLOOR_TRIGGER`] by
/// [`SHOULDER_PITCH_FLOOR`].
///
/// This is applied before, and independently of, the mechanical joint limits.
#[must_use]
pub fn floor_shoulder_pitch(degrees: f64) -> f64 {
    if degrees < SHOULDER_PITCH_FLOOR_TRIGGER {
        SHOULDER_PITCH_FLOOR
    } else {
        degrees
    }
}

//! The retargeting pipeline, from a skeleton frame to a robot command.
use crate::angles::{ArmKinematics, Left, Right};
use crate::error::RetargetError;
use crate::joints::UpperBodyJoints;
use crate::limits::{CommandVector, RawAngles, to_command};
use crate::skeleton::{SkeletonFrame, UpperBodyPose};

/// Computes the raw joint angles of both arms.
#[must_use]
pub fn raw_angles(pose: &UpperBodyPose) -> RawAngles {
    RawAngles(UpperBodyJoints {
        right_arm: Right::arm_angles(&pose.right_arm),
        left_arm: Left::arm_angles(&pose.left_arm),
    })
}

/// Retargets a skeleton frame onto the robot's arms.
///
/// The frame is validated first: a missing joint or non-finite coordinate rejects the whole
/// frame. Otherwise, all eight joint angles are computed and mapped onto the robot's
/// conventions and limits.
///
/// This function is pure, calling it twice with the same frame yields the same command.
pub fn retarget(frame: &SkeletonFrame) -> Result<CommandVector, RetargetError> {
    let pose = frame.pose()?;

    Ok(to_command(&raw_angles(&pose)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::{Joint3D, SkeletonJoint};

    fn frame() -> SkeletonFrame {
        [
            (SkeletonJoint::ShoulderRight, Joint3D::new(0.18, 0.35, 2.1)),
            (SkeletonJoint::ElbowRight, Joint3D::new(0.22, 0.1, 2.05)),
            (SkeletonJoint::WristRight, Joint3D::new(0.2, 0.12, 1.8)),
            (SkeletonJoint::ShoulderLeft, Joint3D::new(-0.18, 0.35, 2.1)),
            (SkeletonJoint::ElbowLeft, Joint3D::new(-0.3, 0.5, 2.0)),
            (SkeletonJoint::WristLeft, Joint3D::new(-0.32, 0.75, 2.0)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn raw_angles_slot_order() {
        let pose = frame().pose().unwrap();
        let raw = raw_angles(&pose);

        let right = &pose.right_arm;
        assert_eq!(
            raw.0.right_arm.shoulder_roll,
            Right::shoulder_roll(&right.shoulder, &right.elbow)
        );

        let left = &pose.left_arm;
        let left_pitch = Left::shoulder_pitch(&left.shoulder, &left.elbow);
        assert_eq!(raw.0.left_arm.shoulder_pitch, left_pitch);
        assert_eq!(
            raw.0.left_arm.elbow_yaw,
            Left::elbow_yaw(&left.elbow, &left.wrist, left_pitch)
        );
    }

    #[test]
    fn rejects_before_computing() {
        let mut frame = frame();
        frame.remove(SkeletonJoint::ShoulderLeft);

        assert_eq!(
            retarget(&frame),
            Err(RetargetError::MissingJoint(SkeletonJoint::ShoulderLeft))
        );
    }

    #[test]
    fn pure() {
        let frame = frame();
        assert_eq!(retarget(&frame), retarget(&frame));
    }
}

//! Retargeting of a tracked human skeleton onto the arms of the NAO.
//!
//! The shoulder, elbow and wrist positions of both arms are turned into eight joint angles
//! (shoulder pitch, shoulder roll, elbow roll and elbow yaw per arm) using a set of geometric
//! heuristics, then converted into the robot's sign conventions and clamped to its mechanical
//! limits.
//!
//! ```
//! use retarget::{Joint3D, SkeletonFrame, SkeletonJoint, retarget};
//!
//! let mut frame = SkeletonFrame::new();
//! for side in [1.0, -1.0] {
//!     let (shoulder, elbow, wrist) = if side > 0.0 {
//!         (SkeletonJoint::ShoulderRight, SkeletonJoint::ElbowRight, SkeletonJoint::WristRight)
//!     } else {
//!         (SkeletonJoint::ShoulderLeft, SkeletonJoint::ElbowLeft, SkeletonJoint::WristLeft)
//!     };
//!
//!     frame
//!         .insert(shoulder, Joint3D::new(0.2 * side, 0.4, 2.0))
//!         .insert(elbow, Joint3D::new(0.25 * side, 0.15, 2.0))
//!         .insert(wrist, Joint3D::new(0.27 * side, -0.05, 1.9));
//! }
//!
//! let command = retarget(&frame)?;
//! assert_eq!(command.to_array().len(), 8);
//! # Ok::<(), retarget::RetargetError>(())
//! ```
pub mod angles;
pub mod error;
pub mod geometry;
pub mod interface;
pub mod joints;
pub mod limits;
pub mod pipeline;
pub mod skeleton;
pub mod teleop;

pub use error::{DecodeError, Error, Result, RetargetError};
pub use interface::{CommandSink, FrameSource};
pub use joints::{ArmJoints, JOINT_NAMES, UpperBodyJoints};
pub use limits::{CommandVector, JointLimit, NAO_ARM_LIMITS, RawAngles, Speed, to_command};
pub use pipeline::{raw_angles, retarget};
pub use skeleton::{ArmPose, Axis, Joint3D, SkeletonFrame, SkeletonJoint, UpperBodyPose};
pub use teleop::{TeleopStats, Teleoperator};

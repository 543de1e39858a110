//! Boundaries to the transport delivering frames and the robot executing commands.
//!
//! Neither trait assumes a particular transport, runtime or robot SDK.
use crate::error::Result;
use crate::limits::{CommandVector, Speed};
use crate::skeleton::SkeletonFrame;

/// A lazy sequence of skeleton frames.
///
/// A source may drop frames when it cannot keep up, only the latest frame matters.
pub trait FrameSource {
    /// The next frame, or `None` once the source is exhausted.
    fn next_frame(&mut self) -> Option<Result<SkeletonFrame>>;
}

impl<I> FrameSource for I
where
    I: Iterator<Item = Result<SkeletonFrame>>,
{
    fn next_frame(&mut self) -> Option<Result<SkeletonFrame>> {
        self.next()
    }
}

/// The actuation session of the robot.
pub trait CommandSink {
    /// Whether the session can currently accept commands.
    fn is_usable(&self) -> bool;

    /// Moves the joints named in [`JOINT_NAMES`](crate::JOINT_NAMES) to the commanded positions, at
    /// a fraction of their maximum speed.
    ///
    /// This must not block: the command is handed off and the call returns immediately.
    fn set_angles(&mut self, command: &CommandVector, speed: Speed) -> Result<()>;

    /// Releases the stiffness of all joints, letting the robot go limp.
    fn release_stiffness(&mut self) -> Result<()>;
}

impl<S: CommandSink + ?Sized> CommandSink for &mut S {
    fn is_usable(&self) -> bool {
        (**self).is_usable()
    }

    fn set_angles(&mut self, command: &CommandVector, speed: Speed) -> Result<()> {
        (**self).set_angles(command, speed)
    }

    fn release_stiffness(&mut self) -> Result<()> {
        (**self).release_stiffness()
    }
}

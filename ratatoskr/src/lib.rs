//! Teleoperation of the NAO's arms from a depth sensor skeleton stream.
//!
//! Skeleton frames arrive as JSON, either live over UDP or from a recording, and are retargeted
//! using the [`retarget`] crate. The resulting joint commands are sent to a motion bridge running
//! on the robot.
pub mod actuation;
pub mod cli;
pub mod config;
pub mod receive;
pub mod replay;

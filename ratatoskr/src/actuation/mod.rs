//! The robot side of a teleoperation session.
use miette::Result;
use retarget::{CommandSink, CommandVector, Speed};

use crate::config::ActuationConfig;

pub mod bridge;
pub mod dry_run;

pub use bridge::{BridgeMessage, BridgeSink};
pub use dry_run::DryRunSink;

/// The [`CommandSink`] selected on the command line.
pub enum Actuation {
    Bridge(BridgeSink),
    DryRun(DryRunSink),
}

impl Actuation {
    /// Creates the sink, connecting to the motion bridge unless `dry_run` is set.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(config: &ActuationConfig, dry_run: bool) -> Self {
        if dry_run {
            tracing::info!("dry run, commands are logged instead of sent");
            return Self::DryRun(DryRunSink::default());
        }

        tracing::info!(address = %config.robot_address, "connecting to motion bridge");
        Self::Bridge(BridgeSink::spawn(config))
    }

    /// Shuts the sink down, flushing any pending stiffness release.
    pub async fn close(self) -> Result<()> {
        match self {
            Self::Bridge(sink) => sink.close().await,
            Self::DryRun(_) => Ok(()),
        }
    }
}

impl CommandSink for Actuation {
    fn is_usable(&self) -> bool {
        match self {
            Self::Bridge(sink) => sink.is_usable(),
            Self::DryRun(sink) => sink.is_usable(),
        }
    }

    fn set_angles(&mut self, command: &CommandVector, speed: Speed) -> retarget::Result<()> {
        match self {
            Self::Bridge(sink) => sink.set_angles(command, speed),
            Self::DryRun(sink) => sink.set_angles(command, speed),
        }
    }

    fn release_stiffness(&mut self) -> retarget::Result<()> {
        match self {
            Self::Bridge(sink) => sink.release_stiffness(),
            Self::DryRun(sink) => sink.release_stiffness(),
        }
    }
}

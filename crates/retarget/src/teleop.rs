//! Per-message handling of a teleoperation stream.
use crate::error::{Error, Result};
use crate::interface::{CommandSink, FrameSource};
use crate::limits::{CommandVector, Speed, to_command};
use crate::pipeline::raw_angles;
use crate::skeleton::SkeletonFrame;

/// Counters of a [`Teleoperator`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TeleopStats {
    /// Frames and payloads handed to the teleoperator.
    pub received: u64,
    /// Commands handed to the sink.
    pub dispatched: u64,
    /// Commands dropped because the session was not usable.
    pub dropped: u64,
    /// Payloads and frames that could not be retargeted.
    pub rejected: u64,
}

/// Retargets incoming frames and forwards the commands to a [`CommandSink`].
///
/// Every frame is handled on its own, no state is carried over between frames apart from the
/// counters.
#[derive(Debug)]
pub struct Teleoperator<S> {
    sink: S,
    speed: Speed,
    mirror: bool,
    stats: TeleopStats,
}

impl<S: CommandSink> Teleoperator<S> {
    pub fn new(sink: S, speed: Speed) -> Self {
        Self {
            sink,
            speed,
            mirror: false,
            stats: TeleopStats::default(),
        }
    }

    /// Mirror every frame before retargeting, so the robot moves like a reflection of the
    /// operator.
    #[must_use]
    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    #[must_use]
    pub fn stats(&self) -> TeleopStats {
        self.stats
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Decodes a raw sensor payload and handles the resulting frame.
    pub fn handle_payload(&mut self, payload: &[u8]) -> Result<CommandVector> {
        match SkeletonFrame::from_json(payload) {
            Ok(frame) => self.handle_frame(&frame),
            Err(error) => {
                self.stats.received += 1;
                self.stats.rejected += 1;
                Err(error.into())
            }
        }
    }

    /// Retargets a frame and dispatches the command.
    ///
    /// Returns [`Error::ActuationUnavailable`] if the session is not usable, in which case the
    /// command is dropped.
    pub fn handle_frame(&mut self, frame: &SkeletonFrame) -> Result<CommandVector> {
        self.stats.received += 1;

        let pose = if self.mirror {
            frame.mirrored().pose()
        } else {
            frame.pose()
        };

        let raw = pose
            .map(|pose| raw_angles(&pose))
            .inspect_err(|_| self.stats.rejected += 1)?;
        let command = to_command(&raw);

        if !self.sink.is_usable() {
            self.stats.dropped += 1;
            return Err(Error::ActuationUnavailable);
        }

        self.sink.set_angles(&command, self.speed)?;
        self.stats.dispatched += 1;

        tracing::debug!(
            degrees = ?raw
                .0
                .named()
                .map(|(name, degrees)| (name, (degrees * 100.0).round() / 100.0))
                .collect::<Vec<_>>(),
            "dispatched joint command"
        );

        Ok(command)
    }

    /// Handles every frame of `source`, until it is exhausted.
    ///
    /// Errors are logged and the offending frame is skipped.
    pub fn run(&mut self, mut source: impl FrameSource) -> TeleopStats {
        while let Some(next) = source.next_frame() {
            let result = match next {
                Ok(frame) => self.handle_frame(&frame),
                Err(error) => {
                    self.stats.received += 1;
                    self.stats.rejected += 1;
                    Err(error)
                }
            };

            if let Err(error) = result {
                log_error(&error);
            }
        }

        self.stats
    }

    /// Releases the robot's stiffness and returns the sink.
    pub fn shutdown(mut self) -> S {
        match self.sink.release_stiffness() {
            Ok(()) => tracing::info!("released joint stiffness"),
            Err(error) => tracing::error!(?error, "failed to release joint stiffness"),
        }

        tracing::info!(stats = ?self.stats, "teleoperation stopped");
        self.sink
    }
}

/// Logs an error from [`Teleoperator::handle_frame`] at an appropriate level.
pub fn log_error(error: &Error) {
    match error {
        Error::ActuationUnavailable => tracing::warn!("{error}"),
        Error::Decode(error) => tracing::error!(%error, "failed to decode skeleton frame"),
        Error::InvalidFrame(error) => tracing::error!(%error, "discarded skeleton frame"),
        error => tracing::error!(%error, "failed to handle skeleton frame"),
    }
}

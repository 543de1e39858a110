use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::Duration;

use clap::Parser;
use miette::{IntoDiagnostic, Result, miette};
use retarget::{CommandSink, Teleoperator};

use crate::actuation::Actuation;
use crate::cli::{ConfigOpts, shutdown_signal};
use crate::replay::ReplaySource;

#[derive(Parser)]
/// Retarget a recording of skeleton frames onto the robot.
pub struct Replay {
    #[clap(flatten)]
    pub config: ConfigOpts,

    /// File containing the recorded skeleton frames
    pub recording: PathBuf,

    /// Frames per second, frames are replayed as fast as possible if omitted
    #[clap(long)]
    pub rate: Option<f64>,
}

impl Replay {
    pub async fn replay(self) -> Result<()> {
        let rate = self.rate.map(check_rate).transpose()?;
        let config = self.config.load()?;

        let mut source = ReplaySource::open(&self.recording)?;
        if let Some(rate) = rate {
            source = source.with_rate(rate);
        }
        let stop = source.stop_flag();

        let actuation = Actuation::new(&config.actuation, self.config.dry_run);
        if !wait_until_usable(&actuation).await {
            return actuation.close().await;
        }

        let mut teleop =
            Teleoperator::new(actuation, config.actuation.speed).with_mirror(self.config.mirror);
        let mut replay = tokio::task::spawn_blocking(move || {
            let stats = teleop.run(source);
            (teleop, stats)
        });

        let (teleop, stats) = tokio::select! {
            result = &mut replay => result.into_diagnostic()?,
            () = shutdown_signal() => {
                stop.store(true, Ordering::Relaxed);
                replay.await.into_diagnostic()?
            }
        };

        tracing::info!(
            recording = %self.recording.display(),
            ?stats,
            "replay finished"
        );

        teleop.shutdown().close().await
    }
}

fn check_rate(rate: f64) -> Result<f64> {
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(miette!(
            "`--rate` must be a positive number of frames per second, got {rate}"
        ))
    }
}

/// Waits until the session accepts commands, returns `false` if Ctrl-C was pressed first.
async fn wait_until_usable(actuation: &Actuation) -> bool {
    const POLL_INTERVAL: Duration = Duration::from_millis(10);

    if actuation.is_usable() {
        return true;
    }

    tracing::info!("waiting for the motion bridge");
    let usable = async {
        while !actuation.is_usable() {
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    };

    tokio::select! {
        () = usable => true,
        () = shutdown_signal() => false,
    }
}

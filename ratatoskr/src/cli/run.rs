use std::future::Future;
use std::net::SocketAddr;

use clap::Parser;
use miette::Result;
use retarget::teleop::log_error;
use retarget::{CommandSink, Teleoperator};

use crate::actuation::Actuation;
use crate::cli::{ConfigOpts, shutdown_signal};
use crate::receive::{FrameReceiver, LatestPayload};

#[derive(Parser)]
/// Retarget a live skeleton stream onto the robot, until Ctrl-C is pressed.
pub struct Run {
    #[clap(flatten)]
    pub config: ConfigOpts,

    /// Address to receive skeleton frames on, overrides `source.address`
    #[clap(long)]
    pub listen: Option<SocketAddr>,
}

impl Run {
    pub async fn run(self) -> Result<()> {
        let mut config = self.config.load()?;
        if let Some(listen) = self.listen {
            config.source.address = listen;
        }

        let receiver = FrameReceiver::bind(&config.source).await?;
        tracing::info!(address = %receiver.local_addr()?, "listening for skeleton frames");
        let latest = receiver.spawn();

        let actuation = Actuation::new(&config.actuation, self.config.dry_run);
        let mut teleop =
            Teleoperator::new(actuation, config.actuation.speed).with_mirror(self.config.mirror);

        teleoperate(&mut teleop, latest, shutdown_signal()).await;

        teleop.shutdown().close().await
    }
}

/// Handles the latest payload whenever a new one arrives, until `shutdown` completes or the
/// receiver stops.
///
/// Payloads arriving while a previous one is handled replace each other, only the most recent is
/// retargeted.
pub async fn teleoperate<S: CommandSink>(
    teleop: &mut Teleoperator<S>,
    mut latest: LatestPayload,
    shutdown: impl Future<Output = ()>,
) {
    let mut shutdown = std::pin::pin!(shutdown);

    loop {
        tokio::select! {
            () = &mut shutdown => break,
            changed = latest.changed() => {
                if changed.is_err() {
                    tracing::warn!("frame receiver stopped");
                    break;
                }

                let payload = latest.borrow_and_update().clone();
                let Some(payload) = payload else {
                    continue;
                };

                if let Err(error) = teleop.handle_payload(&payload) {
                    log_error(&error);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use retarget::{Speed, TeleopStats};
    use tokio::sync::watch;

    use super::*;
    use crate::actuation::DryRunSink;

    const PAYLOAD: &[u8] = br#"{
        "ShoulderRight": { "X": 0.2, "Y": 0.4, "Z": 2.0 },
        "ElbowRight": { "X": 0.25, "Y": 0.15, "Z": 2.0 },
        "WristRight": { "X": 0.27, "Y": -0.05, "Z": 1.9 },
        "ShoulderLeft": { "X": -0.2, "Y": 0.4, "Z": 2.0 },
        "ElbowLeft": { "X": -0.25, "Y": 0.15, "Z": 2.0 },
        "WristLeft": { "X": -0.27, "Y": -0.05, "Z": 1.9 }
    }"#;

    #[tokio::test]
    async fn handles_latest_payload() {
        let (tx, latest) = watch::channel(None);
        let mut teleop = Teleoperator::new(DryRunSink::default(), Speed::DEFAULT);

        // only the most recent of these is seen
        tx.send(Some(b"not json".to_vec())).unwrap();
        tx.send(Some(PAYLOAD.to_vec())).unwrap();
        drop(tx);

        teleoperate(&mut teleop, latest, std::future::pending()).await;

        assert_eq!(
            teleop.stats(),
            TeleopStats {
                received: 1,
                dispatched: 1,
                ..Default::default()
            }
        );
        assert_eq!(teleop.sink().commands(), 1);
    }

    #[tokio::test]
    async fn stops_on_shutdown() {
        let (_tx, latest) = watch::channel(None);
        let mut teleop = Teleoperator::new(DryRunSink::default(), Speed::DEFAULT);

        teleoperate(&mut teleop, latest, std::future::ready(())).await;

        let sink = teleop.shutdown();
        assert!(!sink.is_usable());
        assert_eq!(sink.commands(), 0);
    }
}

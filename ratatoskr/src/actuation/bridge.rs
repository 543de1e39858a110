//! Actuation through a motion bridge running on the robot.
//!
//! The bridge accepts newline delimited JSON messages over TCP. Once connected, the stiffness of
//! the whole body is set, after which every command is forwarded as a `set_angles` message.
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use miette::{IntoDiagnostic, Result};
use retarget::{CommandSink, CommandVector, JOINT_NAMES, Speed};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

use crate::config::ActuationConfig;

/// The joint chain covering every joint of the robot.
pub const BODY_CHAIN: &str = "Body";

/// A message sent to the motion bridge.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum BridgeMessage {
    SetStiffness {
        chain: String,
        value: f32,
    },
    SetAngles {
        names: Vec<String>,
        angles: Vec<f64>,
        speed: f64,
    },
}

impl BridgeMessage {
    #[must_use]
    pub fn stiffness(value: f32) -> Self {
        Self::SetStiffness {
            chain: BODY_CHAIN.to_owned(),
            value,
        }
    }

    #[must_use]
    pub fn angles(command: &CommandVector, speed: Speed) -> Self {
        Self::SetAngles {
            names: JOINT_NAMES.map(str::to_owned).to_vec(),
            angles: command.to_array().to_vec(),
            speed: speed.fraction(),
        }
    }

    fn encode(&self) -> std::io::Result<Vec<u8>> {
        let mut line = serde_json::to_vec(self)?;
        line.push(b'\n');
        Ok(line)
    }
}

/// How an established session ended.
enum SessionEnd {
    /// The stiffness was released, no further commands will follow.
    Released,
    /// The sink was closed without releasing the stiffness.
    Closed,
}

/// A [`CommandSink`] forwarding commands to the motion bridge.
///
/// The connection is managed by a background task, which keeps reconnecting while the bridge is
/// unreachable. Only the latest command is kept, commands that arrive faster than they can be
/// written are overwritten.
pub struct BridgeSink {
    latest: watch::Sender<Option<BridgeMessage>>,
    release: Option<oneshot::Sender<()>>,
    connected: Arc<AtomicBool>,
    writer: JoinHandle<()>,
}

impl BridgeSink {
    /// Spawns the connection task on the current tokio runtime.
    #[must_use]
    pub fn spawn(config: &ActuationConfig) -> Self {
        let (latest, latest_rx) = watch::channel(None);
        let (release, release_rx) = oneshot::channel();
        let connected = Arc::new(AtomicBool::new(false));

        let writer = tokio::spawn(maintain_session(
            config.clone(),
            latest_rx,
            release_rx,
            connected.clone(),
        ));

        Self {
            latest,
            release: Some(release),
            connected,
            writer,
        }
    }

    /// Stops the connection task, waiting until a pending stiffness release has been written.
    pub async fn close(self) -> Result<()> {
        let Self {
            latest,
            release,
            writer,
            ..
        } = self;

        drop(latest);
        drop(release);

        writer.await.into_diagnostic()
    }
}

impl CommandSink for BridgeSink {
    fn is_usable(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    fn set_angles(&mut self, command: &CommandVector, speed: Speed) -> retarget::Result<()> {
        self.latest
            .send_replace(Some(BridgeMessage::angles(command, speed)));

        Ok(())
    }

    fn release_stiffness(&mut self) -> retarget::Result<()> {
        if !self.is_usable() {
            return Err(retarget::Error::ActuationUnavailable);
        }

        self.release
            .take()
            .and_then(|release| release.send(()).ok())
            .ok_or(retarget::Error::ActuationUnavailable)
    }
}

async fn maintain_session(
    config: ActuationConfig,
    mut latest: watch::Receiver<Option<BridgeMessage>>,
    mut release: oneshot::Receiver<()>,
    connected: Arc<AtomicBool>,
) {
    loop {
        let stream = tokio::select! {
            biased;
            _ = &mut release => return,
            stream = connect(config.robot_address, config.connect_timeout) => stream,
        };

        let end = match stream {
            Ok(stream) => {
                tracing::info!(address = %config.robot_address, "connected to motion bridge");
                let end =
                    run_session(stream, &config, &mut latest, &mut release, &connected).await;
                connected.store(false, Ordering::Release);
                end
            }
            Err(error) => Err(error),
        };

        match end {
            Ok(SessionEnd::Released) => {
                tracing::info!("motion bridge session ended");
                return;
            }
            Ok(SessionEnd::Closed) => return,
            Err(error) => tracing::warn!(
                address = %config.robot_address,
                %error,
                "motion bridge unavailable, retrying in {:?}",
                config.reconnect_interval,
            ),
        }

        tokio::select! {
            biased;
            _ = &mut release => return,
            () = tokio::time::sleep(config.reconnect_interval) => {},
        }
    }
}

async fn connect(address: SocketAddr, timeout: Duration) -> std::io::Result<TcpStream> {
    let stream = tokio::time::timeout(timeout, TcpStream::connect(address)).await??;
    stream.set_nodelay(true)?;

    Ok(stream)
}

async fn run_session(
    stream: TcpStream,
    config: &ActuationConfig,
    latest: &mut watch::Receiver<Option<BridgeMessage>>,
    release: &mut oneshot::Receiver<()>,
    connected: &AtomicBool,
) -> std::io::Result<SessionEnd> {
    let (read_half, mut write_half) = stream.into_split();
    let mut replies = BufReader::new(read_half).lines();

    send(&mut write_half, &BridgeMessage::stiffness(config.stiffness)).await?;

    // commands issued while disconnected are stale
    latest.mark_unchanged();
    connected.store(true, Ordering::Release);

    loop {
        tokio::select! {
            biased;
            released = &mut *release => {
                if released.is_err() {
                    return Ok(SessionEnd::Closed);
                }

                connected.store(false, Ordering::Release);
                if let Err(error) = release_stiffness(&mut write_half).await {
                    tracing::error!(%error, "failed to write stiffness release");
                }

                return Ok(SessionEnd::Released);
            }
            changed = latest.changed() => {
                if changed.is_err() {
                    return Ok(SessionEnd::Closed);
                }

                let message = latest.borrow_and_update().clone();
                if let Some(message) = message {
                    send(&mut write_half, &message).await?;
                }
            }
            reply = replies.next_line() => match reply? {
                Some(reply) => tracing::trace!(%reply, "motion bridge reply"),
                None => {
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::ConnectionAborted,
                        "motion bridge closed the connection",
                    ));
                }
            },
        }
    }
}

async fn release_stiffness(write_half: &mut OwnedWriteHalf) -> std::io::Result<()> {
    send(write_half, &BridgeMessage::stiffness(0.0)).await?;
    write_half.shutdown().await
}

async fn send(write_half: &mut OwnedWriteHalf, message: &BridgeMessage) -> std::io::Result<()> {
    write_half.write_all(&message.encode()?).await
}

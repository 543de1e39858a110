//! Reception of skeleton frames over UDP.
use std::net::{IpAddr, SocketAddr};

use miette::{IntoDiagnostic, Result, WrapErr};
use tokio::net::UdpSocket;
use tokio::sync::watch;

use crate::config::SourceConfig;

/// The latest received payload, `None` until the first datagram arrives.
pub type LatestPayload = watch::Receiver<Option<Vec<u8>>>;

/// A UDP socket receiving one skeleton frame per datagram.
pub struct FrameReceiver {
    socket: UdpSocket,
    max_datagram_size: usize,
    allowed_sender: Option<IpAddr>,
}

impl FrameReceiver {
    pub async fn bind(config: &SourceConfig) -> Result<Self> {
        let socket = UdpSocket::bind(config.address)
            .await
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to bind frame socket on {}", config.address))?;

        Ok(Self {
            socket,
            max_datagram_size: config.max_datagram_size,
            allowed_sender: config.allowed_sender,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket.local_addr().into_diagnostic()
    }

    /// Spawns the receive loop, returning a receiver that always holds the latest payload.
    ///
    /// Payloads that are not picked up before the next one arrives are overwritten. The loop
    /// stops once the returned receiver is dropped.
    #[must_use]
    pub fn spawn(self) -> LatestPayload {
        let (tx, rx) = watch::channel(None);
        tokio::spawn(self.receive_loop(tx));

        rx
    }

    async fn receive_loop(self, tx: watch::Sender<Option<Vec<u8>>>) {
        let mut buffer = vec![0u8; self.max_datagram_size];

        loop {
            let received = tokio::select! {
                received = self.socket.recv_from(&mut buffer) => received,
                () = tx.closed() => return,
            };

            let (size, address) = match received {
                Ok(received) => received,
                Err(error) => {
                    tracing::error!(%error, "failed to receive skeleton frame");
                    continue;
                }
            };

            if self
                .allowed_sender
                .is_some_and(|allowed_sender| allowed_sender != address.ip())
            {
                tracing::trace!(%address, "ignored datagram from unknown sender");
                continue;
            }

            if tx.send(Some(buffer[..size].to_vec())).is_err() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    async fn receiver(allowed_sender: Option<IpAddr>) -> (SocketAddr, LatestPayload) {
        let receiver = FrameReceiver::bind(&SourceConfig {
            address: "127.0.0.1:0".parse().unwrap(),
            max_datagram_size: 1024,
            allowed_sender,
        })
        .await
        .unwrap();

        (receiver.local_addr().unwrap(), receiver.spawn())
    }

    async fn next_payload(latest: &mut LatestPayload) -> Option<Vec<u8>> {
        tokio::time::timeout(TIMEOUT, latest.changed())
            .await
            .unwrap()
            .unwrap();

        latest.borrow_and_update().clone()
    }

    #[tokio::test]
    async fn receives_datagrams() {
        let (address, mut latest) = receiver(None).await;
        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();

        sender.send_to(b"{\"frame\": 1}", address).await.unwrap();
        assert_eq!(
            next_payload(&mut latest).await.as_deref(),
            Some(b"{\"frame\": 1}".as_slice())
        );

        sender.send_to(b"{\"frame\": 2}", address).await.unwrap();
        assert_eq!(
            next_payload(&mut latest).await.as_deref(),
            Some(b"{\"frame\": 2}".as_slice())
        );
    }

    #[tokio::test]
    async fn ignores_unknown_senders() {
        let (address, mut latest) = receiver(Some("10.0.8.1".parse().unwrap())).await;
        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();

        sender.send_to(b"{}", address).await.unwrap();
        let result = tokio::time::timeout(Duration::from_millis(100), latest.changed()).await;

        assert!(result.is_err());
        assert_eq!(*latest.borrow(), None);
    }
}

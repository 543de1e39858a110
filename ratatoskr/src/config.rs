//! Configuration of the teleoperation binary.
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use miette::{Result, miette};
use odal::Config;
use retarget::Speed;
use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};

/// Configuration for ratatoskr, stored in `ratatoskr.toml`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RatatoskrConfig {
    pub source: SourceConfig,
    pub actuation: ActuationConfig,
}

impl Config for RatatoskrConfig {
    const PATH: &'static str = "ratatoskr.toml";
}

impl RatatoskrConfig {
    /// Checks the values that cannot be expressed in the type system.
    pub fn validate(&self) -> Result<()> {
        if self.source.max_datagram_size == 0 {
            return Err(miette!("`source.max_datagram_size` must be larger than zero"));
        }

        if !(0.0..=1.0).contains(&self.actuation.stiffness) {
            return Err(miette!(
                "`actuation.stiffness` must lie within 0.0..=1.0, got {}",
                self.actuation.stiffness
            ));
        }

        Ok(())
    }
}

/// Configuration of the skeleton frame receiver.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// The UDP address skeleton frames are received on.
    pub address: SocketAddr,
    /// Size of the receive buffer, larger datagrams are truncated.
    pub max_datagram_size: usize,
    /// If set, datagrams from any other sender are ignored.
    #[serde(default)]
    pub allowed_sender: Option<IpAddr>,
}

/// Configuration of the robot's actuation session.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ActuationConfig {
    /// Address of the motion bridge on the robot.
    pub robot_address: SocketAddr,
    /// Fraction of the maximum joint speed used for every command.
    pub speed: Speed,
    /// Stiffness applied to all joints once a session is established.
    pub stiffness: f32,
    /// Maximum time spent on a single connection attempt.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub connect_timeout: Duration,
    /// The delay between connection attempts while the session is down.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub reconnect_interval: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    const CONFIG: &str = r#"
        [source]
        address = "0.0.0.0:7000"
        max_datagram_size = 65536

        [actuation]
        robot_address = "127.0.0.1:9559"
        speed = 0.2
        stiffness = 1.0
        connect_timeout = 2000
        reconnect_interval = 1000
    "#;

    fn load(overlay: Option<&str>) -> odal::Result<RatatoskrConfig> {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join(RatatoskrConfig::PATH), CONFIG).unwrap();

        let overlay_root = root.path().join("overlay/sam");
        if let Some(overlay) = overlay {
            fs::create_dir_all(&overlay_root).unwrap();
            fs::write(overlay_root.join(RatatoskrConfig::PATH), overlay).unwrap();
        }

        RatatoskrConfig::load_with_overlay(root.path(), &overlay_root)
    }

    #[test]
    fn parse_config() {
        let config = load(None).unwrap();

        assert_eq!(config.source.address, "0.0.0.0:7000".parse().unwrap());
        assert_eq!(config.source.allowed_sender, None);
        assert_eq!(config.actuation.speed, Speed::DEFAULT);
        assert_eq!(config.actuation.connect_timeout, Duration::from_secs(2));
        assert_eq!(config.actuation.reconnect_interval, Duration::from_secs(1));
        config.validate().unwrap();
    }

    #[test]
    fn robot_overlay() {
        let config = load(Some(
            r#"
            [source]
            allowed_sender = "10.0.8.1"

            [actuation]
            robot_address = "10.0.8.20:9559"
            "#,
        ))
        .unwrap();

        assert_eq!(
            config.source.allowed_sender,
            Some("10.0.8.1".parse().unwrap())
        );
        assert_eq!(
            config.actuation.robot_address,
            "10.0.8.20:9559".parse().unwrap()
        );
        assert_eq!(config.actuation.stiffness, 1.0);
    }

    #[test]
    fn speed_out_of_range() {
        let result = load(Some("[actuation]\nspeed = 1.5"));

        assert!(matches!(result, Err(odal::Error::Deserialize { .. })));
    }

    #[test]
    fn stiffness_out_of_range() {
        let config = load(Some("[actuation]\nstiffness = 2.0")).unwrap();

        assert!(config.validate().is_err());
    }
}

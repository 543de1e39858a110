use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;
use miette::Result;
use odal::Config;
use retarget::Speed;

use crate::config::RatatoskrConfig;

pub mod replay;
pub mod run;

#[derive(Parser)]
#[clap(name = "ratatoskr", version)]
/// Teleoperate the NAO's arms with a depth sensor skeleton stream.
pub struct Cli {
    #[clap(subcommand)]
    pub action: Commands,

    /// Enable verbose logging
    #[clap(short, global = true)]
    pub v: bool,
}

#[derive(Parser)]
pub enum Commands {
    Run(run::Run),
    Replay(replay::Replay),
}

/// Options shared by every command that drives the robot.
#[derive(Parser, Debug, Clone)]
pub struct ConfigOpts {
    /// Directory containing `ratatoskr.toml`
    #[clap(long, default_value = "config")]
    pub config_root: PathBuf,

    /// Apply the config overlay in `<config-root>/overlay/<robot-name>`
    #[clap(long, short = 'r')]
    pub robot_name: Option<String>,

    /// IP address of the robot's motion bridge
    #[clap(long)]
    pub robot_ip: Option<IpAddr>,

    /// Port of the robot's motion bridge
    #[clap(long)]
    pub robot_port: Option<u16>,

    /// Fraction of the maximum joint speed, within 0.0..=1.0
    #[clap(long)]
    pub speed: Option<f64>,

    /// Log commands instead of sending them to the robot
    #[clap(long)]
    pub dry_run: bool,

    /// Mirror the operator, so the robot moves like a reflection
    #[clap(long)]
    pub mirror: bool,
}

impl ConfigOpts {
    /// Loads the configuration and applies the command line overrides.
    pub fn load(&self) -> Result<RatatoskrConfig> {
        let mut config = match &self.robot_name {
            Some(robot_name) => RatatoskrConfig::load_with_overlay(
                &self.config_root,
                self.config_root.join("overlay").join(robot_name),
            )?,
            None => RatatoskrConfig::load(&self.config_root)?,
        };

        let robot_address = &mut config.actuation.robot_address;
        if let Some(robot_ip) = self.robot_ip {
            *robot_address = SocketAddr::new(robot_ip, robot_address.port());
        }
        if let Some(robot_port) = self.robot_port {
            robot_address.set_port(robot_port);
        }

        if let Some(speed) = self.speed {
            config.actuation.speed = Speed::new(speed)?;
        }

        config.validate()?;
        tracing::debug!(?config, "loaded configuration");

        Ok(config)
    }
}

/// Completes once the process receives Ctrl-C.
pub fn shutdown_signal() -> impl Future<Output = ()> {
    async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }

        tracing::info!("received Ctrl-C, shutting down");
    }
}

//! Runtime setting changes.
//!
//! Commands are queued from any thread and applied by the frame loop at the
//! start of its next tick, like the UI change handlers of a live session.

use std::str::FromStr;
use std::sync::mpsc::{self, Receiver, Sender};

use tracing::{info, warn};

use crate::error::ConfigError;
use crate::params::TrackingConfig;

/// One tracking setting change
#[derive(Debug, Clone, PartialEq)]
pub enum SettingCommand {
    /// Target color as hex, validated when applied
    Color(String),
    ColorOffset(i64),
    SizeOffset(u64),
    SamplingStep(usize),
    ClusterRadius(f64),
}

impl SettingCommand {
    /// Apply to a config; a rejected value leaves the config untouched
    pub fn apply(&self, config: &mut TrackingConfig) -> Result<(), ConfigError> {
        match self {
            SettingCommand::Color(hex) => config.set_color_hex(hex)?,
            SettingCommand::ColorOffset(offset) => config.set_color_offset(*offset),
            SettingCommand::SizeOffset(size) => config.set_size_offset(*size),
            SettingCommand::SamplingStep(step) => config.set_sampling_step(*step),
            SettingCommand::ClusterRadius(radius) => config.set_cluster_radius(*radius),
        }
        Ok(())
    }
}

impl FromStr for SettingCommand {
    type Err = ConfigError;

    /// Parse `<name> <value>`, e.g. `color #ff0000` or `offset 30`
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let (Some(name), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ConfigError::InvalidCommand(line.trim().to_string()));
        };

        let invalid = || ConfigError::InvalidCommand(line.trim().to_string());

        match name.to_ascii_lowercase().as_str() {
            "color" => Ok(SettingCommand::Color(value.to_string())),
            "offset" | "color-offset" => value
                .parse()
                .map(SettingCommand::ColorOffset)
                .map_err(|_| invalid()),
            "size" | "size-offset" => value
                .parse()
                .map(SettingCommand::SizeOffset)
                .map_err(|_| invalid()),
            "step" => value
                .parse()
                .map(SettingCommand::SamplingStep)
                .map_err(|_| invalid()),
            "radius" => value
                .parse()
                .map(SettingCommand::ClusterRadius)
                .map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }
}

/// Sending half handed to whoever produces setting changes
#[derive(Debug, Clone)]
pub struct SettingsSender {
    tx: Sender<SettingCommand>,
}

impl SettingsSender {
    /// Queue a command; returns false once the frame loop is gone
    pub fn send(&self, command: SettingCommand) -> bool {
        self.tx.send(command).is_ok()
    }
}

/// Receiving half owned by the frame loop
#[derive(Debug)]
pub struct SettingsReceiver {
    rx: Receiver<SettingCommand>,
}

impl SettingsReceiver {
    /// Apply every queued command, logging rejected ones
    pub fn drain_into(&self, config: &mut TrackingConfig) -> usize {
        let mut applied = 0;
        for command in self.rx.try_iter() {
            match command.apply(config) {
                Ok(()) => {
                    info!("Setting applied: {:?}", command);
                    applied += 1;
                }
                Err(e) => warn!("Setting rejected, keeping previous value: {}", e),
            }
        }
        applied
    }
}

pub fn settings_channel() -> (SettingsSender, SettingsReceiver) {
    let (tx, rx) = mpsc::channel();
    (SettingsSender { tx }, SettingsReceiver { rx })
}

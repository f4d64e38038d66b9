//! Configuration management for the joystick reader
//!
//! Handles loading, parsing, and hot-reloading of YAML configuration files.

pub mod watcher;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::input::gamepad::joystick::MAX_CONTROLLERS;
use crate::input::gamepad::normalize::{
    DeadzoneProfile, XINPUT_GAMEPAD_LEFT_THUMB_DEADZONE, XINPUT_GAMEPAD_RIGHT_THUMB_DEADZONE,
    XINPUT_GAMEPAD_TRIGGER_THRESHOLD,
};

pub use watcher::ConfigWatcher;

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    #[serde(default)]
    pub deadzones: DeadzoneConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Which controller to read and through which backend
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ControllerConfig {
    #[serde(default)]
    pub index: i32,
    #[serde(default)]
    pub backend: Backend,
}

/// Input backend selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Xinput,
    Gilrs,
}

/// Deadzone thresholds (raw units)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeadzoneConfig {
    #[serde(default = "default_left_stick")]
    pub left_stick: i32,
    #[serde(default = "default_right_stick")]
    pub right_stick: i32,
    #[serde(default = "default_trigger")]
    pub trigger: i32,
}

/// How normalized states are reported
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_true")]
    pub only_changes: bool,
}

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tracing output
    #[default]
    Log,
    /// One JSON object per state on stdout
    Json,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            controller: ControllerConfig::default(),
            poll_interval_ms: default_poll_interval(),
            deadzones: DeadzoneConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            index: 0,
            backend: Backend::default(),
        }
    }
}

impl Default for DeadzoneConfig {
    fn default() -> Self {
        Self {
            left_stick: default_left_stick(),
            right_stick: default_right_stick(),
            trigger: default_trigger(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            only_changes: default_true(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file with validation
    pub async fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config = Self::from_yaml(&contents)
            .with_context(|| format!("Invalid config file: {}", path))?;

        Ok(config)
    }

    /// Parse and validate configuration from a YAML string
    pub fn from_yaml(contents: &str) -> Result<Self> {
        // An empty document means "all defaults"
        let config: AppConfig = if contents.trim().is_empty() {
            AppConfig::default()
        } else {
            serde_yaml::from_str(contents).context("Failed to parse YAML config")?
        };

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self, path: &str) -> Result<()> {
        let yaml = serde_yaml::to_string(self)
            .context("Failed to serialize config to YAML")?;

        fs::write(path, yaml)
            .await
            .with_context(|| format!("Failed to write config file: {}", path))?;

        Ok(())
    }

    /// Validate configuration for correctness and consistency
    pub fn validate(&self) -> Result<()> {
        if !(0..MAX_CONTROLLERS as i32).contains(&self.controller.index) {
            anyhow::bail!(
                "controller.index {} is invalid (must be 0-{})",
                self.controller.index,
                MAX_CONTROLLERS - 1
            );
        }

        if self.poll_interval_ms == 0 {
            anyhow::bail!("poll_interval_ms must be greater than 0");
        }

        self.deadzone_profile()?;

        Ok(())
    }

    /// Build the validated deadzone profile described by this config
    pub fn deadzone_profile(&self) -> Result<DeadzoneProfile> {
        let dz = &self.deadzones;
        DeadzoneProfile::new(dz.left_stick, dz.right_stick, dz.trigger)
            .context("Invalid deadzones")
    }
}

// Default value functions
fn default_true() -> bool { true }
fn default_poll_interval() -> u64 { 16 }
fn default_left_stick() -> i32 { XINPUT_GAMEPAD_LEFT_THUMB_DEADZONE }
fn default_right_stick() -> i32 { XINPUT_GAMEPAD_RIGHT_THUMB_DEADZONE }
fn default_trigger() -> i32 { XINPUT_GAMEPAD_TRIGGER_THRESHOLD }

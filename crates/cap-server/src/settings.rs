//! Runtime configuration, read from TOML and `CAP_*` environment variables.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, anyhow};
use cap_core::{calendar::Calendar, window::Window};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:               String,
  #[serde(default = "default_port")]
  pub port:               u16,
  pub store_path:         PathBuf,
  /// Offset east of UTC used to decide which calendar day an event is on.
  #[serde(default)]
  pub utc_offset_minutes: i32,
  #[serde(default = "default_weeks")]
  pub default_weeks:      i64,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8080 }

fn default_weeks() -> i64 { i64::from(cap_core::window::DEFAULT_WEEKS) }

impl ServerConfig {
  /// Layer `path` (optional) under `CAP_`-prefixed environment variables.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("CAP"))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn calendar(&self) -> anyhow::Result<Calendar> {
    Calendar::with_offset_minutes(self.utc_offset_minutes)
      .ok_or_else(|| anyhow!("utc_offset_minutes out of range: {}", self.utc_offset_minutes))
  }

  pub fn window(&self) -> anyhow::Result<Window> {
    Window::new(self.default_weeks).context("invalid default_weeks")
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Runtime configuration, read once at startup and never mutated afterwards.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    // 串口参数
    /// Serial device path (e.g. "/dev/ttyUSB1")
    pub port: String,
    pub baud_rate: u32,
    /// Delay between availability polls while waiting for a sample word.
    /// 0 means yield and spin.
    pub poll_interval_us: u64,

    // 采集参数
    /// Sample rate written to the WAV header, in Hz
    pub sample_rate: u32,
    /// Acquisition stops once this many samples are buffered
    pub max_samples: usize,
    pub output_path: PathBuf,
}

impl Config {
    /// 从编译时设置的环境变量创建配置
    /// Values come from config.toml via build.rs.
    pub fn new() -> Result<Self, &'static str> {
        Ok(Self {
            port: env!("DEFAULT_PORT").to_string(),
            baud_rate: env!("DEFAULT_BAUD_RATE").parse()
                .map_err(|_| "Failed to parse DEFAULT_BAUD_RATE")?,
            poll_interval_us: env!("DEFAULT_POLL_INTERVAL_US").parse()
                .map_err(|_| "Failed to parse DEFAULT_POLL_INTERVAL_US")?,

            sample_rate: env!("DEFAULT_SAMPLE_RATE").parse()
                .map_err(|_| "Failed to parse DEFAULT_SAMPLE_RATE")?,
            max_samples: env!("DEFAULT_MAX_SAMPLES").parse()
                .map_err(|_| "Failed to parse DEFAULT_MAX_SAMPLES")?,
            output_path: PathBuf::from(env!("DEFAULT_OUTPUT_PATH")),
        })
    }

    /// Load the effective configuration.
    ///
    /// Sources, lowest priority first:
    /// 1. built-in defaults (config.toml at build time)
    /// 2. `capture.toml` in the working directory, if present
    /// 3. `CAPTURE_*` environment variables, e.g. `CAPTURE_PORT=/dev/ttyACM0`
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("capture.toml"), "CAPTURE")
    }

    fn load_from(file: &Path, env_prefix: &str) -> Result<Self> {
        let defaults = Self::new().map_err(anyhow::Error::msg)?;

        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&defaults)?)
            .add_source(config::File::from(file).required(false))
            .add_source(config::Environment::with_prefix(env_prefix).try_parsing(true))
            .build()
            .with_context(|| format!("Failed to read configuration from {}", file.display()))?;

        settings
            .try_deserialize()
            .context("Invalid capture configuration")
    }

    pub fn validate(&self) -> Result<()> {
        if self.port.trim().is_empty() {
            anyhow::bail!("Serial port must not be empty");
        }
        if self.baud_rate == 0 {
            anyhow::bail!("Baud rate must be greater than 0");
        }
        if self.sample_rate == 0 {
            anyhow::bail!("Sample rate must be greater than 0");
        }
        if self.max_samples == 0 {
            anyhow::bail!("max_samples must be greater than 0");
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_micros(self.poll_interval_us)
    }
}

//! Codec configuration.
//!
//! A [`CodecConfig`] describes one encoder or decoder instance. Building one
//! never fails; whether the engine accepts the combination is only known
//! when a session is created from it.
//!
//! Configs can be written in YAML:
//!
//! ```yaml
//! sample_rate_hz: 16000
//! num_channels: 1
//! bitrate_bps: 6000
//! enable_dtx: true
//! model_path: /var/lib/lyra/model_coeffs
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Lyra bitstream version this layer is compatible with.
///
/// Bumped only when google/lyra changes the encoded format incompatibly.
pub const LYRA_VERSION: &str = "1.3.0";

pub const DEFAULT_SAMPLE_RATE: i32 = 16000;
pub const DEFAULT_CHANNELS: i32 = 1;
pub const DEFAULT_BITRATE: i32 = 9200;
pub const DEFAULT_ENABLE_DTX: bool = false;

/// Duration of one codec frame.
pub const FRAME_DURATION_MS: i32 = 20;

/// Sample rates the Lyra engine accepts. Other rates than 16 kHz are
/// resampled inside the engine.
pub const SUPPORTED_SAMPLE_RATES: [i32; 4] = [8000, 16000, 32000, 48000];

/// Channel counts the Lyra engine accepts.
pub const SUPPORTED_CHANNELS: [i32; 1] = [1];

/// Bitrates the Lyra engine accepts.
pub const SUPPORTED_BITRATES: [i32; 3] = [3200, 6000, 9200];

/// Reports whether the engine accepts `sample_rate_hz`.
pub fn is_supported_sample_rate(sample_rate_hz: i32) -> bool {
    SUPPORTED_SAMPLE_RATES.contains(&sample_rate_hz)
}

/// Reports whether the engine accepts `num_channels`.
pub fn is_supported_channels(num_channels: i32) -> bool {
    SUPPORTED_CHANNELS.contains(&num_channels)
}

/// Reports whether the engine accepts `bitrate_bps`.
pub fn is_supported_bitrate(bitrate_bps: i32) -> bool {
    SUPPORTED_BITRATES.contains(&bitrate_bps)
}

/// Configuration for an encoder or decoder session.
///
/// `bitrate_bps` and `enable_dtx` only matter to encoders. Sessions keep
/// their own copy, so a config is never changed by the sessions built
/// from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodecConfig {
    /// Input/output sample rate in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate_hz: i32,

    /// Number of interleaved channels.
    #[serde(default = "default_channels")]
    pub num_channels: i32,

    /// Target bitrate in bits per second (encoder only).
    #[serde(default = "default_bitrate")]
    pub bitrate_bps: i32,

    /// Discontinuous transmission (encoder only).
    #[serde(default)]
    pub enable_dtx: bool,

    /// Directory holding the model files, passed through to the engine.
    /// Empty means "use the module's model directory".
    #[serde(default, skip_serializing_if = "path_is_empty")]
    pub model_path: PathBuf,
}

fn default_sample_rate() -> i32 {
    DEFAULT_SAMPLE_RATE
}

fn default_channels() -> i32 {
    DEFAULT_CHANNELS
}

fn default_bitrate() -> i32 {
    DEFAULT_BITRATE
}

fn path_is_empty(p: &PathBuf) -> bool {
    p.as_os_str().is_empty()
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: DEFAULT_SAMPLE_RATE,
            num_channels: DEFAULT_CHANNELS,
            bitrate_bps: DEFAULT_BITRATE,
            enable_dtx: DEFAULT_ENABLE_DTX,
            model_path: PathBuf::new(),
        }
    }
}

impl CodecConfig {
    /// Creates a config with default settings and the given model directory.
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            ..Self::default()
        }
    }

    /// Set sample rate.
    pub fn with_sample_rate(mut self, sample_rate_hz: i32) -> Self {
        self.sample_rate_hz = sample_rate_hz;
        self
    }

    /// Set channel count.
    pub fn with_channels(mut self, num_channels: i32) -> Self {
        self.num_channels = num_channels;
        self
    }

    /// Set target bitrate.
    pub fn with_bitrate(mut self, bitrate_bps: i32) -> Self {
        self.bitrate_bps = bitrate_bps;
        self
    }

    /// Enable or disable DTX.
    pub fn with_dtx(mut self, enable_dtx: bool) -> Self {
        self.enable_dtx = enable_dtx;
        self
    }

    /// Set model directory.
    pub fn with_model_path(mut self, model_path: impl Into<PathBuf>) -> Self {
        self.model_path = model_path.into();
        self
    }

    /// Returns the number of samples per channel in one 20ms frame.
    pub fn frame_size(&self) -> usize {
        if self.sample_rate_hz <= 0 {
            return 0;
        }
        (i64::from(self.sample_rate_hz) * i64::from(FRAME_DURATION_MS) / 1000) as usize
    }

    /// Parses a config from YAML. Missing fields take their defaults; unknown
    /// fields are rejected.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Serializes the config to YAML.
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Loads a codec config from a YAML file.
pub fn load_config(path: impl AsRef<Path>) -> Result<CodecConfig> {
    let content = std::fs::read_to_string(path.as_ref())?;
    CodecConfig::from_yaml_str(&content)
}

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by Lyra sessions, the buffer bridge and config loading.
///
/// "Nothing to return" is never an error: operations that can legitimately
/// produce no data (DTX-suppressed frames, drained packets) return
/// `Ok(None)` instead.
#[derive(Debug, Error)]
pub enum LyraError {
    #[error("lyra: invalid config: {0}")]
    InvalidConfig(String),

    #[error("lyra: engine init failed: {0}")]
    EngineInitFailed(String),

    #[error("lyra: model files missing in {dir:?}: {missing:?}")]
    ModelFilesMissing {
        dir: PathBuf,
        missing: Vec<&'static str>,
    },

    #[error("lyra: expected a frame of {expected} samples, got {got}")]
    InvalidFrameSize { expected: usize, got: usize },

    #[error("lyra: buffer length mismatch: expected {expected}, got {got}")]
    BufferLengthMismatch { expected: usize, got: usize },

    #[error("lyra: invalid sample count {0}")]
    InvalidSampleCount(usize),

    #[error("lyra: unsupported bitrate {0}")]
    UnsupportedBitrate(i32),

    #[error("lyra: malformed packet: {0}")]
    MalformedPacket(String),

    #[error("lyra: engine: {0}")]
    Engine(String),

    #[error("lyra: module already registered")]
    AlreadyRegistered,

    #[error("lyra: no module registered")]
    NotRegistered,

    #[error("lyra: io: {0}")]
    Io(#[from] std::io::Error),

    #[error("lyra: config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl LyraError {
    /// Returns true for errors raised at session creation.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig(_) | Self::EngineInitFailed(_) | Self::ModelFilesMissing { .. }
        )
    }

    /// Returns true for violations of a call contract by the caller.
    ///
    /// These leave the session usable; a following well-formed call succeeds.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidFrameSize { .. }
                | Self::BufferLengthMismatch { .. }
                | Self::InvalidSampleCount(_)
                | Self::UnsupportedBitrate(_)
                | Self::MalformedPacket(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, LyraError>;

//! Host-facing surface.
//!
//! [`LyraModule`] pairs an [`Engine`] with the directory its model files
//! live in, and hands out sessions and buffers. It adapts names and types
//! only; all codec behavior lives in the sessions and the engine.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::info;

use crate::bridge::{self, AudioData, Bytes};
use crate::config::CodecConfig;
use crate::decoder::DecoderSession;
use crate::encoder::EncoderSession;
use crate::engine::Engine;
use crate::error::{LyraError, Result};

static GLOBAL: OnceCell<LyraModule> = OnceCell::new();

/// Entry point for hosts driving the codec.
#[derive(Clone)]
pub struct LyraModule {
    engine: Arc<dyn Engine>,
    model_path: PathBuf,
}

impl LyraModule {
    /// Creates a module over `engine`.
    ///
    /// `model_path` is used for every session whose config leaves
    /// `model_path` empty.
    pub fn new(engine: Arc<dyn Engine>, model_path: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            model_path: model_path.into(),
        }
    }

    /// Installs `module` as the process-wide module.
    ///
    /// Call once at startup, before creating sessions. A second call fails
    /// with [`LyraError::AlreadyRegistered`] and leaves the first in place.
    pub fn register(module: LyraModule) -> Result<&'static LyraModule> {
        install(&GLOBAL, module)
    }

    /// Returns the process-wide module, or [`LyraError::NotRegistered`]
    /// before [`register`](Self::register) succeeded.
    pub fn global() -> Result<&'static LyraModule> {
        lookup(&GLOBAL)
    }

    /// Returns the default model directory.
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Creates an encoder session.
    pub fn create_encoder(&self, config: &CodecConfig) -> Result<EncoderSession> {
        EncoderSession::create(self.engine.as_ref(), &self.resolve(config))
    }

    /// Creates a decoder session.
    pub fn create_decoder(&self, config: &CodecConfig) -> Result<DecoderSession> {
        DecoderSession::create(self.engine.as_ref(), &self.resolve(config))
    }

    /// Allocates a zero-initialized sample buffer.
    pub fn new_audio_data(&self, n: usize) -> AudioData {
        bridge::new_audio_data(n)
    }

    /// Allocates an empty byte buffer.
    pub fn new_bytes(&self) -> Bytes {
        bridge::new_bytes()
    }

    fn resolve(&self, config: &CodecConfig) -> CodecConfig {
        if config.model_path.as_os_str().is_empty() {
            return config.clone().with_model_path(&self.model_path);
        }
        config.clone()
    }
}

fn install(cell: &OnceCell<LyraModule>, module: LyraModule) -> Result<&LyraModule> {
    let dir = module.model_path.clone();
    cell.set(module).map_err(|_| LyraError::AlreadyRegistered)?;
    info!(model_path = ?dir, "lyra: module registered");
    lookup(cell)
}

fn lookup(cell: &OnceCell<LyraModule>) -> Result<&LyraModule> {
    cell.get().ok_or(LyraError::NotRegistered)
}

/// Copies a native sample buffer into a host slice of the same length.
pub fn copy_audio_data_to_host(src: &AudioData, dst: &mut [i16]) -> Result<()> {
    src.copy_to_host(dst)
}

/// Copies a host slice into a native sample buffer of the same length.
pub fn copy_host_to_audio_data(dst: &mut AudioData, src: &[i16]) -> Result<()> {
    dst.copy_from_host(src)
}

//! Lyra encoder session.

use tracing::{debug, trace, warn};

use crate::bridge::{AudioData, new_audio_data};
use crate::config::CodecConfig;
use crate::engine::{EncoderEngine, Engine};
use crate::error::{LyraError, Result};
use crate::frame::Packet;

/// Wraps one native encoder.
///
/// Frames must be passed in the order the audio occurs; the engine keeps
/// prediction and DTX history across calls. The native handle is released
/// when the session is dropped.
pub struct EncoderSession {
    config: CodecConfig,
    frame_size: usize,
    buffer: AudioData,
    engine: Box<dyn EncoderEngine>,
}

impl EncoderSession {
    /// Creates an encoder for `config`.
    ///
    /// Fails with [`LyraError::InvalidConfig`] or
    /// [`LyraError::EngineInitFailed`] when the engine refuses it.
    pub fn create(engine: &dyn Engine, config: &CodecConfig) -> Result<Self> {
        let handle = engine.create_encoder(config)?;
        let frame_size = required_frame_size(config.sample_rate_hz, handle.frame_rate())?;

        debug!(
            sample_rate = config.sample_rate_hz,
            channels = config.num_channels,
            bitrate = config.bitrate_bps,
            dtx = config.enable_dtx,
            frame_size,
            "lyra: encoder created"
        );

        Ok(Self {
            config: config.clone(),
            frame_size,
            buffer: new_audio_data(frame_size),
            engine: handle,
        })
    }

    /// Returns the session's config. The bitrate follows [`set_bitrate`](Self::set_bitrate).
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Returns the sample rate.
    pub fn sample_rate(&self) -> i32 {
        self.config.sample_rate_hz
    }

    /// Returns the number of channels.
    pub fn channels(&self) -> i32 {
        self.config.num_channels
    }

    /// Returns the current target bitrate.
    pub fn bitrate(&self) -> i32 {
        self.config.bitrate_bps
    }

    /// Returns true if DTX is enabled.
    pub fn dtx_enabled(&self) -> bool {
        self.config.enable_dtx
    }

    /// Number of samples [`encode`](Self::encode) expects per call.
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Encodes one frame.
    ///
    /// Returns `Ok(None)` when the engine decided nothing needs sending for
    /// this frame (DTX). A frame of the wrong length is rejected with
    /// [`LyraError::InvalidFrameSize`] and does not touch codec state.
    pub fn encode(&mut self, frame: &[i16]) -> Result<Option<Packet>> {
        if frame.len() != self.frame_size {
            return Err(LyraError::InvalidFrameSize {
                expected: self.frame_size,
                got: frame.len(),
            });
        }
        self.buffer.copy_from_host(frame)?;
        self.encode_buffer()
    }

    /// Encodes one frame written by `fill` straight into the native frame
    /// buffer.
    ///
    /// The view holds exactly [`frame_size`](Self::frame_size) samples and
    /// still contains the previous frame; `fill` must overwrite all of it.
    pub fn encode_with<F>(&mut self, fill: F) -> Result<Option<Packet>>
    where
        F: FnOnce(&mut [i16]),
    {
        self.buffer.with_view(fill);
        self.encode_buffer()
    }

    fn encode_buffer(&mut self) -> Result<Option<Packet>> {
        let encoded = self.engine.encode(self.buffer.as_slice()).inspect_err(|e| {
            warn!(error = %e, "lyra: encode failed");
        })?;

        if encoded.is_empty() {
            if !self.config.enable_dtx {
                return Err(LyraError::Engine(
                    "empty packet produced with DTX disabled".into(),
                ));
            }
            trace!("lyra: frame suppressed by DTX");
            return Ok(None);
        }

        Ok(Some(Packet::new(encoded)))
    }

    /// Changes the target bitrate, effective from the next frame.
    pub fn set_bitrate(&mut self, bitrate_bps: i32) -> Result<()> {
        self.engine.set_bitrate(bitrate_bps)?;
        debug!(from = self.config.bitrate_bps, to = bitrate_bps, "lyra: bitrate changed");
        self.config.bitrate_bps = bitrate_bps;
        Ok(())
    }
}

/// Derives the per-call sample count from the engine's frame rate.
pub(crate) fn required_frame_size(sample_rate_hz: i32, frame_rate: i32) -> Result<usize> {
    if frame_rate <= 0 || sample_rate_hz <= 0 || sample_rate_hz % frame_rate != 0 {
        return Err(LyraError::Engine(format!(
            "frame rate {frame_rate} does not divide sample rate {sample_rate_hz}"
        )));
    }
    Ok((sample_rate_hz / frame_rate) as usize)
}

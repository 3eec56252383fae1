//! In-process engine used by the unit tests.
//!
//! Packets are `bitrate / 8 / 50` bytes long so bitrate changes are
//! observable. A decoder yields one frame of samples per loaded packet.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::config::{
    CodecConfig, is_supported_bitrate, is_supported_channels, is_supported_sample_rate,
};
use crate::engine::{DecoderEngine, EncoderEngine, Engine};
use crate::error::{LyraError, Result};

const FRAME_RATE: i32 = 50;

#[derive(Default)]
pub(crate) struct MockEngine {
    /// Fail creation as if the model files could not be loaded.
    pub reject_model: bool,
    /// Encoders return empty output for every frame, DTX or not.
    pub always_empty: bool,
    /// Decoders synthesize concealment audio once the packet is drained.
    pub conceal: bool,
    /// Decoders write one sample less than requested.
    pub short_read: bool,
    /// Counts calls into decoder `decode_samples`.
    pub decode_calls: Arc<AtomicUsize>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn check(&self, config: &CodecConfig) -> Result<()> {
        if !is_supported_sample_rate(config.sample_rate_hz) {
            return Err(LyraError::InvalidConfig(format!(
                "unsupported sample rate {}",
                config.sample_rate_hz
            )));
        }
        if !is_supported_channels(config.num_channels) {
            return Err(LyraError::InvalidConfig(format!(
                "unsupported number of channels {}",
                config.num_channels
            )));
        }
        if self.reject_model {
            return Err(LyraError::EngineInitFailed(format!(
                "cannot load model from {:?}",
                config.model_path
            )));
        }
        Ok(())
    }
}

impl Engine for MockEngine {
    fn create_encoder(&self, config: &CodecConfig) -> Result<Box<dyn EncoderEngine>> {
        self.check(config)?;
        if !is_supported_bitrate(config.bitrate_bps) {
            return Err(LyraError::InvalidConfig(format!(
                "unsupported bitrate {}",
                config.bitrate_bps
            )));
        }
        Ok(Box::new(MockEncoder {
            bitrate_bps: config.bitrate_bps,
            enable_dtx: config.enable_dtx,
            always_empty: self.always_empty,
            frame_size: config.frame_size(),
            frames: 0,
        }))
    }

    fn create_decoder(&self, config: &CodecConfig) -> Result<Box<dyn DecoderEngine>> {
        self.check(config)?;
        Ok(Box::new(MockDecoder {
            frame_size: config.frame_size(),
            remaining: 0,
            seed: 0,
            conceal: self.conceal,
            short_read: self.short_read,
            calls: Arc::clone(&self.decode_calls),
        }))
    }
}

struct MockEncoder {
    bitrate_bps: i32,
    enable_dtx: bool,
    always_empty: bool,
    frame_size: usize,
    frames: u8,
}

impl EncoderEngine for MockEncoder {
    fn encode(&mut self, frame: &[i16]) -> Result<Vec<u8>> {
        if frame.len() != self.frame_size {
            return Err(LyraError::Engine("wrong frame length".into()));
        }
        self.frames = self.frames.wrapping_add(1);
        if self.always_empty || (self.enable_dtx && frame.iter().all(|&s| s == 0)) {
            return Ok(Vec::new());
        }
        let len = (self.bitrate_bps / 8 / FRAME_RATE) as usize;
        let fold = frame.iter().fold(0u8, |acc, &s| acc ^ (s as u8));
        Ok((0..len).map(|i| fold ^ self.frames ^ i as u8).collect())
    }

    fn set_bitrate(&mut self, bitrate_bps: i32) -> Result<()> {
        if !is_supported_bitrate(bitrate_bps) {
            return Err(LyraError::UnsupportedBitrate(bitrate_bps));
        }
        self.bitrate_bps = bitrate_bps;
        Ok(())
    }

    fn frame_rate(&self) -> i32 {
        FRAME_RATE
    }
}

struct MockDecoder {
    frame_size: usize,
    remaining: usize,
    seed: u8,
    conceal: bool,
    short_read: bool,
    calls: Arc<AtomicUsize>,
}

impl DecoderEngine for MockDecoder {
    fn set_encoded_packet(&mut self, packet: &[u8]) -> Result<()> {
        let valid = [3200, 6000, 9200].map(|b| (b / 8 / FRAME_RATE) as usize);
        if !valid.contains(&packet.len()) {
            return Err(LyraError::MalformedPacket(format!(
                "unexpected packet length {}",
                packet.len()
            )));
        }
        self.remaining = self.frame_size;
        self.seed = packet[0];
        Ok(())
    }

    fn decode_samples(&mut self, out: &mut [i16]) -> Result<Option<usize>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if out.len() > self.remaining {
            if !self.conceal {
                return Ok(None);
            }
            out.fill(1);
            return Ok(Some(out.len()));
        }
        self.remaining -= out.len();
        for (i, s) in out.iter_mut().enumerate() {
            *s = (self.seed as i16).wrapping_add(i as i16);
        }
        if self.short_read {
            return Ok(Some(out.len() - 1));
        }
        Ok(Some(out.len()))
    }

    fn frame_rate(&self) -> i32 {
        FRAME_RATE
    }
}

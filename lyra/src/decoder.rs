//! Lyra decoder session.

use tracing::{debug, trace, warn};

use crate::bridge::{Bytes, new_bytes};
use crate::config::CodecConfig;
use crate::encoder::required_frame_size;
use crate::engine::{DecoderEngine, Engine};
use crate::error::{LyraError, Result};
use crate::frame::AudioFrame;

/// Wraps one native decoder.
///
/// Load each received packet with [`set_encoded_packet`](Self::set_encoded_packet)
/// in arrival order, then drain its audio with
/// [`decode_samples`](Self::decode_samples). Packets are not queued: loading
/// a new one drops whatever was left of the previous one.
///
/// Until the first packet is loaded, `decode_samples` returns `None` without
/// touching the engine. After that, calls without a fresh packet are handed
/// to the engine, which may synthesize concealment audio for lost packets.
pub struct DecoderSession {
    config: CodecConfig,
    frame_size: usize,
    packet: Bytes,
    loaded: bool,
    decoded_since_load: usize,
    engine: Box<dyn DecoderEngine>,
}

impl DecoderSession {
    /// Creates a decoder for `config`. Bitrate and DTX settings are ignored.
    pub fn create(engine: &dyn Engine, config: &CodecConfig) -> Result<Self> {
        let handle = engine.create_decoder(config)?;
        let frame_size = required_frame_size(config.sample_rate_hz, handle.frame_rate())?;

        debug!(
            sample_rate = config.sample_rate_hz,
            channels = config.num_channels,
            frame_size,
            "lyra: decoder created"
        );

        Ok(Self {
            config: config.clone(),
            frame_size,
            packet: new_bytes(),
            loaded: false,
            decoded_since_load: 0,
            engine: handle,
        })
    }

    /// Returns the session's config.
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

    /// Number of samples one packet decodes to.
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Loads one encoded packet.
    ///
    /// Fails with [`LyraError::MalformedPacket`] if the packet is empty or the
    /// engine rejects it.
    pub fn set_encoded_packet(&mut self, packet: &[u8]) -> Result<()> {
        if packet.is_empty() {
            return Err(LyraError::MalformedPacket("empty packet".into()));
        }

        if self.loaded && self.decoded_since_load < self.frame_size {
            debug!(
                decoded = self.decoded_since_load,
                frame_size = self.frame_size,
                "lyra: replacing packet before it was drained"
            );
        }

        self.packet.load(packet);
        self.engine
            .set_encoded_packet(self.packet.as_slice())
            .inspect_err(|e| warn!(error = %e, len = packet.len(), "lyra: packet rejected"))?;

        self.loaded = true;
        self.decoded_since_load = 0;
        Ok(())
    }

    /// Decodes exactly `count` samples.
    ///
    /// Returns `Ok(None)` when no packet was ever loaded or the engine has no
    /// more audio. Never returns fewer than `count` samples. A `count` of zero
    /// or above `i32::MAX` is rejected with [`LyraError::InvalidSampleCount`].
    pub fn decode_samples(&mut self, count: usize) -> Result<Option<AudioFrame>> {
        check_count(count)?;
        if !self.loaded {
            trace!("lyra: decode requested before any packet");
            return Ok(None);
        }

        let mut samples = vec![0i16; count];
        if !self.fill(&mut samples)? {
            return Ok(None);
        }
        Ok(Some(AudioFrame::new(samples)))
    }

    /// Decodes exactly `out.len()` samples into `out`.
    ///
    /// Returns `Ok(false)` under the same conditions `decode_samples` returns
    /// `None`; the contents of `out` are then unspecified.
    pub fn decode_samples_into(&mut self, out: &mut [i16]) -> Result<bool> {
        check_count(out.len())?;
        if !self.loaded {
            return Ok(false);
        }
        self.fill(out)
    }

    /// Loads `packet` if given, then decodes one frame.
    ///
    /// Passing `None` models a lost packet and asks the engine for
    /// concealment audio.
    pub fn decode(&mut self, packet: Option<&[u8]>) -> Result<Option<AudioFrame>> {
        if let Some(packet) = packet {
            self.set_encoded_packet(packet)?;
        }
        self.decode_samples(self.frame_size)
    }

    fn fill(&mut self, out: &mut [i16]) -> Result<bool> {
        let requested = out.len();
        match self.engine.decode_samples(out)? {
            None => Ok(false),
            Some(n) if n == requested => {
                self.decoded_since_load += n;
                Ok(true)
            }
            Some(n) => {
                warn!(requested, produced = n, "lyra: short decode");
                Err(LyraError::Engine(format!(
                    "requested {requested} samples, engine produced {n}"
                )))
            }
        }
    }
}

/// Largest sample count one call may request; the engine counts in `i32`.
const MAX_SAMPLE_COUNT: usize = i32::MAX as usize;

fn check_count(count: usize) -> Result<()> {
    if count == 0 || count > MAX_SAMPLE_COUNT {
        return Err(LyraError::InvalidSampleCount(count));
    }
    Ok(())
}

//! Packet and audio frame types exchanged with sessions.

use std::time::Duration;

/// One encoded Lyra packet. Opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet(pub Vec<u8>);

impl Packet {
    /// Creates a new packet from bytes.
    pub fn new(data: Vec<u8>) -> Self {
        Self(data)
    }

    /// Creates a packet from a byte slice.
    pub fn from_slice(data: &[u8]) -> Self {
        Self(data.to_vec())
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the packet is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the packet and returns its bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for Packet {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Packet {
    fn from(data: Vec<u8>) -> Self {
        Self(data)
    }
}

impl From<&[u8]> for Packet {
    fn from(data: &[u8]) -> Self {
        Self(data.to_vec())
    }
}

/// Decoded 16-bit PCM samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFrame(Vec<i16>);

impl AudioFrame {
    /// Creates a frame from samples.
    pub fn new(samples: Vec<i16>) -> Self {
        Self(samples)
    }

    /// Returns the samples.
    pub fn samples(&self) -> &[i16] {
        &self.0
    }

    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the frame holds no samples.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the frame and returns its samples.
    pub fn into_samples(self) -> Vec<i16> {
        self.0
    }

    /// Returns the playback duration of the frame.
    pub fn duration(&self, sample_rate_hz: i32, num_channels: i32) -> Duration {
        if sample_rate_hz <= 0 || num_channels <= 0 {
            return Duration::ZERO;
        }
        let per_channel = self.0.len() as u64 / num_channels as u64;
        Duration::from_micros(per_channel * 1_000_000 / sample_rate_hz as u64)
    }

    /// Returns the samples as little-endian bytes.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.0.len() * 2);
        for sample in &self.0 {
            data.extend_from_slice(&sample.to_le_bytes());
        }
        data
    }
}

impl AsRef<[i16]> for AudioFrame {
    fn as_ref(&self) -> &[i16] {
        &self.0
    }
}

impl From<Vec<i16>> for AudioFrame {
    fn from(samples: Vec<i16>) -> Self {
        Self(samples)
    }
}

use crate::config::CodecConfig;
use crate::error::Result;

/// Creates native encoder and decoder instances.
///
/// The compression algorithm, model loading and the sample-rate / channel /
/// bitrate checks all live behind this trait. With the `native` feature,
/// `NativeEngine` implements it on top of the Lyra library.
///
/// Implementations classify creation failures as
/// [`LyraError::InvalidConfig`](crate::LyraError::InvalidConfig) when the
/// combination is rejected and
/// [`LyraError::EngineInitFailed`](crate::LyraError::EngineInitFailed) when
/// the engine could not start (for example, unreadable model files).
pub trait Engine: Send + Sync {
    /// Creates an encoder for `config`.
    fn create_encoder(&self, config: &CodecConfig) -> Result<Box<dyn EncoderEngine>>;

    /// Creates a decoder for `config`. Only the sample rate, channel count
    /// and model path are used.
    fn create_decoder(&self, config: &CodecConfig) -> Result<Box<dyn DecoderEngine>>;
}

/// One native encoder instance.
pub trait EncoderEngine: Send {
    /// Encodes one frame of exactly the required length.
    ///
    /// An empty result means nothing needs transmitting for this frame
    /// (DTX suppression).
    fn encode(&mut self, frame: &[i16]) -> Result<Vec<u8>>;

    /// Changes the target bitrate for subsequent frames.
    fn set_bitrate(&mut self, bitrate_bps: i32) -> Result<()>;

    /// Number of frames the engine consumes per second.
    fn frame_rate(&self) -> i32;
}

/// One native decoder instance.
pub trait DecoderEngine: Send {
    /// Loads one packet, replacing whatever was loaded before.
    fn set_encoded_packet(&mut self, packet: &[u8]) -> Result<()>;

    /// Writes decoded samples into `out`.
    ///
    /// Returns the number of samples written, or `None` when the engine has
    /// nothing to yield. The engine may synthesize concealment audio when no
    /// fresh packet was loaded.
    fn decode_samples(&mut self, out: &mut [i16]) -> Result<Option<usize>>;

    /// Number of frames the engine produces per second.
    fn frame_rate(&self) -> i32;
}

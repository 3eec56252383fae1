//! FFI bindings to the Lyra C shim (shim/lyra_shim.cc).
//!
//! Lyra only ships a C++ API, so the shim wraps `LyraEncoder` and
//! `LyraDecoder` behind plain C functions.

use std::os::raw::{c_char, c_int};

/// Opaque encoder state.
pub enum LyraEncoder {}

/// Opaque decoder state.
pub enum LyraDecoder {}

// Return codes shared by the shim functions.
pub const LYRA_SHIM_OK: c_int = 0;
pub const LYRA_SHIM_FAILED: c_int = -1;
pub const LYRA_SHIM_BUFFER_TOO_SMALL: c_int = -2;
pub const LYRA_SHIM_INVALID_ARGUMENT: c_int = -3;

/// Upper bound on one encoded packet. 9200 bps at 20ms is 23 bytes.
pub const MAX_PACKET_BYTES: usize = 256;

unsafe extern "C" {
    // Encoder
    pub fn lyra_encoder_create(
        sample_rate_hz: c_int,
        num_channels: c_int,
        bitrate: c_int,
        enable_dtx: c_int,
        model_path: *const c_char,
    ) -> *mut LyraEncoder;

    pub fn lyra_encoder_destroy(enc: *mut LyraEncoder);

    /// Returns the number of bytes written to `out`, or a negative code.
    pub fn lyra_encoder_encode(
        enc: *mut LyraEncoder,
        pcm: *const i16,
        num_samples: usize,
        out: *mut u8,
        out_cap: usize,
    ) -> c_int;

    pub fn lyra_encoder_set_bitrate(enc: *mut LyraEncoder, bitrate: c_int) -> c_int;

    pub fn lyra_encoder_frame_rate(enc: *mut LyraEncoder) -> c_int;

    // Decoder
    pub fn lyra_decoder_create(
        sample_rate_hz: c_int,
        num_channels: c_int,
        model_path: *const c_char,
    ) -> *mut LyraDecoder;

    pub fn lyra_decoder_destroy(dec: *mut LyraDecoder);

    pub fn lyra_decoder_set_encoded_packet(
        dec: *mut LyraDecoder,
        data: *const u8,
        len: usize,
    ) -> c_int;

    /// Returns the number of samples written to `out`, or a negative code
    /// when the decoder produced nothing.
    pub fn lyra_decoder_decode_samples(
        dec: *mut LyraDecoder,
        out: *mut i16,
        num_samples: usize,
    ) -> c_int;

    pub fn lyra_decoder_frame_rate(dec: *mut LyraDecoder) -> c_int;
}

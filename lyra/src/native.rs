//! [`Engine`] implementation backed by the Lyra library.
//!
//! Unix only: model paths are handed to the library as raw bytes.

use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::ptr;

use crate::config::{
    CodecConfig, is_supported_bitrate, is_supported_channels, is_supported_sample_rate,
};
use crate::engine::{DecoderEngine, EncoderEngine, Engine};
use crate::error::{LyraError, Result};
use crate::ffi;
use crate::model::missing_model_files;

/// Engine that creates real Lyra encoders and decoders.
///
/// Sample rate, channel count and bitrate are checked against the sets Lyra
/// supports before the library is called, so rejected combinations surface
/// as [`LyraError::InvalidConfig`] rather than a bare init failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeEngine;

impl NativeEngine {
    pub fn new() -> Self {
        Self
    }
}

fn check_common(config: &CodecConfig) -> Result<CString> {
    if !is_supported_sample_rate(config.sample_rate_hz) {
        return Err(LyraError::InvalidConfig(format!(
            "unsupported sample rate: expected one of 8000, 16000, 32000 or 48000, but got {}",
            config.sample_rate_hz
        )));
    }
    if !is_supported_channels(config.num_channels) {
        return Err(LyraError::InvalidConfig(format!(
            "unsupported number of channels: expected 1, but got {}",
            config.num_channels
        )));
    }
    model_path_cstring(&config.model_path)
}

fn model_path_cstring(dir: &Path) -> Result<CString> {
    let missing = missing_model_files(dir);
    if !missing.is_empty() {
        return Err(LyraError::ModelFilesMissing {
            dir: dir.to_path_buf(),
            missing,
        });
    }
    CString::new(dir.as_os_str().as_bytes())
        .map_err(|e| LyraError::InvalidConfig(format!("model path: {e}")))
}

impl Engine for NativeEngine {
    fn create_encoder(&self, config: &CodecConfig) -> Result<Box<dyn EncoderEngine>> {
        if !is_supported_bitrate(config.bitrate_bps) {
            return Err(LyraError::InvalidConfig(format!(
                "unsupported bitrate: expected one of 3200, 6000 or 9200, but got {}",
                config.bitrate_bps
            )));
        }
        let path = check_common(config)?;

        let handle = unsafe {
            ffi::lyra_encoder_create(
                config.sample_rate_hz,
                config.num_channels,
                config.bitrate_bps,
                config.enable_dtx as i32,
                path.as_ptr(),
            )
        };
        if handle.is_null() {
            return Err(LyraError::EngineInitFailed(format!(
                "could not create encoder from {:?}",
                config.model_path
            )));
        }
        Ok(Box::new(NativeEncoder { handle }))
    }

    fn create_decoder(&self, config: &CodecConfig) -> Result<Box<dyn DecoderEngine>> {
        let path = check_common(config)?;

        let handle = unsafe {
            ffi::lyra_decoder_create(config.sample_rate_hz, config.num_channels, path.as_ptr())
        };
        if handle.is_null() {
            return Err(LyraError::EngineInitFailed(format!(
                "could not create decoder from {:?}",
                config.model_path
            )));
        }
        Ok(Box::new(NativeDecoder { handle }))
    }
}

struct NativeEncoder {
    handle: *mut ffi::LyraEncoder,
}

// Safety: the handle is owned by exactly one session and never shared.
unsafe impl Send for NativeEncoder {}

impl Drop for NativeEncoder {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            unsafe { ffi::lyra_encoder_destroy(self.handle) };
            self.handle = ptr::null_mut();
        }
    }
}

impl EncoderEngine for NativeEncoder {
    fn encode(&mut self, frame: &[i16]) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; ffi::MAX_PACKET_BYTES];
        let n = unsafe {
            ffi::lyra_encoder_encode(
                self.handle,
                frame.as_ptr(),
                frame.len(),
                buf.as_mut_ptr(),
                buf.len(),
            )
        };

        match n {
            ffi::LYRA_SHIM_BUFFER_TOO_SMALL => Err(LyraError::Engine(format!(
                "encoded packet exceeds {} bytes",
                ffi::MAX_PACKET_BYTES
            ))),
            n if n < 0 => Err(LyraError::Engine("encode failed".into())),
            n => {
                buf.truncate(n as usize);
                Ok(buf)
            }
        }
    }

    fn set_bitrate(&mut self, bitrate_bps: i32) -> Result<()> {
        if !is_supported_bitrate(bitrate_bps) {
            return Err(LyraError::UnsupportedBitrate(bitrate_bps));
        }
        let ret = unsafe { ffi::lyra_encoder_set_bitrate(self.handle, bitrate_bps) };
        if ret != ffi::LYRA_SHIM_OK {
            return Err(LyraError::UnsupportedBitrate(bitrate_bps));
        }
        Ok(())
    }

    fn frame_rate(&self) -> i32 {
        unsafe { ffi::lyra_encoder_frame_rate(self.handle) }
    }
}

struct NativeDecoder {
    handle: *mut ffi::LyraDecoder,
}

// Safety: the handle is owned by exactly one session and never shared.
unsafe impl Send for NativeDecoder {}

impl Drop for NativeDecoder {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            unsafe { ffi::lyra_decoder_destroy(self.handle) };
            self.handle = ptr::null_mut();
        }
    }
}

impl DecoderEngine for NativeDecoder {
    fn set_encoded_packet(&mut self, packet: &[u8]) -> Result<()> {
        let ret = unsafe {
            ffi::lyra_decoder_set_encoded_packet(self.handle, packet.as_ptr(), packet.len())
        };
        if ret != ffi::LYRA_SHIM_OK {
            return Err(LyraError::MalformedPacket(format!(
                "decoder rejected {} byte packet",
                packet.len()
            )));
        }
        Ok(())
    }

    fn decode_samples(&mut self, out: &mut [i16]) -> Result<Option<usize>> {
        let n = unsafe {
            ffi::lyra_decoder_decode_samples(self.handle, out.as_mut_ptr(), out.len())
        };
        if n == ffi::LYRA_SHIM_FAILED {
            return Ok(None);
        }
        if n == ffi::LYRA_SHIM_INVALID_ARGUMENT {
            return Err(LyraError::InvalidSampleCount(out.len()));
        }
        if n < 0 {
            return Err(LyraError::Engine(format!("decode failed with code {n}")));
        }
        Ok(Some(n as usize))
    }

    fn frame_rate(&self) -> i32 {
        unsafe { ffi::lyra_decoder_frame_rate(self.handle) }
    }
}

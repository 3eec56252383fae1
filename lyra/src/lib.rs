//! Encoder/decoder sessions and buffer bridge for the Lyra speech codec.
//!
//! This crate drives a frame-based codec engine from a host application:
//! PCM frames go into an [`EncoderSession`] and encoded [`Packet`]s come
//! out; packets go into a [`DecoderSession`] and PCM comes back out in
//! chunks of the caller's choosing.
//!
//! - `config`: [`CodecConfig`], defaults and the engine's supported sets
//! - `bridge`: native sample/byte buffers with copy and scoped-view access
//! - `engine`: the traits behind which the codec itself lives
//! - `module`: [`LyraModule`], the host-facing entry point
//!
//! # Outcomes
//!
//! Every session call returns `Result<Option<T>, LyraError>`:
//!
//! - `Ok(Some(_))`: data was produced
//! - `Ok(None)`: nothing to produce, which is normal (DTX silence, a
//!   drained packet)
//! - `Err(_)`: a config problem, a caller contract violation, or an engine
//!   failure
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use giztoy_lyra::{CodecConfig, LyraModule, NativeEngine};
//!
//! let module = LyraModule::new(Arc::new(NativeEngine::new()), "/var/lib/lyra");
//!
//! let mut encoder = module.create_encoder(&CodecConfig::default().with_bitrate(6000))?;
//! let mut decoder = module.create_decoder(&CodecConfig::default())?;
//!
//! let pcm = vec![0i16; encoder.frame_size()]; // 20ms at 16kHz
//! if let Some(packet) = encoder.encode(&pcm)? {
//!     decoder.set_encoded_packet(packet.as_bytes())?;
//!     let decoded = decoder.decode_samples(decoder.frame_size())?;
//! }
//! ```
//!
//! # Native Engine
//!
//! Building with the `native` feature compiles `shim/lyra_shim.cc` and links
//! the Lyra library found under `$LYRA_DIR` (default `/opt/lyra`).

pub mod bridge;
pub mod config;
mod decoder;
mod encoder;
mod engine;
mod error;
mod frame;
pub mod model;
mod module;

#[cfg(feature = "native")]
mod ffi;
#[cfg(feature = "native")]
mod native;

#[cfg(test)]
mod testing;
#[cfg(test)]
mod tests;

pub use bridge::{AudioData, Bytes, Element, NativeBuffer, new_audio_data, new_bytes};
pub use config::{CodecConfig, LYRA_VERSION, load_config};
pub use decoder::DecoderSession;
pub use encoder::EncoderSession;
pub use engine::{DecoderEngine, EncoderEngine, Engine};
pub use error::{LyraError, Result};
pub use frame::{AudioFrame, Packet};
pub use model::{REQUIRED_MODEL_FILES, missing_model_files};
pub use module::{LyraModule, copy_audio_data_to_host, copy_host_to_audio_data};

#[cfg(feature = "native")]
pub use native::NativeEngine;

//! Buffer bridge between host slices and native codec buffers.
//!
//! A [`NativeBuffer`] is a contiguous buffer the sessions hand to the engine.
//! The host exchanges data with it in exactly two ways:
//!
//! - **Copy**: [`NativeBuffer::copy_from_host`] / [`NativeBuffer::copy_to_host`]
//!   copy element by element between equally sized buffers. A length
//!   mismatch is an error; nothing is truncated or padded.
//! - **View**: [`NativeBuffer::with_view`] lends the native memory to a
//!   closure for the duration of one call. The buffer cannot be resized or
//!   dropped while the view exists, and the view cannot outlive the call:
//!
//! ```compile_fail
//! use giztoy_lyra::bridge::new_audio_data;
//!
//! let mut audio = new_audio_data(4);
//! let stale = audio.with_view(|view| view);
//! stale[0] = 1;
//! ```

use crate::error::{LyraError, Result};

mod sealed {
    pub trait Sealed {}

    impl Sealed for i16 {}
    impl Sealed for u8 {}
}

/// Element types that may cross the host/native boundary.
///
/// The set is closed: 16-bit PCM samples and encoded bytes.
pub trait Element: sealed::Sealed + Copy + Default + Send + Sync + 'static {
    /// Name of the element type as seen by the host.
    const NAME: &'static str;
}

impl Element for i16 {
    const NAME: &'static str = "int16";
}

impl Element for u8 {
    const NAME: &'static str = "uint8";
}

/// Contiguous native buffer of [`Element`]s.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NativeBuffer<T: Element> {
    data: Vec<T>,
}

/// Native buffer of PCM samples.
pub type AudioData = NativeBuffer<i16>;

/// Native buffer of encoded bytes.
pub type Bytes = NativeBuffer<u8>;

/// Allocates a zero-initialized sample buffer of `n` samples.
pub fn new_audio_data(n: usize) -> AudioData {
    NativeBuffer::zeroed(n)
}

/// Allocates an empty byte buffer.
pub fn new_bytes() -> Bytes {
    NativeBuffer::new()
}

impl<T: Element> NativeBuffer<T> {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Creates a buffer of `len` default-valued (zero) elements.
    pub fn zeroed(len: usize) -> Self {
        Self {
            data: vec![T::default(); len],
        }
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the element at `index`.
    pub fn get(&self, index: usize) -> Option<T> {
        self.data.get(index).copied()
    }

    /// Copies `src` into this buffer. Lengths must match.
    pub fn copy_from_host(&mut self, src: &[T]) -> Result<()> {
        check_len(self.data.len(), src.len())?;
        self.data.copy_from_slice(src);
        Ok(())
    }

    /// Copies this buffer into `dst`. Lengths must match.
    pub fn copy_to_host(&self, dst: &mut [T]) -> Result<()> {
        check_len(self.data.len(), dst.len())?;
        dst.copy_from_slice(&self.data);
        Ok(())
    }

    /// Lends the native memory to `f` for the duration of the call.
    ///
    /// Writes through the view land directly in the native buffer.
    pub fn with_view<R>(&mut self, f: impl FnOnce(&mut [T]) -> R) -> R {
        f(&mut self.data)
    }

    /// Lends the native memory read-only to `f` for the duration of the call.
    pub fn with_view_ref<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.data)
    }

    /// Removes all elements, keeping the allocation.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Appends a copy of `src`.
    pub fn extend_from_host(&mut self, src: &[T]) {
        self.data.extend_from_slice(src);
    }

    /// Replaces the contents with a copy of `src`.
    pub fn load(&mut self, src: &[T]) {
        self.data.clear();
        self.data.extend_from_slice(src);
    }

    /// Resizes to `len`, filling new slots with zero.
    pub fn resize(&mut self, len: usize) {
        self.data.resize(len, T::default());
    }

    /// Returns a copy of the contents.
    pub fn to_vec(&self) -> Vec<T> {
        self.data.clone()
    }

    /// Consumes the buffer and returns its contents.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub(crate) fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl<T: Element> From<Vec<T>> for NativeBuffer<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

fn check_len(expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(LyraError::BufferLengthMismatch { expected, got });
    }
    Ok(())
}

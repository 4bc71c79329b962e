//! # SECAM Fire Filter Instance
//!
//! One instance per host-side effect: remembers the frame size and the
//! current intensity, and keeps the backend's option block in sync with it.

use tracing::debug;

use crate::{
    backend::{frame_len, SecamBackend},
    error::Result,
    intensity::{normalize_intensity, SecamOptions, DEFAULT_INTENSITY},
};

/// A configured SECAM Fire effect bound to one frame size
#[derive(Debug)]
pub struct SecamFilter<B: SecamBackend> {
    backend: B,
    width: u32,
    height: u32,
    intensity: f64,
    options: SecamOptions,
}

impl<B: SecamBackend> SecamFilter<B> {
    /// Wrap a freshly opened backend at the default intensity
    pub fn new(backend: B, width: u32, height: u32) -> Result<Self> {
        Self::with_intensity(backend, width, height, DEFAULT_INTENSITY)
    }

    /// Wrap a freshly opened backend, starting at `intensity`
    pub fn with_intensity(backend: B, width: u32, height: u32, intensity: f64) -> Result<Self> {
        let intensity = normalize_intensity(intensity).unwrap_or(DEFAULT_INTENSITY);
        let mut filter = Self {
            backend,
            width,
            height,
            intensity,
            options: SecamOptions::from_intensity(intensity),
        };
        filter.backend.configure(&filter.options)?;
        Ok(filter)
    }

    /// Change the intensity and push the re-derived options to the backend
    ///
    /// Out-of-range values are clamped to `[0, 1]`; NaN and infinities leave
    /// the stored value as it was. The options are pushed either way.
    pub fn set_intensity(&mut self, intensity: f64) -> Result<()> {
        match normalize_intensity(intensity) {
            Some(value) => self.intensity = value,
            None => debug!("Ignoring non-finite intensity {}", intensity),
        }

        self.options = SecamOptions::from_intensity(self.intensity);
        debug!("Intensity {:.4} -> {:?}", self.intensity, self.options);
        self.backend.configure(&self.options)
    }

    /// Filter one RGBA8888 frame
    ///
    /// Leaves the intensity untouched.
    pub fn update(&mut self, input: &[u8], output: &mut [u8]) -> Result<()> {
        self.backend.filter_to_buffer(input, output)
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub fn options(&self) -> &SecamOptions {
        &self.options
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes in one input or output frame
    pub fn frame_len(&self) -> usize {
        frame_len(self.width, self.height)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

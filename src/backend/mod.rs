//! # libsecam Backend
//!
//! The pixel work is done by libsecam. This module binds its four-call
//! lifecycle (init, options, filter, close) and exposes it through the
//! [`SecamBackend`] trait so instance logic can be exercised without the
//! library present.
//!
//! libsecam is resolved at runtime with `libloading` by default. Build with
//! the `linked` feature to link a system copy at build time instead.

pub mod ffi;
mod libsecam;

pub use libsecam::{Libsecam, LibsecamHandle};

#[cfg(test)]
pub(crate) use libsecam::fake;

use crate::{error::Result, intensity::SecamOptions};

/// Bytes per RGBA8888 pixel
pub const BYTES_PER_PIXEL: usize = 4;

/// A live filter context bound to one frame size
///
/// Dropping the backend releases the underlying context.
pub trait SecamBackend {
    /// Overwrite the context's effect strengths
    fn configure(&mut self, options: &SecamOptions) -> Result<()>;

    /// Filter one RGBA8888 frame from `input` into `output`
    ///
    /// Both buffers must hold exactly `width * height * 4` bytes.
    fn filter_to_buffer(&mut self, input: &[u8], output: &mut [u8]) -> Result<()>;
}

/// Number of bytes in a packed RGBA8888 frame
pub fn frame_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * BYTES_PER_PIXEL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_len() {
        assert_eq!(frame_len(8, 8), 256);
        assert_eq!(frame_len(720, 576), 1_658_880);
        assert_eq!(frame_len(0, 576), 0);
    }
}

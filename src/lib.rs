//! # secamiz0r
//!
//! A frei0r filter plugin that emulates "SECAM fire": the streaks, chroma
//! loss and echoes of a worn SECAM signal.
//!
//! Built as a `cdylib`, the crate exports the frei0r C ABI so editors such as
//! Kdenlive, Shotcut or ffmpeg's `frei0r` filter can load it. The image
//! corruption itself is done by [libsecam]; this crate maps the single
//! user-facing intensity parameter onto libsecam's option block and manages
//! one libsecam context per plugin instance.
//!
//! [libsecam]: https://github.com/tuorqai/libsecam
//!
//! ## Using the filter from Rust
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use secamiz0r::{backend::Libsecam, SecamFilter};
//!
//! # fn main() -> secamiz0r::Result<()> {
//! let library = Arc::new(Libsecam::load_default()?);
//! let mut filter = SecamFilter::new(library.open(720, 576)?, 720, 576)?;
//! filter.set_intensity(0.6)?;
//!
//! let input = vec![0u8; filter.frame_len()];
//! let mut output = vec![0u8; filter.frame_len()];
//! filter.update(&input, &mut output)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`intensity`] - Intensity to option-block mapping
//! - [`backend`] - libsecam binding and the [`SecamBackend`](backend::SecamBackend) seam
//! - [`filter`] - Per-instance state
//! - [`frei0r`] - Exported frei0r entry points
//! - [`config`] - Configuration management
//! - [`frame`] - RGBA frames for the preview tool

pub mod backend;
pub mod config;
pub mod error;
pub mod filter;
pub mod frame;
pub mod frei0r;
pub mod intensity;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    error::{Result, Secamiz0rError},
    filter::SecamFilter,
    intensity::{SecamOptions, DEFAULT_INTENSITY},
};

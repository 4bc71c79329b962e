//! # Intensity Mapping
//!
//! Maps the single user-facing "Intensity" parameter (0.0-1.0) onto the
//! libsecam option block.
//!
//! The curve has two linear pieces. Below [`KNEE`] every field scales from
//! zero up to a mild baseline; above it every field travels from the
//! baseline to the library's documented maximum.

use serde::{Deserialize, Serialize};

/// Intensity a freshly constructed instance starts with
pub const DEFAULT_INTENSITY: f64 = 0.25;

/// Intensity where the low piece hands over to the high piece
pub const KNEE: f64 = 0.25;

/// Below this intensity horizontal instability is switched off entirely
pub const INSTABILITY_THRESHOLD: f64 = 0.0625;

/// Effect strengths as understood by libsecam
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SecamOptions {
    pub luma_noise_factor: f64,
    pub luma_fire_factor: f64,
    pub luma_loss_chance: f64,
    pub chroma_shift_chance: f64,
    pub chroma_noise_factor: f64,
    pub chroma_fire_factor: f64,
    pub chroma_loss_chance: f64,
    pub echo_offset: i32,
    pub horizontal_instability: i32,
}

/// Values reached at the knee
const BASELINE: SecamOptions = SecamOptions {
    luma_noise_factor: 0.07,
    luma_fire_factor: 0.005,
    luma_loss_chance: 0.02,
    chroma_shift_chance: 9.0,
    chroma_noise_factor: 0.25,
    chroma_fire_factor: 0.1,
    chroma_loss_chance: 0.03,
    echo_offset: 4,
    horizontal_instability: 2,
};

/// Values reached at full intensity
const MAXIMUM: SecamOptions = SecamOptions {
    luma_noise_factor: 2.0,
    luma_fire_factor: 0.5,
    luma_loss_chance: 2.0,
    chroma_shift_chance: 40.0,
    chroma_noise_factor: 1.0,
    chroma_fire_factor: 10.0,
    chroma_loss_chance: 2.0,
    echo_offset: 20,
    horizontal_instability: 32,
};

impl SecamOptions {
    /// Derive the option block for an intensity value
    ///
    /// Input is expected in `[0, 1]`; use [`normalize_intensity`] first for
    /// values coming from a host.
    pub fn from_intensity(intensity: f64) -> Self {
        if intensity < KNEE {
            let mul = intensity / KNEE;

            Self {
                luma_noise_factor: BASELINE.luma_noise_factor * mul,
                luma_fire_factor: BASELINE.luma_fire_factor * mul,
                luma_loss_chance: BASELINE.luma_loss_chance * mul,
                chroma_shift_chance: BASELINE.chroma_shift_chance * mul,
                chroma_noise_factor: BASELINE.chroma_noise_factor * mul,
                chroma_fire_factor: BASELINE.chroma_fire_factor * mul,
                chroma_loss_chance: BASELINE.chroma_loss_chance * mul,
                echo_offset: ceil_single(f64::from(BASELINE.echo_offset) * mul),
                horizontal_instability: if intensity < INSTABILITY_THRESHOLD {
                    0
                } else {
                    BASELINE.horizontal_instability
                },
            }
        } else {
            let mul = (intensity - KNEE) / (1.0 - KNEE);

            Self {
                luma_noise_factor: lerp(BASELINE.luma_noise_factor, MAXIMUM.luma_noise_factor, mul),
                luma_fire_factor: lerp(BASELINE.luma_fire_factor, MAXIMUM.luma_fire_factor, mul),
                luma_loss_chance: lerp(BASELINE.luma_loss_chance, MAXIMUM.luma_loss_chance, mul),
                chroma_shift_chance: lerp(BASELINE.chroma_shift_chance, MAXIMUM.chroma_shift_chance, mul),
                chroma_noise_factor: lerp(BASELINE.chroma_noise_factor, MAXIMUM.chroma_noise_factor, mul),
                chroma_fire_factor: lerp(BASELINE.chroma_fire_factor, MAXIMUM.chroma_fire_factor, mul),
                chroma_loss_chance: lerp(BASELINE.chroma_loss_chance, MAXIMUM.chroma_loss_chance, mul),
                echo_offset: ceil_single(lerp(
                    f64::from(BASELINE.echo_offset),
                    f64::from(MAXIMUM.echo_offset),
                    mul,
                )),
                horizontal_instability: ceil_single(lerp(
                    f64::from(BASELINE.horizontal_instability),
                    f64::from(MAXIMUM.horizontal_instability),
                    mul,
                )),
            }
        }
    }

    /// The option block at full intensity
    pub fn maximum() -> Self {
        MAXIMUM
    }
}

/// Clamp a host-supplied intensity into `[0, 1]`
///
/// Returns `None` for NaN and infinities so the caller can keep its
/// previous value.
pub fn normalize_intensity(value: f64) -> Option<f64> {
    if value.is_finite() {
        Some(value.clamp(0.0, 1.0))
    } else {
        None
    }
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

// libsecam receives integer offsets rounded up in single precision
fn ceil_single(value: f64) -> i32 {
    (value as f32).ceil() as i32
}

#![allow(non_camel_case_types)]

//! Raw libsecam declarations, mirroring `libsecam.h`.

use std::os::raw::{c_double, c_int, c_uchar, c_uint};

use crate::intensity::SecamOptions;

/// Opaque filter context.
#[repr(C)]
pub struct libsecam_t {
    _private: [u8; 0],
}

/// The option block owned by a context. Fields are read on every filtered frame.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default)]
pub struct libsecam_options_t {
    pub luma_noise_factor: c_double,
    pub luma_fire_factor: c_double,
    pub luma_loss_chance: c_double,
    pub chroma_shift_chance: c_double,
    pub chroma_noise_factor: c_double,
    pub chroma_fire_factor: c_double,
    pub chroma_loss_chance: c_double,
    pub echo_offset: c_int,
    pub horizontal_instability: c_int,
}

impl libsecam_options_t {
    /// Copy effect strengths in field by field, leaving any trailing
    /// library-private fields untouched.
    pub fn assign(&mut self, options: &SecamOptions) {
        self.luma_noise_factor = options.luma_noise_factor;
        self.luma_fire_factor = options.luma_fire_factor;
        self.luma_loss_chance = options.luma_loss_chance;
        self.chroma_shift_chance = options.chroma_shift_chance;
        self.chroma_noise_factor = options.chroma_noise_factor;
        self.chroma_fire_factor = options.chroma_fire_factor;
        self.chroma_loss_chance = options.chroma_loss_chance;
        self.echo_offset = options.echo_offset;
        self.horizontal_instability = options.horizontal_instability;
    }
}

/// `libsecam_t *libsecam_init(unsigned int width, unsigned int height)`
pub type InitFn = unsafe extern "C" fn(width: c_uint, height: c_uint) -> *mut libsecam_t;

/// `libsecam_options_t *libsecam_options(libsecam_t *self)`
pub type OptionsFn = unsafe extern "C" fn(ctx: *mut libsecam_t) -> *mut libsecam_options_t;

/// `void libsecam_filter_to_buffer(libsecam_t *self, unsigned char const *src, unsigned char *dst)`
pub type FilterToBufferFn =
    unsafe extern "C" fn(ctx: *mut libsecam_t, src: *const c_uchar, dst: *mut c_uchar);

/// `void libsecam_close(libsecam_t *self)`
pub type CloseFn = unsafe extern "C" fn(ctx: *mut libsecam_t);

pub const INIT_SYMBOL: &[u8] = b"libsecam_init\0";
pub const OPTIONS_SYMBOL: &[u8] = b"libsecam_options\0";
pub const FILTER_TO_BUFFER_SYMBOL: &[u8] = b"libsecam_filter_to_buffer\0";
pub const CLOSE_SYMBOL: &[u8] = b"libsecam_close\0";

#[cfg(feature = "linked")]
#[link(name = "secam")]
extern "C" {
    pub fn libsecam_init(width: c_uint, height: c_uint) -> *mut libsecam_t;
    pub fn libsecam_options(ctx: *mut libsecam_t) -> *mut libsecam_options_t;
    pub fn libsecam_filter_to_buffer(ctx: *mut libsecam_t, src: *const c_uchar, dst: *mut c_uchar);
    pub fn libsecam_close(ctx: *mut libsecam_t);
}

//! # frei0r Entry Points
//!
//! The C ABI a frei0r host resolves from the shared library. Every function
//! here is a thin shell: pointers are checked, then the work is handed to
//! [`SecamFilter`].
//!
//! The plugin exposes one parameter:
//!
//! | index | name        | type   | range     | default |
//! |-------|-------------|--------|-----------|---------|
//! | 0     | `Intensity` | double | 0.0 - 1.0 | 0.25    |

pub mod abi;
mod runtime;

use std::os::raw::{c_int, c_uint};
use std::slice;

use tracing::{debug, warn};

use crate::{
    backend::{LibsecamHandle, SecamBackend},
    error::Result,
    filter::SecamFilter,
};
use abi::*;
use runtime::{runtime, Runtime};

/// Index of the intensity parameter
pub const PARAM_INTENSITY: c_int = 0;

/// Number of parameters the plugin exposes
pub const PARAM_COUNT: c_int = 1;

pub const PLUGIN_MAJOR_VERSION: c_int = 1;
pub const PLUGIN_MINOR_VERSION: c_int = 0;

type Instance = SecamFilter<LibsecamHandle>;

#[no_mangle]
pub extern "C" fn f0r_init() -> c_int {
    let runtime = runtime();
    debug!(
        "secamiz0r {} ready, default intensity {}",
        env!("CARGO_PKG_VERSION"),
        runtime.config().filter.default_intensity
    );
    1
}

#[no_mangle]
pub extern "C" fn f0r_deinit() {
    debug!("secamiz0r unloading");
}

/// # Safety
///
/// `info` must be null or point to a writable `f0r_plugin_info_t`.
#[no_mangle]
pub unsafe extern "C" fn f0r_get_plugin_info(info: *mut f0r_plugin_info_t) {
    let Some(info) = info.as_mut() else {
        warn!("f0r_get_plugin_info called with a null info pointer");
        return;
    };

    info.name = c"secamiz0r".as_ptr();
    info.author = c"tuorqai".as_ptr();
    info.plugin_type = F0R_PLUGIN_TYPE_FILTER;
    info.color_model = F0R_COLOR_MODEL_RGBA8888;
    info.frei0r_version = FREI0R_MAJOR_VERSION;
    info.major_version = PLUGIN_MAJOR_VERSION;
    info.minor_version = PLUGIN_MINOR_VERSION;
    info.num_params = PARAM_COUNT;
    info.explanation = c"SECAM Fire effect".as_ptr();
}

/// # Safety
///
/// `info` must be null or point to a writable `f0r_param_info_t`.
#[no_mangle]
pub unsafe extern "C" fn f0r_get_param_info(info: *mut f0r_param_info_t, index: c_int) {
    let Some(info) = info.as_mut() else {
        warn!("f0r_get_param_info called with a null info pointer");
        return;
    };

    match index {
        PARAM_INTENSITY => {
            info.name = c"Intensity".as_ptr();
            info.type_ = F0R_PARAM_DOUBLE;
            info.explanation = std::ptr::null();
        }
        _ => {}
    }
}

#[no_mangle]
pub extern "C" fn f0r_construct(width: c_uint, height: c_uint) -> f0r_instance_t {
    construct_instance(runtime(), width, height)
}

fn construct_instance(runtime: &Runtime, width: c_uint, height: c_uint) -> f0r_instance_t {
    match runtime.construct(width, height) {
        Ok(instance) => Box::into_raw(Box::new(instance)).cast(),
        Err(e) => {
            warn!("Could not construct {}x{} instance: {}", width, height, e);
            std::ptr::null_mut()
        }
    }
}

/// # Safety
///
/// `instance` must be null or a pointer returned by [`f0r_construct`] that
/// has not been destructed yet.
#[no_mangle]
pub unsafe extern "C" fn f0r_destruct(instance: f0r_instance_t) {
    if instance.is_null() {
        warn!("f0r_destruct called with a null instance");
        return;
    }

    // Dropping the filter closes the libsecam context
    drop(Box::from_raw(instance.cast::<Instance>()));
}

/// # Safety
///
/// `instance` must be null or a live instance; for the intensity index
/// `param` must be null or point to an `f0r_param_double`.
#[no_mangle]
pub unsafe extern "C" fn f0r_set_param_value(instance: f0r_instance_t, param: f0r_param_t, index: c_int) {
    let Some(filter) = instance.cast::<Instance>().as_mut() else {
        warn!("f0r_set_param_value called with a null instance");
        return;
    };

    if let Err(e) = set_param(filter, param, index) {
        warn!("Could not apply parameter {}: {}", index, e);
    }
}

/// # Safety
///
/// `instance` must be null or a live instance; for the intensity index
/// `param` must be null or point to a writable `f0r_param_double`.
#[no_mangle]
pub unsafe extern "C" fn f0r_get_param_value(instance: f0r_instance_t, param: f0r_param_t, index: c_int) {
    let Some(filter) = instance.cast::<Instance>().as_ref() else {
        warn!("f0r_get_param_value called with a null instance");
        return;
    };

    get_param(filter, param, index);
}

/// # Safety
///
/// `instance` must be null or a live instance. `inframe` and `outframe`
/// must be null or point to `width * height` pixels each.
#[no_mangle]
pub unsafe extern "C" fn f0r_update(
    instance: f0r_instance_t,
    _time: f64,
    inframe: *const u32,
    outframe: *mut u32,
) {
    let Some(filter) = instance.cast::<Instance>().as_mut() else {
        warn!("f0r_update called with a null instance");
        return;
    };

    if let Err(e) = update(filter, inframe, outframe) {
        warn!("Frame update failed: {}", e);
    }
}

/// Same as [`f0r_update`], reading `inframe1` and ignoring the other inputs.
///
/// # Safety
///
/// See [`f0r_update`].
#[no_mangle]
pub unsafe extern "C" fn f0r_update2(
    instance: f0r_instance_t,
    time: f64,
    inframe1: *const u32,
    _inframe2: *const u32,
    _inframe3: *const u32,
    outframe: *mut u32,
) {
    f0r_update(instance, time, inframe1, outframe);
}

/// Apply a host-supplied parameter and re-derive the option block
///
/// The options are pushed to the backend for every index, recognised or
/// not.
unsafe fn set_param<B: SecamBackend>(filter: &mut SecamFilter<B>, param: f0r_param_t, index: c_int) -> Result<()> {
    let value = match index {
        PARAM_INTENSITY => param.cast::<f0r_param_double>().as_ref().copied(),
        _ => None,
    };

    if value.is_none() {
        debug!("No value for parameter {}, refreshing options", index);
    }

    filter.set_intensity(value.unwrap_or(filter.intensity()))
}

unsafe fn get_param<B: SecamBackend>(filter: &SecamFilter<B>, param: f0r_param_t, index: c_int) {
    match index {
        PARAM_INTENSITY => {
            if let Some(slot) = param.cast::<f0r_param_double>().as_mut() {
                *slot = filter.intensity();
            }
        }
        _ => {}
    }
}

unsafe fn update<B: SecamBackend>(
    filter: &mut SecamFilter<B>,
    inframe: *const u32,
    outframe: *mut u32,
) -> Result<()> {
    if inframe.is_null() || outframe.is_null() {
        warn!("Skipping update with a null frame pointer");
        return Ok(());
    }

    let len = filter.frame_len();
    let output = slice::from_raw_parts_mut(outframe.cast::<u8>(), len);

    // Some hosts filter in place; the input must not alias the output slice
    if std::ptr::eq(inframe.cast::<u8>(), output.as_ptr()) {
        debug!("In-place update, copying input frame");
        let input = output.to_vec();
        return filter.update(&input, output);
    }

    let input = slice::from_raw_parts(inframe.cast::<u8>(), len);
    filter.update(input, output)
}

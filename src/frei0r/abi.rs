#![allow(non_camel_case_types)]

//! frei0r 1.2 ABI types, as laid out in `frei0r.h`.

use std::os::raw::{c_char, c_int, c_void};

pub const FREI0R_MAJOR_VERSION: c_int = 1;
pub const FREI0R_MINOR_VERSION: c_int = 2;
pub const F0R_PLUGIN_TYPE_FILTER: c_int = 0;
pub const F0R_PLUGIN_TYPE_SOURCE: c_int = 1;
pub const F0R_PLUGIN_TYPE_MIXER2: c_int = 2;
pub const F0R_PLUGIN_TYPE_MIXER3: c_int = 3;
pub const F0R_COLOR_MODEL_BGRA8888: c_int = 0;
pub const F0R_COLOR_MODEL_RGBA8888: c_int = 1;
pub const F0R_COLOR_MODEL_PACKED32: c_int = 2;
pub const F0R_PARAM_BOOL: c_int = 0;
pub const F0R_PARAM_DOUBLE: c_int = 1;
pub const F0R_PARAM_COLOR: c_int = 2;
pub const F0R_PARAM_POSITION: c_int = 3;
pub const F0R_PARAM_STRING: c_int = 4;

/// The double type. The allowed range of values is [0, 1].
pub type f0r_param_double = f64;
/// Transparent instance pointer of the frei0r effect.
pub type f0r_instance_t = *mut c_void;
/// Transparent parameter handle.
pub type f0r_param_t = *mut c_void;

/// Filled by the plugin for every parameter.
///
/// All strings are 0-terminated UTF-8 and must outlive the plugin.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct f0r_param_info_t {
    /// The (short) name of the param
    pub name: *const c_char,
    /// The type (see the F0R_PARAM_* constants)
    pub type_: c_int,
    /// Optional explanation (can be 0)
    pub explanation: *const c_char,
}

/// Filled by the plugin to tell the host about its name, type, number of
/// parameters and version.
///
/// Hosts ignore effects with unknown plugin types or color models, and
/// effects built for a newer frei0r major version.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct f0r_plugin_info_t {
    /// The (short) name of the plugin
    pub name: *const c_char,
    /// The plugin author
    pub author: *const c_char,
    /// The plugin type, see F0R_PLUGIN_TYPE_*
    pub plugin_type: c_int,
    /// The color model used
    pub color_model: c_int,
    /// The frei0r major version this plugin is built for
    pub frei0r_version: c_int,
    /// The major version of the plugin
    pub major_version: c_int,
    /// The minor version of the plugin
    pub minor_version: c_int,
    /// The number of parameters of the plugin
    pub num_params: c_int,
    /// An optional explanation string
    pub explanation: *const c_char,
}

impl Default for f0r_plugin_info_t {
    fn default() -> Self {
        Self {
            name: std::ptr::null(),
            author: std::ptr::null(),
            plugin_type: -1,
            color_model: -1,
            frei0r_version: 0,
            major_version: 0,
            minor_version: 0,
            num_params: 0,
            explanation: std::ptr::null(),
        }
    }
}

impl Default for f0r_param_info_t {
    fn default() -> Self {
        Self {
            name: std::ptr::null(),
            type_: -1,
            explanation: std::ptr::null(),
        }
    }
}

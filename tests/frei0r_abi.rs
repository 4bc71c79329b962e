//! Drives the exported frei0r functions the way a host does after
//! `dlopen`, with libsecam deliberately unavailable.

use std::ffi::CStr;

use secamiz0r::frei0r::{
    abi::{f0r_param_info_t, f0r_plugin_info_t, F0R_COLOR_MODEL_RGBA8888, F0R_PARAM_DOUBLE, F0R_PLUGIN_TYPE_FILTER},
    f0r_construct, f0r_deinit, f0r_get_param_info, f0r_get_plugin_info, f0r_init, PARAM_COUNT,
};
use tempfile::tempdir;

#[test]
fn test_host_introspection() {
    let mut plugin = f0r_plugin_info_t::default();
    unsafe { f0r_get_plugin_info(&mut plugin) };

    assert_eq!(plugin.plugin_type, F0R_PLUGIN_TYPE_FILTER);
    assert_eq!(plugin.color_model, F0R_COLOR_MODEL_RGBA8888);
    assert_eq!(plugin.num_params, PARAM_COUNT);

    for index in 0..plugin.num_params {
        let mut param = f0r_param_info_t::default();
        unsafe { f0r_get_param_info(&mut param, index) };

        assert!(!param.name.is_null());
        assert_eq!(param.type_, F0R_PARAM_DOUBLE);
        let name = unsafe { CStr::from_ptr(param.name) };
        assert_eq!(name.to_str().unwrap(), "Intensity");
    }
}

#[test]
fn test_construct_without_libsecam_returns_null() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("secamiz0r.toml");
    std::fs::write(&config_path, "[filter]\ndefault_intensity = 0.5\n").unwrap();

    std::env::set_var("SECAMIZ0R_CONFIG", &config_path);
    std::env::set_var("SECAMIZ0R_LIBRARY", dir.path().join("libsecam-missing.so"));

    assert_eq!(f0r_init(), 1);
    assert!(f0r_construct(720, 576).is_null());
    assert!(f0r_construct(0, 0).is_null());
    f0r_deinit();
}

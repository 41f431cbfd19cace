use std::boxed::Box;
use std::os::raw::{c_double, c_int};

use crate::FilterConfig;

pub struct Lowpass(crate::Lowpass<f64>);

pub struct Highpass(crate::Highpass<f64>);

/// Create a lowpass filter
///
/// Returns NULL if `cutoff_frequency` or `sample_period` is not finite and positive. Use
/// `cfilter_lowpass_destroy` to deallocate it.
#[no_mangle]
pub unsafe extern "C" fn cfilter_lowpass_create(
    cutoff_frequency: c_double,
    sample_period: c_double,
) -> *mut Lowpass {
    match FilterConfig::new(cutoff_frequency, sample_period) {
        Ok(config) => Box::into_raw(Box::new(Lowpass(crate::Lowpass::new(&config)))),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Filter one sample
///
/// The filtered value and its derivative are written to `value` and `derivative`; either may be
/// NULL. Returns 0, or -1 if `st` is NULL.
#[no_mangle]
pub unsafe extern "C" fn cfilter_lowpass_update(
    st: *mut Lowpass,
    input: c_double,
    value: *mut c_double,
    derivative: *mut c_double,
) -> c_int {
    let state = match st.as_mut() {
        Some(state) => state,
        None => return -1,
    };
    let out = state.0.update(input);
    if let Some(value) = value.as_mut() {
        *value = out.value;
    }
    if let Some(derivative) = derivative.as_mut() {
        *derivative = out.derivative;
    }
    0
}

/// Reset a lowpass filter to its initial state
#[no_mangle]
pub unsafe extern "C" fn cfilter_lowpass_reset(st: *mut Lowpass) {
    if let Some(state) = st.as_mut() {
        state.0.reset();
    }
}

/// Deallocate and destroy a lowpass filter
///
/// Use it only on pointers returned by `cfilter_lowpass_create`.
#[no_mangle]
pub unsafe extern "C" fn cfilter_lowpass_destroy(st: *mut Lowpass) {
    if !st.is_null() {
        let _ = Box::from_raw(st);
    }
}

/// Create a highpass filter
///
/// Returns NULL if `cutoff_frequency` or `sample_period` is not finite and positive. Use
/// `cfilter_highpass_destroy` to deallocate it.
#[no_mangle]
pub unsafe extern "C" fn cfilter_highpass_create(
    cutoff_frequency: c_double,
    sample_period: c_double,
) -> *mut Highpass {
    match FilterConfig::new(cutoff_frequency, sample_period) {
        Ok(config) => Box::into_raw(Box::new(Highpass(crate::Highpass::new(&config)))),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Filter one sample
///
/// Returns the filtered sample, or NaN if `st` is NULL. If `state` is not NULL, the two internal
/// state components are written to `state[0]` and `state[1]`.
#[no_mangle]
pub unsafe extern "C" fn cfilter_highpass_update(
    st: *mut Highpass,
    input: c_double,
    state: *mut c_double,
) -> c_double {
    let filter = match st.as_mut() {
        Some(filter) => filter,
        None => return f64::NAN,
    };
    let out = filter.0.update(input);
    if !state.is_null() {
        let state = std::slice::from_raw_parts_mut(state, 2);
        state[0] = out.state.s0;
        state[1] = out.state.s1;
    }
    out.value
}

/// Reset a highpass filter to its initial state
#[no_mangle]
pub unsafe extern "C" fn cfilter_highpass_reset(st: *mut Highpass) {
    if let Some(filter) = st.as_mut() {
        filter.0.reset();
    }
}

/// Deallocate and destroy a highpass filter
///
/// Use it only on pointers returned by `cfilter_highpass_create`.
#[no_mangle]
pub unsafe extern "C" fn cfilter_highpass_destroy(st: *mut Highpass) {
    if !st.is_null() {
        let _ = Box::from_raw(st);
    }
}

use pollen_sim_core::{DispersionModel, ModelParameters};
use std::ffi::CStr;
use std::os::raw::c_char;
use std::ptr;

use crate::error::{DefaultPollenSimError, PollenSimErrorCode};
use crate::helpers::{track_error, track_result};

/// A dispersion model with its parameter set.
///
/// # Thread Safety
/// The model is immutable after creation, so one instance may be shared by
/// any number of threads without locking. Each evaluation is independent.
///
/// # Example (C)
/// ```c
/// PollenSimInstance* sim = NULL;
/// if (pollen_sim_new(&sim) != Ok) {
///     fprintf(stderr, "%s\n", pollen_sim_get_last_error());
///     return;
/// }
/// /* ... pollen_sim_evaluate(sim, ...) from any thread ... */
/// pollen_sim_destroy(sim);
/// ```
pub struct PollenSimInstance {
    pub(crate) model: DispersionModel,
}

impl PollenSimInstance {
    pub(crate) fn new(params: ModelParameters) -> Result<Box<Self>, DefaultPollenSimError> {
        let model = DispersionModel::new(params)?;
        Ok(Box::new(Self { model }))
    }
}

/// Write the outcome of a constructor to `out_instance`.
///
/// # Safety
/// `out_instance` must be non-null and valid for writes.
unsafe fn publish(
    result: Result<Box<PollenSimInstance>, DefaultPollenSimError>,
    out_instance: *mut *mut PollenSimInstance,
) -> PollenSimErrorCode {
    match track_result(result) {
        Ok(instance) => {
            unsafe {
                *out_instance = Box::into_raw(instance);
            }
            PollenSimErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                // Set to null on error (per documentation contract)
                *out_instance = ptr::null_mut();
            }
            code
        }
    }
}

/// Create a model with the built-in (uncalibrated) parameter set.
///
/// Returns
/// - `Ok` with a new instance in `out_instance`
/// - `NullPointer` if `out_instance` is null
///
/// # Safety
/// `out_instance` must be a valid pointer to a `PollenSimInstance*` or null.
/// The instance must be released with `pollen_sim_destroy`.
#[no_mangle]
pub unsafe extern "C" fn pollen_sim_new(
    out_instance: *mut *mut PollenSimInstance,
) -> PollenSimErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultPollenSimError::null_pointer("out_instance"));
    }
    unsafe { publish(PollenSimInstance::new(ModelParameters::default()), out_instance) }
}

/// Create a model from a TOML parameter file.
///
/// Tables missing from the file keep their built-in values.
///
/// Returns
/// - `Ok` with a new instance in `out_instance`
/// - `NullPointer` if `path` or `out_instance` is null
/// - `ConfigError` if the file cannot be read or parsed
/// - `InvalidParameter` if the path is not UTF-8 or the parameters fail validation
///
/// # Safety
/// `path` must be null or a valid null-terminated string. `out_instance`
/// must be a valid pointer to a `PollenSimInstance*` or null.
#[no_mangle]
pub unsafe extern "C" fn pollen_sim_new_from_file(
    path: *const c_char,
    out_instance: *mut *mut PollenSimInstance,
) -> PollenSimErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultPollenSimError::null_pointer("out_instance"));
    }
    if path.is_null() {
        unsafe {
            *out_instance = ptr::null_mut();
        }
        return track_error(&DefaultPollenSimError::null_pointer("path"));
    }

    // SAFETY: non-null and null-terminated per the contract above
    let path = unsafe { CStr::from_ptr(path) };
    let result = path
        .to_str()
        .map_err(|e| DefaultPollenSimError::invalid_parameter(format!("path is not UTF-8: {e}")))
        .and_then(|path| ModelParameters::load(path).map_err(DefaultPollenSimError::from))
        .and_then(PollenSimInstance::new);
    unsafe { publish(result, out_instance) }
}

/// Release an instance created by `pollen_sim_new*`. Null is ignored.
///
/// # Safety
/// `ptr` must be null or a pointer returned by `pollen_sim_new*` that has
/// not been destroyed yet.
#[no_mangle]
pub unsafe extern "C" fn pollen_sim_destroy(ptr: *mut PollenSimInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: The pointer was created by `Box::into_raw` in `publish`
    // and not freed or moved elsewhere.
    unsafe {
        drop(Box::from_raw(ptr));
    }
}

use crate::error::{with_last_error_mut, DefaultPollenSimError, PollenSimError, PollenSimErrorCode};
use crate::instance::PollenSimInstance;
use std::ffi::CString;

/// Set the thread-local error message and code.
/// Accepts any type implementing `PollenSimError` trait.
pub(crate) fn set_last_error(error: &impl PollenSimError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl PollenSimError) -> PollenSimErrorCode {
    set_last_error(error);
    error.code()
}

/// Record the error of a failed result and convert it to its code;
/// successful results clear the thread-local error.
pub(crate) fn track_result<T, E>(result: Result<T, E>) -> Result<T, PollenSimErrorCode>
where
    E: Into<DefaultPollenSimError>,
{
    match result {
        Ok(value) => {
            clear_last_error();
            Ok(value)
        }
        Err(error) => Err(track_error(&error.into())),
    }
}

/// Clear the thread-local error message and code.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = PollenSimErrorCode::Ok;
    });
}

/// Borrow the instance behind `ptr`, or record a null-pointer error.
///
/// # Safety
/// `ptr` must be null or a live pointer returned by `pollen_sim_new*`.
pub(crate) unsafe fn instance_from_ptr<'a>(
    ptr: *const PollenSimInstance,
) -> Result<&'a PollenSimInstance, PollenSimErrorCode> {
    // SAFETY: caller guarantees the pointer is null or valid for 'a
    unsafe { ptr.as_ref() }.ok_or_else(|| track_error(&DefaultPollenSimError::null_pointer("ptr")))
}

/// Borrow a non-null input struct, or record a null-pointer error.
///
/// # Safety
/// `ptr` must be null or point to a valid, initialised `T`.
pub(crate) unsafe fn input_from_ptr<'a, T>(
    ptr: *const T,
    param_name: &str,
) -> Result<&'a T, PollenSimErrorCode> {
    // SAFETY: caller guarantees the pointer is null or valid for 'a
    unsafe { ptr.as_ref() }
        .ok_or_else(|| track_error(&DefaultPollenSimError::null_pointer(param_name)))
}

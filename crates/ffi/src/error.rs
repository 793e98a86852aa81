use pollen_sim_core::DispersionError;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for FFI error types.
///
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
pub(crate) trait PollenSimError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> PollenSimErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `PollenSimError` for FFI-side failures and
/// errors forwarded from the core library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultPollenSimError {
    code: PollenSimErrorCode,
    msg: String,
}

impl DefaultPollenSimError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null
    ///   (e.g., `"out_instance"`, `"source"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: PollenSimErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for an enum code outside its documented range.
    ///
    /// # Arguments
    /// * `param_name` - The name of the field (e.g., `"terrain"`, `"insolation"`)
    /// * `value` - The rejected code
    pub fn invalid_code(param_name: &str, value: u8) -> Self {
        Self {
            code: PollenSimErrorCode::InvalidParameter,
            msg: format!("Parameter '{param_name}' has unknown code {value}"),
        }
    }

    /// Create error for invalid parameter.
    ///
    /// # Arguments
    /// * `message` - Description of the error
    pub fn invalid_parameter(message: String) -> Self {
        Self {
            code: PollenSimErrorCode::InvalidParameter,
            msg: message,
        }
    }
}

impl From<&DispersionError> for DefaultPollenSimError {
    fn from(error: &DispersionError) -> Self {
        let code = match error {
            DispersionError::MissingInput { .. } => PollenSimErrorCode::MissingInput,
            DispersionError::InvalidCoordinate { .. } => PollenSimErrorCode::InvalidCoordinate,
            DispersionError::InvalidWindSpeed(_) => PollenSimErrorCode::InvalidWindSpeed,
            DispersionError::InvalidHour(_) | DispersionError::InvalidParameters(_) => {
                PollenSimErrorCode::InvalidParameter
            }
            DispersionError::ConfigRead(_) | DispersionError::ConfigParse(_) => {
                PollenSimErrorCode::ConfigError
            }
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

impl From<DispersionError> for DefaultPollenSimError {
    fn from(error: DispersionError) -> Self {
        Self::from(&error)
    }
}

impl PollenSimError for DefaultPollenSimError {
    fn code(&self) -> PollenSimErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by pollen simulation functions.
/// Follows standard C convention: 0 = success, non-zero = error.
///
/// A zero concentration (calm wind, rain, upwind target) is a successful
/// result, not an error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollenSimErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// A mandatory numeric field is NaN or infinite.
    MissingInput = 2,

    /// Wind speed is negative or not finite.
    InvalidWindSpeed = 3,

    /// Invalid parameter passed to function (unknown enum code, bad parameter set).
    InvalidParameter = 4,

    /// Latitude or longitude out of range.
    InvalidCoordinate = 5,

    /// Parameter file could not be read or parsed.
    ConfigError = 6,
}

impl From<DefaultPollenSimError> for PollenSimErrorCode {
    fn from(error: DefaultPollenSimError) -> Self {
        error.code
    }
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// The CString is stored to prevent memory leaks when returning raw pointers via FFI.
    static LAST_ERROR: RefCell<(Option<CString>, PollenSimErrorCode)> =
        const { RefCell::new((None, PollenSimErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, PollenSimErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, PollenSimErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if an error occurred.
/// - `null` if no error has occurred or the message cannot be converted to a C string.
///
/// # Thread Safety
/// Error messages are stored per-thread, so each thread has its own independent error state.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread that
/// sets or clears the error, or until the thread terminates.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```c
/// double c = 0.0;
/// PollenSimErrorCode err = pollen_sim_concentration(sim, &source, &target, &weather, 2, &c);
/// if (err != Ok) {
///     const char* error = pollen_sim_get_last_error();
///     if (error) {
///         printf("Evaluation failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn pollen_sim_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code.
///
/// Returns `Ok` (0) if the last call on this thread succeeded.
#[no_mangle]
pub extern "C" fn pollen_sim_get_last_error_code() -> PollenSimErrorCode {
    with_last_error(|(_cstring, code)| *code)
}

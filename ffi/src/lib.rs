//! C-ABI wrapper around `netkit-core`.
//!
//! # Overview
//! Exposes header collections and request building through `extern "C"`
//! functions, so a host application can shape requests with the core and
//! run them on its own platform HTTP client.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Header collections are opaque `FfiHeaders` handles mutated through
//!   functions that mirror the core API.
//! - `netkit_build_request` returns a single `FfiBuildResult` envelope that
//!   carries either the built request or an error code and message.
//! - The C caller owns all returned pointers and must call the matching
//!   `netkit_free_*` / `netkit_headers_free` function to release them.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::catch_unwind;

use netkit_core::{HttpHeaders, Parameters, Request, RequestConvertible};

use types::*;

/// Borrow a C string as UTF-8. `None` for null or invalid UTF-8.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives the
/// returned reference.
unsafe fn read_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

// ---------------------------------------------------------------------------
// Header collections
// ---------------------------------------------------------------------------

/// Create an empty header collection.
///
/// The caller must free the returned pointer with `netkit_headers_free`.
#[unsafe(no_mangle)]
pub extern "C" fn netkit_headers_new() -> *mut FfiHeaders {
    catch_unwind(|| Box::into_raw(Box::new(FfiHeaders { inner: HttpHeaders::new() })))
        .unwrap_or(std::ptr::null_mut())
}

/// Create a collection holding Accept-Encoding, Accept-Language and
/// User-Agent for the running process.
#[unsafe(no_mangle)]
pub extern "C" fn netkit_headers_default() -> *mut FfiHeaders {
    catch_unwind(|| Box::into_raw(Box::new(FfiHeaders { inner: HttpHeaders::defaults() })))
        .unwrap_or(std::ptr::null_mut())
}

/// Free a header collection. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn netkit_headers_free(headers: *mut FfiHeaders) {
    if !headers.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(headers) });
        });
    }
}

/// Add or replace a header (names compare case-insensitively).
///
/// Returns false if any argument is null or not valid UTF-8.
#[unsafe(no_mangle)]
pub extern "C" fn netkit_headers_add(
    headers: *mut FfiHeaders,
    name: *const c_char,
    value: *const c_char,
) -> bool {
    catch_unwind(|| {
        if headers.is_null() {
            return false;
        }
        let (Some(name), Some(value)) = (unsafe { read_str(name) }, unsafe { read_str(value) }) else {
            return false;
        };
        let headers = unsafe { &mut *headers };
        headers.inner.add((name, value));
        true
    })
    .unwrap_or(false)
}

/// Remove a header by case-insensitive name. Removing an absent name is not
/// an error. Returns false only for null or invalid arguments.
#[unsafe(no_mangle)]
pub extern "C" fn netkit_headers_remove(headers: *mut FfiHeaders, name: *const c_char) -> bool {
    catch_unwind(|| {
        if headers.is_null() {
            return false;
        }
        let Some(name) = (unsafe { read_str(name) }) else {
            return false;
        };
        let headers = unsafe { &mut *headers };
        headers.inner.remove(name);
        true
    })
    .unwrap_or(false)
}

/// Look up a header value by case-insensitive name.
///
/// Returns null if absent. A non-null result must be freed with
/// `netkit_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn netkit_headers_value(headers: *const FfiHeaders, name: *const c_char) -> *mut c_char {
    catch_unwind(|| {
        if headers.is_null() {
            return std::ptr::null_mut();
        }
        let Some(name) = (unsafe { read_str(name) }) else {
            return std::ptr::null_mut();
        };
        let headers = unsafe { &*headers };
        match headers.inner.value(name) {
            Some(value) => to_c_string(value.to_string()),
            None => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Number of headers in the collection; 0 for null.
#[unsafe(no_mangle)]
pub extern "C" fn netkit_headers_len(headers: *const FfiHeaders) -> u32 {
    catch_unwind(|| {
        if headers.is_null() {
            return 0;
        }
        unsafe { &*headers }.inner.len() as u32
    })
    .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Request building
// ---------------------------------------------------------------------------

/// Build a request.
///
/// `headers` may be null (no headers); the collection is copied, so the
/// caller may keep editing or free it afterwards. `params_json` may be null
/// (no parameters); otherwise it must be a JSON object.
///
/// Always returns a result; free it with `netkit_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn netkit_build_request(
    url: *const c_char,
    method: FfiHttpMethod,
    headers: *const FfiHeaders,
    params_json: *const c_char,
    encoding: FfiEncoding,
) -> *mut FfiBuildResult {
    catch_unwind(|| {
        if url.is_null() {
            return FfiBuildResult::null_arg("url");
        }
        let Some(url) = (unsafe { read_str(url) }) else {
            return FfiBuildResult::error(FfiErrorCode::InvalidString, "url is not valid UTF-8");
        };

        let parameters = if params_json.is_null() {
            None
        } else {
            let Some(raw) = (unsafe { read_str(params_json) }) else {
                return FfiBuildResult::error(FfiErrorCode::InvalidString, "params_json is not valid UTF-8");
            };
            match serde_json::from_str::<Parameters>(raw) {
                Ok(parameters) => Some(parameters),
                Err(e) => {
                    return FfiBuildResult::error(
                        FfiErrorCode::InvalidParameters,
                        &format!("params_json must be a JSON object: {e}"),
                    )
                }
            }
        };

        let mut request = Request::new(url, method.into()).encoding(encoding);
        if !headers.is_null() {
            request.headers = Some(unsafe { &*headers }.inner.clone());
        }
        request.parameters = parameters;

        match request.as_request() {
            Ok(req) => FfiBuildResult::ok(req),
            Err(e) => FfiBuildResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiBuildResult::panic("panic in netkit_build_request"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiBuildResult` and the request it carries. Safe to call with
/// null.
#[unsafe(no_mangle)]
pub extern "C" fn netkit_free_result(result: *mut FfiBuildResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        if !result.request.is_null() {
            unsafe { FfiHttpRequest::free(result.request) };
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn netkit_free_string(s: *mut c_char) {
    let _ = catch_unwind(|| free_c_string(s));
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

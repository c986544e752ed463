//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, pointer + length pairs instead of `Vec`,
//! and enums with explicit discriminants. Conversion functions live here to
//! keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use netkit_core::{HttpHeaders, HttpMethod, JsonEncoding, NetworkError, ParameterEncoding, UrlEncoding};

/// Opaque handle to an `HttpHeaders` collection.
pub struct FfiHeaders {
    pub(crate) inner: HttpHeaders,
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
    Head = 4,
    Connect = 5,
    Options = 6,
    Patch = 7,
    Trace = 8,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
            HttpMethod::Head => FfiHttpMethod::Head,
            HttpMethod::Connect => FfiHttpMethod::Connect,
            HttpMethod::Options => FfiHttpMethod::Options,
            HttpMethod::Patch => FfiHttpMethod::Patch,
            HttpMethod::Trace => FfiHttpMethod::Trace,
        }
    }
}

impl From<FfiHttpMethod> for HttpMethod {
    fn from(m: FfiHttpMethod) -> Self {
        match m {
            FfiHttpMethod::Get => HttpMethod::Get,
            FfiHttpMethod::Post => HttpMethod::Post,
            FfiHttpMethod::Put => HttpMethod::Put,
            FfiHttpMethod::Delete => HttpMethod::Delete,
            FfiHttpMethod::Head => HttpMethod::Head,
            FfiHttpMethod::Connect => HttpMethod::Connect,
            FfiHttpMethod::Options => HttpMethod::Options,
            FfiHttpMethod::Patch => HttpMethod::Patch,
            FfiHttpMethod::Trace => HttpMethod::Trace,
        }
    }
}

/// Parameter encoding strategy as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiEncoding {
    /// Compact JSON body.
    Json = 0,
    /// Pretty-printed JSON body.
    JsonPretty = 1,
    /// Form-urlencoded; query string for GET/HEAD/DELETE, body otherwise.
    Form = 2,
    /// Form-urlencoded, always in the query string.
    FormQuery = 3,
    /// Form-urlencoded, always in the body.
    FormBody = 4,
}

impl From<FfiEncoding> for ParameterEncoding {
    fn from(e: FfiEncoding) -> Self {
        match e {
            FfiEncoding::Json => JsonEncoding::default().into(),
            FfiEncoding::JsonPretty => JsonEncoding::pretty().into(),
            FfiEncoding::Form => UrlEncoding::default().into(),
            FfiEncoding::FormQuery => UrlEncoding::query_string().into(),
            FfiEncoding::FormBody => UrlEncoding::http_body().into(),
        }
    }
}

/// A single HTTP header as a name-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub name: *mut c_char,
    pub value: *mut c_char,
}

/// A finished HTTP request described as C-compatible plain data.
///
/// Built by `netkit_build_request`. The C caller executes it on its own
/// networking stack. `body` is null when there is no body; it is raw bytes,
/// not a C string, so `body_len` must be used.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut u8,
    pub body_len: usize,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: netkit_core::HttpRequest) -> *mut Self {
        let url = to_c_string(req.url.to_string());

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|h| FfiHeader {
                    name: to_c_string(h.name),
                    value: to_c_string(h.value),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        let (body, body_len) = match req.body {
            Some(bytes) => {
                let len = bytes.len();
                (Box::into_raw(bytes.into_boxed_slice()) as *mut u8, len)
            }
            None => (std::ptr::null_mut(), 0),
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url,
            headers,
            headers_len,
            body,
            body_len,
        }))
    }

    /// Release everything `from_core` allocated.
    ///
    /// # Safety
    /// `req` must come from `from_core` and not have been freed.
    pub(crate) unsafe fn free(req: *mut Self) {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.url);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(req.headers, req.headers_len as usize))
            };
            for h in headers.iter() {
                free_c_string(h.name);
                free_c_string(h.value);
            }
        }
        if !req.body.is_null() {
            drop(unsafe { Box::from_raw(std::ptr::slice_from_raw_parts_mut(req.body, req.body_len)) });
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiBuildResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    InvalidUrl = 1,
    EncodingFailed = 2,
    InvalidParameters = 3,
    InvalidString = 4,
    Panic = 5,
    NullArg = 6,
    Transport = 7,
}

/// Result envelope for `netkit_build_request`.
///
/// On success `error_code` is `Ok`, `error_message` is null and `request`
/// points to the built request. On failure `error_code` describes the
/// category, `error_message` is a human-readable C string and `request` is
/// null.
#[repr(C)]
pub struct FfiBuildResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub request: *mut FfiHttpRequest,
}

impl FfiBuildResult {
    pub(crate) fn ok(req: netkit_core::HttpRequest) -> *mut Self {
        Box::into_raw(Box::new(FfiBuildResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            request: FfiHttpRequest::from_core(req),
        }))
    }

    pub(crate) fn from_error(err: NetworkError) -> *mut Self {
        let code = match &err {
            NetworkError::InvalidUrl { .. } => FfiErrorCode::InvalidUrl,
            NetworkError::EncodingFailed(_) => FfiErrorCode::EncodingFailed,
            NetworkError::Transport(_) => FfiErrorCode::Transport,
        };
        Self::error(code, &err.to_string())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::error(FfiErrorCode::NullArg, &format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::error(FfiErrorCode::Panic, msg)
    }

    pub(crate) fn error(code: FfiErrorCode, msg: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiBuildResult {
            error_code: code,
            error_message: to_c_string(msg.to_string()),
            request: std::ptr::null_mut(),
        }))
    }
}

/// Hand a Rust string to C. Interior NUL bytes cannot be represented and
/// yield an empty string.
pub(crate) fn to_c_string(s: String) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

pub(crate) fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

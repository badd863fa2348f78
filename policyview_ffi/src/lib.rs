#![allow(clippy::missing_safety_doc)]

use std::ptr;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use policyview_core::{normalize, normalize_all, RawPolicy};
use policyview_presenter::{
    parse_payload, value_kind, BackendPayloadExtractor, PayloadError, PolicyExtractor, PolicyPresenter,
};

pub mod snapshot;

pub use snapshot::SnapshotError;

/// FFI ABI version for policyview_ffi.
///
/// Bump this when any `#[repr(C)]` struct layout or exported function signature changes.
pub const PV_FFI_VERSION: u32 = 2;

pub const PV_OK: i32 = 0;
pub const PV_ERR_ARG: i32 = -1;
pub const PV_ERR_UTF8: i32 = -2;
pub const PV_ERR_JSON: i32 = -3;
pub const PV_ERR_NOT_OBJECT: i32 = -4;
pub const PV_ERR_ENCODE: i32 = -5;

#[no_mangle]
pub extern "C" fn pv_ffi_version() -> u32 {
    PV_FFI_VERSION
}

#[derive(Debug, Error)]
enum FfiError {
    #[error("null or empty argument")]
    Arg,
    #[error("input is not valid UTF-8")]
    Utf8,
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error("output encoding failed: {0}")]
    Encode(serde_json::Error),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

impl FfiError {
    fn rc(&self) -> i32 {
        match self {
            FfiError::Arg => PV_ERR_ARG,
            FfiError::Utf8 => PV_ERR_UTF8,
            FfiError::Payload(PayloadError::Json(_)) => PV_ERR_JSON,
            FfiError::Payload(PayloadError::NotAnObject { .. }) => PV_ERR_NOT_OBJECT,
            FfiError::Encode(_) => PV_ERR_ENCODE,
            FfiError::Snapshot(e) => e.rc(),
        }
    }
}

/// Opaque presenter handle exposed over FFI.
#[repr(C)]
pub struct PvPresenter {
    inner: PolicyPresenter,
}

/// FFI string view (UTF-8 bytes).
#[repr(C)]
#[derive(Clone, Copy)]
pub struct PvStr {
    pub ptr: *const u8,
    pub len: usize,
}

impl PvStr {
    unsafe fn as_str<'a>(&self) -> Result<&'a str, FfiError> {
        if self.ptr.is_null() {
            return Err(FfiError::Arg);
        }
        let bytes = std::slice::from_raw_parts(self.ptr, self.len);
        std::str::from_utf8(bytes).map_err(|_| FfiError::Utf8)
    }
}

/// Owned byte buffer; free with `pv_bytes_free`.
#[repr(C)]
pub struct PvBytes {
    pub ptr: *mut u8,
    pub len: usize,
}

impl PvBytes {
    fn null() -> Self {
        PvBytes { ptr: ptr::null_mut(), len: 0 }
    }

    fn from_vec(buf: Vec<u8>) -> Self {
        let mut boxed = buf.into_boxed_slice();
        let ptr = boxed.as_mut_ptr();
        let len = boxed.len();
        // Leaked to caller; freed by pv_bytes_free
        std::mem::forget(boxed);
        PvBytes { ptr, len }
    }
}

/// JSON output plus return code. `bytes` is owned by the caller even when
/// `rc != 0` (list-producing calls still hand back `[]`).
#[repr(C)]
pub struct PvJsonResult {
    pub bytes: PvBytes,
    pub rc: i32,
}

/// Restore result statistics (FFI-safe).
#[repr(C)]
pub struct PvRestoreStats {
    pub applied: u32,
    pub overwritten: u32,
    pub rc: i32,
}

fn json_result<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, FfiError> {
    serde_json::to_vec(value).map_err(FfiError::Encode)
}

fn ok_json(buf: Vec<u8>) -> PvJsonResult {
    PvJsonResult { bytes: PvBytes::from_vec(buf), rc: PV_OK }
}

/// Failed call that still returns a JSON value the caller can render (`[]`).
fn fallback_json(err: FfiError, fallback: &[u8]) -> PvJsonResult {
    warn!(error = %err, rc = err.rc(), "ffi call failed");
    PvJsonResult { bytes: PvBytes::from_vec(fallback.to_vec()), rc: err.rc() }
}

fn failed_json(err: FfiError) -> PvJsonResult {
    warn!(error = %err, rc = err.rc(), "ffi call failed");
    PvJsonResult { bytes: PvBytes::null(), rc: err.rc() }
}

unsafe fn normalize_policy_json(input: PvStr) -> Result<Vec<u8>, FfiError> {
    let v: Value = serde_json::from_str(input.as_str()?).map_err(PayloadError::Json)?;
    if !v.is_object() {
        return Err(PayloadError::NotAnObject { found: value_kind(&v) }.into());
    }
    json_result(&normalize(&RawPolicy::new(v)))
}

/// Normalize one raw policy object. Returns the normalized view as JSON, or
/// null bytes and a negative `rc` when the input is not a JSON object.
#[no_mangle]
pub unsafe extern "C" fn pv_normalize_policy(input: PvStr) -> PvJsonResult {
    match normalize_policy_json(input) {
        Ok(buf) => ok_json(buf),
        Err(e) => failed_json(e),
    }
}

unsafe fn normalize_payload_json(input: PvStr) -> Result<Vec<u8>, FfiError> {
    let payload = parse_payload(input.as_str()?)?;
    let raws = BackendPayloadExtractor::default().extract(&payload);
    json_result(&normalize_all(&raws))
}

/// Normalize every policy in a backend payload. Always returns a JSON array;
/// on bad input it is `[]` and `rc` says why.
#[no_mangle]
pub unsafe extern "C" fn pv_normalize_payload(input: PvStr) -> PvJsonResult {
    match normalize_payload_json(input) {
        Ok(buf) => ok_json(buf),
        Err(e) => fallback_json(e, b"[]"),
    }
}

/// Create a presenter handle.
///
/// This library does not spawn threads. Concurrent calls on one handle
/// serialize on its overlay lock.
#[no_mangle]
pub extern "C" fn pv_presenter_new() -> *mut PvPresenter {
    let handle = PvPresenter {
        inner: PolicyPresenter::new(Default::default()),
    };
    Box::into_raw(Box::new(handle))
}

#[no_mangle]
pub unsafe extern "C" fn pv_presenter_free(h: *mut PvPresenter) {
    if !h.is_null() {
        drop(Box::from_raw(h));
    }
}

unsafe fn present_json(h: *const PvPresenter, body: PvStr) -> Result<Vec<u8>, FfiError> {
    let handle = h.as_ref().ok_or(FfiError::Arg)?;
    let payload = parse_payload(body.as_str()?)?;
    json_result(&handle.inner.present(&payload))
}

/// Present a backend payload as a JSON array of cards
/// (`{"key", "policy", "expanded"}`); `[]` plus a negative `rc` on bad input.
#[no_mangle]
pub unsafe extern "C" fn pv_presenter_present(h: *const PvPresenter, body: PvStr) -> PvJsonResult {
    match present_json(h, body) {
        Ok(buf) => ok_json(buf),
        Err(e) => fallback_json(e, b"[]"),
    }
}

/// Toggle a card. Returns 1 if now expanded, 0 if collapsed, negative on error.
#[no_mangle]
pub unsafe extern "C" fn pv_presenter_toggle(h: *const PvPresenter, key: PvStr) -> i32 {
    let Some(handle) = h.as_ref() else {
        return PV_ERR_ARG;
    };
    match key.as_str() {
        Ok(k) => handle.inner.toggle(k) as i32,
        Err(e) => e.rc(),
    }
}

/// Serialize the overlay (see `snapshot` for the format). Free with `pv_bytes_free`.
#[no_mangle]
pub unsafe extern "C" fn pv_overlay_snapshot(h: *const PvPresenter) -> PvBytes {
    match h.as_ref() {
        Some(handle) => PvBytes::from_vec(snapshot::encode(&handle.inner.overlay().snapshot())),
        None => PvBytes::null(),
    }
}

#[no_mangle]
pub unsafe extern "C" fn pv_bytes_free(b: PvBytes) {
    if !b.ptr.is_null() {
        let slice_ptr = std::ptr::slice_from_raw_parts_mut(b.ptr, b.len);
        drop(Box::from_raw(slice_ptr));
    }
}

/// Restore overlay state from `pv_overlay_snapshot` bytes. `merge != 0` keeps
/// current entries not present in the snapshot. Nothing is applied on error.
#[no_mangle]
pub unsafe extern "C" fn pv_overlay_restore(
    h: *const PvPresenter,
    bytes: *const u8,
    len: usize,
    merge: u8,
) -> PvRestoreStats {
    let fail = |rc: i32| PvRestoreStats { applied: 0, overwritten: 0, rc };

    let Some(handle) = h.as_ref() else {
        return fail(PV_ERR_ARG);
    };
    if bytes.is_null() {
        return fail(PV_ERR_ARG);
    }
    let data = std::slice::from_raw_parts(bytes, len);

    let snap = match snapshot::decode(data) {
        Ok(s) => s,
        Err(e) => {
            let e = FfiError::from(e);
            warn!(error = %e, "overlay restore rejected");
            return fail(e.rc());
        }
    };

    let overlay = handle.inner.overlay();
    let stats = if merge != 0 {
        overlay.restore_merge(snap)
    } else {
        overlay.restore(snap)
    };

    PvRestoreStats {
        applied: stats.applied as u32,
        overwritten: stats.overwritten as u32,
        rc: PV_OK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(s: &str) -> PvStr {
        PvStr { ptr: s.as_ptr(), len: s.len() }
    }

    #[test]
    fn not_an_object_names_the_type() {
        let err = unsafe { normalize_policy_json(s("[1]")) }.unwrap_err();
        assert_eq!(err.rc(), PV_ERR_NOT_OBJECT);
        assert_eq!(err.to_string(), "payload top level is an array, expected an object");

        let err = unsafe { normalize_policy_json(s("42")) }.unwrap_err();
        assert_eq!(err.to_string(), "payload top level is a number, expected an object");
    }
}

// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! C ABI interface for CPID derivation.
//!
//! Exports the handle lifecycle the agent consumes:
//! - `dd_cpid_initialize` — builds an engine over the platform
//!   collectors; NULL on failure, nothing leaked.
//! - `dd_cpid_finalize` — releases the handle; NULL-safe.
//! - `dd_cpid_make_uuid` / `dd_cpid_get_uuid` — write 16 raw bytes.
//! - `dd_cpid_get_uuid_string` — writes the NUL-terminated canonical
//!   lowercase form (37 bytes including the terminator).
//!
//! All functions return 0 on success and -1 on failure; output buffers
//! are never written on failure.

#![allow(non_camel_case_types)] // C ABI types use C naming conventions

use std::ffi::c_char;
use std::ptr;

use log::warn;

use crate::engine::CpidEngine;
use crate::platform::{HostIdentity, SystemProcessTimes};
use crate::record::UUID_LEN;

/// Canonical text form plus NUL terminator.
pub const DD_CPID_UUID_STRING_LEN: usize = 37;

const DD_CPID_SUCCESS: i32 = 0;
const DD_CPID_ERROR: i32 = -1;

/// Opaque engine handle handed across the boundary.
pub struct dd_cpid_handle {
    engine: CpidEngine<SystemProcessTimes>,
}

/// Builds a CPID engine over the platform collectors.
///
/// # Returns
/// A handle the caller MUST pass to `dd_cpid_finalize` exactly once,
/// or NULL if any platform query failed. A NULL return leaves no
/// resources behind.
#[unsafe(no_mangle)]
pub extern "C" fn dd_cpid_initialize() -> *mut dd_cpid_handle {
    match CpidEngine::new(&HostIdentity, SystemProcessTimes::new()) {
        Ok(engine) => Box::into_raw(Box::new(dd_cpid_handle { engine })),
        Err(e) => {
            warn!("cpid initialization failed: {e}");
            ptr::null_mut()
        }
    }
}

/// Releases a handle. NULL is a no-op; this never fails.
///
/// # Safety
/// A non-NULL `handle` must come from `dd_cpid_initialize` and must
/// not be used again after this call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dd_cpid_finalize(handle: *mut dd_cpid_handle) {
    if handle.is_null() {
        return;
    }
    // SAFETY: caller guarantees handle came from dd_cpid_initialize
    // and is not reused afterwards.
    drop(unsafe { Box::from_raw(handle) });
}

/// Derives the identifier for a process whose creation time the caller
/// already holds, writing 16 bytes to `uuid_out`.
///
/// # Safety
/// - A non-NULL `handle` must come from `dd_cpid_initialize`, with no
///   concurrent calls on it.
/// - A non-NULL `uuid_out` must point to at least 16 writable bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dd_cpid_make_uuid(
    handle: *mut dd_cpid_handle,
    pid: u32,
    creation_time_unix_epoch_seconds: u64,
    creation_time_micros_offset: u32,
    uuid_out: *mut u8,
) -> i32 {
    if handle.is_null() || uuid_out.is_null() {
        return DD_CPID_ERROR;
    }
    // SAFETY: caller guarantees handle is valid and exclusively ours
    // for the duration of the call.
    let engine = unsafe { &mut (*handle).engine };
    match engine.make_uuid(
        pid,
        creation_time_unix_epoch_seconds,
        u64::from(creation_time_micros_offset),
    ) {
        Ok(uuid) => {
            // SAFETY: caller guarantees uuid_out has 16 writable bytes.
            unsafe { ptr::copy_nonoverlapping(uuid.as_ptr(), uuid_out, UUID_LEN) };
            DD_CPID_SUCCESS
        }
        Err(e) => {
            warn!("cpid derivation failed for pid {pid}: {e}");
            DD_CPID_ERROR
        }
    }
}

/// Derives the identifier for a live process, querying its creation
/// time from the process table.
///
/// # Safety
/// Same contract as `dd_cpid_make_uuid`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dd_cpid_get_uuid(
    handle: *mut dd_cpid_handle,
    pid: u32,
    uuid_out: *mut u8,
) -> i32 {
    if handle.is_null() || uuid_out.is_null() {
        return DD_CPID_ERROR;
    }
    // SAFETY: caller guarantees handle is valid and exclusively ours
    // for the duration of the call.
    let engine = unsafe { &mut (*handle).engine };
    match engine.get_uuid(pid) {
        Ok(uuid) => {
            // SAFETY: caller guarantees uuid_out has 16 writable bytes.
            unsafe { ptr::copy_nonoverlapping(uuid.as_ptr(), uuid_out, UUID_LEN) };
            DD_CPID_SUCCESS
        }
        Err(e) => {
            warn!("cpid derivation failed for pid {pid}: {e}");
            DD_CPID_ERROR
        }
    }
}

/// Like `dd_cpid_get_uuid`, rendered as NUL-terminated canonical
/// lowercase text.
///
/// # Safety
/// - A non-NULL `handle` must come from `dd_cpid_initialize`, with no
///   concurrent calls on it.
/// - A non-NULL `string_out` must point to at least
///   `DD_CPID_UUID_STRING_LEN` (37) writable bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dd_cpid_get_uuid_string(
    handle: *mut dd_cpid_handle,
    pid: u32,
    string_out: *mut c_char,
) -> i32 {
    if handle.is_null() || string_out.is_null() {
        return DD_CPID_ERROR;
    }
    // SAFETY: caller guarantees handle is valid and exclusively ours
    // for the duration of the call.
    let engine = unsafe { &mut (*handle).engine };
    match engine.get_uuid_string(pid) {
        Ok(text) => {
            debug_assert_eq!(text.len(), DD_CPID_UUID_STRING_LEN - 1);
            // SAFETY: caller guarantees string_out has 37 writable
            // bytes; text is 36 ASCII bytes plus our terminator.
            unsafe {
                ptr::copy_nonoverlapping(text.as_ptr().cast(), string_out, text.len());
                *string_out.add(text.len()) = 0;
            }
            DD_CPID_SUCCESS
        }
        Err(e) => {
            warn!("cpid derivation failed for pid {pid}: {e}");
            DD_CPID_ERROR
        }
    }
}

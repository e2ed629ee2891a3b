// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! macOS collectors: hardware identity via `sysctlbyname`, process
//! creation times via the `kern.proc.pid` sysctl.

use std::ffi::CString;
use std::mem;
use std::ptr;

use uuid::Uuid;

use crate::engine::MAX_PID;
use crate::errors::Error;
use crate::record::{CreationTime, UUID_LEN};
use crate::sources::{HardwareIdentity, ProcessTimes};

fn sysctl_string(name: &'static str) -> Result<String, Error> {
    let query_failed = |context: String| Error::PlatformQueryFailed { context };

    let cname = CString::new(name)
        .map_err(|_| query_failed(format!("invalid sysctl name {name}")))?;

    let mut len: libc::size_t = 0;
    // SAFETY: a NULL output buffer asks sysctlbyname for the required
    // size, which it writes to len.
    let rc = unsafe {
        libc::sysctlbyname(cname.as_ptr(), ptr::null_mut(), &mut len, ptr::null_mut(), 0)
    };
    if rc != 0 || len == 0 {
        return Err(query_failed(format!("sysctl {name} unavailable")));
    }

    let mut buf = vec![0u8; len];
    // SAFETY: buf holds len writable bytes and len carries that size.
    let rc = unsafe {
        libc::sysctlbyname(
            cname.as_ptr(),
            buf.as_mut_ptr().cast(),
            &mut len,
            ptr::null_mut(),
            0,
        )
    };
    if rc != 0 {
        return Err(query_failed(format!("sysctl {name} read failed")));
    }

    buf.truncate(len);
    while buf.last() == Some(&0) {
        buf.pop();
    }
    String::from_utf8(buf).map_err(|_| query_failed(format!("sysctl {name} is not UTF-8")))
}

/// Hardware identity from the platform expert, read through sysctl
/// rather than the IOKit registry.
pub struct HostIdentity;

impl HardwareIdentity for HostIdentity {
    fn serial_number(&self) -> Result<String, Error> {
        Ok(sysctl_string("hw.serialnumber")?.trim().to_string())
    }

    fn hardware_uuid(&self) -> Result<[u8; UUID_LEN], Error> {
        let text = sysctl_string("kern.uuid")?;
        let uuid = Uuid::parse_str(text.trim()).map_err(|e| Error::PlatformQueryFailed {
            context: format!("could not parse kern.uuid: {e}"),
        })?;
        Ok(uuid.into_bytes())
    }
}

/// Process creation times from the kernel's process table.
pub struct SystemProcessTimes;

impl SystemProcessTimes {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemProcessTimes {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTimes for SystemProcessTimes {
    fn creation_time(&self, pid: u32) -> Result<CreationTime, Error> {
        // the mib carries the pid in a signed slot
        if pid > MAX_PID {
            return Err(Error::InvalidArgument("pid out of range"));
        }
        let c_pid =
            libc::c_int::try_from(pid).map_err(|_| Error::InvalidArgument("pid out of range"))?;

        let mut mib = [libc::CTL_KERN, libc::KERN_PROC, libc::KERN_PROC_PID, c_pid];
        // SAFETY: kinfo_proc is a plain-data kernel struct for which
        // all-zeroes is a valid representation.
        let mut info: libc::kinfo_proc = unsafe { mem::zeroed() };
        let mut size = mem::size_of::<libc::kinfo_proc>() as libc::size_t;

        // SAFETY: mib holds 4 valid levels and info/size describe a
        // writable buffer of matching length.
        let rc = unsafe {
            libc::sysctl(
                mib.as_mut_ptr(),
                4,
                (&mut info as *mut libc::kinfo_proc).cast(),
                &mut size,
                ptr::null_mut(),
                0,
            )
        };
        if rc != 0 || size == 0 {
            return Err(Error::NotFound { pid });
        }

        // the kernel answers with an empty record for unknown pids;
        // the identity check below catches that too
        let reported = info.kp_proc.p_pid;
        if reported < 0 || reported as u32 != pid {
            return Err(Error::NotFound { pid });
        }

        let start = info.kp_proc.p_starttime;
        if start.tv_sec <= 0 || start.tv_usec < 0 {
            return Err(Error::NotFound { pid });
        }

        Ok(CreationTime {
            unix_epoch_seconds: start.tv_sec as u64,
            micros_offset: start.tv_usec as u64,
        })
    }
}

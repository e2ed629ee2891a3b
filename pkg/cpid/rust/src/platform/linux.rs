// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Linux collectors: hardware identity from sysfs DMI, process
//! creation times from procfs.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::debug;
use uuid::Uuid;

use crate::engine::{KERNEL_TASK_PID, MAX_PID};
use crate::errors::Error;
use crate::record::{CreationTime, UUID_LEN};
use crate::sources::{HardwareIdentity, ProcessTimes};

static PROC_ROOT: OnceLock<PathBuf> = OnceLock::new();
static SYS_ROOT: OnceLock<PathBuf> = OnceLock::new();

fn proc_root() -> &'static Path {
    PROC_ROOT.get_or_init(|| {
        if let Ok(v) = env::var("HOST_PROC") {
            return v.into();
        }
        "/proc".into()
    })
}

fn sys_root() -> &'static Path {
    SYS_ROOT.get_or_init(|| {
        if let Ok(v) = env::var("HOST_SYS") {
            return v.into();
        }
        "/sys".into()
    })
}

fn dmi_field(name: &str) -> Option<String> {
    let path = sys_root().join("class/dmi/id").join(name);
    match fs::read_to_string(&path) {
        Ok(raw) => {
            let value = raw.trim();
            // firmware placeholders for "not populated"
            if value.is_empty() || value == "None" || value == "Not Specified" {
                return None;
            }
            Some(value.to_string())
        }
        Err(e) => {
            debug!("could not read {}: {e}", path.display());
            None
        }
    }
}

/// Hardware identity from the SMBIOS tables exposed under
/// `/sys/class/dmi/id`. Reading the serial fields requires root.
pub struct HostIdentity;

impl HardwareIdentity for HostIdentity {
    fn serial_number(&self) -> Result<String, Error> {
        dmi_field("product_serial")
            .or_else(|| dmi_field("board_serial"))
            .ok_or_else(|| Error::PlatformQueryFailed {
                context: "no DMI serial number available".to_string(),
            })
    }

    fn hardware_uuid(&self) -> Result<[u8; UUID_LEN], Error> {
        let text = dmi_field("product_uuid").ok_or_else(|| Error::PlatformQueryFailed {
            context: "no DMI product UUID available".to_string(),
        })?;
        let uuid = Uuid::parse_str(&text).map_err(|e| Error::PlatformQueryFailed {
            context: format!("could not parse DMI product UUID: {e}"),
        })?;
        Ok(uuid.into_bytes())
    }
}

/// Process creation times from `/proc/<pid>/stat`, anchored at the
/// boot time (`btime`) from `/proc/stat`.
pub struct SystemProcessTimes {
    ticks_per_second: u64,
}

impl SystemProcessTimes {
    pub fn new() -> Self {
        // SAFETY: sysconf reads a static configuration value and has
        // no pointer arguments.
        let hz = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
        Self {
            ticks_per_second: normalize_ticks_per_second(hz),
        }
    }
}

impl Default for SystemProcessTimes {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTimes for SystemProcessTimes {
    fn creation_time(&self, pid: u32) -> Result<CreationTime, Error> {
        if pid > MAX_PID {
            return Err(Error::InvalidArgument("pid out of range"));
        }

        // PID 0 has no /proc entry on Linux; the kernel task's
        // creation is the boot epoch itself.
        if pid == KERNEL_TASK_PID {
            return Ok(CreationTime {
                unix_epoch_seconds: boot_time_seconds().ok_or(Error::NotFound { pid })?,
                micros_offset: 0,
            });
        }

        let path = proc_root().join(pid.to_string()).join("stat");
        let stat = fs::read_to_string(path).map_err(|_| Error::NotFound { pid })?;
        let (reported_pid, start_ticks) =
            parse_stat_starttime(&stat).ok_or(Error::NotFound { pid })?;
        if reported_pid != pid {
            return Err(Error::NotFound { pid });
        }

        let btime = boot_time_seconds().ok_or(Error::NotFound { pid })?;
        let hz = self.ticks_per_second;
        let seconds = btime + start_ticks / hz;
        let micros = (start_ticks % hz) * 1_000_000 / hz;
        if seconds == 0 {
            return Err(Error::NotFound { pid });
        }

        Ok(CreationTime {
            unix_epoch_seconds: seconds,
            micros_offset: micros,
        })
    }
}

/// Extracts the pid (field 1) and starttime (field 22, clock ticks
/// since boot) from a `/proc/<pid>/stat` line. The comm field can
/// contain spaces and parentheses, so everything up to the last `)`
/// is skipped before splitting.
fn parse_stat_starttime(stat: &str) -> Option<(u32, u64)> {
    let pid = stat.split('(').next()?.trim().parse().ok()?;
    let rest = stat.rsplit(')').next()?;
    // starttime is field 22 overall; state is field 3, the first
    // after the comm field.
    let start_ticks = rest.split_whitespace().nth(19)?.parse().ok()?;
    Some((pid, start_ticks))
}

/// sysconf reports -1 on error, and a zero would divide the tick
/// arithmetic by zero; both fall back to the USER_HZ default of 100.
fn normalize_ticks_per_second(hz: libc::c_long) -> u64 {
    u64::try_from(hz).ok().filter(|&hz| hz > 0).unwrap_or(100)
}

fn boot_time_seconds() -> Option<u64> {
    let stat = fs::read_to_string(proc_root().join("stat")).ok()?;
    for line in stat.lines() {
        if let Some(v) = line.strip_prefix("btime ") {
            return v.trim().parse().ok();
        }
    }
    None
}

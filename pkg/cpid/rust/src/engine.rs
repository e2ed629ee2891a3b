// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use log::debug;
use sha2::{Digest, Sha256};

use crate::errors::Error;
use crate::record::{
    CreationTime, DigestInputRecord, SHA256_DIGEST_LEN, UUID_LEN,
};
use crate::sources::{HardwareIdentity, ProcessTimes};
use crate::text::format_uuid;

/// The kernel task, whose creation time marks the boot epoch.
pub const KERNEL_TASK_PID: u32 = 0;

/// The init supervisor (launchd on macOS), the second boot-epoch marker.
pub const LAUNCHD_PID: u32 = 1;

/// Largest PID representable in the platform's signed pid type.
pub const MAX_PID: u32 = i32::MAX as u32;

/// Largest valid microsecond-of-second offset.
pub const MAX_MICROS_OFFSET: u64 = 999_999;

/// Derives composite process identifiers.
///
/// One engine holds the host-constant half of the digest input record,
/// populated once at construction, plus a reusable SHA-256 context.
/// Derivation rewrites only the per-call fields, so repeated calls are
/// cheap, in-memory work.
///
/// Derivation takes `&mut self`: per-call record fields and the digest
/// context are mutated in place, so one engine serves one caller at a
/// time. Callers wanting concurrent derivations hold one engine each,
/// or wrap a shared one in a mutex.
pub struct CpidEngine<T: ProcessTimes> {
    times: T,
    digest: Sha256,
    record: DigestInputRecord,
}

impl<T: ProcessTimes> CpidEngine<T> {
    /// Builds an engine, querying the collaborators once for the
    /// host-constant fields: serial number, hardware UUID, and the
    /// creation times of the kernel task and the init supervisor.
    ///
    /// Any query failing propagates its error; partially gathered
    /// state is dropped with the stack frame, so no half-initialized
    /// engine can escape.
    pub fn new(hardware: &dyn HardwareIdentity, times: T) -> Result<Self, Error> {
        let mut record = DigestInputRecord::default();

        let serial = hardware.serial_number()?;
        record.set_serial_number(&serial)?;
        record.hardware_uuid = hardware.hardware_uuid()?;
        record.kernel_task_creation_time = times.creation_time(KERNEL_TASK_PID)?;
        record.launchd_creation_time = times.creation_time(LAUNCHD_PID)?;

        debug!(
            "cpid engine initialized (boot epoch {}s)",
            record.kernel_task_creation_time.unix_epoch_seconds
        );

        Ok(Self {
            times,
            digest: Sha256::new(),
            record,
        })
    }

    /// Derives the identifier for a process whose creation time the
    /// caller already knows.
    ///
    /// Arguments are validated before anything is hashed: `pid` must
    /// fit the platform's signed pid type and `micros_offset` must be
    /// a valid microsecond-of-second value. The result is the first 16
    /// bytes of SHA-256 over the 88-byte record, with the UUIDv8
    /// version nibble and RFC 4122 variant bits imprinted.
    /// Bit-identical for identical inputs on the same engine.
    // digest width ≥ UUID width is pinned by a const assert; bytes 6
    // and 8 index a fixed 16-byte array
    #[allow(clippy::indexing_slicing)]
    pub fn make_uuid(
        &mut self,
        pid: u32,
        unix_epoch_seconds: u64,
        micros_offset: u64,
    ) -> Result<[u8; UUID_LEN], Error> {
        if pid > MAX_PID {
            return Err(Error::InvalidArgument("pid out of range"));
        }
        if micros_offset > MAX_MICROS_OFFSET {
            return Err(Error::InvalidArgument("micros offset above 999999"));
        }

        // set the process-specific half of the record
        self.record.pid = u64::from(pid);
        self.record.process_creation_time = CreationTime {
            unix_epoch_seconds,
            micros_offset,
        };

        self.digest.update(self.record.encode());
        // finalize_reset leaves the context fresh for the next call
        let digest = self.digest.finalize_reset();
        if digest.len() != SHA256_DIGEST_LEN {
            return Err(Error::DigestFailure("unexpected digest length"));
        }

        let mut uuid = [0u8; UUID_LEN];
        uuid.copy_from_slice(&digest[..UUID_LEN]);

        // set the uuid version (UUIDv8) and the RFC 4122 variant
        uuid[6] = (uuid[6] & 0x0F) | 0x80;
        uuid[8] = (uuid[8] & 0x3F) | 0x80;

        Ok(uuid)
    }

    /// Derives the identifier for a live process, querying the time
    /// source for its current creation time.
    pub fn get_uuid(&mut self, pid: u32) -> Result<[u8; UUID_LEN], Error> {
        let time = self.times.creation_time(pid)?;
        self.make_uuid(pid, time.unix_epoch_seconds, time.micros_offset)
    }

    /// [`Self::get_uuid`] rendered as canonical lowercase hyphenated
    /// text.
    pub fn get_uuid_string(&mut self, pid: u32) -> Result<String, Error> {
        Ok(format_uuid(self.get_uuid(pid)?))
    }
}

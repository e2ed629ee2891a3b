// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! The fixed-layout digest input record.
//!
//! Field order, width, and total size are part of the identifier
//! contract: any change here changes every CPID ever derived. The
//! record is serialized field by field rather than overlaid as a
//! struct, so the digest input can never pick up alignment padding.

use crate::errors::Error;

/// Serial number field width, terminator included.
pub const SERIAL_NUMBER_LEN: usize = 16;

/// Width of a raw 128-bit UUID.
pub const UUID_LEN: usize = 16;

/// Encoded width of a [`CreationTime`].
const CREATION_TIME_LEN: usize = 16;

/// Encoded width of the PID field.
const PID_LEN: usize = 8;

/// Total encoded record size.
pub const DIGEST_INPUT_LEN: usize = 88;

/// SHA-256 output width.
pub const SHA256_DIGEST_LEN: usize = 32;

const _: () = assert!(
    SERIAL_NUMBER_LEN + UUID_LEN + 3 * CREATION_TIME_LEN + PID_LEN == DIGEST_INPUT_LEN,
    "digest input record is not the expected size"
);
const _: () = assert!(SHA256_DIGEST_LEN >= UUID_LEN);

/// An OS-reported process creation timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreationTime {
    pub unix_epoch_seconds: u64,
    pub micros_offset: u64,
}

/// All identity facts a CPID is derived from. The first four fields are
/// frozen when the engine is built; `process_creation_time` and `pid`
/// are rewritten on every derivation.
#[derive(Debug, Default)]
pub(crate) struct DigestInputRecord {
    pub serial_number: [u8; SERIAL_NUMBER_LEN],
    pub hardware_uuid: [u8; UUID_LEN],
    pub kernel_task_creation_time: CreationTime,
    pub launchd_creation_time: CreationTime,
    pub process_creation_time: CreationTime,
    pub pid: u64,
}

impl DigestInputRecord {
    /// Copies `serial` into the fixed serial number field, NUL-padded.
    /// Fails if it cannot fit alongside its terminator.
    // fixed-width field; the length check above the copy bounds the slice
    #[allow(clippy::indexing_slicing)]
    pub fn set_serial_number(&mut self, serial: &str) -> Result<(), Error> {
        let bytes = serial.as_bytes();
        if bytes.len() >= SERIAL_NUMBER_LEN {
            return Err(Error::InvalidArgument(
                "serial number does not fit the record's 16-byte field",
            ));
        }
        self.serial_number = [0u8; SERIAL_NUMBER_LEN];
        self.serial_number[..bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// Serializes the record in documented field order, little-endian,
    /// with no padding.
    // field widths sum to DIGEST_INPUT_LEN, pinned by the const assert
    #[allow(clippy::indexing_slicing)]
    pub fn encode(&self) -> [u8; DIGEST_INPUT_LEN] {
        let mut out = [0u8; DIGEST_INPUT_LEN];
        let mut off = 0;

        let mut put = |bytes: &[u8]| {
            out[off..off + bytes.len()].copy_from_slice(bytes);
            off += bytes.len();
        };

        put(&self.serial_number);
        put(&self.hardware_uuid);
        for time in [
            &self.kernel_task_creation_time,
            &self.launchd_creation_time,
            &self.process_creation_time,
        ] {
            put(&time.unix_epoch_seconds.to_le_bytes());
            put(&time.micros_offset.to_le_bytes());
        }
        put(&self.pid.to_le_bytes());

        debug_assert_eq!(off, DIGEST_INPUT_LEN);
        out
    }
}

// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Collaborator traits the engine consumes. Platform-backed
//! implementations live in [`crate::platform`]; tests substitute their
//! own.

use crate::errors::Error;
use crate::record::{CreationTime, UUID_LEN};

/// Durable hardware identity facts, queried once per engine lifetime.
pub trait HardwareIdentity {
    /// The host's serial number. At most 15 characters; the record
    /// field holds 16 bytes including the terminator.
    fn serial_number(&self) -> Result<String, Error>;

    /// The host's hardware UUID as raw bytes.
    fn hardware_uuid(&self) -> Result<[u8; UUID_LEN], Error>;
}

/// OS-reported process creation timestamps.
pub trait ProcessTimes {
    /// The creation time of `pid`. Implementations must verify the
    /// reported process identity matches the request and return
    /// [`Error::NotFound`] when the process is absent or its start
    /// time is zero or unrepresentable as non-negative values.
    fn creation_time(&self, pid: u32) -> Result<CreationTime, Error>;
}

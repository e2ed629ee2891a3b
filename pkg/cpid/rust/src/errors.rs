// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// An argument outside its documented range: a PID wider than the
    /// platform's signed process-identifier type, a microsecond offset
    /// above 999,999, or a serial number that cannot fit the record's
    /// fixed 16-byte field.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The queried process does not exist, or its start time is
    /// unreadable or zero.
    #[error("process {pid}: not found or start time unreadable")]
    NotFound { pid: u32 },

    /// A hardware identity query against the platform failed.
    #[error("platform query failed: {context}")]
    PlatformQueryFailed { context: String },

    /// A digest context or handle could not be acquired. The pure-Rust
    /// digest cannot fail to allocate, so this only surfaces through
    /// embeddings that acquire the context elsewhere.
    #[error("could not acquire digest context: {0}")]
    AllocationFailure(&'static str),

    /// The digest computation reported an unexpected status or output
    /// length.
    #[error("digest computation failed: {0}")]
    DigestFailure(&'static str),
}

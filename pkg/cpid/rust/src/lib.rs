// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Composite process identifier (CPID) derivation.
//!
//! A CPID is a deterministic 128-bit identifier for a single process
//! instance on a single host. It is the first 16 bytes of a SHA-256
//! digest over a fixed-layout record combining durable host identity
//! (hardware serial number and UUID), the boot-epoch markers (creation
//! times of PID 0 and PID 1), and the target process's PID and creation
//! time, with UUIDv8 version and RFC 4122 variant bits imprinted. Two
//! process instances get distinct identifiers, even across PID reuse,
//! whenever any of those inputs differ.
//!
//! The identifier is a fingerprint, not a credential: it carries no
//! secrecy or unforgeability guarantees and is only meaningful within
//! the host it was derived on.

// Correctness
#![deny(clippy::indexing_slicing)]
#![deny(clippy::string_slice)]
#![deny(clippy::cast_possible_wrap)]
#![deny(clippy::undocumented_unsafe_blocks)]
// Panicking code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unimplemented)]
#![deny(clippy::todo)]
// Debug code that shouldn't be in production
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]

mod engine;
mod errors;
#[cfg(any(target_os = "linux", target_os = "macos"))]
pub mod ffi;
#[cfg(any(target_os = "linux", target_os = "macos"))]
pub mod platform;
mod record;
mod sources;
mod text;

// Re-export the public API
pub use engine::{CpidEngine, KERNEL_TASK_PID, LAUNCHD_PID, MAX_MICROS_OFFSET, MAX_PID};
pub use errors::Error;
pub use record::{CreationTime, DIGEST_INPUT_LEN, SERIAL_NUMBER_LEN, SHA256_DIGEST_LEN, UUID_LEN};
pub use sources::{HardwareIdentity, ProcessTimes};
pub use text::format_uuid;

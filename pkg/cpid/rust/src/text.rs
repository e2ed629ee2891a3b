// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use uuid::Uuid;

use crate::record::UUID_LEN;

/// Renders a raw 128-bit identifier in the canonical 8-4-4-4-12
/// hyphenated form. Always lowercase — some platform renderers
/// (macOS libuuid among them) produce uppercase, so callers must not
/// go through those.
pub fn format_uuid(uuid: [u8; UUID_LEN]) -> String {
    Uuid::from_bytes(uuid).hyphenated().to_string()
}

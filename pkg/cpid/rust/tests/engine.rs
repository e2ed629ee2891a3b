// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Black-box tests of the CPID engine against mock identity sources.

use std::collections::HashMap;

use dd_cpid::{
    CpidEngine, CreationTime, Error, HardwareIdentity, ProcessTimes, format_uuid, KERNEL_TASK_PID,
    LAUNCHD_PID, MAX_MICROS_OFFSET, MAX_PID, UUID_LEN,
};

struct MockHardware {
    serial: &'static str,
    uuid: [u8; UUID_LEN],
    fail_serial: bool,
    fail_uuid: bool,
}

impl Default for MockHardware {
    fn default() -> Self {
        Self {
            serial: "ABC123",
            uuid: [0x11; UUID_LEN],
            fail_serial: false,
            fail_uuid: false,
        }
    }
}

impl HardwareIdentity for MockHardware {
    fn serial_number(&self) -> Result<String, Error> {
        if self.fail_serial {
            return Err(Error::PlatformQueryFailed {
                context: "serial number query failed".to_string(),
            });
        }
        Ok(self.serial.to_string())
    }

    fn hardware_uuid(&self) -> Result<[u8; UUID_LEN], Error> {
        if self.fail_uuid {
            return Err(Error::PlatformQueryFailed {
                context: "hardware uuid query failed".to_string(),
            });
        }
        Ok(self.uuid)
    }
}

#[derive(Clone)]
struct MockTimes {
    times: HashMap<u32, CreationTime>,
}

impl MockTimes {
    fn with_boot_markers() -> Self {
        let mut times = HashMap::new();
        times.insert(
            KERNEL_TASK_PID,
            CreationTime {
                unix_epoch_seconds: 1,
                micros_offset: 0,
            },
        );
        times.insert(
            LAUNCHD_PID,
            CreationTime {
                unix_epoch_seconds: 2,
                micros_offset: 0,
            },
        );
        Self { times }
    }

    fn insert(mut self, pid: u32, unix_epoch_seconds: u64, micros_offset: u64) -> Self {
        self.times.insert(
            pid,
            CreationTime {
                unix_epoch_seconds,
                micros_offset,
            },
        );
        self
    }

    fn without(mut self, pid: u32) -> Self {
        self.times.remove(&pid);
        self
    }
}

impl ProcessTimes for MockTimes {
    fn creation_time(&self, pid: u32) -> Result<CreationTime, Error> {
        self.times
            .get(&pid)
            .copied()
            .ok_or(Error::NotFound { pid })
    }
}

fn engine() -> CpidEngine<MockTimes> {
    CpidEngine::new(&MockHardware::default(), MockTimes::with_boot_markers()).unwrap()
}

#[test]
fn test_deterministic_output() {
    let mut engine = engine();
    let first = engine.make_uuid(4321, 1_700_000_000, 500_000).unwrap();
    for _ in 0..10 {
        assert_eq!(
            engine.make_uuid(4321, 1_700_000_000, 500_000).unwrap(),
            first
        );
    }
}

#[test]
fn test_micros_offset_changes_output() {
    let mut engine = engine();
    let a = engine.make_uuid(4321, 1_700_000_000, 500_000).unwrap();
    let b = engine.make_uuid(4321, 1_700_000_000, 500_001).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_pid_changes_output() {
    let mut engine = engine();
    let a = engine.make_uuid(4321, 1_700_000_000, 500_000).unwrap();
    let b = engine.make_uuid(4322, 1_700_000_000, 500_000).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_seconds_change_output() {
    let mut engine = engine();
    let a = engine.make_uuid(4321, 1_700_000_000, 500_000).unwrap();
    let b = engine.make_uuid(4321, 1_700_000_001, 500_000).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_host_identity_changes_output() {
    let mut a_engine = engine();
    let other_host = MockHardware {
        uuid: [0x22; UUID_LEN],
        ..Default::default()
    };
    let mut b_engine = CpidEngine::new(&other_host, MockTimes::with_boot_markers()).unwrap();

    let a = a_engine.make_uuid(4321, 1_700_000_000, 500_000).unwrap();
    let b = b_engine.make_uuid(4321, 1_700_000_000, 500_000).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_boot_epoch_changes_output() {
    let mut a_engine = engine();
    // same host, later boot
    let rebooted = MockTimes::with_boot_markers()
        .insert(KERNEL_TASK_PID, 100, 0)
        .insert(LAUNCHD_PID, 101, 0);
    let mut b_engine = CpidEngine::new(&MockHardware::default(), rebooted).unwrap();

    let a = a_engine.make_uuid(4321, 1_700_000_000, 500_000).unwrap();
    let b = b_engine.make_uuid(4321, 1_700_000_000, 500_000).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_version_and_variant_bits() {
    let mut engine = engine();
    for (pid, seconds, micros) in [
        (1, 1, 0),
        (4321, 1_700_000_000, 500_000),
        (MAX_PID, u64::MAX, MAX_MICROS_OFFSET),
        (77, 0, 0),
    ] {
        let uuid = engine.make_uuid(pid, seconds, micros).unwrap();
        assert_eq!(uuid[6] >> 4, 0b1000, "version nibble for pid {pid}");
        assert_eq!(uuid[8] >> 6, 0b10, "variant bits for pid {pid}");
    }
}

#[test]
fn test_argument_validation() {
    let mut engine = engine();
    assert!(matches!(
        engine.make_uuid(MAX_PID + 1, 1_700_000_000, 0),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        engine.make_uuid(4321, 1_700_000_000, MAX_MICROS_OFFSET + 1),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn test_get_uuid_uses_queried_time() {
    let times = MockTimes::with_boot_markers().insert(4321, 1_700_000_000, 500_000);
    let mut engine = CpidEngine::new(&MockHardware::default(), times).unwrap();

    let queried = engine.get_uuid(4321).unwrap();
    let direct = engine.make_uuid(4321, 1_700_000_000, 500_000).unwrap();
    assert_eq!(queried, direct);
}

#[test]
fn test_get_uuid_unknown_pid() {
    let mut engine = engine();
    assert!(matches!(
        engine.get_uuid(4321),
        Err(Error::NotFound { pid: 4321 })
    ));
}

#[test]
fn test_uuid_string_grammar() {
    let times = MockTimes::with_boot_markers().insert(4321, 1_700_000_000, 500_000);
    let mut engine = CpidEngine::new(&MockHardware::default(), times).unwrap();

    let grammar =
        regex::Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
            .unwrap();
    let text = engine.get_uuid_string(4321).unwrap();
    assert!(grammar.is_match(&text), "bad uuid string: {text}");

    // text form round-trips through the raw derivation
    assert_eq!(text, format_uuid(engine.get_uuid(4321).unwrap()));
}

#[test]
fn test_initialize_serial_failure() {
    let hardware = MockHardware {
        fail_serial: true,
        ..Default::default()
    };
    assert!(matches!(
        CpidEngine::new(&hardware, MockTimes::with_boot_markers()),
        Err(Error::PlatformQueryFailed { .. })
    ));
}

#[test]
fn test_initialize_uuid_failure() {
    let hardware = MockHardware {
        fail_uuid: true,
        ..Default::default()
    };
    assert!(matches!(
        CpidEngine::new(&hardware, MockTimes::with_boot_markers()),
        Err(Error::PlatformQueryFailed { .. })
    ));
}

#[test]
fn test_initialize_oversized_serial_failure() {
    let hardware = MockHardware {
        serial: "0123456789ABCDEF", // 16 chars, no room for the terminator
        ..Default::default()
    };
    assert!(matches!(
        CpidEngine::new(&hardware, MockTimes::with_boot_markers()),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn test_initialize_missing_boot_markers() {
    let no_kernel_task = MockTimes::with_boot_markers().without(KERNEL_TASK_PID);
    assert!(matches!(
        CpidEngine::new(&MockHardware::default(), no_kernel_task),
        Err(Error::NotFound {
            pid: KERNEL_TASK_PID
        })
    ));

    let no_launchd = MockTimes::with_boot_markers().without(LAUNCHD_PID);
    assert!(matches!(
        CpidEngine::new(&MockHardware::default(), no_launchd),
        Err(Error::NotFound { pid: LAUNCHD_PID })
    ));
}

//! Unit tests for the accelerometer and gyroscope self-test

use crate::common::{MPU, MockDelay, assert_float_eq, create_mock_driver};
use mpu9250::self_test::factory_trim;
use mpu9250::{DEFAULT_TOLERANCE_PERCENT, Error, SelfTestConfig, SelfTestEvaluator};

/// Trim code 1 maps to the base constant itself, so a delta of 2620 counts
/// reads as 100 %.
const NEUTRAL_CODES: [u8; 6] = [1; 6];

#[test]
fn test_self_test_deviation_per_axis() {
    let (mut driver, transport) = create_mock_driver();
    transport.set_accel_data(100, 200, 16384);
    transport.set_gyro_data(10, -20, 30);
    transport.set_self_test_response([2620, 1310, 262], [2620, -2620, 0]);
    transport.set_self_test_codes(NEUTRAL_CODES);

    let report = driver
        .self_test(&SelfTestEvaluator::default(), &mut MockDelay::new())
        .unwrap();

    assert_float_eq(report.accel[0], 100.0, 1e-3);
    assert_float_eq(report.accel[1], 50.0, 1e-3);
    assert_float_eq(report.accel[2], 10.0, 1e-3);
    assert_float_eq(report.gyro[0], 100.0, 1e-3);
    assert_float_eq(report.gyro[1], -100.0, 1e-3);
    assert_float_eq(report.gyro[2], 0.0, 1e-3);
}

#[test]
fn test_self_test_register_sequence() {
    let (mut driver, transport) = create_mock_driver();
    transport.set_self_test_codes(NEUTRAL_CODES);
    transport.clear_operations();

    let mut delay = MockDelay::new();
    driver
        .self_test(&SelfTestEvaluator::default(), &mut delay)
        .unwrap();

    assert_eq!(transport.writes_to(MPU, 0x19), vec![0x00]);
    assert_eq!(transport.writes_to(MPU, 0x1A), vec![0x02]);
    assert_eq!(transport.writes_to(MPU, 0x1D), vec![0x02]);
    // Normal, stimulated, restored
    assert_eq!(transport.writes_to(MPU, 0x1C), vec![0x00, 0xE0, 0x00]);
    assert_eq!(transport.writes_to(MPU, 0x1B), vec![0x00, 0xE0, 0x00]);

    // Baseline and stimulated captures
    assert_eq!(transport.read_count(MPU, 0x3B), 400);
    assert_eq!(transport.read_count(MPU, 0x43), 400);

    assert_eq!(delay.ms, vec![25, 25]);
}

#[test]
fn test_self_test_reads_trim_codes_after_restore() {
    let (mut driver, transport) = create_mock_driver();
    transport.set_self_test_codes(NEUTRAL_CODES);

    driver
        .self_test(&SelfTestEvaluator::default(), &mut MockDelay::new())
        .unwrap();

    let ops = transport.operations();
    let restore = ops
        .iter()
        .rposition(|op| {
            matches!(op, crate::common::Operation::Write { register: 0x1B, .. })
        })
        .unwrap();
    for register in [0x0D, 0x0E, 0x0F, 0x00, 0x01, 0x02] {
        let read = transport.last_read_index(MPU, register).unwrap();
        assert!(read > restore, "trim {register:#04x} read before restore");
    }
}

#[test]
fn test_trim_code_scales_expected_response() {
    let (mut driver, transport) = create_mock_driver();
    transport.set_self_test_response([2620, 0, 0], [0, 0, 0]);
    transport.set_self_test_codes([2, 1, 1, 1, 1, 1]);

    let report = driver
        .self_test(&SelfTestEvaluator::default(), &mut MockDelay::new())
        .unwrap();

    assert_float_eq(report.accel[0], 100.0 / 1.01, 1e-2);
}

#[test]
fn test_full_scale_code_shifts_ranges_and_trim() {
    let (mut driver, transport) = create_mock_driver();
    transport.set_self_test_response([1310, 0, 0], [1310, 0, 0]);
    transport.set_self_test_codes(NEUTRAL_CODES);

    let evaluator = SelfTestEvaluator::new(SelfTestConfig {
        full_scale: 1,
        ..SelfTestConfig::default()
    });
    let report = driver.self_test(&evaluator, &mut MockDelay::new()).unwrap();

    assert_eq!(transport.writes_to(MPU, 0x1C), vec![0x08, 0xE8, 0x08]);
    assert_eq!(transport.writes_to(MPU, 0x1B), vec![0x08, 0xE8, 0x08]);
    assert_float_eq(report.accel[0], 100.0, 1e-3);
    assert_float_eq(report.gyro[0], 100.0, 1e-3);
}

#[test]
fn test_trim_bases_are_independent() {
    let (mut driver, transport) = create_mock_driver();
    transport.set_self_test_response([1310, 0, 0], [1310, 0, 0]);
    transport.set_self_test_codes(NEUTRAL_CODES);

    let evaluator = SelfTestEvaluator::new(SelfTestConfig {
        accel_trim_base: 1310.0,
        ..SelfTestConfig::default()
    });
    let report = driver.self_test(&evaluator, &mut MockDelay::new()).unwrap();

    assert_float_eq(report.accel[0], 100.0, 1e-3);
    assert_float_eq(report.gyro[0], 50.0, 1e-3);
}

#[test]
fn test_sample_count_is_configurable() {
    let (mut driver, transport) = create_mock_driver();
    transport.set_self_test_codes(NEUTRAL_CODES);

    let evaluator = SelfTestEvaluator::new(SelfTestConfig {
        samples: 10,
        ..SelfTestConfig::default()
    });
    driver.self_test(&evaluator, &mut MockDelay::new()).unwrap();

    assert_eq!(transport.read_count(MPU, 0x3B), 20);
}

#[test]
fn test_invalid_config_touches_no_registers() {
    let (mut driver, transport) = create_mock_driver();
    transport.clear_operations();

    for config in [
        SelfTestConfig {
            samples: 0,
            ..SelfTestConfig::default()
        },
        SelfTestConfig {
            full_scale: 4,
            ..SelfTestConfig::default()
        },
        SelfTestConfig {
            gyro_trim_base: 0.0,
            ..SelfTestConfig::default()
        },
    ] {
        let result = driver.self_test(&SelfTestEvaluator::new(config), &mut MockDelay::new());
        assert!(matches!(result, Err(Error::InvalidConfig)));
    }

    assert!(transport.operations().is_empty());
}

#[test]
fn test_healthy_response_passes_tolerance() {
    let (mut driver, transport) = create_mock_driver();
    transport.set_self_test_response([131, -262, 0], [300, 100, -200]);
    transport.set_self_test_codes(NEUTRAL_CODES);

    let report = driver
        .self_test(&SelfTestEvaluator::default(), &mut MockDelay::new())
        .unwrap();

    assert!(report.passes(DEFAULT_TOLERANCE_PERCENT));
}

#[test]
fn test_large_response_fails_tolerance() {
    let (mut driver, transport) = create_mock_driver();
    transport.set_self_test_response([0, 0, 0], [0, 0, 1000]);
    transport.set_self_test_codes(NEUTRAL_CODES);

    let report = driver
        .self_test(&SelfTestEvaluator::default(), &mut MockDelay::new())
        .unwrap();

    assert!(!report.passes(DEFAULT_TOLERANCE_PERCENT));
}

#[test]
fn test_sums_do_not_overflow_at_full_scale() {
    let (mut driver, transport) = create_mock_driver();
    transport.set_accel_data(30000, -30000, 30000);
    transport.set_gyro_data(30000, 30000, -30000);
    transport.set_self_test_codes(NEUTRAL_CODES);

    let report = driver
        .self_test(&SelfTestEvaluator::default(), &mut MockDelay::new())
        .unwrap();

    assert_eq!(report.to_array(), [0.0; 6]);
}

#[test]
fn test_trim_read_failure_propagates() {
    let (mut driver, transport) = create_mock_driver();
    transport.fail_read_from(MPU, 0x0D);

    let result = driver.self_test(&SelfTestEvaluator::default(), &mut MockDelay::new());

    assert!(matches!(result, Err(Error::Bus(_))));
}

#[test]
fn test_factory_trim_defined_only_for_range_codes() {
    for full_scale in 0..=3 {
        assert!(factory_trim(2620.0, full_scale, 1).is_some());
    }
    for full_scale in [4, 7, 8, 31, u8::MAX] {
        assert_eq!(factory_trim(2620.0, full_scale, 1), None);
    }
}

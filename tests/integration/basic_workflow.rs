//! Integration tests for basic workflow scenarios

use crate::common::{MAG, MPU, MockDelay, Operation, assert_float_eq, create_mock_driver};
use crate::common::test_utils::create_mock_driver_with;
use mpu9250::{
    AccelScale, DEFAULT_TOLERANCE_PERCENT, FifoBiasCalibrator, GyroScale, SelfTestEvaluator,
    SensorConfig,
};

#[test]
fn test_initialization_register_values() {
    let (mut driver, transport) = create_mock_driver();
    transport.clear_operations();

    let mut delay = MockDelay::new();
    driver.init(&mut delay).unwrap();

    // Wake, then PLL clock
    assert_eq!(transport.writes_to(MPU, 0x6B), vec![0x00, 0x01]);
    assert_eq!(transport.writes_to(MPU, 0x1A), vec![0x03]);
    assert_eq!(transport.writes_to(MPU, 0x19), vec![0x04]);
    assert_eq!(transport.get_register(MPU, 0x1B), 0x00);
    assert_eq!(transport.get_register(MPU, 0x1C), 0x00);
    assert_eq!(transport.get_register(MPU, 0x1D), 0x03);
    // Latched interrupt with I2C bypass, data-ready enabled
    assert_eq!(transport.writes_to(MPU, 0x37), vec![0x22]);
    assert_eq!(transport.writes_to(MPU, 0x38), vec![0x01]);
    assert_eq!(delay.ms, vec![100, 200, 100]);
}

#[test]
fn test_initialization_preserves_unrelated_bits() {
    let (mut driver, transport) = create_mock_driver_with(SensorConfig {
        accel_scale: AccelScale::G8,
        gyro_scale: GyroScale::Dps2000,
        ..SensorConfig::default()
    });
    transport.set_register(MPU, 0x1B, 0xE3);
    transport.set_register(MPU, 0x1C, 0x07);
    transport.set_register(MPU, 0x1D, 0xFF);

    driver.init(&mut MockDelay::new()).unwrap();

    // Fchoice_b cleared, full scale replaced, other bits kept
    assert_eq!(transport.get_register(MPU, 0x1B), 0xF8);
    assert_eq!(transport.get_register(MPU, 0x1C), 0x17);
    assert_eq!(transport.get_register(MPU, 0x1D), 0xF3);
}

#[test]
fn test_complete_start_up_workflow() {
    let (mut driver, transport) = create_mock_driver();
    let mut delay = MockDelay::new();

    // Self-test on a healthy sensor
    transport.set_accel_data(0, 0, 16384);
    transport.set_gyro_data(0, 0, 0);
    transport.set_self_test_response([200, 200, 200], [100, 100, 100]);
    transport.set_self_test_codes([1; 6]);
    let report = driver
        .self_test(&SelfTestEvaluator::default(), &mut delay)
        .unwrap();
    assert!(report.passes(DEFAULT_TOLERANCE_PERCENT));

    // Bias calibration
    transport.push_fifo_packets([16, -8, 16400], [131, 0, -131], 40);
    let bias = driver
        .calibrate_bias(&FifoBiasCalibrator::default(), &mut delay)
        .unwrap();
    assert_float_eq(bias.gyro.x, 1.0, 1e-6);
    assert_float_eq(bias.gyro.z, -1.0, 1e-6);
    assert_float_eq(bias.accel.z, 16.0 / 16384.0, 1e-7);

    // Restore the application configuration
    driver.init(&mut delay).unwrap();
    driver.init_magnetometer(&mut delay).unwrap();
    assert_eq!(transport.get_register(MPU, 0x19), 0x04);
    assert_eq!(transport.get_register(MAG, 0x0A), 0x12);

    // Live readings
    transport.set_accel_data(0, 0, 16384);
    transport.set_gyro_data(131, 0, 0);
    transport.set_temperature_data(0);
    transport.set_mag_data(100, 0, 0);

    assert_float_eq(driver.read_accel().unwrap().z, 1.0, 1e-6);
    assert_float_eq(driver.read_gyro().unwrap().x, 131.0 * 250.0 / 32768.0, 1e-5);
    assert_float_eq(driver.read_temperature_celsius().unwrap(), 21.0, 1e-6);
    assert!(driver.read_magnetometer().unwrap().x > 0.0);

    let transport = driver.release();
    assert_eq!(transport.get_register(MPU, 0x75), 0x71);
}

#[test]
fn test_error_recovery() {
    let (mut driver, transport) = create_mock_driver();
    driver.init(&mut MockDelay::new()).unwrap();

    transport.fail_next_read();
    assert!(driver.read_accel().is_err());

    transport.set_accel_data(100, 200, 300);
    assert!(driver.read_accel().is_ok());
}

#[test]
fn test_torn_read_protection() {
    let (mut driver, transport) = create_mock_driver();
    transport.set_accel_data(1000, 2000, 3000);
    transport.clear_operations();

    let raw = driver.read_accel_raw().unwrap();
    assert_eq!(raw.to_array(), [1000, 2000, 3000]);

    // One burst: six consecutive bytes from ACCEL_XOUT_H
    let accel_reads: Vec<u8> = transport
        .operations()
        .iter()
        .filter_map(|op| match *op {
            Operation::Read {
                device: MPU,
                register,
                ..
            } => Some(register),
            _ => None,
        })
        .collect();
    assert_eq!(accel_reads, vec![0x3B, 0x3C, 0x3D, 0x3E, 0x3F, 0x40]);
}

#[test]
fn test_alternate_address() {
    let transport = crate::common::MockTransport::new();
    let mut driver = mpu9250::Mpu9250::new(
        transport.clone(),
        mpu9250::I2C_ADDRESS_AD0_HIGH,
        SensorConfig::default(),
    )
    .unwrap();
    driver.init(&mut MockDelay::new()).unwrap();

    assert_eq!(driver.address(), 0x69);
    assert_eq!(transport.writes_to(0x69, 0x37), vec![0x22]);
    assert!(transport.writes_to(MPU, 0x37).is_empty());
}
